use std::fmt;

use super::registry::Name;

/// Failure of a registry operation on the [`Renderer`](super::Renderer).
///
/// A failed operation never mutates the registries or light slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An entry with this name is already registered.
    DuplicateName(Name),
    UnknownRenderable(Name),
    UnknownVertexShader(Name),
    UnknownPixelShader(Name),
    /// Light slot index outside `0..NUM_LIGHTS`.
    LightIndexOutOfRange { index: usize, capacity: usize },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateName(n) => write!(f, "name `{n}` is already registered"),
            Self::UnknownRenderable(n) => write!(f, "no renderable named `{n}`"),
            Self::UnknownVertexShader(n) => write!(f, "no vertex shader named `{n}`"),
            Self::UnknownPixelShader(n) => write!(f, "no pixel shader named `{n}`"),
            Self::LightIndexOutOfRange { index, capacity } => {
                write!(f, "light index {index} is out of range (capacity {capacity})")
            }
        }
    }
}

impl std::error::Error for RegistryError {}
