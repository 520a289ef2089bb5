use crate::texture::Texture;

/// Contiguous index range of a renderable drawn with one material.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct BasicMeshEntry {
    pub base_index: u32,
    pub num_indices: u32,
    pub material_index: u32,
}

/// Surface description; only the diffuse texture is consumed by the renderer.
#[derive(Debug, Default)]
pub struct Material {
    pub diffuse: Option<Texture>,
}

impl Material {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_diffuse(texture: Texture) -> Self {
        Self {
            diffuse: Some(texture),
        }
    }
}
