//! Drawable objects and their geometry.

mod material;
pub mod primitives;
mod object;
mod vertex;

pub use material::{BasicMeshEntry, Material};
pub use object::Renderable;
pub use vertex::{Index, SimpleVertex, INDEX_FORMAT};
