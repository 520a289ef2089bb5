//! Vertex and pixel shader collaborators.
//!
//! Both compile WGSL into a `wgpu::ShaderModule` when initialized; the
//! renderer pairs them into pipelines by name.

mod pixel;
mod source;
mod vertex;

pub use pixel::PixelShader;
pub use source::{EntryPointInfo, ShaderSource};
pub use vertex::{VertexLayout, VertexShader};
