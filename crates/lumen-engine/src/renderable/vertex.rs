use bytemuck::{Pod, Zeroable};

/// Vertex with position, texture coordinate and normal.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SimpleVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
    pub normal: [f32; 3],
}

impl SimpleVertex {
    pub const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2, // tex_coord
        2 => Float32x3  // normal
    ];

    pub const STRIDE: wgpu::BufferAddress = std::mem::size_of::<SimpleVertex>() as wgpu::BufferAddress;

    pub fn new(position: [f32; 3], tex_coord: [f32; 2], normal: [f32; 3]) -> Self {
        Self {
            position,
            tex_coord,
            normal,
        }
    }
}

/// Index element type; buffers are bound as `Uint16`.
pub type Index = u16;

pub const INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint16;
