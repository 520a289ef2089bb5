//! Uniform buffer payloads and their bind slots.
//!
//! Layouts follow WGSL uniform rules: every member is 16-byte aligned.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};

use crate::light::NUM_LIGHTS;

/// Per-frame data: camera, projection and lights.
pub const FRAME_GROUP: u32 = 0;
/// Per-renderable constant buffer.
pub const OBJECT_GROUP: u32 = 1;
/// Texture + sampler of the first textured material.
pub const MATERIAL_GROUP: u32 = 2;

pub const CAMERA_BINDING: u32 = 0;
pub const RESIZE_BINDING: u32 = 1;
pub const OBJECT_BINDING: u32 = 2;
pub const LIGHTS_BINDING: u32 = 3;

pub const TEXTURE_BINDING: u32 = 0;
pub const SAMPLER_BINDING: u32 = 1;

/// Rewritten every frame from the camera state.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CbChangeOnCameraMovement {
    pub view: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
}

impl CbChangeOnCameraMovement {
    pub fn new(view: Mat4, camera_position: Vec4) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            camera_position: camera_position.to_array(),
        }
    }
}

/// Written at initialization and on resize.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CbChangeOnResize {
    pub projection: [[f32; 4]; 4],
}

impl CbChangeOnResize {
    pub fn new(projection: Mat4) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
        }
    }
}

/// Per-renderable data, rewritten before each draw.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CbChangesEveryFrame {
    pub world: [[f32; 4]; 4],
    pub output_color: [f32; 4],
}

impl CbChangesEveryFrame {
    pub fn new(world: Mat4, output_color: Vec4) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            output_color: output_color.to_array(),
        }
    }
}

/// Point light positions and colors; unpopulated slots stay zero.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct CbLights {
    pub light_positions: [[f32; 4]; NUM_LIGHTS],
    pub light_colors: [[f32; 4]; NUM_LIGHTS],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_sizes_are_uniform_aligned() {
        for size in [
            std::mem::size_of::<CbChangeOnCameraMovement>(),
            std::mem::size_of::<CbChangeOnResize>(),
            std::mem::size_of::<CbChangesEveryFrame>(),
            std::mem::size_of::<CbLights>(),
        ] {
            assert_eq!(size % 16, 0, "size {size} is not a multiple of 16");
        }
    }

    #[test]
    fn matrices_are_stored_column_major() {
        let m = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let cb = CbChangesEveryFrame::new(m, Vec4::ONE);
        assert_eq!(cb.world[3], [1.0, 2.0, 3.0, 1.0]);
    }
}
