use std::f32::consts::FRAC_PI_2;

use glam::Mat4;

/// Vertical field of view, in radians.
pub const FIELD_OF_VIEW: f32 = FRAC_PI_2;
pub const NEAR_PLANE: f32 = 0.01;
pub const FAR_PLANE: f32 = 100.0;

/// Left-handed perspective projection derived from a client area.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    matrix: Mat4,
    width: u32,
    height: u32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
            width: 0,
            height: 0,
        }
    }
}

impl Projection {
    /// Builds the projection for a `width` × `height` client area.
    ///
    /// A zero height is treated as one pixel so the aspect ratio stays finite.
    pub fn for_client_area(width: u32, height: u32) -> Self {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        Self {
            matrix: Mat4::perspective_lh(FIELD_OF_VIEW, aspect, NEAR_PLANE, FAR_PLANE),
            width,
            height,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn client_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Aspect ratio encoded in the matrix (`y scale / x scale`).
    pub fn aspect_ratio(&self) -> f32 {
        self.matrix.y_axis.y / self.matrix.x_axis.x
    }
}
