//! First-person camera.

use std::f32::consts::FRAC_PI_2;

use anyhow::Result;
use glam::{EulerRot, Mat4, Vec3, Vec4};

use crate::input::{DirectionsInput, MouseRelativeMovement};
use crate::renderer::CbChangeOnCameraMovement;

const DEFAULT_FORWARD: Vec3 = Vec3::Z;
const DEFAULT_RIGHT: Vec3 = Vec3::X;
const DEFAULT_UP: Vec3 = Vec3::Y;

/// Looking straight up or down would collapse the look-at basis.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Free-flying first-person camera in a left-handed world.
///
/// `handle_input` only accumulates movement; `update` applies it and rebuilds
/// the view matrix.
#[derive(Debug)]
pub struct Camera {
    yaw: f32,
    pitch: f32,

    move_left_right: f32,
    move_back_forward: f32,
    move_up_down: f32,

    /// World units per second.
    pub travel_speed: f32,
    /// Radians per mouse count per second.
    pub rotation_speed: f32,

    eye: Vec3,
    at: Vec3,
    up: Vec3,
    view: Mat4,

    constant_buffer: Option<wgpu::Buffer>,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let at = position + DEFAULT_FORWARD;
        Self {
            yaw: 0.0,
            pitch: 0.0,
            move_left_right: 0.0,
            move_back_forward: 0.0,
            move_up_down: 0.0,
            travel_speed: 5.0,
            rotation_speed: 0.5,
            eye: position,
            at,
            up: DEFAULT_UP,
            view: Mat4::look_at_lh(position, at, DEFAULT_UP),
            constant_buffer: None,
        }
    }

    pub fn handle_input(
        &mut self,
        directions: &DirectionsInput,
        mouse: &MouseRelativeMovement,
        delta_time: f32,
    ) {
        let step = self.travel_speed * delta_time;

        if directions.left {
            self.move_left_right -= step;
        }
        if directions.right {
            self.move_left_right += step;
        }
        if directions.back {
            self.move_back_forward -= step;
        }
        if directions.front {
            self.move_back_forward += step;
        }
        if directions.down {
            self.move_up_down -= step;
        }
        if directions.up {
            self.move_up_down += step;
        }

        if !mouse.is_zero() {
            let turn = self.rotation_speed * delta_time;
            self.yaw += mouse.x * turn;
            self.pitch = (self.pitch + mouse.y * turn).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }
    }

    /// Applies accumulated movement and recomputes the view matrix.
    pub fn update(&mut self, _delta_time: f32) {
        let look = Mat4::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
        let look_dir = look.transform_vector3(DEFAULT_FORWARD).normalize();

        // Movement stays on the horizontal plane regardless of pitch.
        let heading = Mat4::from_rotation_y(self.yaw);
        let right = heading.transform_vector3(DEFAULT_RIGHT);
        let forward = heading.transform_vector3(DEFAULT_FORWARD);
        self.up = DEFAULT_UP;

        self.eye += self.move_left_right * right
            + self.move_back_forward * forward
            + self.move_up_down * self.up;

        self.move_left_right = 0.0;
        self.move_back_forward = 0.0;
        self.move_up_down = 0.0;

        self.at = self.eye + look_dir;
        self.view = Mat4::look_at_lh(self.eye, self.at, self.up);
    }

    /// Creates the camera constant buffer.
    pub fn initialize(&mut self, device: &wgpu::Device) -> Result<()> {
        anyhow::ensure!(
            self.constant_buffer.is_none(),
            "camera is already initialized"
        );

        self.constant_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lumen camera cb"),
            size: std::mem::size_of::<CbChangeOnCameraMovement>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        Ok(())
    }

    pub(crate) fn release(&mut self) {
        self.constant_buffer = None;
    }

    pub fn constant_buffer(&self) -> Option<&wgpu::Buffer> {
        self.constant_buffer.as_ref()
    }

    pub fn eye(&self) -> Vec4 {
        self.eye.extend(1.0)
    }

    pub fn at(&self) -> Vec4 {
        self.at.extend(1.0)
    }

    pub fn up(&self) -> Vec4 {
        self.up.extend(0.0)
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn constants(&self) -> CbChangeOnCameraMovement {
        CbChangeOnCameraMovement::new(self.view, self.eye())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, -3.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front() -> DirectionsInput {
        DirectionsInput {
            front: true,
            ..Default::default()
        }
    }

    #[test]
    fn starts_behind_origin_looking_at_it() {
        let camera = Camera::default();
        assert_eq!(camera.eye(), Vec4::new(0.0, 0.0, -3.0, 1.0));

        let origin = camera.view().transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(0.0, 0.0, 3.0), 1e-5));
    }

    #[test]
    fn movement_is_applied_on_update_only() {
        let mut camera = Camera::default();
        camera.handle_input(&front(), &MouseRelativeMovement::default(), 1.0);
        assert_eq!(camera.eye().z, -3.0);

        camera.update(1.0);
        assert!((camera.eye().z - 2.0).abs() < 1e-5);

        // Accumulators were consumed.
        camera.update(1.0);
        assert!((camera.eye().z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn yaw_turns_forward_movement() {
        let mut camera = Camera::default();
        camera.rotation_speed = 1.0;
        camera.handle_input(
            &DirectionsInput::default(),
            &MouseRelativeMovement { x: FRAC_PI_2, y: 0.0 },
            1.0,
        );
        camera.update(1.0);

        camera.travel_speed = 1.0;
        camera.handle_input(&front(), &MouseRelativeMovement::default(), 1.0);
        camera.update(1.0);

        assert!(camera.eye().abs_diff_eq(Vec4::new(1.0, 0.0, -3.0, 1.0), 1e-5));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.handle_input(
            &DirectionsInput::default(),
            &MouseRelativeMovement { x: 0.0, y: 1.0e6 },
            1.0,
        );
        assert!(camera.pitch() <= PITCH_LIMIT);
        camera.update(1.0);
        assert!(camera.view().is_finite());
    }
}
