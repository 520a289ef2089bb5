//! Point lights fed into the lights constant buffer.

use glam::{Mat4, Vec4};

/// Number of point light slots the shaders expect.
pub const NUM_LIGHTS: usize = 2;

type LightUpdate = Box<dyn FnMut(&mut Vec4, f32)>;

/// A colored point light with an optional per-frame behaviour.
pub struct PointLight {
    position: Vec4,
    color: Vec4,
    update: Option<LightUpdate>,
}

impl PointLight {
    pub fn new(position: Vec4, color: Vec4) -> Self {
        Self {
            position,
            color,
            update: None,
        }
    }

    /// Light that orbits the world Y axis at `speed` radians per second.
    pub fn rotating(position: Vec4, color: Vec4, speed: f32) -> Self {
        Self::new(position, color).with_update(move |position, dt| {
            *position = Mat4::from_rotation_y(speed * dt) * *position;
        })
    }

    /// Replaces the per-frame behaviour; it receives the position and delta time.
    pub fn with_update(mut self, update: impl FnMut(&mut Vec4, f32) + 'static) -> Self {
        self.update = Some(Box::new(update));
        self
    }

    pub fn update(&mut self, delta_time: f32) {
        if let Some(update) = self.update.as_mut() {
            update(&mut self.position, delta_time);
        }
    }

    pub fn position(&self) -> Vec4 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec4) {
        self.position = position;
    }

    pub fn color(&self) -> Vec4 {
        self.color
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.color = color;
    }
}

impl std::fmt::Debug for PointLight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PointLight")
            .field("position", &self.position)
            .field("color", &self.color)
            .field("animated", &self.update.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn static_light_does_not_move() {
        let mut light = PointLight::new(Vec4::new(1.0, 2.0, 3.0, 1.0), Vec4::ONE);
        light.update(1.0);
        assert_eq!(light.position(), Vec4::new(1.0, 2.0, 3.0, 1.0));
    }

    #[test]
    fn rotating_light_orbits_y_axis() {
        let mut light = PointLight::rotating(Vec4::new(0.0, 1.0, 2.0, 1.0), Vec4::ONE, FRAC_PI_2);
        light.update(1.0);

        let p = light.position();
        assert!(p.abs_diff_eq(Vec4::new(2.0, 1.0, 0.0, 1.0), 1e-5), "{p}");
    }
}
