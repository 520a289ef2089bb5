use glam::{EulerRot, Mat4, Vec3};

/// Incrementally composed world transform.
///
/// Every operation applies its elementary transform *after* everything that
/// was applied before it, in call order. Operations accumulate: calling
/// `rotate_y` every frame keeps spinning the object. Use [`Transform::set`]
/// to assign an absolute matrix.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    matrix: Mat4,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self { matrix: Mat4::IDENTITY };

    /// Rotates around the x-axis by `angle` radians.
    pub fn rotate_x(&mut self, angle: f32) {
        self.apply(Mat4::from_rotation_x(angle));
    }

    /// Rotates around the y-axis by `angle` radians.
    pub fn rotate_y(&mut self, angle: f32) {
        self.apply(Mat4::from_rotation_y(angle));
    }

    /// Rotates around the z-axis by `angle` radians.
    pub fn rotate_z(&mut self, angle: f32) {
        self.apply(Mat4::from_rotation_z(angle));
    }

    /// Rotates by Euler angles: roll about z first, then pitch about x, then yaw about y.
    pub fn rotate_roll_pitch_yaw(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.apply(Mat4::from_euler(EulerRot::YXZ, yaw, pitch, roll));
    }

    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        self.apply(Mat4::from_scale(Vec3::new(x, y, z)));
    }

    pub fn translate(&mut self, offset: Vec3) {
        self.apply(Mat4::from_translation(offset));
    }

    /// Replaces the accumulated matrix.
    pub fn set(&mut self, matrix: Mat4) {
        self.matrix = matrix;
    }

    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }

    #[inline]
    fn apply(&mut self, m: Mat4) {
        self.matrix = m * self.matrix;
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn starts_at_identity() {
        assert_eq!(Transform::default().matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn rotate_x_then_scale_moves_up_vector_onto_z() {
        let mut t = Transform::default();
        t.rotate_x(FRAC_PI_2);
        t.scale(2.0, 2.0, 2.0);
        let p = t.transform_point(Vec3::new(0.0, 1.0, 0.0));
        assert!(p.abs_diff_eq(Vec3::new(0.0, 0.0, 2.0), EPS), "got {p:?}");
    }

    #[test]
    fn composition_matches_ordered_product() {
        let mut t = Transform::default();
        t.rotate_z(0.3);
        t.translate(Vec3::new(1.0, 2.0, 3.0));
        t.scale(0.5, 2.0, 1.0);

        let expected = Mat4::from_scale(Vec3::new(0.5, 2.0, 1.0))
            * Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_z(0.3);
        assert!(t.matrix().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn rotate_and_translate_do_not_commute() {
        let mut a = Transform::default();
        a.rotate_y(FRAC_PI_2);
        a.translate(Vec3::X);

        let mut b = Transform::default();
        b.translate(Vec3::X);
        b.rotate_y(FRAC_PI_2);

        let pa = a.transform_point(Vec3::ZERO);
        let pb = b.transform_point(Vec3::ZERO);
        assert!(pa.abs_diff_eq(Vec3::X, EPS));
        assert!(pb.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));
        assert!(!pa.abs_diff_eq(pb, EPS));
    }

    #[test]
    fn repeated_calls_accumulate() {
        let mut t = Transform::default();
        for _ in 0..4 {
            t.rotate_z(FRAC_PI_2);
        }
        assert!(t.matrix().abs_diff_eq(Mat4::IDENTITY, EPS));

        t.translate(Vec3::Y);
        t.translate(Vec3::Y);
        assert!(t.transform_point(Vec3::ZERO).abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), EPS));
    }

    #[test]
    fn roll_pitch_yaw_applies_roll_then_pitch_then_yaw() {
        let (pitch, yaw, roll) = (0.2, -0.7, 1.1);
        let mut euler = Transform::default();
        euler.rotate_roll_pitch_yaw(pitch, yaw, roll);

        let mut stepwise = Transform::default();
        stepwise.rotate_z(roll);
        stepwise.rotate_x(pitch);
        stepwise.rotate_y(yaw);

        assert!(euler.matrix().abs_diff_eq(stepwise.matrix(), EPS));
    }

    #[test]
    fn set_replaces_accumulated_state() {
        let mut t = Transform::default();
        t.rotate_x(1.0);
        t.translate(Vec3::ONE);
        t.set(Mat4::from_translation(Vec3::Z));
        assert!(t.transform_point(Vec3::ZERO).abs_diff_eq(Vec3::Z, EPS));
    }
}
