use glam::{Mat4, Vec3};

/// A free-look camera tracking an eye position and accumulated yaw/pitch.
///
/// Pointer deltas feed [`add_rotation`](Self::add_rotation), movement keys
/// feed [`move_by`](Self::move_by), and the scene reads
/// [`view_matrix`](Self::view_matrix) once per frame. No roll, no smoothing.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Eye position in world space.
    pub position: Vec3,
    /// Accumulated yaw in radians.
    pub yaw: f32,
    /// Accumulated pitch in radians. Not clamped: steering past ±90°
    /// flips the view upside down.
    pub pitch: f32,
    /// Scale applied to deltas fed to [`add_rotation`](Self::add_rotation).
    pub sensitivity: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 0.0025,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    /// Accumulates a pointer-motion delta into yaw and pitch.
    ///
    /// Deltas follow the previous-minus-current convention and are scaled
    /// by `sensitivity` before accumulating.
    pub fn add_rotation(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw * self.sensitivity;
        self.pitch += delta_pitch * self.sensitivity;
    }

    /// Moves the eye by a camera-relative offset.
    ///
    /// `dx` strafes, `dy` runs along the yaw-rotated forward axis, and `dz`
    /// moves straight up or down in world space. Offsets are applied as
    /// given: one unit in is one world unit out.
    pub fn move_by(&mut self, dx: f32, dy: f32, dz: f32) {
        let forward = Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos());
        let right = Vec3::new(-forward.z, 0.0, forward.x);
        self.position += right * dx + forward * dy + Vec3::new(0.0, dz, 0.0);
    }

    /// View matrix for the current eye position and orientation.
    ///
    /// The inverse of the camera's world transform: it carries the eye to
    /// the origin, and is the identity for a camera at rest.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.pitch)
            * Mat4::from_rotation_y(self.yaw)
            * Mat4::from_translation(-self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn view_matrix_is_identity_at_rest() {
        assert_eq!(Camera::new().view_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn view_matrix_sends_the_eye_to_the_origin() {
        let mut camera = Camera::new().at(1.0, 2.0, 3.0);
        camera.yaw = 0.7;
        camera.pitch = -0.3;

        let eye = camera.view_matrix().transform_point3(camera.position);
        assert!(eye.length() < 1e-5, "{eye}");
    }

    #[test]
    fn forward_move_at_zero_yaw_shifts_exactly_one_axis() {
        let mut camera = Camera::new();
        camera.move_by(0.0, 1.0, 0.0);
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn movement_rotates_with_yaw() {
        let mut camera = Camera::new();
        camera.yaw = FRAC_PI_2;
        camera.move_by(0.0, 1.0, 0.0);
        assert!((camera.position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn strafe_and_vertical_moves_leave_other_axes_alone() {
        let mut camera = Camera::new();
        camera.move_by(1.0, 0.0, 0.0);
        assert_eq!(camera.position, Vec3::new(-1.0, 0.0, 0.0));

        camera.move_by(0.0, 0.0, 2.0);
        assert_eq!(camera.position, Vec3::new(-1.0, 2.0, 0.0));
    }

    #[test]
    fn rotation_deltas_accumulate_scaled_by_sensitivity() {
        let mut camera = Camera::new().sensitivity(0.5);
        camera.add_rotation(1.0, -2.0);
        camera.add_rotation(1.0, 0.0);
        assert_eq!(camera.yaw, 1.0);
        assert_eq!(camera.pitch, -1.0);
    }

    #[test]
    fn pitch_is_not_clamped() {
        let mut camera = Camera::new().sensitivity(1.0);
        camera.add_rotation(0.0, 4.0);
        assert_eq!(camera.pitch, 4.0);
    }
}
