//! First-person camera.

use glam::{Mat4, Quat, Vec3};
use parkour_physics::MovementState;

/// First-person camera state.
#[derive(Debug, Clone)]
pub struct FirstPersonCamera {
    /// Eye position in world space.
    pub position: Vec3,

    /// View angles (pitch, yaw, roll) in radians, including any offsets
    /// contributed through the character's camera accumulator.
    pub angles: Vec3,

    /// Field of view in degrees.
    pub fov: f32,

    /// Near clipping plane.
    pub near: f32,

    /// Far clipping plane.
    pub far: f32,

    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for FirstPersonCamera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            angles: Vec3::ZERO,
            fov: 90.0,
            near: 1.0,
            far: 20000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl FirstPersonCamera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Get the view matrix for rendering.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), self.up())
    }

    /// Get the projection matrix for rendering.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the forward direction vector.
    pub fn forward(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.angles.x.sin_cos();
        let (sin_yaw, cos_yaw) = self.angles.y.sin_cos();

        Vec3::new(cos_pitch * cos_yaw, -sin_pitch, cos_pitch * sin_yaw)
    }

    /// Get the right direction vector (horizontal, ignores roll).
    pub fn right(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.angles.y.sin_cos();
        Vec3::new(-sin_yaw, 0.0, cos_yaw)
    }

    /// World up, rolled around the view direction.
    pub fn up(&self) -> Vec3 {
        Quat::from_axis_angle(self.forward(), self.angles.z) * Vec3::Y
    }

    /// Place the camera at the character's eye and apply the rotation
    /// offsets queued since the last call.
    ///
    /// Drains `state.camera`, so call it once per simulation tick.
    pub fn update_from_character(&mut self, state: &mut MovementState, eye_height: f32) {
        let offset = state.camera.drain();
        self.position = state.eye_position(eye_height);
        self.angles = state.view_angles + offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_camera_creation() {
        let camera = FirstPersonCamera::new(Vec3::new(0.0, 160.0, 0.0));
        assert_eq!(camera.position.y, 160.0);
    }

    #[test]
    fn test_view_matrix() {
        let camera = FirstPersonCamera::default();
        let view = camera.view_matrix();

        // View matrix should be valid (non-zero determinant)
        assert!(view.determinant().abs() > 0.0001);
    }

    #[test]
    fn test_projection_keeps_eye_point_centered() {
        let mut camera = FirstPersonCamera::new(Vec3::new(0.0, 160.0, 0.0));
        camera.angles.y = 0.3;
        let target = camera.position + camera.forward() * 500.0;

        let clip = camera.projection_matrix() * camera.view_matrix() * target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-3 && ndc.y.abs() < 1e-3, "{:?}", ndc);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_forward_direction() {
        let mut camera = FirstPersonCamera::default();

        // Yaw = 0 should point along +X
        camera.angles.y = 0.0;
        assert!((camera.forward().x - 1.0).abs() < 0.01);
        assert!((camera.right().z - 1.0).abs() < 0.01);

        // Yaw = PI/2 should point along +Z
        camera.angles.y = FRAC_PI_2;
        assert!((camera.forward().z - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_roll_tilts_up_vector() {
        let mut camera = FirstPersonCamera::default();
        assert!((camera.up() - Vec3::Y).length() < 1e-6);

        camera.angles.z = 0.2;
        let up = camera.up();
        assert!(up.y < 1.0 && up.y > 0.9);
        assert!(up.z.abs() > 0.1, "roll should lean the up vector sideways: {:?}", up);
    }

    #[test]
    fn test_update_drains_accumulator() {
        let mut state = MovementState::facing(Vec3::new(10.0, 0.0, 20.0), 0.5);
        state.camera.add_roll(0.1);
        state.camera.add(0.05, 0.0, 0.0);

        let mut camera = FirstPersonCamera::default();
        camera.update_from_character(&mut state, 160.0);

        assert_eq!(camera.position, Vec3::new(10.0, 160.0, 20.0));
        assert!((camera.angles.x - 0.05).abs() < 1e-6);
        assert!((camera.angles.y - 0.5).abs() < 1e-6);
        assert!((camera.angles.z - 0.1).abs() < 1e-6);
        assert_eq!(state.camera.peek(), Vec3::ZERO);

        // Nothing queued, so the offset is gone next tick
        camera.update_from_character(&mut state, 160.0);
        assert_eq!(camera.angles.z, 0.0);
    }
}
