//! Movement state and input structures.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::BodyId;

/// Custom movement modes layered on top of walking/falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomMode {
    /// Scripted ledge climb.
    Climb,
    /// Reserved; stepping in this mode does nothing.
    WallRun,
    /// Scripted vault over a low obstacle.
    Vault,
}

/// The character's locomotion mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MovementMode {
    /// On the ground, standard physics.
    #[default]
    Walking,
    /// Airborne, standard physics.
    Falling,
    /// A traversal owns position updates.
    Custom(CustomMode),
}

impl MovementMode {
    #[inline]
    pub fn is_custom(self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// Additive camera rotation collected during a tick.
///
/// Systems contribute `(pitch, yaw, roll)` offsets in radians; the camera
/// drains the total once per frame and adds it on top of the view angles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraAccumulator {
    pending: Vec3,
}

impl CameraAccumulator {
    /// Add a rotation offset.
    #[inline]
    pub fn add(&mut self, pitch: f32, yaw: f32, roll: f32) {
        self.pending += Vec3::new(pitch, yaw, roll);
    }

    /// Add a roll-only offset.
    #[inline]
    pub fn add_roll(&mut self, roll: f32) {
        self.pending.z += roll;
    }

    /// Current total without clearing it.
    #[inline]
    pub fn peek(&self) -> Vec3 {
        self.pending
    }

    /// Take the accumulated offset and reset.
    #[inline]
    pub fn drain(&mut self) -> Vec3 {
        std::mem::take(&mut self.pending)
    }
}

/// Complete movement state for a character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementState {
    /// Position in world space (feet/bottom of collision shape).
    pub position: Vec3,

    /// Velocity in world space (units/second).
    pub velocity: Vec3,

    /// View angles in radians: (pitch, yaw, roll).
    ///
    /// - Pitch: Looking up/down (-PI/2 to PI/2), positive looks down
    /// - Yaw: Looking left/right (-PI to PI)
    /// - Roll: Tilting head (usually 0)
    pub view_angles: Vec3,

    /// Current locomotion mode.
    pub mode: MovementMode,

    /// Ground surface normal (valid while walking).
    pub ground_normal: Vec3,

    /// Whether the character's capsule takes part in collision.
    ///
    /// Cleared for the duration of a traversal.
    pub collision_enabled: bool,

    /// Remaining jump cooldown (milliseconds).
    pub jump_cooldown_ms: u32,

    /// Remaining time the ground check is skipped after a launch (milliseconds).
    pub launch_grace_ms: u32,

    /// Camera offsets contributed this tick.
    pub camera: CameraAccumulator,

    /// The character's own body in the collision world, if it has one.
    pub body: Option<BodyId>,
}

impl Default for MovementState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            view_angles: Vec3::ZERO,
            mode: MovementMode::Falling,
            ground_normal: Vec3::Y,
            collision_enabled: true,
            jump_cooldown_ms: 0,
            launch_grace_ms: 0,
            camera: CameraAccumulator::default(),
            body: None,
        }
    }
}

impl MovementState {
    /// Create a new movement state at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a state facing the given yaw (radians).
    pub fn facing(position: Vec3, yaw: f32) -> Self {
        let mut state = Self::new(position);
        state.view_angles.y = yaw;
        state
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.mode == MovementMode::Walking
    }

    /// Get the eye position (for camera placement).
    pub fn eye_position(&self, eye_height: f32) -> Vec3 {
        self.position + Vec3::new(0.0, eye_height, 0.0)
    }

    /// Get the forward direction from view angles (horizontal only).
    pub fn forward_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.view_angles.y.sin_cos();
        Vec3::new(cos_yaw, 0.0, sin_yaw).normalize()
    }

    /// Get the right direction from view angles (horizontal only).
    pub fn right_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.view_angles.y.sin_cos();
        Vec3::new(-sin_yaw, 0.0, cos_yaw).normalize()
    }

    /// Get current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z).length()
    }
}

/// Input command from the player for a single tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerCommand {
    /// Forward/backward movement (-1.0 to 1.0).
    pub forward_move: f32,

    /// Strafe left/right (-1.0 to 1.0).
    pub right_move: f32,

    /// View angle delta this tick (radians): (pitch_delta, yaw_delta).
    pub view_delta: (f32, f32),

    /// Button states.
    pub buttons: CommandButtons,
}

/// Button state flags for player commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandButtons(pub u16);

impl CommandButtons {
    /// Jump / parkour button.
    pub const JUMP: u16 = 1 << 0;

    /// Sprint button.
    pub const SPRINT: u16 = 1 << 1;

    /// Check if a button is pressed.
    #[inline]
    pub fn pressed(self, button: u16) -> bool {
        (self.0 & button) != 0
    }

    /// Press a button.
    #[inline]
    pub fn press(&mut self, button: u16) {
        self.0 |= button;
    }

    /// Release a button.
    #[inline]
    pub fn release(&mut self, button: u16) {
        self.0 &= !button;
    }
}

impl PlayerCommand {
    #[inline]
    pub fn wants_jump(&self) -> bool {
        self.buttons.pressed(CommandButtons::JUMP)
    }

    #[inline]
    pub fn wants_sprint(&self) -> bool {
        self.buttons.pressed(CommandButtons::SPRINT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_mode_helpers() {
        let mut state = MovementState::default();
        assert!(!state.on_ground());

        state.mode = MovementMode::Walking;
        assert!(state.on_ground());
        assert!(!state.mode.is_custom());
        assert!(MovementMode::Custom(CustomMode::Vault).is_custom());
    }

    #[test]
    fn test_movement_state_directions() {
        let mut state = MovementState::new(Vec3::ZERO);

        state.view_angles.y = 0.0;
        let forward = state.forward_direction();
        assert!((forward.x - 1.0).abs() < 0.01);
        assert!(forward.z.abs() < 0.01);

        state.view_angles.y = PI / 2.0;
        let forward = state.forward_direction();
        assert!(forward.x.abs() < 0.01);
        assert!((forward.z - 1.0).abs() < 0.01);

        // Right is a quarter turn clockwise from forward, seen from above
        let right = state.right_direction();
        assert!((right.x + 1.0).abs() < 0.01);
    }

    #[test]
    fn test_camera_accumulator_drains() {
        let mut camera = CameraAccumulator::default();
        camera.add_roll(0.1);
        camera.add(0.2, 0.0, 0.1);

        assert!((camera.peek() - Vec3::new(0.2, 0.0, 0.2)).length() < 1e-6);
        assert!((camera.drain() - Vec3::new(0.2, 0.0, 0.2)).length() < 1e-6);
        assert_eq!(camera.peek(), Vec3::ZERO);
    }

    #[test]
    fn test_player_command_buttons() {
        let mut cmd = PlayerCommand::default();
        assert!(!cmd.wants_jump());

        cmd.buttons.press(CommandButtons::JUMP);
        assert!(cmd.wants_jump());

        cmd.buttons.release(CommandButtons::JUMP);
        assert!(!cmd.wants_jump());
    }
}
