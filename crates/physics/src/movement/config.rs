//! Base locomotion tuning.
//!
//! All distances are world units (centimetre scale), speeds are units per
//! second. Parkour tuning lives separately in [`crate::parkour::ParkourConfig`].

use serde::{Deserialize, Serialize};

/// Configuration for walking and falling physics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Character Dimensions
    // ========================================================================
    /// Collision radius.
    pub player_radius: f32,

    /// Standing height.
    pub standing_height: f32,

    /// Eye height above the feet.
    pub eye_height: f32,

    // ========================================================================
    // Movement Speeds
    // ========================================================================
    /// Walking speed.
    pub walk_speed: f32,

    /// Sprinting speed.
    pub run_speed: f32,

    // ========================================================================
    // Physics
    // ========================================================================
    /// Gravity acceleration (units/second²).
    pub gravity: f32,

    /// Jump take-off velocity.
    pub jump_velocity: f32,

    /// Ground friction coefficient.
    pub friction: f32,

    /// Air control factor (0.0 = no air control, 1.0 = full control).
    pub air_control: f32,

    /// Ground acceleration factor.
    pub ground_acceleration: f32,

    /// Air acceleration factor.
    pub air_acceleration: f32,

    /// Speed below which friction uses this value instead of the current speed.
    pub stop_speed: f32,

    // ========================================================================
    // Stairs and Ground
    // ========================================================================
    /// Maximum step height the character walks up without jumping.
    pub step_height: f32,

    /// Minimum surface normal Y to be considered ground (cos of max slope angle).
    pub min_ground_normal: f32,

    /// How far below the feet to look for ground each tick.
    pub ground_probe_distance: f32,

    // ========================================================================
    // Collision
    // ========================================================================
    /// Maximum collision iterations per slide move.
    pub max_clip_planes: usize,

    /// Overbounce factor for velocity reflection (prevents sticking).
    pub overbounce: f32,

    // ========================================================================
    // Timing
    // ========================================================================
    /// Minimum time between jumps (milliseconds).
    pub jump_cooldown_ms: u32,

    /// After a launch, how long ground snapping stays off (milliseconds).
    pub launch_grace_ms: u32,

    /// Longest tick the controller will integrate in one go (seconds).
    pub max_delta_time: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            player_radius: 40.0,
            standing_height: 180.0,
            eye_height: 160.0,

            walk_speed: 450.0,
            run_speed: 700.0,

            gravity: 1500.0,
            jump_velocity: 550.0, // ~1m jump height
            friction: 6.0,
            air_control: 0.1,
            ground_acceleration: 10.0,
            air_acceleration: 1.0,
            stop_speed: 50.0,

            step_height: 40.0,
            min_ground_normal: 0.7, // ~45 degree max slope
            ground_probe_distance: 10.0,

            max_clip_planes: 5,
            overbounce: 1.001,

            jump_cooldown_ms: 200,
            launch_grace_ms: 50,
            max_delta_time: 0.066,
        }
    }
}

impl MovementConfig {
    /// Faster, floatier movement for flow-heavy courses.
    pub fn arcade() -> Self {
        Self {
            walk_speed: 600.0,
            run_speed: 1000.0,
            gravity: 2000.0,
            jump_velocity: 650.0,
            air_control: 0.3,
            ground_acceleration: 15.0,
            air_acceleration: 2.0,
            jump_cooldown_ms: 100,
            ..Default::default()
        }
    }

    /// Slower, heavier movement.
    pub fn tactical() -> Self {
        Self {
            walk_speed: 350.0,
            run_speed: 550.0,
            gravity: 1200.0,
            jump_velocity: 450.0,
            friction: 8.0,
            air_control: 0.05,
            ground_acceleration: 8.0,
            air_acceleration: 0.5,
            jump_cooldown_ms: 300,
            ..Default::default()
        }
    }

    /// Max speed for the current input.
    pub fn max_speed(&self, is_sprinting: bool) -> f32 {
        if is_sprinting {
            self.run_speed
        } else {
            self.walk_speed
        }
    }
}
