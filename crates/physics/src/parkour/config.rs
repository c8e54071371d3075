//! Parkour tuning.
//!
//! Distances are world units measured from the character's feet unless a
//! field says otherwise. Angles are degrees.

use serde::{Deserialize, Serialize};

use crate::collision::ContentFlags;
use crate::curve::{vault_tilt_bump, FloatCurve, VectorCurve};

/// Settings for ledge and vault detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    // ========================================================================
    // Ledge
    // ========================================================================
    /// Reach of the forward ledge probe.
    pub forward_trace_distance: f32,

    /// The forward probe starts at half of this above the feet (chest height).
    pub vertical_trace_height: f32,

    /// Headroom that must be clear above the chest.
    pub up_trace_height: f32,

    pub min_ledge_height: f32,
    pub max_ledge_height: f32,

    /// How far past the wall face the ledge-top probe is dropped.
    pub ledge_inset: f32,

    // ========================================================================
    // Vault
    // ========================================================================
    /// Reach of the forward obstacle probe.
    pub vault_forward_trace_distance: f32,

    /// Height above the feet of the obstacle probe.
    pub vault_trace_height: f32,

    pub vault_obstacle_height_min: f32,
    pub vault_obstacle_height_max: f32,

    /// Distance past the obstacle face at which landing space is checked.
    pub vault_obstacle_distance: f32,

    /// The landing probe starts this far above the obstacle hit point.
    pub vault_landing_margin: f32,

    /// The landing probe stops this far above the feet, so the floor itself
    /// never counts as blocking.
    pub vault_landing_floor_gap: f32,

    /// Half extent of the box swept through the landing space.
    pub vault_landing_probe_half_extent: f32,

    // ========================================================================
    // Common
    // ========================================================================
    /// Collision channel the probes run against.
    pub channel: ContentFlags,

    pub debug_draw: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            forward_trace_distance: 150.0,
            vertical_trace_height: 100.0,
            up_trace_height: 100.0,
            min_ledge_height: 40.0,
            max_ledge_height: 140.0,
            ledge_inset: 20.0,

            vault_forward_trace_distance: 120.0,
            vault_trace_height: 30.0,
            vault_obstacle_height_min: 40.0,
            vault_obstacle_height_max: 100.0,
            vault_obstacle_distance: 100.0,
            vault_landing_margin: 50.0,
            vault_landing_floor_gap: 10.0,
            vault_landing_probe_half_extent: 20.0,

            channel: ContentFlags::MASK_TRAVERSAL,
            debug_draw: false,
        }
    }
}

/// Settings for climb and vault execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    // ========================================================================
    // Climb
    // ========================================================================
    pub approach_time: f32,
    pub grab_time: f32,
    pub pull_up_time: f32,

    /// Grab point: back from the ledge top along the surface forward.
    pub grab_inset: f32,
    /// Grab point: below the ledge top.
    pub grab_drop: f32,
    /// Over-the-ledge point: past the ledge top along the surface forward.
    pub over_forward: f32,
    /// Over-the-ledge point: above the ledge top.
    pub over_rise: f32,

    /// Climb waypoints are placed for the capsule centre, this far above the feet.
    pub capsule_half_height: f32,

    /// How quickly the view turns to face the wall during the approach.
    pub climb_facing_interp_speed: f32,

    /// Pitch the view settles on while grabbing (negative looks up).
    pub climb_grab_pitch_deg: f32,

    /// Optional easing applied to every phase's progress.
    pub climb_progress_curve: Option<FloatCurve>,

    // ========================================================================
    // Vault
    // ========================================================================
    pub vault_time: f32,
    pub vault_forward_distance: f32,

    /// Extra height added to the vault arc above the obstacle.
    pub vault_clearance: f32,

    pub max_vault_momentum_speed: f32,

    /// If the vault ends overlapping geometry, how far ahead to look for a
    /// clear spot to finish in.
    pub vault_exit_search: f32,

    /// Local path over the vault; x along the vault direction, y to the right, z up.
    pub vault_curve: Option<VectorCurve>,

    // ========================================================================
    // Camera
    // ========================================================================
    pub max_camera_tilt_deg: f32,

    /// Decay speed of the tilt once a vault has ended.
    pub camera_tilt_interp_speed: f32,

    pub vault_tilt_curve: Option<FloatCurve>,

    pub debug_draw: bool,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            approach_time: 0.25,
            grab_time: 0.25,
            pull_up_time: 0.5,
            grab_inset: 50.0,
            grab_drop: 40.0,
            over_forward: 30.0,
            over_rise: 120.0,
            capsule_half_height: 90.0,
            climb_facing_interp_speed: 8.0,
            climb_grab_pitch_deg: -15.0,
            climb_progress_curve: None,

            vault_time: 0.8,
            vault_forward_distance: 100.0,
            vault_clearance: 50.0,
            max_vault_momentum_speed: 600.0,
            vault_exit_search: 120.0,
            vault_curve: Some(VectorCurve::vault_arc()),

            max_camera_tilt_deg: 15.0,
            camera_tilt_interp_speed: 6.0,
            vault_tilt_curve: Some(vault_tilt_bump()),

            debug_draw: false,
        }
    }
}

impl TraversalConfig {
    #[inline]
    pub fn max_camera_tilt(&self) -> f32 {
        self.max_camera_tilt_deg.to_radians()
    }

    #[inline]
    pub fn climb_grab_pitch(&self) -> f32 {
        self.climb_grab_pitch_deg.to_radians()
    }

    /// Remap a phase's linear progress through the optional easing curve.
    pub fn ease_climb(&self, alpha: f32) -> f32 {
        match &self.climb_progress_curve {
            Some(curve) => curve.evaluate(alpha),
            None => alpha,
        }
    }
}

/// Everything the parkour systems need, in one place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkourConfig {
    pub detector: DetectorConfig,
    pub traversal: TraversalConfig,
}

impl ParkourConfig {
    /// Turn debug drawing on or off for both systems.
    pub fn with_debug_draw(mut self, enabled: bool) -> Self {
        self.detector.debug_draw = enabled;
        self.traversal.debug_draw = enabled;
        self
    }
}
