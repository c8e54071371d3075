//! Ledge and vault detection.
//!
//! The detector is a gate as much as a classifier: a surface is only
//! reported when the maneuver it affords can also be completed (clear
//! headroom for a climb, clear landing space for a vault).

use glam::Vec3;

use crate::collision::{QueryFilter, TraceShape, WorldQuery};
use crate::debug::{DebugColor, DebugSink, NullSink};
use crate::movement::MovementState;

use super::config::DetectorConfig;
use super::surface::{SurfaceAffordance, SurfaceType};

/// Slack allowed on the height bands so exact boundary heights survive
/// rounding in the ray casts. Reported heights are clamped back into the band.
const HEIGHT_TOLERANCE: f32 = 0.01;

/// Classifies the geometry in front of a character.
#[derive(Debug, Clone, Default)]
pub struct SurfaceDetector {
    pub config: DetectorConfig,
}

impl SurfaceDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// Look for a climbable ledge ahead of the character.
    pub fn detect_ledge<W: WorldQuery + ?Sized>(&self, state: &MovementState, world: &W) -> SurfaceAffordance {
        self.detect_ledge_traced(state, world, &mut NullSink)
    }

    /// Look for a vaultable obstacle ahead of the character.
    pub fn detect_vault<W: WorldQuery + ?Sized>(&self, state: &MovementState, world: &W) -> SurfaceAffordance {
        self.detect_vault_traced(state, world, &mut NullSink)
    }

    /// [`detect_ledge`](Self::detect_ledge), reporting every probe to `sink`
    /// when `debug_draw` is enabled.
    pub fn detect_ledge_traced<W, S>(&self, state: &MovementState, world: &W, sink: &mut S) -> SurfaceAffordance
    where
        W: WorldQuery + ?Sized,
        S: DebugSink + ?Sized,
    {
        let config = &self.config;
        let draw = config.debug_draw;
        let feet = state.position;
        let forward = state.forward_direction();
        let filter = self.filter(state);
        let chest = feet + Vec3::Y * (config.vertical_trace_height * 0.5);

        // Headroom above the chest
        let head = world.raycast(chest, Vec3::Y, config.up_trace_height, &filter);
        if draw {
            let color = if head.blocked() { DebugColor::Red } else { DebugColor::Green };
            sink.line(chest, chest + Vec3::Y * config.up_trace_height, color);
        }
        if head.blocked() {
            log::trace!("ledge rejected: head blocked at {:?}", head.impact_point);
            return SurfaceAffordance::head_blocked();
        }

        // Wall in front of the chest
        let wall = world.raycast(chest, forward, config.forward_trace_distance, &filter);
        if draw {
            let color = if wall.hit_something() { DebugColor::Green } else { DebugColor::Red };
            sink.line(chest, wall.end_position, color);
        }
        if !wall.hit_something() || wall.started_in_solid {
            return SurfaceAffordance::miss();
        }
        let normal = wall.hit_normal.unwrap_or(-forward);

        // Drop onto the ledge top from just behind the wall face
        let inset = wall.impact_point - normal * config.ledge_inset;
        let probe_top = Vec3::new(inset.x, feet.y + config.max_ledge_height + 1.0, inset.z);
        let probe_bottom = Vec3::new(inset.x, feet.y + config.min_ledge_height - 1.0, inset.z);
        let top = world.line_trace(probe_top, probe_bottom, &filter);
        if draw {
            sink.line(probe_top, probe_bottom, DebugColor::Orange);
            sink.sphere(wall.impact_point, 5.0, DebugColor::Yellow);
        }
        // Starting inside geometry means the wall rises above the band
        if !top.hit_something() || top.started_in_solid {
            return SurfaceAffordance::miss();
        }

        let Some(height) = within_band(top.impact_point.y - feet.y, config.min_ledge_height, config.max_ledge_height)
        else {
            log::trace!("ledge rejected: height {} outside band", top.impact_point.y - feet.y);
            return SurfaceAffordance::miss();
        };

        if draw {
            sink.sphere(top.impact_point, 10.0, DebugColor::Cyan);
            sink.text(top.impact_point, format!("ledge {:.0}", height), DebugColor::White);
        }
        log::trace!("ledge at {:?}, height {}", top.impact_point, height);

        SurfaceAffordance::found(SurfaceType::Ledge, top.impact_point, normal, height, wall.hit_body)
    }

    /// [`detect_vault`](Self::detect_vault), reporting every probe to `sink`
    /// when `debug_draw` is enabled.
    pub fn detect_vault_traced<W, S>(&self, state: &MovementState, world: &W, sink: &mut S) -> SurfaceAffordance
    where
        W: WorldQuery + ?Sized,
        S: DebugSink + ?Sized,
    {
        let config = &self.config;
        let draw = config.debug_draw;
        let feet = state.position;
        let forward = state.forward_direction();
        let filter = self.filter(state);
        let origin = feet + Vec3::Y * config.vault_trace_height;

        let obstacle = world.raycast(origin, forward, config.vault_forward_trace_distance, &filter);
        if draw {
            let color = if obstacle.hit_something() { DebugColor::Green } else { DebugColor::Red };
            sink.line(origin, obstacle.end_position, color);
        }
        if !obstacle.hit_something() || obstacle.started_in_solid {
            return SurfaceAffordance::miss();
        }
        let normal = obstacle.hit_normal.unwrap_or(-forward);

        let half_extent = obstacle
            .hit_body
            .and_then(|body| world.body_bounds(body))
            .map_or(0.0, |(min, max)| (max.y - min.y) * 0.5);
        let raw_height = obstacle.impact_point.y + half_extent - feet.y;
        if draw {
            sink.sphere(obstacle.impact_point, 5.0, DebugColor::Yellow);
        }
        let Some(height) = within_band(raw_height, config.vault_obstacle_height_min, config.vault_obstacle_height_max)
        else {
            log::trace!("vault rejected: obstacle height {} outside band", raw_height);
            return SurfaceAffordance::miss();
        };

        // Landing space beyond the obstacle, stopping short of the floor
        let half = config.vault_landing_probe_half_extent;
        let probe = TraceShape::Box {
            half_extents: Vec3::splat(half),
        };
        let landing_start = obstacle.impact_point
            + forward * config.vault_obstacle_distance
            + Vec3::Y * config.vault_landing_margin;
        let landing_end = Vec3::new(
            landing_start.x,
            feet.y + config.vault_landing_floor_gap,
            landing_start.z,
        );
        let landing = world.sweep(landing_start, landing_end, probe, &filter);
        if draw {
            let color = if landing.blocked() { DebugColor::Red } else { DebugColor::Green };
            sink.cube(landing_start + Vec3::Y * half, Vec3::splat(half), color);
            sink.cube(landing.end_position + Vec3::Y * half, Vec3::splat(half), color);
        }
        if landing.blocked() {
            log::trace!("vault rejected: landing blocked at {:?}", landing.end_position);
            return SurfaceAffordance::miss();
        }

        if draw {
            sink.text(obstacle.impact_point, format!("vault {:.0}", height), DebugColor::White);
        }
        log::trace!("vaultable obstacle at {:?}, height {}", obstacle.impact_point, height);

        SurfaceAffordance::found(
            SurfaceType::Vaultable,
            obstacle.impact_point,
            normal,
            height,
            obstacle.hit_body,
        )
    }

    fn filter(&self, state: &MovementState) -> QueryFilter {
        QueryFilter::new(self.config.channel).ignoring(state.body)
    }
}

/// The height clamped into `[min, max]`, or `None` when it falls outside.
#[inline]
fn within_band(value: f32, min: f32, max: f32) -> Option<f32> {
    (value >= min - HEIGHT_TOLERANCE && value <= max + HEIGHT_TOLERANCE).then(|| value.max(min).min(max))
}

// ============================================================================
// Tests
// ============================================================================
