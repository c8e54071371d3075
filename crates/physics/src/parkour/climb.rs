//! Ledge climb: three timed phases moving the capsule centre through
//! grab and over-the-ledge waypoints.

use glam::Vec3;

use crate::collision::{BodyId, WorldQuery};
use crate::debug::{DebugColor, DebugSink, NullSink};
use crate::math::{interp_angle_to, lerp, yaw_from_direction};
use crate::movement::{safe_move, CustomMode, MovementMode, MovementState};

use super::config::TraversalConfig;
use super::mover::{horizontal, TraversalMover, TraversalState};
use super::surface::{SurfaceAffordance, SurfaceType};

/// Climb phases, visited strictly in order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClimbPhase {
    #[default]
    None,
    /// Move in and down to the grab point while turning to face the wall.
    Approach,
    /// Haul straight up to the height of the over-the-ledge point.
    Grab,
    /// Move forward onto the ledge.
    PullUp,
}

impl ClimbPhase {
    /// The phase after this one, or `None` once the climb is over.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::None => Some(Self::Approach),
            Self::Approach => Some(Self::Grab),
            Self::Grab => Some(Self::PullUp),
            Self::PullUp => None,
        }
    }

    pub fn duration(self, config: &TraversalConfig) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Approach => config.approach_time,
            Self::Grab => config.grab_time,
            Self::PullUp => config.pull_up_time,
        }
    }
}

/// State of an active climb. Waypoints are capsule-centre positions.
#[derive(Debug, Clone, PartialEq)]
pub struct ClimbState {
    pub phase: ClimbPhase,
    /// Time spent in the current phase; reset on every phase change.
    pub elapsed: f32,
    pub start: Vec3,
    /// Grab point below and behind the ledge top.
    pub mid: Vec3,
    /// Point above and past the ledge top.
    pub target: Vec3,
    /// View angles to turn toward during the approach (zero pitch and roll).
    pub facing: Vec3,
    /// Pitch at the start of the grab phase.
    pub grab_start_pitch: f32,
    /// The ledge body, excluded from the scripted move.
    pub ledge: Option<BodyId>,
}

impl ClimbState {
    /// The waypoint pair the current phase interpolates between.
    pub fn segment(&self) -> (Vec3, Vec3) {
        let hang = Vec3::new(self.mid.x, self.target.y, self.mid.z);
        match self.phase {
            ClimbPhase::None | ClimbPhase::Approach => (self.start, self.mid),
            ClimbPhase::Grab => (self.mid, hang),
            ClimbPhase::PullUp => (hang, self.target),
        }
    }
}

impl TraversalMover {
    /// Start climbing a detected ledge.
    ///
    /// Does nothing unless `surface` is a valid ledge and no other
    /// traversal is running; check [`is_traversing`](Self::is_traversing)
    /// afterwards to fall back to something else.
    pub fn begin_climb(&mut self, state: &mut MovementState, surface: &SurfaceAffordance) {
        self.begin_climb_traced(state, surface, &mut NullSink);
    }

    pub fn begin_climb_traced<S: DebugSink + ?Sized>(
        &mut self,
        state: &mut MovementState,
        surface: &SurfaceAffordance,
        sink: &mut S,
    ) {
        if !self.can_begin(surface, "climb") {
            return;
        }
        if surface.surface_type != SurfaceType::Ledge {
            log::debug!("climb rejected: surface is {:?}", surface.surface_type);
            return;
        }

        let config = &self.config;
        let forward = horizontal(surface.surface_forward, state.forward_direction());
        let centre = Vec3::Y * config.capsule_half_height;

        let start = state.position + centre;
        let mid = surface.impact_point - forward * config.grab_inset - Vec3::Y * config.grab_drop;
        let target = surface.impact_point + forward * config.over_forward + Vec3::Y * config.over_rise;

        if config.debug_draw {
            sink.sphere(start, 8.0, DebugColor::White);
            sink.sphere(mid, 8.0, DebugColor::Orange);
            sink.sphere(target, 8.0, DebugColor::Green);
            sink.line(start, mid, DebugColor::Blue);
            sink.line(mid, target, DebugColor::Blue);
        }

        log::debug!(
            "climb started: ledge height {:.1}, start {:?}, target {:?}",
            surface.surface_height,
            start,
            target
        );

        self.discard_deferred("climb");
        self.traversal = TraversalState::Climbing(ClimbState {
            phase: ClimbPhase::Approach,
            elapsed: 0.0,
            start,
            mid,
            target,
            facing: Vec3::new(0.0, yaw_from_direction(forward), 0.0),
            grab_start_pitch: state.view_angles.x,
            ledge: surface.hit_entity,
        });
        state.mode = MovementMode::Custom(CustomMode::Climb);
        state.collision_enabled = false;
        state.velocity = Vec3::ZERO;
    }

    pub(super) fn climb_step<W, S>(&mut self, state: &mut MovementState, world: &W, delta_time: f32, sink: &mut S)
    where
        W: WorldQuery + ?Sized,
        S: DebugSink + ?Sized,
    {
        let TraversalState::Climbing(climb) = &mut self.traversal else {
            self.abandon(state);
            return;
        };
        let config = &self.config;

        let duration = climb.phase.duration(config);
        climb.elapsed = (climb.elapsed + delta_time).min(duration.max(0.0));
        let alpha = if duration > 0.0 {
            (climb.elapsed / duration).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let eased = config.ease_climb(alpha);

        // Camera first, then the move
        match climb.phase {
            ClimbPhase::Approach => {
                let speed = config.climb_facing_interp_speed;
                state.view_angles.y = interp_angle_to(state.view_angles.y, climb.facing.y, delta_time, speed);
                state.view_angles.x = interp_angle_to(state.view_angles.x, climb.facing.x, delta_time, speed);
            }
            ClimbPhase::Grab => {
                state.view_angles.x = lerp(climb.grab_start_pitch, config.climb_grab_pitch(), eased);
            }
            ClimbPhase::None | ClimbPhase::PullUp => {}
        }

        let (from, to) = climb.segment();
        let centre = from.lerp(to, eased);
        let feet = centre - Vec3::Y * config.capsule_half_height;

        let filter = Self::traversal_filter(state, climb.ledge);
        let delta = feet - state.position;
        let blocked = safe_move(world, &filter, &mut state.position, delta, self.controller.shape());
        if let Some(hit) = &blocked {
            log::trace!("climb {:?} blocked by {:?}", climb.phase, hit.hit_body);
        }
        if config.debug_draw {
            sink.point(state.position + Vec3::Y * config.capsule_half_height, DebugColor::Cyan);
        }

        if alpha < 1.0 {
            return;
        }

        match climb.phase.next() {
            Some(next) => {
                log::trace!("climb {:?} -> {:?}", climb.phase, next);
                climb.phase = next;
                climb.elapsed = 0.0;
                if next == ClimbPhase::Grab {
                    climb.grab_start_pitch = state.view_angles.x;
                }
            }
            None => self.finish(state),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
