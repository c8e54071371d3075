//! Vault: a curve-shaped hop over a low obstacle, ending in a launch.

use glam::Vec3;

use crate::collision::{BodyId, ContentFlags, QueryFilter, WorldQuery};
use crate::curve::VectorCurve;
use crate::debug::{DebugColor, DebugSink, NullSink};
use crate::movement::{safe_move, CustomMode, MovementMode, MovementState};

use super::mover::{horizontal, DeferredAction, TraversalMover, TraversalState};
use super::surface::{SurfaceAffordance, SurfaceType};

/// State of an active vault.
#[derive(Debug, Clone, PartialEq)]
pub struct VaultState {
    pub elapsed: f32,
    /// Feet position when the vault started.
    pub start: Vec3,
    /// Point past the obstacle face the vault aims for.
    pub target: Vec3,
    /// Horizontal vault direction; the curve's X axis.
    pub direction: Vec3,
    /// Obstacle height above the feet.
    pub height: f32,
    /// Forward speed carried through the vault.
    pub momentum: Vec3,
    pub velocity_at_start: Vec3,
    /// Path captured at the start so config edits can't change a vault mid-flight.
    pub curve: VectorCurve,
    /// The obstacle body, excluded from the scripted move.
    pub obstacle: Option<BodyId>,
}

impl VaultState {
    /// Right-hand axis of the vault path (the curve's Y axis).
    #[inline]
    pub fn right(&self) -> Vec3 {
        self.direction.cross(Vec3::Y)
    }

    /// Feet position along the path at normalized time `t`.
    pub fn position_at(&self, t: f32, forward_distance: f32, clearance: f32) -> Vec3 {
        let local = self.curve.evaluate(t);
        self.start
            + self.direction * (local.x * forward_distance)
            + self.right() * local.y
            + Vec3::Y * (local.z * self.height + clearance)
    }

    /// Velocity handed back to base locomotion when the vault completes.
    pub fn exit_velocity(&self, forward_distance: f32) -> Vec3 {
        self.direction * forward_distance + self.momentum + self.velocity_at_start
    }
}

impl TraversalMover {
    /// Start vaulting a detected obstacle.
    ///
    /// Does nothing without a configured vault curve, without a valid
    /// vaultable surface, or while another traversal is running.
    pub fn begin_vault(&mut self, state: &mut MovementState, surface: &SurfaceAffordance) {
        self.begin_vault_traced(state, surface, &mut NullSink);
    }

    pub fn begin_vault_traced<S: DebugSink + ?Sized>(
        &mut self,
        state: &mut MovementState,
        surface: &SurfaceAffordance,
        sink: &mut S,
    ) {
        let Some(curve) = self.config.vault_curve.clone() else {
            log::debug!("vault rejected: no vault curve configured");
            return;
        };
        if !self.can_begin(surface, "vault") {
            return;
        }
        if surface.surface_type != SurfaceType::Vaultable {
            log::debug!("vault rejected: surface is {:?}", surface.surface_type);
            return;
        }

        let config = &self.config;
        let direction = horizontal(surface.surface_forward, state.forward_direction());
        let target = surface.impact_point - surface.impact_normal * config.vault_forward_distance;
        let carried = state.velocity.dot(direction).clamp(0.0, config.max_vault_momentum_speed);

        let vault = VaultState {
            elapsed: 0.0,
            start: state.position,
            target,
            direction,
            height: surface.surface_height,
            momentum: direction * carried,
            velocity_at_start: state.velocity,
            curve,
            obstacle: surface.hit_entity,
        };

        if config.debug_draw {
            sink.sphere(target, 8.0, DebugColor::Green);
            let mut previous = vault.position_at(0.0, config.vault_forward_distance, config.vault_clearance);
            for i in 1..=8 {
                let t = i as f32 / 8.0;
                let next = vault.position_at(t, config.vault_forward_distance, config.vault_clearance);
                sink.line(previous, next, DebugColor::Blue);
                previous = next;
            }
        }

        log::debug!(
            "vault started: obstacle height {:.1}, direction {:?}, carried speed {:.1}",
            vault.height,
            vault.direction,
            carried
        );

        self.discard_deferred("vault");
        self.traversal = TraversalState::Vaulting(vault);
        state.mode = MovementMode::Custom(CustomMode::Vault);
        state.collision_enabled = false;
    }

    pub(super) fn vault_step<W, S>(&mut self, state: &mut MovementState, world: &W, delta_time: f32, sink: &mut S)
    where
        W: WorldQuery + ?Sized,
        S: DebugSink + ?Sized,
    {
        let TraversalState::Vaulting(vault) = &mut self.traversal else {
            self.abandon(state);
            return;
        };
        let config = &self.config;

        vault.elapsed += delta_time;
        let t = if config.vault_time > 0.0 {
            (vault.elapsed / config.vault_time).clamp(0.0, 1.0)
        } else {
            1.0
        };

        if t < 1.0 {
            state.collision_enabled = false;
        }

        let desired = vault.position_at(t, config.vault_forward_distance, config.vault_clearance);
        let filter = Self::traversal_filter(state, vault.obstacle);
        let delta = desired - state.position;
        if let Some(hit) = safe_move(world, &filter, &mut state.position, delta, self.controller.shape()) {
            log::trace!("vault blocked at t={:.2} by {:?}", t, hit.hit_body);
        }
        if config.debug_draw {
            sink.point(state.position, DebugColor::Cyan);
        }

        self.camera_tilt = config
            .vault_tilt_curve
            .as_ref()
            .map_or(0.0, |curve| curve.evaluate(t) * config.max_camera_tilt());

        if t < 1.0 {
            return;
        }

        // Collision comes back on now; don't leave the capsule inside the obstacle
        let shape = self.controller.shape();
        let solid = QueryFilter::new(ContentFlags::MASK_PLAYER_SOLID).ignoring(state.body);
        if world.overlaps(state.position, shape, &solid) {
            let ahead = state.position + vault.direction * config.vault_exit_search;
            let back = world.sweep(ahead, state.position, shape, &solid);
            if back.started_in_solid {
                log::debug!("vault ended inside geometry at {:?}", state.position);
            } else {
                log::trace!("vault exit moved clear to {:?}", back.end_position);
                state.position = back.end_position;
            }
        }

        let launch = vault.exit_velocity(config.vault_forward_distance);
        self.deferred.push_back(DeferredAction::Launch(launch));
        self.finish(state);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, TraceShape};
    use crate::debug::DebugRecorder;
    use crate::movement::PlayerCommand;
    use crate::parkour::SurfaceDetector;

    const DT: f32 = 1.0 / 60.0;

    /// Floor plus a 60 unit rail whose face is at x=100.
    fn rail_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -50.0, 0.0),
            Vec3::new(5000.0, 50.0, 5000.0),
            ContentFlags::SOLID,
        );
        world.add_block(Vec3::new(120.0, 0.0, 0.0), 20.0, 300.0, 60.0, ContentFlags::SOLID);
        world
    }

    fn runner(speed: f32) -> MovementState {
        let mut state = MovementState::facing(Vec3::ZERO, 0.0);
        state.mode = MovementMode::Walking;
        state.velocity = Vec3::new(speed, 0.0, 0.0);
        state
    }

    fn detect(state: &MovementState, world: &CollisionWorld) -> SurfaceAffordance {
        let surface = SurfaceDetector::default().detect_vault(state, world);
        assert!(surface.is(SurfaceType::Vaultable), "rail should be vaultable");
        surface
    }

    #[test]
    fn test_begin_vault_captures_state() {
        let world = rail_world();
        let mut mover = TraversalMover::default();
        let mut state = runner(400.0);
        let surface = detect(&state, &world);

        mover.begin_vault(&mut state, &surface);

        assert_eq!(state.mode, MovementMode::Custom(CustomMode::Vault));
        assert!(!state.collision_enabled);
        let TraversalState::Vaulting(vault) = mover.traversal() else {
            panic!("expected an active vault");
        };
        assert_eq!(vault.start, Vec3::ZERO);
        assert!((vault.direction - Vec3::X).length() < 1e-5);
        assert!((vault.height - 60.0).abs() < 0.1);
        assert!((vault.momentum - Vec3::new(400.0, 0.0, 0.0)).length() < 0.01);
        assert_eq!(vault.velocity_at_start, Vec3::new(400.0, 0.0, 0.0));
        assert!((vault.target - Vec3::new(200.0, 30.0, 0.0)).length() < 0.1, "target={:?}", vault.target);
        assert_eq!(vault.elapsed, 0.0);
    }

    #[test]
    fn test_momentum_is_clamped() {
        let world = rail_world();
        let mut mover = TraversalMover::default();
        let mut state = runner(2000.0);
        let surface = detect(&state, &world);

        mover.begin_vault(&mut state, &surface);

        let TraversalState::Vaulting(vault) = mover.traversal() else {
            panic!("expected an active vault");
        };
        assert!((vault.momentum.length() - mover.config.max_vault_momentum_speed).abs() < 0.01);
    }

    #[test]
    fn test_vault_follows_curve_path() {
        // Thin rail, close enough that the path ends clear of it
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -50.0, 0.0),
            Vec3::new(5000.0, 50.0, 5000.0),
            ContentFlags::SOLID,
        );
        world.add_block(Vec3::new(105.0, 0.0, 0.0), 5.0, 300.0, 60.0, ContentFlags::SOLID);

        let mut mover = TraversalMover::default();
        let mut state = runner(0.0);
        state.position = Vec3::new(60.0, 0.0, 0.0);
        let start = state.position;
        let surface = detect(&state, &world);
        mover.begin_vault(&mut state, &surface);

        let config = mover.config.clone();
        let curve = config.vault_curve.clone().unwrap();
        let right = Vec3::X.cross(Vec3::Y);
        let command = PlayerCommand::default();
        let mut elapsed = 0.0;

        while mover.is_traversing() {
            mover.step(&mut state, &command, &world, DT);
            elapsed += DT;

            let t = (elapsed / config.vault_time).clamp(0.0, 1.0);
            let local = curve.evaluate(t);
            let expected = start
                + Vec3::X * (local.x * config.vault_forward_distance)
                + right * local.y
                + Vec3::Y * (local.z * 60.0 + 50.0);
            assert!(
                (state.position - expected).length() < 0.5,
                "t={} expected {:?} got {:?}",
                t,
                expected,
                state.position
            );
        }

        assert_eq!(state.mode, MovementMode::Walking);
        assert!(state.collision_enabled);
    }

    #[test]
    fn test_launch_applied_once_one_tick_after_exit() {
        let world = rail_world();
        let mut mover = TraversalMover::default();
        let mut state = runner(300.0);
        let surface = detect(&state, &world);
        mover.begin_vault(&mut state, &surface);

        let command = PlayerCommand::default();
        while mover.is_traversing() {
            assert_eq!(mover.pending_actions().count(), 0);
            mover.step(&mut state, &command, &world, DT);
        }

        // Vault ended this tick: launch queued, not yet applied
        let expected = Vec3::X * 100.0 + Vec3::X * 300.0 + Vec3::X * 300.0;
        let pending: Vec<DeferredAction> = mover.pending_actions().copied().collect();
        assert_eq!(pending.len(), 1);
        let DeferredAction::Launch(launch) = pending[0];
        assert!((launch - expected).length() < 0.01, "launch={:?}", launch);
        assert_eq!(state.velocity, Vec3::new(300.0, 0.0, 0.0), "velocity untouched until next tick");
        assert_eq!(state.mode, MovementMode::Walking);

        mover.step(&mut state, &command, &world, DT);
        assert_eq!(mover.pending_actions().count(), 0);
        assert!((state.velocity.x - expected.x).abs() < 0.01, "vx={}", state.velocity.x);
        assert!(!state.on_ground(), "launch goes airborne");

        // Never re-applied
        let vx = state.velocity.x;
        mover.step(&mut state, &command, &world, DT);
        assert!((state.velocity.x - vx).abs() < 0.01);
    }

    #[test]
    fn test_vault_exit_moves_clear_of_obstacle() {
        let world = rail_world();
        let mut mover = TraversalMover::default();
        let mut state = runner(0.0);
        let surface = detect(&state, &world);
        mover.begin_vault(&mut state, &surface);

        let command = PlayerCommand::default();
        while mover.is_traversing() {
            mover.step(&mut state, &command, &world, DT);
        }

        // The path ends at x=100, inside the rail; the exit slides forward past it
        let solid = QueryFilter::new(ContentFlags::MASK_PLAYER_SOLID);
        assert!(!world.overlaps(state.position, TraceShape::CHARACTER_STANDING, &solid));
        assert!(state.position.x >= 179.0 && state.position.x < 221.0, "x={}", state.position.x);
    }

    #[test]
    fn test_begin_vault_without_curve_is_no_op() {
        let world = rail_world();
        let mut mover = TraversalMover::default();
        mover.config.vault_curve = None;
        let mut state = runner(300.0);
        let surface = detect(&state, &world);

        mover.begin_vault(&mut state, &surface);

        assert!(!mover.is_traversing());
        assert_eq!(mover.pending_actions().count(), 0);
        assert_eq!(state.mode, MovementMode::Walking);
        assert!(state.collision_enabled);
        assert_eq!(state.velocity, Vec3::new(300.0, 0.0, 0.0));
    }

    #[test]
    fn test_begin_vault_rejects_ledge_and_active_traversal() {
        let world = rail_world();
        let mut mover = TraversalMover::default();
        let mut state = runner(0.0);

        let ledge = SurfaceAffordance::found(SurfaceType::Ledge, Vec3::new(120.0, 80.0, 0.0), Vec3::NEG_X, 80.0, None);
        mover.begin_vault(&mut state, &ledge);
        assert!(!mover.is_traversing());

        let surface = detect(&state, &world);
        mover.begin_vault(&mut state, &surface);
        let TraversalState::Vaulting(first) = mover.traversal().clone() else {
            panic!("expected an active vault");
        };

        state.velocity = Vec3::new(999.0, 0.0, 0.0);
        mover.begin_vault(&mut state, &surface);
        mover.begin_climb(&mut state, &ledge);
        let TraversalState::Vaulting(still) = mover.traversal() else {
            panic!("vault should still be running");
        };
        assert_eq!(&first, still);
    }

    #[test]
    fn test_camera_tilt_rises_during_vault_and_decays_after() {
        let world = rail_world();
        let mut mover = TraversalMover::default();
        let mut state = runner(0.0);
        let surface = detect(&state, &world);
        mover.begin_vault(&mut state, &surface);

        let command = PlayerCommand::default();
        let mut peak: f32 = 0.0;
        while mover.is_traversing() {
            mover.step(&mut state, &command, &world, DT);
            let roll = state.camera.drain().z;
            assert!((roll - mover.camera_tilt()).abs() < 1e-6);
            peak = peak.max(roll);
        }
        let max_tilt = mover.config.max_camera_tilt();
        assert!(peak > 0.9 * max_tilt && peak <= max_tilt + 1e-5, "peak={}", peak);

        mover.camera_tilt = 0.1;
        mover.step(&mut state, &command, &world, DT);
        let decayed = state.camera.drain().z;
        assert!(decayed < 0.1 && decayed > 0.0, "tilt should decay smoothly, got {}", decayed);
    }

    #[test]
    fn test_debug_draw_traces_vault_path() {
        let world = rail_world();
        let mut mover = TraversalMover::default();
        mover.config.debug_draw = true;
        let mut state = runner(0.0);
        let surface = detect(&state, &world);

        let mut recorder = DebugRecorder::new();
        mover.begin_vault_traced(&mut state, &surface, &mut recorder);
        assert_eq!(recorder.len(), 9);
    }
}
