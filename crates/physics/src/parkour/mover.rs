//! Traversal mover: owns the active climb or vault and dispatches each
//! movement tick on the character's mode.

use std::collections::VecDeque;

use glam::Vec3;

use crate::collision::{BodyId, ContentFlags, QueryFilter, WorldQuery};
use crate::debug::{DebugSink, NullSink};
use crate::math::interp_to;
use crate::movement::{CustomMode, MovementMode, MovementState, PlayerCommand, PlayerController};

use super::climb::ClimbState;
use super::config::TraversalConfig;
use super::surface::SurfaceAffordance;
use super::vault::VaultState;

/// Which traversal is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalKind {
    None,
    Climbing,
    Vaulting,
}

/// The single active traversal, if any.
#[derive(Debug, Clone, Default)]
pub enum TraversalState {
    #[default]
    Idle,
    Climbing(ClimbState),
    Vaulting(VaultState),
}

impl TraversalState {
    pub fn kind(&self) -> TraversalKind {
        match self {
            Self::Idle => TraversalKind::None,
            Self::Climbing(_) => TraversalKind::Climbing,
            Self::Vaulting(_) => TraversalKind::Vaulting,
        }
    }
}

/// Work queued for the first tick after a traversal hands the character back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeferredAction {
    /// Set this velocity and go airborne.
    Launch(Vec3),
}

/// Drives scripted traversals and hands back to the base controller.
///
/// The character's [`MovementMode`] selects who owns each tick: walking
/// and falling go to the [`PlayerController`], custom modes to the active
/// traversal.
#[derive(Debug, Clone)]
pub struct TraversalMover {
    pub config: TraversalConfig,
    pub controller: PlayerController,
    pub(super) traversal: TraversalState,
    pub(super) deferred: VecDeque<DeferredAction>,
    pub(super) camera_tilt: f32,
}

impl Default for TraversalMover {
    fn default() -> Self {
        Self::new(TraversalConfig::default(), PlayerController::default())
    }
}

impl TraversalMover {
    pub fn new(config: TraversalConfig, controller: PlayerController) -> Self {
        Self {
            config,
            controller,
            traversal: TraversalState::Idle,
            deferred: VecDeque::new(),
            camera_tilt: 0.0,
        }
    }

    #[inline]
    pub fn is_traversing(&self) -> bool {
        !matches!(self.traversal, TraversalState::Idle)
    }

    #[inline]
    pub fn traversal(&self) -> &TraversalState {
        &self.traversal
    }

    /// Current camera roll contribution (radians).
    #[inline]
    pub fn camera_tilt(&self) -> f32 {
        self.camera_tilt
    }

    /// Actions waiting for the next step outside a traversal.
    pub fn pending_actions(&self) -> impl Iterator<Item = &DeferredAction> {
        self.deferred.iter()
    }

    /// Advance the character by one tick.
    pub fn step<W: WorldQuery + ?Sized>(
        &mut self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &W,
        delta_time: f32,
    ) {
        self.step_traced(state, command, world, delta_time, &mut NullSink);
    }

    /// [`step`](Self::step), reporting traversal paths to `sink` when
    /// `debug_draw` is enabled.
    pub fn step_traced<W, S>(
        &mut self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &W,
        delta_time: f32,
        sink: &mut S,
    ) where
        W: WorldQuery + ?Sized,
        S: DebugSink + ?Sized,
    {
        let delta_time = delta_time.max(0.0);

        if !self.is_traversing() {
            self.apply_deferred(state);
        }

        let was_vaulting = matches!(self.traversal, TraversalState::Vaulting(_));

        match state.mode {
            MovementMode::Custom(CustomMode::Climb) => self.climb_step(state, world, delta_time, sink),
            MovementMode::Custom(CustomMode::Vault) => self.vault_step(state, world, delta_time, sink),
            MovementMode::Custom(CustomMode::WallRun) => {}
            MovementMode::Walking | MovementMode::Falling => {
                self.controller.update(state, command, world, delta_time)
            }
        }

        if !was_vaulting {
            self.camera_tilt = interp_to(self.camera_tilt, 0.0, delta_time, self.config.camera_tilt_interp_speed);
        }
        state.camera.add_roll(self.camera_tilt);
    }

    // ========================================================================
    // Shared helpers
    // ========================================================================

    /// Whether a new traversal may start. Rejections are logged.
    pub(super) fn can_begin(&self, surface: &SurfaceAffordance, what: &str) -> bool {
        if self.is_traversing() {
            log::debug!(
                "{} rejected: {:?} already in progress",
                what,
                self.traversal.kind()
            );
            return false;
        }
        if !surface.is_valid {
            log::debug!("{} rejected: no valid surface", what);
            return false;
        }
        true
    }

    /// Filter for scripted moves: skips the character and the traversed body.
    pub(super) fn traversal_filter(state: &MovementState, traversed: Option<BodyId>) -> QueryFilter {
        QueryFilter::new(ContentFlags::MASK_PLAYER_SOLID)
            .ignoring(state.body)
            .ignoring(traversed)
    }

    /// Tear down the active traversal and give the character back to walking.
    pub(super) fn finish(&mut self, state: &mut MovementState) {
        log::debug!(
            "{:?} finished at {:?}",
            self.traversal.kind(),
            state.position
        );
        self.traversal = TraversalState::Idle;
        state.mode = MovementMode::Walking;
        state.collision_enabled = true;
    }

    /// Recover from a custom mode with no matching traversal.
    pub(super) fn abandon(&mut self, state: &mut MovementState) {
        log::debug!("{:?} without an active traversal, returning to walking", state.mode);
        self.traversal = TraversalState::Idle;
        state.mode = MovementMode::Walking;
        state.collision_enabled = true;
    }

    /// Drop queued actions when a new traversal takes over the character.
    pub(super) fn discard_deferred(&mut self, what: &str) {
        if !self.deferred.is_empty() {
            log::debug!("{} started, dropping {} pending action(s)", what, self.deferred.len());
            self.deferred.clear();
        }
    }

    fn apply_deferred(&mut self, state: &mut MovementState) {
        while let Some(action) = self.deferred.pop_front() {
            match action {
                DeferredAction::Launch(velocity) => self.controller.launch(state, velocity),
            }
        }
    }
}

/// Flatten a direction onto the ground plane, falling back when it is vertical.
pub(super) fn horizontal(direction: Vec3, fallback: Vec3) -> Vec3 {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    flat.try_normalize().unwrap_or(fallback)
}

// ============================================================================
// Tests
// ============================================================================
