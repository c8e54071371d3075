//! The parkour character: movement state plus the systems that drive it.

use glam::Vec3;
use parkour_physics::debug::NullSink;
use parkour_physics::parkour::TraversalKind;
use parkour_physics::{
    CommandButtons, DebugSink, MovementConfig, MovementState, ParkourConfig, PlayerCommand, PlayerController,
    SurfaceDetector, SurfaceType, TraversalMover, WorldQuery,
};

use crate::input::ButtonLatch;

/// What a jump press turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Started climbing a ledge.
    Climb,
    /// Started vaulting an obstacle.
    Vault,
    /// Plain jump.
    Jump,
    /// Nothing happened (mid-traversal, airborne or on cooldown).
    Ignored,
}

/// A player-controlled parkour character.
#[derive(Debug, Clone)]
pub struct ParkourCharacter {
    /// Player name/handle.
    pub name: String,

    /// Movement physics state.
    pub movement: MovementState,

    /// Finds ledges and vaultable obstacles ahead.
    pub detector: SurfaceDetector,

    /// Runs climbs and vaults, and base locomotion in between.
    pub mover: TraversalMover,

    jump_latch: ButtonLatch,
}

impl ParkourCharacter {
    /// Create a character at the origin.
    pub fn new(name: &str, movement: MovementConfig, parkour: &ParkourConfig) -> Self {
        Self {
            name: name.to_string(),
            movement: MovementState::default(),
            detector: SurfaceDetector::new(parkour.detector.clone()),
            mover: TraversalMover::new(parkour.traversal.clone(), PlayerController::new(movement)),
            jump_latch: ButtonLatch::default(),
        }
    }

    /// Place the character at a spawn point, dropping any running traversal.
    pub fn spawn<W: WorldQuery + ?Sized>(&mut self, position: Vec3, facing: f32, world: &W) {
        if self.mover.is_traversing() {
            log::debug!("{}: respawn cancels {:?}", self.name, self.traversal_kind());
        }
        self.mover = TraversalMover::new(self.mover.config.clone(), self.mover.controller.clone());

        let body = self.movement.body;
        self.movement = MovementState::facing(position, facing);
        self.movement.body = body;
        self.mover.controller.spawn_at(&mut self.movement, position, world);
        self.jump_latch = ButtonLatch::default();
    }

    /// Get the character's current position (feet).
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.movement.position
    }

    /// Get the eye position (for camera).
    pub fn eye_position(&self) -> Vec3 {
        self.movement.eye_position(self.eye_height())
    }

    #[inline]
    pub fn eye_height(&self) -> f32 {
        self.mover.controller.config.eye_height
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.movement.on_ground()
    }

    #[inline]
    pub fn is_traversing(&self) -> bool {
        self.mover.is_traversing()
    }

    #[inline]
    pub fn traversal_kind(&self) -> TraversalKind {
        self.mover.traversal().kind()
    }

    /// Jump button policy: climb a ledge if there is one, else vault an
    /// obstacle, else jump normally.
    pub fn jump<W: WorldQuery + ?Sized>(&mut self, world: &W) -> JumpOutcome {
        self.jump_traced(world, &mut NullSink)
    }

    /// [`jump`](Self::jump), passing `sink` to detection and traversal start.
    pub fn jump_traced<W, S>(&mut self, world: &W, sink: &mut S) -> JumpOutcome
    where
        W: WorldQuery + ?Sized,
        S: DebugSink + ?Sized,
    {
        if self.mover.is_traversing() || self.movement.mode.is_custom() {
            return JumpOutcome::Ignored;
        }

        let ledge = self.detector.detect_ledge_traced(&self.movement, world, sink);
        if ledge.is(SurfaceType::Ledge) {
            self.mover.begin_climb_traced(&mut self.movement, &ledge, sink);
            if self.mover.is_traversing() {
                return JumpOutcome::Climb;
            }
        }

        let vault = self.detector.detect_vault_traced(&self.movement, world, sink);
        if vault.is(SurfaceType::Vaultable) {
            self.mover.begin_vault_traced(&mut self.movement, &vault, sink);
            if self.mover.is_traversing() {
                return JumpOutcome::Vault;
            }
        }

        if self.mover.controller.jump(&mut self.movement) {
            JumpOutcome::Jump
        } else {
            JumpOutcome::Ignored
        }
    }

    /// Advance one tick.
    ///
    /// A fresh jump press runs the jump policy first. The jump button is
    /// then consumed, so holding it never re-jumps on landing.
    ///
    /// Returns the outcome when this tick had a jump press.
    pub fn tick<W: WorldQuery + ?Sized>(
        &mut self,
        command: &PlayerCommand,
        world: &W,
        delta_time: f32,
    ) -> Option<JumpOutcome> {
        self.tick_traced(command, world, delta_time, &mut NullSink)
    }

    pub fn tick_traced<W, S>(
        &mut self,
        command: &PlayerCommand,
        world: &W,
        delta_time: f32,
        sink: &mut S,
    ) -> Option<JumpOutcome>
    where
        W: WorldQuery + ?Sized,
        S: DebugSink + ?Sized,
    {
        let outcome = if self.jump_latch.press(command.wants_jump()) {
            let outcome = self.jump_traced(world, sink);
            log::debug!("{}: jump pressed -> {:?}", self.name, outcome);
            Some(outcome)
        } else {
            None
        };

        let mut command = command.clone();
        command.buttons.release(CommandButtons::JUMP);
        self.mover
            .step_traced(&mut self.movement, &command, world, delta_time, sink);

        outcome
    }
}

// ============================================================================
// Tests
// ============================================================================
