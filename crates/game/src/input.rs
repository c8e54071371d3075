//! Player input handling.
//!
//! This module converts raw keyboard/mouse state into commands for the
//! physics system, and turns the held jump key into one-shot presses.

use parkour_physics::movement::{CommandButtons, PlayerCommand};
use serde::{Deserialize, Serialize};

/// Raw player input for a single tick.
///
/// It gets converted to [`PlayerCommand`] for the physics system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Mouse delta this tick (pixels).
    pub mouse_delta: (f32, f32),

    /// Action buttons held.
    pub actions: ActionInput,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ActionInput {
    /// Jump, climb or vault, depending on what is ahead.
    pub jump: bool,
    pub sprint: bool,
}

impl PlayerInput {
    /// Input that only holds forward.
    pub fn forward() -> Self {
        let mut input = Self::default();
        input.movement.forward = true;
        input
    }

    /// Builder-style: also hold jump.
    pub fn with_jump(mut self) -> Self {
        self.actions.jump = true;
        self
    }

    /// Builder-style: also hold sprint.
    pub fn with_sprint(mut self) -> Self {
        self.actions.sprint = true;
        self
    }

    /// Convert to a physics command.
    ///
    /// # Arguments
    ///
    /// * `mouse_sensitivity` - Mouse sensitivity multiplier
    pub fn to_command(&self, mouse_sensitivity: f32) -> PlayerCommand {
        let mut cmd = PlayerCommand::default();

        // Movement axes
        if self.movement.forward {
            cmd.forward_move += 1.0;
        }
        if self.movement.backward {
            cmd.forward_move -= 1.0;
        }
        if self.movement.right {
            cmd.right_move += 1.0;
        }
        if self.movement.left {
            cmd.right_move -= 1.0;
        }

        // Normalize diagonal movement
        let move_magnitude = (cmd.forward_move.powi(2) + cmd.right_move.powi(2)).sqrt();
        if move_magnitude > 1.0 {
            cmd.forward_move /= move_magnitude;
            cmd.right_move /= move_magnitude;
        }

        // Mouse pixels to radians; moving the mouse up looks up (negative pitch)
        let sensitivity_radians = mouse_sensitivity * 0.001;
        cmd.view_delta = (
            self.mouse_delta.1 * sensitivity_radians,
            self.mouse_delta.0 * sensitivity_radians,
        );

        if self.actions.jump {
            cmd.buttons.press(CommandButtons::JUMP);
        }
        if self.actions.sprint {
            cmd.buttons.press(CommandButtons::SPRINT);
        }

        cmd
    }
}

/// Edge detector for a held button.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonLatch {
    held: bool,
}

impl ButtonLatch {
    /// Feed the button's current state. Returns true only on the tick it
    /// goes down.
    pub fn press(&mut self, down: bool) -> bool {
        let fresh = down && !self.held;
        self.held = down;
        fresh
    }

    #[inline]
    pub fn is_held(&self) -> bool {
        self.held
    }
}
