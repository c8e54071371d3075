//! Player movement physics system.
//!
//! Quake-style FPS movement with:
//!
//! - Ground and air movement with different physics
//! - Friction and acceleration models
//! - Jumping and sprinting
//! - Multi-plane collision sliding
//! - Stair stepping
//!
//! # Design
//!
//! Movement is controlled by the [`PlayerController`] which takes input
//! commands and updates the character's [`MovementState`] through a
//! [`WorldQuery`](crate::collision::WorldQuery). The state's
//! [`MovementMode`] decides who owns a tick: walking and falling belong to
//! the controller, custom modes to the parkour mover.

mod config;
mod controller;
mod slide_move;
mod state;

pub use config::MovementConfig;
pub use controller::PlayerController;
pub use slide_move::{clip_velocity, safe_move, slide_move, step_slide_move};
pub use state::{CameraAccumulator, CommandButtons, CustomMode, MovementMode, MovementState, PlayerCommand};
