//! Parkour Game Logic
//!
//! This crate hosts the parkour movement from `parkour-physics`:
//!
//! - Input handling (keys and mouse to physics commands)
//! - The [`ParkourCharacter`] and its jump-button policy
//! - First-person camera placement
//! - Courses with spawn points and goals
//! - A fixed-step [`Simulation`] and its JSON [`GameConfig`]
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation                            │
//! │  ┌─────────┐    ┌──────────────────────┐    ┌─────────────┐  │
//! │  │ Input   │───►│ ParkourCharacter     │───►│ Camera,     │  │
//! │  │         │    │ (detector + mover)   │    │ goals       │  │
//! │  └─────────┘    └──────────────────────┘    └─────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod camera;
pub mod character;
pub mod config;
pub mod course;
pub mod input;
pub mod simulation;

// Re-export main types
pub use camera::FirstPersonCamera;
pub use character::{JumpOutcome, ParkourCharacter};
pub use config::{ConfigError, GameConfig};
pub use course::{Course, GoalPoint, SpawnPoint};
pub use input::{ButtonLatch, PlayerInput};
pub use simulation::{Simulation, TickEvents};

// Re-export physics types for convenience
pub use parkour_physics::{
    CollisionWorld, ContentFlags, MovementConfig, MovementState, ParkourConfig, PlayerCommand, SurfaceType,
};
