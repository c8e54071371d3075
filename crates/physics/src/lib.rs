//! Parkour Physics
//!
//! Movement for a first-person parkour character: Quake-style walking and
//! falling, plus scripted ledge climbs and vaults driven by surface
//! detection.
//!
//! # Architecture
//!
//! - **Collision**: rays, shape sweeps and overlap tests against a world
//!   of parry3d shapes, behind the [`WorldQuery`] trait
//! - **Movement**: the base [`PlayerController`] and the shared
//!   [`MovementState`]
//! - **Parkour**: the [`SurfaceDetector`] that finds ledges and vaultable
//!   obstacles and the [`TraversalMover`] that carries the character over
//!   them
//! - **Curve** / **Debug**: keyframe curves that shape traversal motion,
//!   and an optional sink for visualizing every geometric probe
//!
//! Everything runs synchronously on the caller's thread, one tick at a
//! time. The same inputs always produce the same outputs.

pub mod collision;
pub mod curve;
pub mod debug;
pub mod math;
pub mod movement;
pub mod parkour;

// Re-export commonly used types
pub use collision::{BodyId, CollisionWorld, ContentFlags, QueryFilter, TraceResult, TraceShape, WorldQuery};
pub use curve::{FloatCurve, VectorCurve};
pub use debug::{DebugRecorder, DebugSink};
pub use movement::{
    CameraAccumulator, CommandButtons, CustomMode, MovementConfig, MovementMode, MovementState, PlayerCommand,
    PlayerController,
};
pub use parkour::{
    ParkourConfig, SurfaceAffordance, SurfaceDetector, SurfaceType, TraversalConfig, TraversalMover,
};
