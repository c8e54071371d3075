//! Ledge climbing and vaulting.
//!
//! Two pieces, detector feeding the mover:
//!
//! - [`SurfaceDetector`] probes the world in front of the character and
//!   reports a [`SurfaceAffordance`] (a ledge to climb or an obstacle to
//!   vault), or an invalid result.
//! - [`TraversalMover`] takes a valid affordance, switches the character
//!   into a custom movement mode and drives it through the maneuver, then
//!   hands back to walking. It only depends on the affordance type, never
//!   on the detector.
//!
//! Only one traversal runs at a time; starting another while one is
//! active is rejected.

mod climb;
mod config;
mod detector;
mod mover;
mod surface;
mod vault;

pub use climb::{ClimbPhase, ClimbState};
pub use config::{DetectorConfig, ParkourConfig, TraversalConfig};
pub use detector::SurfaceDetector;
pub use mover::{DeferredAction, TraversalKind, TraversalMover, TraversalState};
pub use surface::{SurfaceAffordance, SurfaceType};
pub use vault::VaultState;
