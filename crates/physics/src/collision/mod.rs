//! Collision queries for character movement and parkour detection.
//!
//! # Key Types
//!
//! - [`CollisionWorld`]: The collision environment containing all geometry
//! - [`WorldQuery`]: The query interface the movement code depends on
//! - [`TraceResult`]: Output from a ray or shape query
//! - [`QueryFilter`]: Channel mask plus excluded bodies
//!
//! Shape sweeps binary-search overlap tests along the path and report
//! how far the shape traveled, the surface normal at impact and which
//! body was hit.

mod flags;
mod query;
mod trace;
mod world;

pub use flags::ContentFlags;
pub use query::WorldQuery;
pub use trace::{BodyId, QueryFilter, TraceResult, TraceShape};
pub use world::{CollisionBody, CollisionWorld};
