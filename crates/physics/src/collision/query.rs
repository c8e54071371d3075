//! World-query capability consumed by the parkour systems.

use glam::Vec3;

use super::trace::{BodyId, QueryFilter, TraceResult, TraceShape};

/// Read-only collision queries against a world snapshot.
///
/// The surface detector and the traversal mover only ever see the world
/// through this trait, so hosts can back it with something other than
/// [`CollisionWorld`](super::CollisionWorld).
pub trait WorldQuery {
    /// Cast a ray and report the closest hit within `max_distance`.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, filter: &QueryFilter) -> TraceResult;

    /// Sweep a shape (placed by its bottom-centre) from `start` to `end`.
    fn sweep(&self, start: Vec3, end: Vec3, shape: TraceShape, filter: &QueryFilter) -> TraceResult;

    /// Check whether a shape at `position` overlaps any visible body.
    fn overlaps(&self, position: Vec3, shape: TraceShape, filter: &QueryFilter) -> bool;

    /// World-space bounds `(min, max)` of a body.
    fn body_bounds(&self, body: BodyId) -> Option<(Vec3, Vec3)>;

    /// Cast a ray between two points.
    fn line_trace(&self, start: Vec3, end: Vec3, filter: &QueryFilter) -> TraceResult {
        let delta = end - start;
        let length = delta.length();
        if length < 0.0001 {
            return TraceResult::no_hit(start);
        }
        self.raycast(start, delta / length, length, filter)
    }
}
