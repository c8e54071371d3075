//! Collision world containing all static geometry.
//!
//! The collision world stores every collidable body and answers ray,
//! sweep and overlap queries against it.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{self, Ray, RayCast, ShapeCastOptions};
use parry3d::shape::SharedShape;

use super::flags::ContentFlags;
use super::query::WorldQuery;
use super::trace::{BodyId, QueryFilter, TraceResult, TraceShape};

/// Query shapes are shrunk by this much, so shapes resting in contact are
/// touching rather than overlapping.
const TOUCH_EPSILON: f32 = 0.03;

/// Gap a sweep leaves between the shrunk shape and the surface it stopped on.
const SWEEP_GAP: f32 = 2.0 * TOUCH_EPSILON;

/// Floor on the approach cosine used to turn `SWEEP_GAP` into a back-off
/// along the path, so grazing hits don't pull the shape far back.
const MIN_APPROACH: f32 = 0.05;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBody {
    /// Unique identifier for this body.
    pub id: BodyId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags (solid, traversable, trigger, etc.).
    pub contents: ContentFlags,
}

impl CollisionBody {
    fn intersects(&self, transform: &Isometry<Real>, shape: &SharedShape) -> bool {
        matches!(
            query::intersection_test(transform, shape.as_ref(), &self.transform, self.shape.as_ref()),
            Ok(true)
        )
    }
}

/// The collision world containing all geometry.
///
/// Supports axis-aligned boxes and convex hulls. The world is immutable
/// during a tick: detection queries and the mover's collision-aware moves
/// all read the same snapshot.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    bodies: Vec<CollisionBody>,
    next_id: BodyId,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> BodyId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push_body(shape, transform, contents)
    }

    /// Add a box resting on a floor at `floor_y`, with its top at `floor_y + height`.
    pub fn add_block(
        &mut self,
        footprint_center: Vec3,
        half_width: f32,
        half_depth: f32,
        height: f32,
        contents: ContentFlags,
    ) -> BodyId {
        let center = Vec3::new(
            footprint_center.x,
            footprint_center.y + height * 0.5,
            footprint_center.z,
        );
        self.add_box(center, Vec3::new(half_width, height * 0.5, half_depth), contents)
    }

    /// Add a convex hull to the world.
    ///
    /// Returns the body ID, or `None` if the hull couldn't be computed.
    pub fn add_convex_hull(&mut self, points: &[Vec3], contents: ContentFlags) -> Option<BodyId> {
        let parry_points: Vec<Point<Real>> = points
            .iter()
            .map(|p| Point::new(p.x, p.y, p.z))
            .collect();

        let shape = SharedShape::convex_hull(&parry_points)?;
        Some(self.push_body(shape, Isometry::identity(), contents))
    }

    /// Get the number of collision bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Look up a body by id.
    pub fn body(&self, id: BodyId) -> Option<&CollisionBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push_body(&mut self, shape: SharedShape, transform: Isometry<Real>, contents: ContentFlags) -> BodyId {
        let id = self.next_id;
        self.next_id += 1;

        self.bodies.push(CollisionBody {
            id,
            shape,
            transform,
            contents,
        });

        id
    }

    fn visible<'a>(&'a self, filter: &'a QueryFilter) -> impl Iterator<Item = &'a CollisionBody> + 'a {
        self.bodies
            .iter()
            .filter(move |body| filter.accepts(body.id, body.contents))
    }

    /// Time-of-impact sweep for shape traces.
    ///
    /// Bodies the shape already overlaps at `start` don't block, so a
    /// shape can always move out of them; if it is still inside one at
    /// the end the whole trace is solid.
    fn cast_sweep(&self, start: Vec3, delta: Vec3, shape: TraceShape, filter: &QueryFilter) -> TraceResult {
        let end = start + delta;
        let distance = delta.length();
        let direction = delta / distance;

        let cast_shape = parry_shape(shape, TOUCH_EPSILON);
        let start_transform = shape_transform(start, shape);
        let end_transform = shape_transform(end, shape);
        let velocity = Vector::new(delta.x, delta.y, delta.z);
        let options = ShapeCastOptions {
            max_time_of_impact: 1.0,
            target_distance: 0.0,
            // Contacts the shape slides along or leaves don't stop it
            stop_at_penetration: false,
            compute_impact_geometry_on_penetration: true,
        };

        let mut started_in_solid = false;
        let mut trapped: Option<&CollisionBody> = None;
        let mut closest: Option<(f32, Vec3, &CollisionBody)> = None;

        for body in self.visible(filter) {
            if body.intersects(&start_transform, &cast_shape) {
                started_in_solid = true;
                if trapped.is_none() && body.intersects(&end_transform, &cast_shape) {
                    trapped = Some(body);
                }
                continue;
            }

            let hit = match query::cast_shapes(
                &start_transform,
                &velocity,
                cast_shape.as_ref(),
                &body.transform,
                &Vector::zeros(),
                body.shape.as_ref(),
                options,
            ) {
                Ok(Some(hit)) => hit,
                Ok(None) => continue,
                Err(err) => {
                    log::warn!("sweep skipped body {}: {:?}", body.id, err);
                    continue;
                }
            };

            if closest.map_or(true, |(toi, _, _)| hit.time_of_impact < toi) {
                // normal1 points out of the moving shape, towards the body
                let normal = -Vec3::new(hit.normal1.x, hit.normal1.y, hit.normal1.z);
                closest = Some((hit.time_of_impact, normal, body));
            }
        }

        if let Some(body) = trapped {
            return TraceResult {
                fraction: 0.0,
                end_position: start,
                impact_point: start,
                hit_normal: Some(-direction),
                hit_contents: body.contents,
                hit_body: Some(body.id),
                started_in_solid: true,
                all_solid: true,
            };
        }

        let Some((time_of_impact, normal, body)) = closest else {
            let mut result = TraceResult::no_hit(end);
            result.started_in_solid = started_in_solid;
            return result;
        };

        // Back off so the shape rests SWEEP_GAP clear of the surface
        let approach = (-direction.dot(normal)).max(MIN_APPROACH);
        let fraction = (time_of_impact - SWEEP_GAP / (approach * distance)).clamp(0.0, 1.0);
        let end_position = start + delta * fraction;

        TraceResult {
            fraction,
            end_position,
            impact_point: end_position,
            hit_normal: Some(normal),
            hit_contents: body.contents,
            hit_body: Some(body.id),
            started_in_solid,
            all_solid: false,
        }
    }

    fn first_overlapping<'a>(
        &'a self,
        position: Vec3,
        shape: TraceShape,
        filter: &'a QueryFilter,
    ) -> Option<&'a CollisionBody> {
        let test_shape = parry_shape(shape, TOUCH_EPSILON);
        let test_transform = shape_transform(position, shape);

        self.visible(filter)
            .find(|body| body.intersects(&test_transform, &test_shape))
    }

    /// Compute hit normal from a ray intersection.
    fn hit_normal(ray: &Ray, toi: f32, body: &CollisionBody) -> Vec3 {
        match body
            .shape
            .cast_ray_and_get_normal(&body.transform, ray, toi + 0.01, true)
        {
            Some(intersection) if intersection.normal.norm_squared() > 0.5 => Vec3::new(
                intersection.normal.x,
                intersection.normal.y,
                intersection.normal.z,
            ),
            _ => -Vec3::new(ray.dir.x, ray.dir.y, ray.dir.z).normalize(),
        }
    }
}

impl WorldQuery for CollisionWorld {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32, filter: &QueryFilter) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir.length_squared() < 0.5 || max_distance <= 0.0 {
            return TraceResult::no_hit(origin);
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest: Option<(f32, &CollisionBody)> = None;

        for body in self.visible(filter) {
            if let Some(toi) = body.shape.cast_ray(&body.transform, &ray, max_distance, true) {
                let is_closer = closest.map_or(true, |(dist, _)| toi < dist);
                if toi <= max_distance && is_closer {
                    closest = Some((toi, body));
                }
            }
        }

        match closest {
            Some((distance, body)) => {
                let point = origin + dir * distance;
                TraceResult {
                    fraction: (distance / max_distance).min(0.999_999),
                    end_position: point,
                    impact_point: point,
                    hit_normal: Some(Self::hit_normal(&ray, distance, body)),
                    hit_contents: body.contents,
                    hit_body: Some(body.id),
                    started_in_solid: distance <= f32::EPSILON,
                    all_solid: false,
                }
            }
            None => TraceResult::no_hit(origin + dir * max_distance),
        }
    }

    fn sweep(&self, start: Vec3, end: Vec3, shape: TraceShape, filter: &QueryFilter) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();

        if shape == TraceShape::Point {
            return self.line_trace(start, end, filter);
        }

        // No movement - just check if position is valid
        if distance < 0.0001 {
            return match self.first_overlapping(start, shape, filter) {
                Some(hit) => TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    impact_point: start,
                    hit_normal: Some(Vec3::Y),
                    hit_contents: hit.contents,
                    hit_body: Some(hit.id),
                    started_in_solid: true,
                    all_solid: true,
                },
                None => TraceResult::no_hit(start),
            };
        }

        self.cast_sweep(start, delta, shape, filter)
    }

    fn overlaps(&self, position: Vec3, shape: TraceShape, filter: &QueryFilter) -> bool {
        self.first_overlapping(position, shape, filter).is_some()
    }

    fn body_bounds(&self, body: BodyId) -> Option<(Vec3, Vec3)> {
        let body = self.body(body)?;
        let aabb = body.shape.compute_aabb(&body.transform);
        Some((
            Vec3::new(aabb.mins.x, aabb.mins.y, aabb.mins.z),
            Vec3::new(aabb.maxs.x, aabb.maxs.y, aabb.maxs.z),
        ))
    }
}

/// Create a parry3d shape from a trace shape, shrunk by `shrink` on every side.
fn parry_shape(shape: TraceShape, shrink: f32) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            // Parry capsule is defined by half-height of the cylinder part
            let cylinder_half_height = (height - 2.0 * radius).max(0.0) / 2.0;
            SharedShape::capsule_y(cylinder_half_height, (radius - shrink).max(0.001))
        }
        TraceShape::Box { half_extents } => {
            let half = (half_extents - Vec3::splat(shrink)).max(Vec3::splat(0.001));
            SharedShape::cuboid(half.x, half.y, half.z)
        }
        TraceShape::Point => SharedShape::ball(0.001),
    }
}

/// Transform placing a shape by its bottom-centre.
fn shape_transform(position: Vec3, shape: TraceShape) -> Isometry<Real> {
    let offset_y = match shape {
        TraceShape::Capsule { height, .. } => height / 2.0,
        TraceShape::Box { half_extents } => half_extents.y,
        TraceShape::Point => 0.0,
    };

    Isometry::translation(position.x, position.y + offset_y, position.z)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at y=0
        world.add_box(
            Vec3::new(0.0, -50.0, 0.0),
            Vec3::new(5000.0, 50.0, 5000.0),
            ContentFlags::SOLID,
        );

        // Wall whose near face is at x=1000
        world.add_box(
            Vec3::new(1050.0, 250.0, 0.0),
            Vec3::new(50.0, 250.0, 1000.0),
            ContentFlags::SOLID,
        );

        world
    }

    fn solid() -> QueryFilter {
        QueryFilter::new(ContentFlags::SOLID)
    }

    #[test]
    fn test_raycast_hit() {
        let world = create_test_world();

        let result = world.raycast(Vec3::new(0.0, 100.0, 0.0), Vec3::X, 2000.0, &solid());

        assert!(result.hit_something());
        assert!((result.impact_point.x - 1000.0).abs() < 0.1);
        assert_eq!(result.hit_body, Some(1));
        let normal = result.hit_normal.unwrap();
        assert!((normal - Vec3::NEG_X).length() < 0.01, "normal={:?}", normal);
    }

    #[test]
    fn test_raycast_miss() {
        let world = create_test_world();

        let result = world.raycast(Vec3::new(0.0, 100.0, 0.0), -Vec3::X, 2000.0, &solid());

        assert!(!result.hit_something());
        assert_eq!(result.fraction, 1.0);
        assert!(result.hit_body.is_none());
    }

    #[test]
    fn test_raycast_respects_ignore_list() {
        let world = create_test_world();
        let filter = solid().ignoring(1);

        let result = world.raycast(Vec3::new(0.0, 100.0, 0.0), Vec3::X, 2000.0, &filter);

        assert!(!result.hit_something(), "ignored wall should not be hit");
    }

    #[test]
    fn test_line_trace_down_finds_floor() {
        let world = create_test_world();

        let result = world.line_trace(Vec3::new(0.0, 100.0, 0.0), Vec3::new(0.0, -10.0, 0.0), &solid());

        assert!(result.hit_something());
        assert!(result.impact_point.y.abs() < 0.01, "floor top at 0, got {}", result.impact_point.y);
        assert_eq!(result.hit_body, Some(0));
    }

    #[test]
    fn test_sweep_capsule_stops_at_wall() {
        let world = create_test_world();

        let result = world.sweep(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1500.0, 1.0, 0.0),
            TraceShape::CHARACTER_STANDING,
            &solid(),
        );

        assert!(result.hit_something());
        assert!(result.end_position.x < 1000.0 - 39.0);
        assert_eq!(result.hit_body, Some(1));
        let normal = result.hit_normal.unwrap();
        assert!(normal.x < -0.9, "normal should face back along -X, got {:?}", normal);
    }

    #[test]
    fn test_sweep_stops_at_thin_wall() {
        let mut world = create_test_world();
        // 10 unit wall spanning x=95..105, well short of the sweep end
        let thin = world.add_block(Vec3::new(100.0, 0.0, 0.0), 5.0, 500.0, 200.0, ContentFlags::SOLID);

        let result = world.sweep(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(300.0, 1.0, 0.0),
            TraceShape::CHARACTER_STANDING,
            &solid(),
        );

        assert!(result.hit_something(), "swept straight through the wall");
        assert_eq!(result.hit_body, Some(thin));
        assert!(result.end_position.x < 55.0 && result.end_position.x > 54.0, "end={:?}", result.end_position);
        assert!(!world.overlaps(result.end_position, TraceShape::CHARACTER_STANDING, &solid()));
    }

    #[test]
    fn test_sweep_along_floor_contact_is_clear() {
        let world = create_test_world();

        // Feet exactly on the floor top
        let result = world.sweep(
            Vec3::ZERO,
            Vec3::new(500.0, 0.0, 300.0),
            TraceShape::CHARACTER_STANDING,
            &solid(),
        );

        assert!(!result.hit_something(), "resting contact should not block: {:?}", result);
        assert!(!result.started_in_solid);
        assert_eq!(result.end_position, Vec3::new(500.0, 0.0, 300.0));
    }

    #[test]
    fn test_sweep_down_lands_on_floor() {
        let world = create_test_world();

        let result = world.sweep(
            Vec3::new(0.0, 5.0, 0.0),
            Vec3::new(0.0, -5.0, 0.0),
            TraceShape::CHARACTER_STANDING,
            &solid(),
        );

        assert!(result.hit_something());
        assert!(result.end_position.y >= 0.0 && result.end_position.y < 0.1, "y={}", result.end_position.y);
        let normal = result.hit_normal.unwrap();
        assert!(normal.y > 0.99, "floor normal {:?}", normal);
    }

    #[test]
    fn test_box_sweep_hits_thin_shelf() {
        let mut world = create_test_world();
        let shelf = world.add_box(Vec3::new(200.0, 62.0, 0.0), Vec3::new(50.0, 3.0, 50.0), ContentFlags::SOLID);
        let probe = TraceShape::Box {
            half_extents: Vec3::splat(20.0),
        };

        let result = world.sweep(Vec3::new(200.0, 100.0, 0.0), Vec3::new(200.0, 5.0, 0.0), probe, &solid());

        assert!(result.blocked());
        assert_eq!(result.hit_body, Some(shelf));
        assert!((result.end_position.y - 65.0).abs() < 0.2, "y={}", result.end_position.y);
    }

    #[test]
    fn test_sweep_out_of_overlap() {
        let world = create_test_world();
        // Capsule sunk 20 units into the wall face
        let inside = Vec3::new(980.0, 1.0, 0.0);

        let out = world.sweep(inside, Vec3::new(800.0, 1.0, 0.0), TraceShape::CHARACTER_STANDING, &solid());
        assert!(out.started_in_solid);
        assert!(!out.hit_something());
        assert!(!out.all_solid);

        let deeper = world.sweep(inside, Vec3::new(990.0, 1.0, 0.0), TraceShape::CHARACTER_STANDING, &solid());
        assert!(deeper.all_solid);
        assert_eq!(deeper.fraction, 0.0);
        assert_eq!(deeper.hit_body, Some(1));
    }

    #[test]
    fn test_resting_on_floor_is_not_overlap() {
        let world = create_test_world();

        assert!(!world.overlaps(Vec3::ZERO, TraceShape::CHARACTER_STANDING, &solid()));
        assert!(world.overlaps(Vec3::new(0.0, -5.0, 0.0), TraceShape::CHARACTER_STANDING, &solid()));
    }

    #[test]
    fn test_content_mask_filtering() {
        let mut world = CollisionWorld::new();

        world.add_box(Vec3::new(500.0, 100.0, 0.0), Vec3::new(50.0, 100.0, 500.0), ContentFlags::SOLID);
        world.add_box(Vec3::new(300.0, 100.0, 0.0), Vec3::new(50.0, 100.0, 500.0), ContentFlags::TRIGGER);

        let result = world.raycast(Vec3::new(0.0, 100.0, 0.0), Vec3::X, 1000.0, &solid());

        assert!(result.hit_something());
        // Should hit the wall at x=450, not the trigger at x=250
        assert!((result.impact_point.x - 450.0).abs() < 0.1);
    }

    #[test]
    fn test_body_bounds() {
        let mut world = CollisionWorld::new();
        let id = world.add_block(Vec3::new(100.0, 0.0, 0.0), 10.0, 50.0, 60.0, ContentFlags::SOLID);

        let (min, max) = world.body_bounds(id).unwrap();
        assert!((min - Vec3::new(90.0, 0.0, -50.0)).length() < 0.001);
        assert!((max - Vec3::new(110.0, 60.0, 50.0)).length() < 0.001);
        assert!(world.body_bounds(99).is_none());
    }

    #[test]
    fn test_convex_hull_ramp() {
        let mut world = CollisionWorld::new();
        // Wedge rising from y=0 at x=0 to y=100 at x=300
        let ramp = world
            .add_convex_hull(
                &[
                    Vec3::new(0.0, 0.0, -100.0),
                    Vec3::new(0.0, 0.0, 100.0),
                    Vec3::new(300.0, 0.0, -100.0),
                    Vec3::new(300.0, 0.0, 100.0),
                    Vec3::new(300.0, 100.0, -100.0),
                    Vec3::new(300.0, 100.0, 100.0),
                ],
                ContentFlags::SOLID,
            )
            .unwrap();

        let result = world.line_trace(Vec3::new(150.0, 200.0, 0.0), Vec3::new(150.0, -10.0, 0.0), &solid());
        assert_eq!(result.hit_body, Some(ramp));
        assert!((result.impact_point.y - 50.0).abs() < 0.1);

        let normal = result.hit_normal.unwrap();
        assert!(normal.y > 0.9 && normal.x < 0.0, "slope normal {:?}", normal);
    }
}
