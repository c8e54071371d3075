//! Trace results, shapes and query filters.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Identifier of a body in the collision world.
pub type BodyId = u32;

/// Result of a collision query through the world.
///
/// Rays and shape sweeps both report through this type. A miss has
/// `fraction == 1.0` and no normal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResult {
    /// How far along the query path we got before hitting something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = hit something immediately at start
    pub fraction: f32,

    /// Final position of the ray point or shape origin.
    pub end_position: Vec3,

    /// Point of contact on the surface that was hit.
    ///
    /// For rays this equals `end_position`. For shape sweeps it is the
    /// shape origin at the moment of contact.
    pub impact_point: Vec3,

    /// Surface normal at the impact point, pointing away from the surface.
    pub hit_normal: Option<Vec3>,

    /// Content flags of what was hit.
    pub hit_contents: ContentFlags,

    /// Body that was hit, if any.
    pub hit_body: Option<BodyId>,

    /// Whether the query started inside solid geometry.
    pub started_in_solid: bool,

    /// Whether the entire query was inside solid geometry.
    pub all_solid: bool,
}

impl Default for TraceResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO)
    }
}

impl TraceResult {
    /// Create a trace result indicating no collision occurred.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            impact_point: end_position,
            hit_normal: None,
            hit_contents: ContentFlags::EMPTY,
            hit_body: None,
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Create a trace result indicating a collision occurred.
    pub fn hit(fraction: f32, end_position: Vec3, normal: Vec3) -> Self {
        Self {
            fraction,
            end_position,
            impact_point: end_position,
            hit_normal: Some(normal),
            hit_contents: ContentFlags::SOLID,
            hit_body: None,
            started_in_solid: false,
            all_solid: false,
        }
    }

    /// Check if this trace hit something.
    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }

    /// Whether anything obstructed the query, including starting inside geometry.
    #[inline]
    pub fn blocked(&self) -> bool {
        self.hit_something() || self.started_in_solid
    }

    /// Get the hit normal, defaulting to up if none.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::Y)
    }
}

/// Shape used for collision sweeps and overlap tests.
///
/// Shapes are placed by their bottom-centre, so a capsule at `position`
/// rests on a floor whose top is at `position.y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// A vertical capsule (pill shape).
    Capsule {
        /// Radius of the capsule cylinder and end caps.
        radius: f32,
        /// Total height from bottom of lower cap to top of upper cap.
        height: f32,
    },

    /// An axis-aligned box defined by half-extents.
    Box {
        /// Half-size in each axis (x, y, z).
        half_extents: Vec3,
    },

    /// A single point, used for rays.
    Point,
}

impl TraceShape {
    /// Standing character capsule (40 radius, 180 tall).
    pub const CHARACTER_STANDING: Self = Self::Capsule {
        radius: 40.0,
        height: 180.0,
    };

    /// Get the effective radius of this shape for collision purposes.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Capsule { radius, .. } => *radius,
            Self::Box { half_extents } => half_extents.x.max(half_extents.z),
            Self::Point => 0.0,
        }
    }

    /// Get the height of this shape.
    pub fn height(&self) -> f32 {
        match self {
            Self::Capsule { height, .. } => *height,
            Self::Box { half_extents } => half_extents.y * 2.0,
            Self::Point => 0.0,
        }
    }
}

impl Default for TraceShape {
    fn default() -> Self {
        Self::CHARACTER_STANDING
    }
}

/// Which bodies a query is allowed to see.
///
/// Combines a channel mask with a list of excluded bodies (typically the
/// querying character itself, or the obstacle it is currently traversing).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryFilter {
    /// Content flags to collide with.
    pub mask: ContentFlags,
    /// Bodies to skip regardless of their contents.
    pub ignore: Vec<BodyId>,
}

impl QueryFilter {
    /// Filter on a channel with no exclusions.
    pub fn new(mask: ContentFlags) -> Self {
        Self {
            mask,
            ignore: Vec::new(),
        }
    }

    /// Add a body to the exclusion list. `None` is accepted and ignored.
    pub fn ignoring(mut self, body: impl Into<Option<BodyId>>) -> Self {
        if let Some(id) = body.into() {
            if !self.ignore.contains(&id) {
                self.ignore.push(id);
            }
        }
        self
    }

    /// Whether a body with the given id and contents passes this filter.
    #[inline]
    pub fn accepts(&self, id: BodyId, contents: ContentFlags) -> bool {
        self.mask.intersects(contents) && !self.ignore.contains(&id)
    }
}
