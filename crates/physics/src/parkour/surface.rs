//! Detection results handed from the surface detector to the mover.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::BodyId;

/// What kind of traversal a surface affords.
///
/// Only [`SurfaceType::Ledge`] and [`SurfaceType::Vaultable`] are ever
/// produced by detection; the rest are reserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceType {
    #[default]
    None,
    Vaultable,
    Ledge,
    Wall,
    Climbable,
    WallRunLeft,
    WallRunRight,
}

/// Result of a single detection query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceAffordance {
    /// Whether a traversal may start from this result.
    pub is_valid: bool,
    /// Ledge top for climbs, obstacle face for vaults.
    pub impact_point: Vec3,
    /// Normal of the obstacle face that was hit going forward.
    pub impact_normal: Vec3,
    /// Direction into the obstacle (`-impact_normal`).
    pub surface_forward: Vec3,
    pub surface_type: SurfaceType,
    /// Height of the ledge/obstacle top above the character's feet.
    pub surface_height: f32,
    /// Body that was hit. Identity only.
    pub hit_entity: Option<BodyId>,
    /// Set when a ledge was rejected because the head path was obstructed.
    pub head_blocked: bool,
}

impl SurfaceAffordance {
    /// An invalid result.
    pub fn miss() -> Self {
        Self::default()
    }

    /// An invalid result caused by an obstructed head path.
    pub fn head_blocked() -> Self {
        Self {
            head_blocked: true,
            ..Self::default()
        }
    }

    /// A valid result of the given type.
    pub fn found(
        surface_type: SurfaceType,
        impact_point: Vec3,
        impact_normal: Vec3,
        surface_height: f32,
        hit_entity: Option<BodyId>,
    ) -> Self {
        Self {
            is_valid: true,
            impact_point,
            impact_normal,
            surface_forward: -impact_normal,
            surface_type,
            surface_height,
            hit_entity,
            head_blocked: false,
        }
    }

    /// Whether this is a valid result of the given type.
    #[inline]
    pub fn is(&self, surface_type: SurfaceType) -> bool {
        self.is_valid && self.surface_type == surface_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_is_invalid() {
        let surface = SurfaceAffordance::miss();
        assert!(!surface.is_valid);
        assert_eq!(surface.surface_type, SurfaceType::None);
        assert!(!surface.head_blocked);
        assert!(surface.hit_entity.is_none());
    }

    #[test]
    fn test_found_derives_forward_from_normal() {
        let surface = SurfaceAffordance::found(
            SurfaceType::Ledge,
            Vec3::new(100.0, 80.0, 0.0),
            Vec3::NEG_X,
            80.0,
            Some(3),
        );
        assert!(surface.is(SurfaceType::Ledge));
        assert!(!surface.is(SurfaceType::Vaultable));
        assert_eq!(surface.surface_forward, Vec3::X);
        assert_eq!(surface.hit_entity, Some(3));
    }

    #[test]
    fn test_head_blocked_is_invalid() {
        let surface = SurfaceAffordance::head_blocked();
        assert!(surface.head_blocked);
        assert!(!surface.is(SurfaceType::Ledge));
    }
}
