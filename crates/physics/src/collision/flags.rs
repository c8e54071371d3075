//! Collision channels for query filtering.
//!
//! Every body in the world carries a set of content flags. Queries pass a
//! mask and only see bodies whose contents intersect it, which is how a
//! "trace channel" is expressed here.

use serde::{Deserialize, Serialize};

/// Content flags describe what kind of volume a body is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - walls, floors, etc.
    pub const SOLID: Self = Self(1 << 0);

    /// Player clip - blocks characters but not parkour probes.
    pub const PLAYER_CLIP: Self = Self(1 << 1);

    /// Character bodies.
    pub const PLAYER_BODY: Self = Self(1 << 2);

    /// Trigger volume - never blocks movement.
    pub const TRIGGER: Self = Self(1 << 3);

    /// Geometry flagged for parkour (ledges, rails, crates).
    ///
    /// Traversable geometry is usually also `SOLID`.
    pub const TRAVERSABLE: Self = Self(1 << 4);

    /// Standard mask for character movement.
    pub const MASK_PLAYER_SOLID: Self = Self(
        Self::SOLID.0 | Self::PLAYER_CLIP.0 | Self::PLAYER_BODY.0,
    );

    /// Default channel for parkour surface detection.
    pub const MASK_TRAVERSAL: Self = Self(Self::SOLID.0 | Self::TRAVERSABLE.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Remove flags from this set.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_flags_operations() {
        let combined = ContentFlags::SOLID | ContentFlags::TRAVERSABLE;

        assert!(combined.contains(ContentFlags::SOLID));
        assert!(combined.contains(ContentFlags::TRAVERSABLE));
        assert!(!combined.contains(ContentFlags::TRIGGER));
        assert_eq!(combined.difference(ContentFlags::SOLID), ContentFlags::TRAVERSABLE);
    }

    #[test]
    fn test_traversal_mask_ignores_player_clip() {
        let mask = ContentFlags::MASK_TRAVERSAL;
        assert!(mask.intersects(ContentFlags::SOLID));
        assert!(!mask.intersects(ContentFlags::PLAYER_CLIP));
        assert!(!mask.intersects(ContentFlags::TRIGGER));
    }
}
