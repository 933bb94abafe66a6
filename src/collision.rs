//! Collision result structures.
//!
//! These structures hold the results of physics queries (capsule casts and
//! raycasts) used by the wall probe, and the collision flag bitmask reported
//! by the movement controller after it moves the body.

use bevy::prelude::*;

/// Information about a raycast/shapecast collision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CollisionData {
    /// Distance to the hit point.
    pub distance: f32,
    /// Normal of the surface at hit point (points out of the surface).
    pub normal: Vec3,
    /// World position of the hit point.
    pub point: Vec3,
    /// Entity that was hit (if any).
    pub entity: Option<Entity>,
    /// Whether the struck collider is static environment geometry.
    ///
    /// Only environment surfaces count as walls for the adjacent wall search.
    pub is_environment: bool,
}

impl CollisionData {
    /// Create a collision result against static environment geometry.
    pub fn new(distance: f32, normal: Vec3, point: Vec3, entity: Option<Entity>) -> Self {
        Self {
            distance,
            normal,
            point,
            entity,
            is_environment: true,
        }
    }

    /// Builder: mark whether the hit collider is environment geometry.
    pub fn with_environment(mut self, is_environment: bool) -> Self {
        self.is_environment = is_environment;
        self
    }
}

/// Which sides of the body touched something during the last move.
///
/// Mirrors the flags a kinematic character controller reports after a move.
/// Combine with `|` and test with [`CollisionFlags::contains`].
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CollisionFlags(u8);

impl CollisionFlags {
    /// No contact.
    pub const NONE: Self = Self(0);
    /// Contact on the sides of the body (walls).
    pub const SIDES: Self = Self(1);
    /// Contact above the body (ceilings).
    pub const ABOVE: Self = Self(1 << 1);
    /// Contact below the body (ground).
    pub const BELOW: Self = Self(1 << 2);

    /// Raw bit representation.
    #[inline]
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Whether every flag in `other` is set.
    #[inline]
    pub fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Whether no flag is set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Set the given flags.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clear the given flags.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Classify a contact normal (pointing away from the obstacle) into a flag.
    ///
    /// Normals within ~45 degrees of vertical are ground or ceiling contacts,
    /// everything else is a side contact.
    pub fn from_contact_normal(normal: Vec3) -> Self {
        if normal.y > 0.7 {
            Self::BELOW
        } else if normal.y < -0.7 {
            Self::ABOVE
        } else {
            Self::SIDES
        }
    }
}

impl std::ops::BitOr for CollisionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for CollisionFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
