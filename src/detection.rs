//! Wall contact and corner detection results.
//!
//! These structures hold what the wall probe learned about the gripped wall
//! and, while strafing, about the adjacent wall around a corner.

use bevy::prelude::*;

use crate::geometry::ProbeRay;

/// The wall currently being climbed.
///
/// Refreshed from a fresh capsule cast every attached tick. Left untouched
/// while not climbing, so it is stale (and ignored) between climbs.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct WallContact {
    /// Unit vector from the wall surface into the wall (negated surface
    /// normal). Zero when no wall has been found yet.
    pub ledge_direction: Vec3,
    /// Ray on the wall surface at the body's height. Its origin is the wall
    /// hit point; its direction is the surface normal until a strafe
    /// direction replaces it.
    pub strafe_ray: ProbeRay,
}

impl WallContact {
    /// Whether a wall has been found at least once.
    #[inline]
    pub fn has_wall(&self) -> bool {
        self.ledge_direction != Vec3::ZERO
    }

    /// Outward surface normal of the gripped wall.
    #[inline]
    pub fn wall_normal(&self) -> Vec3 {
        -self.ledge_direction
    }

    /// Horizontal direction pointing out of the wall.
    pub fn away_from_wall(&self) -> Vec3 {
        Vec3::new(-self.ledge_direction.x, 0.0, -self.ledge_direction.z).normalize_or_zero()
    }
}

/// A wall found by the adjacent wall search.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct AdjacentWall {
    /// Negated surface normal of the adjacent wall.
    pub ledge_direction: Vec3,
    /// Ray along the adjacent wall's surface, starting at the hit point.
    pub wall_ray: ProbeRay,
    /// Number of rays cast before the wall was found.
    pub attempts: u32,
}

/// Corner information gathered while strafing.
///
/// Only `at_outside_corner` carries over between ticks; the rest is
/// recomputed whenever a lateral input is held.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq)]
pub struct CornerContext {
    /// Wrapping around a convex corner.
    pub at_outside_corner: bool,
    /// Ledge direction of the adjacent wall.
    pub adjacent_ledge_direction: Vec3,
    /// Ray along the adjacent wall.
    pub adjacent_wall_ray: ProbeRay,
    /// Ray from the corner, pointing out diagonally between both walls.
    pub corner_normal_ray: ProbeRay,
}

impl CornerContext {
    /// Store the result of an adjacent wall search.
    pub fn record_adjacent(&mut self, wall: &AdjacentWall) {
        self.adjacent_ledge_direction = wall.ledge_direction;
        self.adjacent_wall_ray = wall.wall_ray;
    }

    /// Forget everything about the corner.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
