//! Ray and line helpers used by the wall probe and corner wrapping.
//!
//! All functions are pure. Directions passed in are expected to be
//! normalized unless stated otherwise.

use bevy::prelude::*;

/// Tolerance for the coplanarity and parallelism tests.
const LINE_EPSILON: f32 = 0.01;

/// A ray with an origin and a direction, used as an infinite line
/// when intersecting walls.
#[derive(Reflect, Debug, Clone, Copy, PartialEq)]
pub struct ProbeRay {
    /// Origin of the ray in world space.
    pub origin: Vec3,
    /// Direction of the ray. Normalized on construction.
    pub direction: Vec3,
}

impl Default for ProbeRay {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}

impl ProbeRay {
    /// Create a new ray. The direction is normalized (zero stays zero).
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point along the ray at distance `t`.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Replace the direction, normalizing it.
    pub fn set_direction(&mut self, direction: Vec3) {
        self.direction = direction.normalize_or_zero();
    }
}

/// Intersect two infinite lines given by a point and a direction.
///
/// Returns `None` if the lines are not coplanar or are (nearly) parallel.
pub fn line_line_intersection(
    point1: Vec3,
    direction1: Vec3,
    point2: Vec3,
    direction2: Vec3,
) -> Option<Vec3> {
    let between = point2 - point1;
    let cross_1_2 = direction1.cross(direction2);
    let cross_between_2 = between.cross(direction2);

    let planar_factor = between.dot(cross_1_2);

    // Coplanar and not parallel
    if planar_factor.abs() < LINE_EPSILON && cross_1_2.length_squared() > LINE_EPSILON {
        let s = cross_between_2.dot(cross_1_2) / cross_1_2.length_squared();
        Some(point1 + direction1 * s)
    } else {
        None
    }
}

/// Intersect the lines carried by two rays.
pub fn ray_intersection(a: &ProbeRay, b: &ProbeRay) -> Option<Vec3> {
    line_line_intersection(a.origin, a.direction, b.origin, b.direction)
}

/// Whether two direction vectors are nearly parallel (or anti-parallel).
///
/// A zero vector is parallel to everything.
pub fn is_almost_parallel(direction1: Vec3, direction2: Vec3) -> bool {
    direction1.cross(direction2).length_squared() < LINE_EPSILON
}

/// Project a world position onto the horizontal (x/z) plane.
#[inline]
pub fn horizontal(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}
