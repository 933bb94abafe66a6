//! Wall probing.
//!
//! Two probes keep the climber attached to geometry:
//!
//! - [`probe_climbed_wall`] sweeps the body capsule a short distance toward the
//!   wall to refresh the ledge direction and the strafe ray.
//! - [`find_adjacent_wall`] walks a ray around a corner, turning 90° after each
//!   miss, until it strikes the next wall face or runs out of attempts.

use bevy::prelude::*;

use crate::backend::SpatialQuery;
use crate::config::{ClimberBody, ClimbingConfig};
use crate::detection::{AdjacentWall, CornerContext, WallContact};
use crate::geometry::ProbeRay;

/// Direction the climbed-wall capsule is swept along.
///
/// - No wall known yet: the body's facing direction.
/// - Wrapping an outside corner: into the corner (opposite the corner normal).
/// - Otherwise: the last known ledge direction.
pub fn wall_probe_direction(body: &ClimberBody, contact: &WallContact, corner: &CornerContext) -> Vec3 {
    let direction = if !contact.has_wall() {
        body.forward
    } else if !corner.at_outside_corner {
        contact.ledge_direction
    } else {
        -corner.corner_normal_ray.direction
    };
    direction.normalize_or_zero()
}

/// Refresh the climbed wall from a capsule sweep.
///
/// The capsule spans the body height, starting `probe_capsule_offset × height`
/// below the body center. On a hit the ledge direction becomes the negated
/// surface normal and the strafe ray is rebuilt at the hit point, at the
/// body's height, pointing out of the wall.
///
/// Returns whether a wall was hit. On a miss `contact` is left unchanged.
pub fn probe_climbed_wall<Q: SpatialQuery + ?Sized>(
    query: &Q,
    body: &ClimberBody,
    config: &ClimbingConfig,
    contact: &mut WallContact,
    corner: &CornerContext,
) -> bool {
    let direction = wall_probe_direction(body, contact, corner);
    if direction == Vec3::ZERO {
        return false;
    }

    let capsule_start =
        body.position + body.center - Vec3::Y * (body.height * config.probe_capsule_offset);
    let capsule_axis = Vec3::Y * body.height;

    let Some(hit) = query.cast_capsule(
        capsule_start,
        capsule_axis,
        body.radius,
        direction,
        config.wall_probe_distance,
    ) else {
        trace!("wall probe missed along {direction}");
        return false;
    };

    let normal = hit.normal.normalize_or_zero();
    contact.ledge_direction = -normal;
    contact.strafe_ray = ProbeRay::new(
        Vec3::new(hit.point.x, body.position.y, hit.point.z),
        normal,
    );
    trace!(
        "wall probe hit at {} (ledge {})",
        contact.strafe_ray.origin,
        contact.ledge_direction
    );
    true
}

/// Search for the wall face adjacent to the one being climbed.
///
/// Casts a ray of `direction`'s length from `origin`. Only environment hits
/// count as walls. On a miss the search point advances by the failed ray and
/// the next ray is turned 90° around up (sense set by `search_clockwise`),
/// keeping its length. Gives up after `max_attempts` rays.
///
/// The adjacent wall ray runs along the found surface: `normal × up` when
/// searching clockwise, `up × normal` otherwise.
pub fn find_adjacent_wall<Q: SpatialQuery + ?Sized>(
    query: &Q,
    origin: Vec3,
    direction: Vec3,
    search_clockwise: bool,
    max_attempts: u32,
) -> Option<AdjacentWall> {
    let distance = direction.length();
    if distance <= f32::EPSILON {
        return None;
    }

    let mut origin = origin;
    let mut direction = direction;

    for attempt in 1..=max_attempts {
        let unit = direction / distance;

        if let Some(hit) = query
            .cast_ray(origin, unit, distance)
            .filter(|hit| hit.is_environment)
        {
            let normal = hit.normal.normalize_or_zero();
            let along_wall = if search_clockwise {
                normal.cross(Vec3::Y)
            } else {
                Vec3::Y.cross(normal)
            };
            trace!("adjacent wall found after {attempt} ray(s) at {}", hit.point);
            return Some(AdjacentWall {
                ledge_direction: -normal,
                wall_ray: ProbeRay::new(hit.point, along_wall),
                attempts: attempt,
            });
        }

        let last_origin = origin;
        origin += direction;
        let back = last_origin - origin;
        let turned = if search_clockwise {
            back.cross(Vec3::Y)
        } else {
            Vec3::Y.cross(back)
        };
        direction = turned.normalize_or_zero() * distance;
        if direction == Vec3::ZERO {
            break;
        }
    }

    trace!("adjacent wall search exhausted after {max_attempts} ray(s)");
    None
}
