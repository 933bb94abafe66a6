//! Climbing movement resolver.
//!
//! Turns the grip state, the climbed wall and the held input into the
//! velocity of an attached climber. The velocity is kept in a buffer on the
//! motor between ticks: a firm grip overwrites it, a slipping grip lets
//! gravity accumulate on top of whatever it held.
//!
//! # Corner wrapping
//!
//! While strafing in advanced mode, the resolver looks for the wall face
//! around the next corner and intersects the line the climber strafes along
//! with the line of that face. When the intersection is where the climber
//! already is, the climber is at an outside corner and moves around it along
//! the corner's bisector until the move direction lines up with the adjacent
//! face. At that point the adjacent face becomes the climbed wall.

use bevy::prelude::*;

use crate::backend::SpatialQuery;
use crate::config::{ClimberBody, ClimbingConfig};
use crate::detection::{CornerContext, WallContact};
use crate::fall::FallSystem;
use crate::geometry::{is_almost_parallel, ray_intersection, ProbeRay};
use crate::intent::ClimbIntent;
use crate::probe::find_adjacent_wall;
use crate::state::ClimbState;

/// Per-tick inputs of the resolver.
pub struct MovementInput<'a, Q: SpatialQuery + ?Sized> {
    /// Collision world.
    pub query: &'a Q,
    /// Climbing tunables.
    pub config: &'a ClimbingConfig,
    /// Body geometry this tick.
    pub body: &'a ClimberBody,
    /// Held input.
    pub intent: ClimbIntent,
    /// Movement speed (units/second).
    pub speed: f32,
    /// Climb speed multiplier (2 with enhanced climbing).
    pub climbing_boost: f32,
}

/// What lateral movement did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrafeOutcome {
    /// No adjacent wall within reach; strafing straight.
    NoAdjacentWall,
    /// Strafing along the climbed wall (adjacent wall found, no outside corner here).
    AlongWall,
    /// Moving around an outside corner.
    WrappingCorner,
    /// Finished wrapping: the adjacent wall is now the climbed wall.
    WrapCompleted,
}

/// Lateral move direction and how it was chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strafe {
    /// Unit direction of lateral movement.
    pub direction: Vec3,
    /// How the direction was chosen.
    pub outcome: StrafeOutcome,
}

/// Vertical climb speed: a third of the movement speed, scaled by the boost.
#[inline]
pub fn climb_scalar(speed: f32, climbing_boost: f32) -> f32 {
    speed / 3.0 * climbing_boost
}

/// Velocity of a firm grip in simple mode: press into the wall and climb.
pub fn simple_climb_velocity(ledge_direction: Vec3, speed: f32, climbing_boost: f32) -> Vec3 {
    let mut velocity = ledge_direction * speed;
    velocity.y = climb_scalar(speed, climbing_boost);
    velocity
}

/// Whether an environment surface is directly ahead along the ledge direction.
pub fn wall_ahead<Q: SpatialQuery + ?Sized>(
    query: &Q,
    position: Vec3,
    ledge_direction: Vec3,
    distance: f32,
) -> bool {
    let direction = ledge_direction.normalize_or_zero();
    if direction == Vec3::ZERO {
        return false;
    }
    query
        .cast_ray(position, direction, distance)
        .is_some_and(|hit| hit.is_environment)
}

/// Resolve the lateral direction for a held strafe.
///
/// Right wins over left when both are held for the move itself, while the
/// adjacent wall search turns clockwise whenever left is held. Updates the
/// strafe ray, the corner context and, when a wrap completes, the climbed wall.
pub fn resolve_strafe<Q: SpatialQuery + ?Sized>(
    input: &MovementInput<'_, Q>,
    contact: &mut WallContact,
    corner: &mut CornerContext,
) -> Strafe {
    let moving_right = input.intent.right;
    let ledge = contact.ledge_direction;
    let check_direction = if moving_right {
        Vec3::Y.cross(ledge)
    } else {
        ledge.cross(Vec3::Y)
    }
    .normalize_or_zero();

    // The strafe ray must point along the move to intersect the adjacent wall
    contact.strafe_ray.set_direction(check_direction);

    let reach = input.body.radius + input.config.corner_search_margin;
    let Some(adjacent) = find_adjacent_wall(
        input.query,
        input.body.position,
        check_direction * reach,
        input.intent.left,
        input.config.corner_search_attempts,
    ) else {
        corner.at_outside_corner = false;
        return Strafe {
            direction: check_direction,
            outcome: StrafeOutcome::NoAdjacentWall,
        };
    };
    corner.record_adjacent(&adjacent);

    let mut wrap_direction = Vec3::ZERO;
    if let Some(intersection) = ray_intersection(&contact.strafe_ray, &corner.adjacent_wall_ray) {
        let corner_normal = (-ledge - corner.adjacent_ledge_direction).normalize_or_zero();
        corner.at_outside_corner =
            contact.strafe_ray.origin.distance(intersection) < input.config.outside_corner_tolerance;
        if corner.at_outside_corner {
            wrap_direction = if moving_right {
                corner_normal.cross(Vec3::Y)
            } else {
                Vec3::Y.cross(corner_normal)
            }
            .normalize_or_zero();
        }
        corner.corner_normal_ray = ProbeRay::new(intersection, corner_normal);
    }

    if corner.at_outside_corner
        && is_almost_parallel(wrap_direction, corner.adjacent_wall_ray.direction)
    {
        let along_new_wall = -corner.adjacent_wall_ray.direction;
        contact.ledge_direction = corner.adjacent_ledge_direction;
        contact.strafe_ray.set_direction(along_new_wall);
        corner.at_outside_corner = false;
        debug!("corner wrap complete, new ledge {}", contact.ledge_direction);
        return Strafe {
            direction: along_new_wall,
            outcome: StrafeOutcome::WrapCompleted,
        };
    }

    if corner.at_outside_corner {
        Strafe {
            direction: wrap_direction,
            outcome: StrafeOutcome::WrappingCorner,
        }
    } else {
        Strafe {
            direction: check_direction,
            outcome: StrafeOutcome::AlongWall,
        }
    }
}

/// Velocity of a firm grip in advanced mode.
///
/// Rises unless at an outside corner, or unless forward is released with a
/// wall right ahead (the climber holds position there instead; backward then
/// descends). Strafing adds lateral movement with corner wrapping. A
/// horizontal push into the wall is always added so the body keeps touching it.
pub fn advanced_climb_velocity<Q: SpatialQuery + ?Sized>(
    input: &MovementInput<'_, Q>,
    contact: &mut WallContact,
    corner: &mut CornerContext,
) -> (Vec3, Option<Strafe>) {
    let scalar = climb_scalar(input.speed, input.climbing_boost);
    let mut velocity = Vec3::ZERO;

    let rises = !corner.at_outside_corner
        && (input.intent.forward
            || !wall_ahead(
                input.query,
                input.body.position,
                contact.ledge_direction,
                input.config.ahead_probe_distance,
            ));
    if rises {
        velocity.y = scalar;
    } else if input.intent.backward {
        velocity.y = -scalar;
    }

    let strafe = input.intent.is_strafing().then(|| {
        let strafe = resolve_strafe(input, contact, corner);
        velocity += strafe.direction * scalar;
        strafe
    });

    velocity.x += contact.ledge_direction.x * input.speed;
    velocity.z += contact.ledge_direction.z * input.speed;

    (velocity, strafe)
}

/// Update the move direction buffer for one tick and return the displacement.
///
/// - `Slipping`: gravity accumulates on the buffer; input is ignored.
/// - `Climbing`: the buffer is replaced by the simple or advanced velocity.
/// - `NotClimbing`: nothing moves.
pub fn resolve_climb_movement<Q, F>(
    input: &MovementInput<'_, Q>,
    state: ClimbState,
    contact: &mut WallContact,
    corner: &mut CornerContext,
    move_direction: &mut Vec3,
    fall: &mut F,
    dt: f32,
) -> Vec3
where
    Q: SpatialQuery + ?Sized,
    F: FallSystem + ?Sized,
{
    match state {
        ClimbState::NotClimbing => return Vec3::ZERO,
        ClimbState::Slipping => {
            fall.check_init_fall(input.body.position.y);
            fall.apply_gravity(move_direction, dt);
        }
        ClimbState::Climbing => {
            *move_direction = if input.config.advanced_climbing {
                advanced_climb_velocity(input, contact, corner).0
            } else {
                simple_climb_velocity(contact.ledge_direction, input.speed, input.climbing_boost)
            };
        }
    }

    *move_direction * dt
}
