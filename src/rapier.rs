//! Rapier3D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier3D.
//! Enable with the `rapier3d` feature.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::backend::{ClimbingPhysicsBackend, SpatialQuery};
use crate::collision::{CollisionData, CollisionFlags};
use crate::config::{ClimberBody, ClimbingConfig};
use crate::fall::FallState;
use crate::intent::ClimbIntent;
use crate::motor::{ClimbEnvironment, ClimbingMotor};
use crate::skill::{ClimbingRng, ClimbingSkill, Submersion};
use crate::state::{Levitating, MotorStatus, Riding};
use crate::systems::{publish_tick, ClimbingModeMessage, WallEjectEvent};
use crate::ClimbingControllerSet;

/// Rapier3D physics backend for the climbing controller.
///
/// Wall probes run against the Rapier query pipeline. Displacements go
/// through the entity's [`KinematicCharacterController`] when it has one,
/// otherwise they are added to its `Transform` directly.
pub struct Rapier3dBackend;

impl ClimbingPhysicsBackend for Rapier3dBackend {
    fn plugin() -> impl Plugin {
        Rapier3dBackendPlugin
    }
}

/// Plugin that sets up Rapier3D-specific systems for the climbing controller.
pub struct Rapier3dBackendPlugin;

impl Plugin for Rapier3dBackendPlugin {
    fn build(&self, app: &mut App) {
        // Sensors: collision flags from the last character controller move
        app.add_systems(
            FixedUpdate,
            rapier_collision_flags.in_set(ClimbingControllerSet::Sensors),
        );

        // Motor: probe, tick and move every climber
        app.add_systems(
            FixedUpdate,
            rapier_climbing_motor.in_set(ClimbingControllerSet::Motor),
        );
    }
}

/// Body center offset, total height and radius of a capsule collider.
///
/// The height spans both hemispheres. Returns `None` for other shapes.
pub fn capsule_dimensions(collider: &Collider) -> Option<(Vec3, f32, f32)> {
    let capsule = collider.as_capsule()?;
    let segment = capsule.segment();
    let radius = capsule.radius();
    let center = (segment.a() + segment.b()) / 2.0;
    let height = segment.a().distance(segment.b()) + 2.0 * radius;
    Some((center, height, radius))
}

/// Whether a hit body counts as static environment geometry.
///
/// Receives the rigid body a collider is attached to, or the collider's own
/// entity when it has no body. Bodiless colliders and fixed bodies qualify.
fn is_environment_body(body: Option<&RigidBody>) -> bool {
    matches!(body, None | Some(RigidBody::Fixed))
}

/// [`SpatialQuery`] over a Rapier context.
///
/// `is_environment` classifies struck bodies for the adjacent wall search. A
/// hit collider is resolved to the rigid body it is attached to first, so a
/// child collider of a dynamic body is not mistaken for a wall.
pub struct RapierSpatialQuery<'a, F> {
    context: &'a RapierContext<'a>,
    filter: QueryFilter<'a>,
    is_environment: F,
}

impl<'a, F: Fn(Entity) -> bool> RapierSpatialQuery<'a, F> {
    /// Create a query that ignores `exclude_entity` and sensors.
    pub fn new(context: &'a RapierContext<'a>, exclude_entity: Entity, is_environment: F) -> Self {
        let filter = QueryFilter::default()
            .exclude_rigid_body(exclude_entity)
            .exclude_collider(exclude_entity)
            .exclude_sensors();
        Self {
            context,
            filter,
            is_environment,
        }
    }

    /// Builder: only hit colliders matching these collision groups.
    pub fn with_groups(mut self, groups: CollisionGroups) -> Self {
        self.filter = self.filter.groups(groups);
        self
    }

    /// Mark whether the hit collider's body is environment geometry.
    fn classify(&self, hit: CollisionData) -> CollisionData {
        let is_environment = hit.entity.is_some_and(|collider| {
            let body = self.context.colliders.collider_parent(self.context.rigidbody_set, collider).unwrap_or(collider);
            (self.is_environment)(body)
        });
        hit.with_environment(is_environment)
    }
}

impl<F: Fn(Entity) -> bool> SpatialQuery for RapierSpatialQuery<'_, F> {
    fn cast_capsule(
        &self,
        origin: Vec3,
        axis: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<CollisionData> {
        rapier_capsule_cast(self.context, origin, axis, radius, direction, max_distance, self.filter)
            .map(|hit| self.classify(hit))
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<CollisionData> {
        rapier_raycast(self.context, origin, direction, max_distance, self.filter)
            .map(|hit| self.classify(hit))
    }
}

/// Sweep a capsule using RapierContext.
///
/// The capsule runs from `origin` to `origin + axis`. The hit point is taken
/// on the capsule's midline at the time of impact, pushed out along the
/// contact normal by the radius.
fn rapier_capsule_cast(
    context: &RapierContext,
    origin: Vec3,
    axis: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    filter: QueryFilter,
) -> Option<CollisionData> {
    let shape = Collider::capsule(Vec3::ZERO, axis, radius);

    context
        .cast_shape(
            origin,
            Quat::IDENTITY,
            direction,
            &shape,
            ShapeCastOptions {
                max_time_of_impact: max_distance,
                stop_at_penetration: false,
                ..default()
            },
            filter,
        )
        .map(|(hit_entity, hit)| {
            // Normal on the struck collider, pointing back at the capsule
            let normal = hit.details.map(|d| d.normal1).unwrap_or(-direction);
            let midline = origin + axis * 0.5 + direction * hit.time_of_impact;
            let hit_point = midline - normal * radius;
            CollisionData::new(hit.time_of_impact, normal, hit_point, Some(hit_entity))
        })
}

/// Perform a raycast using RapierContext.
fn rapier_raycast(
    context: &RapierContext,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    filter: QueryFilter,
) -> Option<CollisionData> {
    context
        .cast_ray_and_get_normal(
            origin,
            direction,
            max_distance,
            true, // solid = true for solid hits
            filter,
        )
        .map(|(hit_entity, intersection)| {
            CollisionData::new(
                intersection.time_of_impact,
                intersection.normal,
                intersection.point,
                Some(hit_entity),
            )
        })
}

/// Write collision flags from the last character controller move.
///
/// Only entities moved by a [`KinematicCharacterController`] report contacts
/// here. Climbers without one keep whatever flags another system wrote. An
/// output is read once: further fixed steps before the next physics writeback
/// keep the flags it produced.
pub fn rapier_collision_flags(
    mut q_climbers: Query<
        (&mut MotorStatus, &KinematicCharacterControllerOutput),
        (With<ClimbingMotor>, Changed<KinematicCharacterControllerOutput>),
    >,
) {
    for (mut status, output) in &mut q_climbers {
        let mut flags = CollisionFlags::NONE;
        if output.grounded {
            flags |= CollisionFlags::BELOW;
        }
        for collision in &output.collisions {
            let normal = collision
                .hit
                .details
                .map(|d| d.normal1)
                .unwrap_or(-collision.translation_remaining.normalize_or_zero());
            flags |= CollisionFlags::from_contact_normal(normal);
        }
        status.collision_flags = flags;
    }
}

type ClimberComponents<'a> = (
    Entity,
    &'a mut ClimbingMotor,
    &'a ClimbingConfig,
    &'a ClimbIntent,
    &'a MotorStatus,
    &'a mut ClimbingSkill,
    &'a mut FallState,
    &'a mut Transform,
    Option<&'a Submersion>,
    Option<&'a Collider>,
    Option<&'a CollisionGroups>,
    Option<&'a mut KinematicCharacterController>,
    Has<Levitating>,
    Has<Riding>,
);

/// Rapier-specific climbing system.
///
/// Builds the body from the transform and capsule collider, runs the motor
/// tick against the Rapier query pipeline, then applies the displacement and
/// publishes the tick's events.
///
/// Displacements add up on the controller's pending translation, so every
/// fixed step since the last physics writeback moves the character.
pub fn rapier_climbing_motor(
    rapier_context: ReadRapierContext,
    time: Res<Time<Fixed>>,
    mut rng: ResMut<ClimbingRng>,
    q_bodies: Query<Option<&RigidBody>>,
    mut q_climbers: Query<ClimberComponents>,
    mut messages: EventWriter<ClimbingModeMessage>,
    mut ejects: EventWriter<WallEjectEvent>,
) {
    let Ok(context) = rapier_context.single() else {
        return;
    };

    let dt = Some(time.delta_secs())
        .filter(|&d| d > 0.0)
        .unwrap_or(1.0 / 60.0);
    let is_environment = |entity: Entity| q_bodies.get(entity).is_ok_and(is_environment_body);

    for (
        entity,
        mut motor,
        config,
        intent,
        status,
        mut skill,
        mut fall,
        mut transform,
        submersion,
        collider,
        groups,
        controller,
        levitating,
        riding,
    ) in &mut q_climbers
    {
        let mut query = RapierSpatialQuery::new(&context, entity, is_environment);
        if let Some(groups) = groups {
            query = query.with_groups(*groups);
        }

        let mut body = ClimberBody::from_config(transform.translation, transform.forward().as_vec3(), config);
        if let Some((center, height, radius)) = collider.and_then(capsule_dimensions) {
            body.center = transform.rotation * center;
            body = body.with_dimensions(height, radius);
        }

        let mut env = ClimbEnvironment {
            query: &query,
            config,
            intent: *intent,
            collision_flags: status.collision_flags,
            speed: status.speed,
            body,
            levitating,
            riding,
            submersion: submersion.copied().unwrap_or_default(),
            skill: &mut *skill,
            roller: &mut *rng,
            fall: &mut *fall,
            dt,
        };
        let tick = motor.tick(&mut env);

        if let Some(displacement) = tick.displacement {
            match controller {
                // Several fixed steps can run before physics applies the move
                Some(mut controller) => {
                    let pending = controller.translation.unwrap_or_default();
                    controller.translation = Some(pending + displacement);
                }
                None => transform.translation += displacement,
            }
        }

        publish_tick(entity, &tick, &motor, &mut messages, &mut ejects);
    }
}

/// Bundle of Rapier3D components for a climbing character.
///
/// Climbing characters are moved kinematically: the climbing system hands
/// each tick's displacement to the [`KinematicCharacterController`], and the
/// controller's reported collisions become the motor's collision flags.
///
/// This bundle does not include a collider; add a capsule so the wall probe
/// matches the body:
///
/// ```ignore
/// commands.spawn((
///     Transform::from_xyz(0.0, 1.0, 0.0),
///     ClimbingMotor::default(),
///     ClimbingConfig::advanced(),
///     ClimbIntent::default(),
///     MotorStatus::default(),
///     ClimbingSkill::new(40),
///     FallState::default(),
///     Rapier3dClimberBundle::new(),
///     Collider::capsule_y(0.55, 0.35),
/// ));
/// ```
#[derive(Bundle)]
pub struct Rapier3dClimberBundle {
    /// Kinematic body moved by the character controller.
    pub rigid_body: RigidBody,
    /// Move primitive for climbing displacements.
    pub controller: KinematicCharacterController,
}

impl Default for Rapier3dClimberBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl Rapier3dClimberBundle {
    /// Create a bundle with a default character controller.
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::KinematicPositionBased,
            controller: KinematicCharacterController::default(),
        }
    }

    /// Builder: use a custom character controller (offset, slopes, autostep).
    pub fn with_controller(mut self, controller: KinematicCharacterController) -> Self {
        self.controller = controller;
        self
    }
}
