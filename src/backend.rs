//! Physics backend abstraction.
//!
//! This module defines the spatial queries the climbing motor needs and the
//! trait that physics backends implement to plug into the climbing
//! controller. This allows easy swapping between physics engines (Rapier3D,
//! custom collision worlds, etc.).

use bevy::prelude::*;

use crate::collision::CollisionData;

/// Shape and ray casts against the environment.
///
/// The climbing motor only ever talks to physics through this trait, so it
/// can run against any collision world (including a mock in tests).
pub trait SpatialQuery {
    /// Sweep a capsule and return the first hit.
    ///
    /// # Arguments
    /// * `origin` - Center of the capsule's bottom sphere
    /// * `axis` - Vector from the bottom sphere center to the top sphere center
    /// * `radius` - Capsule radius
    /// * `direction` - Cast direction (normalized)
    /// * `max_distance` - Maximum cast distance
    fn cast_capsule(
        &self,
        origin: Vec3,
        axis: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<CollisionData>;

    /// Cast a ray and return the first hit.
    ///
    /// # Arguments
    /// * `origin` - Ray origin
    /// * `direction` - Ray direction (normalized)
    /// * `max_distance` - Maximum cast distance
    fn cast_ray(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<CollisionData>;
}

/// Trait for physics backend implementations.
///
/// A backend owns the per-tick climbing system: it builds a [`SpatialQuery`]
/// from its physics world, runs [`ClimbingMotor::tick`](crate::motor::ClimbingMotor::tick)
/// for every climber, applies the resulting displacement with its move
/// primitive, and writes the resulting [`CollisionFlags`](crate::collision::CollisionFlags)
/// back into [`MotorStatus`](crate::state::MotorStatus).
///
/// # Example
///
/// For an example implementation, see the `rapier` module's `Rapier3dBackend`.
pub trait ClimbingPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;
}

/// Backend that registers no systems.
///
/// Useful when the climbing motor is driven by hand (custom physics, tests).
pub struct NoOpBackend;

impl ClimbingPhysicsBackend for NoOpBackend {
    fn plugin() -> impl Plugin {
        NoOpBackendPlugin
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}
