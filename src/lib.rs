//! # `msg_climbing_controller`
//!
//! Wall climbing for a 3D first-person character controller, with physics
//! backend abstraction.
//!
//! This crate decides, tick by tick, whether a character grips a wall, whether
//! the grip holds or slips, how the body moves while attached, and how it
//! wraps around wall corners while strafing:
//! - Start/continue/slip/abort state machine with real-time check windows
//! - Percentile skill checks driven by a progression skill value
//! - Capsule and ray probes to track the climbed wall and find the next face
//! - Corner wrapping based on line intersection of the two wall faces
//! - Abstracts the physics backend for easy swapping (Rapier3D included)
//!
//! ## Architecture
//!
//! Every collaborator (input, fall state, levitation, skill storage, the
//! physics world) is handed to [`ClimbingMotor::tick`](motor::ClimbingMotor::tick)
//! through a [`ClimbEnvironment`](motor::ClimbEnvironment). The motor:
//! 1. Checks the abort conditions against the last move's collision flags
//! 2. Schedules the start attempt and the periodic grip checks
//! 3. Probes the climbed wall and resolves the displacement for this tick
//!
//! The backend applies the displacement with its move primitive and writes
//! the resulting collision flags back into [`MotorStatus`](state::MotorStatus).
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_climbing_controller::prelude::*;
//!
//! // Components for a climbing character
//! let motor = ClimbingMotor::default();
//! let config = ClimbingConfig::advanced();
//! let intent = ClimbIntent::forward();
//! let skill = ClimbingSkill::new(40).with_racial_bonus(30);
//!
//! // These can be spawned together with the character's physics components
//! ```

use bevy::prelude::*;

pub mod backend;
pub mod collision;
pub mod config;
pub mod detection;
pub mod fall;
pub mod geometry;
pub mod intent;
pub mod motor;
pub mod movement;
pub mod probe;
pub mod skill;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier3d")]
pub mod rapier;

#[cfg(test)]
pub(crate) mod test_support;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::backend::{ClimbingPhysicsBackend, NoOpBackend, SpatialQuery};
    pub use crate::collision::{CollisionData, CollisionFlags};
    pub use crate::config::{ClimberBody, ClimbingConfig};
    pub use crate::fall::{FallState, FallSystem};
    pub use crate::intent::ClimbIntent;
    pub use crate::motor::{AbortReason, ClimbEnvironment, ClimbTick, ClimbingMotor};
    pub use crate::skill::{ClimbingRng, ClimbingSkill, PercentileRoll, Submersion};
    pub use crate::state::{
        ClimbState, Climbing, Levitating, MotorStatus, Riding, Slipping, WallEjected,
    };
    pub use crate::systems::{ClimbingModeMessage, WallEjectEvent};
    pub use crate::{ClimbingControllerPlugin, ClimbingControllerSet};

    #[cfg(feature = "rapier3d")]
    pub use crate::rapier::Rapier3dBackend;
}

/// System sets for the climbing controller, run in `FixedUpdate` in this order.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum ClimbingControllerSet {
    /// Backend sensors: write collision flags from the last move.
    Sensors,
    /// Climbing motor tick and movement application.
    Motor,
    /// Marker components mirroring the motor state.
    Markers,
}

/// Main plugin for the climbing controller.
///
/// This plugin is generic over a physics backend `B` which provides the
/// spatial queries and the move primitive.
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier3dBackend`)
///
/// # Examples
///
/// With Rapier3D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier3d::prelude::*;
/// use msg_climbing_controller::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(ClimbingControllerPlugin::<Rapier3dBackend>::default())
///     .run();
/// ```
pub struct ClimbingControllerPlugin<B: backend::ClimbingPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::ClimbingPhysicsBackend> Default for ClimbingControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::ClimbingPhysicsBackend> Plugin for ClimbingControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::ClimbingConfig>();
        app.register_type::<intent::ClimbIntent>();
        app.register_type::<motor::ClimbingMotor>();
        app.register_type::<skill::ClimbingSkill>();
        app.register_type::<skill::Submersion>();
        app.register_type::<fall::FallState>();
        app.register_type::<state::MotorStatus>();
        app.register_type::<state::Climbing>();
        app.register_type::<state::Slipping>();
        app.register_type::<state::WallEjected>();
        app.register_type::<state::Levitating>();
        app.register_type::<state::Riding>();

        app.add_event::<systems::ClimbingModeMessage>();
        app.add_event::<systems::WallEjectEvent>();

        // Keeps a seed the app inserted before adding the plugin
        app.init_resource::<skill::ClimbingRng>();

        app.configure_sets(
            FixedUpdate,
            (
                ClimbingControllerSet::Sensors,
                ClimbingControllerSet::Motor,
                ClimbingControllerSet::Markers,
            )
                .chain(),
        );

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.add_systems(
            FixedUpdate,
            systems::sync_state_markers.in_set(ClimbingControllerSet::Markers),
        );
    }
}
