//! Climbing state and marker components.
//!
//! [`ClimbState`] is the three-valued grip state owned by the climbing motor.
//! The marker components mirror it (and the collaborator flags the motor
//! reads) so other systems can filter on them in queries.

use std::fmt;

use bevy::prelude::*;

use crate::collision::CollisionFlags;

/// Grip state of a climber.
///
/// `Climbing` and `Slipping` both count as attached to the wall; `Slipping`
/// is a degraded grip that must be regained before climbing input is honored
/// again.
#[derive(Reflect, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ClimbState {
    /// Not attached to a wall.
    #[default]
    NotClimbing,
    /// Firm grip.
    Climbing,
    /// Attached but losing grip; gravity drives the body.
    Slipping,
}

impl ClimbState {
    /// Attached to a wall (firm or slipping).
    #[inline]
    pub fn is_attached(&self) -> bool {
        !matches!(self, Self::NotClimbing)
    }

    /// Degraded grip.
    #[inline]
    pub fn is_slipping(&self) -> bool {
        matches!(self, Self::Slipping)
    }

    /// The `(is_climbing, is_slipping)` flag pair for this state.
    pub fn flags(&self) -> (bool, bool) {
        match self {
            Self::NotClimbing => (false, false),
            Self::Climbing => (true, false),
            Self::Slipping => (true, true),
        }
    }
}

/// Error returned when a flag pair claims slipping without climbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidClimbFlags;

impl fmt::Display for InvalidClimbFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("slipping requires climbing to be set")
    }
}

impl std::error::Error for InvalidClimbFlags {}

impl TryFrom<(bool, bool)> for ClimbState {
    type Error = InvalidClimbFlags;

    fn try_from((climbing, slipping): (bool, bool)) -> Result<Self, Self::Error> {
        match (climbing, slipping) {
            (false, false) => Ok(Self::NotClimbing),
            (true, false) => Ok(Self::Climbing),
            (true, true) => Ok(Self::Slipping),
            (false, true) => Err(InvalidClimbFlags),
        }
    }
}

/// Movement controller status read (and partially written) by the climbing motor.
///
/// The general movement controller owns this component. The climbing backend
/// writes `collision_flags` back after it moves a climbing body.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct MotorStatus {
    /// Current movement speed (units/second).
    pub speed: f32,
    /// Contacts reported by the last move.
    pub collision_flags: CollisionFlags,
}

impl Default for MotorStatus {
    fn default() -> Self {
        Self {
            speed: 3.0,
            collision_flags: CollisionFlags::NONE,
        }
    }
}

impl MotorStatus {
    /// Create a status with the given speed and no contacts.
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            ..default()
        }
    }

    /// Builder: set the collision flags.
    pub fn with_flags(mut self, flags: CollisionFlags) -> Self {
        self.collision_flags = flags;
        self
    }

    /// Check if touching something on the sides.
    pub fn touching_sides(&self) -> bool {
        self.collision_flags.contains(CollisionFlags::SIDES)
    }

    /// Check if touching something below.
    pub fn touching_below(&self) -> bool {
        self.collision_flags.contains(CollisionFlags::BELOW)
    }
}

/// Marker component indicating the character is attached to a wall.
///
/// Present for both a firm grip and a slipping grip.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Climbing;

/// Marker component indicating the character is losing its grip.
///
/// Always accompanied by [`Climbing`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Slipping;

/// Marker component present for the single tick after the player jumped or
/// crouched off a wall in advanced climbing mode.
///
/// Contains the direction away from the wall that was let go.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct WallEjected {
    /// Horizontal direction pointing out of the wall.
    pub away_from_wall: Vec3,
}

impl Default for WallEjected {
    fn default() -> Self {
        Self {
            away_from_wall: Vec3::NEG_Z,
        }
    }
}

/// Marker set by the levitation system while the character levitates.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Levitating;

/// Marker set while the character rides a mount.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Riding;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climb_state_default_is_not_climbing() {
        assert_eq!(ClimbState::default(), ClimbState::NotClimbing);
        assert!(!ClimbState::default().is_attached());
    }

    #[test]
    fn slipping_counts_as_attached() {
        assert!(ClimbState::Climbing.is_attached());
        assert!(ClimbState::Slipping.is_attached());
        assert!(ClimbState::Slipping.is_slipping());
        assert!(!ClimbState::Climbing.is_slipping());
    }

    #[test]
    fn flag_pairs_convert_both_ways() {
        for state in [ClimbState::NotClimbing, ClimbState::Climbing, ClimbState::Slipping] {
            assert_eq!(ClimbState::try_from(state.flags()), Ok(state));
        }
    }

    #[test]
    fn slipping_without_climbing_is_rejected() {
        let result = ClimbState::try_from((false, true));
        assert_eq!(result, Err(InvalidClimbFlags));
        assert_eq!(
            InvalidClimbFlags.to_string(),
            "slipping requires climbing to be set"
        );
    }

    #[test]
    fn motor_status_contacts() {
        let status = MotorStatus::new(3.0).with_flags(CollisionFlags::SIDES);
        assert!(status.touching_sides());
        assert!(!status.touching_below());

        let landed = status.with_flags(CollisionFlags::SIDES | CollisionFlags::BELOW);
        assert!(landed.touching_below());
    }

    #[test]
    fn wall_ejected_default() {
        let ejected = WallEjected::default();
        assert_eq!(ejected.away_from_wall, Vec3::NEG_Z);
    }
}
