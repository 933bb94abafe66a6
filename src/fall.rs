//! Fall state shared with the gravity system.
//!
//! The climbing motor does not own falling. It reads whether the character is
//! falling (to tell an airborne grasp from a standing start), mirrors its
//! slipping state into the falling flag, and borrows the gravity
//! accumulation while slipping down a wall.

use bevy::prelude::*;

/// Narrow interface to the fall/gravity collaborator.
pub trait FallSystem {
    /// Whether the character is currently falling.
    fn is_falling(&self) -> bool;

    /// Overwrite the falling flag.
    fn set_falling(&mut self, falling: bool);

    /// Start tracking a fall from `height` if one is not already in progress.
    fn check_init_fall(&mut self, height: f32);

    /// Accumulate one tick of gravity into a move-direction buffer (units/second).
    fn apply_gravity(&mut self, move_direction: &mut Vec3, dt: f32);
}

/// Default fall state used when no dedicated fall system is present.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct FallState {
    /// Whether the character is falling.
    pub falling: bool,
    /// Height where the current fall started.
    pub fall_start_height: f32,
    /// Downward acceleration (units/second^2).
    pub gravity: f32,
    /// Maximum downward speed (units/second).
    pub terminal_velocity: f32,
}

impl Default for FallState {
    fn default() -> Self {
        Self {
            falling: false,
            fall_start_height: 0.0,
            gravity: 20.0,
            terminal_velocity: 50.0,
        }
    }
}

impl FallState {
    /// Builder: set gravity.
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder: start already falling (e.g. when testing airborne grasps).
    pub fn falling_from(mut self, height: f32) -> Self {
        self.falling = true;
        self.fall_start_height = height;
        self
    }

    /// Distance fallen so far from the recorded start height.
    pub fn fall_distance(&self, height: f32) -> f32 {
        if self.falling {
            (self.fall_start_height - height).max(0.0)
        } else {
            0.0
        }
    }
}

impl FallSystem for FallState {
    fn is_falling(&self) -> bool {
        self.falling
    }

    fn set_falling(&mut self, falling: bool) {
        self.falling = falling;
    }

    fn check_init_fall(&mut self, height: f32) {
        if !self.falling {
            self.fall_start_height = height;
        }
    }

    fn apply_gravity(&mut self, move_direction: &mut Vec3, dt: f32) {
        move_direction.y = (move_direction.y - self.gravity * dt).max(-self.terminal_velocity);
    }
}
