//! Climbing intent component.
//!
//! Intents represent the buttons the player (or AI) is holding this tick.
//! Input polling lives outside this crate: fill a [`ClimbIntent`] from
//! whatever input source you use and the climbing motor reads it.

use bevy::prelude::*;

/// Held movement actions relevant to climbing.
///
/// Every action is an independent boolean, so opposite directions may be
/// held at the same time (right wins over left when strafing).
///
/// # Example
///
/// ```rust
/// use msg_climbing_controller::prelude::*;
///
/// let mut intent = ClimbIntent::new();
/// intent.set_forward(true);
/// assert!(intent.has_movement());
///
/// intent.clear();
/// assert!(!intent.has_movement());
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[reflect(Component)]
pub struct ClimbIntent {
    /// Move forwards (into the wall / up the wall).
    pub forward: bool,
    /// Move backwards (down the wall).
    pub backward: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// Crouch action.
    pub crouch: bool,
    /// Jump action.
    pub jump: bool,
}

impl ClimbIntent {
    /// Create a new intent with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intent holding only forward.
    pub fn forward() -> Self {
        Self {
            forward: true,
            ..default()
        }
    }

    /// Set the forward action.
    pub fn set_forward(&mut self, held: bool) {
        self.forward = held;
    }

    /// Set the backward action.
    pub fn set_backward(&mut self, held: bool) {
        self.backward = held;
    }

    /// Set the left strafe action.
    pub fn set_left(&mut self, held: bool) {
        self.left = held;
    }

    /// Set the right strafe action.
    pub fn set_right(&mut self, held: bool) {
        self.right = held;
    }

    /// Set the crouch action.
    pub fn set_crouch(&mut self, held: bool) {
        self.crouch = held;
    }

    /// Set the jump action.
    pub fn set_jump(&mut self, held: bool) {
        self.jump = held;
    }

    /// Builder: hold a strafe direction (`true` = right, `false` = left).
    pub fn with_strafe(mut self, right: bool) -> Self {
        self.right = right;
        self.left = !right;
        self
    }

    /// Release every action.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check if any of the four movement directions is held.
    pub fn has_movement(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    /// Check if a strafe direction is held.
    pub fn is_strafing(&self) -> bool {
        self.left || self.right
    }

    /// Check whether the detach input for the given mode is active.
    ///
    /// Advanced climbing detaches on crouch or jump; simple climbing detaches
    /// as soon as forward is released.
    pub fn wants_detach(&self, advanced_climbing: bool) -> bool {
        if advanced_climbing {
            self.crouch || self.jump
        } else {
            !self.forward
        }
    }
}
