//! Climbing configuration components.
//!
//! This module defines the tunables of the climbing motor: check frequencies,
//! base success chances, probe distances, and the body dimensions used when
//! no collider can be inspected.

use bevy::prelude::*;

/// Configuration parameters for wall climbing.
///
/// Check frequencies are expressed in abstract time units. A frequency is
/// turned into a real-time threshold by multiplying it with
/// [`ClimbingConfig::timer_unit`].
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ClimbingConfig {
    // === Mode ===
    /// Advanced climbing: crouch/jump detaches, strafing and corner wrapping
    /// are enabled. When false, releasing forward detaches and the character
    /// only climbs straight up.
    pub advanced_climbing: bool,

    // === Scheduling ===
    /// Seconds per abstract time unit.
    pub timer_unit: f32,
    /// Time units before a standing climb starts.
    pub start_frequency: f32,
    /// Time units before an airborne grasp is attempted.
    pub airborne_start_frequency: f32,
    /// Time units between continue-climbing checks on a firm grip.
    pub continue_frequency: f32,
    /// Time units between regain-hold checks while slipping.
    pub regain_frequency: f32,

    // === Skill Checks (percent) ===
    /// Minimum chance to catch a wall while falling.
    pub grasp_wall_chance: u32,
    /// Minimum chance to keep a firm grip.
    pub continue_climb_chance: u32,
    /// Minimum chance to regain hold while slipping.
    pub regain_hold_chance: u32,

    // === Start Tolerances ===
    /// Horizontal drift allowed before a standing climb starts.
    pub start_tolerance: f32,
    /// Horizontal drift allowed before an airborne grasp starts.
    pub airborne_start_tolerance: f32,

    // === Probes ===
    /// Capsule cast distance when looking for the climbed wall.
    pub wall_probe_distance: f32,
    /// Ray distance used to detect the wall directly ahead (advanced mode).
    pub ahead_probe_distance: f32,
    /// Extra reach beyond the body radius for the adjacent wall search.
    pub corner_search_margin: f32,
    /// Maximum number of rays cast by one adjacent wall search.
    pub corner_search_attempts: u32,
    /// Distance between the strafe ray origin and the wall intersection under
    /// which the character is considered to be at an outside corner.
    pub outside_corner_tolerance: f32,
    /// Fraction of the body height below the center where the probe capsule starts.
    pub probe_capsule_offset: f32,

    // === Body (fallbacks when no collider is available) ===
    /// Body height.
    pub body_height: f32,
    /// Body radius.
    pub body_radius: f32,
    /// Offset from the transform origin to the body center.
    pub body_center: Vec3,

    // === Water ===
    /// Distance from the bottom of the body to the point treated as the feet
    /// when testing whether the character is standing in water.
    pub water_foot_margin: f32,
}

impl Default for ClimbingConfig {
    fn default() -> Self {
        Self {
            advanced_climbing: false,

            timer_unit: 0.055,
            start_frequency: 14.0,
            airborne_start_frequency: 5.0,
            continue_frequency: 15.0,
            regain_frequency: 5.0,

            grasp_wall_chance: 50,
            continue_climb_chance: 70,
            regain_hold_chance: 20,

            start_tolerance: 0.12,
            airborne_start_tolerance: 0.90,

            wall_probe_distance: 0.20,
            ahead_probe_distance: 0.3,
            corner_search_margin: 0.5,
            corner_search_attempts: 3,
            outside_corner_tolerance: 0.01,
            probe_capsule_offset: 0.40,

            body_height: 1.8,
            body_radius: 0.35,
            body_center: Vec3::ZERO,

            water_foot_margin: 0.25,
        }
    }
}

impl ClimbingConfig {
    /// Simple climbing: hold forward to climb straight up.
    pub fn simple() -> Self {
        Self::default()
    }

    /// Advanced climbing: free movement on the wall with corner wrapping.
    pub fn advanced() -> Self {
        Self {
            advanced_climbing: true,
            ..default()
        }
    }

    /// Real-time threshold (seconds) before the next start attempt.
    #[inline]
    pub fn start_threshold(&self, airborne_grasp: bool) -> f32 {
        let frequency = if airborne_grasp {
            self.airborne_start_frequency
        } else {
            self.start_frequency
        };
        self.timer_unit * frequency
    }

    /// Real-time threshold (seconds) before the next grip check.
    #[inline]
    pub fn continue_threshold(&self, slipping: bool) -> f32 {
        let frequency = if slipping {
            self.regain_frequency
        } else {
            self.continue_frequency
        };
        self.timer_unit * frequency
    }

    /// Horizontal drift allowed before climbing starts.
    #[inline]
    pub fn drift_tolerance(&self, airborne_grasp: bool) -> f32 {
        if airborne_grasp {
            self.airborne_start_tolerance
        } else {
            self.start_tolerance
        }
    }

    /// Builder: toggle advanced climbing.
    pub fn with_advanced_climbing(mut self, enabled: bool) -> Self {
        self.advanced_climbing = enabled;
        self
    }

    /// Builder: set seconds per time unit.
    pub fn with_timer_unit(mut self, seconds: f32) -> Self {
        self.timer_unit = seconds;
        self
    }

    /// Builder: set the base chances (grasp, continue, regain).
    pub fn with_chances(mut self, grasp: u32, continue_climb: u32, regain: u32) -> Self {
        self.grasp_wall_chance = grasp.min(100);
        self.continue_climb_chance = continue_climb.min(100);
        self.regain_hold_chance = regain.min(100);
        self
    }

    /// Builder: set the fallback body dimensions.
    pub fn with_body(mut self, height: f32, radius: f32) -> Self {
        self.body_height = height;
        self.body_radius = radius;
        self
    }

    /// Builder: set the adjacent wall search reach and attempt cap.
    pub fn with_corner_search(mut self, margin: f32, attempts: u32) -> Self {
        self.corner_search_margin = margin;
        self.corner_search_attempts = attempts;
        self
    }
}

/// Geometry of the climbing body for one tick.
///
/// Built by the backend from the transform and collider each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimberBody {
    /// Transform position.
    pub position: Vec3,
    /// Facing direction (used to find a wall when none is known yet).
    pub forward: Vec3,
    /// Offset from position to the body center.
    pub center: Vec3,
    /// Full body height.
    pub height: f32,
    /// Body radius.
    pub radius: f32,
}

impl ClimberBody {
    /// Build a body from the config fallbacks.
    pub fn from_config(position: Vec3, forward: Vec3, config: &ClimbingConfig) -> Self {
        Self {
            position,
            forward: forward.normalize_or_zero(),
            center: config.body_center,
            height: config.body_height,
            radius: config.body_radius,
        }
    }

    /// Builder: override the dimensions (e.g. from a capsule collider).
    pub fn with_dimensions(mut self, height: f32, radius: f32) -> Self {
        self.height = height;
        self.radius = radius;
        self
    }

    /// Height of the feet used by the submersion test.
    #[inline]
    pub fn foot_height(&self, config: &ClimbingConfig) -> f32 {
        self.position.y - self.height / 2.0 - config.water_foot_margin
    }
}
