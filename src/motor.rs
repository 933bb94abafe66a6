//! Climbing state machine.
//!
//! [`ClimbingMotor`] owns the grip state of one climber. Every tick it:
//!
//! 1. Decides whether to abort (detach input, lost side contact, levitation,
//!    riding, slipping onto the ground, or drifting before the grip took).
//! 2. Otherwise schedules the start attempt and, once attached, the periodic
//!    grip checks that may turn a firm grip into a slip and back.
//! 3. If attached, refreshes the climbed wall and resolves the movement.
//!
//! All collaborators are passed in through [`ClimbEnvironment`], so the motor
//! runs the same against a physics backend or a test world.

use bevy::prelude::*;

use crate::backend::SpatialQuery;
use crate::collision::CollisionFlags;
use crate::config::{ClimberBody, ClimbingConfig};
use crate::detection::{CornerContext, WallContact};
use crate::fall::FallSystem;
use crate::geometry::horizontal;
use crate::intent::ClimbIntent;
use crate::movement::{resolve_climb_movement, MovementInput};
use crate::probe::probe_climbed_wall;
use crate::skill::{skill_check, ClimbingSkill, PercentileRoll, Submersion};
use crate::state::ClimbState;

/// Why a climb was aborted (or prevented from starting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AbortReason {
    /// The detach input for the configured mode is active.
    Input,
    /// Nothing is touching the character's sides.
    NoSideContact,
    /// The character is levitating.
    Levitating,
    /// The character is riding a mount.
    Riding,
    /// The character slipped down onto the ground.
    SlippedToGround,
    /// The character moved horizontally before the grip took.
    Drifted,
}

/// Everything the motor reads and writes during one tick.
pub struct ClimbEnvironment<'a> {
    /// Collision world used by the probes.
    pub query: &'a dyn SpatialQuery,
    /// Climbing tunables.
    pub config: &'a ClimbingConfig,
    /// Held input.
    pub intent: ClimbIntent,
    /// Contacts reported by the last move.
    pub collision_flags: CollisionFlags,
    /// Movement speed (units/second).
    pub speed: f32,
    /// Body geometry this tick.
    pub body: ClimberBody,
    /// Levitation is active.
    pub levitating: bool,
    /// Riding a mount.
    pub riding: bool,
    /// Water surface around the character.
    pub submersion: Submersion,
    /// Climbing skill record; every check tallies a use.
    pub skill: &'a mut ClimbingSkill,
    /// Percentile die for skill checks.
    pub roller: &'a mut dyn PercentileRoll,
    /// Fall collaborator; its falling flag mirrors the slipping state.
    pub fall: &'a mut dyn FallSystem,
    /// Elapsed time (seconds).
    pub dt: f32,
}

/// Result of one motor tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClimbTick {
    /// Displacement to apply with the move primitive, if attached.
    pub displacement: Option<Vec3>,
    /// The character was pushed off the wall by input this tick.
    pub wall_eject: bool,
    /// A climb started this tick.
    pub started: bool,
    /// The climbing mode notification should be shown.
    pub show_message: bool,
    /// The climb was aborted this tick.
    pub aborted: Option<AbortReason>,
}

/// Wall climbing state of one character.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct ClimbingMotor {
    state: ClimbState,
    climbing_start_timer: f32,
    climbing_continue_timer: f32,
    show_climbing_mode_message: bool,
    last_horizontal_position: Vec2,
    contact: WallContact,
    corner: CornerContext,
    move_direction: Vec3,
    wall_eject: bool,
}

impl Default for ClimbingMotor {
    fn default() -> Self {
        Self {
            state: ClimbState::NotClimbing,
            climbing_start_timer: 0.0,
            climbing_continue_timer: 0.0,
            show_climbing_mode_message: true,
            last_horizontal_position: Vec2::ZERO,
            contact: WallContact::default(),
            corner: CornerContext::default(),
            move_direction: Vec3::ZERO,
            wall_eject: false,
        }
    }
}

impl ClimbingMotor {
    /// Current grip state.
    #[inline]
    pub fn state(&self) -> ClimbState {
        self.state
    }

    /// Attached to a wall (firm or slipping).
    #[inline]
    pub fn is_climbing(&self) -> bool {
        self.state.is_attached()
    }

    /// Attached but slipping.
    #[inline]
    pub fn is_slipping(&self) -> bool {
        self.state.is_slipping()
    }

    /// The character was pushed off the wall by input on the last tick.
    #[inline]
    pub fn wall_eject(&self) -> bool {
        self.wall_eject
    }

    /// Direction into the climbed wall (zero before the first wall is found).
    pub fn ledge_direction(&self) -> Vec3 {
        self.contact.ledge_direction
    }

    /// Currently wrapping around an outside corner.
    pub fn at_outside_corner(&self) -> bool {
        self.corner.at_outside_corner
    }

    /// The climbed wall.
    pub fn contact(&self) -> &WallContact {
        &self.contact
    }

    /// Corner information gathered while strafing.
    pub fn corner(&self) -> &CornerContext {
        &self.corner
    }

    /// Velocity buffer from the last attached tick.
    pub fn move_direction(&self) -> Vec3 {
        self.move_direction
    }

    /// Horizontal position the start drift is measured from.
    pub fn last_horizontal_position(&self) -> Vec2 {
        self.last_horizontal_position
    }

    /// Advance the state machine by one tick.
    pub fn tick(&mut self, env: &mut ClimbEnvironment<'_>) -> ClimbTick {
        let mut outcome = ClimbTick::default();

        // One-tick signal
        self.wall_eject = false;

        let airborne_grasp = !self.state.is_attached() && env.fall.is_falling();
        let horizontal_position = horizontal(env.body.position);

        if let Some(reason) = self.abort_reason(env, airborne_grasp, horizontal_position) {
            self.abort(reason, env.config, horizontal_position);
            outcome.aborted = Some(reason);
        } else {
            self.schedule_start(env, airborne_grasp, &mut outcome);
            if self.state.is_attached() {
                self.schedule_continue(env);
            }
        }

        if self.state.is_attached() {
            probe_climbed_wall(env.query, &env.body, env.config, &mut self.contact, &self.corner);

            let climbing_boost = env.skill.climbing_boost();
            let input = MovementInput {
                query: env.query,
                config: env.config,
                body: &env.body,
                intent: env.intent,
                speed: env.speed,
                climbing_boost,
            };
            let displacement = resolve_climb_movement(
                &input,
                self.state,
                &mut self.contact,
                &mut self.corner,
                &mut self.move_direction,
                &mut *env.fall,
                env.dt,
            );
            env.fall.set_falling(self.state.is_slipping());
            outcome.displacement = Some(displacement);
        }

        outcome.wall_eject = self.wall_eject;
        outcome
    }

    fn abort_reason(
        &self,
        env: &ClimbEnvironment<'_>,
        airborne_grasp: bool,
        horizontal_position: Vec2,
    ) -> Option<AbortReason> {
        let flags = env.collision_flags;
        let drift = self.last_horizontal_position.distance(horizontal_position);

        if env.intent.wants_detach(env.config.advanced_climbing) {
            Some(AbortReason::Input)
        } else if !flags.contains(CollisionFlags::SIDES) {
            Some(AbortReason::NoSideContact)
        } else if env.levitating {
            Some(AbortReason::Levitating)
        } else if env.riding {
            Some(AbortReason::Riding)
        } else if self.state.is_slipping() && flags.contains(CollisionFlags::BELOW) {
            Some(AbortReason::SlippedToGround)
        } else if !self.state.is_attached() && drift > env.config.drift_tolerance(airborne_grasp) {
            Some(AbortReason::Drifted)
        } else {
            None
        }
    }

    fn abort(&mut self, reason: AbortReason, config: &ClimbingConfig, horizontal_position: Vec2) {
        if self.state.is_attached() {
            if reason == AbortReason::Input && config.advanced_climbing {
                self.wall_eject = true;
            }
            debug!("climbing aborted: {reason:?}");
        }

        self.state = ClimbState::NotClimbing;
        self.corner.clear();
        self.show_climbing_mode_message = true;
        self.climbing_start_timer = 0.0;
        self.climbing_continue_timer = 0.0;

        // Drift is measured from here next time
        self.last_horizontal_position = horizontal_position;
    }

    fn schedule_start(
        &mut self,
        env: &mut ClimbEnvironment<'_>,
        airborne_grasp: bool,
        outcome: &mut ClimbTick,
    ) {
        if self.climbing_start_timer <= env.config.start_threshold(airborne_grasp) {
            self.climbing_start_timer += env.dt;
            return;
        }

        if !airborne_grasp {
            self.start_climbing(outcome);
            return;
        }

        let feet_submerged = env
            .submersion
            .feet_submerged(env.body.foot_height(env.config));
        let check = skill_check(
            env.config.grasp_wall_chance,
            &mut *env.skill,
            &mut *env.roller,
            feet_submerged,
        );
        if check.passed {
            self.start_climbing(outcome);
        } else {
            debug!(
                "missed the wall: rolled {} against {:.1}",
                check.roll, check.chance
            );
            self.climbing_start_timer = 0.0;
        }
    }

    fn start_climbing(&mut self, outcome: &mut ClimbTick) {
        if self.state.is_attached() {
            return;
        }
        if self.show_climbing_mode_message {
            outcome.show_message = true;
        }
        // Shown at most once per attempt
        self.show_climbing_mode_message = false;
        self.state = ClimbState::Climbing;
        outcome.started = true;
        debug!("climbing started");
    }

    fn schedule_continue(&mut self, env: &mut ClimbEnvironment<'_>) {
        let slipping = self.state.is_slipping();
        if self.climbing_continue_timer <= env.config.continue_threshold(slipping) {
            self.climbing_continue_timer += env.dt;
            return;
        }
        self.climbing_continue_timer = 0.0;

        let feet_submerged = env
            .submersion
            .feet_submerged(env.body.foot_height(env.config));

        if !env.intent.has_movement() {
            // Holding still keeps the grip
            if slipping {
                debug!("grip steadied");
            }
            self.state = ClimbState::Climbing;
        } else if slipping {
            let check = skill_check(
                env.config.regain_hold_chance,
                &mut *env.skill,
                &mut *env.roller,
                feet_submerged,
            );
            if check.passed {
                debug!("regained hold");
                self.state = ClimbState::Climbing;
            }
        } else {
            let check = skill_check(
                env.config.continue_climb_chance,
                &mut *env.skill,
                &mut *env.roller,
                feet_submerged,
            );
            if !check.passed {
                debug!("lost grip: rolled {} against {:.1}", check.roll, check.chance);
                self.state = ClimbState::Slipping;
            }
        }
    }
}
