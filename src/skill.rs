//! Climbing skill checks.
//!
//! A skill check rolls a percentile die against a success chance that starts
//! at a base value and interpolates toward 100 as the climbing skill grows.
//! Every check counts as one use of the skill for progression.

use bevy::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Lowest skill value used in the success interpolation.
pub const MIN_EFFECTIVE_SKILL: i32 = 5;
/// Highest skill value used in the success interpolation.
pub const MAX_EFFECTIVE_SKILL: i32 = 95;

/// Climbing skill record read from the progression system.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct ClimbingSkill {
    /// Current (live) climbing skill value.
    pub live_value: i32,
    /// Flat bonus granted by the character's race.
    pub racial_bonus: i32,
    /// Enhanced climbing effect: doubles effective skill and climb speed.
    pub enhanced_climbing: bool,
    /// Number of checks made with this skill since the progression system
    /// last drained the counter.
    pub uses: u32,
}

impl Default for ClimbingSkill {
    fn default() -> Self {
        Self {
            live_value: 25,
            racial_bonus: 0,
            enhanced_climbing: false,
            uses: 0,
        }
    }
}

impl ClimbingSkill {
    /// Create a skill record with the given live value.
    pub fn new(live_value: i32) -> Self {
        Self {
            live_value,
            ..default()
        }
    }

    /// Builder: set the racial bonus.
    pub fn with_racial_bonus(mut self, bonus: i32) -> Self {
        self.racial_bonus = bonus;
        self
    }

    /// Builder: set the enhanced climbing effect.
    pub fn with_enhanced_climbing(mut self, enhanced: bool) -> Self {
        self.enhanced_climbing = enhanced;
        self
    }

    /// Skill value after racial bonus and enhanced climbing, before clamping.
    pub fn effective_value(&self) -> i32 {
        let skill = self.live_value + self.racial_bonus;
        if self.enhanced_climbing {
            skill * 2
        } else {
            skill
        }
    }

    /// Multiplier applied to climbing speed.
    #[inline]
    pub fn climbing_boost(&self) -> f32 {
        if self.enhanced_climbing {
            2.0
        } else {
            1.0
        }
    }

    /// Record one use of the skill.
    pub fn tally(&mut self) {
        self.uses = self.uses.saturating_add(1);
    }

    /// Take the pending use count, resetting it to zero.
    pub fn drain_uses(&mut self) -> u32 {
        std::mem::take(&mut self.uses)
    }
}

/// Chance (0-100) to pass a check with the given base chance and skill.
///
/// The skill is clamped to `[MIN_EFFECTIVE_SKILL, MAX_EFFECTIVE_SKILL]` and
/// linearly interpolates the chance from `base` toward 100.
pub fn success_chance(base: u32, skill: i32) -> f32 {
    let base = base.min(100) as f32;
    let t = skill.clamp(MIN_EFFECTIVE_SKILL, MAX_EFFECTIVE_SKILL) as f32 * 0.01;
    base + (100.0 - base) * t
}

/// Source of percentile rolls (uniform integers in `1..=100`).
pub trait PercentileRoll {
    /// Roll a value in `1..=100`.
    fn roll_percent(&mut self) -> u32;
}

/// Random number generator used for climbing skill checks.
///
/// Seed it explicitly for reproducible simulations.
#[derive(Resource, Debug, Clone)]
pub struct ClimbingRng(pub ChaCha8Rng);

impl Default for ClimbingRng {
    fn default() -> Self {
        Self::seeded(rand::random())
    }
}

impl ClimbingRng {
    /// Create a generator from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl PercentileRoll for ClimbingRng {
    fn roll_percent(&mut self) -> u32 {
        self.0.random_range(1..=100)
    }
}

/// Water surface near the character, from the environment.
///
/// A failed skill check is ignored while the feet are below the surface:
/// the water is treated as holding the climber up.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Submersion {
    /// World height of the water surface, if there is water here.
    pub water_surface: Option<f32>,
}

impl Submersion {
    /// Water surface at the given height.
    pub fn at(water_surface: f32) -> Self {
        Self {
            water_surface: Some(water_surface),
        }
    }

    /// Whether feet at the given height are underwater.
    pub fn feet_submerged(&self, foot_height: f32) -> bool {
        self.water_surface
            .is_some_and(|surface| foot_height < surface)
    }
}

/// Outcome of a single skill check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillCheck {
    /// Base chance of the check.
    pub base: u32,
    /// Interpolated success chance.
    pub chance: f32,
    /// Percentile rolled.
    pub roll: u32,
    /// Whether the check passed.
    pub passed: bool,
    /// The roll failed but submersion turned it into a pass.
    pub water_override: bool,
}

/// Run a climbing skill check.
///
/// Tallies one use of the skill, rolls, and applies the submersion override
/// when the roll fails with the feet underwater.
pub fn skill_check<R: PercentileRoll + ?Sized>(
    base: u32,
    skill: &mut ClimbingSkill,
    roller: &mut R,
    feet_submerged: bool,
) -> SkillCheck {
    skill.tally();

    let chance = success_chance(base, skill.effective_value());
    let roll = roller.roll_percent();
    let rolled_pass = chance >= roll as f32;
    let water_override = !rolled_pass && feet_submerged;

    SkillCheck {
        base,
        chance,
        roll,
        passed: rolled_pass || water_override,
        water_override,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FixedRolls;

    #[test]
    fn skill_is_clamped_before_interpolation() {
        assert_eq!(success_chance(50, -40), success_chance(50, MIN_EFFECTIVE_SKILL));
        assert_eq!(success_chance(50, 400), success_chance(50, MAX_EFFECTIVE_SKILL));
        assert!((success_chance(50, 0) - 52.5).abs() < 1e-4);
        assert!((success_chance(50, 100) - 97.5).abs() < 1e-4);
    }

    #[test]
    fn chance_is_monotonic_in_skill() {
        for base in [0, 20, 50, 70, 100] {
            let mut previous = success_chance(base, -10);
            for skill in -10..=120 {
                let chance = success_chance(base, skill);
                assert!(chance >= previous, "base {base}, skill {skill}");
                previous = chance;
            }
        }
    }

    #[test]
    fn chance_interpolates_linearly() {
        // Halfway skill covers half the distance from base to 100
        assert!((success_chance(20, 50) - 60.0).abs() < 1e-4);
        assert!((success_chance(70, 50) - 85.0).abs() < 1e-4);
        assert!((success_chance(70, 95) - 98.5).abs() < 1e-4);
    }

    #[test]
    fn base_hundred_always_succeeds() {
        let mut skill = ClimbingSkill::new(5);
        let mut rolls = FixedRolls::new([100, 1, 57, 100]);
        for _ in 0..4 {
            assert!(skill_check(100, &mut skill, &mut rolls, false).passed);
        }
    }

    #[test]
    fn check_fails_when_roll_exceeds_chance() {
        let mut skill = ClimbingSkill::new(0);
        // Skill clamps to 5: chance = 20 + 80 * 0.05 = 24
        let mut rolls = FixedRolls::new([24, 25]);
        let pass = skill_check(20, &mut skill, &mut rolls, false);
        assert!(pass.passed);
        let fail = skill_check(20, &mut skill, &mut rolls, false);
        assert!(!fail.passed);
        assert!(!fail.water_override);
    }

    #[test]
    fn every_check_tallies_a_use() {
        let mut skill = ClimbingSkill::new(40);
        let mut rolls = FixedRolls::new([1, 100, 50]);
        for _ in 0..3 {
            skill_check(50, &mut skill, &mut rolls, false);
        }
        assert_eq!(skill.uses, 3);
        assert_eq!(skill.drain_uses(), 3);
        assert_eq!(skill.uses, 0);
    }

    #[test]
    fn submersion_overrides_failed_roll() {
        let mut skill = ClimbingSkill::new(5);
        let mut rolls = FixedRolls::new([100]);
        let check = skill_check(20, &mut skill, &mut rolls, true);
        assert!(check.passed);
        assert!(check.water_override);
    }

    #[test]
    fn submersion_does_not_mark_passed_rolls() {
        let mut skill = ClimbingSkill::new(5);
        let mut rolls = FixedRolls::new([1]);
        let check = skill_check(20, &mut skill, &mut rolls, true);
        assert!(check.passed);
        assert!(!check.water_override);
    }

    #[test]
    fn feet_above_and_below_water() {
        let water = Submersion::at(1.0);
        assert!(water.feet_submerged(0.5));
        assert!(!water.feet_submerged(1.0));
        assert!(!water.feet_submerged(2.0));
        assert!(!Submersion::default().feet_submerged(-100.0));
    }

    #[test]
    fn racial_bonus_and_enhanced_climbing_raise_skill() {
        let skill = ClimbingSkill::new(20).with_racial_bonus(30);
        assert_eq!(skill.effective_value(), 50);

        let enhanced = skill.with_enhanced_climbing(true);
        assert_eq!(enhanced.effective_value(), 100);
        assert_eq!(enhanced.climbing_boost(), 2.0);
        assert_eq!(skill.climbing_boost(), 1.0);
    }

    #[test]
    fn seeded_rng_rolls_in_range_and_repeats() {
        let mut a = ClimbingRng::seeded(7);
        let mut b = ClimbingRng::seeded(7);
        for _ in 0..200 {
            let roll = a.roll_percent();
            assert!((1..=100).contains(&roll));
            assert_eq!(roll, b.roll_percent());
        }
    }
}
