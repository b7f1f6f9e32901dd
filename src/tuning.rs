//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. The defaults are the shipped
//! balance; a partial JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning override
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// Gameplay balance values
///
/// Times are in seconds, distances in world units, speeds in units/second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Vertical motion ===
    /// Gravity acceleration (negative = down)
    pub gravity: f32,
    /// Initial vertical velocity of a normal jump
    pub jump_force: f32,
    /// Multiplier applied to `jump_force` for a super jump
    pub super_jump_multiplier: f32,
    /// Resting height of the player's center
    pub ground_height: f32,

    // === Speed & score ===
    /// Starting forward speed
    pub base_speed: f32,
    /// Forward speed ceiling
    pub max_speed: f32,
    /// Seconds of play per +1 speed
    pub speed_ramp_divisor: f32,
    /// Score per unit of distance travelled
    pub score_factor: f32,

    // === Skills ===
    /// Dash skill cooldown
    pub dash_cooldown: f32,
    /// How long the dashing flag stays set
    pub dash_duration: f32,
    /// Super-jump skill cooldown
    pub super_jump_cooldown: f32,

    // === Lives & damage ===
    pub starting_lives: u8,
    pub max_lives: u8,
    /// Invincibility after losing a life
    pub hit_grace: f32,
    /// Invincibility after a shield absorbs a hit
    pub shield_grace: f32,

    // === Pickups ===
    /// Score bonus for a speed power-up
    pub speed_bonus_score: u64,
    /// Base-speed increase while a speed boost is active
    pub speed_boost_amount: f32,
    /// How long a speed boost lasts
    pub speed_boost_duration: f32,
    /// Score bonus for a collectible
    pub collectible_score: u64,

    // === Track ===
    /// Lane spacing in world units
    pub lane_width: f32,
    /// Distance between spawn slots
    pub spawn_spacing: f32,
    /// How far ahead of the player objects appear
    pub spawn_distance: f32,
    /// Distance travelled before the zone changes
    pub zone_length: f32,
    /// Relative weight of obstacle spawns
    pub obstacle_weight: u32,
    /// Relative weight of power-up spawns
    pub powerup_weight: u32,
    /// Relative weight of collectible spawns
    pub collectible_weight: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: -30.0,
            jump_force: 10.0,
            super_jump_multiplier: 1.5,
            ground_height: 0.5,

            base_speed: 7.0,
            max_speed: 30.0,
            speed_ramp_divisor: 3.5,
            score_factor: 10.0,

            dash_cooldown: 5.0,
            dash_duration: 0.3,
            super_jump_cooldown: 3.0,

            starting_lives: 3,
            max_lives: 5,
            hit_grace: 2.0,
            shield_grace: 1.0,

            speed_bonus_score: 500,
            speed_boost_amount: 1.0,
            speed_boost_duration: 5.0,
            collectible_score: 50,

            lane_width: 4.0,
            spawn_spacing: 18.0,
            spawn_distance: 120.0,
            zone_length: 600.0,
            obstacle_weight: 70,
            powerup_weight: 10,
            collectible_weight: 20,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override on top of the defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the run-state invariants
    ///
    /// Comparisons are written so NaN fails them.
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.gravity < 0.0) {
            return Err(TuningError::Invalid("gravity must be negative"));
        }
        if !(self.jump_force > 0.0) {
            return Err(TuningError::Invalid("jump force must be positive"));
        }
        if !(self.super_jump_multiplier >= 1.0) {
            return Err(TuningError::Invalid("super jump multiplier must be >= 1"));
        }
        if !(self.base_speed > 0.0 && self.max_speed >= self.base_speed) {
            return Err(TuningError::Invalid("max_speed must be >= base_speed > 0"));
        }
        if !(self.speed_ramp_divisor > 0.0) {
            return Err(TuningError::Invalid("speed_ramp_divisor must be positive"));
        }
        if !(self.dash_cooldown >= 0.0 && self.super_jump_cooldown >= 0.0) {
            return Err(TuningError::Invalid("skill cooldowns must not be negative"));
        }
        if !(self.dash_duration >= 0.0) {
            return Err(TuningError::Invalid("dash_duration must not be negative"));
        }
        if self.starting_lives == 0 || self.starting_lives > self.max_lives {
            return Err(TuningError::Invalid("starting_lives must be in 1..=max_lives"));
        }
        if !(self.hit_grace > 0.0 && self.shield_grace > 0.0) {
            return Err(TuningError::Invalid("grace windows must be positive"));
        }
        if !(self.speed_boost_amount >= 0.0 && self.speed_boost_duration >= 0.0) {
            return Err(TuningError::Invalid("speed boost must not be negative"));
        }
        if !(self.lane_width > 0.0) {
            return Err(TuningError::Invalid("lane_width must be positive"));
        }
        if !(self.spawn_spacing > 0.0 && self.zone_length > 0.0 && self.spawn_distance >= 0.0) {
            return Err(TuningError::Invalid("track distances must be positive"));
        }
        if self.total_spawn_weight() == 0 {
            return Err(TuningError::Invalid("spawn weights must not all be zero"));
        }
        Ok(())
    }

    /// Sum of the spawn category weights (cannot overflow)
    pub fn total_spawn_weight(&self) -> u64 {
        u64::from(self.obstacle_weight)
            + u64::from(self.powerup_weight)
            + u64::from(self.collectible_weight)
    }

    /// Apply an optional override, keeping the defaults when it is unusable
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning override");
                tuning
            }
            Err(e) => {
                log::warn!("{e}, using default tuning");
                Self::default()
            }
        }
    }

    /// Seconds of play after which speed saturates at `max_speed` (no boost)
    pub fn saturation_time(&self) -> f32 {
        (self.max_speed - self.base_speed) * self.speed_ramp_divisor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let tuning = Tuning::from_json(r#"{ "jump_force": 12.0, "max_lives": 4 }"#).unwrap();
        assert_eq!(tuning.jump_force, 12.0);
        assert_eq!(tuning.max_lives, 4);
        assert_eq!(tuning.gravity, Tuning::default().gravity);
    }

    #[test]
    fn rejects_positive_gravity() {
        let err = Tuning::from_json(r#"{ "gravity": 5.0 }"#).unwrap_err();
        assert!(matches!(err, TuningError::Invalid(_)));
    }

    fn rejected(json: &str) -> &'static str {
        match Tuning::from_json(json) {
            Err(TuningError::Invalid(reason)) => reason,
            other => panic!("{json} was not rejected: {other:?}"),
        }
    }

    #[test]
    fn rejects_each_broken_field() {
        assert_eq!(rejected(r#"{ "jump_force": 0.0 }"#), "jump force must be positive");
        assert_eq!(
            rejected(r#"{ "super_jump_multiplier": 0.5 }"#),
            "super jump multiplier must be >= 1"
        );
        assert_eq!(
            rejected(r#"{ "dash_cooldown": -1.0 }"#),
            "skill cooldowns must not be negative"
        );
        assert_eq!(
            rejected(r#"{ "super_jump_cooldown": -0.5 }"#),
            "skill cooldowns must not be negative"
        );
        assert_eq!(
            rejected(r#"{ "dash_duration": -0.3 }"#),
            "dash_duration must not be negative"
        );
        assert_eq!(
            rejected(r#"{ "speed_boost_amount": -2.0 }"#),
            "speed boost must not be negative"
        );
        assert_eq!(rejected(r#"{ "lane_width": 0.0 }"#), "lane_width must be positive");
        assert_eq!(
            rejected(r#"{ "spawn_distance": -10.0 }"#),
            "track distances must be positive"
        );
        assert_eq!(
            rejected(r#"{ "obstacle_weight": 0, "powerup_weight": 0, "collectible_weight": 0 }"#),
            "spawn weights must not all be zero"
        );
    }

    #[test]
    fn huge_spawn_weights_do_not_overflow() {
        let json = r#"{ "obstacle_weight": 4000000000, "powerup_weight": 4000000000 }"#;
        let tuning = Tuning::load_or_default(Some(json));
        assert_eq!(tuning.obstacle_weight, 4_000_000_000);
        assert_eq!(tuning.total_spawn_weight(), 8_000_000_020);
    }

    #[test]
    fn rejects_garbage() {
        let err = Tuning::from_json("not json").unwrap_err();
        assert!(matches!(err, TuningError::Parse(_)));
    }

    #[test]
    fn unusable_override_falls_back() {
        assert_eq!(Tuning::load_or_default(None), Tuning::default());
        assert_eq!(
            Tuning::load_or_default(Some(r#"{ "max_lives": 0 }"#)),
            Tuning::default()
        );
        assert_eq!(
            Tuning::load_or_default(Some(r#"{ "base_speed": 9.0 }"#)).base_speed,
            9.0
        );
    }

    #[test]
    fn saturation_time_matches_ramp() {
        let tuning = Tuning::default();
        // (30 - 7) * 3.5
        assert!((tuning.saturation_time() - 80.5).abs() < 1e-4);
    }
}
