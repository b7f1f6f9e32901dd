//! Skill cooldown registry
//!
//! A skill may be activated only when its cooldown is zero; activation
//! resets the cooldown to the skill's configured duration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Skills with a cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillKind {
    Dash,
    SuperJump,
}

impl SkillKind {
    pub const ALL: [SkillKind; 2] = [SkillKind::Dash, SkillKind::SuperJump];

    /// DOM-facing name (`skill-dash`, `skill-superJump`)
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillKind::Dash => "dash",
            SkillKind::SuperJump => "superJump",
        }
    }
}

/// Cooldown state of one skill (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub cooldown_remaining: f32,
    pub duration: f32,
}

impl Skill {
    pub fn new(duration: f32) -> Self {
        Self {
            cooldown_remaining: 0.0,
            duration,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_remaining <= 0.0
    }

    /// Fraction of the cooldown still remaining (1.0 = just used)
    pub fn cooldown_fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            0.0
        } else {
            (self.cooldown_remaining / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// All skills for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBook {
    skills: BTreeMap<SkillKind, Skill>,
}

impl SkillBook {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let mut skills = BTreeMap::new();
        skills.insert(SkillKind::Dash, Skill::new(tuning.dash_cooldown));
        skills.insert(SkillKind::SuperJump, Skill::new(tuning.super_jump_cooldown));
        Self { skills }
    }

    pub fn get(&self, kind: SkillKind) -> Option<&Skill> {
        self.skills.get(&kind)
    }

    /// Unregistered skills are never ready
    pub fn is_ready(&self, kind: SkillKind) -> bool {
        self.skills.get(&kind).is_some_and(Skill::is_ready)
    }

    /// Start the cooldown of a skill
    pub fn activate(&mut self, kind: SkillKind) {
        if let Some(skill) = self.skills.get_mut(&kind) {
            skill.cooldown_remaining = skill.duration;
        }
    }

    /// Count every cooldown down by `dt`, clamped at zero.
    /// Returns true if any skill became ready this step.
    pub fn tick(&mut self, dt: f32) -> bool {
        let mut became_ready = false;
        for skill in self.skills.values_mut() {
            if skill.cooldown_remaining > 0.0 {
                skill.cooldown_remaining = (skill.cooldown_remaining - dt).max(0.0);
                became_ready |= skill.cooldown_remaining == 0.0;
            }
        }
        became_ready
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillKind, &Skill)> {
        self.skills.iter().map(|(k, s)| (*k, s))
    }
}
