//! Run state and core simulation types
//!
//! Everything the renderer and HUD read each frame lives on [`RunState`].

use serde::{Deserialize, Serialize};

use super::skills::{SkillBook, SkillKind};
use crate::consts::{LANE_COUNT, START_LANE};
use crate::tuning::Tuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    Speed,
    Shield,
    Life,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 3] = [PowerupKind::Speed, PowerupKind::Shield, PowerupKind::Life];
}

/// Per-run counters, read at run end for the summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub jumps: u32,
    pub dashes: u32,
    pub powerups_collected: u32,
    pub obstacles_dodged: u32,
    pub collectibles_collected: u32,
}

/// One-shot signals for presentation (sound, flavor text, particles)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEvent {
    Jumped,
    SuperJumped,
    Dashed,
    Landed,
    ShieldBroken,
    Hit { lives_left: u8 },
    PowerupCollected(PowerupKind),
    CollectibleCollected,
    SkillReady,
    Paused,
    Resumed,
    GameOver,
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub is_playing: bool,
    pub is_paused: bool,

    pub score: u64,
    /// Current forward speed, derived from elapsed play time
    pub speed: f32,
    /// Unboosted base speed
    pub base_speed: f32,
    pub max_speed: f32,
    /// Seconds left on the active speed boost (0 = none)
    pub speed_boost_remaining: f32,

    /// Height of the player's center
    pub vertical_position: f32,
    pub vertical_velocity: f32,
    pub jump_count: u8,
    /// Set by a super jump, cleared on landing (trick animation)
    pub doing_super_jump: bool,

    pub lane: u8,

    pub lives: u8,
    pub max_lives: u8,
    pub invincibility_remaining: f32,
    pub has_shield: bool,

    pub is_dashing: bool,
    pub dash_remaining: f32,

    pub skills: SkillBook,
    pub run_stats: RunStats,

    /// Clock value (seconds) the run started at, shifted forward by pauses
    pub start_time: f64,
    /// Clock value when the current pause began
    pub paused_at: Option<f64>,
    /// Clock value of the most recent update
    pub last_update: f64,

    /// Distance travelled (drives the track spawner)
    pub distance: f32,

    /// Pending presentation events (drained by the session each frame)
    #[serde(skip)]
    pub events: Vec<RunEvent>,
}

impl RunState {
    /// Create a fresh run starting at clock value `now`
    pub fn new(now: f64, tuning: &Tuning) -> Self {
        Self {
            is_playing: true,
            is_paused: false,
            score: 0,
            speed: tuning.base_speed,
            base_speed: tuning.base_speed,
            max_speed: tuning.max_speed,
            speed_boost_remaining: 0.0,
            vertical_position: tuning.ground_height,
            vertical_velocity: 0.0,
            jump_count: 0,
            doing_super_jump: false,
            lane: START_LANE,
            lives: tuning.starting_lives.min(tuning.max_lives),
            max_lives: tuning.max_lives,
            invincibility_remaining: 0.0,
            has_shield: false,
            is_dashing: false,
            dash_remaining: 0.0,
            skills: SkillBook::from_tuning(tuning),
            run_stats: RunStats::default(),
            start_time: now,
            paused_at: None,
            last_update: now,
            distance: 0.0,
            events: Vec::new(),
        }
    }

    /// Base speed including an active speed boost
    pub fn effective_base_speed(&self, tuning: &Tuning) -> f32 {
        if self.speed_boost_remaining > 0.0 {
            (self.base_speed + tuning.speed_boost_amount).min(self.max_speed)
        } else {
            self.base_speed
        }
    }

    /// Seconds of play since the run started (pauses excluded)
    pub fn elapsed(&self, now: f64) -> f64 {
        let end = self.paused_at.unwrap_or(now);
        (end - self.start_time).max(0.0)
    }

    /// On the ground (not rising or falling)
    pub fn is_grounded(&self, tuning: &Tuning) -> bool {
        self.vertical_position <= tuning.ground_height
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_remaining > 0.0
    }

    /// Whether the avatar should be hidden this frame (blink while invincible)
    pub fn blink_hidden(&self) -> bool {
        self.is_invincible() && ((self.invincibility_remaining * 10.0) as u32) % 2 == 1
    }

    pub fn skill_ready(&self, kind: SkillKind) -> bool {
        self.skills.is_ready(kind)
    }

    /// Lane index is always valid
    pub fn lane_is_valid(&self) -> bool {
        self.lane < LANE_COUNT
    }

    pub fn push_event(&mut self, event: RunEvent) {
        self.events.push(event);
    }

    /// Take all pending presentation events
    pub fn drain_events(&mut self) -> Vec<RunEvent> {
        std::mem::take(&mut self.events)
    }
}
