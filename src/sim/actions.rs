//! Discrete event handlers
//!
//! Input intents and contact notifications applied between frames. Every
//! `can_*` predicate is side-effect free; calling the matching action when
//! its predicate is false is a no-op that returns `false`.

use super::skills::SkillKind;
use super::state::{PowerupKind, RunEvent, RunState};
use super::track::{Contact, ContactKind};
use crate::consts::LANE_COUNT;
use crate::platform::input::Intent;
use crate::tuning::Tuning;

/// Lane change direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneDirection {
    Left,
    Right,
}

impl LaneDirection {
    fn offset(self) -> i16 {
        match self {
            LaneDirection::Left => -1,
            LaneDirection::Right => 1,
        }
    }
}

/// Gameplay input is accepted only in a live, unpaused run
pub fn accepts_input(state: &RunState) -> bool {
    state.is_playing && !state.is_paused
}

pub fn can_change_lane(state: &RunState, direction: LaneDirection) -> bool {
    if !accepts_input(state) {
        return false;
    }
    match direction {
        LaneDirection::Left => state.lane > 0,
        LaneDirection::Right => state.lane + 1 < LANE_COUNT,
    }
}

pub fn can_jump(state: &RunState, tuning: &Tuning) -> bool {
    accepts_input(state) && state.jump_count < 1 && state.is_grounded(tuning)
}

pub fn can_super_jump(state: &RunState, tuning: &Tuning) -> bool {
    can_jump(state, tuning) && state.skill_ready(SkillKind::SuperJump)
}

pub fn can_dash(state: &RunState) -> bool {
    accepts_input(state) && !state.is_dashing && state.skill_ready(SkillKind::Dash)
}

/// Move one lane left or right, clamped to the track
pub fn request_lane_change(state: &mut RunState, direction: LaneDirection) -> bool {
    if !can_change_lane(state, direction) {
        return false;
    }
    let lane = (state.lane as i16 + direction.offset()).clamp(0, LANE_COUNT as i16 - 1);
    state.lane = lane as u8;
    true
}

pub fn request_jump(state: &mut RunState, tuning: &Tuning) -> bool {
    if !can_jump(state, tuning) {
        return false;
    }
    state.vertical_velocity = tuning.jump_force;
    state.jump_count = 1;
    state.run_stats.jumps += 1;
    state.push_event(RunEvent::Jumped);
    true
}

pub fn request_super_jump(state: &mut RunState, tuning: &Tuning) -> bool {
    if !can_super_jump(state, tuning) {
        return false;
    }
    state.vertical_velocity = tuning.jump_force * tuning.super_jump_multiplier;
    state.jump_count = 1;
    state.doing_super_jump = true;
    state.skills.activate(SkillKind::SuperJump);
    state.run_stats.jumps += 1;
    state.push_event(RunEvent::SuperJumped);
    true
}

pub fn request_dash(state: &mut RunState, tuning: &Tuning) -> bool {
    if !can_dash(state) {
        return false;
    }
    state.is_dashing = true;
    state.dash_remaining = tuning.dash_duration;
    state.skills.activate(SkillKind::Dash);
    state.run_stats.dashes += 1;
    state.push_event(RunEvent::Dashed);
    true
}

/// Pause or resume a live run
///
/// Resuming shifts `start_time` forward by the paused span so the speed
/// curve keeps measuring play time.
pub fn toggle_pause(state: &mut RunState, now: f64) -> bool {
    if !state.is_playing {
        return false;
    }
    if state.is_paused {
        if let Some(paused_at) = state.paused_at.take() {
            state.start_time += (now - paused_at).max(0.0);
        }
        state.is_paused = false;
        state.last_update = now;
        state.push_event(RunEvent::Resumed);
    } else {
        state.is_paused = true;
        state.paused_at = Some(now);
        state.push_event(RunEvent::Paused);
    }
    true
}

/// Route an already-classified intent to its handler
pub fn apply_intent(state: &mut RunState, intent: Intent, now: f64, tuning: &Tuning) -> bool {
    match intent {
        Intent::LaneLeft => request_lane_change(state, LaneDirection::Left),
        Intent::LaneRight => request_lane_change(state, LaneDirection::Right),
        Intent::Jump => request_jump(state, tuning),
        Intent::SuperJump => request_super_jump(state, tuning),
        Intent::Dash => request_dash(state, tuning),
        Intent::PauseToggle => toggle_pause(state, now),
    }
}

/// The player touched an obstacle
///
/// Ignored while invincible. A shield absorbs the hit and grants a short
/// grace window; otherwise a life is lost and losing the last one ends the run.
pub fn on_obstacle_contact(state: &mut RunState, tuning: &Tuning) -> bool {
    if !state.is_playing || state.is_invincible() {
        return false;
    }

    if state.has_shield {
        state.has_shield = false;
        state.invincibility_remaining = tuning.shield_grace;
        state.push_event(RunEvent::ShieldBroken);
        log::debug!("Shield absorbed a hit");
        return true;
    }

    state.lives = state.lives.saturating_sub(1);
    state.invincibility_remaining = tuning.hit_grace;
    state.push_event(RunEvent::Hit {
        lives_left: state.lives,
    });
    log::debug!("Hit! {} lives left", state.lives);

    if state.lives == 0 {
        state.is_playing = false;
        state.is_dashing = false;
        state.dash_remaining = 0.0;
        state.push_event(RunEvent::GameOver);
    }
    true
}

/// The player collected a power-up
///
/// A speed power-up while a boost is already running refreshes the boost
/// window instead of stacking another increase.
pub fn on_powerup_contact(state: &mut RunState, kind: PowerupKind, tuning: &Tuning) -> bool {
    if !state.is_playing {
        return false;
    }
    match kind {
        PowerupKind::Speed => {
            state.score += tuning.speed_bonus_score;
            state.speed_boost_remaining = tuning.speed_boost_duration;
        }
        PowerupKind::Shield => {
            state.has_shield = true;
        }
        PowerupKind::Life => {
            state.lives = state.lives.saturating_add(1).min(state.max_lives);
        }
    }
    state.run_stats.powerups_collected += 1;
    state.push_event(RunEvent::PowerupCollected(kind));
    true
}

pub fn on_collectible_contact(state: &mut RunState, tuning: &Tuning) -> bool {
    if !state.is_playing {
        return false;
    }
    state.run_stats.collectibles_collected += 1;
    state.score += tuning.collectible_score;
    state.push_event(RunEvent::CollectibleCollected);
    true
}

/// An obstacle went past the player without contact
pub fn on_obstacle_passed(state: &mut RunState) -> bool {
    if !state.is_playing {
        return false;
    }
    state.run_stats.obstacles_dodged += 1;
    true
}

/// Apply a contact notification from the track
pub fn apply_contact(state: &mut RunState, contact: Contact, tuning: &Tuning) -> bool {
    match contact.kind {
        ContactKind::Obstacle => on_obstacle_contact(state, tuning),
        ContactKind::Powerup(kind) => on_powerup_contact(state, kind, tuning),
        ContactKind::Collectible => on_collectible_contact(state, tuning),
        ContactKind::ObstaclePassed => on_obstacle_passed(state),
    }
}
