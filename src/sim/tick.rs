//! Per-frame simulation step
//!
//! Advances the continuous part of the run: speed and score, vertical
//! motion, and every countdown. Discrete input and contact handlers live in
//! `actions`.

use super::state::{RunEvent, RunState};
use crate::tuning::Tuning;

/// Advance the run by one rendered frame
///
/// `now` is the absolute clock in seconds, `dt` the frame delta in seconds.
/// Does nothing while paused or after the run has ended.
pub fn tick(state: &mut RunState, now: f64, dt: f32, tuning: &Tuning) {
    if !state.is_playing || state.is_paused {
        return;
    }
    let dt = dt.max(0.0);

    update_speed_and_score(state, now, dt, tuning);
    integrate_vertical(state, dt, tuning);
    update_timers(state, dt);

    state.last_update = now;
}

/// Forward speed as a function of elapsed play time
///
/// Depends only on the clock, so any split of the same span into frames
/// gives the same curve.
pub fn speed_at(elapsed: f64, effective_base: f32, max_speed: f32, tuning: &Tuning) -> f32 {
    let ramp = (elapsed / tuning.speed_ramp_divisor as f64) as f32;
    (effective_base + ramp).min(max_speed).max(effective_base.min(max_speed))
}

fn update_speed_and_score(state: &mut RunState, now: f64, dt: f32, tuning: &Tuning) {
    let effective_base = state.effective_base_speed(tuning);
    state.speed = speed_at(state.elapsed(now), effective_base, state.max_speed, tuning);
    state.score += (state.speed * dt * tuning.score_factor).floor() as u64;
    state.distance += state.speed * dt;
}

/// Semi-implicit Euler under constant gravity, landing snaps to the ground
fn integrate_vertical(state: &mut RunState, dt: f32, tuning: &Tuning) {
    let ground = tuning.ground_height;
    if state.vertical_position <= ground && state.vertical_velocity == 0.0 {
        return;
    }

    state.vertical_velocity += tuning.gravity * dt;
    state.vertical_position += state.vertical_velocity * dt;

    if state.vertical_position <= ground {
        state.vertical_position = ground;
        state.vertical_velocity = 0.0;
        state.jump_count = 0;
        state.doing_super_jump = false;
        state.push_event(RunEvent::Landed);
    }
}

fn update_timers(state: &mut RunState, dt: f32) {
    if state.skills.tick(dt) {
        state.push_event(RunEvent::SkillReady);
    }

    state.invincibility_remaining = (state.invincibility_remaining - dt).max(0.0);

    if state.dash_remaining > 0.0 {
        state.dash_remaining = (state.dash_remaining - dt).max(0.0);
        if state.dash_remaining == 0.0 {
            state.is_dashing = false;
        }
    }

    state.speed_boost_remaining = (state.speed_boost_remaining - dt).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actions::{request_dash, request_jump};
    use crate::sim::skills::SkillKind;
    use proptest::prelude::*;

    fn run(tuning: &Tuning) -> RunState {
        RunState::new(0.0, tuning)
    }

    /// Drive the state from `from` to `to` in `frames` equal steps, ending exactly on `to`
    fn advance(state: &mut RunState, tuning: &Tuning, from: f64, to: f64, frames: u32) {
        let mut prev = from;
        for i in 1..=frames {
            let now = if i == frames {
                to
            } else {
                from + (to - from) * i as f64 / frames as f64
            };
            tick(state, now, (now - prev) as f32, tuning);
            prev = now;
        }
    }

    #[test]
    fn score_after_single_frame_matches_closed_form() {
        let tuning = Tuning::default();
        let mut state = run(&tuning);
        tick(&mut state, 2.5, 2.5, &tuning);

        let speed = tuning.base_speed + 2.5 / tuning.speed_ramp_divisor;
        assert!((state.speed - speed).abs() < 1e-5);
        let expected = (state.speed * 2.5 * tuning.score_factor).floor() as u64;
        assert_eq!(state.score, expected);
        assert_eq!(state.score, 192);
    }

    #[test]
    fn speed_saturates_at_max() {
        let tuning = Tuning::default();
        let mut state = run(&tuning);
        tick(&mut state, 10_000.0, 0.016, &tuning);
        assert_eq!(state.speed, tuning.max_speed);
    }

    #[test]
    fn paused_run_does_not_advance() {
        let tuning = Tuning::default();
        let mut state = run(&tuning);
        state.is_paused = true;
        tick(&mut state, 1.0, 1.0, &tuning);
        assert_eq!(state.score, 0);
        assert_eq!(state.last_update, 0.0);
    }

    #[test]
    fn jump_arc_lands_and_resets() {
        let tuning = Tuning::default();
        let mut state = run(&tuning);
        assert!(request_jump(&mut state, &tuning));

        let mut now = 0.0;
        let mut peak = state.vertical_position;
        for _ in 0..120 {
            now += 1.0 / 60.0;
            tick(&mut state, now, 1.0 / 60.0, &tuning);
            peak = peak.max(state.vertical_position);
        }

        // apex ~ v^2 / 2g above the ground
        assert!(peak > tuning.ground_height + 1.5);
        assert_eq!(state.vertical_position, tuning.ground_height);
        assert_eq!(state.vertical_velocity, 0.0);
        assert_eq!(state.jump_count, 0);
        assert!(state.drain_events().contains(&RunEvent::Landed));
    }

    #[test]
    fn dash_flag_clears_after_duration() {
        let tuning = Tuning::default();
        let mut state = run(&tuning);
        assert!(request_dash(&mut state, &tuning));
        assert!(state.is_dashing);

        tick(&mut state, 0.2, 0.2, &tuning);
        assert!(state.is_dashing);
        tick(&mut state, 0.4, 0.2, &tuning);
        assert!(!state.is_dashing);
        // cooldown still running
        assert!(!state.skill_ready(SkillKind::Dash));
    }

    #[test]
    fn invincibility_counts_down_to_zero() {
        let tuning = Tuning::default();
        let mut state = run(&tuning);
        state.invincibility_remaining = 0.5;
        tick(&mut state, 0.3, 0.3, &tuning);
        assert!((state.invincibility_remaining - 0.2).abs() < 1e-6);
        tick(&mut state, 0.6, 0.3, &tuning);
        assert_eq!(state.invincibility_remaining, 0.0);
    }

    #[test]
    fn speed_boost_expires_inside_the_frame_loop() {
        let tuning = Tuning::default();
        let mut state = run(&tuning);
        state.speed_boost_remaining = tuning.speed_boost_duration;
        tick(&mut state, 1.0, 1.0, &tuning);
        assert!(state.speed > tuning.base_speed + tuning.speed_boost_amount);

        advance(&mut state, &tuning, 1.0, 7.0, 60);
        assert_eq!(state.speed_boost_remaining, 0.0);
        assert_eq!(state.effective_base_speed(&tuning), tuning.base_speed);
    }

    proptest! {
        #[test]
        fn speed_is_independent_of_frame_split(
            total in 0.1f64..60.0,
            frames_a in 1u32..200,
            frames_b in 1u32..200,
        ) {
            let tuning = Tuning::default();
            let mut a = run(&tuning);
            let mut b = run(&tuning);
            advance(&mut a, &tuning, 0.0, total, frames_a);
            advance(&mut b, &tuning, 0.0, total, frames_b);
            prop_assert_eq!(a.speed, b.speed);
        }

        #[test]
        fn speed_stays_in_bounds_and_never_drops(
            deltas in proptest::collection::vec(0.0f32..0.1, 1..300),
        ) {
            let tuning = Tuning::default();
            let mut state = run(&tuning);
            let mut now = 0.0f64;
            let mut last = state.speed;
            for dt in deltas {
                now += dt as f64;
                tick(&mut state, now, dt, &tuning);
                prop_assert!(state.speed >= tuning.base_speed);
                prop_assert!(state.speed <= tuning.max_speed);
                prop_assert!(state.speed >= last);
                last = state.speed;
            }
        }
    }
}
