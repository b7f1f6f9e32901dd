//! Game session
//!
//! Owns one run (state + track) together with the tuning, settings and the
//! key-value store, and routes frames, intents and contacts into the
//! simulation. Restarting replaces the whole run, so nothing from a previous
//! run can leak into the next one.

use serde::Serialize;

use crate::persistence::{KeyValueStore, load_best_score};
use crate::platform::input::Intent;
use crate::settings::Settings;
use crate::sim::{
    Contact, RunEvent, RunState, Track, TrackObject, Zone, apply_contact, apply_intent, tick,
};
use crate::summary::{RunSummary, finish_run};
use crate::tuning::Tuning;

/// Read-only view handed to the external renderer each frame
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub state: &'a RunState,
    /// Objects still to be drawn (collected pickups are left out)
    pub objects: Vec<&'a TrackObject>,
    pub zone: Zone,
    pub best_score: u64,
}

pub struct Session {
    pub state: RunState,
    pub track: Track,
    pub tuning: Tuning,
    pub settings: Settings,
    store: Box<dyn KeyValueStore>,
    best_score: u64,
    summary: Option<RunSummary>,
}

impl Session {
    /// Create a session and start its first run
    pub fn new(tuning: Tuning, store: Box<dyn KeyValueStore>, now: f64, seed: u64) -> Self {
        let settings = Settings::load(store.as_ref());
        let best_score = load_best_score(store.as_ref());
        Self {
            state: RunState::new(now, &tuning),
            track: Track::new(seed),
            tuning,
            settings,
            store,
            best_score,
            summary: None,
        }
    }

    /// Discard the current run and start a fresh one
    pub fn start(&mut self, now: f64, seed: u64) {
        self.state = RunState::new(now, &self.tuning);
        self.track = Track::new(seed);
        self.summary = None;
        log::info!(
            "Run started (seed {seed}, lives {}, best {})",
            self.state.lives,
            self.best_score
        );
    }

    /// Advance one rendered frame and return the presentation events it produced
    pub fn frame(&mut self, now: f64, dt: f32) -> Vec<RunEvent> {
        if self.state.is_playing && !self.state.is_paused {
            tick(&mut self.state, now, dt, &self.tuning);
            let contacts = self.track.advance(&self.state, dt, &self.tuning);
            for contact in contacts {
                apply_contact(&mut self.state, contact, &self.tuning);
            }
        }
        self.finish_if_over(now);
        self.state.drain_events()
    }

    /// Apply a player intent
    pub fn handle_intent(&mut self, intent: Intent, now: f64) -> bool {
        apply_intent(&mut self.state, intent, now, &self.tuning)
    }

    /// Apply a contact reported by an external collision checker
    pub fn notify_contact(&mut self, contact: Contact, now: f64) -> bool {
        let applied = apply_contact(&mut self.state, contact, &self.tuning);
        self.finish_if_over(now);
        applied
    }

    fn finish_if_over(&mut self, now: f64) {
        if self.state.is_playing || self.summary.is_some() {
            return;
        }
        let (summary, written) = finish_run(&self.state, now, self.store.as_mut());
        if let Err(e) = written {
            log::warn!("Best score not saved: {e}");
        }
        log::info!(
            "Game over: score {}, {}, best {}",
            summary.score,
            summary.elapsed_label(),
            summary.best_score
        );
        self.best_score = summary.best_score;
        self.summary = Some(summary);
    }

    /// Summary of the finished run, if it has ended
    pub fn summary(&self) -> Option<&RunSummary> {
        self.summary.as_ref()
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn is_over(&self) -> bool {
        self.summary.is_some()
    }

    /// Replace and persist the player settings
    pub fn update_settings(&mut self, settings: Settings) {
        if let Err(e) = settings.save(self.store.as_mut()) {
            log::warn!("Settings not saved: {e}");
        }
        self.settings = settings;
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: &self.state,
            objects: self.track.objects.iter().filter(|o| o.is_visible()).collect(),
            zone: self.track.current_zone(&self.tuning),
            best_score: self.best_score,
        }
    }

    /// Snapshot as JSON for a JavaScript renderer
    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }
}
