//! End-of-run summary
//!
//! Built once when a run ends; the best score is read from and written back
//! to the key-value store.

use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, PersistenceError, load_best_score, save_best_score};
use crate::sim::{RunState, RunStats};

/// Immutable snapshot shown on the game-over screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    /// Seconds of play (pauses excluded)
    pub elapsed_seconds: f64,
    pub stats: RunStats,
    /// `max(previous best, score)`
    pub best_score: u64,
    /// This run set a new best
    pub new_best: bool,
}

impl RunSummary {
    /// Build the summary for `state` against a previously stored best
    pub fn new(state: &RunState, now: f64, stored_best: u64) -> Self {
        Self {
            score: state.score,
            elapsed_seconds: state.elapsed(now),
            stats: state.run_stats,
            best_score: stored_best.max(state.score),
            new_best: state.score > stored_best,
        }
    }

    /// Elapsed time as shown on the game-over screen (`"12.3s"`)
    pub fn elapsed_label(&self) -> String {
        format!("{:.1}s", self.elapsed_seconds)
    }
}

/// Summarize a finished run and persist the best score
///
/// The summary is returned even when the write fails; the error is only
/// reported so the caller can log it.
pub fn finish_run(
    state: &RunState,
    now: f64,
    store: &mut dyn KeyValueStore,
) -> (RunSummary, Result<(), PersistenceError>) {
    let stored_best = load_best_score(store);
    let summary = RunSummary::new(state, now, stored_best);
    let written = save_best_score(store, summary.best_score);
    (summary, written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BEST_SCORE_KEY;
    use crate::persistence::MemoryStore;
    use crate::tuning::Tuning;
    use pretty_assertions::assert_eq;

    fn finished_run(score: u64) -> RunState {
        let mut state = RunState::new(0.0, &Tuning::default());
        state.score = score;
        state.run_stats.jumps = 4;
        state.run_stats.dashes = 2;
        state.is_playing = false;
        state
    }

    #[test]
    fn first_run_sets_best() {
        let mut store = MemoryStore::new();
        let (summary, written) = finish_run(&finished_run(900), 12.34, &mut store);
        assert!(written.is_ok());
        assert_eq!(
            summary,
            RunSummary {
                score: 900,
                elapsed_seconds: 12.34,
                stats: RunStats {
                    jumps: 4,
                    dashes: 2,
                    ..RunStats::default()
                },
                best_score: 900,
                new_best: true,
            }
        );
        assert_eq!(summary.elapsed_label(), "12.3s");
        assert_eq!(load_best_score(&store), 900);
    }

    #[test]
    fn lower_score_keeps_previous_best() {
        let mut store = MemoryStore::new();
        store.set_item(BEST_SCORE_KEY, "5000").unwrap();
        let (summary, _) = finish_run(&finished_run(1200), 3.0, &mut store);
        assert_eq!(summary.best_score, 5000);
        assert!(!summary.new_best);
        assert_eq!(load_best_score(&store), 5000);
    }

    #[test]
    fn higher_score_replaces_best() {
        let mut store = MemoryStore::new();
        store.set_item(BEST_SCORE_KEY, "500").unwrap();
        let (summary, _) = finish_run(&finished_run(1200), 3.0, &mut store);
        assert_eq!(summary.best_score, 1200);
        assert_eq!(load_best_score(&store), 1200);
    }

    #[test]
    fn corrupt_previous_best_is_replaced() {
        let mut store = MemoryStore::new();
        store.set_item(BEST_SCORE_KEY, "{oops").unwrap();
        let (summary, _) = finish_run(&finished_run(10), 1.0, &mut store);
        assert_eq!(summary.best_score, 10);
        assert_eq!(store.get_item(BEST_SCORE_KEY).unwrap().as_deref(), Some("10"));
    }
}
