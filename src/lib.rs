//! Tunnel Runner - a three-lane 3D endless runner
//!
//! Core modules:
//! - `sim`: Deterministic run state (per-frame update, discrete handlers, track spawner)
//! - `platform`: Browser/native platform abstraction (input, storage, frame clock)
//! - `persistence`: Key-value store seam and best-score persistence
//! - `session`: One game session wiring the above together
//! - `summary`: End-of-run summary
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod summary;
pub mod tuning;

pub use session::Session;
pub use settings::Settings;
pub use summary::RunSummary;
pub use tuning::Tuning;

/// Game configuration constants that are not balance values
pub mod consts {
    /// Nominal frame delta used for the first frame of a run (60 Hz)
    pub const NOMINAL_FRAME_DT: f32 = 1.0 / 60.0;
    /// Largest delta fed to the simulation in a single frame
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Key-value store key for the best score (plain stringified integer).
    /// Shared with earlier builds of the game, which may have written floats.
    pub const BEST_SCORE_KEY: &str = "fp3d_bestScore";
    /// Key-value store key for player settings (JSON)
    pub const SETTINGS_KEY: &str = "tunnel_runner_settings";

    /// Number of lanes
    pub const LANE_COUNT: u8 = 3;
    /// Lane the player starts in (center)
    pub const START_LANE: u8 = 1;
}

/// World-space x of a lane center (center lane at x = 0)
#[inline]
pub fn lane_to_x(lane: u8, lane_width: f32) -> f32 {
    (lane as f32 - consts::START_LANE as f32) * lane_width
}
