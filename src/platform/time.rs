//! Frame clock
//!
//! Converts animation-frame timestamps (milliseconds) into the absolute
//! clock and frame delta (seconds) the simulation consumes.

use crate::consts::{MAX_FRAME_DELTA, NOMINAL_FRAME_DT};

/// One frame's timing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Absolute clock in seconds
    pub now: f64,
    /// Seconds since the previous frame, clamped
    pub delta: f32,
}

#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to `timestamp_ms`
    ///
    /// The first frame gets a nominal delta; long gaps (background tab)
    /// are clamped to `MAX_FRAME_DELTA`.
    pub fn advance(&mut self, timestamp_ms: f64) -> Frame {
        let delta = match self.last_ms {
            Some(last) => (((timestamp_ms - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DELTA),
            None => NOMINAL_FRAME_DT,
        };
        self.last_ms = Some(timestamp_ms);
        Frame {
            now: timestamp_ms / 1000.0,
            delta,
        }
    }

    /// Forget the previous timestamp (after a pause or restart)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
