//! Input mapping
//!
//! Turns raw keyboard codes and touch gestures into discrete [`Intent`]s.
//! The run state only ever sees intents.

use serde::{Deserialize, Serialize};

/// Minimum swipe length in CSS pixels
pub const SWIPE_THRESHOLD: f32 = 30.0;
/// Two taps closer than this (ms) form a double tap
pub const DOUBLE_TAP_WINDOW_MS: f64 = 300.0;

/// Already-classified player intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    LaneLeft,
    LaneRight,
    Jump,
    SuperJump,
    Dash,
    PauseToggle,
}

/// Map a `KeyboardEvent.code` to an intent
pub fn intent_for_key(code: &str) -> Option<Intent> {
    match code {
        "ArrowLeft" | "KeyA" => Some(Intent::LaneLeft),
        "ArrowRight" | "KeyD" => Some(Intent::LaneRight),
        "ArrowUp" | "KeyW" | "Space" => Some(Intent::Jump),
        "ArrowDown" | "KeyS" => Some(Intent::Dash),
        "KeyE" | "ShiftLeft" | "ShiftRight" => Some(Intent::SuperJump),
        "Escape" | "KeyP" => Some(Intent::PauseToggle),
        _ => None,
    }
}

/// Keys whose default browser action (scrolling) must be suppressed
pub fn prevents_default(code: &str) -> bool {
    matches!(code, "ArrowUp" | "ArrowDown" | "Space")
}

#[derive(Debug, Clone, Copy)]
struct TouchPoint {
    x: f32,
    y: f32,
}

/// Swipe and double-tap classifier for one touch surface
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    start: Option<TouchPoint>,
    last_tap_ms: Option<f64>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch_start(&mut self, x: f32, y: f32) {
        self.start = Some(TouchPoint { x, y });
    }

    /// Classify the gesture that ends at `(x, y)` at `time_ms`
    ///
    /// Horizontal swipes change lane, upward swipes jump, downward swipes
    /// dash, and a second tap inside the double-tap window super-jumps.
    pub fn touch_end(&mut self, x: f32, y: f32, time_ms: f64) -> Option<Intent> {
        let start = self.start.take()?;
        let dx = x - start.x;
        let dy = y - start.y;

        if dx.abs() > dy.abs() && dx.abs() > SWIPE_THRESHOLD {
            self.last_tap_ms = None;
            return Some(if dx > 0.0 {
                Intent::LaneRight
            } else {
                Intent::LaneLeft
            });
        }
        if dy.abs() > SWIPE_THRESHOLD {
            self.last_tap_ms = None;
            // screen y grows downward
            return Some(if dy < 0.0 { Intent::Jump } else { Intent::Dash });
        }

        match self.last_tap_ms {
            Some(last) if time_ms - last <= DOUBLE_TAP_WINDOW_MS => {
                self.last_tap_ms = None;
                Some(Intent::SuperJump)
            }
            _ => {
                self.last_tap_ms = Some(time_ms);
                None
            }
        }
    }

    /// Forget any gesture in progress
    pub fn cancel(&mut self) {
        self.start = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_mapping() {
        assert_eq!(intent_for_key("ArrowLeft"), Some(Intent::LaneLeft));
        assert_eq!(intent_for_key("KeyD"), Some(Intent::LaneRight));
        assert_eq!(intent_for_key("Space"), Some(Intent::Jump));
        assert_eq!(intent_for_key("KeyS"), Some(Intent::Dash));
        assert_eq!(intent_for_key("KeyE"), Some(Intent::SuperJump));
        assert_eq!(intent_for_key("Escape"), Some(Intent::PauseToggle));
        assert_eq!(intent_for_key("KeyZ"), None);
        assert!(prevents_default("Space"));
        assert!(!prevents_default("KeyA"));
    }

    #[test]
    fn swipes_classify_by_dominant_axis() {
        let mut tracker = SwipeTracker::new();
        tracker.touch_start(100.0, 100.0);
        assert_eq!(tracker.touch_end(160.0, 110.0, 0.0), Some(Intent::LaneRight));
        tracker.touch_start(100.0, 100.0);
        assert_eq!(tracker.touch_end(40.0, 90.0, 0.0), Some(Intent::LaneLeft));
        tracker.touch_start(100.0, 100.0);
        assert_eq!(tracker.touch_end(110.0, 20.0, 0.0), Some(Intent::Jump));
        tracker.touch_start(100.0, 100.0);
        assert_eq!(tracker.touch_end(95.0, 180.0, 0.0), Some(Intent::Dash));
    }

    #[test]
    fn short_swipe_is_a_tap() {
        let mut tracker = SwipeTracker::new();
        tracker.touch_start(100.0, 100.0);
        assert_eq!(tracker.touch_end(120.0, 110.0, 0.0), None);
    }

    #[test]
    fn double_tap_super_jumps() {
        let mut tracker = SwipeTracker::new();
        tracker.touch_start(10.0, 10.0);
        assert_eq!(tracker.touch_end(10.0, 10.0, 1000.0), None);
        tracker.touch_start(10.0, 10.0);
        assert_eq!(tracker.touch_end(12.0, 11.0, 1200.0), Some(Intent::SuperJump));
        // third tap starts a new pair
        tracker.touch_start(10.0, 10.0);
        assert_eq!(tracker.touch_end(10.0, 10.0, 1300.0), None);
    }

    #[test]
    fn slow_taps_do_not_combine() {
        let mut tracker = SwipeTracker::new();
        tracker.touch_start(0.0, 0.0);
        tracker.touch_end(0.0, 0.0, 0.0);
        tracker.touch_start(0.0, 0.0);
        assert_eq!(tracker.touch_end(0.0, 0.0, 500.0), None);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut tracker = SwipeTracker::new();
        assert_eq!(tracker.touch_end(200.0, 0.0, 0.0), None);
    }
}
