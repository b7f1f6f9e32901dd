//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key codes, swipe gestures -> intents)
//! - Frame timing
//! - Storage (LocalStorage on web)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod storage;
pub mod time;

pub use input::{Intent, SwipeTracker, intent_for_key};
pub use time::{Frame, FrameClock};
