//! Player settings and preferences
//!
//! Persisted as JSON in the key-value store, separately from the best score.

use serde::{Deserialize, Serialize};

use crate::consts::SETTINGS_KEY;
use crate::persistence::{KeyValueStore, PersistenceError};

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all sound effects
    pub muted: bool,
    /// Mute when the tab is hidden or the window loses focus
    pub mute_on_blur: bool,

    // === Feedback ===
    /// Vibrate on hits, dashes and pickups (mobile)
    pub vibration: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Reduced motion (no invincibility blink)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            mute_on_blur: true,

            vibration: true,

            show_fps: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective gain for a sound effect
    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            return 0.0;
        }
        (self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
    }

    /// Whether the avatar blinks while invincible
    pub fn effective_blink(&self) -> bool {
        !self.reduced_motion
    }

    /// Load settings; missing or corrupt data falls back to defaults
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get_item(SETTINGS_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Corrupt settings ({e}), using defaults");
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), PersistenceError> {
        let json = serde_json::to_string(self).map_err(|_| PersistenceError::Write {
            key: SETTINGS_KEY.to_string(),
        })?;
        store.set_item(SETTINGS_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            vibration: false,
            reduced_motion: true,
            ..Settings::default()
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&store), settings);
    }

    #[test]
    fn corrupt_settings_fall_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set_item(SETTINGS_KEY, "{not json").unwrap();
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn partial_settings_keep_defaults() {
        let mut store = MemoryStore::new();
        store.set_item(SETTINGS_KEY, r#"{"show_fps": true}"#).unwrap();
        let settings = Settings::load(&store);
        assert!(settings.show_fps);
        assert_eq!(settings.master_volume, 0.8);
    }

    #[test]
    fn effective_values() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            reduced_motion: true,
            ..Settings::default()
        };
        assert_eq!(settings.effective_sfx_volume(), 0.25);
        assert!(!settings.effective_blink());

        let muted = Settings {
            muted: true,
            ..settings
        };
        assert_eq!(muted.effective_sfx_volume(), 0.0);
    }
}
