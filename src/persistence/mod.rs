//! Key-value persistence
//!
//! The browser offers a single string-to-string store. Everything the game
//! persists goes through [`KeyValueStore`] so the logic can be exercised
//! natively against [`MemoryStore`]:
//! - best score: one plain stringified integer
//! - settings: a JSON blob (see `settings`)

use std::collections::HashMap;

use thiserror::Error;

use crate::consts::BEST_SCORE_KEY;

/// Errors raised by a key-value store
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("stored value for `{key}` is corrupt: {raw:?}")]
    Corrupt { key: String, raw: String },
    #[error("failed to write `{key}`")]
    Write { key: String },
}

/// Minimal string key-value store (LocalStorage-shaped)
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-process store used natively and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Parse a stored best score
///
/// Accepts plain integers and float strings written by older builds
/// (`"1234.0"`). Negative, non-finite or non-numeric values are corrupt.
pub fn parse_best_score(raw: &str) -> Result<u64, PersistenceError> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u64>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value.floor() as u64),
        _ => Err(PersistenceError::Corrupt {
            key: BEST_SCORE_KEY.to_string(),
            raw: raw.to_string(),
        }),
    }
}

/// Read the stored best score; absent or corrupt values read as 0
pub fn load_best_score(store: &dyn KeyValueStore) -> u64 {
    let raw = match store.get_item(BEST_SCORE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return 0,
        Err(e) => {
            log::warn!("Best score unavailable ({e}), using 0");
            return 0;
        }
    };
    parse_best_score(&raw).unwrap_or_else(|e| {
        log::warn!("{e}, using 0");
        0
    })
}

/// Persist the best score as a plain stringified integer
pub fn save_best_score(store: &mut dyn KeyValueStore, best: u64) -> Result<(), PersistenceError> {
    store.set_item(BEST_SCORE_KEY, &best.to_string())
}
