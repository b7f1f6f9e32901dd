//! Browser LocalStorage backend (wasm32 only)

use web_sys::Storage;

use crate::persistence::{KeyValueStore, PersistenceError};

/// `window.localStorage`, or nothing when the browser denies access
/// (private mode, disabled cookies). A missing store reads as empty and
/// rejects writes.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - scores and settings will not persist");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let storage = self.storage.as_ref().ok_or(PersistenceError::Unavailable)?;
        storage
            .get_item(key)
            .map_err(|_| PersistenceError::Unavailable)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let storage = self.storage.as_ref().ok_or(PersistenceError::Unavailable)?;
        storage.set_item(key, value).map_err(|_| PersistenceError::Write {
            key: key.to_string(),
        })
    }

    fn remove_item(&mut self, key: &str) -> Result<(), PersistenceError> {
        let storage = self.storage.as_ref().ok_or(PersistenceError::Unavailable)?;
        storage.remove_item(key).map_err(|_| PersistenceError::Write {
            key: key.to_string(),
        })
    }
}
