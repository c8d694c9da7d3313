//! Browser `localStorage` backend

use super::KeyValueStore;
use crate::error::PersistenceError;

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// The window's storage, if the browser exposes one
    pub fn open() -> Result<Self, PersistenceError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(PersistenceError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        self.storage
            .get_item(key)
            .map_err(|e| PersistenceError::Storage(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PersistenceError::Storage(format!("{e:?}")))
    }
}
