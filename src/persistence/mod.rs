//! High score and settings storage
//!
//! Storage is a flat string key-value store. Reads always go through; writes
//! are refused unless the player accepted the storage consent banner.
//! Values are JSON, so a stored high score is just its number.

#[cfg(target_arch = "wasm32")]
mod local;

use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorage;

use crate::error::PersistenceError;
use crate::settings::Settings;

pub const HIGH_SCORE_KEY: &str = "symbioteScore";
pub const SETTINGS_KEY: &str = "symbioteSettings";
pub const CONSENT_KEY: &str = "symbioteGDPR";
pub const CONSENT_ACCEPTED: &str = "accepted";

/// Score and settings memory as the director sees it
pub trait Persistence {
    /// Whether writes are currently allowed
    fn can_persist(&self) -> bool;

    /// Stored high score, 0 when nothing is stored
    fn load_high_score(&self) -> Result<u32, PersistenceError>;

    fn save_high_score(&mut self, score: u32) -> Result<(), PersistenceError>;

    /// Stored settings, `None` when nothing is stored
    fn load_settings(&self) -> Result<Option<Settings>, PersistenceError>;

    fn save_settings(&mut self, settings: &Settings) -> Result<(), PersistenceError>;
}

/// Raw string storage backing [`Persistence`]
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<S: KeyValueStore> Persistence for S {
    fn can_persist(&self) -> bool {
        matches!(self.get(CONSENT_KEY), Ok(Some(v)) if v == CONSENT_ACCEPTED)
    }

    fn load_high_score(&self) -> Result<u32, PersistenceError> {
        match self.get(HIGH_SCORE_KEY)? {
            Some(raw) => Ok(serde_json::from_str(raw.trim())?),
            None => Ok(0),
        }
    }

    fn save_high_score(&mut self, score: u32) -> Result<(), PersistenceError> {
        if !self.can_persist() {
            return Err(PersistenceError::ConsentDenied);
        }
        self.set(HIGH_SCORE_KEY, &serde_json::to_string(&score)?)
    }

    fn load_settings(&self) -> Result<Option<Settings>, PersistenceError> {
        match self.get(SETTINGS_KEY)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_settings(&mut self, settings: &Settings) -> Result<(), PersistenceError> {
        if !self.can_persist() {
            return Err(PersistenceError::ConsentDenied);
        }
        self.set(SETTINGS_KEY, &serde_json::to_string(settings)?)
    }
}

/// In-memory store for tests and the native build
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with the consent flag already set to `consented`
    pub fn with_consent(consented: bool) -> Self {
        let mut storage = Self::new();
        storage.set_consent(consented);
        storage
    }

    pub fn set_consent(&mut self, consented: bool) {
        let value = if consented { CONSENT_ACCEPTED } else { "declined" };
        self.values.insert(CONSENT_KEY.to_owned(), value.to_owned());
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

/// Storage that does not exist; every access reports it unavailable
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl KeyValueStore for NoStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, PersistenceError> {
        Err(PersistenceError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AnimationStyle, QualityPreset};

    #[test]
    fn test_writes_need_consent() {
        let mut storage = MemoryStorage::new();
        assert!(!storage.can_persist());
        assert!(matches!(storage.save_high_score(50), Err(PersistenceError::ConsentDenied)));
        assert_eq!(storage.raw(HIGH_SCORE_KEY), None);

        storage.set_consent(true);
        storage.save_high_score(50).unwrap();
        assert_eq!(storage.raw(HIGH_SCORE_KEY), Some("50"));
        assert_eq!(storage.load_high_score().unwrap(), 50);
    }

    #[test]
    fn test_declined_consent_blocks_settings() {
        let mut storage = MemoryStorage::with_consent(false);
        assert!(storage.save_settings(&Settings::default()).is_err());
        assert!(storage.load_settings().unwrap().is_none());
    }

    #[test]
    fn test_settings_round_trip() {
        let mut storage = MemoryStorage::with_consent(true);
        let settings = Settings {
            animation_style: AnimationStyle::Comic,
            quality: QualityPreset::Low,
            sound_enabled: false,
            ..Settings::default()
        };
        storage.save_settings(&settings).unwrap();
        assert_eq!(storage.load_settings().unwrap(), Some(settings));
    }

    #[test]
    fn test_malformed_score_is_an_error() {
        let mut storage = MemoryStorage::new();
        storage.set(HIGH_SCORE_KEY, "lots").unwrap();
        assert!(matches!(storage.load_high_score(), Err(PersistenceError::Json(_))));
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set(SETTINGS_KEY, r#"{"quality":"Medium"}"#).unwrap();
        let settings = storage.load_settings().unwrap().unwrap();
        assert_eq!(settings.quality, QualityPreset::Medium);
        assert!(settings.sound_enabled);
    }

    #[test]
    fn test_no_storage_is_unavailable() {
        let mut storage = NoStorage;
        assert!(!storage.can_persist());
        assert!(matches!(storage.load_high_score(), Err(PersistenceError::Unavailable)));
        assert!(storage.save_high_score(1).is_err());
    }
}
