//! Key/value persistence for the two records the game keeps
//!
//! - High score: integer text under [`HIGH_SCORE_KEY`]
//! - Weather snapshot: versioned JSON under [`WEATHER_KEY`]
//!
//! Backends implement [`Storage`]: LocalStorage in the browser
//! (`platform::web::LocalStorage`), [`MemoryStorage`] natively and in tests.

use std::collections::HashMap;

pub const HIGH_SCORE_KEY: &str = "balloonGameHighScore";
pub const WEATHER_KEY: &str = "balloonGameWeather";

/// Persistence error types
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

pub type PersistResult<T> = Result<T, PersistError>;

/// String key/value store
pub trait Storage {
    fn get(&self, key: &str) -> PersistResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> PersistResult<()>;
    fn remove(&mut self, key: &str) -> PersistResult<()>;
}

/// In-process store
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> PersistResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> PersistResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store that always fails, for exercising error paths
#[derive(Debug, Clone, Copy, Default)]
pub struct NullStorage;

impl Storage for NullStorage {
    fn get(&self, _key: &str) -> PersistResult<Option<String>> {
        Err(PersistError::Unavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> PersistResult<()> {
        Err(PersistError::Unavailable)
    }

    fn remove(&mut self, _key: &str) -> PersistResult<()> {
        Err(PersistError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let mut store = MemoryStorage::new();
        assert!(store.is_empty());
        store.set(HIGH_SCORE_KEY, "42").unwrap();
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap().as_deref(), Some("42"));
        store.set(HIGH_SCORE_KEY, "43").unwrap();
        assert_eq!(store.len(), 1);
        store.remove(HIGH_SCORE_KEY).unwrap();
        assert_eq!(store.get(HIGH_SCORE_KEY).unwrap(), None);
    }

    #[test]
    fn test_error_messages() {
        let err = PersistError::UnsupportedVersion {
            found: 9,
            expected: 2,
        };
        assert_eq!(err.to_string(), "unsupported version 9 (expected 2)");
        assert!(NullStorage.get(WEATHER_KEY).is_err());
    }
}
