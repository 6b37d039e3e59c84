//! Key-value persistence.
//!
//! The tracker stores four values, each as one JSON blob under a fixed key.
//! Reads fall back to a default and writes are best effort: a storage failure
//! is logged and reported, never raised to the caller.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub const EXERCISES: &str = "exercises";
pub const WORKOUTS: &str = "workouts";
pub const NUTRITION_DAYS: &str = "nutritionDays";
pub const MACRO_GOALS: &str = "macroGoals";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("could not encode `{key}`: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid storage key `{0}`")]
    InvalidKey(String),
}

/// Raw string storage by key.
pub trait KeyValueStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored under `key`.
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Load and decode `key`, returning `fallback` when the value is missing,
/// unreadable or malformed.
pub fn load_or_default<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, fallback: T) -> T {
    let raw = match store.load_raw(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return fallback,
        Err(e) => {
            tracing::warn!(key, error = %e, "load failed, using default");
            return fallback;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value is malformed, using default");
            fallback
        }
    }
}

/// Encode and save `value`. Returns `false` on failure, which is logged.
pub fn save_best_effort<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> bool {
    let result = serde_json::to_string(value)
        .map_err(|source| StoreError::Encode {
            key: key.to_string(),
            source,
        })
        .and_then(|raw| store.save_raw(key, &raw));
    match result {
        Ok(()) => {
            tracing::debug!(key, "saved");
            true
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "save failed");
            false
        }
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key under a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for JsonFileStore {
    fn load_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    // Written to a sibling temp file first so a crash never leaves a torn value.
    fn save_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let io_err = |source| StoreError::Io {
            key: key.to_string(),
            source,
        };
        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        std::fs::write(&tmp, value).map_err(io_err)?;
        std::fs::rename(&tmp, &path).map_err(io_err)
    }
}
