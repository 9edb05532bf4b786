//! Key-value persistence for widget state.
//!
//! The menu stores a single flag (`navMenuCollapsed` → `"true"`/`"false"`).
//! The store is a flat JSON object written to the standard configuration
//! directory (`~/.config/historia/preferences.json` on most platforms).
//! Writes are last-writer-wins; the internal `Mutex` only guards the
//! in-memory copy.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dirs_next::config_dir;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

use crate::expand_tilde;

/// Environment variable allowing callers to override the preferences file path.
pub const PREFERENCES_PATH_ENV: &str = "HISTORIA_PREFERENCES_PATH";

/// Default filename for the JSON payload.
pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

/// Error surfaced when reading or writing persisted values fails.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure (for example, permissions or missing directory).
    #[error("preferences I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Serialization or deserialization failure.
    #[error("preferences serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// The backing store cannot be used at all.
    #[error("preferences store unavailable: {0}")]
    Unavailable(String),
}

/// String key-value store, the shape of a browser's per-origin local storage.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Thread-safe store backed by a JSON file.
#[derive(Debug)]
pub struct JsonPreferencesStore {
    path: PathBuf,
    payload: Mutex<IndexMap<String, String>>,
    persist_to_disk: bool,
}

impl JsonPreferencesStore {
    /// Opens the store at `path`, or at the default location when `None`.
    ///
    /// A missing file is an empty store; an unparsable file is logged and
    /// treated as empty.
    pub fn open<P: Into<Option<PathBuf>>>(path: P) -> Result<Self, StoreError> {
        let resolved_path = match path.into() {
            Some(path) => expand_tilde(&path.to_string_lossy()),
            None => default_preferences_path(),
        };
        let payload = load_payload(&resolved_path)?;
        Ok(Self {
            path: resolved_path,
            payload: Mutex::new(payload),
            persist_to_disk: true,
        })
    }

    /// Build an in-memory store used as a fallback when the config directory cannot be accessed.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            payload: Mutex::new(IndexMap::new()),
            persist_to_disk: false,
        }
    }

    /// Path to the underlying JSON file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save_locked(&self, payload: &IndexMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(payload)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

impl KeyValueStore for JsonPreferencesStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let payload = self
            .payload
            .lock()
            .map_err(|_| StoreError::Unavailable("preferences lock poisoned".into()))?;
        Ok(payload.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut payload = self
            .payload
            .lock()
            .map_err(|_| StoreError::Unavailable("preferences lock poisoned".into()))?;
        payload.insert(key.to_string(), value.to_string());
        if self.persist_to_disk {
            self.save_locked(&payload)?;
        }
        Ok(())
    }
}

/// In-memory store primarily used for unit testing.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<IndexMap<String, String>>,
}

impl InMemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

fn default_preferences_path() -> PathBuf {
    if let Ok(path) = env::var(PREFERENCES_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("historia")
        .join(PREFERENCES_FILE_NAME)
}

fn load_payload(path: &Path) -> Result<IndexMap<String, String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(payload) => Ok(payload),
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Failed to parse preferences file; using defaults"
                );
                Ok(IndexMap::new())
            }
        },
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(IndexMap::new()),
        Err(error) => Err(StoreError::Io(error)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn json_store_round_trips_through_disk() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("preferences.json");

        let store = JsonPreferencesStore::open(Some(path.clone())).expect("open store");
        assert_eq!(store.get("navMenuCollapsed").expect("get"), None);
        store.set("navMenuCollapsed", "true").expect("set");

        let reopened = JsonPreferencesStore::open(Some(path.clone())).expect("reopen store");
        assert_eq!(reopened.get("navMenuCollapsed").expect("get"), Some("true".to_string()));

        let raw = fs::read_to_string(&path).expect("read file");
        assert!(raw.contains("\"navMenuCollapsed\": \"true\""), "unexpected payload: {raw}");
    }

    #[test]
    fn corrupt_file_is_treated_as_empty() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").expect("write corrupt file");

        let store = JsonPreferencesStore::open(Some(path)).expect("open store");
        assert_eq!(store.get("navMenuCollapsed").expect("get"), None);
    }

    #[test]
    fn env_override_selects_path() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("custom.json");
        temp_env::with_var(PREFERENCES_PATH_ENV, Some(path.to_string_lossy().to_string()), || {
            let store = JsonPreferencesStore::open(None::<PathBuf>).expect("open store");
            assert_eq!(store.path(), path.as_path());
        });
    }

    #[test]
    fn ephemeral_store_never_touches_disk() {
        let store = JsonPreferencesStore::ephemeral();
        store.set("navMenuCollapsed", "false").expect("set");
        assert_eq!(store.get("navMenuCollapsed").expect("get"), Some("false".to_string()));
        assert_eq!(store.path(), Path::new(""));
    }

    #[test]
    fn in_memory_store_seeds_entry() {
        let store = InMemoryStore::with_entry("navMenuCollapsed", "true");
        assert_eq!(store.get("navMenuCollapsed").expect("get"), Some("true".to_string()));
        assert_eq!(store.get("other").expect("get"), None);
    }
}
