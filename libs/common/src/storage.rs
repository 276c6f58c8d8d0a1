//! Persistent key-value store for client-local state
//!
//! File-backed equivalent of browser local storage: a flat JSON object of
//! string entries, loaded once at open and rewritten on every mutation. Only
//! the auth service writes session entries here.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Result;
use tracing::warn;

/// Configuration for the key-value store
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Location of the backing JSON file
    pub path: PathBuf,
}

impl StorageConfig {
    /// Create a new StorageConfig from environment variables
    ///
    /// # Environment Variables
    /// - `STORAGE_PATH`: Backing file location (default: ".leavedesk/store.json")
    pub fn from_env() -> Result<Self> {
        let path =
            std::env::var("STORAGE_PATH").unwrap_or_else(|_| ".leavedesk/store.json".to_string());

        Ok(StorageConfig {
            path: PathBuf::from(path),
        })
    }
}

/// String key-value store persisted as a single JSON document
#[derive(Debug)]
pub struct KeyValueStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore {
    /// Open the store, loading any existing entries. A missing file is an
    /// empty store; an unreadable or corrupt file is logged and treated as
    /// empty.
    pub fn open(config: &StorageConfig) -> Self {
        let entries = match fs::read_to_string(&config.path) {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        "Discarding corrupt store file {}: {}",
                        config.path.display(),
                        err
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        KeyValueStore {
            path: config.path.clone(),
            entries: Mutex::new(entries),
        }
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    /// Store `value` under `key` and persist the change.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    /// Remove `key` and persist the change.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.lock();
        entries.remove(key);
        self.flush(&entries)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}
