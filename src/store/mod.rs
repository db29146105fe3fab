//! Persisted tool inputs.
//!
//! One JSON object on disk, one entry per tool storage key:
//!
//! ```json
//! { "qrGenerator": { "content": "https://example.com", "size": 256 } }
//! ```
//!
//! Reads are forgiving: a missing or corrupt file is an empty store and a
//! blob that no longer fits its type is treated as absent. Writes go through
//! a temp file and a rename so a crash never leaves half a file behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::StoreConfig;
use crate::utils::path::write_atomic;
use crate::{debug, log};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to serialize state for `{0}`")]
    Serialize(String, #[source] serde_json::Error),
}

#[derive(Debug, Default)]
pub struct StateStore {
    /// `None` when persistence is disabled.
    path: Option<PathBuf>,
    entries: Map<String, Value>,
}

impl StateStore {
    /// Open the store at `path`, starting empty if it can't be read.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read_entries(&path).unwrap_or_default();
        Self {
            path: Some(path),
            entries,
        }
    }

    /// A store that never holds or writes anything.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        if config.enable {
            Self::open(&config.path)
        } else {
            Self::disabled()
        }
    }

    fn read_entries(path: &Path) -> Option<Map<String, Value>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                debug!("state"; "cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Some(map),
            Ok(_) => {
                debug!("state"; "{} is not a JSON object, ignoring", path.display());
                None
            }
            Err(e) => {
                debug!("state"; "{} is corrupt, ignoring: {}", path.display(), e);
                None
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Typed read; a blob of the wrong shape counts as absent.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("state"; "ignoring stale `{}`: {}", key, e);
                None
            }
        }
    }

    /// Write-through save. Failures are logged, never returned.
    pub fn save<T: Serialize>(&mut self, key: &str, value: &T) {
        if let Err(e) = self.try_save(key, value) {
            log!("warning"; "{:#}", anyhow::Error::from(e));
        }
    }

    pub fn try_save<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), StoreError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let value =
            serde_json::to_value(value).map_err(|e| StoreError::Serialize(key.to_string(), e))?;
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    /// Returns whether the key was present.
    pub fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        if self.entries.shift_remove(key).is_none() {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.flush()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn flush(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| StoreError::Serialize(path.display().to_string(), e))?;
        write_atomic(path, json).map_err(|e| StoreError::Io(path.clone(), e))?;
        debug!("state"; "saved {} entries to {}", self.entries.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::qr_code::QrInput;
    use serde_json::json;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> StateStore {
        StateStore::open(dir.path().join(".toolbench/state.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.is_enabled());
        assert!(store.is_empty());
        assert!(store.load::<QrInput>("qrGenerator").is_none());
    }

    #[test]
    fn test_save_and_reopen() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let input = QrInput {
            content: "https://example.com".into(),
            size: 512,
            ..QrInput::default()
        };
        store.try_save("qrGenerator", &input).unwrap();

        let reopened = store_in(&dir);
        let loaded: QrInput = reopened.load("qrGenerator").unwrap();
        assert_eq!(loaded.content, "https://example.com");
        assert_eq!(loaded.size, 512);
        assert!(!dir.path().join(".toolbench/state.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(StateStore::open(&path).is_empty());

        fs::write(&path, "[1, 2]").unwrap();
        assert!(StateStore::open(&path).is_empty());
    }

    #[test]
    fn test_stale_blob_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"qrGenerator": {"size": "huge"}, "other": 1}"#).unwrap();

        let store = StateStore::open(&path);
        assert!(store.load::<QrInput>("qrGenerator").is_none());
        assert_eq!(store.get("other"), Some(&json!(1)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove_and_clear() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.try_save("a", &json!({ "x": 1 })).unwrap();
        store.try_save("b", &json!({ "y": 2 })).unwrap();
        assert_eq!(store.keys().collect::<Vec<_>>(), ["a", "b"]);

        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert_eq!(store_in(&dir).keys().collect::<Vec<_>>(), ["b"]);

        store.clear().unwrap();
        assert!(store_in(&dir).is_empty());
    }

    #[test]
    fn test_disabled_never_writes() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig {
            enable: false,
            path: dir.path().join("state.json"),
        };
        let mut store = StateStore::from_config(&config);
        assert!(!store.is_enabled());
        store.save("qrGenerator", &QrInput::default());
        assert!(store.is_empty());
        assert!(!config.path.exists());
    }
}
