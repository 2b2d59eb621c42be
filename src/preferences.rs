//! Persistent key-value preferences
//!
//! A flat store of boolean and integer values keyed by string, shared by the
//! whole process for the lifetime of the install. Reads follow the usual
//! user-defaults conventions: a missing boolean is `false`, a missing integer
//! is `0`, and the two scalar kinds convert into each other on read.

use crate::error::PreferenceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A single stored preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreferenceValue {
    Bool(bool),
    Int(i64),
}

impl PreferenceValue {
    pub fn as_bool(self) -> bool {
        match self {
            Self::Bool(b) => b,
            Self::Int(n) => n != 0,
        }
    }

    pub fn as_int(self) -> i64 {
        match self {
            Self::Bool(b) => b as i64,
            Self::Int(n) => n,
        }
    }
}

impl From<bool> for PreferenceValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PreferenceValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Process-wide preference storage
///
/// Implementations must be safe to share between threads; writes are assumed
/// to always succeed from the caller's point of view.
pub trait PreferenceStore: Send + Sync {
    fn value(&self, key: &str) -> Option<PreferenceValue>;

    fn set_value(&self, key: &str, value: PreferenceValue);

    fn remove(&self, key: &str);

    fn contains(&self, key: &str) -> bool {
        self.value(key).is_some()
    }

    fn bool(&self, key: &str) -> bool {
        self.value(key).map(PreferenceValue::as_bool).unwrap_or(false)
    }

    fn int(&self, key: &str) -> i64 {
        self.value(key).map(PreferenceValue::as_int).unwrap_or(0)
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set_value(key, PreferenceValue::Bool(value));
    }

    fn set_int(&self, key: &str, value: i64) {
        self.set_value(key, PreferenceValue::Int(value));
    }
}

type Values = BTreeMap<String, PreferenceValue>;

fn lock(values: &Mutex<Values>) -> MutexGuard<'_, Values> {
    values.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory store, used headless and in tests
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<Values>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored key
    pub fn snapshot(&self) -> Values {
        lock(&self.values).clone()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn value(&self, key: &str) -> Option<PreferenceValue> {
        lock(&self.values).get(key).copied()
    }

    fn set_value(&self, key: &str, value: PreferenceValue) {
        lock(&self.values).insert(key.to_string(), value);
    }

    fn remove(&self, key: &str) {
        lock(&self.values).remove(key);
    }
}

/// Store persisted as a flat JSON object, written through on every change
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    values: Mutex<Values>,
}

impl JsonPreferenceStore {
    /// Open the store at `path`; a missing file starts empty
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let values = if path.exists() {
            let contents = fs::read_to_string(&path).map_err(|source| PreferenceError::Read {
                path: path.clone(),
                source,
            })?;
            serde_json::from_str(&contents).map_err(|source| PreferenceError::Parse {
                path: path.clone(),
                source,
            })?
        } else {
            Values::new()
        };

        log::info!(
            "Opened preferences at {} ({} keys)",
            path.display(),
            values.len()
        );

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current contents to disk
    pub fn flush(&self) -> Result<(), PreferenceError> {
        let values = lock(&self.values);
        self.write(&values)
    }

    /// Replace the file with `values`; callers hold the values lock
    fn write(&self, values: &Values) -> Result<(), PreferenceError> {
        let write_err = |source: std::io::Error| PreferenceError::Write {
            path: self.path.clone(),
            source,
        };

        let json = serde_json::to_string_pretty(values)?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }

        // A crash mid-write leaves the old file in place
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json).map_err(write_err)?;
        fs::rename(&staging, &self.path).map_err(write_err)
    }

    fn persist(&self, values: &Values) {
        if let Err(e) = self.write(values) {
            log::error!("Failed to save preferences: {}", e);
        }
    }
}

impl PreferenceStore for JsonPreferenceStore {
    fn value(&self, key: &str) -> Option<PreferenceValue> {
        lock(&self.values).get(key).copied()
    }

    fn set_value(&self, key: &str, value: PreferenceValue) {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value);
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = lock(&self.values);
        if values.remove(key).is_some() {
            self.persist(&values);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    // -------------------------------------------------------------------------
    // Read conventions
    // -------------------------------------------------------------------------

    #[test]
    fn test_missing_keys_read_as_false_and_zero() {
        let store = MemoryPreferenceStore::new();
        assert!(!store.bool("missing"));
        assert_eq!(store.int("missing"), 0);
        assert!(!store.contains("missing"));
    }

    #[test]
    fn test_scalar_kinds_convert_on_read() {
        let store = MemoryPreferenceStore::new();
        store.set_int("clock", 100);
        store.set_bool("flag", true);
        assert!(store.bool("clock"));
        assert_eq!(store.int("flag"), 1);

        store.set_int("zero", 0);
        assert!(!store.bool("zero"));
    }

    #[test]
    fn test_remove() {
        let store = MemoryPreferenceStore::new();
        store.set_bool("flag", true);
        store.remove("flag");
        assert!(!store.contains("flag"));
    }

    // -------------------------------------------------------------------------
    // JSON store
    // -------------------------------------------------------------------------

    #[test]
    fn test_json_store_writes_through() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs").join("preferences.json");

        let store = JsonPreferenceStore::open(&path).unwrap();
        store.set_bool("isNew3DS", true);
        store.set_int("frameLimit", 100);
        drop(store);

        let reopened = JsonPreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.value("isNew3DS"), Some(PreferenceValue::Bool(true)));
        assert_eq!(reopened.value("frameLimit"), Some(PreferenceValue::Int(100)));
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonPreferenceStore::open(dir.path().join("none.json")).unwrap();
        assert!(!store.contains("anything"));
    }

    #[test]
    fn test_json_store_rejects_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonPreferenceStore::open(&path).unwrap_err();
        assert!(matches!(err, PreferenceError::Parse { .. }));
    }

    #[test]
    fn test_json_store_file_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        let store = JsonPreferenceStore::open(&path).unwrap();
        store.set_bool("useCPUJIT", false);
        store.set_int("resolutionFactor", 1);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["useCPUJIT"], serde_json::Value::Bool(false));
        assert_eq!(json["resolutionFactor"], serde_json::json!(1));
    }

    #[test]
    fn test_json_store_leaves_no_staging_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        let store = JsonPreferenceStore::open(&path).unwrap();
        store.set_bool("isNew3DS", true);
        store.remove("isNew3DS");

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("preferences.json")]);
    }

    #[test]
    fn test_json_store_concurrent_writers() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("preferences.json");
        let store = std::sync::Arc::new(JsonPreferenceStore::open(&path).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|thread| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        store.set_int(&format!("slot_{}_{}", thread, i), i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let reopened = JsonPreferenceStore::open(&path).unwrap();
        for thread in 0..4 {
            for i in 0..10 {
                assert_eq!(reopened.int(&format!("slot_{}_{}", thread, i)), i);
            }
        }
    }

    #[test]
    fn test_json_store_write_failure_keeps_memory_value() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let store = JsonPreferenceStore::open(blocker.join("preferences.json")).unwrap();
        store.set_bool("hasSetDefaultSettings", true);

        assert!(store.bool("hasSetDefaultSettings"));
        assert!(matches!(store.flush(), Err(PreferenceError::Write { .. })));
    }
}
