//! Persisted preference stores (theme, grammar, editor toggles).

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

use crate::error::CoreError;

/// Process-wide key/value preference store.
///
/// Writes are synchronous; the last write wins.
pub trait SettingsStore: Send + Sync {
    fn get_string(&self, key: &str) -> Option<String>;
    fn set_string(&self, key: &str, value: &str);
    fn get_bool(&self, key: &str) -> Option<bool>;
    fn set_bool(&self, key: &str, value: bool);
    fn remove(&self, key: &str);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettings {
    fn get_string(&self, key: &str) -> Option<String> {
        lock(&self.values)
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_string(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_string(), Value::String(value.to_string()));
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        lock(&self.values).get(key).and_then(Value::as_bool)
    }

    fn set_bool(&self, key: &str, value: bool) {
        lock(&self.values).insert(key.to_string(), Value::Bool(value));
    }

    fn remove(&self, key: &str) {
        lock(&self.values).remove(key);
    }
}

/// JSON-object file store, rewritten on every set.
#[derive(Debug)]
pub struct JsonFileSettings {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileSettings {
    /// Open (or lazily create) the settings file at `path`.
    ///
    /// A missing file starts empty. An unreadable or malformed file is logged
    /// and also starts empty; it is overwritten on the next set.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match read_object(&path) {
            Ok(values) => values,
            Err(err) => {
                warn!(path = %path.display(), "ignoring unreadable settings file: {}", err);
                Map::new()
            }
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn set_value(&self, key: &str, value: Value) {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value);
        if let Err(err) = write_object(&self.path, &values) {
            warn!(path = %self.path.display(), key, "failed to persist settings: {}", err);
        }
    }
}

fn read_object(path: &Path) -> Result<Map<String, Value>, CoreError> {
    if !path.exists() {
        return Ok(Map::new());
    }
    let raw = fs::read_to_string(path)?;
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_json::from_str::<Value>(&raw)? {
        Value::Object(map) => Ok(map),
        _ => Err(CoreError::InvalidDocument(
            "settings root must be a JSON object".to_string(),
        )),
    }
}

fn write_object(path: &Path, values: &Map<String, Value>) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_vec_pretty(values)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl SettingsStore for JsonFileSettings {
    fn get_string(&self, key: &str) -> Option<String> {
        lock(&self.values)
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn set_string(&self, key: &str, value: &str) {
        self.set_value(key, Value::String(value.to_string()));
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        lock(&self.values).get(key).and_then(Value::as_bool)
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.set_value(key, Value::Bool(value));
    }

    fn remove(&self, key: &str) {
        let mut values = lock(&self.values);
        if values.remove(key).is_some() {
            if let Err(err) = write_object(&self.path, &values) {
                warn!(path = %self.path.display(), key, "failed to persist settings: {}", err);
            }
        }
    }
}
