use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Storage failure. Nothing here is fatal to the process; callers decide
/// whether a failed read/write fails their operation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage encoding: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Narrow key-value contract: `get` returns the stored value or nothing,
/// `set` overwrites. Last write wins; no transactions, no versioning.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;
    fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}

/// Typed read with a default for missing keys.
pub fn get_or_default<T>(store: &dyn KvStore, key: &str) -> Result<T, StorageError>
where
    T: DeserializeOwned + Default,
{
    match store.get(key)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Ok(T::default()),
    }
}

/// Typed write.
pub fn set_value<T: Serialize>(store: &dyn KvStore, key: &str, value: &T) -> Result<(), StorageError> {
    store.set(key, serde_json::to_value(value)?)
}

/// Volatile store for tests and demos.
#[derive(Debug, Default)]
pub struct InMemoryKv {
    entries: Mutex<HashMap<String, Value>>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryKv {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let guard = self.entries.lock().expect("kv mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut guard = self.entries.lock().expect("kv mutex poisoned");
        guard.insert(key.to_string(), value);
        Ok(())
    }
}

/// One JSON document on disk holding every key. Loaded eagerly at open,
/// rewritten whole on each `set`. The mutex gives single-writer
/// arbitration; the store is shared by the dispatcher and the settings
/// surface.
#[derive(Debug)]
pub struct JsonFileKv {
    path: PathBuf,
    entries: Mutex<HashMap<String, Value>>,
}

impl JsonFileKv {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            HashMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    fn persist(&self, entries: &HashMap<String, Value>) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl KvStore for JsonFileKv {
    fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let guard = self.entries.lock().expect("kv mutex poisoned");
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut guard = self.entries.lock().expect("kv mutex poisoned");
        guard.insert(key.to_string(), value);
        self.persist(&guard)
    }
}
