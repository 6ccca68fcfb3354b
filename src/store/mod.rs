use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::warn;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupted entry: {0}")]
    Corrupted(#[from] serde_json::Error),
}

// Durable key-value store for strings, numbers and JSON objects, backed by a
// single JSON file. Any failure to use the backing file degrades the store to
// memory-only; callers never see storage errors, only missing values.
#[derive(Clone)]
pub struct KvStore {
    inner: Arc<Inner>,
}

struct Inner {
    path: Option<PathBuf>,
    map: RwLock<HashMap<String, Value>>,
    degraded: AtomicBool,
}

impl KvStore {
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    warn!(
                        "Store directory {} unusable, falling back to memory-only: {}",
                        parent.display(),
                        e
                    );
                    return Self::in_memory();
                }
            }
        }

        // A missing file is a fresh store; anything else unreadable is a
        // corrupted one and starts empty
        let map = if path.exists() {
            match load_map(&path) {
                Ok(map) => map,
                Err(e) => {
                    warn!("Store file {} is unusable, starting empty: {}", path.display(), e);
                    HashMap::new()
                }
            }
        } else {
            HashMap::new()
        };

        Self {
            inner: Arc::new(Inner {
                path: Some(path),
                map: RwLock::new(map),
                degraded: AtomicBool::new(false),
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(Inner {
                path: None,
                map: RwLock::new(HashMap::new()),
                degraded: AtomicBool::new(false),
            }),
        }
    }

    pub fn set_string(&self, key: &str, value: &str) {
        self.insert(key, Value::String(value.to_string()));
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.inner.map.read().get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn set_number(&self, key: &str, value: i64) {
        self.insert(key, Value::from(value));
    }

    pub fn get_number(&self, key: &str) -> Option<i64> {
        self.inner.map.read().get(key).and_then(Value::as_i64)
    }

    pub fn set_object<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_value(value) {
            Ok(json) => self.insert(key, json),
            Err(e) => warn!("Failed to serialize value for key {}: {}", key, e),
        }
    }

    // A value that no longer deserializes as T reads as absent
    pub fn get_object<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.inner.map.read().get(key)?.clone();
        match serde_json::from_value(value) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Corrupted entry under key {}: {}", key, e);
                None
            }
        }
    }

    pub fn delete(&self, key: &str) {
        self.inner.map.write().remove(key);
        self.flush();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.map.read().contains_key(key)
    }

    fn insert(&self, key: &str, value: Value) {
        self.inner.map.write().insert(key.to_string(), value);
        self.flush();
    }

    fn flush(&self) {
        let Some(path) = &self.inner.path else {
            return;
        };
        if self.inner.degraded.load(Ordering::Relaxed) {
            return;
        }

        if let Err(e) = self.try_flush(path) {
            // Warn once and stop trying; reads and writes continue in memory
            warn!(
                "Failed to persist store to {}, continuing memory-only: {}",
                path.display(),
                e
            );
            self.inner.degraded.store(true, Ordering::Relaxed);
        }
    }

    fn try_flush(&self, path: &Path) -> Result<(), StorageError> {
        let bytes = {
            let map = self.inner.map.read();
            serde_json::to_vec(&*map)?
        };
        fs::write(path, bytes)?;
        Ok(())
    }
}

fn load_map(path: &Path) -> Result<HashMap<String, Value>, StorageError> {
    let bytes = fs::read(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::sync::atomic::AtomicU32;

    static COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_store_path() -> PathBuf {
        let n = COUNTER.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "resolvn-store-test-{}-{}.json",
            std::process::id(),
            n
        ))
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Record {
        urls: Vec<String>,
        version: String,
    }

    #[test]
    fn string_and_number_round_trip() {
        let store = KvStore::in_memory();
        store.set_string("lang", "mr");
        store.set_number("expiry", 42);

        assert_eq!(store.get_string("lang").as_deref(), Some("mr"));
        assert_eq!(store.get_number("expiry"), Some(42));
        assert_eq!(store.get_string("missing"), None);
    }

    #[test]
    fn object_round_trip_persists_across_reopen() {
        let path = temp_store_path();
        let record = Record {
            urls: vec!["https://a/1.png".into(), "https://a/2.png".into()],
            version: "2.0".into(),
        };

        {
            let store = KvStore::open(&path);
            store.set_object("assets:plumber", &record);
        }

        let reopened = KvStore::open(&path);
        assert_eq!(reopened.get_object::<Record>("assets:plumber"), Some(record));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupted_file_starts_empty() {
        let path = temp_store_path();
        fs::write(&path, b"{ not json").unwrap();

        let store = KvStore::open(&path);
        assert!(!store.contains("anything"));
        // The store is still usable
        store.set_string("k", "v");
        assert_eq!(store.get_string("k").as_deref(), Some("v"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn mistyped_entry_reads_as_missing() {
        let store = KvStore::in_memory();
        store.set_string("assets:plumber", "not a record");
        assert_eq!(store.get_object::<Record>("assets:plumber"), None);
    }

    #[test]
    fn delete_removes_the_key() {
        let store = KvStore::in_memory();
        store.set_number("n", 7);
        assert!(store.contains("n"));
        store.delete("n");
        assert!(!store.contains("n"));
    }
}
