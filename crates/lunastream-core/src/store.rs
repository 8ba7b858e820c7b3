use crate::error::StoreError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::debug;

/// Raw string key-value storage
///
/// Backends report failures; turning them into fail-silent behaviour is the
/// job of [`crate::storage::Storage`].
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

fn check_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StoreError::Unavailable(format!("invalid storage key '{}'", key)))
    }
}

/// One JSON file per key under a directory
pub struct FileStore {
    dir: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StoreError::Unavailable(format!("cannot create store dir {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir, quota_bytes: None })
    }

    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Bytes used by every key except `exclude`
    fn used_bytes(&self, exclude: &Path) -> Result<u64, StoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| StoreError::Io {
            key: "*".to_string(),
            message: e.to_string(),
        })?;

        let mut total = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path == exclude || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                total += meta.len();
            }
        }
        Ok(total)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        check_key(key)?;
        let path = self.key_path(key);
        if !path.exists() {
            debug!("Store miss: {} (file does not exist)", key);
            return Ok(None);
        }
        std::fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StoreError::Io { key: key.to_string(), message: e.to_string() })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let path = self.key_path(key);

        if let Some(quota) = self.quota_bytes {
            let used = self.used_bytes(&path)?;
            let needed = value.len() as u64;
            let available = quota.saturating_sub(used);
            if needed > available {
                return Err(StoreError::QuotaExceeded { key: key.to_string(), needed, available });
            }
        }

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, value)
            .and_then(|_| std::fs::rename(&temp_path, &path))
            .map_err(|e| StoreError::Io { key: key.to_string(), message: e.to_string() })?;

        debug!("Store saved: {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        check_key(key)?;
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&path)
            .map_err(|e| StoreError::Io { key: key.to_string(), message: e.to_string() })
    }
}

/// In-process store, also used when no persistent storage is reachable
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
    blocked: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        Self { quota_bytes: Some(quota_bytes), ..Self::default() }
    }

    /// Simulate storage being disabled (every call fails while blocked)
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        if self.blocked.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("storage is blocked".to_string()));
        }
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries()?;
        if let Some(quota) = self.quota_bytes {
            let used: u64 = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            let needed = value.len() as u64;
            let available = quota.saturating_sub(used);
            if needed > available {
                return Err(StoreError::QuotaExceeded { key: key.to_string(), needed, available });
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries()?.remove(key);
        Ok(())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip_and_remove() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();

        assert_eq!(store.get("continueWatching").unwrap(), None);
        store.set("continueWatching", "[]").unwrap();
        assert_eq!(store.get("continueWatching").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("continueWatching.json").exists());

        store.remove("continueWatching").unwrap();
        assert_eq!(store.get("continueWatching").unwrap(), None);
        // removing twice is fine
        store.remove("continueWatching").unwrap();
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_file_store_quota() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path()).unwrap().with_quota(Some(10));

        store.set("a", "12345").unwrap();
        // overwriting a key does not count its old size
        store.set("a", "1234567").unwrap();
        let err = store.set("b", "12345").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { available: 3, needed: 5, .. }));
        assert_eq!(store.get("b").unwrap(), None);
    }

    #[test]
    fn test_memory_store_blocked() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        store.set_blocked(true);
        assert!(store.get("k").is_err());
        assert!(store.set("k", "w").is_err());
        store.set_blocked(false);
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(4);
        store.set("k", "1234").unwrap();
        assert!(matches!(store.set("j", "1"), Err(StoreError::QuotaExceeded { .. })));
    }
}
