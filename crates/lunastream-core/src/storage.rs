use crate::error::{Outcome, StoreError};
use crate::store::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::{debug, warn};

/// Typed, fail-silent JSON access over a [`KeyValueStore`]
///
/// Nothing here returns an error: reads fall back to `T::default()` and
/// failed writes are dropped. The cause is logged and handed back as
/// [`Outcome::Degraded`].
pub struct Storage<S> {
    backend: S,
}

impl<S: KeyValueStore> Storage<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Read and decode `key`, yielding the default on a miss or any failure
    pub fn read<T>(&self, key: &str) -> Outcome<T>
    where
        T: DeserializeOwned + Default,
    {
        self.read_optional(key).map(Option::unwrap_or_default)
    }

    pub fn read_optional<T>(&self, key: &str) -> Outcome<Option<T>>
    where
        T: DeserializeOwned,
    {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Outcome::Ok(None),
            Err(e) => {
                warn!("Failed to read '{}' from storage: {}", key, e);
                return Outcome::degraded(None, e);
            }
        };

        match serde_json::from_str::<T>(&raw) {
            Ok(value) => Outcome::Ok(Some(value)),
            Err(e) => {
                warn!("Stored value for '{}' is not valid, ignoring it: {}", key, e);
                Outcome::degraded(
                    None,
                    StoreError::Serialization { key: key.to_string(), message: e.to_string() },
                )
            }
        }
    }

    /// Read a JSON array, keeping every element that still decodes
    ///
    /// One entry written by an older or foreign client must not take the
    /// rest of the collection down with it; undecodable entries are logged
    /// and skipped.
    pub fn read_list<T>(&self, key: &str) -> Outcome<Vec<T>>
    where
        T: DeserializeOwned,
    {
        self.read::<Vec<Value>>(key).map(|raw| {
            raw.into_iter()
                .enumerate()
                .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        warn!("Skipping unreadable entry {} of '{}': {}", index, key, e);
                        None
                    }
                })
                .collect()
        })
    }

    /// Read a JSON object as a map, keeping every entry that still decodes
    pub fn read_map<K, V>(&self, key: &str) -> Outcome<BTreeMap<K, V>>
    where
        K: FromStr + Ord,
        V: DeserializeOwned,
    {
        self.read::<Map<String, Value>>(key).map(|raw| {
            raw.into_iter()
                .filter_map(|(name, value)| {
                    let parsed_key = name.parse::<K>().ok();
                    match (parsed_key, serde_json::from_value::<V>(value)) {
                        (Some(k), Ok(v)) => Some((k, v)),
                        (None, _) => {
                            warn!("Skipping entry '{}' of '{}': unexpected key", name, key);
                            None
                        }
                        (_, Err(e)) => {
                            warn!("Skipping entry '{}' of '{}': {}", name, key, e);
                            None
                        }
                    }
                })
                .collect()
        })
    }

    pub fn write<T>(&self, key: &str, value: &T) -> Outcome<()>
    where
        T: Serialize + ?Sized,
    {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize '{}': {}", key, e);
                return Outcome::degraded(
                    (),
                    StoreError::Serialization { key: key.to_string(), message: e.to_string() },
                );
            }
        };

        match self.backend.set(key, &json) {
            Ok(()) => {
                debug!("Persisted '{}' ({} bytes)", key, json.len());
                Outcome::Ok(())
            }
            Err(e) => {
                warn!("Failed to persist '{}', continuing without it: {}", key, e);
                Outcome::degraded((), e)
            }
        }
    }

    pub fn remove(&self, key: &str) -> Outcome<()> {
        match self.backend.remove(key) {
            Ok(()) => Outcome::Ok(()),
            Err(e) => {
                warn!("Failed to remove '{}' from storage: {}", key, e);
                Outcome::degraded((), e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_read_missing_key_is_ok_default() {
        let storage = Storage::new(MemoryStore::new());
        let outcome: Outcome<Vec<u32>> = storage.read("nothing");
        assert_eq!(outcome, Outcome::Ok(Vec::new()));
    }

    #[test]
    fn test_corrupt_value_degrades_to_default() {
        let storage = Storage::new(MemoryStore::new());
        storage.backend().set("list", "{not json").unwrap();

        let outcome: Outcome<Vec<u32>> = storage.read("list");
        assert!(outcome.is_degraded());
        assert!(outcome.value().is_empty());
    }

    #[test]
    fn test_blocked_storage_never_errors() {
        let storage = Storage::new(MemoryStore::new());
        storage.backend().set_blocked(true);

        assert!(storage.write("list", &vec![1, 2, 3]).is_degraded());
        assert!(storage.remove("list").is_degraded());
        let outcome: Outcome<Vec<u32>> = storage.read("list");
        assert!(matches!(outcome.reason(), Some(StoreError::Unavailable(_))));
    }

    #[test]
    fn test_read_list_skips_bad_entries() {
        let storage = Storage::new(MemoryStore::new());
        storage.backend().set("list", r#"[1, "two", 3, null, 4]"#).unwrap();

        let outcome: Outcome<Vec<u32>> = storage.read_list("list");
        assert_eq!(outcome, Outcome::Ok(vec![1, 3, 4]));
    }

    #[test]
    fn test_read_list_of_non_array_degrades() {
        let storage = Storage::new(MemoryStore::new());
        storage.backend().set("list", r#"{"a": 1}"#).unwrap();

        let outcome: Outcome<Vec<u32>> = storage.read_list("list");
        assert!(matches!(outcome.reason(), Some(StoreError::Serialization { .. })));
        assert!(outcome.value().is_empty());
    }

    #[test]
    fn test_read_map_skips_bad_entries() {
        let storage = Storage::new(MemoryStore::new());
        storage.backend().set("map", r#"{"1": 10, "x": 20, "3": "thirty", "4": 40}"#).unwrap();

        let outcome: Outcome<BTreeMap<u64, u32>> = storage.read_map("map");
        assert_eq!(outcome.into_value(), BTreeMap::from([(1, 10), (4, 40)]));
    }

    #[test]
    fn test_write_then_read() {
        let storage = Storage::new(MemoryStore::new());
        assert_eq!(storage.write("list", &vec![1, 2, 3]), Outcome::Ok(()));
        let outcome: Outcome<Vec<u32>> = storage.read("list");
        assert_eq!(outcome.into_value(), vec![1, 2, 3]);
    }
}
