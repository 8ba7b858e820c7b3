use crate::error::Outcome;
use crate::store::KeyValueStore;
use crate::watch_state::{WatchStateRepository, WATCH_PROGRESS_KEY};
use lunastream_models::WatchProgressEntry;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Cross-provider progress keyed by external id
pub type WatchProgress = BTreeMap<String, WatchProgressEntry>;

impl<S: KeyValueStore> WatchStateRepository<S> {
    pub fn all_progress(&self) -> Outcome<WatchProgress> {
        self.storage.read_map(WATCH_PROGRESS_KEY)
    }

    pub fn progress(&self, id: &str) -> Option<WatchProgressEntry> {
        self.all_progress().into_value().remove(id)
    }

    /// Merge a provider payload into the entry for `id`, stamping `last_updated`
    pub fn merge_progress(&self, id: &str, payload: Map<String, Value>) -> Outcome<WatchProgressEntry> {
        let now = self.now();
        let mut all = self.all_progress().into_value();

        let entry = all
            .entry(id.to_string())
            .or_insert_with(|| WatchProgressEntry { payload: Map::new(), last_updated: now });
        entry.merge(payload, now);
        let merged = entry.clone();

        debug!("Watch progress merged for {} ({} entries)", id, all.len());
        self.storage.write(WATCH_PROGRESS_KEY, &all).with_value(merged)
    }

    pub fn clear_progress(&self) -> Outcome<()> {
        self.storage.remove(WATCH_PROGRESS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::store::MemoryStore;
    use serde_json::json;
    use std::sync::Arc;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_merge_creates_and_updates() {
        let clock = Arc::new(ManualClock::new(100));
        let repo = WatchStateRepository::new(MemoryStore::new()).with_clock(clock.clone());

        repo.merge_progress("42", object(json!({"id": 42, "type": "movie", "progress": {"watched": 5}})));
        clock.set(200);
        repo.merge_progress("42", object(json!({"id": 42, "type": "movie", "duration": 3600})));

        let entry = repo.progress("42").unwrap();
        assert_eq!(entry.last_updated, 200);
        assert_eq!(entry.payload["progress"]["watched"], 5);
        assert_eq!(entry.payload["duration"], 3600);
        assert!(repo.progress("7").is_none());
    }

    #[test]
    fn test_stored_layout() {
        let repo = WatchStateRepository::new(MemoryStore::new()).with_clock(Arc::new(ManualClock::new(9)));
        repo.merge_progress("7", object(json!({"id": "7", "type": "tv", "season": 1})));

        let raw = repo.storage().backend().get(WATCH_PROGRESS_KEY).unwrap().unwrap();
        let stored: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored["7"]["type"], "tv");
        assert_eq!(stored["7"]["last_updated"], 9);
    }

    #[test]
    fn test_clear_progress() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        repo.merge_progress("1", object(json!({"id": 1, "type": "movie"})));
        repo.clear_progress();
        assert!(repo.all_progress().value().is_empty());
    }
}
