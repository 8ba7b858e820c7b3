use crate::error::Outcome;
use crate::store::KeyValueStore;
use crate::watch_state::{WatchStateRepository, FAVORITE_MOVIES_KEY, FAVORITE_SHOWS_KEY};
use lunastream_models::{FavoriteEntry, FavoriteKind};
use tracing::{debug, info};

fn favorites_key(kind: FavoriteKind) -> &'static str {
    match kind {
        FavoriteKind::Movie => FAVORITE_MOVIES_KEY,
        FavoriteKind::Show => FAVORITE_SHOWS_KEY,
    }
}

/// Membership sets of [`FavoriteEntry`] (favorites and the watchlist)
impl<S: KeyValueStore> WatchStateRepository<S> {
    pub(crate) fn list_entries(&self, key: &str) -> Outcome<Vec<FavoriteEntry>> {
        self.storage.read_list(key)
    }

    /// Add to the front of the set; an existing entry keeps its place
    pub(crate) fn add_entry(&self, key: &str, mut entry: FavoriteEntry) -> Outcome<()> {
        let existing = self.list_entries(key);
        if existing.is_degraded() {
            return existing.with_value(());
        }

        let mut entries = existing.into_value();
        if entries.iter().any(|e| e.id == entry.id) {
            debug!("{} already holds {}", key, entry.id);
            return Outcome::Ok(());
        }

        entry.added_at = self.now();
        entries.insert(0, entry);
        self.storage.write(key, &entries)
    }

    pub(crate) fn remove_entry(&self, key: &str, id: u64) -> Outcome<()> {
        let existing = self.list_entries(key);
        if existing.is_degraded() {
            return existing.with_value(());
        }

        let entries = existing.into_value();
        if !entries.iter().any(|e| e.id == id) {
            return Outcome::Ok(());
        }
        let entries: Vec<FavoriteEntry> = entries.into_iter().filter(|e| e.id != id).collect();
        self.storage.write(key, &entries)
    }

    pub fn list_favorites(&self, kind: FavoriteKind) -> Outcome<Vec<FavoriteEntry>> {
        self.list_entries(favorites_key(kind))
    }

    pub fn is_favorite(&self, kind: FavoriteKind, id: u64) -> bool {
        self.list_favorites(kind).value().iter().any(|entry| entry.id == id)
    }

    pub fn add_favorite(&self, kind: FavoriteKind, entry: FavoriteEntry) -> Outcome<()> {
        self.add_entry(favorites_key(kind), entry)
    }

    pub fn remove_favorite(&self, kind: FavoriteKind, id: u64) -> Outcome<()> {
        self.remove_entry(favorites_key(kind), id)
    }

    /// Flip membership; returns whether the entry is a favorite afterwards
    pub fn toggle_favorite(&self, kind: FavoriteKind, entry: FavoriteEntry) -> Outcome<bool> {
        if self.is_favorite(kind, entry.id) {
            self.remove_favorite(kind, entry.id).with_value(false)
        } else {
            self.add_favorite(kind, entry).with_value(true)
        }
    }

    pub fn clear_favorites(&self, kind: FavoriteKind) -> Outcome<()> {
        info!("Clearing favorite {}s", kind);
        self.storage.remove(favorites_key(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_movie_and_show_sets_are_independent() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(1, "Movie"));

        assert!(repo.is_favorite(FavoriteKind::Movie, 1));
        assert!(!repo.is_favorite(FavoriteKind::Show, 1));

        repo.add_favorite(FavoriteKind::Show, FavoriteEntry::new(1, "Show"));
        repo.remove_favorite(FavoriteKind::Movie, 1);
        assert!(!repo.is_favorite(FavoriteKind::Movie, 1));
        assert!(repo.is_favorite(FavoriteKind::Show, 1));
    }

    #[test]
    fn test_add_is_idempotent_and_newest_first() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(1, "A"));
        repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(2, "B"));
        repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(1, "A again"));

        let ids: Vec<u64> = repo
            .list_favorites(FavoriteKind::Movie)
            .into_value()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_toggle() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        let entry = FavoriteEntry::new(9, "Show");
        assert_eq!(repo.toggle_favorite(FavoriteKind::Show, entry.clone()).into_value(), true);
        assert_eq!(repo.toggle_favorite(FavoriteKind::Show, entry).into_value(), false);
        assert!(repo.list_favorites(FavoriteKind::Show).value().is_empty());
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        assert_eq!(repo.remove_favorite(FavoriteKind::Movie, 77), Outcome::Ok(()));
    }

    #[test]
    fn test_clear_favorites_only_touches_one_kind() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(1, "A"));
        repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(2, "B"));
        repo.add_favorite(FavoriteKind::Show, FavoriteEntry::new(3, "C"));

        assert_eq!(repo.clear_favorites(FavoriteKind::Movie), Outcome::Ok(()));
        assert!(repo.list_favorites(FavoriteKind::Movie).value().is_empty());
        assert!(repo.is_favorite(FavoriteKind::Show, 3));
        assert_eq!(repo.storage().backend().get(FAVORITE_MOVIES_KEY).unwrap(), None);
    }

    #[test]
    fn test_blocked_storage_reports_not_favorite() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(1, "A"));
        repo.storage().backend().set_blocked(true);
        assert!(!repo.is_favorite(FavoriteKind::Movie, 1));
        assert!(repo.add_favorite(FavoriteKind::Movie, FavoriteEntry::new(2, "B")).is_degraded());
    }
}
