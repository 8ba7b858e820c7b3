use crate::error::Outcome;
use crate::store::KeyValueStore;
use crate::watch_state::{WatchStateRepository, WATCHLIST_MOVIES_KEY, WATCHLIST_SHOWS_KEY};
use lunastream_models::{FavoriteEntry, FavoriteKind};
use tracing::info;

fn watchlist_key(kind: FavoriteKind) -> &'static str {
    match kind {
        FavoriteKind::Movie => WATCHLIST_MOVIES_KEY,
        FavoriteKind::Show => WATCHLIST_SHOWS_KEY,
    }
}

/// Titles the user started playing, kept apart from favorites
impl<S: KeyValueStore> WatchStateRepository<S> {
    pub fn list_watchlist(&self, kind: FavoriteKind) -> Outcome<Vec<FavoriteEntry>> {
        self.list_entries(watchlist_key(kind))
    }

    pub fn is_in_watchlist(&self, kind: FavoriteKind, id: u64) -> bool {
        self.list_watchlist(kind).value().iter().any(|entry| entry.id == id)
    }

    pub fn add_to_watchlist(&self, kind: FavoriteKind, entry: FavoriteEntry) -> Outcome<()> {
        self.add_entry(watchlist_key(kind), entry)
    }

    pub fn remove_from_watchlist(&self, kind: FavoriteKind, id: u64) -> Outcome<()> {
        self.remove_entry(watchlist_key(kind), id)
    }

    pub fn clear_watchlist(&self, kind: FavoriteKind) -> Outcome<()> {
        info!("Clearing {} watchlist", kind);
        self.storage.remove(watchlist_key(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_watchlist_is_separate_from_favorites() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        repo.add_to_watchlist(FavoriteKind::Movie, FavoriteEntry::new(1, "A"));

        assert!(repo.is_in_watchlist(FavoriteKind::Movie, 1));
        assert!(!repo.is_favorite(FavoriteKind::Movie, 1));
        assert!(!repo.is_in_watchlist(FavoriteKind::Show, 1));
    }

    #[test]
    fn test_add_remove_and_clear() {
        let repo = WatchStateRepository::new(MemoryStore::new());
        repo.add_to_watchlist(FavoriteKind::Show, FavoriteEntry::new(1, "A"));
        repo.add_to_watchlist(FavoriteKind::Show, FavoriteEntry::new(2, "B"));
        repo.add_to_watchlist(FavoriteKind::Show, FavoriteEntry::new(1, "A"));

        let ids: Vec<u64> = repo.list_watchlist(FavoriteKind::Show).into_value().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);

        repo.remove_from_watchlist(FavoriteKind::Show, 2);
        assert!(!repo.is_in_watchlist(FavoriteKind::Show, 2));

        assert_eq!(repo.clear_watchlist(FavoriteKind::Show), Outcome::Ok(()));
        assert!(repo.list_watchlist(FavoriteKind::Show).value().is_empty());
    }
}
