use crate::clock::{Clock, SystemClock};
use crate::error::{Outcome, StoreError};
use crate::storage::Storage;
use crate::store::KeyValueStore;
use lunastream_config::StorageConfig;
use lunastream_models::{ContinueWatchingItem, MediaKind, NewWatchItem};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const CONTINUE_WATCHING_KEY: &str = "continueWatching";
pub const FAVORITE_MOVIES_KEY: &str = "favoriteMovies";
pub const FAVORITE_SHOWS_KEY: &str = "favoriteShows";
pub const RECENT_MOVIES_KEY: &str = "recentlyViewedMovies";
pub const RECENT_SHOWS_KEY: &str = "recentlyViewedTV";
pub const RECENT_EPISODES_KEY: &str = "recentlyViewedTVEpisodes";
pub const WATCH_PROGRESS_KEY: &str = "watch_progress";
pub const WATCHLIST_MOVIES_KEY: &str = "watchlistMovies";
pub const WATCHLIST_SHOWS_KEY: &str = "watchlistShows";

/// Collection caps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_continue_watching: usize,
    pub max_recent_movies: usize,
    pub max_recent_shows: usize,
    pub max_recent_episodes: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for Limits {
    fn from(config: &StorageConfig) -> Self {
        Self {
            max_continue_watching: config.max_continue_watching,
            max_recent_movies: config.max_recent_movies,
            max_recent_shows: config.max_recent_shows,
            max_recent_episodes: config.max_recent_episodes,
        }
    }
}

/// Identity key of a continue-watching entry
///
/// Movies collapse per title; tv entries are per (season, episode) and
/// anime entries per (episode, dub/sub), so several episodes of one show
/// are tracked side by side. An unknown kind gets a timestamped key that
/// never matches an existing entry.
pub fn continue_watching_id(item: &NewWatchItem, now_ms: i64) -> Result<String, StoreError> {
    let missing = |field: &str| {
        StoreError::InvalidItem(format!("{} item is missing {}", item.kind, field))
    };

    match item.kind {
        MediaKind::Movie => {
            let tmdb_id = item.tmdb_id.ok_or_else(|| missing("tmdbId"))?;
            Ok(format!("movie-{}", tmdb_id))
        }
        MediaKind::Tv => {
            let tmdb_id = item.tmdb_id.ok_or_else(|| missing("tmdbId"))?;
            let season = item.season.ok_or_else(|| missing("season"))?;
            let episode = item.episode.ok_or_else(|| missing("episode"))?;
            Ok(format!("tv-{}-s{}-e{}", tmdb_id, season, episode))
        }
        MediaKind::Anime => {
            let anilist_id = item.anilist_id.ok_or_else(|| missing("anilistId"))?;
            let episode = item.episode.ok_or_else(|| missing("episode"))?;
            let audio = if item.is_dub.unwrap_or(false) { "dub" } else { "sub" };
            Ok(format!("anime-{}-e{}-{}", anilist_id, episode, audio))
        }
        MediaKind::Unknown => Ok(format!("unknown-{}", now_ms)),
    }
}

/// Sole owner of the persisted watch state
///
/// Every call goes back to the store; there is no cache, so the latest
/// write from this process is always visible to the next read.
pub struct WatchStateRepository<S> {
    pub(crate) storage: Storage<S>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) limits: Limits,
}

impl<S: KeyValueStore> WatchStateRepository<S> {
    pub fn new(backend: S) -> Self {
        Self {
            storage: Storage::new(backend),
            clock: Arc::new(SystemClock),
            limits: Limits::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn storage(&self) -> &Storage<S> {
        &self.storage
    }

    pub(crate) fn now(&self) -> i64 {
        self.clock.now_ms()
    }

    /// Continue-watching entries, most recent first
    pub fn list_continue_watching(&self) -> Outcome<Vec<ContinueWatchingItem>> {
        let max = self.limits.max_continue_watching;
        self.storage
            .read_list::<ContinueWatchingItem>(CONTINUE_WATCHING_KEY)
            .map(|mut items| {
                items.sort_by(|a, b| b.last_watched.cmp(&a.last_watched));
                items.truncate(max);
                items
            })
    }

    /// Insert or refresh an entry; returns the id that was written
    pub fn add_or_update(&self, item: NewWatchItem) -> Outcome<Option<String>> {
        let now = self.now();
        let id = match continue_watching_id(&item, now) {
            Ok(id) => id,
            Err(e) => {
                warn!("Not saving continue watching item '{}': {}", item.title, e);
                return Outcome::degraded(None, e);
            }
        };

        let existing = self.list_continue_watching();
        if let Some(reason) = existing.reason() {
            debug!("Rebuilding continue watching after degraded read: {}", reason);
        }

        let mut items: Vec<ContinueWatchingItem> = existing
            .into_value()
            .into_iter()
            .filter(|existing| existing.id != id)
            .collect();
        items.insert(0, item.into_item(id.clone(), now));
        items.truncate(self.limits.max_continue_watching);

        debug!("Continue watching updated: {} ({} items)", id, items.len());
        self.storage.write(CONTINUE_WATCHING_KEY, &items).with_value(Some(id))
    }

    /// Remove one entry; absent ids are a no-op
    pub fn remove(&self, id: &str) -> Outcome<()> {
        let existing = self.list_continue_watching();
        if existing.is_degraded() {
            return existing.with_value(());
        }

        let items = existing.into_value();
        let before = items.len();
        let items: Vec<ContinueWatchingItem> = items.into_iter().filter(|item| item.id != id).collect();
        if items.len() == before {
            debug!("Continue watching remove: {} not present", id);
            return Outcome::Ok(());
        }
        self.storage.write(CONTINUE_WATCHING_KEY, &items)
    }

    pub fn clear_all(&self) -> Outcome<()> {
        info!("Clearing continue watching");
        self.storage.remove(CONTINUE_WATCHING_KEY)
    }

    /// Episode following a tv entry, if the entry has one
    pub fn next_episode(item: &ContinueWatchingItem) -> Option<(u32, u32)> {
        if item.kind != MediaKind::Tv {
            return None;
        }
        match (item.season, item.episode) {
            (Some(season), Some(episode)) if season > 0 && episode > 0 => Some((season, episode + 1)),
            _ => None,
        }
    }
}
