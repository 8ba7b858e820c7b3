use crate::error::Outcome;
use crate::playback::{PlaybackListener, PlayerWindow, Subscription};
use crate::provider::{EmbedRequest, ProviderRegistry, ResolveError};
use crate::store::KeyValueStore;
use crate::watch_state::WatchStateRepository;
use lunastream_models::{
    EmbedMediaType, FavoriteEntry, FavoriteKind, NewWatchItem, RecentEpisode, RecentMovie, RecentShow,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Title shown in the player along with what to play
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRequest {
    pub embed: EmbedRequest,
    pub title: String,
    pub poster: String,
    pub episode_title: Option<String>,
    /// Release date for movies, first air date for shows
    pub date: Option<String>,
    pub vote_average: Option<f64>,
}

impl PlaybackRequest {
    pub fn new(embed: EmbedRequest, title: impl Into<String>) -> Self {
        Self {
            embed,
            title: title.into(),
            poster: String::new(),
            episode_title: None,
            date: None,
            vote_average: None,
        }
    }

    fn poster_path(&self) -> Option<String> {
        (!self.poster.is_empty()).then(|| self.poster.clone())
    }

    fn episode(&self) -> Option<(u32, u32)> {
        match (self.embed.media_type, self.embed.season, self.embed.episode) {
            (EmbedMediaType::Tv, Some(season), Some(episode)) => Some((season, episode)),
            _ => None,
        }
    }

    fn watchlist_entry(&self) -> FavoriteEntry {
        FavoriteEntry {
            poster_path: self.poster_path(),
            date: self.date.clone(),
            vote_average: self.vote_average,
            ..FavoriteEntry::new(self.embed.tmdb_id, self.title.clone())
        }
    }

    fn watch_item(&self) -> NewWatchItem {
        let mut item = match self.episode() {
            Some((season, episode)) => NewWatchItem::tv(self.embed.tmdb_id, self.title.clone(), season, episode),
            None => NewWatchItem::movie(self.embed.tmdb_id, self.title.clone()),
        };
        item.poster = self.poster.clone();
        item.episode_title = self.episode_title.clone();
        item.progress = Some(0.0);
        item
    }
}

struct ActivePlayback {
    request: PlaybackRequest,
    provider_id: String,
    url: String,
    _subscription: Subscription,
}

/// The open player view: one embed, one message listener
pub struct PlayerSession<S: KeyValueStore + 'static> {
    repo: Arc<WatchStateRepository<S>>,
    registry: ProviderRegistry,
    window: PlayerWindow,
    active: Option<ActivePlayback>,
}

impl<S: KeyValueStore + 'static> PlayerSession<S> {
    pub fn new(repo: Arc<WatchStateRepository<S>>, registry: ProviderRegistry) -> Self {
        Self { repo, registry, window: PlayerWindow::new(), active: None }
    }

    pub fn window(&self) -> &PlayerWindow {
        &self.window
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn current_url(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.url.as_str())
    }

    pub fn current_provider(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.provider_id.as_str())
    }

    /// Start playback: record the watch, build the embed URL, attach the listener
    ///
    /// Besides continue watching, the title goes to the front of recently
    /// viewed (the episode under its show for tv) and into the watchlist.
    /// Nothing is recorded when the URL can't be built. All writes are
    /// fail-silent; the continue-watching outcome is returned for logging.
    pub fn open(
        &mut self,
        provider_id: &str,
        request: PlaybackRequest,
    ) -> Result<(String, Outcome<Option<String>>), ResolveError> {
        let url = self.registry.resolve(provider_id, &request.embed)?;
        self.close();

        let recorded = self.repo.add_or_update(request.watch_item());
        self.record_history(&request);
        let listener = Arc::new(PlaybackListener::new(self.repo.clone()));
        let subscription = self.window.subscribe(listener);

        info!("Opening player for '{}' via {}", request.title, provider_id);
        self.active = Some(ActivePlayback {
            request,
            provider_id: self.registry.provider_or_default(provider_id).id.to_string(),
            url: url.clone(),
            _subscription: subscription,
        });
        Ok((url, recorded))
    }

    fn record_history(&self, request: &PlaybackRequest) {
        let (recent, watchlist) = match request.episode() {
            Some((season, episode)) => {
                let show = RecentShow {
                    id: request.embed.tmdb_id,
                    name: request.title.clone(),
                    poster_path: request.poster_path(),
                    first_air_date: request.date.clone(),
                };
                let entry = RecentEpisode {
                    id: None,
                    name: request.episode_title.clone().unwrap_or_default(),
                    season_number: season,
                    episode_number: episode,
                    air_date: None,
                };
                (
                    self.repo.record_episode_view(show, entry).with_value(()),
                    self.repo.add_to_watchlist(FavoriteKind::Show, request.watchlist_entry()),
                )
            }
            None => {
                let movie = RecentMovie {
                    id: request.embed.tmdb_id,
                    title: request.title.clone(),
                    poster_path: request.poster_path(),
                    release_date: request.date.clone(),
                };
                (
                    self.repo.record_movie_view(movie).with_value(()),
                    self.repo.add_to_watchlist(FavoriteKind::Movie, request.watchlist_entry()),
                )
            }
        };

        for reason in [recent.reason(), watchlist.reason()].into_iter().flatten() {
            warn!("Playback history for '{}' not saved: {}", request.title, reason);
        }
    }

    /// Point the open player at another provider; the listener stays attached
    pub fn switch_provider(&mut self, provider_id: &str) -> Option<Result<String, ResolveError>> {
        let registry = &self.registry;
        let active = self.active.as_mut()?;
        let result = registry.resolve(provider_id, &active.request.embed).map(|url| {
            active.provider_id = registry.provider_or_default(provider_id).id.to_string();
            active.url = url.clone();
            url
        });
        Some(result)
    }

    /// Close the player and detach its listener
    pub fn close(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("Closing player for '{}'", active.request.title);
        }
    }
}

impl<S: KeyValueStore + 'static> Drop for PlayerSession<S> {
    fn drop(&mut self) {
        self.close();
    }
}
