use crate::error::Outcome;
use crate::store::KeyValueStore;
use crate::watch_state::{
    WatchStateRepository, RECENT_EPISODES_KEY, RECENT_MOVIES_KEY, RECENT_SHOWS_KEY,
};
use lunastream_models::{RecentEpisode, RecentMovie, RecentShow, RecentShowEpisodes};
use std::collections::BTreeMap;

/// Recently viewed episodes keyed by show id
pub type RecentEpisodes = BTreeMap<u64, RecentShowEpisodes>;

/// Move `entry` to the front, dropping older copies and anything past `max`
fn push_front<T>(list: Vec<T>, entry: T, max: usize, same: impl Fn(&T, &T) -> bool) -> Vec<T> {
    let mut updated: Vec<T> = Vec::with_capacity(list.len() + 1);
    let rest: Vec<T> = list.into_iter().filter(|existing| !same(existing, &entry)).collect();
    updated.push(entry);
    updated.extend(rest);
    updated.truncate(max);
    updated
}

impl<S: KeyValueStore> WatchStateRepository<S> {
    pub fn recent_movies(&self) -> Outcome<Vec<RecentMovie>> {
        self.storage.read_list(RECENT_MOVIES_KEY)
    }

    pub fn recent_shows(&self) -> Outcome<Vec<RecentShow>> {
        self.storage.read_list(RECENT_SHOWS_KEY)
    }

    pub fn recent_episodes(&self) -> Outcome<RecentEpisodes> {
        self.storage.read_map(RECENT_EPISODES_KEY)
    }

    pub fn record_movie_view(&self, movie: RecentMovie) -> Outcome<Vec<RecentMovie>> {
        let movies = push_front(
            self.recent_movies().into_value(),
            movie,
            self.limits.max_recent_movies,
            |a, b| a.id == b.id,
        );
        let written = self.storage.write(RECENT_MOVIES_KEY, &movies);
        written.with_value(movies)
    }

    pub fn record_show_view(&self, show: RecentShow) -> Outcome<Vec<RecentShow>> {
        let shows = push_front(
            self.recent_shows().into_value(),
            show,
            self.limits.max_recent_shows,
            |a, b| a.id == b.id,
        );
        let written = self.storage.write(RECENT_SHOWS_KEY, &shows);
        written.with_value(shows)
    }

    /// Record an episode under its show, refreshing the show's display fields
    pub fn record_episode_view(&self, show: RecentShow, episode: RecentEpisode) -> Outcome<RecentEpisodes> {
        let mut groups = self.recent_episodes().into_value();
        let show_id = show.id;

        let previous = groups.remove(&show_id).map(|group| group.episodes).unwrap_or_default();
        let episodes = push_front(previous, episode, self.limits.max_recent_episodes, RecentEpisode::same_slot);
        groups.insert(show_id, RecentShowEpisodes { show, episodes });

        let written = self.storage.write(RECENT_EPISODES_KEY, &groups);
        written.with_value(groups)
    }

    /// Forget every recently viewed movie, show and episode
    pub fn clear_recently_viewed(&self) -> Outcome<()> {
        let mut outcome = Outcome::Ok(());
        for key in [RECENT_MOVIES_KEY, RECENT_SHOWS_KEY, RECENT_EPISODES_KEY] {
            let removed = self.storage.remove(key);
            if !outcome.is_degraded() && removed.is_degraded() {
                outcome = removed;
            }
        }
        outcome
    }
}
