use serde::{Deserialize, Serialize};
use crate::media::MediaKind;

/// Persisted "continue watching" record
///
/// Field names are camelCase on disk so collections written by the web
/// client read back unchanged. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContinueWatchingItem {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anilist_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster: String,
    /// Epoch milliseconds of the last write, the sort key
    pub last_watched: i64,
    /// Percentage in [0, 100]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_episodes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dub: Option<bool>,
}

/// Input to `add_or_update`: an item without `id` and `last_watched`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewWatchItem {
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub anilist_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster: String,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub episode_title: Option<String>,
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default)]
    pub is_dub: Option<bool>,
}

impl NewWatchItem {
    fn empty(kind: MediaKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            tmdb_id: None,
            anilist_id: None,
            title: title.into(),
            poster: String::new(),
            progress: None,
            season: None,
            episode: None,
            episode_title: None,
            total_episodes: None,
            is_dub: None,
        }
    }

    pub fn movie(tmdb_id: u64, title: impl Into<String>) -> Self {
        Self {
            tmdb_id: Some(tmdb_id),
            ..Self::empty(MediaKind::Movie, title)
        }
    }

    pub fn tv(tmdb_id: u64, title: impl Into<String>, season: u32, episode: u32) -> Self {
        Self {
            tmdb_id: Some(tmdb_id),
            season: Some(season),
            episode: Some(episode),
            ..Self::empty(MediaKind::Tv, title)
        }
    }

    pub fn anime(anilist_id: u64, title: impl Into<String>, episode: u32, is_dub: bool) -> Self {
        Self {
            anilist_id: Some(anilist_id),
            episode: Some(episode),
            is_dub: Some(is_dub),
            ..Self::empty(MediaKind::Anime, title)
        }
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = poster.into();
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_episode_title(mut self, episode_title: impl Into<String>) -> Self {
        self.episode_title = Some(episode_title.into());
        self
    }

    /// Stamp the item with its identity key and write time
    pub fn into_item(self, id: String, last_watched: i64) -> ContinueWatchingItem {
        ContinueWatchingItem {
            id,
            kind: self.kind,
            tmdb_id: self.tmdb_id,
            anilist_id: self.anilist_id,
            title: self.title,
            poster: self.poster,
            last_watched,
            progress: self.progress.map(|p| p.clamp(0.0, 100.0)),
            season: self.season,
            episode: self.episode,
            episode_title: self.episode_title,
            total_episodes: self.total_episodes,
            is_dub: self.is_dub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_uses_camel_case_on_disk() {
        let item = NewWatchItem::tv(7, "Show", 1, 2)
            .with_episode_title("Pilot")
            .into_item("tv-7-s1-e2".to_string(), 1_000);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["type"], "tv");
        assert_eq!(json["tmdbId"], 7);
        assert_eq!(json["lastWatched"], 1_000);
        assert_eq!(json["episodeTitle"], "Pilot");
        assert!(json.get("anilistId").is_none());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let raw = r#"{"id":"movie-1","type":"movie","tmdbId":1,"title":"A","poster":"","lastWatched":5,"rating":9}"#;
        let item: ContinueWatchingItem = serde_json::from_str(raw).unwrap();
        assert_eq!(item.id, "movie-1");
        assert_eq!(item.tmdb_id, Some(1));
    }

    #[test]
    fn test_progress_is_clamped() {
        let item = NewWatchItem::movie(1, "A")
            .with_progress(140.0)
            .into_item("movie-1".to_string(), 0);
        assert_eq!(item.progress, Some(100.0));
    }
}
