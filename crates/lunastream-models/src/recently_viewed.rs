use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentShow {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentEpisode {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub name: String,
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default)]
    pub air_date: Option<String>,
}

impl RecentEpisode {
    /// Episodes are deduplicated by (season, episode) within a show
    pub fn same_slot(&self, other: &RecentEpisode) -> bool {
        self.season_number == other.season_number && self.episode_number == other.episode_number
    }
}

/// Recently viewed episodes of a single show, most recent first
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecentShowEpisodes {
    pub show: RecentShow,
    #[serde(default)]
    pub episodes: Vec<RecentEpisode>,
}
