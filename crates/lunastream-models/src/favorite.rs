use serde::{Deserialize, Serialize};

/// Denormalized favorite or watchlist entry for a movie or show
///
/// `date` holds the release date for movies and first air date for shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteEntry {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    /// Epoch milliseconds, 0 for entries written without a timestamp
    #[serde(default)]
    pub added_at: i64,
}

impl FavoriteEntry {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            date: None,
            vote_average: None,
            added_at: 0,
        }
    }
}
