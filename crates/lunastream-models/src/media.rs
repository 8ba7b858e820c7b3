use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of title tracked in "continue watching"
///
/// Values written by older or foreign clients that we don't recognise
/// deserialize to `Unknown` instead of failing the whole collection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
    Anime,
    #[serde(other)]
    Unknown,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
            MediaKind::Anime => "anime",
            MediaKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Media types an embed provider can play
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EmbedMediaType {
    Movie,
    Tv,
}

impl EmbedMediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedMediaType::Movie => "movie",
            EmbedMediaType::Tv => "tv",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Some(EmbedMediaType::Movie),
            "tv" => Some(EmbedMediaType::Tv),
            _ => None,
        }
    }
}

impl fmt::Display for EmbedMediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Favorites are kept as two independent sets
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteKind {
    Movie,
    Show,
}

impl FavoriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FavoriteKind::Movie => "movie",
            FavoriteKind::Show => "show",
        }
    }
}

impl fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
