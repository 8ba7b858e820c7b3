pub mod continue_watching;
pub mod favorite;
pub mod media;
pub mod preferences;
pub mod recently_viewed;
pub mod watch_progress;

pub use continue_watching::{ContinueWatchingItem, NewWatchItem};
pub use favorite::FavoriteEntry;
pub use media::{EmbedMediaType, FavoriteKind, MediaKind};
pub use preferences::{Preferences, PreferencesUpdate, Theme};
pub use recently_viewed::{RecentEpisode, RecentMovie, RecentShow, RecentShowEpisodes};
pub use watch_progress::WatchProgressEntry;
