pub mod clock;
pub mod error;
pub mod favorites;
pub mod lifetime;
pub mod playback;
pub mod preferences;
pub mod progress;
pub mod provider;
pub mod recently_viewed;
pub mod session;
pub mod storage;
pub mod store;
pub mod watch_state;
pub mod watchlist;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Outcome, StoreError};
pub use lifetime::{LifetimeToken, ViewLifetime};
pub use playback::{Handled, MessageHandler, PlaybackListener, PlayerMessage, PlayerWindow, Subscription};
pub use preferences::PreferenceStore;
pub use progress::WatchProgress;
pub use provider::{resolve, EmbedRequest, Provider, ProviderRegistry, ResolveError, BUILTIN_PROVIDERS};
pub use recently_viewed::RecentEpisodes;
pub use session::{PlaybackRequest, PlayerSession};
pub use storage::Storage;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use watch_state::{continue_watching_id, Limits, WatchStateRepository};
