pub mod clear;
pub mod config;
pub mod continue_watching;
pub mod favorite;
pub mod player;
pub mod prefs;
pub mod recent;
pub mod watchlist;

use crate::output::Output;
use color_eyre::Result;
use lunastream_config::{Config, PathManager};
use lunastream_core::{
    FileStore, KeyValueStore, Limits, MemoryStore, Outcome, PreferenceStore, ProviderRegistry,
    WatchStateRepository,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

pub type Backend = Arc<dyn KeyValueStore>;

pub fn path_manager(home: Option<PathBuf>) -> PathManager {
    match home {
        Some(base) => PathManager::rooted_at(base),
        None => PathManager::default(),
    }
}

pub fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    Config::load_or_default(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))
}

/// Everything a command needs, wired from the config
pub struct AppContext {
    pub repo: Arc<WatchStateRepository<Backend>>,
    pub prefs: PreferenceStore<Backend>,
    pub registry: ProviderRegistry,
}

impl AppContext {
    /// Open the file store, falling back to memory when it can't be used
    pub fn open(paths: &PathManager, config: &Config) -> Self {
        let backend: Backend = match FileStore::new(paths.store_dir()) {
            Ok(store) => {
                debug!("Using store at {}", store.dir().display());
                Arc::new(store.with_quota(config.storage.quota_bytes))
            }
            Err(e) => {
                warn!("Persistent storage unavailable, changes will not be kept: {}", e);
                Arc::new(MemoryStore::new())
            }
        };
        Self::with_backend(backend, config)
    }

    pub fn with_backend(backend: Backend, config: &Config) -> Self {
        let repo = WatchStateRepository::new(backend.clone()).with_limits(Limits::from(&config.storage));
        Self {
            repo: Arc::new(repo),
            prefs: PreferenceStore::new(backend),
            registry: ProviderRegistry::from_config(&config.player),
        }
    }
}

/// Unwrap an outcome, telling the user when the store could not keep up
pub fn report<T>(outcome: Outcome<T>, output: &Output) -> T {
    if let Some(reason) = outcome.reason() {
        output.warn(format!("Storage problem, result may be incomplete: {}", reason));
    }
    outcome.into_value()
}
