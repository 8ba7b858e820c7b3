pub mod config;
pub mod paths;

pub use config::{Config, LoggingConfig, PlayerConfig, StorageConfig, DEFAULT_PROVIDER, DEFAULT_THEME_COLOR};
pub use paths::{PathManager, container_base_path};
