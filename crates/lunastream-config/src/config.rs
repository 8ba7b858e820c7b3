use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_PROVIDER: &str = "videasy";
pub const DEFAULT_THEME_COLOR: &str = "fbc9ff";

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Limits of the persisted collections
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_max_continue_watching")]
    pub max_continue_watching: usize,
    #[serde(default = "default_max_recent_movies")]
    pub max_recent_movies: usize,
    #[serde(default = "default_max_recent_shows")]
    pub max_recent_shows: usize,
    #[serde(default = "default_max_recent_episodes")]
    pub max_recent_episodes: usize,
    /// Total bytes the file store may hold; writes beyond it are dropped
    #[serde(default)]
    pub quota_bytes: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerConfig {
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Hex colour without the leading '#'
    #[serde(default = "default_theme_color")]
    pub theme_color: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_json_logging")]
    pub json: bool,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_max_continue_watching() -> usize {
    10
}

fn default_max_recent_movies() -> usize {
    10
}

fn default_max_recent_shows() -> usize {
    5
}

fn default_max_recent_episodes() -> usize {
    5
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

fn default_theme_color() -> String {
    DEFAULT_THEME_COLOR.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_json_logging() -> bool {
    use std::io::IsTerminal;
    !std::io::stdout().is_terminal()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            max_continue_watching: default_max_continue_watching(),
            max_recent_movies: default_max_recent_movies(),
            max_recent_shows: default_max_recent_shows(),
            max_recent_episodes: default_max_recent_episodes(),
            quota_bytes: None,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            theme_color: default_theme_color(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: default_json_logging(),
            file: None,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file, or the defaults when it doesn't exist yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let limits = [
            ("max_continue_watching", self.storage.max_continue_watching),
            ("max_recent_movies", self.storage.max_recent_movies),
            ("max_recent_shows", self.storage.max_recent_shows),
            ("max_recent_episodes", self.storage.max_recent_episodes),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(anyhow::anyhow!("storage.{} must be greater than zero", name));
            }
        }

        if self.player.default_provider.trim().is_empty() {
            return Err(anyhow::anyhow!("player.default_provider cannot be empty"));
        }

        let color = &self.player.theme_color;
        if !(color.len() == 3 || color.len() == 6) || !color.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!(
                "player.theme_color must be a 3 or 6 digit hex colour without '#', got '{}'",
                color
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.storage.max_continue_watching = 20;
        config.player.default_provider = "vidfast".to_string();

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.storage.max_continue_watching, 20);
        assert_eq!(loaded.storage.max_recent_episodes, 5);
        assert_eq!(loaded.player.default_provider, "vidfast");
        assert_eq!(loaded.player.theme_color, DEFAULT_THEME_COLOR);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "[player]\ntheme_color = \"ff0000\"\n").unwrap();

        let loaded = Config::load_or_default(&file.path().to_path_buf()).unwrap();
        assert_eq!(loaded.player.theme_color, "ff0000");
        assert_eq!(loaded.player.default_provider, DEFAULT_PROVIDER);
        assert_eq!(loaded.storage.max_continue_watching, 10);
        assert_eq!(loaded.storage.quota_bytes, None);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(loaded.storage.max_recent_movies, 10);
        assert_eq!(loaded.storage.max_recent_shows, 5);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.storage.max_continue_watching = 0;
        assert!(config.validate().is_err());

        config.storage.max_continue_watching = 10;
        config.player.theme_color = "#fbc9ff".to_string();
        assert!(config.validate().is_err());

        config.player.theme_color = "abc".to_string();
        assert!(config.validate().is_ok());

        config.player.default_provider = " ".to_string();
        assert!(config.validate().is_err());
    }
}
