use anyhow::Result;
use std::path::{Path, PathBuf};

/// Get the container base path from environment variable, defaulting to "/app"
pub fn container_base_path() -> PathBuf {
    std::env::var("LUNASTREAM_BASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/app"))
}

pub struct PathManager {
    config_dir: PathBuf,
    data_dir: PathBuf,
    log_dir: PathBuf,
}

impl PathManager {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
            .join("lunastream");

        Ok(Self::rooted_at(base_dir))
    }

    /// Lay out config, data and logs under a single directory
    pub fn rooted_at(base: PathBuf) -> Self {
        Self {
            config_dir: base.clone(),
            data_dir: base.join("data"),
            log_dir: base.join("logs"),
        }
    }

    pub fn from_docker_env() -> Self {
        Self::rooted_at(container_base_path())
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Directory holding one JSON file per storage key
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_dir.join("lunastream.log")
    }

    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)?;
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        std::fs::create_dir_all(self.store_dir())?;
        Ok(())
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // The container base directory only exists inside the image
        let base = container_base_path();
        if base.exists() {
            return Self::from_docker_env();
        }

        Self::new().unwrap_or_else(|_| Self::from_docker_env())
    }
}
