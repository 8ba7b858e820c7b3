use crate::output::Output;
use crate::ConfigCommands;
use color_eyre::Result;
use lunastream_config::{Config, PathManager};
use serde_json::json;

pub async fn run_config(cmd: ConfigCommands, paths: &PathManager, config: &Config, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(paths, config, output),
        ConfigCommands::Init { force } => init_config(paths, force, output),
    }
}

fn show_config(paths: &PathManager, config: &Config, output: &Output) -> Result<()> {
    let config_file = paths.config_file();

    if !output.is_human() {
        output.data(&json!({
            "configFile": config_file.display().to_string(),
            "exists": config_file.exists(),
            "storeDir": paths.store_dir().display().to_string(),
            "storage": {
                "maxContinueWatching": config.storage.max_continue_watching,
                "maxRecentMovies": config.storage.max_recent_movies,
                "maxRecentShows": config.storage.max_recent_shows,
                "maxRecentEpisodes": config.storage.max_recent_episodes,
                "quotaBytes": config.storage.quota_bytes,
            },
            "player": {
                "defaultProvider": config.player.default_provider,
                "themeColor": config.player.theme_color,
            },
            "logging": {
                "level": config.logging.level,
                "json": config.logging.json,
                "file": config.logging.file.as_ref().map(|f| f.display().to_string()),
            },
        }));
        return Ok(());
    }

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Showing defaults. Run 'lunastream config init' to write them to disk.");
    }

    let quota = config
        .storage
        .quota_bytes
        .map(|q| q.to_string())
        .unwrap_or_else(|| "unlimited".to_string());
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|f| f.display().to_string())
        .unwrap_or_else(|| "stderr".to_string());

    let rows = vec![
        vec!["Config file".to_string(), config_file.display().to_string()],
        vec!["Store directory".to_string(), paths.store_dir().display().to_string()],
        vec!["storage.max_continue_watching".to_string(), config.storage.max_continue_watching.to_string()],
        vec!["storage.max_recent_movies".to_string(), config.storage.max_recent_movies.to_string()],
        vec!["storage.max_recent_shows".to_string(), config.storage.max_recent_shows.to_string()],
        vec!["storage.max_recent_episodes".to_string(), config.storage.max_recent_episodes.to_string()],
        vec!["storage.quota_bytes".to_string(), quota],
        vec!["player.default_provider".to_string(), config.player.default_provider.clone()],
        vec!["player.theme_color".to_string(), config.player.theme_color.clone()],
        vec!["logging.level".to_string(), config.logging.level.clone()],
        vec!["logging.json".to_string(), config.logging.json.to_string()],
        vec!["logging.file".to_string(), log_file],
    ];
    output.table("Configuration", &["Setting", "Value"], rows, &());
    Ok(())
}

fn init_config(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Configuration already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
        return Ok(());
    }

    paths
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create directories: {}", e))?;
    let mut config = Config::default();
    config.logging.file = Some(paths.log_file());
    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to write config to {}: {}", config_file.display(), e))?;
    output.success(format!("Configuration written to {}", config_file.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;

    #[test]
    fn test_init_writes_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::rooted_at(dir.path().to_path_buf());
        let output = Output::new(OutputFormat::Json, true);

        init_config(&paths, false, &output).unwrap();
        let loaded = Config::load_or_default(&paths.config_file()).unwrap();
        assert_eq!(loaded.player.default_provider, "videasy");
        assert!(paths.store_dir().exists());
        assert_eq!(loaded.logging.file, Some(paths.log_file()));
        assert!(paths.log_dir().is_dir());

        std::fs::write(paths.config_file(), "[player]\ndefault_provider = \"vidfast\"\n").unwrap();
        init_config(&paths, false, &output).unwrap();
        let kept = Config::load_or_default(&paths.config_file()).unwrap();
        assert_eq!(kept.player.default_provider, "vidfast");

        init_config(&paths, true, &output).unwrap();
        let reset = Config::load_or_default(&paths.config_file()).unwrap();
        assert_eq!(reset.player.default_provider, "videasy");
    }
}
