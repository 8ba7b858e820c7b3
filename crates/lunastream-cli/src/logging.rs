use anyhow::Result;
use lunastream_config::LoggingConfig;
use std::io;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directive for the given verbosity
///
/// `-q` wins over everything, `-v`/`-vv` override the configured level and
/// `RUST_LOG` overrides the configured level when no flag is given.
fn filter_for(verbose_level: u8, quiet: bool, configured: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    match verbose_level {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured)),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn file_appender(log_path: &Path) -> Result<RollingFileAppender> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let log_filename = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename"))?;

    // lunastream.log rotates to lunastream.2026-01-17 etc.
    let log_prefix = log_filename.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(log_filename);

    Ok(RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix))
}

pub fn init_logging(verbose_level: u8, quiet: bool, config: &LoggingConfig) -> Result<()> {
    let filter = filter_for(verbose_level, quiet, &config.level);
    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or(config.json);

    let registry = Registry::default().with(filter);

    match &config.file {
        Some(log_path) => {
            let appender = file_appender(log_path)?;
            if json {
                registry
                    .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(appender))
                    .init();
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_timer(ChronoUtc::rfc_3339())
                            .with_ansi(false)
                            .with_writer(appender),
                    )
                    .init();
            }
        }
        None => {
            if json {
                registry
                    .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(io::stderr))
                    .init();
            } else {
                registry
                    .with(fmt::layer().with_timer(ChronoUtc::rfc_3339()).with_writer(io::stderr))
                    .init();
            }
        }
    }

    Ok(())
}
