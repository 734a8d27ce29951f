use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogConfig};

const LOG_FILE_PREFIX: &str = "newsdeck.log";

/// Install the global subscriber writing to a daily rolling file.
///
/// The terminal belongs to the UI, so nothing is logged to stdout or stderr.
/// Keep the returned guard alive until exit or buffered lines are lost.
pub fn init_logging(config: &LogConfig) -> Result<WorkerGuard> {
  let dir = log_dir(config)?;
  std::fs::create_dir_all(&dir)
    .map_err(|e| eyre!("Failed to create log directory {}: {}", dir.display(), e))?;

  let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
  let (writer, guard) = tracing_appender::non_blocking(appender);

  tracing_subscriber::registry()
    .with(filter(&config.level))
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false),
    )
    .try_init()
    .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

  Ok(guard)
}

fn log_dir(config: &LogConfig) -> Result<PathBuf> {
  match &config.dir {
    Some(dir) => Ok(dir.clone()),
    None => Ok(Config::data_dir()?.join("logs")),
  }
}

/// RUST_LOG wins over the configured level
fn filter(level: &str) -> EnvFilter {
  EnvFilter::try_from_default_env()
    .or_else(|_| EnvFilter::try_new(level))
    .unwrap_or_else(|_| EnvFilter::new("info"))
}
