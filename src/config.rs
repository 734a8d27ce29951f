use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

const DEFAULT_NEWS_URL: &str = "https://newsdata.io/api/1/news";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Title shown in the header
  pub title: String,
  pub news: NewsConfig,
  /// Delay before a category switch issues a request
  pub debounce_ms: u64,
  pub cache: CacheConfig,
  pub log: LogConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      title: "Global Live News".to_string(),
      news: NewsConfig::default(),
      debounce_ms: 600,
      cache: CacheConfig::default(),
      log: LogConfig::default(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
  pub url: String,
  /// Two-letter country code sent with every unpaged request
  pub country: String,
  pub language: Option<String>,
  pub timeout_secs: u64,
}

impl Default for NewsConfig {
  fn default() -> Self {
    Self {
      url: DEFAULT_NEWS_URL.to_string(),
      country: "us".to_string(),
      language: None,
      timeout_secs: 15,
    }
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
  /// Override for the cache database location
  pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
  /// EnvFilter directive, overridden by RUST_LOG
  pub level: String,
  pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      level: "info".to_string(),
      dir: None,
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./newsdeck.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/newsdeck/config.yaml
  ///
  /// Falls back to built-in defaults when no file is found.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => {
        info!("No configuration file found, using defaults");
        Ok(Self::default())
      }
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("newsdeck.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("newsdeck").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    // An empty file deserializes to null
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    let config: Config = serde_yaml::from_str(contents)?;
    Ok(config)
  }

  pub fn debounce(&self) -> Duration {
    Duration::from_millis(self.debounce_ms)
  }

  /// Directory for the cache database and log files
  pub fn data_dir() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("newsdeck"))
  }

  /// Get the news API key from environment variables.
  ///
  /// Checks NEWSDECK_API_KEY first, then NEWSDATA_API_KEY as fallback.
  pub fn get_api_key() -> Result<String> {
    std::env::var("NEWSDECK_API_KEY")
      .or_else(|_| std::env::var("NEWSDATA_API_KEY"))
      .map_err(|_| {
        eyre!("News API key not found. Set NEWSDECK_API_KEY or NEWSDATA_API_KEY environment variable.")
      })
  }
}
