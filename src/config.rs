//! Application configuration loaded from TOML.
//!
//! ```toml
//! db_path = "/home/me/moods.db"
//! log_filter = "moodlog=debug"
//!
//! [tracker]
//! snapshot_buffer = 256
//! event_buffer = 256
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::runtime::handle::TrackerConfig;

/// Errors raised while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for [`AppConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level settings for the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database location; defaults to the platform data directory.
    pub db_path: Option<PathBuf>,
    /// `tracing` filter used when `MOODLOG_LOG` is unset.
    pub log_filter: String,
    /// Tracker channel sizing.
    pub tracker: TrackerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_filter: "info".to_string(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads `path`, or the default location when `None`.
    ///
    /// A missing file yields defaults; an unreadable or malformed one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };

        match fs::read_to_string(&path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    /// Parses TOML text; absent keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// `~/.config/moodlog/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("moodlog").join("config.toml"))
    }

    /// Configured database path or `<data dir>/moodlog/moods.db`.
    pub fn resolved_db_path(&self) -> Option<PathBuf> {
        self.db_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("moodlog").join("moods.db")))
    }
}
