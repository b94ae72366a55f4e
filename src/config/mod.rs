//! Configuration for homefeeds.
//!
//! Read from `~/.config/homefeeds/config.toml` unless another path is given.
//! A missing file means defaults; the file is never written.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::decoder::DEFAULT_INTERNAL_PREFIX;
use crate::domain::Orientation;
use crate::resolver::FeedFiles;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Profile (user-data) directory holding the primary feed files
    pub profile_dir: Option<PathBuf>,
    /// Packaged application archive consulted when a profile file is missing
    pub package_path: Option<PathBuf>,
    /// Site-visit database used for top sites and favicons
    pub history_db: Option<PathBuf>,
    /// Orientation assumed at start-up
    pub orientation: Orientation,
    pub feeds: FeedsConfig,
}

/// File names and filtering for the file-backed feeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedsConfig {
    pub addons_file: String,
    pub session_file: String,
    /// Last tabs whose URL starts with this prefix are hidden
    pub internal_prefix: String,
}

impl Default for FeedsConfig {
    fn default() -> Self {
        let files = FeedFiles::default();
        Self {
            addons_file: files.addons,
            session_file: files.session,
            internal_prefix: DEFAULT_INTERNAL_PREFIX.to_string(),
        }
    }
}

impl FeedsConfig {
    pub fn files(&self) -> FeedFiles {
        FeedFiles {
            addons: self.addons_file.clone(),
            session: self.session_file.clone(),
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`. Missing fields use default values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/homefeeds/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("homefeeds").join("config.toml"))
    }

    /// Profile directory, defaulting to `<data dir>/homefeeds/profile`.
    pub fn resolved_profile_dir(&self) -> Option<PathBuf> {
        self.profile_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("homefeeds").join("profile")))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
