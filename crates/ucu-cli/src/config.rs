//! Dashboard configuration file.
//!
//! Stored as TOML in the platform config folder:
//! - macOS: ~/Library/Application Support/ac.ucu.UCU-Analytics/config.toml
//! - Windows: %APPDATA%/ucu/UCU Analytics/config/config.toml
//! - Linux: ~/.config/ucu-analytics/config.toml
//!
//! The API token is never read from this file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use ucu_persistence::DEFAULT_KEY_PREFIX;

const APP_QUALIFIER: &str = "ac";
const APP_ORG: &str = "ucu";
const APP_NAME: &str = "UCU Analytics";
const CONFIG_FILENAME: &str = "config.toml";
const STATE_DIRNAME: &str = "page-state";

/// Environment variable holding the bearer token for the options service.
pub const TOKEN_ENV_VAR: &str = "UCU_API_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Root of the analytics API.
    pub api_base_url: String,
    /// Where page snapshots are kept. Defaults to the platform data folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
    /// Prefix of every snapshot key.
    pub key_prefix: String,
    /// Scopes whose option lists are cached per run. `0` disables the cache.
    pub options_cache_capacity: usize,
    pub request_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            storage_dir: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            options_cache_capacity: 0,
            request_timeout_secs: 30,
        }
    }
}

impl DashboardConfig {
    /// Parse a config document. Missing fields take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// The snapshot directory: the configured one, or the platform default.
    pub fn state_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().join(STATE_DIRNAME))
            .context("could not determine a data directory; set storage_dir in the config file")
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
}

/// Default location of the config file, if the platform has one.
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Load the config from `path`, or from [`config_path`] when `None`.
///
/// Returns defaults if:
/// - no path can be determined
/// - the file doesn't exist
/// - the file cannot be read or parsed
pub fn load_config(path: Option<&Path>) -> DashboardConfig {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) => path,
            None => {
                tracing::warn!("Could not determine config path, using defaults");
                return DashboardConfig::default();
            }
        },
    };

    match fs::read_to_string(&path) {
        Ok(content) => match DashboardConfig::from_toml_str(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Failed to parse config file {:?}: {}, using defaults", path, e);
                DashboardConfig::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {:?}, using defaults", path);
            DashboardConfig::default()
        }
        Err(e) => {
            tracing::warn!("Failed to read config file {:?}: {}, using defaults", path, e);
            DashboardConfig::default()
        }
    }
}
