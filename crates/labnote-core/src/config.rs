use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::LabnoteError;

/// User configuration loaded from `~/.config/labnote/config.toml`.
///
/// All fields have sensible defaults so the config file is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON file holding the persisted tab groups.
    pub state_path: Option<PathBuf>,
    /// Base URL of the notebook REST API, e.g. `http://localhost:3000`.
    pub api_base_url: Option<String>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    pub log_path: Option<PathBuf>,
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_max_results() -> usize {
    50
}

fn default_recent_limit() -> usize {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_path: None,
            api_base_url: None,
            debounce_ms: default_debounce_ms(),
            max_results: default_max_results(),
            recent_limit: default_recent_limit(),
            log_path: None,
        }
    }
}

impl Config {
    /// Load the config from `path`, falling back to defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, LabnoteError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let read_err = |e: Box<dyn std::error::Error + Send + Sync>| LabnoteError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        };
        let content = std::fs::read_to_string(path).map_err(|e| read_err(Box::new(e)))?;
        toml::from_str(&content).map_err(|e| read_err(Box::new(e)))
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn state_path(&self) -> PathBuf {
        self.state_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("tabs.json"))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_path
            .clone()
            .unwrap_or_else(|| Self::data_dir().join("labnote.log"))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    fn config_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn data_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "labnote")
    }
}
