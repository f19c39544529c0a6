//! Client configuration
//!
//! Read from a YAML file; every field is optional and falls back to the
//! defaults below. Command-line flags override the file.
//!
//! ```yaml
//! base_url: http://localhost:5001
//! default_language: English
//! history_db: /var/lib/anasi/history.db
//! timeout_secs: 120
//! ```

use crate::history::HISTORY_KEY;
use crate::model::DEFAULT_LANGUAGE;
use crate::service::Endpoints;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service root; endpoint paths are resolved against it.
    pub base_url: String,
    /// Per-endpoint overrides (absolute URLs).
    pub analyze_url: Option<String>,
    pub morphology_url: Option<String>,
    pub parts_of_speech_url: Option<String>,
    pub default_language: String,
    pub history_db: Option<PathBuf>,
    pub history_key: String,
    /// Request timeout. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            analyze_url: None,
            morphology_url: None,
            parts_of_speech_url: None,
            default_language: DEFAULT_LANGUAGE.to_string(),
            history_db: None,
            history_key: HISTORY_KEY.to_string(),
            timeout_secs: None,
        }
    }
}

impl Config {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Load `explicit` if given (it must exist), else the default location
    /// if a file is there, else defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `~/.config/anasi/config.yaml` (platform equivalent).
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("anasi").join("config.yaml"))
    }

    /// Configured history database, or `~/.local/share/anasi/history.db`.
    pub fn history_db_path(&self) -> PathBuf {
        if let Some(path) = &self.history_db {
            return path.clone();
        }
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
        data_dir.join("anasi").join("history.db")
    }

    pub fn endpoints(&self) -> Endpoints {
        let mut endpoints = Endpoints::from_base(&self.base_url);
        if let Some(url) = &self.analyze_url {
            endpoints.analyze = url.clone();
        }
        if let Some(url) = &self.morphology_url {
            endpoints.morphology = url.clone();
        }
        if let Some(url) = &self.parts_of_speech_url {
            endpoints.parts_of_speech = url.clone();
        }
        endpoints
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
