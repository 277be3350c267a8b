//! Configuration management for Datachat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{DatachatError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Datachat
///
/// This structure holds all configuration needed for the client,
/// including backend connectivity and display behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Analysis backend connectivity
    #[serde(default)]
    pub backend: BackendConfig,

    /// Dataset and chart display behavior
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Analysis backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the analysis backend
    #[serde(default = "default_backend_url")]
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Path of the chat endpoint, relative to the base URL
    #[serde(default = "default_chat_path")]
    pub chat_path: String,

    /// Path of the SSE progress endpoint, relative to the base URL
    #[serde(default = "default_progress_path")]
    pub progress_path: String,
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

fn default_chat_path() -> String {
    "/chat".to_string()
}

fn default_progress_path() -> String {
    "/progress".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            timeout_seconds: default_timeout_seconds(),
            chat_path: default_chat_path(),
            progress_path: default_progress_path(),
        }
    }
}

/// Display configuration
///
/// Controls which columns are hidden from display/derivation paths and how
/// many charts are rendered at once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Column names excluded from every display and derivation path
    ///
    /// Typically long free-text columns that would swamp tabular output.
    #[serde(default = "default_excluded_columns")]
    pub excluded_columns: Vec<String>,

    /// Maximum number of charts rendered at once
    #[serde(default = "default_max_charts")]
    pub max_charts: usize,

    /// Bucket count used when a histogram descriptor omits `bins`
    #[serde(default = "default_histogram_bins")]
    pub histogram_bins: usize,
}

fn default_excluded_columns() -> Vec<String> {
    vec!["description".to_string(), "notes".to_string()]
}

fn default_max_charts() -> usize {
    4
}

fn default_histogram_bins() -> usize {
    10
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            excluded_columns: default_excluded_columns(),
            max_charts: default_max_charts(),
            histogram_bins: default_histogram_bins(),
        }
    }
}

impl Config {
    /// Load configuration from a file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed CLI arguments whose values override file settings
    ///
    /// # Returns
    ///
    /// The merged configuration. A missing file is not an error; defaults
    /// are used and a warning is logged.
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DatachatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| DatachatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(url) = std::env::var("DATACHAT_BACKEND_URL") {
            self.backend.url = url;
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(url) = &cli.backend_url {
            self.backend.url = url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Returns
    ///
    /// Returns an error describing the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        if self.backend.url.is_empty() {
            return Err(DatachatError::Config("backend.url cannot be empty".to_string()).into());
        }

        if !self.backend.url.starts_with("http://") && !self.backend.url.starts_with("https://") {
            return Err(DatachatError::Config(format!(
                "backend.url must be an http(s) URL, got: {}",
                self.backend.url
            ))
            .into());
        }

        if self.backend.timeout_seconds == 0 {
            return Err(DatachatError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.display.max_charts == 0 {
            return Err(DatachatError::Config(
                "display.max_charts must be greater than 0".to_string(),
            )
            .into());
        }

        if self.display.histogram_bins == 0 {
            return Err(DatachatError::Config(
                "display.histogram_bins must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}
