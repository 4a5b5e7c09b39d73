//! Configuration management for esdump
//!
//! This module handles loading, parsing, and managing configuration from
//! various sources:
//! - Configuration files (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Dump pipeline configuration
    #[serde(default)]
    pub dump: DumpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote-store-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store endpoints as `host:port`
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Dump pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Number of hits requested per scroll page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Number of documents stored in each chunk archive
    #[serde(default = "default_docs_per_chunk")]
    pub docs_per_chunk: usize,

    /// Keep store-assigned metadata with every document
    #[serde(default)]
    pub raw: bool,

    /// How long the store should keep the scroll cursor alive between
    /// page fetches
    #[serde(default = "default_scroll_ttl")]
    pub scroll_ttl: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_hosts() -> Vec<String> {
    vec!["localhost:9200".to_string()]
}

fn default_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    100
}

fn default_docs_per_chunk() -> usize {
    10_000
}

fn default_scroll_ttl() -> String {
    "5m".to_string()
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            dump: DumpConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            timeout: default_timeout(),
        }
    }
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            docs_per_chunk: default_docs_per_chunk(),
            raw: false,
            scroll_ttl: default_scroll_ttl(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with proper precedence: an explicit file when
    /// given, otherwise the default path when present, otherwise defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Self::default_path();
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".esdump")
            .join("config.toml")
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.store.hosts.is_empty() {
            return Err(ConfigError::MissingField("store.hosts".to_string()).into());
        }
        if self.dump.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dump.page_size".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        if self.dump.docs_per_chunk == 0 {
            return Err(ConfigError::InvalidValue {
                field: "dump.docs_per_chunk".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Get request timeout as Duration
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store.timeout)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
