//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::narrative::{NarrativeAdapter, NarrativeConfig, NarrativeError, OpenAiClient};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub narrative: NarrativeSettings,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Default page size for observation listing
    #[serde(default = "default_page_limit")]
    pub default_limit: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_page_limit() -> usize {
    100
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_limit: default_page_limit(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Observation store configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// JSON snapshot file; observations live only in memory when unset
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,
}

/// Narrative provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeSettings {
    #[serde(default = "default_narrative_enabled")]
    pub enabled: bool,

    #[serde(default = "default_narrative_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_narrative_model")]
    pub model: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_narrative_timeout")]
    pub timeout_ms: u64,
}

fn default_narrative_enabled() -> bool {
    true
}

fn default_narrative_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_narrative_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tokens() -> u32 {
    150
}

fn default_narrative_timeout() -> u64 {
    10_000
}

impl Default for NarrativeSettings {
    fn default() -> Self {
        Self {
            enabled: default_narrative_enabled(),
            base_url: default_narrative_url(),
            api_key: None,
            model: default_narrative_model(),
            max_tokens: default_max_tokens(),
            timeout_ms: default_narrative_timeout(),
        }
    }
}

impl NarrativeSettings {
    /// Augmentation runs only when enabled and a non-empty key is present
    pub fn is_active(&self) -> bool {
        self.enabled && self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// Client configuration, or `None` when augmentation is inactive
    pub fn client_config(&self) -> Option<NarrativeConfig> {
        if !self.is_active() {
            return None;
        }

        Some(NarrativeConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            request_timeout_ms: self.timeout_ms,
        })
    }

    /// Narrative adapter over the OpenAI-compatible client, when active
    pub fn adapter(&self) -> Result<Option<NarrativeAdapter>, NarrativeError> {
        let Some(client_config) = self.client_config() else {
            return Ok(None);
        };

        let client = OpenAiClient::new(client_config)?;
        Ok(Some(NarrativeAdapter::new(
            Arc::new(client),
            Duration::from_millis(self.timeout_ms),
        )))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("nimbus").join("config.toml")),
            Some(PathBuf::from("/etc/nimbus/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = var("NIMBUS_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("NIMBUS_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        if let Some(path) = var("NIMBUS_SNAPSHOT_PATH") {
            self.storage.snapshot_path = Some(PathBuf::from(path));
        }

        // Narrative overrides
        if let Some(url) = var("NIMBUS_NARRATIVE_URL") {
            self.narrative.base_url = url;
        }
        if let Some(model) = var("NIMBUS_NARRATIVE_MODEL") {
            self.narrative.model = model;
        }
        if let Some(timeout) = var("NIMBUS_NARRATIVE_TIMEOUT_MS").and_then(|t| t.parse().ok()) {
            self.narrative.timeout_ms = timeout;
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.narrative.api_key = Some(key);
        }

        // Logging overrides
        if let Some(level) = var("NIMBUS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("NIMBUS_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Nimbus Configuration
#
# Environment variables override these settings:
# - NIMBUS_API_HOST
# - NIMBUS_API_PORT
# - NIMBUS_SNAPSHOT_PATH
# - NIMBUS_NARRATIVE_URL
# - NIMBUS_NARRATIVE_MODEL
# - NIMBUS_NARRATIVE_TIMEOUT_MS
# - OPENAI_API_KEY
# - NIMBUS_LOG_LEVEL
# - NIMBUS_LOG_FORMAT

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 4000

# Default page size for GET /api/v1/weather/logs
default_limit = 100

[storage]
# JSON snapshot of stored observations (omit to keep data in memory only)
# snapshot_path = "~/.local/share/nimbus/observations.json"

[narrative]
# Attach an AI-written summary to insights reports when an API key is set
enabled = true

# OpenAI-compatible provider URL
base_url = "https://api.openai.com"

# Prefer the OPENAI_API_KEY environment variable
# api_key = ""

# Chat model
model = "gpt-3.5-turbo"

# Upper bound on generated tokens
max_tokens = 150

# Timeout for the provider call (ms)
timeout_ms = 10000

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
