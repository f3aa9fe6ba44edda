//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides. The
//! environment is read through [`EnvSource`] so tests never touch the
//! process environment.

use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Base URL override
pub const ENV_API_URL: &str = "CALENDAR_API_URL";
/// Request timeout override (seconds)
pub const ENV_REQUEST_TIMEOUT: &str = "CALENDAR_REQUEST_TIMEOUT_SECS";
/// Log level override
pub const ENV_LOG_LEVEL: &str = "CALENDAR_LOG_LEVEL";
/// Log format override
pub const ENV_LOG_FORMAT: &str = "CALENDAR_LOG_FORMAT";

/// Path of the live-update stream, relative to the API host
pub const ACTIVITY_STREAM_PATH: &str = "/ws/activities";

/// Read access to environment variables
pub trait EnvSource {
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Base URL without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Live-update URL: same host, `ws`/`wss` scheme, `/ws/activities`
    pub fn ws_url(&self) -> String {
        let base = self.base();
        let rest = base
            .strip_prefix("https")
            .map(|rest| format!("wss{}", rest))
            .or_else(|| base.strip_prefix("http").map(|rest| format!("ws{}", rest)))
            .unwrap_or_else(|| base.to_string());
        format!("{}{}", rest, ACTIVITY_STREAM_PATH)
    }

    /// Check the base URL is an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(self.base()).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            error: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ConfigError::InvalidUrl {
                url: self.base_url.clone(),
                error: format!("unsupported scheme '{}'", other),
            }),
        }
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

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(env: &dyn EnvSource) -> Self {
        let mut config = Config::default();
        config.apply_env_overrides(env);
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path, env: &dyn EnvSource) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides(env);
        Ok(config)
    }

    /// Candidate config file locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        [
            dirs::config_dir().map(|p| p.join("activity-calendar").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Load from default locations or environment
    pub fn load_default(env: &dyn EnvSource) -> Self {
        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_with_env(&path, env) {
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

        tracing::debug!("Using default config with environment overrides");
        Self::from_env(env)
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self, env: &dyn EnvSource) {
        if let Some(url) = env.var(ENV_API_URL) {
            self.api.base_url = url;
        }
        if let Some(timeout) = env.var(ENV_REQUEST_TIMEOUT) {
            match timeout.parse() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => tracing::warn!("Ignoring invalid {}: {}", ENV_REQUEST_TIMEOUT, timeout),
            }
        }
        if let Some(level) = env.var(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(format) = env.var(ENV_LOG_FORMAT) {
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

    #[error("Invalid API base URL '{url}': {error}")]
    InvalidUrl { url: String, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Activity Calendar Configuration
#
# Environment variables override these settings:
# - CALENDAR_API_URL
# - CALENDAR_REQUEST_TIMEOUT_SECS
# - CALENDAR_LOG_LEVEL
# - CALENDAR_LOG_FORMAT

[api]
# Base URL of the calendar service (REST and live updates)
base_url = "http://localhost:8000"

# Request timeout in seconds
request_timeout_secs = 30

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env(&env(&[]));
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_env(&env(&[
            (ENV_API_URL, "https://calendar.example.com"),
            (ENV_REQUEST_TIMEOUT, "5"),
            (ENV_LOG_FORMAT, "json"),
        ]));
        assert_eq!(config.api.base_url, "https://calendar.example.com");
        assert_eq!(config.api.request_timeout(), Duration::from_secs(5));
        assert!(config.logging.is_json());
    }

    #[test]
    fn test_invalid_timeout_is_ignored() {
        let config = Config::from_env(&env(&[(ENV_REQUEST_TIMEOUT, "soon")]));
        assert_eq!(config.api.request_timeout_secs, 30);
    }

    #[test]
    fn test_ws_url_derivation() {
        assert_eq!(
            ApiConfig::new("http://localhost:8000").ws_url(),
            "ws://localhost:8000/ws/activities"
        );
        assert_eq!(
            ApiConfig::new("https://calendar.example.com/").ws_url(),
            "wss://calendar.example.com/ws/activities"
        );
    }

    #[test]
    fn test_validate() {
        assert!(ApiConfig::new("http://localhost:8000").validate().is_ok());
        assert!(ApiConfig::new("localhost:8000/api").validate().is_err());
        assert!(ApiConfig::new("ftp://example.com").validate().is_err());
    }

    #[test]
    fn test_load_file_with_env_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"http://10.0.0.2:9000\"\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = Config::load_with_env(file.path(), &env(&[(ENV_LOG_LEVEL, "warn")])).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.2:9000");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api\nbase_url = ").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
