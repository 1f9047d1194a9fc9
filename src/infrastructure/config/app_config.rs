//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

const APP_NAME: &str = "cinema";
const APP_QUALIFIER: &str = "com";
const APP_ORGANIZATION: &str = "tecknian";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Configuration load failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The config file could not be parsed.
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

/// Application configuration.
#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Catalog API key. Usually supplied via `TMDB_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Catalog API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Cache tuning.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Response cache TTL in hours.
    #[serde(default = "default_response_ttl_hours")]
    pub response_ttl_hours: u64,

    /// Maximum decoded images held in memory.
    #[serde(default = "default_image_memory_count")]
    pub image_memory_count: usize,

    /// Maximum total byte cost of decoded images held in memory.
    #[serde(default = "default_image_memory_bytes")]
    pub image_memory_bytes: u64,

    /// Age in days after which cached image files are swept.
    #[serde(default = "default_image_max_age_days")]
    pub image_max_age_days: u64,
}

impl CacheConfig {
    /// Response cache TTL as a duration.
    #[must_use]
    pub const fn response_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.response_ttl_hours * 60 * 60)
    }

    /// Image file age limit as a duration.
    #[must_use]
    pub const fn image_max_age(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.image_max_age_days * 24 * 60 * 60)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            response_ttl_hours: default_response_ttl_hours(),
            image_memory_count: default_image_memory_count(),
            image_memory_bytes: default_image_memory_bytes(),
            image_max_age_days: default_image_max_age_days(),
        }
    }
}

fn default_base_url() -> String {
    crate::infrastructure::tmdb::endpoints::DEFAULT_BASE_URL.to_string()
}

fn default_response_ttl_hours() -> u64 {
    24
}

fn default_image_memory_count() -> usize {
    100
}

fn default_image_memory_bytes() -> u64 {
    50 * 1024 * 1024
}

fn default_image_max_age_days() -> u64 {
    7
}

use super::args::CliArgs;

impl AppConfig {
    /// Loads the configuration file, or defaults when it is missing or
    /// unreadable.
    #[must_use]
    pub fn load(path_override: Option<&Path>) -> Self {
        let path = path_override
            .map(Path::to_path_buf)
            .or_else(Self::default_config_path);

        let Some(path) = path else {
            return Self::default();
        };

        match Self::read_from(&path) {
            Ok(config) => config,
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to load config, using defaults");
                Self::default()
            }
        }
    }

    fn read_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(config_path) = &args.config {
            self.config = Some(config_path.clone());
        }
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(api_key) = &args.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &args.base_url {
            self.base_url = base_url.clone();
        }
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default config file path.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        Self::default_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("cinema.log"))
    }

    /// Returns the database file path.
    #[must_use]
    pub fn database_path() -> PathBuf {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
            || std::env::temp_dir().join("cinema").join("cinema.db"),
            |dirs| dirs.data_dir().join("cinema.db"),
        )
    }

    /// Returns the image cache directory.
    #[must_use]
    pub fn image_cache_dir() -> PathBuf {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME).map_or_else(
            || {
                std::env::temp_dir()
                    .join("cinema")
                    .join("cache")
                    .join("images")
            },
            |dirs| dirs.cache_dir().join("images"),
        )
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            api_key: None,
            base_url: default_base_url(),
            cache: CacheConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_with_cache_section() {
        let toml_content = r#"
            api_key = "abc123"
            log_level = "debug"

            [cache]
            response_ttl_hours = 12
            image_memory_count = 25
        "#;

        let config: AppConfig = toml::from_str(toml_content).expect("Failed to parse config");

        assert_eq!(config.api_key.as_deref(), Some("abc123"));
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.cache.response_ttl_hours, 12);
        assert_eq!(config.cache.image_memory_count, 25);
        // Untouched fields keep their defaults.
        assert_eq!(config.cache.image_max_age_days, 7);
        assert_eq!(config.base_url, "https://api.themoviedb.org/3");
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert!(config.api_key.is_none());
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.cache.response_ttl_hours, 24);
        assert_eq!(
            config.cache.image_memory_bytes,
            50 * 1024 * 1024
        );
    }

    #[test]
    fn test_ttl_conversion() {
        let cache = CacheConfig::default();

        assert_eq!(cache.response_ttl().as_secs(), 24 * 60 * 60);
        assert_eq!(cache.image_max_age().as_secs(), 7 * 24 * 60 * 60);
    }
}
