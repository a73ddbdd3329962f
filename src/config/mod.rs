//! Configuration management for store uptime reporting
//!
//! This module handles loading, validating, and providing access to the
//! application configuration. It supports loading configuration from files,
//! environment variables, and programmatic overrides.

#![deny(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod validation;

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod validation_tests;

#[cfg(test)]
#[path = "tests/config_mod_tests.rs"]
mod config_mod_tests;

use std::{
    env,
    fs,
    path::{Path, PathBuf},
};
use directories::ProjectDirs;

use serde::{Deserialize, Serialize};

use crate::core::EngineDefaults;
use crate::time::zone::parse_timezone;
use crate::types::{LogLevel, StorageType, StoreStatus, WeekStart};

/// Re-export the error type
pub use error::ConfigError;

/// The environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "SU_";

/// The application name used for finding config directories
const APP_NAME: &str = "store-uptime";

/// Main configuration structure.
///
/// Sections missing from a configuration file take their defaults, so a file
/// only needs to name what it changes.
///
/// # Example
///
/// ```no_run
/// use store_uptime::config::Config;
///
/// // A path that does not exist falls back to defaults.
/// let config = Config::load("path/that/hopefully/does/not/exist.toml").unwrap();
/// assert_eq!(config.engine.default_timezone, "America/Chicago");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Fallbacks applied by the computation engine
    pub engine: EngineConfig,

    /// Business-hours calendar interpretation
    pub calendar: CalendarConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// Report run configuration
    pub report: ReportConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Engine fallbacks for stores with missing data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// IANA timezone used for stores without a (valid) assignment
    pub default_timezone: String,
    /// Status assumed for a store that has never been observed
    pub default_status: StoreStatus,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timezone: "America/Chicago".to_string(),
            default_status: StoreStatus::Active,
        }
    }
}

/// Business-hours calendar configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    /// Weekday numbered `0` in the business-hours data
    pub week_start: WeekStart,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage type
    #[serde(rename = "type")]
    pub storage_type: StorageType,
    /// Directory holding the source CSV files (ignored for memory storage)
    pub base_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::Csv,
            base_path: "./data".to_string(),
        }
    }
}

/// Report run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory where finished report artifacts are written
    pub output_dir: String,
    /// Number of stores fetched and computed together
    pub batch_size: usize,
    /// Blocking worker tasks used per chunk
    pub workers: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: "./reports".to_string(),
            batch_size: 500,
            workers: 4,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level
    pub level: LogLevel,
    /// Whether to log to console
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            console: true,
        }
    }
}

impl Config {
    /// Loads the configuration from the specified path.
    ///
    /// The configuration is resolved in the following order:
    /// 1. From the specified file path, if it exists
    /// 2. From built-in defaults otherwise
    /// 3. Environment variables with the `SU_` prefix override either
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read or
    /// parsed, or if the resulting configuration does not validate.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(config_str) => {
                let mut config: Config = toml::from_str(&config_str)?;

                config.apply_env_vars()?;
                config.validate()?;

                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("Config file not found at {}, using defaults", path.display());
                let mut config = Self::default();
                config.apply_env_vars()?;
                config.validate()?;
                Ok(config)
            }
            Err(e) => {
                Err(ConfigError::file_not_found(
                    format!("Failed to read config file {}: {}", path.display(), e)
                ))
            }
        }
    }

    /// Applies environment variable overrides to the configuration.
    ///
    /// Environment variables are prefixed with `SU_` and use `_` as a separator,
    /// e.g. `SU_LOGGING_LEVEL=debug` or `SU_STORAGE_BASE_PATH=/srv/data`.
    ///
    /// # Errors
    ///
    /// Returns an error if any recognised environment variable cannot be parsed.
    pub fn apply_env_vars(&mut self) -> Result<(), ConfigError> {
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                if value.trim().is_empty() {
                    continue;
                }

                match stripped.to_lowercase().as_str() {
                    "logging_level" => {
                        self.logging.level = value.parse().map_err(|_| {
                            ConfigError::invalid_value("logging.level", &value, "Invalid log level")
                        })?;
                    }
                    "storage_type" => {
                        self.storage.storage_type = value.parse().map_err(|_| {
                            ConfigError::invalid_value("storage.type", &value, "Expected 'memory' or 'csv'")
                        })?;
                    }
                    "storage_base_path" => self.storage.base_path = value,
                    "report_output_dir" => self.report.output_dir = value,
                    "engine_default_timezone" => self.engine.default_timezone = value,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self)
    }

    /// Builds the engine fallbacks from the `[engine]` section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the default timezone is not a
    /// known IANA identifier.
    pub fn engine_defaults(&self) -> Result<EngineDefaults, ConfigError> {
        let timezone = parse_timezone(&self.engine.default_timezone).ok_or_else(|| {
            ConfigError::invalid_value(
                "engine.default_timezone",
                &self.engine.default_timezone,
                "Unknown IANA timezone",
            )
        })?;
        Ok(EngineDefaults {
            timezone,
            status: self.engine.default_status,
            week_start: self.calendar.week_start,
        })
    }

    /// Returns the path to the directory where configuration files should be stored.
    ///
    /// This is OS-specific:
    /// - Linux: `$HOME/.config/store-uptime`
    /// - macOS: `$HOME/Library/Application Support/com.storeuptime.store-uptime`
    /// - Windows: `%APPDATA%\\storeuptime\\store-uptime`
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "storeuptime", APP_NAME)
            .map(|proj_dirs| proj_dirs.config_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.default_timezone, "America/Chicago");
        assert_eq!(config.engine.default_status, StoreStatus::Active);
        assert_eq!(config.calendar.week_start, WeekStart::Sunday);
        assert!(config.report.batch_size > 0);
    }
}
