// src/lib.rs

//! Business-hours aware uptime and downtime reporting.
//!
//! Stores report `active`/`inactive` at irregular times. This crate turns
//! those samples into gap-free status timelines, intersects them with each
//! store's local business hours, and reports the open time spent up and down
//! over the last hour, day and week.
//!
//! The pure computation lives in [`core`]; [`storage`] supplies the records,
//! [`report`] runs it over many stores and [`api`] wraps runs as jobs.

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod report;
pub mod storage;
pub mod time;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use crate::api::{ReportService, ReportStatus, UptimeReporter};
pub use crate::config::Config;
pub use crate::core::{EngineDefaults, Observation, ReportRow};
pub use crate::error::{Result, UptimeError};
pub use crate::report::ReportEngine;
pub use crate::types::{LogLevel, StorageType, StoreStatus, WeekStart};

/// Loads configuration and initialises logging.
///
/// `config_path` defaults to `store-uptime.toml` in the working directory; a
/// missing file means built-in defaults. Logging honours `logging.level` and
/// is switched off entirely when `logging.console` is false.
///
/// # Errors
///
/// Returns `ConfigError` for an unreadable or invalid configuration, and
/// `InvalidInput` when a global logger is already installed.
pub fn init(config_path: Option<&str>) -> Result<Config> {
    let config = Config::load(config_path.unwrap_or("store-uptime.toml"))?;

    #[cfg(feature = "logging")]
    {
        let level = if config.logging.console {
            config.logging.level.to_level_filter()
        } else {
            log::LevelFilter::Off
        };
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .try_init()
            .map_err(|e| UptimeError::invalid_input(format!("Logger already initialised: {}", e)))?;
    }

    log::debug!("Configuration loaded: {:?}", config);
    Ok(config)
}
