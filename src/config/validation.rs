//! Configuration validation
//!
//! This module contains functions for validating the application configuration
//! to ensure all values are within acceptable ranges and consistent with each other.

use super::error::ConfigError;
use super::{
    Config, EngineConfig, LoggingConfig, ReportConfig, StorageConfig,
};
use crate::time::zone::parse_timezone;
use crate::types::StorageType;

/// Upper bound on worker tasks per chunk.
const MAX_WORKERS: usize = 256;

/// Validates the application configuration.
///
/// # Errors
///
/// Returns a `ConfigError` if any validation check fails.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    validate_engine_config(&config.engine)?;
    validate_storage_config(&config.storage)?;
    validate_report_config(&config.report)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

/// Validates the engine fallbacks.
fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if parse_timezone(&config.default_timezone).is_none() {
        return Err(ConfigError::invalid_value(
            "engine.default_timezone",
            &config.default_timezone,
            "Unknown IANA timezone",
        ));
    }
    Ok(())
}

/// Validates the storage configuration.
///
/// The CSV directory itself is checked when the backend is opened, so a
/// missing directory surfaces as a storage failure of the run rather than a
/// configuration error.
fn validate_storage_config(config: &StorageConfig) -> Result<(), ConfigError> {
    if let StorageType::Csv = config.storage_type {
        if config.base_path.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "storage.base_path",
                "",
                "Base path cannot be empty for csv storage",
            ));
        }
    }
    Ok(())
}

/// Validates the report run configuration.
fn validate_report_config(config: &ReportConfig) -> Result<(), ConfigError> {
    if config.output_dir.trim().is_empty() {
        return Err(ConfigError::missing_value("report.output_dir"));
    }

    if config.batch_size == 0 {
        return Err(ConfigError::invalid_value(
            "report.batch_size",
            config.batch_size,
            "batch_size must be greater than 0",
        ));
    }

    if config.workers == 0 || config.workers > MAX_WORKERS {
        return Err(ConfigError::invalid_value(
            "report.workers",
            config.workers,
            format!("workers must be between 1 and {}", MAX_WORKERS),
        ));
    }

    if config.workers > config.batch_size {
        log::warn!(
            "report.workers ({}) exceeds report.batch_size ({}); extra workers will idle",
            config.workers,
            config.batch_size
        );
    }

    Ok(())
}

/// Validates the logging configuration.
fn validate_logging_config(config: &LoggingConfig) -> Result<(), ConfigError> {
    if !config.console {
        log::warn!("Console logging is disabled. No logs will be captured.");
    }
    Ok(())
}
