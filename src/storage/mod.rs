// src/storage/mod.rs

//! Read access to the three source record streams.

pub mod file;
pub mod memory;

use std::collections::HashSet;
use std::fmt::Debug;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::core::observation::{BusinessHoursEntry, Observation, TimezoneAssignment};
use crate::error::Result;
use crate::types::StorageType;

pub use file::CsvStorage;
pub use memory::MemoryStorage;

/// Source of observations, business hours and timezone assignments.
///
/// Every query is scoped to a set of store ids so a report run can fetch one
/// chunk of stores at a time. Implementations return
/// [`UptimeError::StorageUnavailable`](crate::error::UptimeError::StorageUnavailable)
/// when the underlying store cannot be reached.
#[async_trait]
pub trait StorageBackend: Send + Sync + Debug {
    /// Timestamp of the latest observation of any store, `None` when empty.
    async fn latest_observation_timestamp(&self) -> Result<Option<DateTime<Utc>>>;

    /// Ids of every store with at least one observation, sorted.
    async fn list_store_ids(&self) -> Result<Vec<String>>;

    /// Observations of `store_ids` with `start <= timestamp <= end`, ordered
    /// by store then timestamp. Equal timestamps keep their ingest order.
    async fn load_observations(
        &self,
        store_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Observation>>;

    /// For each of `store_ids`, its latest observation strictly before
    /// `before`. Stores without one are absent from the result.
    async fn load_latest_before(
        &self,
        store_ids: &[String],
        before: DateTime<Utc>,
    ) -> Result<Vec<Observation>>;

    /// Business-hours rows of `store_ids`.
    async fn load_business_hours(&self, store_ids: &[String]) -> Result<Vec<BusinessHoursEntry>>;

    /// Every timezone assignment.
    async fn load_timezones(&self) -> Result<Vec<TimezoneAssignment>>;
}

/// Opens the backend selected by `config.storage`.
///
/// # Errors
///
/// For csv storage, returns `StorageUnavailable` when the data directory or
/// its status file cannot be read.
pub async fn create_storage_backend(config: &Config) -> Result<Box<dyn StorageBackend>> {
    match config.storage.storage_type {
        StorageType::Memory => {
            log::debug!("Using in-memory storage");
            Ok(MemoryStorage::new().boxed())
        }
        StorageType::Csv => {
            log::debug!("Loading csv storage from {}", config.storage.base_path);
            Ok(CsvStorage::open(&config.storage.base_path).await?.boxed())
        }
    }
}

/// Lookup set over a slice of store ids.
pub(crate) fn id_set(store_ids: &[String]) -> HashSet<&str> {
    store_ids.iter().map(String::as_str).collect()
}
