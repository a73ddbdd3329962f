// src/storage/memory.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::core::observation::{BusinessHoursEntry, Observation, TimezoneAssignment};
use crate::error::{Result, UptimeError};
use crate::storage::{id_set, StorageBackend};

/// An in-memory storage backend for the three record streams.
///
/// Used directly by tests and as the index behind [`CsvStorage`](super::CsvStorage).
/// Records are kept in `DashMap`s keyed by store id for thread-safe
/// concurrent access; each store's observations stay sorted by timestamp.
///
/// It also includes a switch to simulate an unreachable store for testing
/// the failure path of report runs, see `set_unavailable`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    observations: Arc<DashMap<String, Vec<Observation>>>,
    business_hours: Arc<DashMap<String, Vec<BusinessHoursEntry>>>,
    timezones: Arc<DashMap<String, TimezoneAssignment>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStorage {
    /// Creates a new, empty `MemoryStorage` instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every query fail with `StorageUnavailable` until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Adds one observation. Later inserts with an equal timestamp sort after
    /// earlier ones.
    pub fn insert_observation(&self, observation: Observation) {
        let mut rows = self.observations.entry(observation.store_id.clone()).or_default();
        let pos = rows.partition_point(|o| o.timestamp_utc <= observation.timestamp_utc);
        rows.insert(pos, observation);
    }

    /// Adds many observations, in order.
    pub fn extend_observations<I: IntoIterator<Item = Observation>>(&self, observations: I) {
        for observation in observations {
            self.insert_observation(observation);
        }
    }

    /// Adds one business-hours row.
    pub fn insert_business_hours(&self, entry: BusinessHoursEntry) {
        self.business_hours.entry(entry.store_id.clone()).or_default().push(entry);
    }

    /// Sets a store's timezone, replacing any earlier assignment.
    pub fn insert_timezone(&self, assignment: TimezoneAssignment) {
        self.timezones.insert(assignment.store_id.clone(), assignment);
    }

    /// Total number of observations held.
    pub fn observation_count(&self) -> usize {
        self.observations.iter().map(|e| e.value().len()).sum()
    }

    /// Checks if the storage holds no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Removes all records.
    pub fn clear(&self) {
        self.observations.clear();
        self.business_hours.clear();
        self.timezones.clear();
    }

    /// Helper to create a boxed version of `MemoryStorage`.
    /// This is useful when a `Box<dyn StorageBackend>` is needed.
    pub fn boxed(self) -> Box<dyn StorageBackend> {
        Box::new(self)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(UptimeError::storage_unavailable("Simulated MemoryStorage outage"));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for MemoryStorage {
    async fn latest_observation_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        self.check_available()?;
        Ok(self
            .observations
            .iter()
            .filter_map(|e| e.value().last().map(|o| o.timestamp_utc))
            .max())
    }

    async fn list_store_ids(&self) -> Result<Vec<String>> {
        self.check_available()?;
        let mut ids: Vec<String> = self
            .observations
            .iter()
            .filter(|e| !e.value().is_empty())
            .map(|e| e.key().clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn load_observations(
        &self,
        store_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Observation>> {
        self.check_available()?;
        let mut out = Vec::new();
        for id in id_set(store_ids) {
            if let Some(rows) = self.observations.get(id) {
                let lo = rows.partition_point(|o| o.timestamp_utc < start);
                let hi = rows.partition_point(|o| o.timestamp_utc <= end);
                if lo < hi {
                    out.extend_from_slice(&rows[lo..hi]);
                }
            }
        }
        // Stable sort keeps each store's rows in stored order
        out.sort_by(|a, b| a.store_id.cmp(&b.store_id));
        Ok(out)
    }

    async fn load_latest_before(
        &self,
        store_ids: &[String],
        before: DateTime<Utc>,
    ) -> Result<Vec<Observation>> {
        self.check_available()?;
        let mut out: Vec<Observation> = id_set(store_ids)
            .into_iter()
            .filter_map(|id| {
                let rows = self.observations.get(id)?;
                let pos = rows.partition_point(|o| o.timestamp_utc < before);
                let latest = pos.checked_sub(1).map(|i| rows[i].clone());
                latest
            })
            .collect();
        out.sort_by(|a, b| a.store_id.cmp(&b.store_id));
        Ok(out)
    }

    async fn load_business_hours(&self, store_ids: &[String]) -> Result<Vec<BusinessHoursEntry>> {
        self.check_available()?;
        let mut out = Vec::new();
        for id in id_set(store_ids) {
            if let Some(rows) = self.business_hours.get(id) {
                out.extend_from_slice(rows.value());
            }
        }
        Ok(out)
    }

    async fn load_timezones(&self) -> Result<Vec<TimezoneAssignment>> {
        self.check_available()?;
        Ok(self.timezones.iter().map(|e| e.value().clone()).collect())
    }
}
