// src/report/engine.rs

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::try_join_all;

use crate::config::Config;
use crate::core::calendar::{CalendarBook, StoreCalendar};
use crate::core::observation::Observation;
use crate::core::report::{report_for_store, ReportRow};
use crate::core::EngineDefaults;
use crate::error::{Result, UptimeError};
use crate::storage::StorageBackend;
use crate::time::window::ReportWindow;
use crate::time::zone::TimezoneResolver;

/// Default number of stores per fetch.
pub const DEFAULT_BATCH_SIZE: usize = 500;
/// Default number of blocking worker tasks per chunk.
pub const DEFAULT_WORKERS: usize = 4;

/// One store's inputs, ready for the blocking computation.
type StoreJob = (String, Vec<Observation>, StoreCalendar);

/// Computes report rows for stores held in a [`StorageBackend`].
///
/// Stores are processed in chunks. Each chunk costs one query per record
/// stream; its stores are then computed on blocking worker tasks.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    storage: Arc<dyn StorageBackend>,
    defaults: EngineDefaults,
    batch_size: usize,
    workers: usize,
}

impl ReportEngine {
    /// Creates an engine with default batching.
    pub fn new(storage: Arc<dyn StorageBackend>, defaults: EngineDefaults) -> Self {
        Self {
            storage,
            defaults,
            batch_size: DEFAULT_BATCH_SIZE,
            workers: DEFAULT_WORKERS,
        }
    }

    /// Creates an engine from the `[engine]`, `[calendar]` and `[report]`
    /// sections of `config`.
    pub fn from_config(storage: Arc<dyn StorageBackend>, config: &Config) -> Result<Self> {
        let defaults = config.engine_defaults()?;
        Ok(Self::new(storage, defaults).with_batching(config.report.batch_size, config.report.workers))
    }

    /// Sets chunk size and worker count. Zero is raised to one.
    pub fn with_batching(mut self, batch_size: usize, workers: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self.workers = workers.max(1);
        self
    }

    /// The fallbacks in use.
    pub fn defaults(&self) -> &EngineDefaults {
        &self.defaults
    }

    /// The storage backend.
    pub fn storage(&self) -> &Arc<dyn StorageBackend> {
        &self.storage
    }

    /// Reference time of a run: the latest observation in the dataset, or the
    /// wall clock when there is none.
    pub async fn now_utc(&self) -> Result<DateTime<Utc>> {
        match self.storage.latest_observation_timestamp().await? {
            Some(ts) => Ok(ts),
            None => {
                let now = Utc::now();
                log::warn!("Dataset has no observations; using wall-clock time {} as now", now);
                Ok(now)
            }
        }
    }

    /// Rows for every observed store, sorted by store id.
    pub async fn generate_all(&self) -> Result<Vec<ReportRow>> {
        let now = self.now_utc().await?;
        let store_ids = self.storage.list_store_ids().await?;
        self.generate(&store_ids, now).await
    }

    /// Row of a single store.
    pub async fn report_for_store(&self, store_id: &str, now_utc: DateTime<Utc>) -> Result<ReportRow> {
        let mut rows = self.generate(&[store_id.to_string()], now_utc).await?;
        rows.pop()
            .ok_or_else(|| UptimeError::not_found(format!("report row for store {}", store_id)))
    }

    /// One row per entry of `store_ids`, in the same order.
    pub async fn generate(&self, store_ids: &[String], now_utc: DateTime<Utc>) -> Result<Vec<ReportRow>> {
        log::info!(
            "Generating report for {} stores at {} (batch_size={}, workers={})",
            store_ids.len(),
            now_utc,
            self.batch_size,
            self.workers
        );

        let resolver = Arc::new(TimezoneResolver::from_assignments(
            self.storage.load_timezones().await?,
            self.defaults.timezone,
        ));

        let mut rows = Vec::with_capacity(store_ids.len());
        for (index, chunk) in store_ids.chunks(self.batch_size).enumerate() {
            log::debug!("Processing chunk {} ({} stores)", index, chunk.len());
            let jobs = self.fetch_chunk(chunk, now_utc, &resolver).await?;
            rows.extend(self.compute_chunk(jobs, now_utc).await?);
        }

        log::info!("Report complete: {} rows", rows.len());
        Ok(rows)
    }

    async fn fetch_chunk(
        &self,
        chunk: &[String],
        now_utc: DateTime<Utc>,
        resolver: &Arc<TimezoneResolver>,
    ) -> Result<Vec<StoreJob>> {
        let (week_start, _) = ReportWindow::widest().bounds(now_utc);

        let carry_in = self.storage.load_latest_before(chunk, week_start).await?;
        let in_range = self.storage.load_observations(chunk, week_start, now_utc).await?;
        let hours = self.storage.load_business_hours(chunk).await?;

        let mut by_store: HashMap<String, Vec<Observation>> = HashMap::new();
        for obs in carry_in.into_iter().chain(in_range) {
            by_store.entry(obs.store_id.clone()).or_default().push(obs);
        }

        let book = CalendarBook::new(Arc::clone(resolver), self.defaults.week_start, hours);

        Ok(chunk
            .iter()
            .map(|store_id| {
                // A store may be requested more than once per chunk
                let observations = by_store.get(store_id).cloned().unwrap_or_default();
                if observations.is_empty() {
                    log::warn!(
                        "Store {} has no observations up to {}; assuming {}",
                        store_id,
                        now_utc,
                        self.defaults.status
                    );
                }
                (store_id.clone(), observations, book.calendar_for(store_id))
            })
            .collect())
    }

    async fn compute_chunk(&self, jobs: Vec<StoreJob>, now_utc: DateTime<Utc>) -> Result<Vec<ReportRow>> {
        if jobs.is_empty() {
            return Ok(Vec::new());
        }

        let default_status = self.defaults.status;
        let per_worker = jobs.len().div_ceil(self.workers);

        let mut handles = Vec::with_capacity(self.workers);
        let mut remaining = jobs.into_iter();
        loop {
            let slice: Vec<StoreJob> = remaining.by_ref().take(per_worker).collect();
            if slice.is_empty() {
                break;
            }
            handles.push(tokio::task::spawn_blocking(move || {
                slice
                    .into_iter()
                    .map(|(store_id, observations, calendar)| {
                        report_for_store(&store_id, &observations, &calendar, now_utc, default_status)
                    })
                    .collect::<Vec<_>>()
            }));
        }

        let results = try_join_all(handles).await?;
        Ok(results.into_iter().flatten().collect())
    }
}
