// src/api/sync_api.rs

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::runtime::Runtime;
use uuid::Uuid;

use crate::config::Config;
use crate::core::report::ReportRow;
use crate::error::{Result, UptimeError};
use crate::report::ReportEngine;
use crate::storage::{create_storage_backend, StorageBackend};

/// Provides a blocking API over a [`ReportEngine`].
#[derive(Debug)]
pub struct UptimeReporter {
    engine: ReportEngine,
    output_dir: PathBuf,
    rt: Runtime, // Tokio runtime for executing async operations
}

impl UptimeReporter {
    /// Creates a reporter over the storage backend named in `config`.
    ///
    /// This blocks while the backend loads its data.
    pub fn new(config: &Config) -> Result<Self> {
        let rt = Runtime::new()
            .map_err(|e| UptimeError::Unknown(format!("Failed to create Tokio runtime: {}", e)))?;
        let storage = rt.block_on(create_storage_backend(config))?;
        let engine = ReportEngine::from_config(Arc::from(storage), config)?;
        Ok(Self {
            engine,
            output_dir: PathBuf::from(&config.report.output_dir),
            rt,
        })
    }

    /// Creates a reporter over an existing backend.
    pub fn with_storage(storage: Arc<dyn StorageBackend>, config: &Config) -> Result<Self> {
        let rt = Runtime::new()
            .map_err(|e| UptimeError::Unknown(format!("Failed to create Tokio runtime: {}", e)))?;
        let engine = ReportEngine::from_config(storage, config)?;
        Ok(Self {
            engine,
            output_dir: PathBuf::from(&config.report.output_dir),
            rt,
        })
    }

    /// Reference time of the current dataset.
    pub fn now_utc(&self) -> Result<DateTime<Utc>> {
        self.rt.block_on(self.engine.now_utc())
    }

    /// Rows for every observed store.
    pub fn generate_all(&self) -> Result<Vec<ReportRow>> {
        self.rt.block_on(self.engine.generate_all())
    }

    /// Row of one store at the dataset's reference time.
    pub fn report_for_store(&self, store_id: &str) -> Result<ReportRow> {
        self.rt.block_on(async {
            let now = self.engine.now_utc().await?;
            self.engine.report_for_store(store_id, now).await
        })
    }

    /// Runs a full report and writes it to `<output_dir>/<id>.csv`.
    ///
    /// Returns the run id and the artifact path.
    pub fn write_report(&self) -> Result<(Uuid, PathBuf)> {
        let report_id = Uuid::new_v4();
        let path = self.output_dir.join(format!("{}.csv", report_id));
        self.rt.block_on(async {
            let rows = self.engine.generate_all().await?;
            crate::report::write_report_file(&path, &rows).await
        })?;
        Ok((report_id, path))
    }
}
