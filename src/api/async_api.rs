// src/api/async_api.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Result, UptimeError};
use crate::report::{write_report_file, ReportEngine};
use crate::storage::create_storage_backend;

/// State of a report job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ReportStatus {
    /// The run has not finished yet.
    Running,
    /// The run finished; the artifact is at this path.
    Complete(PathBuf),
    /// The run aborted with this message.
    Failed(String),
}

impl ReportStatus {
    /// `true` once the run is complete or failed.
    pub fn is_finished(&self) -> bool {
        !matches!(self, ReportStatus::Running)
    }

    /// Short lowercase name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Running => "running",
            ReportStatus::Complete(_) => "complete",
            ReportStatus::Failed(_) => "failed",
        }
    }
}

/// Trigger/poll interface for report runs.
///
/// Each trigger spawns one run on the current Tokio runtime, writes
/// `<output_dir>/<id>.csv` and records the outcome under the returned id.
#[derive(Debug, Clone)]
pub struct ReportService {
    engine: ReportEngine,
    output_dir: PathBuf,
    jobs: Arc<DashMap<Uuid, ReportStatus>>,
}

impl ReportService {
    /// Creates a service over `engine`, writing artifacts to `output_dir`.
    pub fn new(engine: ReportEngine, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            output_dir: output_dir.into(),
            jobs: Arc::new(DashMap::new()),
        }
    }

    /// Opens the configured storage backend and builds a service over it.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let storage = create_storage_backend(config).await?;
        let engine = ReportEngine::from_config(Arc::from(storage), config)?;
        Ok(Self::new(engine, &config.report.output_dir))
    }

    /// The engine runs are computed with.
    pub fn engine(&self) -> &ReportEngine {
        &self.engine
    }

    /// Directory artifacts are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Artifact path of run `report_id`.
    pub fn report_path(&self, report_id: Uuid) -> PathBuf {
        self.output_dir.join(format!("{}.csv", report_id))
    }

    /// Starts a report run in the background and returns its id.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn trigger_report(&self) -> Uuid {
        let report_id = Uuid::new_v4();
        self.jobs.insert(report_id, ReportStatus::Running);
        log::info!("Report {} started", report_id);

        let service = self.clone();
        tokio::spawn(async move {
            let status = match service.run_report(report_id).await {
                Ok(path) => {
                    log::info!("Report {} complete: {}", report_id, path.display());
                    ReportStatus::Complete(path)
                }
                Err(e) => {
                    log::error!("Report {} failed: {}", report_id, e);
                    ReportStatus::Failed(e.to_string())
                }
            };
            service.jobs.insert(report_id, status);
        });

        report_id
    }

    /// Current state of run `report_id`.
    ///
    /// # Errors
    ///
    /// `NotFound` for an id this service never issued.
    pub fn get_report(&self, report_id: Uuid) -> Result<ReportStatus> {
        self.jobs
            .get(&report_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| UptimeError::not_found(format!("report {}", report_id)))
    }

    /// Polls run `report_id` every `poll` until it finishes.
    pub async fn wait_for(&self, report_id: Uuid, poll: Duration) -> Result<ReportStatus> {
        loop {
            let status = self.get_report(report_id)?;
            if status.is_finished() {
                return Ok(status);
            }
            tokio::time::sleep(poll).await;
        }
    }

    /// Runs report `report_id` to completion in the calling task and returns
    /// the artifact path.
    pub async fn run_report(&self, report_id: Uuid) -> Result<PathBuf> {
        let rows = self.engine.generate_all().await?;
        let path = self.report_path(report_id);
        write_report_file(&path, &rows).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EngineDefaults, Observation};
    use crate::storage::MemoryStorage;
    use crate::types::StoreStatus;
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    fn service_over(storage: MemoryStorage, dir: &Path) -> ReportService {
        let engine = ReportEngine::new(Arc::new(storage), EngineDefaults::default());
        ReportService::new(engine, dir)
    }

    #[tokio::test]
    async fn test_trigger_then_complete() {
        let dir = tempdir().unwrap();
        let storage = MemoryStorage::new();
        storage.insert_observation(Observation::new(
            "s1",
            Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            StoreStatus::Active,
        ));
        let service = service_over(storage, dir.path());

        let id = service.trigger_report();
        let status = service.wait_for(id, Duration::from_millis(10)).await.unwrap();
        let expected = service.report_path(id);
        assert_eq!(status, ReportStatus::Complete(expected.clone()));
        assert!(expected.exists());
        assert_eq!(status.as_str(), "complete");
    }

    #[tokio::test]
    async fn test_unknown_id() {
        let dir = tempdir().unwrap();
        let service = service_over(MemoryStorage::new(), dir.path());
        assert_matches!(service.get_report(Uuid::new_v4()), Err(UptimeError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_outage_marks_failed() {
        let dir = tempdir().unwrap();
        let storage = MemoryStorage::new();
        storage.set_unavailable(true);
        let service = service_over(storage, dir.path());

        let id = service.trigger_report();
        let status = service.wait_for(id, Duration::from_millis(10)).await.unwrap();
        assert_matches!(status, ReportStatus::Failed(ref msg) if msg.contains("unavailable"));
        assert!(!service.report_path(id).exists());
    }
}
