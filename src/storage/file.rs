// src/storage/file.rs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{de::DeserializeOwned, Deserialize};
use tokio::fs;

use crate::core::observation::{parse_local_time, BusinessHoursEntry, Observation, TimezoneAssignment};
use crate::error::{Result, UptimeError};
use crate::storage::{MemoryStorage, StorageBackend};
use crate::types::StoreStatus;

/// Observation stream, required.
pub const STATUS_FILE_NAME: &str = "store_status.csv";
/// Business hours, optional.
pub const HOURS_FILE_NAME: &str = "menu_hours.csv";
/// Timezone assignments, optional.
pub const TIMEZONES_FILE_NAME: &str = "timezones.csv";

#[derive(Debug, Deserialize)]
struct RawStatusRow {
    store_id: String,
    status: String,
    timestamp_utc: String,
}

#[derive(Debug, Deserialize)]
struct RawHoursRow {
    store_id: String,
    #[serde(alias = "dayOfWeek", alias = "day")]
    day_of_week: String,
    start_time_local: String,
    end_time_local: String,
}

#[derive(Debug, Deserialize)]
struct RawTimezoneRow {
    store_id: String,
    timezone_str: String,
}

/// Row counts of one ingested file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Data rows read
    pub rows_read: usize,
    /// Rows kept
    pub rows_ok: usize,
    /// Malformed rows skipped
    pub rows_rejected: usize,
}

impl FileStats {
    fn accept(&mut self) {
        self.rows_read += 1;
        self.rows_ok += 1;
    }

    fn reject(&mut self) {
        self.rows_read += 1;
        self.rows_rejected += 1;
    }
}

/// Row counts of a whole directory load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// `store_status.csv`
    pub status: FileStats,
    /// `menu_hours.csv`
    pub hours: FileStats,
    /// `timezones.csv`
    pub timezones: FileStats,
}

/// A storage backend reading the source CSV exports from a directory.
///
/// Files are loaded once, when the backend is opened, into a [`MemoryStorage`]
/// that serves every query afterwards:
/// `base_path/store_status.csv`, `base_path/menu_hours.csv` and
/// `base_path/timezones.csv`.
#[derive(Debug)]
pub struct CsvStorage {
    base_path: PathBuf,
    index: MemoryStorage,
    stats: IngestStats,
}

impl CsvStorage {
    /// Loads the CSV files under `base_path`.
    ///
    /// Malformed rows are skipped with a warning. A missing hours or timezone
    /// file leaves every store open 24/7 or on the default timezone.
    ///
    /// # Errors
    ///
    /// `StorageUnavailable` when the directory or the status file cannot be read.
    pub async fn open<P: AsRef<Path>>(base_path: P) -> Result<Self> {
        let path = base_path.as_ref().to_path_buf();

        let is_dir = fs::metadata(&path).await.map(|m| m.is_dir()).unwrap_or(false);
        if !is_dir {
            return Err(UptimeError::storage_unavailable(format!(
                "Data directory '{}' does not exist",
                path.display()
            )));
        }

        let index = MemoryStorage::new();
        let mut stats = IngestStats::default();

        let status_path = path.join(STATUS_FILE_NAME);
        let status_csv = fs::read_to_string(&status_path).await.map_err(|e| {
            UptimeError::storage_unavailable(format!("Failed to read '{}': {}", status_path.display(), e))
        })?;
        for row in read_rows::<RawStatusRow>(&status_csv, STATUS_FILE_NAME, &mut stats.status) {
            match parse_status_row(&row) {
                Some(observation) => {
                    stats.status.accept();
                    index.insert_observation(observation);
                }
                None => {
                    log::warn!("{}: skipping row for store {} ({}, {})", STATUS_FILE_NAME, row.store_id, row.status, row.timestamp_utc);
                    stats.status.reject();
                }
            }
        }

        if let Some(hours_csv) = read_optional(&path.join(HOURS_FILE_NAME)).await? {
            for row in read_rows::<RawHoursRow>(&hours_csv, HOURS_FILE_NAME, &mut stats.hours) {
                match parse_hours_row(&row) {
                    Some(entry) => {
                        stats.hours.accept();
                        index.insert_business_hours(entry);
                    }
                    None => {
                        log::warn!(
                            "{}: skipping row for store {} (day {}, {} - {})",
                            HOURS_FILE_NAME,
                            row.store_id,
                            row.day_of_week,
                            row.start_time_local,
                            row.end_time_local
                        );
                        stats.hours.reject();
                    }
                }
            }
        } else {
            log::info!("No {} in {}; every store is open 24/7", HOURS_FILE_NAME, path.display());
        }

        if let Some(tz_csv) = read_optional(&path.join(TIMEZONES_FILE_NAME)).await? {
            for row in read_rows::<RawTimezoneRow>(&tz_csv, TIMEZONES_FILE_NAME, &mut stats.timezones) {
                if row.store_id.trim().is_empty() || row.timezone_str.trim().is_empty() {
                    log::warn!("{}: skipping row with empty fields", TIMEZONES_FILE_NAME);
                    stats.timezones.reject();
                    continue;
                }
                stats.timezones.accept();
                index.insert_timezone(TimezoneAssignment::new(row.store_id.trim(), row.timezone_str.trim()));
            }
        }

        log::info!(
            "Loaded {} observations, {} business-hours rows, {} timezones from {} ({} rows rejected)",
            stats.status.rows_ok,
            stats.hours.rows_ok,
            stats.timezones.rows_ok,
            path.display(),
            stats.status.rows_rejected + stats.hours.rows_rejected + stats.timezones.rows_rejected
        );

        Ok(Self {
            base_path: path,
            index,
            stats,
        })
    }

    /// Directory the data was loaded from.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Row counts of the load.
    pub fn stats(&self) -> IngestStats {
        self.stats
    }

    /// Helper to create a boxed version of `CsvStorage`.
    /// This is useful when a `Box<dyn StorageBackend>` is needed.
    pub fn boxed(self) -> Box<dyn StorageBackend> {
        Box::new(self)
    }
}

async fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(UptimeError::storage_unavailable(format!(
            "Failed to read '{}': {}",
            path.display(),
            e
        ))),
    }
}

/// Deserializes every well-formed record, counting the rest as rejected.
fn read_rows<T: DeserializeOwned>(data: &str, file: &str, stats: &mut FileStats) -> Vec<T> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());
    let mut rows = Vec::new();
    for rec in rdr.deserialize::<T>() {
        match rec {
            Ok(row) => rows.push(row),
            Err(e) => {
                log::warn!("{}: skipping malformed record: {}", file, e);
                stats.reject();
            }
        }
    }
    rows
}

fn parse_status_row(row: &RawStatusRow) -> Option<Observation> {
    if row.store_id.is_empty() {
        return None;
    }
    let status: StoreStatus = row.status.parse().ok()?;
    let timestamp = parse_timestamp(&row.timestamp_utc)?;
    Some(Observation::new(row.store_id.clone(), timestamp, status))
}

fn parse_hours_row(row: &RawHoursRow) -> Option<BusinessHoursEntry> {
    if row.store_id.is_empty() {
        return None;
    }
    let weekday: u8 = row.day_of_week.parse().ok()?;
    if weekday > 6 {
        return None;
    }
    let open = parse_local_time(&row.start_time_local)?;
    let close = parse_local_time(&row.end_time_local)?;
    // Inverted windows are kept so the calendar can report and skip them.
    Some(BusinessHoursEntry::new(row.store_id.clone(), weekday, open, close))
}

/// Parses RFC 3339 or the export format `YYYY-MM-DD HH:MM:SS[.ffffff] UTC`.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = s.strip_suffix("UTC").map(str::trim_end).unwrap_or(s);
    NaiveDateTime::parse_from_str(naive, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|n| Utc.from_utc_datetime(&n))
}

#[async_trait]
impl StorageBackend for CsvStorage {
    async fn latest_observation_timestamp(&self) -> Result<Option<DateTime<Utc>>> {
        self.index.latest_observation_timestamp().await
    }

    async fn list_store_ids(&self) -> Result<Vec<String>> {
        self.index.list_store_ids().await
    }

    async fn load_observations(
        &self,
        store_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Observation>> {
        self.index.load_observations(store_ids, start, end).await
    }

    async fn load_latest_before(
        &self,
        store_ids: &[String],
        before: DateTime<Utc>,
    ) -> Result<Vec<Observation>> {
        self.index.load_latest_before(store_ids, before).await
    }

    async fn load_business_hours(&self, store_ids: &[String]) -> Result<Vec<BusinessHoursEntry>> {
        self.index.load_business_hours(store_ids).await
    }

    async fn load_timezones(&self) -> Result<Vec<TimezoneAssignment>> {
        self.index.load_timezones().await
    }
}
