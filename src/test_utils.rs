// src/test_utils.rs

#![cfg(test)] // Ensure this module is only compiled for tests

use chrono::{DateTime, NaiveTime, TimeZone, Utc};

use crate::config::Config;
use crate::core::observation::BusinessHoursEntry;
use crate::types::StorageType;

/// Provides a common test configuration: in-memory storage, small chunks.
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.storage.storage_type = StorageType::Memory;
    config.storage.base_path = "".to_string();
    config.report.batch_size = 2;
    config.report.workers = 2;
    config
}

/// Local time of day `hh:mm`.
pub fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// UTC instant at a whole minute.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// The same open window on all seven weekdays.
pub fn daily_hours(store_id: &str, open: NaiveTime, close: NaiveTime) -> Vec<BusinessHoursEntry> {
    (0..7).map(|day| BusinessHoursEntry::new(store_id, day, open, close)).collect()
}
