#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use store_uptime::core::{BusinessHoursEntry, Observation, TimezoneAssignment};
use store_uptime::storage::MemoryStorage;
use store_uptime::{EngineDefaults, ReportEngine, StoreStatus};

pub fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, mi, 0).unwrap()
}

pub fn hm(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn obs(store: &str, at: DateTime<Utc>, status: StoreStatus) -> Observation {
    Observation::new(store, at, status)
}

/// Seeds a memory backend with one store's data.
pub struct StoreFixture<'a> {
    pub storage: &'a MemoryStorage,
    pub store_id: &'a str,
}

impl<'a> StoreFixture<'a> {
    pub fn new(storage: &'a MemoryStorage, store_id: &'a str) -> Self {
        Self { storage, store_id }
    }

    pub fn timezone(self, name: &str) -> Self {
        self.storage.insert_timezone(TimezoneAssignment::new(self.store_id, name));
        self
    }

    pub fn open_daily(self, open: NaiveTime, close: NaiveTime) -> Self {
        for day in 0..7 {
            self.storage
                .insert_business_hours(BusinessHoursEntry::new(self.store_id, day, open, close));
        }
        self
    }

    pub fn open_on(self, day: u8, open: NaiveTime, close: NaiveTime) -> Self {
        self.storage
            .insert_business_hours(BusinessHoursEntry::new(self.store_id, day, open, close));
        self
    }

    pub fn saw(self, at: DateTime<Utc>, status: StoreStatus) -> Self {
        self.storage.insert_observation(obs(self.store_id, at, status));
        self
    }
}

pub fn engine(storage: &MemoryStorage) -> ReportEngine {
    ReportEngine::new(Arc::new(storage.clone()), EngineDefaults::default())
}

/// Writes the three source CSV files into `dir`.
pub fn write_source_csvs(dir: &Path, status: &str, hours: Option<&str>, timezones: Option<&str>) {
    std::fs::write(dir.join("store_status.csv"), status).unwrap();
    if let Some(hours) = hours {
        std::fs::write(dir.join("menu_hours.csv"), hours).unwrap();
    }
    if let Some(timezones) = timezones {
        std::fs::write(dir.join("timezones.csv"), timezones).unwrap();
    }
}
