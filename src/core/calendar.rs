// src/core/calendar.rs

//! Per-store business-hours calendars.
//!
//! A calendar turns a store's weekly local schedule into concrete UTC open
//! intervals for a given local calendar date. Conversion happens per date so
//! that daylight-saving changes move the UTC instants with the local clock.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::core::observation::BusinessHoursEntry;
use crate::time::zone::{local_to_utc, TimezoneResolver};
use crate::types::WeekStart;

/// A UTC range during which a store is scheduled to be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenInterval {
    /// Inclusive start
    pub start_utc: DateTime<Utc>,
    /// Exclusive end
    pub end_utc: DateTime<Utc>,
}

impl OpenInterval {
    /// Creates a new `OpenInterval`.
    pub fn new(start_utc: DateTime<Utc>, end_utc: DateTime<Utc>) -> Self {
        Self { start_utc, end_utc }
    }

    /// Length of the interval.
    pub fn duration(&self) -> Duration {
        self.end_utc - self.start_utc
    }

    /// Length of the overlap with `[start, end)`. Zero when they only touch or
    /// do not meet at all.
    pub fn overlap(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        let lo = self.start_utc.max(start);
        let hi = self.end_utc.min(end);
        if hi > lo {
            hi - lo
        } else {
            Duration::zero()
        }
    }
}

/// Weekly local schedule: one list of `(open, close)` pairs per day number.
type WeeklyHours = [Vec<(NaiveTime, NaiveTime)>; 7];

/// Business-hours calendar of a single store.
#[derive(Debug, Clone)]
pub struct StoreCalendar {
    store_id: String,
    timezone: Tz,
    week_start: WeekStart,
    /// `None` means no hours were ever recorded: open around the clock.
    weekly: Option<WeeklyHours>,
}

impl StoreCalendar {
    /// A calendar that is open 24/7 in `timezone`.
    pub fn always_open(store_id: impl Into<String>, timezone: Tz) -> Self {
        Self {
            store_id: store_id.into(),
            timezone,
            week_start: WeekStart::default(),
            weekly: None,
        }
    }

    /// Builds the calendar of `store_id` from business-hours rows.
    ///
    /// Rows for other stores are ignored. A store without any row is open
    /// 24/7. Invalid rows (close not after open, weekday out of range) are
    /// skipped, but still mark the store as having a schedule.
    pub fn from_entries(
        store_id: impl Into<String>,
        timezone: Tz,
        week_start: WeekStart,
        entries: &[BusinessHoursEntry],
    ) -> Self {
        let store_id = store_id.into();
        let mut weekly: Option<WeeklyHours> = None;

        for entry in entries.iter().filter(|e| e.store_id == store_id) {
            let days = weekly.get_or_insert_with(Default::default);
            if !entry.is_valid() {
                log::warn!(
                    "Skipping business hours for store {} on day {}: {} - {} is not a same-day window",
                    store_id,
                    entry.weekday,
                    entry.local_open,
                    entry.local_close
                );
                continue;
            }
            days[entry.weekday as usize].push((entry.local_open, entry.local_close));
        }

        if let Some(days) = weekly.as_mut() {
            for day in days.iter_mut() {
                day.sort();
            }
        }

        Self {
            store_id,
            timezone,
            week_start,
            weekly,
        }
    }

    /// Store this calendar belongs to.
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Store timezone.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// `true` when the store has no recorded hours.
    pub fn is_always_open(&self) -> bool {
        self.weekly.is_none()
    }

    /// Store-local calendar date of `instant`.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.timezone).date_naive()
    }

    /// Local dates whose open intervals can intersect `[start, end]`.
    pub fn local_dates(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> impl Iterator<Item = NaiveDate> {
        let last = self.local_date(end);
        self.local_date(start).iter_days().take_while(move |d| *d <= last)
    }

    /// Open intervals, in UTC, for the store-local calendar date `date`.
    ///
    /// Ordered by start; overlapping windows of the same day are merged.
    pub fn open_intervals_utc(&self, date: NaiveDate) -> Vec<OpenInterval> {
        let Some(next_day) = date.succ_opt() else {
            return Vec::new();
        };

        let Some(weekly) = &self.weekly else {
            let start = local_to_utc(self.timezone, date.and_time(NaiveTime::MIN));
            let end = local_to_utc(self.timezone, next_day.and_time(NaiveTime::MIN));
            return vec![OpenInterval::new(start, end)];
        };

        let day = self.week_start.day_number(date.weekday()) as usize;
        let mut intervals: Vec<OpenInterval> = weekly[day]
            .iter()
            .map(|(open, close)| {
                OpenInterval::new(
                    local_to_utc(self.timezone, date.and_time(*open)),
                    local_to_utc(self.timezone, date.and_time(*close)),
                )
            })
            .filter(|interval| interval.end_utc > interval.start_utc)
            .collect();

        intervals.sort_by_key(|i| i.start_utc);
        merge_overlapping(intervals)
    }

    /// Total scheduled open time inside `[start, end]`.
    pub fn open_duration(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Duration {
        if end <= start {
            return Duration::zero();
        }
        self.local_dates(start, end)
            .flat_map(|date| self.open_intervals_utc(date))
            .fold(Duration::zero(), |acc, open| acc + open.overlap(start, end))
    }
}

fn merge_overlapping(sorted: Vec<OpenInterval>) -> Vec<OpenInterval> {
    let mut merged: Vec<OpenInterval> = Vec::with_capacity(sorted.len());
    for interval in sorted {
        match merged.last_mut() {
            Some(last) if interval.start_utc <= last.end_utc => {
                last.end_utc = last.end_utc.max(interval.end_utc);
            }
            _ => merged.push(interval),
        }
    }
    merged
}

/// Business hours and timezones for a set of stores.
///
/// Answers `open_intervals_utc(store_id, date)` and hands out per-store
/// [`StoreCalendar`]s for repeated lookups.
#[derive(Debug, Clone)]
pub struct CalendarBook {
    resolver: Arc<TimezoneResolver>,
    week_start: WeekStart,
    entries: HashMap<String, Vec<BusinessHoursEntry>>,
}

impl CalendarBook {
    /// Creates a book over `entries`, resolving timezones with `resolver`.
    pub fn new<I>(resolver: Arc<TimezoneResolver>, week_start: WeekStart, entries: I) -> Self
    where
        I: IntoIterator<Item = BusinessHoursEntry>,
    {
        let mut by_store: HashMap<String, Vec<BusinessHoursEntry>> = HashMap::new();
        for entry in entries {
            by_store.entry(entry.store_id.clone()).or_default().push(entry);
        }
        Self {
            resolver,
            week_start,
            entries: by_store,
        }
    }

    /// The calendar of `store_id`.
    pub fn calendar_for(&self, store_id: &str) -> StoreCalendar {
        let timezone = self.resolver.resolve_tz(store_id);
        match self.entries.get(store_id) {
            Some(entries) => StoreCalendar::from_entries(store_id, timezone, self.week_start, entries),
            None => StoreCalendar {
                week_start: self.week_start,
                ..StoreCalendar::always_open(store_id, timezone)
            },
        }
    }

    /// Open intervals of `store_id` on its local calendar date `date`.
    pub fn open_intervals_utc(&self, store_id: &str, date: NaiveDate) -> Vec<OpenInterval> {
        self.calendar_for(store_id).open_intervals_utc(date)
    }
}
