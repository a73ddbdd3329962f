// src/time/zone.rs

use std::collections::HashMap;

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::core::observation::TimezoneAssignment;

/// Parses an IANA timezone identifier, `None` if chrono-tz does not know it.
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// Converts a store-local wall-clock time to UTC using the offset in force
/// on that date.
///
/// Ambiguous times (clocks falling back) resolve to the earlier instant.
/// Times inside a spring-forward gap are read with the offset in force before
/// the gap, which lands them the gap's length later on the new clock.
pub fn local_to_utc(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => {
            // No zone shifts twice within a day, so a day earlier is before the gap.
            let offset = tz
                .offset_from_utc_datetime(&(naive - Duration::days(1)))
                .fix()
                .local_minus_utc();
            Utc.from_utc_datetime(&(naive - Duration::seconds(i64::from(offset))))
        }
    }
}

/// Maps store ids to their timezone, falling back to a configured default.
///
/// Unknown identifiers are dropped when they are registered (with a warning),
/// so lookups never fail.
#[derive(Debug, Clone)]
pub struct TimezoneResolver {
    zones: HashMap<String, Tz>,
    default: Tz,
}

impl TimezoneResolver {
    /// Creates a resolver with no assignments.
    pub fn new(default: Tz) -> Self {
        Self {
            zones: HashMap::new(),
            default,
        }
    }

    /// Creates a resolver from stored assignments.
    pub fn from_assignments<I>(assignments: I, default: Tz) -> Self
    where
        I: IntoIterator<Item = TimezoneAssignment>,
    {
        let mut resolver = Self::new(default);
        for assignment in assignments {
            resolver.assign(&assignment.store_id, &assignment.timezone_name);
        }
        resolver
    }

    /// Registers a store's timezone. Returns `false` and keeps the store on the
    /// default when `timezone_name` is not a known IANA identifier.
    pub fn assign(&mut self, store_id: &str, timezone_name: &str) -> bool {
        match parse_timezone(timezone_name) {
            Some(tz) => {
                self.zones.insert(store_id.to_string(), tz);
                true
            }
            None => {
                log::warn!(
                    "Store {} has unknown timezone '{}', using {}",
                    store_id,
                    timezone_name,
                    self.default.name()
                );
                self.zones.remove(store_id);
                false
            }
        }
    }

    /// The timezone name for `store_id`.
    pub fn resolve(&self, store_id: &str) -> &'static str {
        self.resolve_tz(store_id).name()
    }

    /// The parsed timezone for `store_id`.
    pub fn resolve_tz(&self, store_id: &str) -> Tz {
        self.zones.get(store_id).copied().unwrap_or(self.default)
    }

    /// The fallback timezone.
    pub fn default_timezone(&self) -> Tz {
        self.default
    }

    /// Number of stores with an explicit, valid assignment.
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// `true` when no store has an explicit assignment.
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}
