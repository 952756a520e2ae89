//! Regional work-week conventions.
//!
//! Most of the world works Monday to Friday, but Israel and several Gulf
//! states work Sunday to Thursday. The policy maps an IANA timezone name to
//! the weekdays treated as working days there; unknown zones get Mon–Fri.

use chrono::{Datelike, NaiveDate, Weekday};
use slotfinder_config::SchedulerConfig;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

use crate::models::TimeZoneId;

/// A non-empty set of weekdays, stored as a bitmask (bit 0 = Monday).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkWeek(u8);

impl WorkWeek {
    pub const MONDAY_TO_FRIDAY: WorkWeek = WorkWeek(0b0001_1111);
    pub const SUNDAY_TO_THURSDAY: WorkWeek = WorkWeek(0b0100_1111);
    pub const EVERY_DAY: WorkWeek = WorkWeek(0b0111_1111);

    /// Builds a work week from weekdays; `None` when `days` is empty.
    pub fn from_days(days: &[Weekday]) -> Option<Self> {
        let mask = days
            .iter()
            .fold(0u8, |mask, day| mask | 1 << day.num_days_from_monday());
        (mask != 0).then_some(WorkWeek(mask))
    }

    /// Builds a work week from indices 0=Monday .. 6=Sunday.
    ///
    /// Returns `None` for an empty list or any index above 6.
    pub fn from_indices(indices: &[u8]) -> Option<Self> {
        if indices.iter().any(|i| *i > 6) {
            return None;
        }
        let mask = indices.iter().fold(0u8, |mask, i| mask | 1 << i);
        (mask != 0).then_some(WorkWeek(mask))
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    /// Weekdays in the set, Monday first.
    pub fn days(&self) -> impl Iterator<Item = Weekday> + '_ {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|day| self.contains(*day))
    }
}

impl Default for WorkWeek {
    fn default() -> Self {
        WorkWeek::MONDAY_TO_FRIDAY
    }
}

impl fmt::Debug for WorkWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.days()).finish()
    }
}

const SUNDAY_TO_THURSDAY_ZONES: &[&str] = &[
    "Asia/Jerusalem",
    "Asia/Tel_Aviv",
    "Asia/Riyadh",
    "Asia/Dubai",
    "Asia/Kuwait",
    "Asia/Amman",
];

/// Lookup table from timezone name to work week.
#[derive(Debug, Clone)]
pub struct WorkWeekPolicy {
    table: HashMap<String, WorkWeek>,
    fallback: WorkWeek,
}

impl Default for WorkWeekPolicy {
    fn default() -> Self {
        let table = SUNDAY_TO_THURSDAY_ZONES
            .iter()
            .map(|zone| (zone.to_string(), WorkWeek::SUNDAY_TO_THURSDAY))
            .collect();
        Self {
            table,
            fallback: WorkWeek::MONDAY_TO_FRIDAY,
        }
    }
}

impl WorkWeekPolicy {
    /// The built-in table extended with the configured overrides.
    ///
    /// Overrides that do not describe a valid work week are skipped with a warning.
    pub fn from_config(config: &SchedulerConfig) -> Self {
        let mut policy = Self::default();
        for (zone, indices) in &config.work_week_overrides {
            match WorkWeek::from_indices(indices) {
                Some(week) => policy = policy.with_override(zone.clone(), week),
                None => warn!("Ignoring invalid work week {:?} for {}", indices, zone),
            }
        }
        policy
    }

    pub fn with_override(mut self, zone: impl Into<String>, week: WorkWeek) -> Self {
        self.table.insert(zone.into(), week);
        self
    }

    /// Work week for the zone; Monday–Friday for anything not in the table.
    pub fn workweek_for(&self, tz: &TimeZoneId) -> WorkWeek {
        self.table.get(tz.name()).copied().unwrap_or(self.fallback)
    }

    /// True when `date` is a working day in every one of `zones`.
    pub fn is_working_day_for_all<'a>(
        &self,
        date: NaiveDate,
        mut zones: impl Iterator<Item = &'a TimeZoneId>,
    ) -> bool {
        zones.all(|tz| self.workweek_for(tz).contains_date(date))
    }
}
