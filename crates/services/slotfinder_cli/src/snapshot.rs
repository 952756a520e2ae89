//! Calendar data and requests read from JSON files.
//!
//! A snapshot stands in for a live calendar backend: for each calendar it
//! holds the declared timezone, timezone annotations of recent events and
//! busy intervals. Calendars absent from the snapshot answer lookups with
//! `NotFound` and are free.

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use slotfinder_availability::{
    AvailabilityRequest, TimeZoneId, TimezoneMode, WeekdayFilter, WorkWeek,
};
use slotfinder_common::{
    not_found, BusyInterval, CalendarDirectory, CalendarRef, DirectoryError, EventTimezones,
    FreeBusyMap, RecentEventsQuery,
};
use slotfinder_config::SchedulerConfig;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarSnapshot {
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub recent_events: Vec<EventTimezones>,
    #[serde(default)]
    pub busy: Vec<BusyInterval>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    calendars: HashMap<CalendarRef, CalendarSnapshot>,
}

/// A [`CalendarDirectory`] answering from a fixed snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDirectory {
    calendars: HashMap<CalendarRef, CalendarSnapshot>,
}

impl SnapshotDirectory {
    pub fn from_json(json: &str) -> Result<Self, DirectoryError> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        Ok(Self {
            calendars: file.calendars,
        })
    }

    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let json = std::fs::read_to_string(path)?;
        let directory = Self::from_json(&json)?;
        info!(
            "Loaded snapshot of {} calendars from {}",
            directory.calendars.len(),
            path.display()
        );
        Ok(directory)
    }

    fn calendar(&self, calendar: &CalendarRef) -> Result<&CalendarSnapshot, DirectoryError> {
        self.calendars
            .get(calendar)
            .ok_or_else(|| not_found(calendar.as_str()))
    }
}

#[async_trait]
impl CalendarDirectory for SnapshotDirectory {
    async fn declared_timezone(
        &self,
        calendar: &CalendarRef,
    ) -> Result<Option<String>, DirectoryError> {
        Ok(self.calendar(calendar)?.timezone.clone())
    }

    async fn recent_events(
        &self,
        calendar: &CalendarRef,
        query: RecentEventsQuery,
    ) -> Result<Vec<EventTimezones>, DirectoryError> {
        let events = &self.calendar(calendar)?.recent_events;
        Ok(events.iter().take(query.max_results).cloned().collect())
    }

    async fn query_free_busy(
        &self,
        calendars: &[CalendarRef],
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<FreeBusyMap, DirectoryError> {
        debug!(
            "Free/busy for {} calendars between {} and {}",
            calendars.len(),
            time_min,
            time_max
        );
        Ok(calendars
            .iter()
            .filter_map(|calendar| {
                let snapshot = self.calendars.get(calendar)?;
                let busy = snapshot
                    .busy
                    .iter()
                    .filter(|interval| interval.overlaps(time_min, time_max))
                    .copied()
                    .collect();
                Some((calendar.clone(), busy))
            })
            .collect())
    }
}

/// A meeting request as written in a request file; unset fields come from config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestFile {
    pub attendees: Vec<String>,
    #[serde(default)]
    pub organizer: Option<String>,
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub date_start: Option<NaiveDate>,
    #[serde(default)]
    pub date_end: Option<NaiveDate>,
    #[serde(default)]
    pub start_hour: Option<u32>,
    #[serde(default)]
    pub end_hour: Option<u32>,
    #[serde(default)]
    pub preferred_start: Option<NaiveTime>,
    #[serde(default)]
    pub preferred_end: Option<NaiveTime>,
    #[serde(default)]
    pub max_suggestions: Option<usize>,
    /// Allowed weekdays, 0=Mon .. 6=Sun; replaces the regional work weeks
    #[serde(default)]
    pub weekdays: Option<Vec<u8>>,
    /// Search every day of the week
    #[serde(default)]
    pub all_days: bool,
    /// One timezone for everybody, skipping detection
    #[serde(default)]
    pub timezone: Option<TimeZoneId>,
}

impl RequestFile {
    pub fn load(path: &Path) -> Result<Self, DirectoryError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Converts into an engine request, filling gaps from `config`.
    pub fn into_request(
        self,
        config: &SchedulerConfig,
        today: NaiveDate,
    ) -> Result<AvailabilityRequest, String> {
        let weekdays = match (&self.weekdays, self.all_days) {
            (Some(_), true) => {
                return Err("weekdays and all_days cannot be combined".to_string());
            }
            (Some(indices), false) => WeekdayFilter::Allowed(
                WorkWeek::from_indices(indices)
                    .ok_or_else(|| format!("invalid weekday list {:?}", indices))?,
            ),
            (None, true) => WeekdayFilter::Unrestricted,
            (None, false) => WeekdayFilter::WorkWeekAware,
        };

        let mut builder = AvailabilityRequest::builder(self.attendees)
            .hours(
                self.start_hour.unwrap_or(config.default_start_hour),
                self.end_hour.unwrap_or(config.default_end_hour),
            )
            .preferred(self.preferred_start, self.preferred_end)
            .weekdays(weekdays);
        if let Some(organizer) = self.organizer {
            builder = builder.organizer(organizer);
        }
        if let Some(minutes) = self.duration_minutes {
            let duration = Duration::try_minutes(minutes)
                .ok_or_else(|| format!("duration_minutes {} is out of range", minutes))?;
            builder = builder.duration(duration);
        }
        if let Some(date) = self.date_start {
            builder = builder.date_start(date);
        }
        if let Some(date) = self.date_end {
            builder = builder.date_end(date);
        }
        if let Some(max) = self.max_suggestions {
            builder = builder.max_suggestions(max);
        }
        if let Some(tz) = self.timezone {
            builder = builder.timezone_mode(TimezoneMode::Fixed(tz));
        }
        Ok(builder.build(config, today))
    }
}
