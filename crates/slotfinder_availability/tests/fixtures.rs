//! Test fixtures for availability engine tests
//!
//! An in-memory calendar directory plus helpers for building requests
//! against fixed dates.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use slotfinder_availability::{AvailabilityEngine, Clock};
use slotfinder_common::{
    BusyInterval, CalendarDirectory, CalendarRef, DirectoryError, EventTimezones, FreeBusyMap,
    RecentEventsQuery,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Clock pinned to one instant
pub struct FrozenClock(pub DateTime<Utc>);

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Calendar directory held entirely in memory.
///
/// Records every free/busy query so tests can inspect the requested span.
#[derive(Default)]
pub struct InMemoryDirectory {
    zones: HashMap<CalendarRef, String>,
    events: HashMap<CalendarRef, Vec<EventTimezones>>,
    busy: FreeBusyMap,
    failing: Vec<CalendarRef>,
    pub free_busy_queries: Mutex<Vec<(Vec<CalendarRef>, DateTime<Utc>, DateTime<Utc>)>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zone(mut self, calendar: &str, zone: &str) -> Self {
        self.zones.insert(calendar.into(), zone.to_string());
        self
    }

    pub fn event_zone(mut self, calendar: &str, zone: &str, count: usize) -> Self {
        let entry = self.events.entry(calendar.into()).or_default();
        for _ in 0..count {
            entry.push(EventTimezones {
                start_timezone: Some(zone.to_string()),
                end_timezone: None,
            });
        }
        self
    }

    pub fn busy(mut self, calendar: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.busy
            .entry(calendar.into())
            .or_default()
            .push(BusyInterval::new(start, end));
        self
    }

    /// Timezone lookups for this calendar fail with a transport error.
    pub fn failing(mut self, calendar: &str) -> Self {
        self.failing.push(calendar.into());
        self
    }

    fn check(&self, calendar: &CalendarRef) -> Result<(), DirectoryError> {
        if self.failing.contains(calendar) {
            return Err(DirectoryError::Transport(format!("{} unreachable", calendar)));
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarDirectory for InMemoryDirectory {
    async fn declared_timezone(
        &self,
        calendar: &CalendarRef,
    ) -> Result<Option<String>, DirectoryError> {
        self.check(calendar)?;
        Ok(self.zones.get(calendar).cloned())
    }

    async fn recent_events(
        &self,
        calendar: &CalendarRef,
        query: RecentEventsQuery,
    ) -> Result<Vec<EventTimezones>, DirectoryError> {
        self.check(calendar)?;
        let events = self.events.get(calendar).cloned().unwrap_or_default();
        Ok(events.into_iter().take(query.max_results).collect())
    }

    async fn query_free_busy(
        &self,
        calendars: &[CalendarRef],
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<FreeBusyMap, DirectoryError> {
        if let Ok(mut queries) = self.free_busy_queries.lock() {
            queries.push((calendars.to_vec(), time_min, time_max));
        }
        Ok(calendars
            .iter()
            .filter_map(|c| self.busy.get(c).map(|b| (c.clone(), b.clone())))
            .collect())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Engine over `directory` with the clock at 2025-09-01 00:00 UTC.
pub fn engine_for(directory: Arc<InMemoryDirectory>) -> AvailabilityEngine {
    AvailabilityEngine::new(directory).with_clock(Arc::new(FrozenClock(utc(2025, 9, 1, 0, 0))))
}
