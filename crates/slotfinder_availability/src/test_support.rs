//! Shared doubles for the unit tests in this crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use slotfinder_common::{
    BusyInterval, CalendarDirectory, CalendarRef, DirectoryError, EventTimezones, FreeBusyMap,
    RecentEventsQuery,
};
use std::collections::HashMap;

use crate::logic::Clock;

mockall::mock! {
    pub Directory {}

    #[async_trait]
    impl CalendarDirectory for Directory {
        async fn declared_timezone(
            &self,
            calendar: &CalendarRef,
        ) -> Result<Option<String>, DirectoryError>;

        async fn recent_events(
            &self,
            calendar: &CalendarRef,
            query: RecentEventsQuery,
        ) -> Result<Vec<EventTimezones>, DirectoryError>;

        async fn query_free_busy(
            &self,
            calendars: &[CalendarRef],
            time_min: DateTime<Utc>,
            time_max: DateTime<Utc>,
        ) -> Result<FreeBusyMap, DirectoryError>;
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Directory backed by fixed data: declared zones and busy intervals only.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    pub zones: HashMap<CalendarRef, String>,
    pub busy: FreeBusyMap,
}

impl StaticDirectory {
    pub fn with_zone(mut self, calendar: &str, zone: &str) -> Self {
        self.zones.insert(CalendarRef::from(calendar), zone.to_string());
        self
    }

    pub fn with_busy(mut self, calendar: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.busy
            .entry(CalendarRef::from(calendar))
            .or_default()
            .push(BusyInterval::new(start, end));
        self
    }
}

#[async_trait]
impl CalendarDirectory for StaticDirectory {
    async fn declared_timezone(
        &self,
        calendar: &CalendarRef,
    ) -> Result<Option<String>, DirectoryError> {
        Ok(self.zones.get(calendar).cloned())
    }

    async fn recent_events(
        &self,
        _calendar: &CalendarRef,
        _query: RecentEventsQuery,
    ) -> Result<Vec<EventTimezones>, DirectoryError> {
        Ok(Vec::new())
    }

    async fn query_free_busy(
        &self,
        calendars: &[CalendarRef],
        _time_min: DateTime<Utc>,
        _time_max: DateTime<Utc>,
    ) -> Result<FreeBusyMap, DirectoryError> {
        Ok(calendars
            .iter()
            .filter_map(|c| self.busy.get(c).map(|b| (c.clone(), b.clone())))
            .collect())
    }
}

pub fn event(start: Option<&str>, end: Option<&str>) -> EventTimezones {
    EventTimezones {
        start_timezone: start.map(str::to_string),
        end_timezone: end.map(str::to_string),
    }
}
