// --- File: crates/slotfinder_common/src/services.rs ---
//! Collaborator abstractions for calendar data.
//!
//! The availability engine never talks to a calendar backend directly. It is
//! handed a [`CalendarDirectory`] at construction time, which keeps the engine
//! free of globals and lets tests substitute mocks or in-memory snapshots.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::DirectoryError;

/// Identifier of the organizer's own calendar.
pub const PRIMARY_CALENDAR: &str = "primary";

/// Opaque identifier of a calendar: an email address or `"primary"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarRef(String);

impl CalendarRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn primary() -> Self {
        Self(PRIMARY_CALENDAR.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalendarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CalendarRef {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for CalendarRef {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A half-open UTC range `[start, end)` during which a calendar is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open overlap: `[a1, a2)` and `[b1, b2)` overlap iff `a1 < b2 && b1 < a2`.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}

/// Timezone annotations carried by one calendar event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTimezones {
    #[serde(default)]
    pub start_timezone: Option<String>,
    #[serde(default)]
    pub end_timezone: Option<String>,
}

impl EventTimezones {
    /// The start annotation, or the end annotation when the start has none.
    pub fn effective(&self) -> Option<&str> {
        self.start_timezone
            .as_deref()
            .or(self.end_timezone.as_deref())
    }
}

/// Bounds for a recent-events lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentEventsQuery {
    pub time_min: DateTime<Utc>,
    pub time_max: DateTime<Utc>,
    pub max_results: usize,
}

/// Busy intervals per calendar, as returned by one batched free/busy query.
pub type FreeBusyMap = HashMap<CalendarRef, Vec<BusyInterval>>;

/// Read-only access to calendar metadata, recent events and free/busy data.
#[async_trait]
pub trait CalendarDirectory: Send + Sync {
    /// The timezone declared on the calendar itself, if it has one.
    async fn declared_timezone(
        &self,
        calendar: &CalendarRef,
    ) -> Result<Option<String>, DirectoryError>;

    /// Recent events of the calendar, oldest first, limited by `query`.
    async fn recent_events(
        &self,
        calendar: &CalendarRef,
        query: RecentEventsQuery,
    ) -> Result<Vec<EventTimezones>, DirectoryError>;

    /// Busy intervals for all `calendars` within `[time_min, time_max)`, in one call.
    async fn query_free_busy(
        &self,
        calendars: &[CalendarRef],
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
    ) -> Result<FreeBusyMap, DirectoryError>;
}
