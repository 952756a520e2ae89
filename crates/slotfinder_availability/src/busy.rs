//! Busy intervals per calendar, built from one free/busy query.

use chrono::{DateTime, Utc};
use slotfinder_common::{BusyInterval, CalendarRef, FreeBusyMap};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct BusyTimeIndex {
    busy: HashMap<CalendarRef, Vec<BusyInterval>>,
}

impl BusyTimeIndex {
    /// Builds the index, dropping empty or inverted intervals.
    ///
    /// Intervals are kept in the order received; no sorting is assumed.
    pub fn from_free_busy(free_busy: FreeBusyMap) -> Self {
        let busy = free_busy
            .into_iter()
            .map(|(calendar, intervals)| {
                let kept: Vec<BusyInterval> = intervals
                    .into_iter()
                    .filter(|interval| {
                        let valid = interval.start < interval.end;
                        if !valid {
                            debug!(
                                "Skipping empty busy interval {}-{} for {}",
                                interval.start, interval.end, calendar
                            );
                        }
                        valid
                    })
                    .collect();
                (calendar, kept)
            })
            .collect();
        Self { busy }
    }

    /// True iff no busy interval of `calendar` overlaps `[start, end)`.
    ///
    /// Calendars absent from the index are free.
    pub fn is_free(&self, calendar: &CalendarRef, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.conflict(calendar, start, end).is_none()
    }

    /// True iff `[start, end)` is free for every one of `calendars`.
    pub fn is_free_for_all(
        &self,
        calendars: &[CalendarRef],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> bool {
        calendars
            .iter()
            .all(|calendar| self.is_free(calendar, start, end))
    }

    /// First busy interval of `calendar` overlapping `[start, end)`.
    pub fn conflict(
        &self,
        calendar: &CalendarRef,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<&BusyInterval> {
        self.busy
            .get(calendar)?
            .iter()
            .find(|interval| interval.overlaps(start, end))
    }

    pub fn intervals(&self, calendar: &CalendarRef) -> &[BusyInterval] {
        self.busy.get(calendar).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.busy.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
