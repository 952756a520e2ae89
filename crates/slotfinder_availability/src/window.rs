//! Daily search windows.
//!
//! A window is the UTC range on one calendar date in which slots may be
//! proposed: either the intersection of every participant's local working
//! hours, or a preferred time of day in the organizer's timezone.

use chrono::offset::LocalResult;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{PreferredWindow, ResolvedTimezone, TimeZoneId, WorkingHours};
use crate::workweek::WorkWeekPolicy;

/// A half-open UTC range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UtcWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl UtcWindow {
    /// `None` unless `start < end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn contains(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start <= start && end <= self.end
    }
}

/// Converts a wall-clock time in `tz` to UTC.
///
/// Ambiguous times (DST fold) take the earlier instant. Times inside a DST gap
/// are moved forward by the gap's usual hour.
pub fn local_to_utc(tz: TimeZoneId, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.tz().from_local_datetime(&local) {
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => tz
            .tz()
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc)),
    }
}

/// Local wall-clock time `minutes` after midnight on `date`; 1440 is next midnight.
fn local_at(date: NaiveDate, minutes: u32) -> Option<NaiveDateTime> {
    let midnight = date.and_hms_opt(0, 0, 0)?;
    midnight.checked_add_signed(Duration::minutes(i64::from(minutes)))
}

/// The UTC equivalent of `[start, end)` minutes-of-day on `date` in `tz`.
fn local_range_to_utc(
    date: NaiveDate,
    tz: TimeZoneId,
    start_minutes: u32,
    end_minutes: u32,
) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = local_to_utc(tz, local_at(date, start_minutes)?)?;
    let end = local_to_utc(tz, local_at(date, end_minutes)?)?;
    Some((start, end))
}

/// Intersection of every participant's local working hours on `date`, in UTC.
///
/// With a `policy`, the date must also be a working day for every participant;
/// a single non-working participant blocks the whole day. Returns `None` when
/// the day is blocked, the intersection is empty, or there are no participants.
pub fn working_window(
    date: NaiveDate,
    timezones: &[ResolvedTimezone],
    hours: WorkingHours,
    policy: Option<&WorkWeekPolicy>,
) -> Option<UtcWindow> {
    let mut overlap: Option<(DateTime<Utc>, DateTime<Utc>)> = None;

    for resolved in timezones {
        if let Some(policy) = policy {
            if !policy.workweek_for(&resolved.timezone).contains_date(date) {
                debug!(
                    "{} ({}): {} is not a working day",
                    resolved.calendar, resolved.timezone, date
                );
                return None;
            }
        }

        let (utc_start, utc_end) = local_range_to_utc(
            date,
            resolved.timezone,
            hours.start_hour * 60,
            hours.end_hour * 60,
        )?;
        debug!(
            "{} ({}): {:02}:00-{:02}:00 -> UTC {}-{}",
            resolved.calendar,
            resolved.timezone,
            hours.start_hour,
            hours.end_hour,
            utc_start,
            utc_end
        );

        overlap = Some(match overlap {
            None => (utc_start, utc_end),
            Some((start, end)) => (start.max(utc_start), end.min(utc_end)),
        });
    }

    let (start, end) = overlap?;
    UtcWindow::new(start, end)
}

/// The preferred time of day on `date` in the organizer's timezone, in UTC.
///
/// Other participants' working hours are not consulted. Returns `None` when
/// the converted range is empty.
pub fn preferred_window(
    date: NaiveDate,
    organizer_tz: TimeZoneId,
    preferred: &PreferredWindow,
    hours: WorkingHours,
) -> Option<UtcWindow> {
    let (start_minutes, end_minutes) = preferred.minutes_of_day(hours);
    let (start, end) = local_range_to_utc(date, organizer_tz, start_minutes, end_minutes)?;
    debug!(
        "Preferred window on {} ({}): UTC {}-{}",
        date, organizer_tz, start, end
    );
    UtcWindow::new(start, end)
}
