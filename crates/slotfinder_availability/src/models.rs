// --- File: crates/slotfinder_availability/src/models.rs ---
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use slotfinder_common::CalendarRef;
use slotfinder_config::SchedulerConfig;
use std::fmt;
use std::str::FromStr;

use crate::workweek::WorkWeek;

// --- Timezones ---

/// A validated IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeZoneId(Tz);

impl TimeZoneId {
    /// Parses an IANA name such as `"Europe/Zurich"`; `None` if unknown.
    pub fn parse(name: &str) -> Option<Self> {
        Tz::from_str(name.trim()).ok().map(TimeZoneId)
    }

    pub fn utc() -> Self {
        TimeZoneId(Tz::UTC)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn tz(&self) -> Tz {
        self.0
    }
}

impl Default for TimeZoneId {
    fn default() -> Self {
        Self::utc()
    }
}

impl From<Tz> for TimeZoneId {
    fn from(tz: Tz) -> Self {
        TimeZoneId(tz)
    }
}

impl fmt::Display for TimeZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TimeZoneId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for TimeZoneId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        TimeZoneId::parse(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown timezone: {name}")))
    }
}

/// Where a calendar's timezone came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimezoneSource {
    /// Declared on the calendar itself
    Declared,
    /// Most frequent annotation among recent events
    Inferred,
    /// Nothing usable found; UTC assumed
    Fallback,
    /// Assigned by the request, no lookups made
    Fixed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTimezone {
    pub calendar: CalendarRef,
    pub timezone: TimeZoneId,
    pub source: TimezoneSource,
}

// --- Request ---

/// Longest meeting a request may ask for; no daily window is longer.
pub const MAX_MEETING_DURATION_MINUTES: i64 = 24 * 60;

/// Local working hours, `[start_hour:00, end_hour:00)`; `end_hour` may be 24.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkingHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl WorkingHours {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.start_hour < self.end_hour && self.end_hour <= 24
    }
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self::new(7, 20)
    }
}

/// A preferred time of day in the organizer's timezone.
///
/// A missing bound falls back to the corresponding working-hours bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreferredWindow {
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
}

impl PreferredWindow {
    /// Minutes after local midnight for both bounds, filling gaps from `hours`.
    pub fn minutes_of_day(&self, hours: WorkingHours) -> (u32, u32) {
        let as_minutes = |t: NaiveTime| t.hour() * 60 + t.minute();
        let start = self
            .start
            .map(as_minutes)
            .unwrap_or(hours.start_hour * 60);
        let end = self.end.map(as_minutes).unwrap_or(hours.end_hour * 60);
        (start, end)
    }
}

/// The dates to search and the time of day to search within.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWindow {
    /// First date searched, inclusive
    pub date_start: NaiveDate,
    /// Last date searched, inclusive
    pub date_end: NaiveDate,
    pub hours: WorkingHours,
    /// When present, replaces the per-attendee working-hours intersection
    pub preferred: Option<PreferredWindow>,
}

impl SearchWindow {
    /// Dates from `date_start` to `date_end`, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.date_end;
        self.date_start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Which weekdays may hold a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeekdayFilter {
    /// Only days that are working days in every participant's region
    #[default]
    WorkWeekAware,
    /// Only the listed weekdays, regardless of regional work weeks
    Allowed(WorkWeek),
    /// Every day
    Unrestricted,
}

/// How participant timezones are determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimezoneMode {
    /// Ask the calendar directory, with inference and UTC fallback
    #[default]
    Detect,
    /// Use this zone for every calendar, without lookups
    Fixed(TimeZoneId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityRequest {
    /// Calendar of the person organizing the meeting; always a participant
    pub organizer: CalendarRef,
    pub attendees: Vec<CalendarRef>,
    pub duration: Duration,
    pub window: SearchWindow,
    pub max_suggestions: usize,
    pub weekdays: WeekdayFilter,
    pub timezone_mode: TimezoneMode,
}

impl AvailabilityRequest {
    pub fn builder<I, C>(attendees: I) -> AvailabilityRequestBuilder
    where
        I: IntoIterator<Item = C>,
        C: Into<CalendarRef>,
    {
        AvailabilityRequestBuilder::new(attendees.into_iter().map(Into::into).collect())
    }

    /// Organizer first, then attendees in order, without duplicates.
    pub fn participants(&self) -> Vec<CalendarRef> {
        let mut calendars = vec![self.organizer.clone()];
        for attendee in &self.attendees {
            if !calendars.contains(attendee) {
                calendars.push(attendee.clone());
            }
        }
        calendars
    }

    /// Checks the request shape; returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.attendees.is_empty() {
            return Err("at least one attendee is required".to_string());
        }
        if self.duration <= Duration::zero() {
            return Err(format!(
                "duration must be positive, got {} minutes",
                self.duration.num_minutes()
            ));
        }
        if self.duration > Duration::minutes(MAX_MEETING_DURATION_MINUTES) {
            return Err(format!(
                "duration must not exceed {} minutes, got {} minutes",
                MAX_MEETING_DURATION_MINUTES,
                self.duration.num_minutes()
            ));
        }
        if self.window.date_end < self.window.date_start {
            return Err(format!(
                "date_end {} is before date_start {}",
                self.window.date_end, self.window.date_start
            ));
        }
        if self.max_suggestions == 0 {
            return Err("max_suggestions must be positive".to_string());
        }
        if !self.window.hours.is_valid() {
            return Err(format!(
                "working hours must satisfy start < end <= 24, got {}..{}",
                self.window.hours.start_hour, self.window.hours.end_hour
            ));
        }
        if let Some(preferred) = &self.window.preferred {
            let (start, end) = preferred.minutes_of_day(self.window.hours);
            if end <= start {
                return Err(format!(
                    "preferred window end {:02}:{:02} is not after start {:02}:{:02}",
                    end / 60,
                    end % 60,
                    start / 60,
                    start % 60
                ));
            }
        }
        Ok(())
    }
}

/// Assembles an [`AvailabilityRequest`], filling unset fields from [`SchedulerConfig`].
#[derive(Debug, Clone, Default)]
pub struct AvailabilityRequestBuilder {
    attendees: Vec<CalendarRef>,
    organizer: Option<CalendarRef>,
    duration: Option<Duration>,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
    hours: Option<WorkingHours>,
    preferred: Option<PreferredWindow>,
    max_suggestions: Option<usize>,
    weekdays: WeekdayFilter,
    timezone_mode: TimezoneMode,
}

impl AvailabilityRequestBuilder {
    fn new(attendees: Vec<CalendarRef>) -> Self {
        Self {
            attendees,
            ..Default::default()
        }
    }

    pub fn organizer(mut self, organizer: impl Into<CalendarRef>) -> Self {
        self.organizer = Some(organizer.into());
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Out-of-range minute counts become a duration that fails validation.
    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.duration = Some(Duration::try_minutes(minutes).unwrap_or(Duration::MAX));
        self
    }

    pub fn date_start(mut self, date: NaiveDate) -> Self {
        self.date_start = Some(date);
        self
    }

    pub fn date_end(mut self, date: NaiveDate) -> Self {
        self.date_end = Some(date);
        self
    }

    pub fn hours(mut self, start_hour: u32, end_hour: u32) -> Self {
        self.hours = Some(WorkingHours::new(start_hour, end_hour));
        self
    }

    pub fn preferred(mut self, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Self {
        self.preferred = (start.is_some() || end.is_some()).then_some(PreferredWindow { start, end });
        self
    }

    pub fn max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = Some(max);
        self
    }

    pub fn weekdays(mut self, filter: WeekdayFilter) -> Self {
        self.weekdays = filter;
        self
    }

    pub fn timezone_mode(mut self, mode: TimezoneMode) -> Self {
        self.timezone_mode = mode;
        self
    }

    /// Builds the request. The date range defaults to `today` through
    /// `today + default_search_days`; nothing is validated here.
    pub fn build(self, defaults: &SchedulerConfig, today: NaiveDate) -> AvailabilityRequest {
        let date_start = self.date_start.unwrap_or(today);
        let date_end = self.date_end.unwrap_or_else(|| {
            date_start + Duration::days(i64::from(defaults.default_search_days))
        });
        AvailabilityRequest {
            organizer: self
                .organizer
                .unwrap_or_else(|| CalendarRef::new(defaults.organizer.clone())),
            attendees: self.attendees,
            duration: self.duration.unwrap_or_else(|| Duration::minutes(30)),
            window: SearchWindow {
                date_start,
                date_end,
                hours: self.hours.unwrap_or(WorkingHours::new(
                    defaults.default_start_hour,
                    defaults.default_end_hour,
                )),
                preferred: self.preferred,
            },
            max_suggestions: self
                .max_suggestions
                .unwrap_or(defaults.default_max_suggestions),
            weekdays: self.weekdays,
            timezone_mode: self.timezone_mode,
        }
    }
}

// --- Result ---

/// An accepted meeting slot `[start, end)` in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Slot {
    pub fn new(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The slot bounds as wall-clock times in `tz`.
    pub fn in_timezone(&self, tz: TimeZoneId) -> (DateTime<Tz>, DateTime<Tz>) {
        (
            self.start.with_timezone(&tz.tz()),
            self.end.with_timezone(&tz.tz()),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilityOutcome {
    /// Accepted slots in chronological order
    pub slots: Vec<Slot>,
    /// Timezone used for each participant, organizer first
    pub resolved_timezones: Vec<ResolvedTimezone>,
    /// Number of calendar days visited before the search stopped
    pub days_searched: u32,
}

impl AvailabilityOutcome {
    pub fn timezone_of(&self, calendar: &CalendarRef) -> Option<TimeZoneId> {
        self.resolved_timezones
            .iter()
            .find(|r| &r.calendar == calendar)
            .map(|r| r.timezone)
    }
}
