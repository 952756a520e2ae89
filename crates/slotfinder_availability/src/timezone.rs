//! Per-calendar timezone resolution.
//!
//! Fallback chain: the calendar's declared timezone, then the most frequent
//! timezone among recent events, then UTC. Collaborator failures never
//! propagate; they only move resolution to the next step.

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use slotfinder_common::{CalendarDirectory, CalendarRef, EventTimezones, RecentEventsQuery};
use tracing::{info, warn};

use crate::models::{ResolvedTimezone, TimeZoneId, TimezoneSource};

pub struct TimezoneResolver<'a> {
    directory: &'a dyn CalendarDirectory,
    now: DateTime<Utc>,
    lookback: Duration,
    max_events: usize,
}

impl<'a> TimezoneResolver<'a> {
    pub fn new(
        directory: &'a dyn CalendarDirectory,
        now: DateTime<Utc>,
        lookback_days: u32,
        max_events: usize,
    ) -> Self {
        Self {
            directory,
            now,
            lookback: Duration::days(i64::from(lookback_days)),
            max_events,
        }
    }

    /// Resolves every calendar concurrently; output order matches `calendars`.
    pub async fn resolve_all(&self, calendars: &[CalendarRef]) -> Vec<ResolvedTimezone> {
        join_all(calendars.iter().map(|calendar| self.resolve(calendar))).await
    }

    /// Resolves one calendar. Always succeeds, falling back to UTC.
    pub async fn resolve(&self, calendar: &CalendarRef) -> ResolvedTimezone {
        let (timezone, source) = if let Some(tz) = self.declared(calendar).await {
            (tz, TimezoneSource::Declared)
        } else if let Some(tz) = self.inferred(calendar).await {
            (tz, TimezoneSource::Inferred)
        } else {
            warn!("Could not determine timezone for {}, using UTC", calendar);
            (TimeZoneId::utc(), TimezoneSource::Fallback)
        };

        info!("Using timezone {} for {} ({:?})", timezone, calendar, source);
        ResolvedTimezone {
            calendar: calendar.clone(),
            timezone,
            source,
        }
    }

    async fn declared(&self, calendar: &CalendarRef) -> Option<TimeZoneId> {
        match self.directory.declared_timezone(calendar).await {
            Ok(Some(name)) => {
                let parsed = TimeZoneId::parse(&name);
                if parsed.is_none() {
                    warn!("Calendar {} declares unknown timezone {:?}", calendar, name);
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Error getting timezone for {}: {}", calendar, e);
                None
            }
        }
    }

    async fn inferred(&self, calendar: &CalendarRef) -> Option<TimeZoneId> {
        let query = RecentEventsQuery {
            time_min: self.now - self.lookback,
            time_max: self.now,
            max_results: self.max_events,
        };
        match self.directory.recent_events(calendar, query).await {
            Ok(events) => {
                let inferred = most_frequent_timezone(&events);
                if inferred.is_none() {
                    info!(
                        "No timezone information found in {} recent events for {}",
                        events.len(),
                        calendar
                    );
                }
                inferred
            }
            Err(e) => {
                warn!("Error inferring timezone for {}: {}", calendar, e);
                None
            }
        }
    }
}

/// The most frequent valid timezone annotation among `events`.
///
/// Each event contributes its start annotation, or its end annotation when the
/// start has none. Names that are not valid IANA zones are ignored. On a tie,
/// the zone encountered first wins.
pub fn most_frequent_timezone(events: &[EventTimezones]) -> Option<TimeZoneId> {
    let mut counts: Vec<(TimeZoneId, usize)> = Vec::new();

    for name in events.iter().filter_map(EventTimezones::effective) {
        let Some(tz) = TimeZoneId::parse(name) else {
            warn!("Ignoring unknown event timezone {:?}", name);
            continue;
        };
        match counts.iter_mut().find(|(seen, _)| *seen == tz) {
            Some((_, count)) => *count += 1,
            None => counts.push((tz, 1)),
        }
    }

    // Strictly greater: an equal count never displaces an earlier zone
    let mut best: Option<(TimeZoneId, usize)> = None;
    for (tz, count) in counts {
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((tz, count));
        }
    }
    best.map(|(tz, _)| tz)
}
