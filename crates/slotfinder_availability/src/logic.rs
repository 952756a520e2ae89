// --- File: crates/slotfinder_availability/src/logic.rs ---
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use slotfinder_common::{CalendarDirectory, CalendarRef, DirectoryError};
use slotfinder_config::SchedulerConfig;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::busy::BusyTimeIndex;
use crate::models::{
    AvailabilityOutcome, AvailabilityRequest, ResolvedTimezone, Slot, TimeZoneId, TimezoneMode,
    TimezoneSource, WeekdayFilter,
};
use crate::scanner::SlotScanner;
use crate::timezone::TimezoneResolver;
use crate::window::{preferred_window, working_window, UtcWindow};
use crate::workweek::WorkWeekPolicy;

// --- Error Handling ---
use thiserror::Error;
#[derive(Error, Debug)]
pub enum AvailabilityError {
    #[error("Invalid availability request: {0}")]
    Configuration(String),
    #[error("Free/busy query failed: {0}")]
    FreeBusyUnavailable(#[source] DirectoryError),
}

// --- Clock ---

/// Source of the current instant; injected so searches are reproducible.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// --- Engine ---

/// One date of the search with its computed window, if any.
#[derive(Debug, Clone, Copy)]
struct DayPlan {
    date: NaiveDate,
    window: Option<UtcWindow>,
}

/// Finds meeting slots that are free for every participant.
///
/// Stateless between calls: each [`find_meeting_slots`](Self::find_meeting_slots)
/// resolves its own timezones and builds its own busy index.
pub struct AvailabilityEngine {
    directory: Arc<dyn CalendarDirectory>,
    clock: Arc<dyn Clock>,
    policy: WorkWeekPolicy,
    scanner: SlotScanner,
    lookback_days: u32,
    lookback_max_events: usize,
}

impl AvailabilityEngine {
    /// Engine with default scheduler settings and the system clock.
    pub fn new(directory: Arc<dyn CalendarDirectory>) -> Self {
        Self::from_config(directory, &SchedulerConfig::default())
    }

    pub fn from_config(directory: Arc<dyn CalendarDirectory>, config: &SchedulerConfig) -> Self {
        Self {
            directory,
            clock: Arc::new(SystemClock),
            policy: WorkWeekPolicy::from_config(config),
            scanner: SlotScanner::new(config.step_minutes),
            lookback_days: config.timezone_lookback_days,
            lookback_max_events: config.timezone_lookback_max_events,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: WorkWeekPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Finds up to `max_suggestions` mutually free slots, earliest first.
    ///
    /// # Errors
    ///
    /// * [`AvailabilityError::Configuration`] for an invalid request, before any
    ///   collaborator is called.
    /// * [`AvailabilityError::FreeBusyUnavailable`] when the free/busy query fails.
    ///
    /// Timezone lookup failures are not errors; the affected calendar is treated as UTC.
    pub async fn find_meeting_slots(
        &self,
        request: &AvailabilityRequest,
    ) -> Result<AvailabilityOutcome, AvailabilityError> {
        request
            .validate()
            .map_err(AvailabilityError::Configuration)?;

        let now = self.clock.now();
        let today = now.date_naive();
        let calendars = request.participants();

        info!(
            "Finding {}-min meeting slots for {} attendees from {} to {}",
            request.duration.num_minutes(),
            request.attendees.len(),
            request.window.date_start,
            request.window.date_end
        );

        let resolved = self.resolve_timezones(request, &calendars, now).await;
        let plan = self.plan_days(request, &resolved);

        let (time_min, time_max) = query_bounds(request, &plan);
        let free_busy = self
            .directory
            .query_free_busy(&calendars, time_min, time_max)
            .await
            .map_err(|e| {
                error!("Free/busy query for {} calendars failed: {}", calendars.len(), e);
                AvailabilityError::FreeBusyUnavailable(e)
            })?;
        let busy = BusyTimeIndex::from_free_busy(free_busy);
        debug!("Loaded {} busy intervals", busy.len());

        let mut slots: Vec<Slot> = Vec::new();
        let mut days_searched = 0u32;
        for day in &plan {
            if slots.len() >= request.max_suggestions {
                break;
            }
            days_searched += 1;

            let Some(window) = day.window else {
                continue;
            };
            let not_before = (day.date == today).then_some(now);
            let found = self.scanner.scan_day(
                window,
                request.duration,
                &busy,
                &calendars,
                not_before,
                request.max_suggestions - slots.len(),
            );
            debug!("{}: {} free slots", day.date, found.len());
            slots.extend(found);
        }

        if slots.is_empty() {
            info!("No mutual free slots found in {} days", days_searched);
        } else {
            info!("Found {} slots in {} days", slots.len(), days_searched);
        }

        Ok(AvailabilityOutcome {
            slots,
            resolved_timezones: resolved,
            days_searched,
        })
    }

    async fn resolve_timezones(
        &self,
        request: &AvailabilityRequest,
        calendars: &[CalendarRef],
        now: DateTime<Utc>,
    ) -> Vec<ResolvedTimezone> {
        match request.timezone_mode {
            TimezoneMode::Fixed(timezone) => calendars
                .iter()
                .map(|calendar| ResolvedTimezone {
                    calendar: calendar.clone(),
                    timezone,
                    source: TimezoneSource::Fixed,
                })
                .collect(),
            TimezoneMode::Detect => {
                TimezoneResolver::new(
                    self.directory.as_ref(),
                    now,
                    self.lookback_days,
                    self.lookback_max_events,
                )
                .resolve_all(calendars)
                .await
            }
        }
    }

    /// Applies the weekday filter and computes the window for every date.
    fn plan_days(&self, request: &AvailabilityRequest, resolved: &[ResolvedTimezone]) -> Vec<DayPlan> {
        let window = &request.window;
        let organizer_tz = resolved
            .iter()
            .find(|r| r.calendar == request.organizer)
            .map(|r| r.timezone)
            .unwrap_or_else(TimeZoneId::utc);

        window
            .dates()
            .map(|date| {
                let allowed = match request.weekdays {
                    WeekdayFilter::WorkWeekAware => self
                        .policy
                        .is_working_day_for_all(date, resolved.iter().map(|r| &r.timezone)),
                    WeekdayFilter::Allowed(days) => days.contains(date.weekday()),
                    WeekdayFilter::Unrestricted => true,
                };
                if !allowed {
                    debug!("{}: not an allowed day", date);
                    return DayPlan { date, window: None };
                }

                let day_window = match &window.preferred {
                    Some(preferred) => preferred_window(date, organizer_tz, preferred, window.hours),
                    None => {
                        let policy = matches!(request.weekdays, WeekdayFilter::WorkWeekAware)
                            .then_some(&self.policy);
                        working_window(date, resolved, window.hours, policy)
                    }
                };
                if day_window.is_none() {
                    info!("No working hours overlap on {}", date);
                }
                DayPlan {
                    date,
                    window: day_window,
                }
            })
            .collect()
    }
}

/// Span for the free/busy query: the UTC dates of the range, widened to
/// cover any window that spills over a UTC day boundary.
fn query_bounds(request: &AvailabilityRequest, plan: &[DayPlan]) -> (DateTime<Utc>, DateTime<Utc>) {
    let mut time_min = request.window.date_start.and_time(NaiveTime::MIN).and_utc();
    let mut time_max = (request.window.date_end + Duration::days(1))
        .and_time(NaiveTime::MIN)
        .and_utc();
    for window in plan.iter().filter_map(|day| day.window) {
        time_min = time_min.min(window.start);
        time_max = time_max.max(window.end);
    }
    (time_min, time_max)
}
