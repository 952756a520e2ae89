//! Fixed-step slot scanning within one day's window.

use chrono::{DateTime, Duration, Utc};
use slotfinder_common::CalendarRef;
use tracing::debug;

use crate::busy::BusyTimeIndex;
use crate::models::Slot;
use crate::window::UtcWindow;

/// Walks candidate start times through a window at a fixed step.
///
/// The position advances by one step after every candidate, accepted or not,
/// so overlapping and adjacent busy blocks need no special handling.
#[derive(Debug, Clone, Copy)]
pub struct SlotScanner {
    step: Duration,
}

impl Default for SlotScanner {
    fn default() -> Self {
        Self {
            step: Duration::minutes(30),
        }
    }
}

impl SlotScanner {
    /// `step_minutes` must be positive; zero is treated as one minute.
    pub fn new(step_minutes: u32) -> Self {
        Self {
            step: Duration::minutes(i64::from(step_minutes.max(1))),
        }
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Rounds `instant` up to the next step boundary (unchanged if already on one).
    ///
    /// Boundaries are counted from the Unix epoch, which coincides with UTC
    /// midnight for any step dividing a day.
    pub fn align_up(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        let step_secs = self.step.num_seconds();
        let secs = instant.timestamp();
        let rem = secs.rem_euclid(step_secs);
        if rem == 0 && instant.timestamp_subsec_nanos() == 0 {
            return instant;
        }
        DateTime::from_timestamp(secs - rem + step_secs, 0).unwrap_or(instant)
    }

    /// Free slots of length `duration` in `window`, earliest first.
    ///
    /// * `not_before` - on the current date, the present instant; scanning starts
    ///   at the first step boundary at or after it.
    /// * `limit` - stop once this many slots have been accepted.
    pub fn scan_day(
        &self,
        window: UtcWindow,
        duration: Duration,
        busy: &BusyTimeIndex,
        calendars: &[CalendarRef],
        not_before: Option<DateTime<Utc>>,
        limit: usize,
    ) -> Vec<Slot> {
        let mut accepted = Vec::new();
        let mut position = match not_before {
            Some(now) => window.start.max(self.align_up(now)),
            None => window.start,
        };

        while accepted.len() < limit {
            let Some(end) = position.checked_add_signed(duration) else {
                break;
            };
            if end > window.end {
                break;
            }
            let candidate = Slot { start: position, end };
            let conflict = calendars.iter().find_map(|calendar| {
                busy.conflict(calendar, candidate.start, candidate.end)
                    .map(|interval| (calendar, interval))
            });
            match conflict {
                None => accepted.push(candidate),
                Some((calendar, interval)) => debug!(
                    "Rejecting slot {}-{} due to busy block {}-{} in {}",
                    candidate.start, candidate.end, interval.start, interval.end, calendar
                ),
            }
            match position.checked_add_signed(self.step) {
                Some(next) => position = next,
                None => break,
            }
        }

        accepted
    }
}
