//! Output formats: JSON for stdout, a short listing for people on stderr.

use chrono::{DateTime, Utc};
use serde::Serialize;
use slotfinder_availability::{AvailabilityOutcome, ResolvedTimezone, TimeZoneId};

#[derive(Debug, Serialize)]
pub struct SlotView {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Start in the organizer's timezone, RFC 3339 with offset
    pub local_start: String,
    pub local_end: String,
}

#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub organizer_timezone: TimeZoneId,
    pub slots: Vec<SlotView>,
    pub resolved_timezones: &'a [ResolvedTimezone],
    pub days_searched: u32,
}

impl<'a> Report<'a> {
    pub fn new(outcome: &'a AvailabilityOutcome, organizer_timezone: TimeZoneId) -> Self {
        let slots = outcome
            .slots
            .iter()
            .map(|slot| {
                let (local_start, local_end) = slot.in_timezone(organizer_timezone);
                SlotView {
                    start: slot.start,
                    end: slot.end,
                    local_start: local_start.to_rfc3339(),
                    local_end: local_end.to_rfc3339(),
                }
            })
            .collect();
        Self {
            organizer_timezone,
            slots,
            resolved_timezones: &outcome.resolved_timezones,
            days_searched: outcome.days_searched,
        }
    }
}

/// Human-readable listing of the outcome in the organizer's timezone.
pub fn summary(outcome: &AvailabilityOutcome, organizer_timezone: TimeZoneId, duration_minutes: i64) -> String {
    if outcome.slots.is_empty() {
        return format!(
            "No mutual free slots found in the next {} days.",
            outcome.days_searched
        );
    }

    let mut text = format!(
        "{} available {}-minute slots (times in {}):\n",
        outcome.slots.len(),
        duration_minutes,
        organizer_timezone
    );
    for (i, slot) in outcome.slots.iter().enumerate() {
        let (start, end) = slot.in_timezone(organizer_timezone);
        text.push_str(&format!(
            "  {:>2}. {}  {} - {}\n",
            i + 1,
            start.format("%a %Y-%m-%d"),
            start.format("%H:%M"),
            end.format("%H:%M")
        ));
    }
    text
}
