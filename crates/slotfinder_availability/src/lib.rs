// --- File: crates/slotfinder_availability/src/lib.rs ---
// Declare modules within this crate
pub mod busy;
#[cfg(test)]
mod busy_test;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
pub mod models;
pub mod scanner;
#[cfg(test)]
mod test_support;
pub mod timezone;
pub mod window;
pub mod workweek;

pub use busy::BusyTimeIndex;
pub use logic::{AvailabilityEngine, AvailabilityError, Clock, SystemClock};
pub use models::{
    AvailabilityOutcome, AvailabilityRequest, AvailabilityRequestBuilder, PreferredWindow,
    ResolvedTimezone, SearchWindow, Slot, TimeZoneId, TimezoneMode, TimezoneSource,
    WeekdayFilter, WorkingHours,
};
pub use scanner::SlotScanner;
pub use timezone::TimezoneResolver;
pub use window::UtcWindow;
pub use workweek::{WorkWeek, WorkWeekPolicy};
