// --- File: crates/slotfinder_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Collaborator error handling
pub mod logging; // Logging utilities
pub mod services; // Collaborator abstractions

// Re-export error types and utilities for easier access
pub use error::{invalid_response, not_found, transport_error, DirectoryError};

// Re-export logging utilities for easier access
pub use logging::{init, init_from_config, init_with_level, log_result};

pub use services::{
    BusyInterval, CalendarDirectory, CalendarRef, EventTimezones, FreeBusyMap, RecentEventsQuery,
    PRIMARY_CALENDAR,
};

// This crate provides the pieces shared between the availability engine and its callers:
// the calendar collaborator seam, its error type, and logging setup.
