// --- File: crates/slotfinder_config/src/models.rs ---

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_start_hour() -> u32 {
    7
}
fn default_end_hour() -> u32 {
    20
}
fn default_step_minutes() -> u32 {
    30
}
fn default_max_suggestions() -> usize {
    10
}
fn default_search_days() -> u32 {
    7
}
fn default_lookback_days() -> u32 {
    30
}
fn default_lookback_max_events() -> usize {
    50
}
fn default_organizer() -> String {
    "primary".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

// --- Scheduler Config ---
// Defaults applied to availability requests and timezone inference.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulerConfig {
    /// Local hour at which the working day opens for every attendee.
    #[serde(default = "default_start_hour")]
    pub default_start_hour: u32,
    /// Local hour at which the working day closes (exclusive, up to 24).
    #[serde(default = "default_end_hour")]
    pub default_end_hour: u32,
    /// Candidate step in minutes; must divide a day evenly.
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
    #[serde(default = "default_max_suggestions")]
    pub default_max_suggestions: usize,
    /// Length of the search range when a request gives no end date.
    #[serde(default = "default_search_days")]
    pub default_search_days: u32,
    #[serde(default = "default_lookback_days")]
    pub timezone_lookback_days: u32,
    #[serde(default = "default_lookback_max_events")]
    pub timezone_lookback_max_events: usize,
    /// Calendar of the person organizing the meeting.
    #[serde(default = "default_organizer")]
    pub organizer: String,
    /// Extra work-week entries: IANA timezone -> weekday indices (0=Mon .. 6=Sun).
    #[serde(default)]
    pub work_week_overrides: HashMap<String, Vec<u8>>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_start_hour: default_start_hour(),
            default_end_hour: default_end_hour(),
            step_minutes: default_step_minutes(),
            default_max_suggestions: default_max_suggestions(),
            default_search_days: default_search_days(),
            timezone_lookback_days: default_lookback_days(),
            timezone_lookback_max_events: default_lookback_max_events(),
            organizer: default_organizer(),
            work_week_overrides: HashMap::new(),
        }
    }
}

// --- Logging Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level for slotfinder crates: trace, debug, info, warn or error.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}
