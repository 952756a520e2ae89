//! Logging utilities for the slotfinder workspace.
//!
//! Every crate logs through `tracing`; binaries call one of the `init`
//! functions here once at start-up to install the subscriber.

use slotfinder_config::LoggingConfig;
use std::str::FromStr;
use tracing::{error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber at INFO level.
///
/// # Examples
///
/// ```
/// use slotfinder_common::logging;
///
/// // Initialize with default log level (INFO)
/// logging::init();
///
/// // A second call is a no-op
/// logging::init_with_level(tracing::Level::DEBUG);
/// ```
pub fn init() {
    init_with_level(Level::INFO);
}

/// Initialize the tracing subscriber with the level named in the logging config.
///
/// Unknown level names fall back to INFO.
pub fn init_from_config(config: &LoggingConfig) {
    match Level::from_str(&config.level) {
        Ok(level) => init_with_level(level),
        Err(_) => {
            init_with_level(Level::INFO);
            warn!("Unknown log level {:?}, using INFO", config.level);
        }
    }
}

/// Initialize the tracing subscriber with a specific log level.
///
/// `RUST_LOG` directives are honoured; the level given here applies to the
/// slotfinder crates on top of them.
pub fn init_with_level(level: Level) {
    let mut filter = EnvFilter::from_default_env();
    for target in [
        "slotfinder_availability",
        "slotfinder_common",
        "slotfinder_config",
        "slotfinder_cli",
    ] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    // try_init: a global default subscriber may already be set (tests, embedding apps)
    let result = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true)
                .with_thread_names(true),
        )
        .with(filter)
        .try_init();

    if result.is_ok() {
        info!("Logging initialized at level: {}", level);
    }
}

/// Log a result, with different messages for success and error cases.
///
/// Returns the original result so the call can sit inside a `?` chain.
pub fn log_result<T, E: std::fmt::Display>(
    result: Result<T, E>,
    success_message: &str,
    error_context: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => info!("{}", success_message),
        Err(e) => error!("{}: {}", error_context, e),
    }
    result
}
