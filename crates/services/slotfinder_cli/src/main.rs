// File: services/slotfinder_cli/src/main.rs
mod report;
mod snapshot;

use report::{summary, Report};
use slotfinder_availability::{AvailabilityEngine, Clock, SystemClock, TimeZoneId};
use slotfinder_common::logging;
use slotfinder_config::load_config;
use snapshot::{RequestFile, SnapshotDirectory};
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

const USAGE: &str = "usage: slotfinder-cli <snapshot.json> <request.json>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    logging::init_from_config(&config.logging);

    let mut args = std::env::args().skip(1);
    let (Some(snapshot_path), Some(request_path)) = (args.next(), args.next()) else {
        eprintln!("{}", USAGE);
        return Err(USAGE.into());
    };

    let directory = logging::log_result(
        SnapshotDirectory::load(&PathBuf::from(&snapshot_path)),
        "Snapshot loaded",
        "Failed to load snapshot",
    )?;
    let request_file = logging::log_result(
        RequestFile::load(&PathBuf::from(&request_path)),
        "Request loaded",
        "Failed to load request",
    )?;

    let today = SystemClock.now().date_naive();
    let request = request_file.into_request(&config.scheduler, today)?;

    let engine = AvailabilityEngine::from_config(Arc::new(directory), &config.scheduler);
    let outcome = logging::log_result(
        engine.find_meeting_slots(&request).await,
        "Slot search finished",
        "Slot search failed",
    )?;

    let organizer_timezone = outcome
        .timezone_of(&request.organizer)
        .unwrap_or_else(TimeZoneId::utc);
    info!(
        "Organizer {} resolved to {}",
        request.organizer, organizer_timezone
    );

    let report = Report::new(&outcome, organizer_timezone);
    println!("{}", serde_json::to_string_pretty(&report)?);
    eprintln!(
        "{}",
        summary(&outcome, organizer_timezone, request.duration.num_minutes())
    );
    Ok(())
}
