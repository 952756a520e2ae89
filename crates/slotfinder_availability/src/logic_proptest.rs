#[cfg(test)]
mod tests {
    use crate::logic::AvailabilityEngine;
    use crate::models::{AvailabilityOutcome, AvailabilityRequest, TimeZoneId};
    use crate::test_support::{FixedClock, StaticDirectory};
    use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};
    use proptest::prelude::*;
    use slotfinder_common::CalendarRef;
    use slotfinder_config::SchedulerConfig;
    use std::sync::Arc;

    const ATTENDEES: [(&str, &str); 3] = [
        ("utc@x.com", "UTC"),
        ("ny@x.com", "America/New_York"),
        ("il@x.com", "Asia/Jerusalem"),
    ];

    fn base_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 7).unwrap()
    }

    // Busy block as (attendee index, day offset, start minute, length in minutes)
    fn busy_block() -> impl Strategy<Value = (usize, i64, i64, i64)> {
        (0..ATTENDEES.len(), 0..10i64, 0..1440i64, 15..240i64)
    }

    fn busy_interval(day_offset: i64, start_minute: i64, length: i64) -> (DateTime<Utc>, DateTime<Utc>) {
        let day = base_date() + Duration::days(day_offset);
        let start = Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0).unwrap())
            + Duration::minutes(start_minute);
        (start, start + Duration::minutes(length))
    }

    fn directory(blocks: &[(usize, i64, i64, i64)]) -> StaticDirectory {
        let mut directory = StaticDirectory::default().with_zone("primary", "Europe/Zurich");
        for (calendar, zone) in ATTENDEES {
            directory = directory.with_zone(calendar, zone);
        }
        for &(attendee, day, start, length) in blocks {
            let (start, end) = busy_interval(day, start, length);
            directory = directory.with_busy(ATTENDEES[attendee].0, start, end);
        }
        directory
    }

    fn run(engine: &AvailabilityEngine, request: &AvailabilityRequest) -> AvailabilityOutcome {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("Failed to build runtime")
            .block_on(engine.find_meeting_slots(request))
            .expect("search succeeds")
    }

    proptest! {
        #[test]
        fn test_slots_are_free_aligned_and_exact(
            start_offset in 0..7i64,
            span_days in 0..5i64,
            duration_minutes in prop::sample::select(vec![15i64, 30, 45, 60, 90]),
            start_hour in 0..12u32,
            end_hour in 13..=24u32,
            max_suggestions in 1..40usize,
            blocks in prop::collection::vec(busy_block(), 0..12),
        ) {
            let date_start = base_date() + Duration::days(start_offset);
            let request = AvailabilityRequest::builder(ATTENDEES.iter().map(|(c, _)| *c))
                .duration_minutes(duration_minutes)
                .date_start(date_start)
                .date_end(date_start + Duration::days(span_days))
                .hours(start_hour, end_hour)
                .max_suggestions(max_suggestions)
                .build(&SchedulerConfig::default(), date_start);
            let directory = directory(&blocks);
            let busy = directory.busy.clone();
            let engine = AvailabilityEngine::new(Arc::new(directory))
                .with_clock(Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap())));

            let outcome = run(&engine, &request);

            prop_assert!(outcome.slots.len() <= max_suggestions);
            prop_assert!(outcome.days_searched as i64 <= span_days + 1);
            for pair in outcome.slots.windows(2) {
                prop_assert!(pair[0].start < pair[1].start);
            }
            for slot in &outcome.slots {
                prop_assert_eq!(slot.duration(), Duration::minutes(duration_minutes));
                prop_assert_eq!(slot.start.timestamp() % (30 * 60), 0);
                for participant in request.participants() {
                    for interval in busy.get(&participant).into_iter().flatten() {
                        prop_assert!(
                            !(slot.start < interval.end && interval.start < slot.end),
                            "slot {:?} overlaps busy {:?} of {}",
                            slot, interval, participant
                        );
                    }
                }
            }
        }

        #[test]
        fn test_jerusalem_never_meets_on_its_weekend(
            start_offset in 0..7i64,
            span_days in 0..10i64,
            blocks in prop::collection::vec(busy_block(), 0..6),
        ) {
            let date_start = base_date() + Duration::days(start_offset);
            let request = AvailabilityRequest::builder(["il@x.com", "ny@x.com"])
                .date_start(date_start)
                .date_end(date_start + Duration::days(span_days))
                .max_suggestions(500)
                .build(&SchedulerConfig::default(), date_start);
            let engine = AvailabilityEngine::new(Arc::new(directory(&blocks)))
                .with_clock(Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap())));
            let jerusalem = TimeZoneId::parse("Asia/Jerusalem").unwrap();

            let outcome = run(&engine, &request);

            for slot in &outcome.slots {
                let (local_start, _) = slot.in_timezone(jerusalem);
                prop_assert!(!matches!(local_start.weekday(), Weekday::Fri | Weekday::Sat));
            }
        }

        #[test]
        fn test_search_is_idempotent(
            start_offset in 0..7i64,
            span_days in 0..4i64,
            blocks in prop::collection::vec(busy_block(), 0..8),
        ) {
            let date_start = base_date() + Duration::days(start_offset);
            let request = AvailabilityRequest::builder(["ny@x.com", "utc@x.com"])
                .organizer(CalendarRef::from("il@x.com"))
                .date_start(date_start)
                .date_end(date_start + Duration::days(span_days))
                .max_suggestions(25)
                .build(&SchedulerConfig::default(), date_start);
            let engine = AvailabilityEngine::new(Arc::new(directory(&blocks)))
                .with_clock(Arc::new(FixedClock(Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap())));

            prop_assert_eq!(run(&engine, &request), run(&engine, &request));
        }
    }
}
