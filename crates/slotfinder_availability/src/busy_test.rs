#[cfg(test)]
mod tests {
    use crate::busy::BusyTimeIndex;
    use chrono::{DateTime, TimeZone, Utc};
    use slotfinder_common::{BusyInterval, CalendarRef, FreeBusyMap};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 9, hour, minute, 0).unwrap()
    }

    fn index() -> BusyTimeIndex {
        let mut free_busy = FreeBusyMap::new();
        // Deliberately unsorted
        free_busy.insert(
            CalendarRef::from("a@x.com"),
            vec![
                BusyInterval::new(at(14, 0), at(15, 0)),
                BusyInterval::new(at(9, 0), at(9, 30)),
                // Inverted, must be ignored
                BusyInterval::new(at(12, 0), at(11, 0)),
            ],
        );
        free_busy.insert(
            CalendarRef::from("b@x.com"),
            vec![BusyInterval::new(at(10, 0), at(11, 0))],
        );
        BusyTimeIndex::from_free_busy(free_busy)
    }

    #[test]
    fn test_is_free_uses_half_open_overlap() {
        let index = index();
        let a = CalendarRef::from("a@x.com");

        assert!(!index.is_free(&a, at(9, 0), at(9, 30)));
        assert!(!index.is_free(&a, at(8, 45), at(9, 15)));
        assert!(!index.is_free(&a, at(14, 30), at(16, 0)));
        assert!(index.is_free(&a, at(8, 30), at(9, 0)));
        assert!(index.is_free(&a, at(9, 30), at(10, 0)));
        assert!(index.is_free(&a, at(11, 15), at(11, 45)));
    }

    #[test]
    fn test_group_free_requires_every_calendar() {
        let index = index();
        let group = [CalendarRef::from("a@x.com"), CalendarRef::from("b@x.com")];

        assert!(index.is_free(&group[0], at(10, 0), at(10, 30)));
        assert!(!index.is_free_for_all(&group, at(10, 0), at(10, 30)));
        assert!(index.is_free_for_all(&group, at(11, 0), at(11, 30)));
    }

    #[test]
    fn test_unknown_calendar_is_free() {
        let index = index();
        let stranger = CalendarRef::from("nobody@x.com");
        assert!(index.is_free(&stranger, at(0, 0), at(23, 0)));
        assert!(index.intervals(&stranger).is_empty());
    }

    #[test]
    fn test_empty_intervals_are_dropped() {
        let index = index();
        assert_eq!(index.len(), 3);
        assert_eq!(index.intervals(&CalendarRef::from("a@x.com")).len(), 2);
        assert!(index
            .conflict(&CalendarRef::from("a@x.com"), at(11, 15), at(11, 45))
            .is_none());
    }
}
