//! Property tests for the week-boundary resolver.

use chrono::{Duration, TimeZone, Utc};
use habitd::week::week_containing;
use proptest::prelude::*;

// 2000-01-01 .. 2100-01-01, seconds.
const EPOCH_RANGE: std::ops::Range<i64> = 946_684_800..4_102_444_800;

proptest! {
    #[test]
    fn every_instant_falls_inside_its_own_week(secs in EPOCH_RANGE) {
        let t = Utc.timestamp_opt(secs, 0).unwrap();
        let week = week_containing(t);
        prop_assert!(week.contains(t));
        prop_assert_eq!(week.end - week.start, Duration::days(7));
    }

    #[test]
    fn instants_in_the_same_week_resolve_identically(
        secs in EPOCH_RANGE,
        offset_secs in 0i64..7 * 86_400,
    ) {
        let t1 = Utc.timestamp_opt(secs, 0).unwrap();
        let week = week_containing(t1);
        let t2 = week.start + Duration::seconds(offset_secs);
        prop_assert_eq!(week_containing(t2), week);
    }

    #[test]
    fn weeks_tile_the_timeline_without_gaps_or_overlap(secs in EPOCH_RANGE) {
        let t = Utc.timestamp_opt(secs, 0).unwrap();
        let week = week_containing(t);
        let previous = week_containing(week.start - Duration::seconds(1));

        // Adjacent weeks share a boundary; the boundary instant belongs
        // only to the later week.
        prop_assert_eq!(previous.end, week.start);
        prop_assert!(!previous.contains(week.start));
        prop_assert!(week.contains(week.start));
    }
}
