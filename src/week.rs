//! Week-boundary arithmetic for completion accounting.
//!
//! One fixed convention everywhere: a week starts **Sunday 00:00:00 UTC**
//! and covers the half-open interval `[start, start + 7 days)`. Every
//! instant belongs to exactly one week; an instant exactly on a boundary
//! belongs to the week that starts there.

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc, Weekday};

/// First day of the week. Fixed — never inferred per goal or per caller.
pub const WEEK_STARTS_ON: Weekday = Weekday::Sun;

/// The current-week interval `[start, end)` used to scope quota checks
/// and summary queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekBounds {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl WeekBounds {
    /// Whether `instant` falls inside this week (start inclusive, end exclusive).
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Lower bound as RFC 3339, for `created_at >= ?` range binds.
    pub fn start_rfc3339(&self) -> String {
        self.start.to_rfc3339()
    }

    /// Upper bound as RFC 3339, for `created_at < ?` range binds.
    pub fn end_rfc3339(&self) -> String {
        self.end.to_rfc3339()
    }
}

/// Resolve the week containing `now`. Pure — repeated calls within the same
/// week return identical bounds.
pub fn week_containing(now: DateTime<Utc>) -> WeekBounds {
    let days_into_week = now.weekday().days_since(WEEK_STARTS_ON) as i64;
    let start_date = now.date_naive() - Duration::days(days_into_week);
    let start = start_date.and_time(NaiveTime::MIN).and_utc();
    WeekBounds {
        start,
        end: start + Duration::days(7),
    }
}

/// Resolve the week containing the current server time.
pub fn current_week() -> WeekBounds {
    week_containing(Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn week_starts_on_sunday_midnight() {
        // 2024-09-11 is a Wednesday; its week starts Sunday 2024-09-08.
        let bounds = week_containing(utc(2024, 9, 11, 15, 30, 0));
        assert_eq!(bounds.start, utc(2024, 9, 8, 0, 0, 0));
        assert_eq!(bounds.end, utc(2024, 9, 15, 0, 0, 0));
    }

    #[test]
    fn stable_within_the_same_week() {
        let a = week_containing(utc(2024, 9, 8, 0, 0, 0));
        let b = week_containing(utc(2024, 9, 14, 23, 59, 59));
        assert_eq!(a, b);
    }

    #[test]
    fn boundary_instant_belongs_to_exactly_one_week() {
        let boundary = utc(2024, 9, 15, 0, 0, 0); // Sunday midnight
        let before = week_containing(utc(2024, 9, 14, 12, 0, 0));
        let after = week_containing(boundary);

        assert!(!before.contains(boundary));
        assert!(after.contains(boundary));
        assert_eq!(after.start, boundary);
    }

    #[test]
    fn sunday_is_the_first_day_of_its_own_week() {
        let sunday_noon = utc(2024, 9, 8, 12, 0, 0);
        let bounds = week_containing(sunday_noon);
        assert_eq!(bounds.start, utc(2024, 9, 8, 0, 0, 0));
        assert!(bounds.contains(sunday_noon));
    }

    #[test]
    fn rfc3339_bounds_order_lexicographically() {
        let bounds = week_containing(utc(2024, 9, 11, 9, 0, 0));
        // Range binds compare as strings in SQL; RFC 3339 UTC keeps that sound.
        assert!(bounds.start_rfc3339() < bounds.end_rfc3339());
        let inside = utc(2024, 9, 11, 9, 0, 0).to_rfc3339();
        assert!(bounds.start_rfc3339() <= inside && inside < bounds.end_rfc3339());
    }
}
