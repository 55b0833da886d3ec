//! Localized start-time parsing.
//!
//! Cards carry a year-less `day/month - hour:minute AM/PM` stamp expressed in
//! a fixed local offset (UTC+6:30, no DST). The year is inferred from "now":
//! a candidate more than [`YEAR_WINDOW_DAYS`] days in the past rolls forward
//! one year, more than that in the future rolls back one — which resolves the
//! December/January wraparound without a calendar context. The window check is
//! strict (exactly 200 days away keeps the current year), so boundary inputs
//! stay deterministic.

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, FixedOffset, TimeZone, Utc};
use regex::Regex;

/// Shift window for year inference, in days. Strictly-greater comparisons.
pub const YEAR_WINDOW_DAYS: i64 = 200;

// Leading label (e.g. "Start Time:") is free text, so the grammar is not
// anchored at the start.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2})/(\d{1,2})\s*-\s*(\d{1,2}):(\d{2})\s*(AM|PM)").expect("time grammar")
});

/// Parse a localized start-time token into a UTC instant.
///
/// `offset_minutes` is the fixed local offset east of UTC (390 for +6:30).
/// Returns `None` on a grammar miss, an out-of-range field, or a day that
/// does not exist in the inferred year; callers fall back to "now" rather
/// than aborting the record.
pub fn parse_start_time(
    raw: &str,
    offset_minutes: i32,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    let caps = TIME_RE.captures(raw)?;

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let hour12: u32 = caps[3].parse().ok()?;
    let minute: u32 = caps[4].parse().ok()?;

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }
    if !(1..=12).contains(&hour12) || minute > 59 {
        return None;
    }

    let mut hour24 = hour12 % 12;
    if &caps[5] == "PM" {
        hour24 += 12;
    }

    let offset = FixedOffset::east_opt(offset_minutes * 60)?;
    let year = now.with_timezone(&offset).year();

    let candidate = at_local(offset, year, month, day, hour24, minute)?;
    let delta = candidate.signed_duration_since(now);

    let resolved = if delta < -Duration::days(YEAR_WINDOW_DAYS) {
        at_local(offset, year + 1, month, day, hour24, minute)?
    } else if delta > Duration::days(YEAR_WINDOW_DAYS) {
        at_local(offset, year - 1, month, day, hour24, minute)?
    } else {
        candidate
    };

    Some(resolved)
}

fn at_local(
    offset: FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> Option<DateTime<Utc>> {
    offset
        .with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSET_MIN: i32 = 6 * 60 + 30;

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    #[test]
    fn parses_labelled_stamp_in_local_offset() {
        let now = utc("2024-03-01T00:00:00Z");
        let got = parse_start_time("Start Time: 4/7 - 8:30 PM", OFFSET_MIN, now).unwrap();
        // 2024-07-04 20:30 at +06:30 is 14:00 UTC.
        assert_eq!(got, utc("2024-07-04T14:00:00Z"));
    }

    #[test]
    fn am_noon_and_midnight_convert() {
        let now = utc("2024-03-01T00:00:00Z");
        let noon = parse_start_time("1/6 - 12:00 PM", OFFSET_MIN, now).unwrap();
        assert_eq!(noon, utc("2024-06-01T05:30:00Z"));
        let midnight = parse_start_time("1/6 - 12:05 AM", OFFSET_MIN, now).unwrap();
        assert_eq!(midnight, utc("2024-05-31T17:35:00Z"));
    }

    #[test]
    fn far_past_rolls_to_next_year() {
        let now = utc("2024-12-20T00:00:00Z");
        let got = parse_start_time("Start Time: 5/1 - 1:00 AM", OFFSET_MIN, now).unwrap();
        assert_eq!(got, utc("2025-01-04T18:30:00Z"));
    }

    #[test]
    fn far_future_rolls_to_previous_year() {
        let now = utc("2024-01-10T00:00:00Z");
        let got = parse_start_time("20/12 - 9:00 PM", OFFSET_MIN, now).unwrap();
        assert_eq!(got, utc("2023-12-20T14:30:00Z"));
    }

    #[test]
    fn exactly_two_hundred_days_keeps_current_year() {
        // 2024-01-01T00:00 local is exactly 200 days before this "now";
        // the strict comparison keeps the current year.
        let now = utc("2024-07-18T17:30:00Z");
        let got = parse_start_time("1/1 - 12:00 AM", OFFSET_MIN, now).unwrap();
        assert_eq!(got, utc("2023-12-31T17:30:00Z"));
    }

    #[test]
    fn range_violations_miss() {
        let now = utc("2024-03-01T00:00:00Z");
        for raw in [
            "4/13 - 8:30 PM",  // month 13
            "0/7 - 8:30 PM",   // day 0
            "32/7 - 8:30 PM",  // day 32
            "4/7 - 0:30 PM",   // hour 0
            "4/7 - 13:30 PM",  // hour 13
            "4/7 - 8:60 PM",   // minute 60
            "no stamp here",
            "",
        ] {
            assert!(parse_start_time(raw, OFFSET_MIN, now).is_none(), "{raw:?}");
        }
    }

    #[test]
    fn nonexistent_day_in_inferred_year_misses() {
        // 2025 is not a leap year, so Feb 29 cannot resolve.
        let now = utc("2025-03-01T00:00:00Z");
        assert!(parse_start_time("29/2 - 1:00 PM", OFFSET_MIN, now).is_none());
    }
}
