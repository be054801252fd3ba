//! Calendar-day helpers shared by the store, statistics and backup modules.
//!
//! Days are `chrono::NaiveDate` values; the canonical text form everywhere
//! (storage keys, backup files, CLI arguments) is zero-padded `YYYY-MM-DD`.
//! `NaiveDate` ordering equals lexicographic ordering of that fixed-width
//! form, which the comparison helpers rely on.

use chrono::{Local, NaiveDate, NaiveTime};

use crate::error::ValidationError;

/// Canonical day format, `YYYY-MM-DD`.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Monthly bucket format, `YYYY-MM`.
pub const MONTH_FORMAT: &str = "%Y-%m";

const MS_PER_DAY: i64 = 86_400_000;

/// A sampled "now": the local calendar date plus the epoch-millisecond
/// instant. Mutating store operations take one of these instead of reading
/// the clock themselves, so tests can pin time to arbitrary moments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    /// The local calendar date at the sampled instant.
    pub date: NaiveDate,
    /// Epoch milliseconds at the sampled instant.
    pub epoch_ms: i64,
}

impl Moment {
    pub fn new(date: NaiveDate, epoch_ms: i64) -> Self {
        Self { date, epoch_ms }
    }

    /// Samples the host clock once, in local time.
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            date: now.date_naive(),
            epoch_ms: now.timestamp_millis(),
        }
    }
}

/// Renders a day as zero-padded `YYYY-MM-DD`.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Parses a strict `YYYY-MM-DD` string into a day.
///
/// Rejects anything that is not exactly ten characters of zero-padded
/// digits and dashes, and anything that names no real calendar day
/// (`2025-02-30`). This is the single gate for date keys from storage,
/// backup files and CLI input.
pub fn parse_day(value: &str) -> Result<NaiveDate, ValidationError> {
    if !is_day_shape(value) {
        return Err(ValidationError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, DAY_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

/// Parses a strict `YYYY-MM` string into the first day of that month.
pub fn parse_month(value: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 7
        && bytes[..4].iter().all(|b| b.is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(|b| b.is_ascii_digit());
    if !shaped {
        return Err(ValidationError::InvalidMonth(value.to_string()));
    }
    NaiveDate::parse_from_str(&format!("{value}-01"), DAY_FORMAT)
        .map_err(|_| ValidationError::InvalidMonth(value.to_string()))
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

/// Whether `day` falls strictly before `reference`.
pub fn is_before(day: NaiveDate, reference: NaiveDate) -> bool {
    day < reference
}

/// Signed whole days from `b` to `a` (`a - b`).
pub fn day_difference(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days()
}

/// Monthly bucket key (`YYYY-MM`) for a day.
pub fn month_key(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

/// How many whole days after `date` a check-in performed at `timestamp_ms`
/// happened, measuring from the day's UTC midnight. Shown in the makeup
/// log as the backfill delay.
pub fn delay_days(timestamp_ms: i64, date: NaiveDate) -> i64 {
    let midnight_ms = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis();
    (timestamp_ms - midnight_ms).div_euclid(MS_PER_DAY)
}

fn is_day_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes[..4].iter().all(|b| b.is_ascii_digit())
        && bytes[4] == b'-'
        && bytes[5..7].iter().all(|b| b.is_ascii_digit())
        && bytes[7] == b'-'
        && bytes[8..10].iter().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        parse_day(s).unwrap()
    }

    #[test]
    fn format_is_zero_padded() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_day(d), "2025-03-07");
    }

    #[test]
    fn parse_accepts_canonical_form_only() {
        assert_eq!(day("2025-01-05"), NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
        assert!(parse_day("2025-1-5").is_err());
        assert!(parse_day("2025/01/05").is_err());
        assert!(parse_day("20250105").is_err());
        assert!(parse_day("2025-01-05 ").is_err());
        assert!(parse_day("not-a-date").is_err());
    }

    #[test]
    fn parse_rejects_impossible_days() {
        assert!(parse_day("2025-02-30").is_err());
        assert!(parse_day("2025-13-01").is_err());
        assert!(parse_day("2025-00-10").is_err());
    }

    #[test]
    fn parse_month_strictness() {
        assert_eq!(parse_month("2025-02").unwrap(), day("2025-02-01"));
        assert!(parse_month("2025-2").is_err());
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("2025-02-01").is_err());
    }

    #[test]
    fn comparisons_follow_calendar_order() {
        assert!(is_before(day("2025-01-04"), day("2025-01-05")));
        assert!(!is_before(day("2025-01-05"), day("2025-01-05")));
        assert!(is_same_day(day("2025-01-05"), day("2025-01-05")));
    }

    #[test]
    fn day_difference_is_signed_whole_days() {
        assert_eq!(day_difference(day("2025-01-05"), day("2025-01-04")), 1);
        assert_eq!(day_difference(day("2025-01-04"), day("2025-01-05")), -1);
        assert_eq!(day_difference(day("2025-03-01"), day("2025-02-28")), 1);
        assert_eq!(day_difference(day("2024-03-01"), day("2024-02-28")), 2);
    }

    #[test]
    fn month_keys() {
        assert_eq!(month_key(day("2025-01-31")), "2025-01");
        assert_eq!(month_key(day("2025-02-01")), "2025-02");
    }

    #[test]
    fn delay_days_floors_partial_days() {
        let base = day("2025-01-01")
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();
        assert_eq!(delay_days(base, day("2025-01-01")), 0);

        // Two days and ten hours later still counts as two days late.
        let ts = base + 2 * MS_PER_DAY + 10 * 3_600_000;
        assert_eq!(delay_days(ts, day("2025-01-01")), 2);
    }
}
