//! Pure statistics over check-in snapshots.
//!
//! Everything here is a function of a `(records, makeups)` snapshot and an
//! optional reference day supplied by the caller. Nothing is cached and no
//! state is held, so callers can recompute after every mutation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::date;
use crate::store::{CheckInMap, MakeupRecord};

/// Aggregate counters over the whole history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverallStats {
    /// Checked-in days of any kind.
    pub total_days: u32,
    /// Same-day check-ins.
    pub normal_days: u32,
    /// Backdated check-ins.
    pub makeup_days: u32,
    /// Longest run of consecutive checked-in days anywhere in history.
    pub max_streak: u32,
}

/// Per-month counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyStats {
    pub total: u32,
    pub normal: u32,
    pub makeup: u32,
}

/// One row of the makeup audit view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MakeupLogEntry {
    /// The backdated day that was filled in.
    pub date: NaiveDate,
    /// The day the makeup was performed.
    pub original_date: NaiveDate,
    /// Epoch milliseconds of the makeup action.
    pub timestamp: i64,
    /// Whole days between the missed day and the makeup action.
    pub delay_days: i64,
}

/// Computes the overall counters and the maximum streak.
///
/// The maximum streak walks days in ascending calendar order and extends
/// the current run only when consecutive checked-in days differ by exactly
/// one day; any other gap starts a new run.
///
/// # Arguments
/// * `records` - the day -> record snapshot (sorted by day)
///
/// # Returns
/// Totals plus the longest streak found anywhere in the history.
pub fn overall_stats(records: &CheckInMap) -> OverallStats {
    let mut stats = OverallStats::default();
    let mut previous: Option<NaiveDate> = None;
    let mut run: u32 = 0;

    for (day, record) in records {
        if !record.checked_in {
            continue;
        }
        stats.total_days += 1;
        if record.is_manual {
            stats.makeup_days += 1;
        } else {
            stats.normal_days += 1;
        }

        run = match previous {
            Some(prev) if date::day_difference(*day, prev) == 1 => run + 1,
            _ => 1,
        };
        stats.max_streak = stats.max_streak.max(run);
        previous = Some(*day);
    }

    stats
}

/// Computes the streak ending today.
///
/// Unlike [`overall_stats`], this walks backwards starting from `today`
/// and stops at the first missing day; the two directions are kept
/// deliberately distinct because they answer different questions.
///
/// # Arguments
/// * `records` - the day -> record snapshot
/// * `today` - the caller's reference day
///
/// # Returns
/// 0 when `today` itself is not checked in, otherwise the run length.
pub fn current_streak(records: &CheckInMap, today: NaiveDate) -> u32 {
    if !checked(records, today) {
        return 0;
    }
    let mut streak = 1;
    let mut cursor = today;
    while let Some(previous) = cursor.pred_opt() {
        if !checked(records, previous) {
            break;
        }
        streak += 1;
        cursor = previous;
    }
    streak
}

/// Groups check-ins into `YYYY-MM` buckets derived from each record's own
/// day, sorted ascending by month.
pub fn monthly_stats(records: &CheckInMap) -> BTreeMap<String, MonthlyStats> {
    let mut months: BTreeMap<String, MonthlyStats> = BTreeMap::new();
    for (day, record) in records {
        if !record.checked_in {
            continue;
        }
        let entry = months.entry(date::month_key(*day)).or_default();
        entry.total += 1;
        if record.is_manual {
            entry.makeup += 1;
        } else {
            entry.normal += 1;
        }
    }
    months
}

/// Check-ins inside the reference day's month. "This month" is always
/// relative to the caller's reference, never an implicit now, so calendar
/// navigation and statistics agree.
pub fn month_total(records: &CheckInMap, reference: NaiveDate) -> u32 {
    let key = date::month_key(reference);
    records
        .iter()
        .filter(|(day, record)| record.checked_in && date::month_key(**day) == key)
        .count() as u32
}

/// Audit view of the makeup log, most recent action first.
pub fn makeup_log(makeups: &[MakeupRecord]) -> Vec<MakeupLogEntry> {
    let mut entries: Vec<MakeupLogEntry> = makeups
        .iter()
        .map(|m| MakeupLogEntry {
            date: m.date,
            original_date: m.original_date,
            timestamp: m.timestamp,
            delay_days: date::delay_days(m.timestamp, m.date),
        })
        .collect();
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    entries
}

fn checked(records: &CheckInMap, day: NaiveDate) -> bool {
    records.get(&day).is_some_and(|r| r.checked_in)
}
