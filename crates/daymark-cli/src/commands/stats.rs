//! Statistics commands over the check-in history.

use chrono::{DateTime, Local};
use clap::Subcommand;
use daymark_core::{stats, CheckInStore, Moment, SqliteStorage};
use serde::Serialize;

#[derive(Subcommand)]
pub enum StatsAction {
    /// All-time totals and the longest streak
    Overall,
    /// Per-month check-in counts
    Monthly,
    /// Current and longest streak
    Streak,
    /// Makeup audit log, most recent first
    Makeups,
}

#[derive(Serialize)]
struct StreakReport {
    current_streak: u32,
    max_streak: u32,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = CheckInStore::load(SqliteStorage::open()?);
    let now = Moment::now();

    match action {
        StatsAction::Overall => {
            let overall = stats::overall_stats(store.records());
            println!("{}", serde_json::to_string_pretty(&overall)?);
        }
        StatsAction::Monthly => {
            let monthly = stats::monthly_stats(store.records());
            println!("{}", serde_json::to_string_pretty(&monthly)?);
        }
        StatsAction::Streak => {
            let report = StreakReport {
                current_streak: stats::current_streak(store.records(), now.date),
                max_streak: stats::overall_stats(store.records()).max_streak,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatsAction::Makeups => {
            let log = stats::makeup_log(store.makeups());
            if log.is_empty() {
                println!("no makeup records");
            }
            for entry in log {
                println!(
                    "{}  made up on {} at {}  ({} day(s) late)",
                    entry.date,
                    entry.original_date,
                    format_clock(entry.timestamp),
                    entry.delay_days
                );
            }
        }
    }
    Ok(())
}

fn format_clock(epoch_ms: i64) -> String {
    DateTime::from_timestamp_millis(epoch_ms)
        .map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".into())
}
