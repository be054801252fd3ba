//! Check-in command: same-day check-ins and two-phase makeup confirmation.

use daymark_core::{
    date, stats, CheckInOutcome, CheckInStore, MakeupOutcome, Moment, SqliteStorage,
};

pub fn run(date_arg: Option<String>, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = CheckInStore::load(SqliteStorage::open()?);
    let now = Moment::now();

    let target = match &date_arg {
        Some(raw) => date::parse_day(raw)?,
        None => now.date,
    };

    match store.check_in(target, now)? {
        CheckInOutcome::Recorded => {
            println!("Checked in for {}.", date::format_day(target));
            let streak = stats::current_streak(store.records(), now.date);
            println!("Current streak: {streak} day(s)");
        }
        CheckInOutcome::AlreadyCheckedIn => {
            println!("{} is already checked in.", date::format_day(target));
        }
        CheckInOutcome::FutureDate => {
            eprintln!(
                "cannot check in a future date: {}",
                date::format_day(target)
            );
            std::process::exit(1);
        }
        CheckInOutcome::MakeupRequired(pending) => {
            if !yes {
                println!(
                    "{} is a past day; checking it in counts as a makeup.",
                    date::format_day(pending.date())
                );
                println!("Makeups are flagged and listed in 'daymark stats makeups'.");
                println!("Makeup date: {}", date::format_day(pending.date()));
                println!("Performed on: {}", date::format_day(now.date));
                eprintln!("nothing written; re-run with --yes to confirm the makeup");
                std::process::exit(1);
            }
            match store.confirm_makeup(pending, now)? {
                MakeupOutcome::Confirmed => {
                    let delay = date::delay_days(now.epoch_ms, target);
                    println!(
                        "Makeup recorded for {} ({delay} day(s) late).",
                        date::format_day(target)
                    );
                }
                MakeupOutcome::AlreadyCheckedIn => {
                    println!(
                        "{} was checked in meanwhile; nothing changed.",
                        date::format_day(target)
                    );
                }
            }
        }
    }
    Ok(())
}
