//! Month calendar view: day grid with check-in markers plus header stats.

use chrono::{Datelike, NaiveDate};
use daymark_core::{date, stats, CheckInStore, Config, Moment, SqliteStorage};

const CELL_WIDTH: usize = 5;

pub fn run(month: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let store = CheckInStore::load(SqliteStorage::open()?);
    let config = Config::load_or_default();
    let now = Moment::now();

    let first = match &month {
        Some(raw) => date::parse_month(raw)?,
        None => now.date.with_day(1).unwrap_or(now.date),
    };

    render_grid(&store, &config, first, now.date);
    render_summary(&store, &config, first, now.date);
    Ok(())
}

fn render_grid(
    store: &CheckInStore<SqliteStorage>,
    config: &Config,
    first: NaiveDate,
    today: NaiveDate,
) {
    let width = CELL_WIDTH * 7;
    println!("{:^width$}", first.format("%B %Y").to_string());
    println!("{:^width$}", format!("today: {}", date::format_day(today)));
    println!();

    let labels = if config.week_starts_monday() {
        ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
    } else {
        ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"]
    };
    let header: String = labels.iter().map(|l| format!(" {l}  ")).collect();
    println!("{}", header.trim_end());

    let offset = if config.week_starts_monday() {
        first.weekday().num_days_from_monday()
    } else {
        first.weekday().num_days_from_sunday()
    } as usize;

    let mut cells: Vec<String> = vec![" ".repeat(CELL_WIDTH); offset];
    for day in first.iter_days().take(days_in_month(first)) {
        let marker = match store.records().get(&day) {
            Some(r) if r.is_manual && config.ui.show_makeup_marks => '+',
            Some(_) => '*',
            None => ' ',
        };
        let inner = format!("{:>2}{marker}", day.day());
        let cell = if day == today {
            format!("[{inner}]")
        } else {
            format!(" {inner} ")
        };
        cells.push(cell);
    }
    for week in cells.chunks(7) {
        println!("{}", week.concat().trim_end());
    }
}

fn render_summary(
    store: &CheckInStore<SqliteStorage>,
    config: &Config,
    first: NaiveDate,
    today: NaiveDate,
) {
    let overall = stats::overall_stats(store.records());
    let this_month = stats::month_total(store.records(), first);
    let streak = stats::current_streak(store.records(), today);

    println!();
    println!(
        "check-ins: {}   this month: {}   streak: {}   makeups: {}",
        overall.total_days, this_month, streak, overall.makeup_days
    );
    if config.ui.show_makeup_marks {
        println!("* check-in   + makeup   [ ] today");
    } else {
        println!("* check-in   [ ] today");
    }

    // Mirror of the widget's check-in button: only when the displayed
    // month is the one containing today.
    if date::month_key(first) == date::month_key(today) && !store.is_checked_in(today) {
        println!();
        println!("today is not checked in yet -- run 'daymark check'");
    }
}

fn days_in_month(first: NaiveDate) -> usize {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.map(|n| (n - first).num_days() as usize).unwrap_or(31)
}
