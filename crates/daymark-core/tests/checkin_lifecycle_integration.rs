//! Integration tests for the check-in lifecycle on real SQLite storage.
//!
//! Exercises the full workflow: same-day check-in, two-phase makeup,
//! persistence across reopen, statistics over the reloaded snapshot, and
//! the full clear.

use chrono::NaiveDate;
use daymark_core::{
    stats, CheckInOutcome, CheckInStore, MakeupOutcome, Moment, SqliteStorage, Storage,
};

fn day(s: &str) -> NaiveDate {
    daymark_core::date::parse_day(s).unwrap()
}

#[test]
fn test_full_checkin_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daymark.db");

    let today = day("2025-06-10");
    let now = Moment::new(today, 1_749_513_600_000);

    {
        let storage = SqliteStorage::open_at(&path).unwrap();
        let mut store = CheckInStore::load(storage);

        assert_eq!(store.check_in(today, now).unwrap(), CheckInOutcome::Recorded);
        assert_eq!(
            store.check_in(today, now).unwrap(),
            CheckInOutcome::AlreadyCheckedIn
        );
        assert_eq!(
            store.check_in(day("2025-06-11"), now).unwrap(),
            CheckInOutcome::FutureDate
        );

        let pending = match store.check_in(day("2025-06-09"), now).unwrap() {
            CheckInOutcome::MakeupRequired(p) => p,
            other => panic!("expected MakeupRequired, got {other:?}"),
        };
        assert_eq!(
            store.confirm_makeup(pending, now).unwrap(),
            MakeupOutcome::Confirmed
        );
    }

    // Reopen the database: all state must have survived.
    let storage = SqliteStorage::open_at(&path).unwrap();
    let mut store = CheckInStore::load(storage);
    assert!(store.is_checked_in(today));
    assert!(store.is_checked_in(day("2025-06-09")));
    assert_eq!(store.makeups().len(), 1);
    assert_eq!(store.makeups()[0].date, day("2025-06-09"));
    assert_eq!(store.makeups()[0].original_date, today);

    let overall = stats::overall_stats(store.records());
    assert_eq!(overall.total_days, 2);
    assert_eq!(overall.normal_days, 1);
    assert_eq!(overall.makeup_days, 1);
    assert_eq!(overall.max_streak, 2);
    assert_eq!(stats::current_streak(store.records(), today), 2);
    assert_eq!(stats::month_total(store.records(), today), 2);

    store.clear().unwrap();
    assert!(store.records().is_empty());
    assert!(store.makeups().is_empty());

    // And the clear survives a reopen too.
    drop(store);
    let store = CheckInStore::load(SqliteStorage::open_at(&path).unwrap());
    assert!(store.records().is_empty());
    assert!(store.makeups().is_empty());
}

#[test]
fn test_corrupt_collection_recovery_on_sqlite() {
    let mut storage = SqliteStorage::open_memory().unwrap();
    storage
        .set(daymark_core::store::CHECKIN_DATA_KEY, "{{{ definitely corrupt")
        .unwrap();
    storage
        .set(
            daymark_core::store::MAKEUP_RECORDS_KEY,
            r#"[{"date":"2025-06-01","timestamp":5,"originalDate":"2025-06-03"}]"#,
        )
        .unwrap();

    let store = CheckInStore::load(storage);
    assert!(store.records().is_empty());
    assert_eq!(store.makeups().len(), 1);

    // The corrupt key was removed; the healthy one is still there.
    let storage = store.into_storage();
    assert!(storage
        .get(daymark_core::store::CHECKIN_DATA_KEY)
        .unwrap()
        .is_none());
    assert!(storage
        .get(daymark_core::store::MAKEUP_RECORDS_KEY)
        .unwrap()
        .is_some());
}

#[test]
fn test_two_sessions_sharing_one_database() {
    // A second session writes the day between signal and confirm; the
    // re-check guard must turn the confirmation into a no-op.
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daymark.db");
    let now = Moment::new(day("2025-06-10"), 9_000);

    let mut first = CheckInStore::load(SqliteStorage::open_at(&path).unwrap());
    let pending = match first.check_in(day("2025-06-08"), now).unwrap() {
        CheckInOutcome::MakeupRequired(p) => p,
        other => panic!("expected MakeupRequired, got {other:?}"),
    };

    let mut second = CheckInStore::load(SqliteStorage::open_at(&path).unwrap());
    let stolen = match second.check_in(day("2025-06-08"), now).unwrap() {
        CheckInOutcome::MakeupRequired(p) => p,
        other => panic!("expected MakeupRequired, got {other:?}"),
    };
    assert_eq!(
        second.confirm_makeup(stolen, now).unwrap(),
        MakeupOutcome::Confirmed
    );

    // The first session reloads before confirming, as the calling layer
    // must after a pause, and the guard fires.
    let mut first = CheckInStore::load(first.into_storage());
    assert_eq!(
        first.confirm_makeup(pending, now).unwrap(),
        MakeupOutcome::AlreadyCheckedIn
    );
    assert_eq!(first.makeups().len(), 1);
}
