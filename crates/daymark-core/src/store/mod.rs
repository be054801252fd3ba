//! The check-in store: day records, the makeup log, and every mutation rule.
//!
//! Per-day state machine: an unset day checked in today becomes a normal
//! check-in (terminal). An unset past day yields a [`PendingMakeup`] token;
//! [`CheckInStore::confirm_makeup`] turns it into a makeup check-in
//! (terminal), dropping it cancels with no side effect. Future days are
//! always rejected. Normal and makeup check-ins are indistinguishable to
//! the already-checked-in guard, so neither can be re-entered or undone.

pub(crate) mod records;

pub use records::{CheckInMap, CheckInRecord, MakeupRecord};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use crate::date::{self, Moment};
use crate::error::Result;
use crate::storage::Storage;

/// Durable key holding the day -> record mapping.
pub const CHECKIN_DATA_KEY: &str = "enhancedCheckInData";
/// Durable key holding the makeup log.
pub const MAKEUP_RECORDS_KEY: &str = "makeupRecords";

/// Outcome of a check-in attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// The day was recorded as a normal check-in.
    Recorded,
    /// The day already has a check-in; nothing changed.
    AlreadyCheckedIn,
    /// The day is in the future; nothing was created.
    FutureDate,
    /// The day is in the past; pass the token to
    /// [`CheckInStore::confirm_makeup`] to record it as a makeup.
    MakeupRequired(PendingMakeup),
}

/// Outcome of confirming a makeup.
#[derive(Debug, PartialEq, Eq)]
pub enum MakeupOutcome {
    /// Record and makeup log entry were both written.
    Confirmed,
    /// The day was checked in between signal and confirmation; nothing
    /// changed.
    AlreadyCheckedIn,
}

/// Token for the two-phase makeup confirmation.
///
/// Issued by [`CheckInStore::check_in`] for past days. Deliberately not
/// cloneable: it is consumed by `confirm_makeup`, and dropping it is the
/// cancel transition.
#[derive(Debug, PartialEq, Eq)]
pub struct PendingMakeup {
    date: NaiveDate,
}

impl PendingMakeup {
    /// The backdated day awaiting confirmation.
    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Counts reported by [`CheckInStore::import_merge`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub added_records: usize,
    pub skipped_existing: usize,
    pub added_makeups: usize,
}

/// The validated, persisted check-in state.
///
/// Owns the canonical record mapping and makeup log; all durable access
/// goes through the injected [`Storage`]. In-memory state only ever
/// reflects successfully persisted writes.
pub struct CheckInStore<S: Storage> {
    storage: S,
    records: CheckInMap,
    makeups: Vec<MakeupRecord>,
}

impl<S: Storage> CheckInStore<S> {
    // ── Load & recovery ──────────────────────────────────────────────

    /// Loads both collections from storage. Never fails.
    ///
    /// A missing key is an empty collection. A value that is not valid
    /// JSON resets its collection to empty and removes the key. Valid
    /// JSON with the wrong top-level shape yields an empty collection but
    /// leaves the key alone. Individual entries failing schema validation
    /// are dropped and logged.
    pub fn load(storage: S) -> Self {
        let mut store = Self {
            storage,
            records: CheckInMap::new(),
            makeups: Vec::new(),
        };
        if let Some(raw) = store.read_collection(CHECKIN_DATA_KEY) {
            match records::validate_records(&raw) {
                Some(validated) => store.records = validated.records,
                None => warn!(
                    key = CHECKIN_DATA_KEY,
                    "collection has wrong shape; treating as empty"
                ),
            }
        }
        if let Some(raw) = store.read_collection(MAKEUP_RECORDS_KEY) {
            match records::validate_makeups(&raw) {
                Some(validated) => store.makeups = validated.makeups,
                None => warn!(
                    key = MAKEUP_RECORDS_KEY,
                    "collection has wrong shape; treating as empty"
                ),
            }
        }
        store
    }

    /// Hands the storage capability back, e.g. to reload.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn read_collection(&mut self, key: &str) -> Option<Value> {
        let raw = match self.storage.get(key) {
            Ok(value) => value?,
            Err(err) => {
                warn!(key, error = %err, "failed to read collection; starting empty");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key, error = %err, "corrupt collection; resetting and removing key");
                if let Err(remove_err) = self.storage.remove(key) {
                    warn!(key, error = %remove_err, "failed to remove corrupt key");
                }
                None
            }
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn records(&self) -> &CheckInMap {
        &self.records
    }

    pub fn makeups(&self) -> &[MakeupRecord] {
        &self.makeups
    }

    pub fn is_checked_in(&self, day: NaiveDate) -> bool {
        self.records
            .get(&day)
            .is_some_and(|record| record.checked_in)
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Attempts to check in `target`.
    ///
    /// Future days are rejected and already-checked days are left alone
    /// (check-in is idempotent and irreversible). Today is persisted
    /// immediately; a past day returns a [`PendingMakeup`] token and
    /// writes nothing. `Err` only on persistence failure, in which case
    /// neither memory nor storage has changed.
    pub fn check_in(&mut self, target: NaiveDate, now: Moment) -> Result<CheckInOutcome> {
        if target > now.date {
            return Ok(CheckInOutcome::FutureDate);
        }
        if self.is_checked_in(target) {
            return Ok(CheckInOutcome::AlreadyCheckedIn);
        }
        if date::is_same_day(target, now.date) {
            let record = CheckInRecord {
                checked_in: true,
                timestamp: now.epoch_ms,
                is_manual: false,
            };
            let mut next = self.records.clone();
            next.insert(target, record);
            self.persist_records(&next)?;
            self.records = next;
            debug!(day = %target, "recorded check-in");
            return Ok(CheckInOutcome::Recorded);
        }
        debug!(day = %target, "check-in requires makeup confirmation");
        Ok(CheckInOutcome::MakeupRequired(PendingMakeup { date: target }))
    }

    /// Confirms a pending makeup.
    ///
    /// Re-checks the already-checked-in guard first: the day may have been
    /// written by another session between signal and confirmation. On
    /// success the day record and the makeup log entry are persisted as a
    /// single committed unit.
    pub fn confirm_makeup(&mut self, pending: PendingMakeup, now: Moment) -> Result<MakeupOutcome> {
        let target = pending.date;
        if self.is_checked_in(target) {
            return Ok(MakeupOutcome::AlreadyCheckedIn);
        }

        let record = CheckInRecord {
            checked_in: true,
            timestamp: now.epoch_ms,
            is_manual: true,
        };
        let makeup = MakeupRecord {
            date: target,
            timestamp: now.epoch_ms,
            original_date: now.date,
        };

        let mut next_records = self.records.clone();
        next_records.insert(target, record);
        let mut next_makeups = self.makeups.clone();
        next_makeups.push(makeup);

        self.persist_pair(&next_records, &next_makeups)?;
        self.records = next_records;
        self.makeups = next_makeups;
        debug!(day = %target, "recorded makeup check-in");
        Ok(MakeupOutcome::Confirmed)
    }

    /// Merges an imported, already-validated snapshot.
    ///
    /// Existing days are never overwritten; imported makeups are appended
    /// as-is (duplicates allowed). Persisted as one committed unit like
    /// [`CheckInStore::confirm_makeup`].
    pub fn import_merge(
        &mut self,
        records: CheckInMap,
        makeups: Vec<MakeupRecord>,
    ) -> Result<MergeReport> {
        let mut report = MergeReport::default();
        let mut next_records = self.records.clone();
        for (day, record) in records {
            if next_records.contains_key(&day) {
                report.skipped_existing += 1;
            } else {
                next_records.insert(day, record);
                report.added_records += 1;
            }
        }
        let mut next_makeups = self.makeups.clone();
        report.added_makeups = makeups.len();
        next_makeups.extend(makeups);

        self.persist_pair(&next_records, &next_makeups)?;
        self.records = next_records;
        self.makeups = next_makeups;
        debug!(
            added = report.added_records,
            skipped = report.skipped_existing,
            makeups = report.added_makeups,
            "merged imported snapshot"
        );
        Ok(report)
    }

    /// Erases both durable keys and resets memory. Irreversible; callers
    /// gate this behind their own confirmation step.
    pub fn clear(&mut self) -> Result<()> {
        self.storage.remove(CHECKIN_DATA_KEY)?;
        self.records.clear();
        self.storage.remove(MAKEUP_RECORDS_KEY)?;
        self.makeups.clear();
        Ok(())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist_records(&mut self, records: &CheckInMap) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.storage.set(CHECKIN_DATA_KEY, &json)?;
        Ok(())
    }

    /// Ordered paired write: the record mapping first, the makeup log only
    /// after it succeeded, rolling the mapping back if the log write fails
    /// so that neither change is observable.
    fn persist_pair(&mut self, records: &CheckInMap, makeups: &[MakeupRecord]) -> Result<()> {
        let next_records = serde_json::to_string(records)?;
        let next_makeups = serde_json::to_string(makeups)?;
        let previous_records = serde_json::to_string(&self.records)?;

        self.storage.set(CHECKIN_DATA_KEY, &next_records)?;
        if let Err(err) = self.storage.set(MAKEUP_RECORDS_KEY, &next_makeups) {
            if let Err(rollback_err) = self.storage.set(CHECKIN_DATA_KEY, &previous_records) {
                warn!(error = %rollback_err, "rollback after failed makeup write also failed");
            }
            return Err(err.into());
        }
        Ok(())
    }
}
