//! Record types and schema validation for persisted check-in data.
//!
//! Everything read back from durable storage or a backup file is untrusted
//! and funnels through the validators here; the store and the backup
//! importer share the exact same filtering semantics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::date;

/// Canonical mapping of day -> check-in record, sorted by day.
pub type CheckInMap = BTreeMap<NaiveDate, CheckInRecord>;

/// One checked-in calendar day.
///
/// Wire names are camelCase and fixed by the storage/backup format.
/// A record only ever exists with `checked_in == true`; absence of the
/// date key means "not checked in". `is_manual` is absent on old wires,
/// defaulting to false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub checked_in: bool,
    /// Epoch milliseconds of when the check-in action was performed.
    pub timestamp: i64,
    #[serde(default)]
    pub is_manual: bool,
}

/// Audit entry for one makeup (backdated) check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeupRecord {
    /// The backdated day that was filled in.
    pub date: NaiveDate,
    /// Epoch milliseconds of when the makeup action was performed.
    pub timestamp: i64,
    /// "Today" at the moment the makeup was performed.
    pub original_date: NaiveDate,
}

/// Check-in entries that passed validation, plus the keys that did not.
#[derive(Debug, Default)]
pub(crate) struct ValidatedRecords {
    pub records: CheckInMap,
    pub rejected: Vec<String>,
}

/// Makeup entries that passed validation, plus the positions that did not.
#[derive(Debug, Default)]
pub(crate) struct ValidatedMakeups {
    pub makeups: Vec<MakeupRecord>,
    pub rejected: Vec<usize>,
}

/// Validates a raw check-in mapping.
///
/// Returns `None` when the value is not an object at all. Otherwise every
/// entry must have a strict `YYYY-MM-DD` key and the exact field types of
/// [`CheckInRecord`]; entries claiming `checkedIn: false` are dropped too,
/// since such records are never persisted. Dropped keys are logged.
pub(crate) fn validate_records(raw: &Value) -> Option<ValidatedRecords> {
    let object = raw.as_object()?;
    let mut out = ValidatedRecords::default();
    for (key, value) in object {
        let parsed = date::parse_day(key)
            .ok()
            .and_then(|day| record_from_value(value).map(|record| (day, record)));
        match parsed {
            Some((day, record)) => {
                out.records.insert(day, record);
            }
            None => {
                warn!(key = %key, "dropping invalid check-in entry");
                out.rejected.push(key.clone());
            }
        }
    }
    Some(out)
}

/// Validates a raw makeup sequence. `None` when the value is not an array.
pub(crate) fn validate_makeups(raw: &Value) -> Option<ValidatedMakeups> {
    let array = raw.as_array()?;
    let mut out = ValidatedMakeups::default();
    for (index, value) in array.iter().enumerate() {
        match makeup_from_value(value) {
            Some(makeup) => out.makeups.push(makeup),
            None => {
                warn!(index, "dropping invalid makeup entry");
                out.rejected.push(index);
            }
        }
    }
    Some(out)
}

fn record_from_value(value: &Value) -> Option<CheckInRecord> {
    let object = value.as_object()?;
    let checked_in = object.get("checkedIn")?.as_bool()?;
    if !checked_in {
        return None;
    }
    let timestamp = object.get("timestamp")?.as_i64()?;
    let is_manual = match object.get("isManual") {
        Some(flag) => flag.as_bool()?,
        None => false,
    };
    Some(CheckInRecord {
        checked_in,
        timestamp,
        is_manual,
    })
}

fn makeup_from_value(value: &Value) -> Option<MakeupRecord> {
    let object = value.as_object()?;
    let date = date::parse_day(object.get("date")?.as_str()?).ok()?;
    let timestamp = object.get("timestamp")?.as_i64()?;
    let original_date = date::parse_day(object.get("originalDate")?.as_str()?).ok()?;
    Some(MakeupRecord {
        date,
        timestamp,
        original_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_wire_names_are_camel_case() {
        let record = CheckInRecord {
            checked_in: true,
            timestamp: 1_735_689_600_000,
            is_manual: true,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            json!({"checkedIn": true, "timestamp": 1_735_689_600_000i64, "isManual": true})
        );
    }

    #[test]
    fn missing_is_manual_defaults_to_false() {
        let raw = json!({"2025-01-01": {"checkedIn": true, "timestamp": 1}});
        let validated = validate_records(&raw).unwrap();
        let day = crate::date::parse_day("2025-01-01").unwrap();
        assert!(!validated.records[&day].is_manual);
        assert!(validated.rejected.is_empty());
    }

    #[test]
    fn invalid_entries_are_dropped_not_fatal() {
        let raw = json!({
            "2025-01-01": {"checkedIn": true, "timestamp": 1, "isManual": false},
            "2025-1-2": {"checkedIn": true, "timestamp": 2},
            "2025-02-30": {"checkedIn": true, "timestamp": 3},
            "2025-01-04": {"checkedIn": "yes", "timestamp": 4},
            "2025-01-05": {"checkedIn": true, "timestamp": 5.5},
            "2025-01-06": {"checkedIn": false, "timestamp": 6},
            "2025-01-07": "not an object"
        });
        let validated = validate_records(&raw).unwrap();
        assert_eq!(validated.records.len(), 1);
        assert_eq!(validated.rejected.len(), 6);
        assert!(validated.rejected.contains(&"2025-01-06".to_string()));
    }

    #[test]
    fn top_level_array_is_not_a_record_map() {
        assert!(validate_records(&json!([1, 2, 3])).is_none());
        assert!(validate_records(&json!("text")).is_none());
    }

    #[test]
    fn makeup_validation_checks_both_dates() {
        let raw = json!([
            {"date": "2025-01-01", "timestamp": 10, "originalDate": "2025-01-03"},
            {"date": "2025-01-01", "timestamp": 10, "originalDate": "bad"},
            {"date": "2025-01-01", "timestamp": "10", "originalDate": "2025-01-03"},
            {"date": "2025-01-01"},
            42
        ]);
        let validated = validate_makeups(&raw).unwrap();
        assert_eq!(validated.makeups.len(), 1);
        assert_eq!(validated.rejected, vec![1, 2, 3, 4]);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = json!({
            "2025-01-01": {"checkedIn": true, "timestamp": 1, "isManual": false, "note": "hi"}
        });
        let validated = validate_records(&raw).unwrap();
        assert_eq!(validated.records.len(), 1);
    }
}
