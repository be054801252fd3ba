//! Backup snapshot export and import.
//!
//! A backup file is the obfuscated (see [`crate::codec`]) pretty-printed
//! JSON serialization of a [`BackupSnapshot`]. Import is strictly
//! non-mutating: it decodes, shape-checks and validates, and hands the
//! surviving entries to the caller to merge into a store.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::codec;
use crate::date::{self, Moment};
use crate::error::{ImportError, Result};
use crate::store::records::{validate_makeups, validate_records};
use crate::store::{CheckInMap, MakeupRecord};

/// Snapshot format version written on export.
pub const BACKUP_VERSION: &str = "1.0";
/// Backup file extension.
pub const BACKUP_EXTENSION: &str = "crw";

/// The exportable bundle: all records and makeups plus metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    pub check_in_data: CheckInMap,
    pub makeup_records: Vec<MakeupRecord>,
    /// Day the export was made, `YYYY-MM-DD`.
    pub export_time: String,
    pub version: String,
}

/// A decoded, validated snapshot ready to merge, plus its metadata.
#[derive(Debug)]
pub struct ImportedSnapshot {
    pub records: CheckInMap,
    pub makeups: Vec<MakeupRecord>,
    pub export_time: Option<String>,
    pub version: Option<String>,
}

/// Serializes and obfuscates the full history for writing to a `.crw` file.
pub fn export_snapshot(
    records: &CheckInMap,
    makeups: &[MakeupRecord],
    now: Moment,
) -> Result<String> {
    let snapshot = BackupSnapshot {
        check_in_data: records.clone(),
        makeup_records: makeups.to_vec(),
        export_time: date::format_day(now.date),
        version: BACKUP_VERSION.to_string(),
    };
    let json = serde_json::to_string_pretty(&snapshot)?;
    Ok(codec::encode(&json))
}

/// Conventional export file name: `checkin-data-<day>.crw`.
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("checkin-data-{}.{BACKUP_EXTENSION}", date::format_day(date))
}

/// Decodes and validates the contents of a backup file.
///
/// Fails without side effects when the payload cannot be decoded, is not
/// JSON, or lacks a `checkInData` object and `makeupRecords` array.
/// Individual entries go through the same schema validation the store
/// applies on load; invalid ones are dropped and logged, never fatal.
pub fn import_snapshot(contents: &str) -> Result<ImportedSnapshot, ImportError> {
    let decoded = codec::decode(contents)?;
    let value: Value = serde_json::from_str(&decoded)?;
    let object = value
        .as_object()
        .ok_or_else(|| ImportError::Shape("top level is not an object".into()))?;

    let raw_records = object
        .get("checkInData")
        .ok_or_else(|| ImportError::Shape("missing checkInData".into()))?;
    let raw_makeups = object
        .get("makeupRecords")
        .ok_or_else(|| ImportError::Shape("missing makeupRecords".into()))?;

    let validated_records = validate_records(raw_records)
        .ok_or_else(|| ImportError::Shape("checkInData is not an object".into()))?;
    let validated_makeups = validate_makeups(raw_makeups)
        .ok_or_else(|| ImportError::Shape("makeupRecords is not an array".into()))?;

    if !validated_records.rejected.is_empty() || !validated_makeups.rejected.is_empty() {
        warn!(
            records = validated_records.rejected.len(),
            makeups = validated_makeups.rejected.len(),
            "dropped invalid entries from imported snapshot"
        );
    }

    Ok(ImportedSnapshot {
        records: validated_records.records,
        makeups: validated_makeups.makeups,
        export_time: object
            .get("exportTime")
            .and_then(Value::as_str)
            .map(str::to_string),
        version: object
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::CheckInRecord;

    fn day(s: &str) -> NaiveDate {
        date::parse_day(s).unwrap()
    }

    fn sample() -> (CheckInMap, Vec<MakeupRecord>) {
        let mut records = CheckInMap::new();
        records.insert(
            day("2025-01-01"),
            CheckInRecord { checked_in: true, timestamp: 100, is_manual: false },
        );
        records.insert(
            day("2025-01-02"),
            CheckInRecord { checked_in: true, timestamp: 200, is_manual: true },
        );
        let makeups = vec![MakeupRecord {
            date: day("2025-01-02"),
            timestamp: 200,
            original_date: day("2025-01-04"),
        }];
        (records, makeups)
    }

    #[test]
    fn export_then_import_round_trip() {
        let (records, makeups) = sample();
        let now = Moment::new(day("2025-01-05"), 300);

        let encoded = export_snapshot(&records, &makeups, now).unwrap();
        let imported = import_snapshot(&encoded).unwrap();

        assert_eq!(imported.records, records);
        assert_eq!(imported.makeups, makeups);
        assert_eq!(imported.export_time.as_deref(), Some("2025-01-05"));
        assert_eq!(imported.version.as_deref(), Some(BACKUP_VERSION));
    }

    #[test]
    fn export_payload_is_pretty_json_with_wire_names() {
        let (records, makeups) = sample();
        let now = Moment::new(day("2025-01-05"), 300);

        let decoded = codec::decode(&export_snapshot(&records, &makeups, now).unwrap()).unwrap();
        assert!(decoded.contains("\"checkInData\""));
        assert!(decoded.contains("\"makeupRecords\""));
        assert!(decoded.contains("\"exportTime\": \"2025-01-05\""));
        assert!(decoded.contains("\"version\": \"1.0\""));
        assert!(decoded.contains("\"originalDate\": \"2025-01-04\""));
    }

    #[test]
    fn file_name_convention() {
        assert_eq!(backup_file_name(day("2025-01-05")), "checkin-data-2025-01-05.crw");
    }

    #[test]
    fn import_rejects_undecodable_input() {
        assert!(matches!(
            import_snapshot("not even base64 !!!"),
            Err(ImportError::Decode(_))
        ));
    }

    #[test]
    fn import_rejects_non_json_payload() {
        let encoded = codec::encode("plain text, not json");
        assert!(matches!(import_snapshot(&encoded), Err(ImportError::Parse(_))));
    }

    #[test]
    fn import_rejects_wrong_shapes() {
        let top_level_array = codec::encode("[1,2,3]");
        assert!(matches!(
            import_snapshot(&top_level_array),
            Err(ImportError::Shape(_))
        ));

        let missing_makeups = codec::encode(r#"{"checkInData":{}}"#);
        assert!(matches!(
            import_snapshot(&missing_makeups),
            Err(ImportError::Shape(_))
        ));

        let mistyped = codec::encode(r#"{"checkInData":5,"makeupRecords":[]}"#);
        assert!(matches!(import_snapshot(&mistyped), Err(ImportError::Shape(_))));
    }

    #[test]
    fn import_drops_invalid_entries_but_keeps_valid() {
        let payload = r#"{
            "checkInData": {
                "2025-01-01": {"checkedIn": true, "timestamp": 1},
                "garbage": {"checkedIn": true, "timestamp": 2},
                "2025-01-03": {"checkedIn": false, "timestamp": 3}
            },
            "makeupRecords": [
                {"date": "2025-01-01", "timestamp": 9, "originalDate": "2025-01-02"},
                {"date": "nope", "timestamp": 9, "originalDate": "2025-01-02"}
            ],
            "exportTime": "2025-01-05",
            "version": "1.0"
        }"#;
        let imported = import_snapshot(&codec::encode(payload)).unwrap();
        assert_eq!(imported.records.len(), 1);
        assert!(imported.records.contains_key(&day("2025-01-01")));
        assert_eq!(imported.makeups.len(), 1);
    }

    #[test]
    fn import_tolerates_missing_metadata() {
        let payload = r#"{"checkInData":{},"makeupRecords":[]}"#;
        let imported = import_snapshot(&codec::encode(payload)).unwrap();
        assert!(imported.export_time.is_none());
        assert!(imported.version.is_none());
        assert!(imported.records.is_empty());
    }
}
