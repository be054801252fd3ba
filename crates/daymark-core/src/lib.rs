//! # Daymark Core Library
//!
//! This library provides the core business logic for the Daymark habit
//! tracker. It implements a CLI-first philosophy where all operations are
//! available via a standalone CLI binary over the same core library.
//!
//! ## Architecture
//!
//! - **Check-In Store**: owns the day -> record mapping and the makeup
//!   log, validates everything read back from storage, and enforces the
//!   per-day state machine (same-day check-in, two-phase makeup, no undo)
//! - **Statistics**: pure derivations over store snapshots (streaks,
//!   monthly buckets, the makeup audit log)
//! - **Backup**: obfuscated `.crw` snapshot export/import with additive,
//!   never-overwriting merge
//! - **Storage**: SQLite-backed key-value persistence and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`CheckInStore`]: validated persistent state and all mutation rules
//! - [`Storage`]: injected persistence capability (SQLite or in-memory)
//! - [`Config`]: application configuration management
//! - [`Moment`]: the sampled "now" passed into mutating operations

pub mod backup;
pub mod codec;
pub mod date;
pub mod error;
pub mod stats;
pub mod storage;
pub mod store;

pub use backup::{BackupSnapshot, ImportedSnapshot};
pub use date::Moment;
pub use error::{
    CodecError, ConfigError, CoreError, ImportError, StorageError, ValidationError,
};
pub use stats::{MakeupLogEntry, MonthlyStats, OverallStats};
pub use storage::{Config, MemoryStorage, SqliteStorage, Storage};
pub use store::{
    CheckInMap, CheckInOutcome, CheckInRecord, CheckInStore, MakeupOutcome, MakeupRecord,
    MergeReport, PendingMakeup,
};
