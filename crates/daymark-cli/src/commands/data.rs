//! Backup export/import and the full data clear.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use daymark_core::{backup, CheckInStore, Config, Moment, SqliteStorage};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export all data to an obfuscated .crw backup file
    Export {
        /// Output file path (default: checkin-data-<today>.crw in the
        /// configured export directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Import a .crw backup file, merging it into the existing data
    Import {
        /// Backup file to import
        file: PathBuf,
    },
    /// Erase all check-in and makeup records
    Clear {
        /// Confirm the irreversible clear
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DataAction::Export { output } => export(output),
        DataAction::Import { file } => import(&file),
        DataAction::Clear { yes } => clear(yes),
    }
}

fn export(output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let store = CheckInStore::load(SqliteStorage::open()?);
    let now = Moment::now();

    let payload = backup::export_snapshot(store.records(), store.makeups(), now)?;
    let path = output.unwrap_or_else(|| {
        let config = Config::load_or_default();
        let dir = config
            .export
            .directory
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        dir.join(backup::backup_file_name(now.date))
    });
    fs::write(&path, &payload)?;

    println!(
        "exported {} check-in(s) and {} makeup record(s) to {}",
        store.records().len(),
        store.makeups().len(),
        path.display()
    );
    Ok(())
}

fn import(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(file)?;
    let imported = backup::import_snapshot(&contents)?;
    let exported_on = imported.export_time.as_deref().unwrap_or("unknown").to_string();

    let mut store = CheckInStore::load(SqliteStorage::open()?);
    let report = store.import_merge(imported.records, imported.makeups)?;

    println!("import succeeded (snapshot exported on {exported_on})");
    println!(
        "{} added, {} already present, {} makeup record(s) appended",
        report.added_records, report.skipped_existing, report.added_makeups
    );
    Ok(())
}

fn clear(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        eprintln!("this permanently deletes every check-in and makeup record");
        eprintln!("consider 'daymark data export' first; re-run with --yes to confirm");
        std::process::exit(1);
    }
    let mut store = CheckInStore::load(SqliteStorage::open()?);
    store.clear()?;
    println!("all check-in data cleared");
    Ok(())
}
