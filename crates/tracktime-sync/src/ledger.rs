//! Per-month record of how much time has already been pushed.
//!
//! The ledger lives next to the month's day files as `YYYY/MM/.synced`:
//!
//! ```text
//! type,project,taskid,synced
//! gitlab,group/app,#3,90
//! ```
//!
//! `synced` is in whole minutes.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracktime_core::{DayLog, EntryType, Month, TimeEntry};

use crate::SyncError;

pub const LEDGER_FILE: &str = ".synced";

/// The grain time is pushed at.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyncKey {
    pub kind: EntryType,
    pub project: String,
    pub task_id: String,
}

impl SyncKey {
    /// Entries without a type, project or task ID cannot be pushed anywhere.
    pub fn for_entry(entry: &TimeEntry) -> Option<Self> {
        if entry.kind.is_untyped() || entry.project.is_empty() || entry.task_id.is_empty() {
            return None;
        }
        Some(Self {
            kind: entry.kind.clone(),
            project: entry.project.clone(),
            task_id: entry.task_id.clone(),
        })
    }
}

/// Minutes per task.
pub type MinuteTotals = BTreeMap<SyncKey, i64>;

#[derive(Debug, Serialize, Deserialize)]
struct LedgerRow {
    #[serde(rename = "type")]
    kind: String,
    project: String,
    taskid: String,
    synced: i64,
}

pub fn ledger_path(base_dir: &Path, month: Month) -> PathBuf {
    base_dir.join(month.relative_path()).join(LEDGER_FILE)
}

/// Minutes recorded in closed entries during `month`. Running entries are
/// left for a later sync.
pub fn tracked_minutes(base_dir: &Path, month: Month) -> Result<MinuteTotals, SyncError> {
    let mut totals = MinuteTotals::new();
    for date in month.range().days() {
        let log = DayLog::load(date, base_dir)?;
        for entry in log.entries() {
            let Some(key) = SyncKey::for_entry(entry) else {
                continue;
            };
            let Some(duration) = entry.duration(None) else {
                tracing::debug!(%date, %entry, "skipping running entry");
                continue;
            };
            *totals.entry(key).or_default() += duration.num_minutes();
        }
    }
    Ok(totals)
}

/// Reads the ledger; a missing file means nothing has been pushed yet.
pub fn read_ledger(path: &Path) -> Result<MinuteTotals, SyncError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(MinuteTotals::new()),
        Err(err) => return Err(ledger_error(path, err)),
    };

    let mut totals = MinuteTotals::new();
    for row in csv::Reader::from_reader(file).deserialize() {
        let row: LedgerRow = row.map_err(|err| ledger_error(path, err))?;
        let key = SyncKey {
            kind: EntryType::from(row.kind.as_str()),
            project: row.project,
            task_id: row.taskid,
        };
        totals.insert(key, row.synced);
    }
    Ok(totals)
}

pub fn write_ledger(path: &Path, totals: &MinuteTotals) -> Result<(), SyncError> {
    let dir = path
        .parent()
        .ok_or_else(|| ledger_error(path, "ledger has no parent directory"))?;
    fs::create_dir_all(dir).map_err(|err| ledger_error(path, err))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| ledger_error(path, err))?;
    {
        let mut writer = csv::Writer::from_writer(temp.as_file_mut());
        for (key, synced) in totals {
            writer
                .serialize(LedgerRow {
                    kind: key.kind.to_string(),
                    project: key.project.clone(),
                    taskid: key.task_id.clone(),
                    synced: *synced,
                })
                .map_err(|err| ledger_error(path, err))?;
        }
        if totals.is_empty() {
            writer
                .write_record(["type", "project", "taskid", "synced"])
                .map_err(|err| ledger_error(path, err))?;
        }
        writer.flush().map_err(|err| ledger_error(path, err))?;
    }
    temp.persist(path).map_err(|err| ledger_error(path, err.error))?;

    tracing::debug!(path = %path.display(), tasks = totals.len(), "wrote sync ledger");
    Ok(())
}

fn ledger_error(path: &Path, reason: impl ToString) -> SyncError {
    SyncError::Ledger {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}
