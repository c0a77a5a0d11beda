//! Day file persistence.
//!
//! Each calendar day lives in its own CSV file at `<base>/YYYY/MM/DD`:
//!
//! ```text
//! start,stop,type,project,taskid,customer,description
//! 09:00,10:30,gitlab,tracktime,#12,acme,"Review, then merge"
//! 10:30,,,,,,standup
//! ```
//!
//! Reads are all-or-nothing: a single bad row fails the load. Writes replace
//! the whole file through a temporary file in the same directory, so a failed
//! save never leaves a half-written day behind.
//!
//! There is no locking; two processes writing the same day concurrently race.

use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::clock::{ClockMinute, format_optional};
use crate::date::CalendarDate;
use crate::entry::{EntryType, TimeEntry};
use crate::error::{Result, TrackError};

/// Column names, in file order.
pub const HEADER: [&str; 7] = [
    "start",
    "stop",
    "type",
    "project",
    "taskid",
    "customer",
    "description",
];

/// Location of the file backing `date`.
pub fn day_path(base_dir: &Path, date: CalendarDate) -> PathBuf {
    base_dir.join(date.relative_path())
}

/// Reads every entry from `path`. A missing file reads as an empty day.
pub fn read_entries(path: &Path) -> Result<Vec<TimeEntry>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(TrackError::io(path, err)),
    };
    parse_entries(path, file)
}

fn parse_entries(path: &Path, reader: impl Read) -> Result<Vec<TimeEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader.headers().map_err(|err| read_error(path, 0, err))?;
    if !headers.is_empty() && headers.get(0) != Some(HEADER[0]) {
        return Err(corrupt(path, 0, "missing header row"));
    }

    let mut entries: Vec<TimeEntry> = Vec::new();
    // latest stop among the rows read so far
    let mut reach: Option<ClockMinute> = None;
    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        let record = record.map_err(|err| read_error(path, row, err))?;
        let field = |n: usize| record.get(n).unwrap_or_default();

        let start = parse_stored_clock(field(0))
            .map_err(|reason| corrupt(path, row, reason))?
            .ok_or_else(|| corrupt(path, row, "missing start time"))?;
        let stop = parse_stored_clock(field(1)).map_err(|reason| corrupt(path, row, reason))?;
        if let Some(stop) = stop.filter(|stop| *stop < start) {
            return Err(corrupt(
                path,
                row,
                format!("stop {stop} is before start {start}"),
            ));
        }
        if entries.last().is_some_and(TimeEntry::is_open) {
            return Err(corrupt(
                path,
                row - 1,
                "an unended entry must be the last row",
            ));
        }
        if let Some(previous) = entries.last().filter(|previous| start < previous.start) {
            return Err(corrupt(
                path,
                row,
                format!("start {start} is before the previous start {}", previous.start),
            ));
        }

        let entry = TimeEntry {
            start,
            stop,
            kind: EntryType::from(field(2)),
            project: field(3).to_string(),
            task_id: field(4).to_string(),
            customer: field(5).to_string(),
            description: field(6).to_string(),
        };
        if reach.is_some_and(|reach| start < reach) {
            tracing::warn!(
                path = %path.display(),
                row,
                "entry overlaps an earlier row"
            );
        }
        reach = reach.max(stop);
        entries.push(entry);
    }

    tracing::debug!(path = %path.display(), entries = entries.len(), "read day file");
    Ok(entries)
}

/// Stored times never use `now`; only literal clock values are accepted.
fn parse_stored_clock(text: &str) -> Result<Option<ClockMinute>, String> {
    if text.trim().eq_ignore_ascii_case("now") {
        return Err("'now' is not a stored time".to_string());
    }
    ClockMinute::parse(text, ClockMinute::MIDNIGHT).map_err(|err| err.to_string())
}

/// Replaces the file at `path` with `entries`.
pub fn write_entries(path: &Path, entries: &[TimeEntry]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| TrackError::io(path, io::Error::other("day file has no parent directory")))?;
    fs::create_dir_all(dir).map_err(|err| TrackError::io(dir, err))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|err| TrackError::io(dir, err))?;
    {
        let mut writer = csv::Writer::from_writer(temp.as_file_mut());
        writer
            .write_record(HEADER)
            .map_err(|err| TrackError::io(path, err.into()))?;
        for entry in entries {
            writer
                .write_record([
                    entry.start.to_string(),
                    format_optional(entry.stop),
                    entry.kind.to_string(),
                    entry.project.clone(),
                    entry.task_id.clone(),
                    entry.customer.clone(),
                    entry.description.clone(),
                ])
                .map_err(|err| TrackError::io(path, err.into()))?;
        }
        writer.flush().map_err(|err| TrackError::io(path, err))?;
    }
    temp.as_file_mut()
        .sync_all()
        .map_err(|err| TrackError::io(path, err))?;
    temp.persist(path)
        .map_err(|err| TrackError::io(path, err.error))?;

    tracing::debug!(path = %path.display(), entries = entries.len(), "wrote day file");
    Ok(())
}

fn corrupt(path: &Path, row: usize, reason: impl Into<String>) -> TrackError {
    TrackError::CorruptEntryRow {
        path: path.to_path_buf(),
        row,
        reason: reason.into(),
    }
}

fn read_error(path: &Path, row: usize, err: csv::Error) -> TrackError {
    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => TrackError::io(path, source),
        _ => corrupt(path, row, reason),
    }
}

/// Writes an empty file with just the header when none exists yet, so an
/// editor opens something that already has the column names.
pub fn ensure_day_file(path: &Path) -> Result<()> {
    let needs_header = match fs::metadata(path) {
        Ok(meta) => meta.len() == 0,
        Err(err) if err.kind() == io::ErrorKind::NotFound => true,
        Err(err) => return Err(TrackError::io(path, err)),
    };
    if needs_header {
        write_entries(path, &[])?;
    }
    Ok(())
}
