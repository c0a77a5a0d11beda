//! Error taxonomy for day logs and their value types.

use std::path::PathBuf;

use thiserror::Error;

use crate::clock::ClockMinute;
use crate::date::CalendarDate;

/// Errors raised by the core.
///
/// Nothing here is recovered locally: every variant propagates to the caller,
/// which decides how to render it.
#[derive(Debug, Error)]
pub enum TrackError {
    /// A clock time did not match `HHMM`, `H:MM`, `HH:MM` or `now`.
    #[error("invalid time '{input}' (expected HH:MM, HHMM or 'now')")]
    InvalidTimeFormat { input: String },

    /// A date token was not recognised.
    #[error("invalid date '{input}'")]
    InvalidDateFormat { input: String },

    /// A month token was not recognised.
    #[error("invalid month '{input}'")]
    InvalidMonthFormat { input: String },

    /// A date range whose start lies after its end.
    #[error("start date {start} must not be after end date {end}")]
    InvalidDateRange {
        start: CalendarDate,
        end: CalendarDate,
    },

    /// A day file row could not be parsed.
    #[error("corrupt entry in {} at row {row}: {reason}", path.display())]
    CorruptEntryRow {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    /// `stop` was requested but the last entry is already closed.
    #[error("no time entry to stop")]
    NoOpenEntry,

    /// `resume` found nothing today or on the previous day.
    #[error("no time entry to resume")]
    NoEntryToResume,

    /// A 1-based entry index outside the day log.
    #[error("entry {index} does not exist (the log has {len} entries)")]
    EntryIndexOutOfRange { index: usize, len: usize },

    /// Closing an entry before it started.
    #[error("cannot stop a time entry at {stop} before it was started at {start}")]
    StopBeforeStart {
        start: ClockMinute,
        stop: ClockMinute,
    },

    /// A duration was requested over an open entry where that is not allowed.
    #[error("unended time entry on {date}")]
    UnendedEntry { date: CalendarDate },

    /// Reading or writing a day file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrackError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TrackError> = std::result::Result<T, E>;
