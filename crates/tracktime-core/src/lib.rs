//! Core domain logic for tracktime.
//!
//! This crate contains the types and logic for:
//! - Clock minutes, calendar dates and months, including the relative forms
//!   accepted on the command line
//! - Time entries and the per-day log that keeps them ordered and
//!   non-overlapping
//! - Reading and writing day files
//! - Aggregating entries across a date range for reports
//!
//! Nothing here reads the wall clock implicitly: operations that depend on
//! "now" or "today" take it as a parameter.

pub mod aggregate;
pub mod clock;
pub mod date;
pub mod day_log;
pub mod entry;
pub mod error;
pub mod month;
pub mod storage;

pub use aggregate::{ReportFilter, Tally, aggregate};
pub use clock::ClockMinute;
pub use date::{CalendarDate, DateRange};
pub use day_log::{DayLog, OpenEntryPolicy, ResumeTarget};
pub use entry::{EntryDetails, EntryType, TimeEntry};
pub use error::{Result, TrackError};
pub use month::Month;
