//! Resume command: starts a new entry labeled like an earlier one.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracktime_core::{CalendarDate, ClockMinute, DayLog, ResumeTarget};

#[derive(Debug, Args)]
pub struct ResumeArgs {
    /// Entry number from `tracktime list`; -1 resumes the latest entry.
    #[arg(default_value = "-1", allow_negative_numbers = true)]
    pub entry: ResumeTarget,

    /// Description for the new entry (defaults to the resumed entry's).
    #[arg(value_name = "DESC")]
    pub description: Option<String>,

    /// Start time (HH:MM, HHMM or "now").
    #[arg(short, long, default_value = "now")]
    pub start: ClockMinute,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &ResumeArgs,
    base_dir: &Path,
    today: CalendarDate,
) -> Result<()> {
    let mut log =
        DayLog::load(today, base_dir).with_context(|| format!("failed to load entries for {today}"))?;
    log.resume(args.entry, args.description.clone(), args.start)
        .context("failed to resume time entry")?;

    let resumed = log
        .entries()
        .iter()
        .find(|entry| entry.start == args.start)
        .map(|entry| entry.description.as_str())
        .unwrap_or_default();
    tracing::debug!(date = %today, entry = ?args.entry, "resumed time entry");

    if resumed.is_empty() {
        writeln!(writer, "Resumed at {}", args.start)?;
    } else {
        writeln!(writer, "Resumed '{resumed}' at {}", args.start)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracktime_core::{EntryDetails, EntryType, TimeEntry, TrackError};

    fn hm(h: u16, m: u16) -> ClockMinute {
        ClockMinute::from_hm(h, m).unwrap()
    }

    fn details(description: &str) -> EntryDetails {
        EntryDetails {
            kind: EntryType::Jira,
            project: "ENG".to_string(),
            customer: "acme".to_string(),
            task_id: "7".to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_resume_by_index_copies_labels() {
        let temp = tempfile::tempdir().unwrap();
        let today = CalendarDate::from_ymd(2025, 3, 10).unwrap();
        let mut log = DayLog::empty(today, temp.path());
        log.add_entry(TimeEntry::closed(hm(9, 0), hm(10, 0), details("triage")))
            .unwrap();
        log.add_entry(TimeEntry::closed(hm(10, 0), hm(11, 0), EntryDetails::default()))
            .unwrap();
        log.save().unwrap();

        let args = ResumeArgs {
            entry: ResumeTarget::Index(1),
            description: None,
            start: hm(13, 0),
        };
        let mut out = Vec::new();
        run(&mut out, &args, temp.path(), today).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Resumed 'triage' at 13:00\n");
        let log = DayLog::load(today, temp.path()).unwrap();
        let last = log.entries().last().unwrap();
        assert!(last.is_open());
        assert_eq!(last.kind, EntryType::Jira);
        assert_eq!(last.task_id, "7");
    }

    #[test]
    fn test_resume_latest_falls_back_to_previous_day() {
        let temp = tempfile::tempdir().unwrap();
        let today = CalendarDate::from_ymd(2025, 3, 10).unwrap();
        let mut yesterday = DayLog::empty(today.add_days(-1), temp.path());
        yesterday
            .add_entry(TimeEntry::closed(hm(16, 0), hm(17, 0), details("triage")))
            .unwrap();
        yesterday.save().unwrap();

        let args = ResumeArgs {
            entry: ResumeTarget::Latest,
            description: Some("more triage".to_string()),
            start: hm(9, 0),
        };
        let mut out = Vec::new();
        run(&mut out, &args, temp.path(), today).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Resumed 'more triage' at 09:00\n"
        );
        let log = DayLog::load(today, temp.path()).unwrap();
        assert_eq!(log.entries()[0].customer, "acme");
    }

    #[test]
    fn test_resume_out_of_range() {
        let temp = tempfile::tempdir().unwrap();
        let today = CalendarDate::from_ymd(2025, 3, 10).unwrap();
        let args = ResumeArgs {
            entry: ResumeTarget::Index(3),
            description: None,
            start: hm(9, 0),
        };

        let err = run(&mut Vec::new(), &args, temp.path(), today).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackError>(),
            Some(TrackError::EntryIndexOutOfRange { index: 3, len: 0 })
        ));
    }
}
