//! Start command: opens a new entry in today's log.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracktime_core::{CalendarDate, ClockMinute, DayLog, EntryDetails, EntryType};

#[derive(Debug, Args)]
pub struct StartArgs {
    /// Description of the entry.
    #[arg(value_name = "DESC")]
    pub description: Option<String>,

    /// Start time (HH:MM, HHMM or "now").
    #[arg(short, long, default_value = "now")]
    pub start: ClockMinute,

    /// Service the task lives in (gh, gl, jira, linear or any tag).
    #[arg(short = 't', long = "type")]
    pub kind: Option<EntryType>,

    #[arg(short, long)]
    pub project: Option<String>,

    #[arg(short, long)]
    pub customer: Option<String>,

    /// Task ID within the project (e.g. #12 or !4 for GitLab).
    #[arg(short = 'i', long = "taskid")]
    pub task_id: Option<String>,
}

impl StartArgs {
    fn details(&self) -> EntryDetails {
        EntryDetails {
            kind: self.kind.clone().unwrap_or_default(),
            project: self.project.clone().unwrap_or_default(),
            customer: self.customer.clone().unwrap_or_default(),
            task_id: self.task_id.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        }
    }
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &StartArgs,
    base_dir: &Path,
    today: CalendarDate,
) -> Result<()> {
    let mut log =
        DayLog::load(today, base_dir).with_context(|| format!("failed to load entries for {today}"))?;
    log.start(args.start, args.details())
        .context("failed to start time entry")?;
    tracing::debug!(date = %today, entries = log.len(), "started time entry");

    match args.description.as_deref().filter(|d| !d.is_empty()) {
        Some(description) => writeln!(writer, "Started '{description}' at {}", args.start)?,
        None => writeln!(writer, "Started at {}", args.start)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u16, m: u16) -> ClockMinute {
        ClockMinute::from_hm(h, m).unwrap()
    }

    fn args(description: Option<&str>, start: ClockMinute) -> StartArgs {
        StartArgs {
            description: description.map(str::to_string),
            start,
            kind: Some(EntryType::GitLab),
            project: Some("group/app".to_string()),
            customer: Some("acme".to_string()),
            task_id: Some("#3".to_string()),
        }
    }

    #[test]
    fn test_start_writes_open_entry() {
        let temp = tempfile::tempdir().unwrap();
        let today = CalendarDate::from_ymd(2025, 3, 10).unwrap();
        let mut out = Vec::new();

        run(&mut out, &args(Some("review"), hm(9, 15)), temp.path(), today).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Started 'review' at 09:15\n");
        let log = DayLog::load(today, temp.path()).unwrap();
        assert_eq!(log.len(), 1);
        let entry = &log.entries()[0];
        assert!(entry.is_open());
        assert_eq!(entry.kind, EntryType::GitLab);
        assert_eq!(entry.customer, "acme");
        assert_eq!(entry.task_id, "#3");
    }

    #[test]
    fn test_start_closes_running_entry() {
        let temp = tempfile::tempdir().unwrap();
        let today = CalendarDate::from_ymd(2025, 3, 10).unwrap();
        let mut out = Vec::new();

        run(&mut out, &args(Some("first"), hm(9, 0)), temp.path(), today).unwrap();
        run(&mut out, &args(None, hm(10, 0)), temp.path(), today).unwrap();

        let log = DayLog::load(today, temp.path()).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].stop, Some(hm(10, 0)));
        assert!(log.entries()[1].is_open());
        assert!(String::from_utf8(out).unwrap().ends_with("Started at 10:00\n"));
    }
}
