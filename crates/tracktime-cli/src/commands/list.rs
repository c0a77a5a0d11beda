//! List command: prints one day's entries as a numbered table.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracktime_core::clock::format_optional;
use tracktime_core::{CalendarDate, ClockMinute, DayLog, OpenEntryPolicy, TimeEntry};

use crate::commands::util::format_duration;

const HEADERS: [&str; 8] = [
    "#",
    "start",
    "stop",
    "project",
    "type",
    "task ID",
    "customer",
    "description",
];
const COLUMN_GAP: &str = "   ";

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Day to list (today, yesterday, a weekday, a day of this month or YYYY-MM-DD).
    #[arg(short, long, default_value = "today")]
    pub date: CalendarDate,

    /// Only list entries for this customer.
    #[arg(short, long)]
    pub customer: Option<String>,
}

impl Default for ListArgs {
    fn default() -> Self {
        Self {
            date: CalendarDate::today(),
            customer: None,
        }
    }
}

/// Prints the entries of `args.date`. A running entry counts until `now`.
pub fn run<W: Write>(
    writer: &mut W,
    args: &ListArgs,
    base_dir: &Path,
    now: ClockMinute,
) -> Result<()> {
    let log = DayLog::load(args.date, base_dir)
        .with_context(|| format!("failed to load entries for {}", args.date))?;
    let customer = args.customer.as_deref();
    let rows: Vec<(usize, &TimeEntry)> = log
        .indexed()
        .filter(|(_, entry)| customer.is_none_or(|c| c.is_empty() || entry.customer == c))
        .collect();
    let total = log.total_duration(customer, OpenEntryPolicy::AccrueUntil(now))?;

    let title = format!("Entries for {}", args.date);
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "=".repeat(title.len()))?;
    writeln!(writer)?;
    write_table(writer, &rows)?;
    writeln!(writer)?;
    writeln!(writer, "Total: {}", format_duration(total))?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut W, rows: &[(usize, &TimeEntry)]) -> Result<()> {
    let cells: Vec<[String; 8]> = rows
        .iter()
        .map(|(index, entry)| {
            [
                index.to_string(),
                entry.start.to_string(),
                format_optional(entry.stop),
                entry.project.clone(),
                entry.kind.to_string(),
                entry.task_id.clone(),
                entry.customer.clone(),
                entry.description.clone(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = HEADERS.map(str::to_string);
    for row in std::iter::once(&header).chain(&cells) {
        let line = row
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        writeln!(writer, "{}", line.trim_end())?;
    }
    Ok(())
}
