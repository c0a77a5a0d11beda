//! Stop command: closes the running entry in today's log.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracktime_core::{CalendarDate, ClockMinute, DayLog};

#[derive(Debug, Args)]
pub struct StopArgs {
    /// Stop time (HH:MM, HHMM or "now").
    #[arg(short, long, default_value = "now")]
    pub stop: ClockMinute,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &StopArgs,
    base_dir: &Path,
    today: CalendarDate,
) -> Result<()> {
    let mut log =
        DayLog::load(today, base_dir).with_context(|| format!("failed to load entries for {today}"))?;
    log.stop(args.stop).context("failed to stop time entry")?;
    tracing::debug!(date = %today, "stopped time entry");

    writeln!(writer, "Stopped at {}", args.stop)?;
    Ok(())
}
