//! Sync command for pushing a month's tracked time to issue trackers.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use tracktime_core::Month;
use tracktime_sync::{Enricher, PushOutcome, push_month};

use crate::Config;

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Month to push: "this month", "last month", 1, Jan, January or YYYY-MM.
    #[arg(default_value = "this month")]
    pub month: Month,
}

pub fn run<W: Write>(writer: &mut W, args: &SyncArgs, config: &Config) -> Result<()> {
    if !config.sync_time {
        writeln!(writer, "Time sync disabled in configuration file.")?;
        return Ok(());
    }

    let enricher = Enricher::new(&config.sync_config()).context("failed to create sync client")?;
    let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
    let outcomes = runtime
        .block_on(push_month(&config.base_dir(), args.month, &enricher))
        .with_context(|| format!("failed to sync {}", args.month))?;

    if outcomes.is_empty() {
        writeln!(writer, "Nothing to sync for {}.", args.month)?;
        return Ok(());
    }
    for outcome in &outcomes {
        write_outcome(writer, outcome)?;
    }
    Ok(())
}

fn write_outcome<W: Write>(writer: &mut W, outcome: &PushOutcome) -> Result<()> {
    let key = &outcome.change.key;
    let minutes = outcome.change.minutes;
    match &outcome.result {
        Ok(()) => writeln!(writer, "Added {minutes}m to {}{}", key.project, key.task_id)?,
        Err(err) => writeln!(
            writer,
            "Failed to add {minutes}m to {}{}: {err}",
            key.project, key.task_id
        )?,
    }
    Ok(())
}
