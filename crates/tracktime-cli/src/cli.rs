//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::edit::EditArgs;
use crate::commands::list::ListArgs;
use crate::commands::report::ReportArgs;
use crate::commands::resume::ResumeArgs;
use crate::commands::start::StartArgs;
use crate::commands::stop::StopArgs;
use crate::commands::sync::SyncArgs;

/// Plain-text time tracker.
///
/// Keeps one CSV file per day under the configured directory. Running
/// without a subcommand lists today's entries.
#[derive(Debug, Parser)]
#[command(name = "tracktime", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a new time entry.
    Start(StartArgs),

    /// Stop the running time entry.
    Stop(StopArgs),

    /// Start a new entry copying an earlier one.
    Resume(ResumeArgs),

    /// List the entries of a day.
    List(ListArgs),

    /// Open a day file in an editor.
    Edit(EditArgs),

    /// Summarise time over a date range.
    Report(ReportArgs),

    /// Push the month's time to external services.
    Sync(SyncArgs),
}
