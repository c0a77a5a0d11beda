use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracktime_core::{CalendarDate, ClockMinute};

use tracktime_cli::commands::{edit, list, report, resume, start, stop, sync};
use tracktime_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr, command output to stdout
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    let base_dir = config.base_dir();

    let mut stdout = io::stdout().lock();
    match &cli.command {
        Some(Commands::Start(args)) => {
            start::run(&mut stdout, args, &base_dir, CalendarDate::today())?;
        }
        Some(Commands::Stop(args)) => {
            stop::run(&mut stdout, args, &base_dir, CalendarDate::today())?;
        }
        Some(Commands::Resume(args)) => {
            resume::run(&mut stdout, args, &base_dir, CalendarDate::today())?;
        }
        Some(Commands::List(args)) => {
            list::run(&mut stdout, args, &base_dir, ClockMinute::now())?;
        }
        Some(Commands::Edit(args)) => {
            edit::run(args, &config)?;
        }
        Some(Commands::Report(args)) => {
            report::run(&mut stdout, args, &config, CalendarDate::today())?;
        }
        Some(Commands::Sync(args)) => {
            sync::run(&mut stdout, args, &config)?;
        }
        None => {
            // No subcommand, list today
            list::run(&mut stdout, &list::ListArgs::default(), &base_dir, ClockMinute::now())?;
        }
    }

    Ok(())
}
