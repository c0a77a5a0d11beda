//! Edit command: opens a day file in the user's editor.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};
use clap::Args;
use tracktime_core::{CalendarDate, DayLog};

use crate::Config;

const DEFAULT_EDITOR: &str = if cfg!(windows) { "notepad" } else { "vi" };

#[derive(Debug, Args)]
pub struct EditArgs {
    /// Day to edit (today, yesterday, a weekday, a day of this month or YYYY-MM-DD).
    #[arg(short, long, default_value = "today")]
    pub date: CalendarDate,
}

/// Picks the editor: configured, then `$EDITOR`, then `$VISUAL`, then the
/// platform default. Blank values are skipped.
fn resolve_editor(
    configured: Option<&str>,
    editor_var: Option<String>,
    visual_var: Option<String>,
) -> String {
    configured
        .map(str::to_string)
        .into_iter()
        .chain(editor_var)
        .chain(visual_var)
        .map(|editor| editor.trim().to_string())
        .find(|editor| !editor.is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

pub fn run(args: &EditArgs, config: &Config) -> Result<()> {
    let base_dir = config.base_dir();
    let path = DayLog::empty(args.date, &base_dir)
        .ensure_file()
        .with_context(|| format!("failed to create day file for {}", args.date))?;

    let editor = resolve_editor(
        config.editor.as_deref(),
        std::env::var("EDITOR").ok(),
        std::env::var("VISUAL").ok(),
    );
    tracing::debug!(%editor, path = %path.display(), "opening editor");

    let status = Command::new(&editor)
        .args(&config.editor_args)
        .arg(&path)
        .status()
        .with_context(|| format!("failed to start editor '{editor}'"))?;
    if !status.success() {
        bail!("editor '{editor}' exited with {status}");
    }

    validate(args.date, &base_dir, &path)
}

fn validate(date: CalendarDate, base_dir: &Path, path: &Path) -> Result<()> {
    let log = DayLog::load(date, base_dir)
        .with_context(|| format!("{} is not a valid day file", path.display()))?;
    tracing::debug!(entries = log.len(), "day file is valid");
    Ok(())
}
