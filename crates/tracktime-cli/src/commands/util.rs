//! Shared utilities for CLI commands.

use chrono::Duration;

/// Formats a duration as `H:MM`.
///
/// Negative durations (an open entry that starts after "now") are shown as
/// `0:00`.
pub fn format_duration(duration: Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    format!("{}:{:02}", total_minutes / 60, total_minutes % 60)
}

/// Shows `placeholder` for an empty label.
pub fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}
