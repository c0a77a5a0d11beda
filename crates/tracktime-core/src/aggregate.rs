//! Folding many days of entries into a nested tally for reporting.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::Duration;

use crate::date::{CalendarDate, DateRange};
use crate::day_log::DayLog;
use crate::entry::TimeEntry;
use crate::error::{Result, TrackError};

/// Entries sharing a description.
pub type DescriptionGroups = BTreeMap<String, Vec<TimeEntry>>;
/// Descriptions grouped under a task ID.
pub type TaskGroups = BTreeMap<String, DescriptionGroups>;
/// Tasks grouped under a project.
pub type ProjectGroups = BTreeMap<String, TaskGroups>;

/// Which entries a report includes. `None` and empty strings match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub customer: Option<String>,
    pub project: Option<String>,
}

impl ReportFilter {
    pub fn matches(&self, entry: &TimeEntry) -> bool {
        let accepts = |wanted: &Option<String>, value: &str| {
            wanted
                .as_deref()
                .filter(|w| !w.is_empty())
                .is_none_or(|w| w == value)
        };
        accepts(&self.customer, &entry.customer) && accepts(&self.project, &entry.project)
    }
}

/// Closed entries grouped by customer, project, task ID and description, with
/// a running total per day.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    customers: BTreeMap<String, ProjectGroups>,
    days: BTreeMap<CalendarDate, Duration>,
}

impl Tally {
    /// Adds one entry recorded on `date`. Open entries are rejected.
    pub fn add(&mut self, date: CalendarDate, entry: TimeEntry) -> Result<()> {
        let duration = entry
            .duration(None)
            .ok_or(TrackError::UnendedEntry { date })?;

        *self.days.entry(date).or_insert_with(Duration::zero) += duration;
        self.customers
            .entry(entry.customer.clone())
            .or_default()
            .entry(entry.project.clone())
            .or_default()
            .entry(entry.task_id.clone())
            .or_default()
            .entry(entry.description.clone())
            .or_default()
            .push(entry);
        Ok(())
    }

    pub const fn customers(&self) -> &BTreeMap<String, ProjectGroups> {
        &self.customers
    }

    /// Total per day; days without entries are absent.
    pub const fn days(&self) -> &BTreeMap<CalendarDate, Duration> {
        &self.days
    }

    pub fn total(&self) -> Duration {
        self.days.values().fold(Duration::zero(), |a, b| a + *b)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn customer_total(&self, customer: &str) -> Duration {
        self.customers
            .get(customer)
            .map_or_else(Duration::zero, |projects| {
                projects
                    .values()
                    .flat_map(BTreeMap::values)
                    .map(descriptions_total)
                    .fold(Duration::zero(), |a, b| a + b)
            })
    }

    pub fn project_total(&self, customer: &str, project: &str) -> Duration {
        self.customers
            .get(customer)
            .and_then(|projects| projects.get(project))
            .map_or_else(Duration::zero, |tasks| {
                tasks.values().map(descriptions_total).fold(Duration::zero(), |a, b| a + b)
            })
    }

    pub fn task_total(&self, customer: &str, project: &str, task_id: &str) -> Duration {
        self.customers
            .get(customer)
            .and_then(|projects| projects.get(project))
            .and_then(|tasks| tasks.get(task_id))
            .map_or_else(Duration::zero, descriptions_total)
    }
}

/// Sum of every entry under a task.
pub fn descriptions_total(descriptions: &DescriptionGroups) -> Duration {
    descriptions
        .values()
        .map(|entries| entries_total(entries))
        .fold(Duration::zero(), |a, b| a + b)
}

/// Sum of closed entry durations.
pub fn entries_total(entries: &[TimeEntry]) -> Duration {
    entries
        .iter()
        .filter_map(|entry| entry.duration(None))
        .fold(Duration::zero(), |a, b| a + b)
}

/// Loads every day in `range` and tallies the entries `filter` keeps.
///
/// Fails on the first day that still has a running entry matching the filter.
pub fn aggregate(base_dir: &Path, range: DateRange, filter: &ReportFilter) -> Result<Tally> {
    let mut tally = Tally::default();
    for date in range.days() {
        let log = DayLog::load(date, base_dir)?;
        for entry in log.entries().iter().filter(|entry| filter.matches(entry)) {
            tally.add(date, entry.clone())?;
        }
    }
    tracing::debug!(%range, days = tally.days.len(), "aggregated entries");
    Ok(tally)
}
