//! Report command for summarising time over a date range.
//!
//! This module implements `tracktime report`. The range comes from positional
//! dates, a shorthand flag (`--thisweek`, `--lastmonth`, ...) or `--month` and
//! `--year`, and defaults to last month. Entries are grouped by customer,
//! project, task and description; task lines carry the reference, link and
//! title resolved by the configured services. Output is indented text or JSON.

use std::collections::BTreeMap;
use std::io::Write;

use anyhow::{Context, Result};
use chrono::Duration;
use clap::{ArgGroup, Args, ValueEnum};
use serde::Serialize;
use tracktime_core::aggregate::{DescriptionGroups, TaskGroups, descriptions_total, entries_total};
use tracktime_core::{CalendarDate, DateRange, Month, ReportFilter, Tally, aggregate};
use tracktime_sync::{Enricher, Enrichment};

use crate::Config;
use crate::commands::util::{format_duration, or_placeholder};

#[derive(Debug, Args)]
#[command(group(
    ArgGroup::new("period").args([
        "today",
        "yesterday",
        "this_week",
        "last_week",
        "this_month",
        "last_month",
        "this_year",
        "last_year",
    ])
))]
pub struct ReportArgs {
    /// First day of the range (defaults to the start of last month).
    pub start: Option<CalendarDate>,

    /// Last day of the range (defaults to the end of last month).
    pub end: Option<CalendarDate>,

    #[arg(long)]
    pub today: bool,

    #[arg(long)]
    pub yesterday: bool,

    /// Sunday through Saturday of the current week.
    #[arg(long = "thisweek")]
    pub this_week: bool,

    #[arg(long = "lastweek")]
    pub last_week: bool,

    #[arg(long = "thismonth")]
    pub this_month: bool,

    #[arg(long = "lastmonth")]
    pub last_month: bool,

    #[arg(long = "thisyear")]
    pub this_year: bool,

    #[arg(long = "lastyear")]
    pub last_year: bool,

    /// A whole month: 1, 01, Jan, January or YYYY-MM. Combines with --year.
    #[arg(short, long, conflicts_with = "period")]
    pub month: Option<Month>,

    /// A whole year, or the year of --month.
    #[arg(short, long, conflicts_with = "period")]
    pub year: Option<i32>,

    /// Only report on this customer.
    #[arg(short, long)]
    pub customer: Option<String>,

    /// Only report on this project.
    #[arg(short, long)]
    pub project: Option<String>,

    /// Order of the lines within each level.
    #[arg(short, long, value_enum, default_value_t = SortBy::Alphabetical)]
    pub sort: SortBy,

    /// Reverse the sort order.
    #[arg(long)]
    pub desc: bool,

    /// Do not break projects down by task.
    #[arg(long = "no-taskgrain")]
    pub no_task_grain: bool,

    /// Do not break tasks down by description.
    #[arg(long = "no-descriptiongrain")]
    pub no_description_grain: bool,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    const fn layout(&self) -> Layout {
        Layout {
            sort: self.sort,
            descending: self.desc,
            task_grain: !self.no_task_grain,
            description_grain: !self.no_description_grain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortBy {
    #[default]
    #[value(name = "alphabetical", aliases = ["alpha", "a"])]
    Alphabetical,
    #[value(name = "time-spent", aliases = ["time", "t"])]
    TimeSpent,
}

/// Which levels a report shows and how they are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub sort: SortBy,
    pub descending: bool,
    pub task_grain: bool,
    pub description_grain: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            sort: SortBy::Alphabetical,
            descending: false,
            task_grain: true,
            description_grain: true,
        }
    }
}

/// `(customer, project, task ID)`.
pub type TaskKey = (String, String, String);
pub type Enrichments = BTreeMap<TaskKey, Enrichment>;

// ========== Range Resolution ==========

/// Works out the reporting range. Positional dates override either end of
/// the range picked by the flags.
pub fn resolve_range(args: &ReportArgs, today: CalendarDate) -> Result<DateRange> {
    let period = if args.today {
        DateRange::single(today)
    } else if args.yesterday {
        DateRange::single(today.add_days(-1))
    } else if args.this_week {
        DateRange::this_week(today)
    } else if args.last_week {
        DateRange::last_week(today)
    } else if args.this_month {
        DateRange::this_month(today)
    } else if args.last_month {
        DateRange::last_month(today)
    } else if args.this_year {
        year_range(today.year())?
    } else if args.last_year {
        year_range(today.year() - 1)?
    } else {
        match (args.month, args.year) {
            (Some(month), Some(year)) => Month::new(year, month.month())
                .with_context(|| format!("invalid year {year}"))?
                .range(),
            (Some(month), None) => month.range(),
            (None, Some(year)) => year_range(year)?,
            (None, None) => DateRange::last_month(today),
        }
    };

    let start = args.start.unwrap_or_else(|| period.start());
    let end = args.end.unwrap_or_else(|| period.end());
    Ok(DateRange::new(start, end)?)
}

fn year_range(year: i32) -> Result<DateRange> {
    DateRange::year(year).with_context(|| format!("invalid year {year}"))
}

// ========== Report Model ==========

#[derive(Debug, Serialize)]
pub struct Report {
    pub start: CalendarDate,
    pub end: CalendarDate,
    pub total_minutes: i64,
    pub customers: Vec<CustomerLine>,
    pub days: Vec<DayLine>,
}

#[derive(Debug, Serialize)]
pub struct CustomerLine {
    pub customer: String,
    pub minutes: i64,
    pub projects: Vec<ProjectLine>,
}

#[derive(Debug, Serialize)]
pub struct ProjectLine {
    pub project: String,
    pub minutes: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<TaskLine>,
    /// Descriptions across all tasks, when tasks are not shown.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<DescriptionLine>,
}

#[derive(Debug, Serialize)]
pub struct TaskLine {
    pub task_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub minutes: i64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub descriptions: Vec<DescriptionLine>,
}

#[derive(Debug, Serialize)]
pub struct DescriptionLine {
    pub description: String,
    pub minutes: i64,
}

#[derive(Debug, Serialize)]
pub struct DayLine {
    pub date: CalendarDate,
    pub minutes: i64,
}

trait Line {
    fn label(&self) -> &str;
    fn minutes(&self) -> i64;
}

impl Line for CustomerLine {
    fn label(&self) -> &str {
        &self.customer
    }
    fn minutes(&self) -> i64 {
        self.minutes
    }
}

impl Line for ProjectLine {
    fn label(&self) -> &str {
        &self.project
    }
    fn minutes(&self) -> i64 {
        self.minutes
    }
}

impl Line for TaskLine {
    fn label(&self) -> &str {
        &self.task_id
    }
    fn minutes(&self) -> i64 {
        self.minutes
    }
}

impl Line for DescriptionLine {
    fn label(&self) -> &str {
        &self.description
    }
    fn minutes(&self) -> i64 {
        self.minutes
    }
}

/// Sorts by label, or by minutes with the label breaking ties.
fn sort_lines<T: Line>(lines: &mut [T], layout: Layout) {
    match layout.sort {
        SortBy::Alphabetical => lines.sort_by(|a, b| a.label().cmp(b.label())),
        SortBy::TimeSpent => lines.sort_by(|a, b| {
            a.minutes()
                .cmp(&b.minutes())
                .then_with(|| a.label().cmp(b.label()))
        }),
    }
    if layout.descending {
        lines.reverse();
    }
}

/// Builds the report model from a tally.
pub fn build_report(
    tally: &Tally,
    range: DateRange,
    layout: Layout,
    enrichments: &Enrichments,
) -> Report {
    let mut customers: Vec<CustomerLine> = tally
        .customers()
        .iter()
        .map(|(customer, projects)| {
            let mut projects: Vec<ProjectLine> = projects
                .iter()
                .map(|(project, tasks)| {
                    ProjectLine {
                        project: project.clone(),
                        minutes: tally.project_total(customer, project).num_minutes(),
                        tasks: task_lines(customer, project, tasks, layout, enrichments),
                        descriptions: if layout.task_grain {
                            Vec::new()
                        } else {
                            merged_descriptions(tasks, layout)
                        },
                    }
                })
                .collect();
            sort_lines(&mut projects, layout);
            CustomerLine {
                customer: customer.clone(),
                minutes: tally.customer_total(customer).num_minutes(),
                projects,
            }
        })
        .collect();
    sort_lines(&mut customers, layout);

    Report {
        start: range.start(),
        end: range.end(),
        total_minutes: tally.total().num_minutes(),
        customers,
        days: tally
            .days()
            .iter()
            .map(|(date, duration)| DayLine {
                date: *date,
                minutes: duration.num_minutes(),
            })
            .collect(),
    }
}

fn task_lines(
    customer: &str,
    project: &str,
    tasks: &TaskGroups,
    layout: Layout,
    enrichments: &Enrichments,
) -> Vec<TaskLine> {
    if !layout.task_grain {
        return Vec::new();
    }

    let mut lines: Vec<TaskLine> = tasks
        .iter()
        .map(|(task_id, groups)| {
            let key = (customer.to_string(), project.to_string(), task_id.clone());
            let enrichment = enrichments.get(&key);
            // a title that repeats one of the listed descriptions adds nothing
            let title = enrichment
                .map(|e| e.description.clone())
                .filter(|t| !t.is_empty() && !(layout.description_grain && groups.contains_key(t)));
            let descriptions = if layout.description_grain {
                description_lines(groups, layout)
            } else {
                Vec::new()
            };
            TaskLine {
                task_id: task_id.clone(),
                reference: enrichment.and_then(|e| e.reference.clone()),
                link: enrichment.and_then(|e| e.link.clone()),
                title,
                minutes: descriptions_total(groups).num_minutes(),
                descriptions,
            }
        })
        .collect();
    sort_lines(&mut lines, layout);
    lines
}

fn description_lines(groups: &DescriptionGroups, layout: Layout) -> Vec<DescriptionLine> {
    let mut lines: Vec<DescriptionLine> = groups
        .iter()
        .map(|(description, entries)| DescriptionLine {
            description: description.clone(),
            minutes: entries_total(entries).num_minutes(),
        })
        .collect();
    sort_lines(&mut lines, layout);
    lines
}

fn merged_descriptions(tasks: &TaskGroups, layout: Layout) -> Vec<DescriptionLine> {
    if !layout.description_grain {
        return Vec::new();
    }
    let mut merged: BTreeMap<&str, Duration> = BTreeMap::new();
    for groups in tasks.values() {
        for (description, entries) in groups {
            *merged
                .entry(description.as_str())
                .or_insert_with(Duration::zero) += entries_total(entries);
        }
    }
    let mut lines: Vec<DescriptionLine> = merged
        .into_iter()
        .map(|(description, duration)| DescriptionLine {
            description: description.to_string(),
            minutes: duration.num_minutes(),
        })
        .collect();
    sort_lines(&mut lines, layout);
    lines
}

// ========== Enrichment ==========

/// Resolves every task that a configured service recognises. Lookups run one
/// after the other; failures fall back to the stored description.
///
/// A task whose entries carry different types is left unresolved, since no
/// single service owns it.
pub async fn enrich_tasks(tally: &Tally, enricher: &Enricher) -> Enrichments {
    let mut enrichments = Enrichments::new();
    for (customer, projects) in tally.customers() {
        for (project, tasks) in projects {
            for (task_id, groups) in tasks {
                if task_id.is_empty() {
                    continue;
                }
                let mut entries = groups.values().flatten();
                let Some(entry) = entries.next() else {
                    continue;
                };
                if entries.any(|other| other.kind != entry.kind) {
                    tracing::debug!(%project, %task_id, "task has entries of several types, not enriching");
                    continue;
                }
                if enricher.provider_for(&entry.kind).is_none() {
                    continue;
                }
                let key = (customer.clone(), project.clone(), task_id.clone());
                enrichments.insert(key, enricher.enrich(entry).await);
            }
        }
    }
    enrichments
}

// ========== Text Output ==========

fn write_line<W: Write>(writer: &mut W, minutes: i64, depth: usize, label: &str) -> Result<()> {
    let duration = format_duration(Duration::minutes(minutes));
    writeln!(writer, "{duration:>6}  {}{label}", "  ".repeat(depth))?;
    Ok(())
}

fn task_label(task: &TaskLine) -> String {
    let mut label = task
        .reference
        .clone()
        .unwrap_or_else(|| or_placeholder(&task.task_id, "(no task)").to_string());
    if let Some(title) = &task.title {
        label.push(' ');
        label.push_str(title);
    }
    if let Some(link) = &task.link {
        label.push_str(" <");
        label.push_str(link);
        label.push('>');
    }
    label
}

/// Writes the human-readable report.
pub fn write_report<W: Write>(writer: &mut W, report: &Report) -> Result<()> {
    let title = if report.start == report.end {
        format!("Time report for {}", report.start)
    } else {
        format!("Time report for {} to {}", report.start, report.end)
    };
    writeln!(writer, "{title}")?;
    writeln!(writer, "{}", "=".repeat(title.len()))?;
    writeln!(writer)?;

    if report.customers.is_empty() {
        writeln!(writer, "No time recorded.")?;
        return Ok(());
    }

    for customer in &report.customers {
        let name = or_placeholder(&customer.customer, "(no customer)");
        write_line(writer, customer.minutes, 0, name)?;
        for project in &customer.projects {
            let name = or_placeholder(&project.project, "(no project)");
            write_line(writer, project.minutes, 1, name)?;
            for task in &project.tasks {
                write_line(writer, task.minutes, 2, &task_label(task))?;
                for description in &task.descriptions {
                    let text = or_placeholder(&description.description, "(no description)");
                    write_line(writer, description.minutes, 3, text)?;
                }
            }
            for description in &project.descriptions {
                let text = or_placeholder(&description.description, "(no description)");
                write_line(writer, description.minutes, 2, text)?;
            }
        }
    }

    writeln!(writer)?;
    writeln!(writer, "Daily totals")?;
    writeln!(writer, "------------")?;
    for day in &report.days {
        write_line(writer, day.minutes, 0, &day.date.to_string())?;
    }

    writeln!(writer)?;
    writeln!(
        writer,
        "Total: {}",
        format_duration(Duration::minutes(report.total_minutes))
    )?;
    Ok(())
}

// ========== Public Interface ==========

/// Runs the report command.
pub fn run<W: Write>(
    writer: &mut W,
    args: &ReportArgs,
    config: &Config,
    today: CalendarDate,
) -> Result<()> {
    let range = resolve_range(args, today)?;
    let filter = ReportFilter {
        customer: args.customer.clone(),
        project: args.project.clone(),
    };
    let tally = aggregate(&config.base_dir(), range, &filter)
        .with_context(|| format!("failed to aggregate entries for {range}"))?;
    let layout = args.layout();

    let enrichments = if layout.task_grain && !tally.is_empty() {
        let enricher =
            Enricher::new(&config.sync_config()).context("failed to create sync client")?;
        let runtime = tokio::runtime::Runtime::new().context("failed to initialize tokio runtime")?;
        runtime.block_on(enrich_tasks(&tally, &enricher))
    } else {
        Enrichments::new()
    };

    let report = build_report(&tally, range, layout, &enrichments);
    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        write_report(writer, &report)?;
    }
    Ok(())
}
