//! Time entries: one labeled `[start, stop)` interval within a day.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Serialize, Serializer};

use crate::clock::ClockMinute;

/// The service a time entry's task lives in.
///
/// Known services normalise their short aliases (`gh`, `gl`); any other tag is
/// kept verbatim so hand-written files survive a round trip.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum EntryType {
    #[default]
    Untyped,
    GitHub,
    GitLab,
    Jira,
    Linear,
    Other(String),
}

impl EntryType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Untyped => "",
            Self::GitHub => "github",
            Self::GitLab => "gitlab",
            Self::Jira => "jira",
            Self::Linear => "linear",
            Self::Other(tag) => tag,
        }
    }

    pub const fn is_untyped(&self) -> bool {
        matches!(self, Self::Untyped)
    }
}

impl From<&str> for EntryType {
    fn from(tag: &str) -> Self {
        let tag = tag.trim();
        match tag.to_lowercase().as_str() {
            "" => Self::Untyped,
            "gh" | "github" => Self::GitHub,
            "gl" | "gitlab" => Self::GitLab,
            "jira" => Self::Jira,
            "linear" => Self::Linear,
            _ => Self::Other(tag.to_string()),
        }
    }
}

impl FromStr for EntryType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EntryType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Everything about an entry except its interval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDetails {
    pub kind: EntryType,
    pub project: String,
    pub customer: String,
    pub task_id: String,
    pub description: String,
}

/// One labeled interval. `stop` is `None` while the entry is still running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    pub start: ClockMinute,
    pub stop: Option<ClockMinute>,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub project: String,
    pub customer: String,
    pub task_id: String,
    pub description: String,
}

impl TimeEntry {
    /// An open entry starting at `start`.
    pub fn open(start: ClockMinute, details: EntryDetails) -> Self {
        let EntryDetails {
            kind,
            project,
            customer,
            task_id,
            description,
        } = details;
        Self {
            start,
            stop: None,
            kind,
            project,
            customer,
            task_id,
            description,
        }
    }

    /// A closed entry covering `[start, stop)`.
    pub fn closed(start: ClockMinute, stop: ClockMinute, details: EntryDetails) -> Self {
        Self {
            stop: Some(stop),
            ..Self::open(start, details)
        }
    }

    /// Copies the labels of this entry, for resuming it.
    pub fn details(&self) -> EntryDetails {
        EntryDetails {
            kind: self.kind.clone(),
            project: self.project.clone(),
            customer: self.customer.clone(),
            task_id: self.task_id.clone(),
            description: self.description.clone(),
        }
    }

    pub const fn is_open(&self) -> bool {
        self.stop.is_none()
    }

    /// Duration of the entry. An open entry accrues until `now` when one is
    /// given and has no duration otherwise.
    pub fn duration(&self, now: Option<ClockMinute>) -> Option<Duration> {
        self.stop.or(now).map(|stop| stop - self.start)
    }

    /// True when this entry's interval intersects `[start, stop)`; an open
    /// entry extends to the end of the day.
    pub fn overlaps(&self, other: &Self) -> bool {
        let ends_after =
            |entry: &Self, instant: ClockMinute| entry.stop.is_none_or(|stop| stop > instant);
        match self.start.cmp(&other.start) {
            std::cmp::Ordering::Less => ends_after(self, other.start),
            std::cmp::Ordering::Greater => ends_after(other, self.start),
            std::cmp::Ordering::Equal => true,
        }
    }
}

impl fmt::Display for TimeEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.stop {
            Some(stop) => write!(f, "{}-{stop}", self.start)?,
            None => write!(f, "{}-", self.start)?,
        }
        write!(
            f,
            " project={} type={} taskid={} customer={} description={}",
            self.project, self.kind, self.task_id, self.customer, self.description
        )
    }
}
