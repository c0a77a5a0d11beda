use std::fmt;

use serde::Deserialize;
use tracktime_core::TimeEntry;

use crate::push::{PushOutcome, TimeChange};
use crate::{GitLabConfig, SyncError, parse_json, send};

/// Whether a GitLab task ID names an issue (`#N`) or a merge request (`!N`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitLabTaskKind {
    Issue,
    MergeRequest,
}

/// A parsed GitLab task ID. Bare numbers are issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GitLabTask<'a> {
    pub kind: GitLabTaskKind,
    pub number: &'a str,
}

impl<'a> GitLabTask<'a> {
    pub fn parse(task_id: &'a str) -> Option<Self> {
        let task_id = task_id.trim();
        let (kind, number) = match task_id.strip_prefix('!') {
            Some(number) => (GitLabTaskKind::MergeRequest, number),
            None => (
                GitLabTaskKind::Issue,
                task_id.strip_prefix('#').unwrap_or(task_id),
            ),
        };
        (!number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()))
            .then_some(Self { kind, number })
    }

    const fn collection(self) -> &'static str {
        match self.kind {
            GitLabTaskKind::Issue => "issues",
            GitLabTaskKind::MergeRequest => "merge_requests",
        }
    }
}

impl fmt::Display for GitLabTask<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sigil = match self.kind {
            GitLabTaskKind::Issue => '#',
            GitLabTaskKind::MergeRequest => '!',
        };
        write!(f, "{sigil}{}", self.number)
    }
}

/// GitLab issues and merge requests. The only service time is pushed to.
#[derive(Debug, Clone)]
pub struct GitLab {
    http: reqwest::Client,
    config: GitLabConfig,
}

#[derive(Debug, Deserialize)]
struct Issuable {
    title: String,
}

impl GitLab {
    pub const fn new(http: reqwest::Client, config: GitLabConfig) -> Self {
        Self { http, config }
    }

    pub fn reference(&self, entry: &TimeEntry) -> Option<String> {
        GitLabTask::parse(&entry.task_id).map(|task| task.to_string())
    }

    pub fn link(&self, entry: &TimeEntry) -> Option<String> {
        let task = GitLabTask::parse(&entry.task_id)?;
        let project = entry.project.trim();
        if project.is_empty() {
            return None;
        }
        Some(format!(
            "{}/{project}/-/{}/{}",
            self.config.root_uri.trim_end_matches('/'),
            task.collection(),
            task.number
        ))
    }

    /// API URL of the issue or merge request; the project path is encoded as
    /// a single segment.
    fn api_url(&self, project: &str, task: GitLabTask<'_>) -> String {
        format!(
            "{}/projects/{}/{}/{}",
            self.config.api_root.trim_end_matches('/'),
            urlencoding::encode(project.trim()),
            task.collection(),
            task.number
        )
    }

    pub async fn fetch_description(&self, entry: &TimeEntry) -> Result<Option<String>, SyncError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Ok(None);
        };
        let Some(task) = GitLabTask::parse(&entry.task_id) else {
            return Ok(None);
        };
        if entry.project.trim().is_empty() {
            return Ok(None);
        }

        let url = self.api_url(&entry.project, task);
        tracing::debug!(%url, "fetching GitLab task");
        let body = send(self.http.get(&url).header("PRIVATE-TOKEN", api_key)).await?;
        let issuable: Issuable = parse_json(&body)?;
        Ok(Some(issuable.title))
    }

    /// Adds each change to the task's spent time, one request per task.
    ///
    /// Individual failures are reported in the outcomes; only a missing API
    /// key fails the whole push.
    pub async fn push(&self, changes: Vec<TimeChange>) -> Result<Vec<PushOutcome>, SyncError> {
        if changes.is_empty() {
            return Ok(Vec::new());
        }
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(SyncError::MissingConfig {
                provider: "GitLab",
                key: "api_key",
            })?;

        let mut outcomes = Vec::with_capacity(changes.len());
        for change in changes {
            let result = match GitLabTask::parse(&change.key.task_id) {
                Some(task) => {
                    let url = format!("{}/add_spent_time", self.api_url(&change.key.project, task));
                    tracing::info!(
                        project = %change.key.project,
                        task = %task,
                        minutes = change.minutes,
                        "adding spent time"
                    );
                    send(
                        self.http
                            .post(&url)
                            .header("PRIVATE-TOKEN", api_key)
                            .query(&[("duration", format!("{}m", change.minutes))]),
                    )
                    .await
                    .map(drop)
                }
                None => Err(SyncError::UnknownTask {
                    provider: "GitLab",
                    task_id: change.key.task_id.clone(),
                }),
            };
            outcomes.push(PushOutcome { change, result });
        }
        Ok(outcomes)
    }
}
