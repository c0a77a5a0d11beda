use serde::Deserialize;
use tracktime_core::TimeEntry;

use crate::{JiraConfig, SyncError, parse_json, send};

/// Jira issues, referenced as `PROJECT-N`.
#[derive(Debug, Clone)]
pub struct Jira {
    http: reqwest::Client,
    config: JiraConfig,
}

#[derive(Debug, Deserialize)]
struct Issue {
    fields: IssueFields,
}

#[derive(Debug, Deserialize)]
struct IssueFields {
    summary: String,
}

impl Jira {
    pub const fn new(http: reqwest::Client, config: JiraConfig) -> Self {
        Self { http, config }
    }

    pub fn reference(&self, entry: &TimeEntry) -> Option<String> {
        let (project, task_id) = (entry.project.trim(), entry.task_id.trim());
        (!project.is_empty() && !task_id.is_empty()).then(|| format!("{project}-{task_id}"))
    }

    fn root(&self) -> Option<&str> {
        self.config
            .root
            .as_deref()
            .map(|root| root.trim_end_matches('/'))
            .filter(|root| !root.is_empty())
    }

    pub fn link(&self, entry: &TimeEntry) -> Option<String> {
        let reference = self.reference(entry)?;
        Some(format!("{}/browse/{reference}", self.root()?))
    }

    pub async fn fetch_description(&self, entry: &TimeEntry) -> Result<Option<String>, SyncError> {
        let (Some(root), Some(user), Some(key)) = (
            self.root(),
            self.config.api_user.as_deref(),
            self.config.api_key.as_deref(),
        ) else {
            return Ok(None);
        };
        let Some(reference) = self.reference(entry) else {
            return Ok(None);
        };

        let url = format!("{root}/rest/api/2/issue/{reference}");
        tracing::debug!(%url, "fetching Jira issue");
        let body = send(
            self.http
                .get(&url)
                .basic_auth(user, Some(key))
                .header("Accept", "application/json"),
        )
        .await?;
        let issue: Issue = parse_json(&body)?;
        Ok(Some(issue.fields.summary))
    }
}
