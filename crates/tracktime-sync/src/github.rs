use serde::Deserialize;
use tracktime_core::TimeEntry;

use crate::{GitHubConfig, SyncError, parse_json, send, task_number};

/// GitHub issues and pull requests, referenced as `#N`.
#[derive(Debug, Clone)]
pub struct GitHub {
    http: reqwest::Client,
    config: GitHubConfig,
}

#[derive(Debug, Deserialize)]
struct Issue {
    title: String,
}

impl GitHub {
    pub const fn new(http: reqwest::Client, config: GitHubConfig) -> Self {
        Self { http, config }
    }

    pub fn reference(&self, entry: &TimeEntry) -> Option<String> {
        let number = task_number(&entry.task_id, '#');
        (!number.is_empty()).then(|| format!("#{number}"))
    }

    /// Links to `/issues/N`; GitHub redirects to the pull request when N is one.
    pub fn link(&self, entry: &TimeEntry) -> Option<String> {
        let number = task_number(&entry.task_id, '#');
        if number.is_empty() {
            return None;
        }
        let repo = self.repository(&entry.project)?;
        Some(format!(
            "{}/{repo}/issues/{number}",
            self.config.root_uri.trim_end_matches('/')
        ))
    }

    /// `owner/repo`, taking the owner from the configured username when the
    /// project names only the repository.
    fn repository(&self, project: &str) -> Option<String> {
        let project = project.trim();
        match project.split('/').collect::<Vec<_>>().as_slice() {
            [""] => None,
            [repo] => self
                .config
                .username
                .as_ref()
                .map(|owner| format!("{owner}/{repo}")),
            [owner, repo] if !owner.is_empty() && !repo.is_empty() => Some(project.to_string()),
            _ => None,
        }
    }

    pub async fn fetch_description(&self, entry: &TimeEntry) -> Result<Option<String>, SyncError> {
        let Some(token) = self.config.access_token.as_deref() else {
            return Ok(None);
        };
        let number = task_number(&entry.task_id, '#');
        let Some(repo) = self.repository(&entry.project).filter(|_| !number.is_empty()) else {
            return Ok(None);
        };

        let url = format!(
            "{}/repos/{repo}/issues/{number}",
            self.config.api_root.trim_end_matches('/')
        );
        tracing::debug!(%url, "fetching GitHub issue");
        let body = send(
            self.http
                .get(&url)
                .bearer_auth(token)
                .header("Accept", "application/vnd.github+json"),
        )
        .await?;
        let issue: Issue = parse_json(&body)?;
        Ok(Some(issue.title))
    }
}
