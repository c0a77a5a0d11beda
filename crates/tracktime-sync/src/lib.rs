//! Issue tracker integration for tracktime.
//!
//! Provides:
//! - Task references and links for GitHub, GitLab, Jira and Linear entries
//! - Best-effort task titles fetched from the services' REST APIs
//! - Monthly pushing of tracked time to services that accept it

mod config;
mod github;
mod gitlab;
mod jira;
pub mod ledger;
mod linear;
mod push;

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracktime_core::{EntryType, TimeEntry, TrackError};

pub use config::{GitHubConfig, GitLabConfig, JiraConfig, LinearConfig, SyncConfig};
pub use github::GitHub;
pub use gitlab::{GitLab, GitLabTask, GitLabTaskKind};
pub use jira::Jira;
pub use ledger::{MinuteTotals, SyncKey};
pub use linear::Linear;
pub use push::{PushOutcome, TimeChange, push_month};

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("tracktime/", env!("CARGO_PKG_VERSION"));

/// Synchronisation errors.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// A setting the operation needs is not configured.
    #[error("{provider} is missing the `{key}` setting")]
    MissingConfig {
        provider: &'static str,
        key: &'static str,
    },
    /// A task ID the service cannot address.
    #[error("{provider} cannot address task '{task_id}'")]
    UnknownTask {
        provider: &'static str,
        task_id: String,
    },
    /// The `.synced` ledger could not be read or written.
    #[error("sync ledger {}: {reason}", path.display())]
    Ledger { path: PathBuf, reason: String },
    /// A day file could not be loaded.
    #[error(transparent)]
    Log(#[from] TrackError),
}

/// How a task is presented in reports.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Enrichment {
    /// Short service-specific name such as `#12`, `!4` or `ENG-7`.
    pub reference: Option<String>,
    pub link: Option<String>,
    /// The task's title when it could be fetched, otherwise the stored description.
    pub description: String,
}

/// A configured issue tracker.
#[derive(Debug, Clone)]
pub enum Provider {
    GitHub(GitHub),
    GitLab(GitLab),
    Jira(Jira),
    Linear(Linear),
}

impl Provider {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::GitHub(_) => "GitHub",
            Self::GitLab(_) => "GitLab",
            Self::Jira(_) => "Jira",
            Self::Linear(_) => "Linear",
        }
    }

    pub const fn handles(&self, kind: &EntryType) -> bool {
        matches!(
            (self, kind),
            (Self::GitHub(_), EntryType::GitHub)
                | (Self::GitLab(_), EntryType::GitLab)
                | (Self::Jira(_), EntryType::Jira)
                | (Self::Linear(_), EntryType::Linear)
        )
    }

    pub fn reference(&self, entry: &TimeEntry) -> Option<String> {
        match self {
            Self::GitHub(github) => github.reference(entry),
            Self::GitLab(gitlab) => gitlab.reference(entry),
            Self::Jira(jira) => jira.reference(entry),
            Self::Linear(linear) => linear.reference(entry),
        }
    }

    pub fn link(&self, entry: &TimeEntry) -> Option<String> {
        match self {
            Self::GitHub(github) => github.link(entry),
            Self::GitLab(gitlab) => gitlab.link(entry),
            Self::Jira(jira) => jira.link(entry),
            Self::Linear(linear) => linear.link(entry),
        }
    }

    /// Fetches the task's title. `Ok(None)` means the service has nothing to
    /// offer for this entry, for example because no credentials are set.
    pub async fn fetch_description(&self, entry: &TimeEntry) -> Result<Option<String>, SyncError> {
        match self {
            Self::GitHub(github) => github.fetch_description(entry).await,
            Self::GitLab(gitlab) => gitlab.fetch_description(entry).await,
            Self::Jira(jira) => jira.fetch_description(entry).await,
            Self::Linear(_) => Ok(None),
        }
    }

    /// Pushes time changes. Services that do not accept time push nothing.
    pub async fn push(&self, changes: Vec<TimeChange>) -> Result<Vec<PushOutcome>, SyncError> {
        match self {
            Self::GitLab(gitlab) => gitlab.push(changes).await,
            Self::GitHub(_) | Self::Jira(_) | Self::Linear(_) => Ok(Vec::new()),
        }
    }
}

/// Resolves references, links and titles for entries.
///
/// Cloning is cheap; clones share the underlying HTTP connection pool.
#[derive(Clone)]
pub struct Enricher {
    providers: Vec<Provider>,
}

impl fmt::Debug for Enricher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.providers.iter().map(Provider::name))
            .finish()
    }
}

impl Enricher {
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .map_err(SyncError::ClientBuild)?;

        Ok(Self {
            providers: vec![
                Provider::GitHub(GitHub::new(http.clone(), config.github.clone())),
                Provider::GitLab(GitLab::new(http.clone(), config.gitlab.clone())),
                Provider::Jira(Jira::new(http, config.jira.clone())),
                Provider::Linear(Linear::new(config.linear.clone())),
            ],
        })
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn provider_for(&self, kind: &EntryType) -> Option<&Provider> {
        self.providers.iter().find(|provider| provider.handles(kind))
    }

    /// Reference, link and title for `entry`.
    ///
    /// Never fails: fetch errors are logged and the stored description is used.
    pub async fn enrich(&self, entry: &TimeEntry) -> Enrichment {
        let Some(provider) = self.provider_for(&entry.kind) else {
            return Enrichment {
                description: entry.description.clone(),
                ..Enrichment::default()
            };
        };

        let fetched = match provider.fetch_description(entry).await {
            Ok(description) => description.filter(|d| !d.trim().is_empty()),
            Err(err) => {
                tracing::warn!(
                    provider = provider.name(),
                    project = %entry.project,
                    task_id = %entry.task_id,
                    error = %err,
                    "could not fetch task description"
                );
                None
            }
        };

        Enrichment {
            reference: provider.reference(entry),
            link: provider.link(entry),
            description: fetched.unwrap_or_else(|| entry.description.clone()),
        }
    }
}

/// Sends a request and returns the body of a successful response.
pub(crate) async fn send(request: reqwest::RequestBuilder) -> Result<String, SyncError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(SyncError::Api {
            status: status.as_u16(),
            message: api_message(&body),
        });
    }
    Ok(body)
}

pub(crate) fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, SyncError> {
    serde_json::from_str(body).map_err(|err| SyncError::InvalidResponse(err.to_string()))
}

/// GitHub, GitLab and Jira all report errors with a top-level `message` or
/// `errorMessages`; anything else is passed through.
fn api_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorPayload {
        message: Option<serde_json::Value>,
        #[serde(rename = "errorMessages", default)]
        error_messages: Vec<String>,
    }

    match serde_json::from_str::<ErrorPayload>(body) {
        Ok(ErrorPayload {
            message: Some(serde_json::Value::String(message)),
            ..
        }) => message,
        Ok(ErrorPayload {
            message: Some(other),
            ..
        }) => other.to_string(),
        Ok(payload) if !payload.error_messages.is_empty() => payload.error_messages.join("; "),
        _ => body.trim().to_string(),
    }
}

/// Strips one leading sigil from a task ID.
pub(crate) fn task_number(task_id: &str, sigil: char) -> &str {
    let task_id = task_id.trim();
    task_id.strip_prefix(sigil).unwrap_or(task_id)
}
