//! Per-service settings.
//!
//! These are embedded in the CLI's configuration file as `[github]`,
//! `[gitlab]`, `[jira]` and `[linear]` tables. Every field has a default so a
//! partial table merges cleanly.

use std::fmt;

use serde::{Deserialize, Serialize};

const REDACTED: &str = "[REDACTED]";

fn redact(secret: Option<&String>) -> Option<&'static str> {
    secret.map(|_| REDACTED)
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub github: GitHubConfig,
    pub gitlab: GitLabConfig,
    pub jira: JiraConfig,
    pub linear: LinearConfig,
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("github", &self.github)
            .field("gitlab", &self.gitlab)
            .field("jira", &self.jira)
            .field("linear", &self.linear)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub access_token: Option<String>,
    /// Owner used for projects given without one.
    pub username: Option<String>,
    pub root_uri: String,
    pub api_root: String,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            username: None,
            root_uri: "https://github.com".to_string(),
            api_root: "https://api.github.com".to_string(),
        }
    }
}

impl fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("access_token", &redact(self.access_token.as_ref()))
            .field("username", &self.username)
            .field("root_uri", &self.root_uri)
            .field("api_root", &self.api_root)
            .finish()
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitLabConfig {
    pub api_key: Option<String>,
    pub api_root: String,
    pub root_uri: String,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_root: "https://gitlab.com/api/v4".to_string(),
            root_uri: "https://gitlab.com".to_string(),
        }
    }
}

impl fmt::Debug for GitLabConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitLabConfig")
            .field("api_key", &redact(self.api_key.as_ref()))
            .field("api_root", &self.api_root)
            .field("root_uri", &self.root_uri)
            .finish()
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// Base URL of the Jira instance, e.g. `https://example.atlassian.net`.
    pub root: Option<String>,
    pub api_user: Option<String>,
    pub api_key: Option<String>,
}

impl fmt::Debug for JiraConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JiraConfig")
            .field("root", &self.root)
            .field("api_user", &self.api_user)
            .field("api_key", &redact(self.api_key.as_ref()))
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearConfig {
    pub default_org: Option<String>,
}
