//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracktime_sync::{GitHubConfig, GitLabConfig, JiraConfig, LinearConfig, SyncConfig};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the day files. A leading `~` expands to the home directory.
    pub directory: PathBuf,
    /// Editor for `tracktime edit`; falls back to `$EDITOR`, then `$VISUAL`.
    pub editor: Option<String>,
    pub editor_args: Vec<String>,
    /// Enables `tracktime sync`.
    pub sync_time: bool,
    pub github: GitHubConfig,
    pub gitlab: GitLabConfig,
    pub jira: JiraConfig,
    pub linear: LinearConfig,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("directory", &self.directory)
            .field("editor", &self.editor)
            .field("editor_args", &self.editor_args)
            .field("sync_time", &self.sync_time)
            .field("github", &self.github)
            .field("gitlab", &self.gitlab)
            .field("jira", &self.jira)
            .field("linear", &self.linear)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("~/.tracktime"),
            editor: None,
            editor_args: Vec::new(),
            sync_time: false,
            github: GitHubConfig::default(),
            gitlab: GitLabConfig::default(),
            jira: JiraConfig::default(),
            linear: LinearConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TT_*, TT_GITLAB__API_KEY for sections)
        figment = figment.merge(Env::prefixed("TT_").split("__"));

        figment.extract()
    }

    /// The directory holding the `YYYY/MM/DD` day files.
    pub fn base_dir(&self) -> PathBuf {
        expand_home(&self.directory)
    }

    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            github: self.github.clone(),
            gitlab: self.gitlab.clone(),
            jira: self.jira.clone(),
            linear: self.linear.clone(),
        }
    }
}

/// Replaces a leading `~` component with the home directory.
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

/// Returns the platform-specific config directory for tracktime.
///
/// On Linux: `~/.config/tracktime`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tracktime"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_config_path_ends_with_tracktime() {
        let path = dirs_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "tracktime");
    }

    #[test]
    fn test_default_directory_is_in_home() {
        let config = Config::default();
        let home = dirs::home_dir().unwrap();
        assert_eq!(config.base_dir(), home.join(".tracktime"));
    }

    #[test]
    fn test_expand_home_leaves_other_paths_alone() {
        assert_eq!(expand_home(Path::new("/srv/time")), PathBuf::from("/srv/time"));
        assert_eq!(expand_home(Path::new("~user/x")), PathBuf::from("~user/x"));
    }

    #[test]
    fn test_load_from_file_merges_sections() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
directory = "/data/time"
editor = "nano"
editor_args = ["-w"]
sync_time = true

[gitlab]
api_key = "glpat-secret"

[linear]
default_org = "acme"
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.base_dir(), PathBuf::from("/data/time"));
        assert_eq!(config.editor_args, vec!["-w".to_string()]);
        assert!(config.sync_time);

        let sync = config.sync_config();
        assert_eq!(sync.gitlab.api_key.as_deref(), Some("glpat-secret"));
        assert_eq!(sync.gitlab.api_root, "https://gitlab.com/api/v4");
        assert_eq!(sync.linear.default_org.as_deref(), Some("acme"));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "directory = \"/data/time\"\nfullname = \"Pat Doe\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.base_dir(), PathBuf::from("/data/time"));
        assert!(!format!("{config:?}").contains("Pat Doe"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config {
            gitlab: GitLabConfig {
                api_key: Some("glpat-secret".to_string()),
                ..GitLabConfig::default()
            },
            ..Config::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("glpat-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
