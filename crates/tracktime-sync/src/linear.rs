use tracktime_core::TimeEntry;

use crate::LinearConfig;

/// Linear issues, referenced as `TEAM-N`. Titles are not fetched.
#[derive(Debug, Clone)]
pub struct Linear {
    config: LinearConfig,
}

impl Linear {
    pub const fn new(config: LinearConfig) -> Self {
        Self { config }
    }

    pub fn reference(&self, entry: &TimeEntry) -> Option<String> {
        let (team, number) = (entry.project.trim(), entry.task_id.trim());
        (!team.is_empty() && !number.is_empty()).then(|| format!("{team}-{number}"))
    }

    pub fn link(&self, entry: &TimeEntry) -> Option<String> {
        let org = self.config.default_org.as_deref()?;
        let reference = self.reference(entry)?;
        Some(format!("https://linear.app/{org}/issue/{reference}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracktime_core::{ClockMinute, EntryDetails, EntryType};

    fn entry(project: &str, task_id: &str) -> TimeEntry {
        TimeEntry::open(
            ClockMinute::MIDNIGHT,
            EntryDetails {
                kind: EntryType::Linear,
                project: project.to_string(),
                task_id: task_id.to_string(),
                ..EntryDetails::default()
            },
        )
    }

    #[test]
    fn link_uses_default_org() {
        let linear = Linear::new(LinearConfig {
            default_org: Some("acme".to_string()),
        });
        assert_eq!(linear.reference(&entry("ENG", "7")).as_deref(), Some("ENG-7"));
        assert_eq!(
            linear.link(&entry("ENG", "7")).as_deref(),
            Some("https://linear.app/acme/issue/ENG-7")
        );
        assert_eq!(linear.link(&entry("", "7")), None);
    }

    #[test]
    fn no_org_means_no_link() {
        let linear = Linear::new(LinearConfig::default());
        assert_eq!(linear.link(&entry("ENG", "7")), None);
        assert!(linear.reference(&entry("ENG", "7")).is_some());
    }
}
