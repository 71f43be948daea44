//! Configuration types

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for ticketlog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Project name
    pub name: Option<String>,

    /// Issue tracker configuration
    pub tracker: TrackerConfig,

    /// Changelog configuration
    pub changelog: ChangelogConfig,
}

/// Issue tracker configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Base URL of the tracker (e.g. `https://acme.atlassian.net/`)
    pub url: Option<String>,

    /// Project key prefixed to every ticket id (e.g. `PROJ`)
    #[serde(alias = "projectId")]
    pub project_key: Option<String>,
}

impl TrackerConfig {
    /// Create a tracker configuration with both required values set
    pub fn new(url: impl Into<String>, project_key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            project_key: Some(project_key.into()),
        }
    }

    /// Resolve the tracker, failing when a required value is absent
    pub fn require(&self) -> Result<TicketTracker> {
        let url = non_empty(self.url.as_deref())
            .ok_or_else(|| ConfigError::MissingField("tracker.url".to_string()))?;
        let project_key = non_empty(self.project_key.as_deref())
            .ok_or_else(|| ConfigError::MissingField("tracker.project_key".to_string()))?;

        Ok(TicketTracker::new(url, project_key))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Resolved tracker settings used to build ticket links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketTracker {
    base_url: String,
    project_key: String,
}

impl TicketTracker {
    /// Create a tracker; a single trailing slash on the URL is dropped
    pub fn new(base_url: &str, project_key: &str) -> Self {
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url);
        Self {
            base_url: base_url.to_string(),
            project_key: project_key.to_string(),
        }
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Project key
    pub fn project_key(&self) -> &str {
        &self.project_key
    }

    /// URL prefix that only needs a ticket id appended
    pub fn browse_prefix(&self) -> String {
        format!("{}/browse/{}-", self.base_url, self.project_key)
    }

    /// Ticket label, e.g. `PROJ-1001`
    pub fn ticket_label(&self, ticket_id: &str) -> String {
        format!("{}-{}", self.project_key, ticket_id)
    }

    /// Ticket URL, e.g. `https://acme.atlassian.net/browse/PROJ-1001`
    pub fn ticket_url(&self, ticket_id: &str) -> String {
        format!("{}{}", self.browse_prefix(), ticket_id)
    }
}

/// Changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Footer keywords that start a breaking-change note
    pub note_keywords: Vec<String>,

    /// Base URL for `@user` mention links
    pub user_url: String,

    /// Tags matching this pattern mark a release commit, which is skipped
    pub release_tag_pattern: String,

    /// Template overrides
    pub templates: TemplateConfig,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            note_keywords: vec![
                "BREAKING CHANGE".to_string(),
                "BREAKING CHANGES".to_string(),
            ],
            user_url: "https://github.com".to_string(),
            release_tag_pattern: r"^v\d".to_string(),
            templates: TemplateConfig::default(),
        }
    }
}

/// Optional overrides for each template fragment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Whole document
    pub main: Option<String>,
    /// Release header
    pub header: Option<String>,
    /// One commit group
    pub group: Option<String>,
    /// One commit line
    pub commit: Option<String>,
    /// Breaking-changes section wrapper
    pub notes: Option<String>,
    /// One breaking-change note
    pub note: Option<String>,
    /// Document footer
    pub footer: Option<String>,
}
