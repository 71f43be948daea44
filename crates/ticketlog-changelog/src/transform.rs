//! Commit classification
//!
//! Turns a [`ParsedCommit`] into a [`DisplayCommit`]: resolves the category,
//! links the ticket, rewrites issue and user mentions in the subject and
//! drops trailing references already linked inline. Release commits are
//! suppressed.

use regex::Regex;
use tracing::trace;

use ticketlog_core::{ChangelogConfig, ConfigError, Result, TicketTracker};

use crate::references::{link_issues, link_mentions};
use crate::types::{
    Category, DisplayCommit, Note, ParsedCommit, TicketLink, BREAKING_CHANGES_TITLE,
};

/// Number of hash characters shown in the changelog
pub const SHORT_HASH_LEN: usize = 7;

/// Classifies parsed commits for display
#[derive(Debug, Clone)]
pub struct CommitTransformer {
    tracker: TicketTracker,
    user_url: String,
    release_tag: Regex,
}

impl CommitTransformer {
    /// Create a transformer with default changelog settings
    pub fn new(tracker: TicketTracker) -> Result<Self> {
        Self::with_config(tracker, &ChangelogConfig::default())
    }

    /// Create a transformer from the changelog configuration
    pub fn with_config(tracker: TicketTracker, config: &ChangelogConfig) -> Result<Self> {
        let release_tag =
            Regex::new(&config.release_tag_pattern).map_err(|e| ConfigError::InvalidValue {
                field: "changelog.release_tag_pattern".to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            tracker,
            user_url: config.user_url.clone(),
            release_tag,
        })
    }

    /// Tracker used for ticket links
    pub fn tracker(&self) -> &TicketTracker {
        &self.tracker
    }

    /// Whether any tag on the commit marks it as a release commit
    pub fn is_release_commit(&self, commit: &ParsedCommit) -> bool {
        commit.tags.iter().any(|tag| self.release_tag.is_match(tag))
    }

    /// Classify a commit, returning `None` when it must not be shown
    pub fn transform(&self, commit: ParsedCommit) -> Option<DisplayCommit> {
        if self.is_release_commit(&commit) {
            trace!(hash = %commit.hash, tags = ?commit.tags, "skipping release commit");
            return None;
        }

        if commit.commit_type.is_empty() && commit.subject.is_empty() && commit.notes.is_empty() {
            trace!(hash = %commit.hash, header = %commit.header, "skipping unparsed commit");
            return None;
        }

        let category = Category::from_type(&commit.commit_type);

        let notes = commit
            .notes
            .into_iter()
            .map(|note| Note::new(BREAKING_CHANGES_TITLE, note.text))
            .collect();

        let ticket = commit.ticket_id.map(|id| TicketLink {
            label: self.tracker.ticket_label(&id),
            url: self.tracker.ticket_url(&id),
            id,
        });

        let hash: String = commit.hash.chars().take(SHORT_HASH_LEN).collect();

        let (subject, linked_issues) = link_issues(&commit.subject, &self.tracker);
        let (subject, mentions) = link_mentions(&subject, &self.user_url);

        let mut references = commit.references;
        references.retain(|r| !linked_issues.contains(&r.issue));

        trace!(
            hash = %hash,
            category = %category,
            linked = linked_issues.len(),
            trailing = references.len(),
            "classified commit"
        );

        Some(DisplayCommit {
            category,
            ticket,
            subject,
            hash,
            references,
            notes,
            linked_issues,
            mentions,
            revert: commit.revert,
        })
    }
}
