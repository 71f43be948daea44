//! Finalized rendering context

use tracing::debug;

use ticketlog_core::TicketTracker;

use crate::types::{ChangelogContext, Group, Note};

/// A changelog context with project-wide values resolved.
///
/// Only [`finalize_context`] creates one, and it offers no way to change
/// its contents afterwards.
#[derive(Debug, Clone)]
pub struct FinalizedContext {
    context: ChangelogContext,
    tracker: TicketTracker,
    ticket_base_url: String,
}

impl FinalizedContext {
    /// Grouped data
    pub fn context(&self) -> &ChangelogContext {
        &self.context
    }

    /// Groups ordered by title
    pub fn groups(&self) -> &[Group] {
        &self.context.groups
    }

    /// Breaking-change notes
    pub fn notes(&self) -> &[Note] {
        &self.context.notes
    }

    /// Tracker project key
    pub fn project_key(&self) -> &str {
        self.tracker.project_key()
    }

    /// Ticket URL prefix, e.g. `https://acme.atlassian.net/browse/PROJ-`
    pub fn ticket_base_url(&self) -> &str {
        &self.ticket_base_url
    }

    /// Tracker used for reference links
    pub fn tracker(&self) -> &TicketTracker {
        &self.tracker
    }
}

/// Inject project-wide values into the context; run once per changelog
pub fn finalize_context(context: ChangelogContext, tracker: &TicketTracker) -> FinalizedContext {
    let ticket_base_url = tracker.browse_prefix();
    debug!(
        project_key = tracker.project_key(),
        ticket_base_url = %ticket_base_url,
        groups = context.groups.len(),
        notes = context.notes.len(),
        "changelog context finalized"
    );

    FinalizedContext {
        context,
        tracker: tracker.clone(),
        ticket_base_url,
    }
}
