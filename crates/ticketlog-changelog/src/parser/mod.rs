//! Commit parsing

mod ticket;
mod types;

pub use ticket::TicketHeaderParser;
pub use types::*;

use crate::types::{ParsedCommit, RawCommit};

/// Trait for commit parsers
pub trait CommitParser: Send + Sync {
    /// Parse a commit into its typed fields.
    ///
    /// Parsing never fails: a message that does not follow the grammar
    /// yields a commit with an empty type and subject.
    fn parse(&self, commit: &RawCommit) -> ParsedCommit;
}
