//! Ticketlog Changelog - Ticket-linked changelog generation
//!
//! This crate parses commit messages, classifies them into categories and
//! renders a markdown changelog with links into the issue tracker.

pub mod formatter;
pub mod generator;
pub mod grouping;
pub mod parser;
pub mod references;
pub mod transform;
pub mod types;

pub use formatter::{ChangelogFormatter, FinalizedContext, TemplateFormatter, Templates};
pub use generator::ChangelogGenerator;
pub use parser::{CommitParser, ParserConfig, TicketHeaderParser};
pub use transform::CommitTransformer;
pub use types::{ChangelogContext, DisplayCommit, Group, Note, ParsedCommit, RawCommit, Reference};
