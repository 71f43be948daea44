//! Ticket-prefixed header parser
//!
//! Parses commits whose subject line looks like
//! `[PROJ-1234] type: subject`, where the bracketed ticket is optional.
//! Footer lines starting with a note keyword (`BREAKING CHANGE: ...`) open
//! a note that runs until the next keyword line or the end of the message.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use ticketlog_core::{ConfigError, Result};

use super::{CommitParser, ParserConfig};
use crate::references::{extract_references, merge_references};
use crate::types::{Note, ParsedCommit, RawCommit, Revert};

/// Subject line: optional `[KEY-123] ` ticket, type word, `: `, subject.
/// Word and digit classes are ASCII only.
static HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[[A-Za-z0-9_]+-([0-9]+)\]\s)?([A-Za-z0-9_]*)?: (.*)$")
        .expect("Invalid regex")
});

/// Revert commit: reverted header and hash
static REVERT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^revert:\s([\s\S]*?)\s*This reverts commit ([A-Za-z0-9_]*)\.")
        .expect("Invalid regex")
});

/// Parser for ticket-prefixed commit headers
pub struct TicketHeaderParser {
    note_regex: Regex,
}

impl TicketHeaderParser {
    /// Create a new parser with default configuration
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
            .expect("default note keywords always compile")
    }

    /// Create a parser with custom configuration
    pub fn with_config(config: ParserConfig) -> Result<Self> {
        let mut keywords = config.note_keywords;
        // Longest first so "BREAKING CHANGES" is not cut short by "BREAKING CHANGE"
        keywords.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternatives: Vec<String> = keywords.iter().map(|k| regex::escape(k)).collect();
        let pattern = format!(r"^\s*({}):\s*(.*)$", alternatives.join("|"));

        let note_regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidValue {
            field: "changelog.note_keywords".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self { note_regex })
    }

    /// Split the lines after the header into body text and notes
    fn parse_body<'a>(&self, lines: impl Iterator<Item = &'a str>) -> (Option<String>, Vec<Note>) {
        let mut body_lines = Vec::new();
        let mut notes: Vec<(String, Vec<&str>)> = Vec::new();

        for line in lines {
            if let Some(caps) = self.note_regex.captures(line) {
                let title = caps.get(1).map_or("", |m| m.as_str()).to_string();
                let first = caps.get(2).map_or("", |m| m.as_str());
                notes.push((title, vec![first]));
            } else if let Some((_, text)) = notes.last_mut() {
                text.push(line);
            } else {
                body_lines.push(line);
            }
        }

        let body = body_lines.join("\n").trim().to_string();
        let body = if body.is_empty() { None } else { Some(body) };

        let notes = notes
            .into_iter()
            .map(|(title, text)| Note::new(title, text.join("\n").trim()))
            .collect();

        (body, notes)
    }
}

impl Default for TicketHeaderParser {
    fn default() -> Self {
        Self::new()
    }
}

impl CommitParser for TicketHeaderParser {
    fn parse(&self, commit: &RawCommit) -> ParsedCommit {
        let message = commit.message.replace("\r\n", "\n");
        let mut lines = message.lines();
        let header = lines.next().unwrap_or("").trim_end().to_string();

        let mut parsed = ParsedCommit {
            hash: commit.hash.clone(),
            tags: commit.tags.iter().cloned().collect::<BTreeSet<_>>(),
            ..Default::default()
        };

        if let Some(caps) = HEADER_REGEX.captures(&header) {
            parsed.ticket_id = caps.get(1).map(|m| m.as_str().to_string());
            parsed.commit_type = caps.get(2).map_or("", |m| m.as_str()).to_string();
            parsed.subject = caps.get(3).map_or("", |m| m.as_str()).to_string();
        }

        let (body, notes) = self.parse_body(lines);

        if let Some(caps) = REVERT_REGEX.captures(&message) {
            let reverted = caps.get(1).map_or("", |m| m.as_str()).trim().to_string();
            parsed.commit_type = "revert".to_string();
            parsed.subject = reverted.lines().next().unwrap_or("").to_string();
            parsed.revert = Some(Revert {
                header: reverted,
                hash: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            });
        }

        let mut references = extract_references(&header);
        if let Some(body) = &body {
            merge_references(&mut references, extract_references(body));
        }
        merge_references(&mut references, commit.references.iter().cloned());

        parsed.header = header;
        parsed.body = body;
        parsed.notes = notes;
        parsed.references = references;

        trace!(
            hash = %parsed.hash,
            commit_type = %parsed.commit_type,
            ticket = ?parsed.ticket_id,
            notes = parsed.notes.len(),
            references = parsed.references.len(),
            "parsed commit"
        );
        parsed
    }
}
