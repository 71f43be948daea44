//! Issue reference extraction and link rewriting

use std::ops::Range;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use ticketlog_core::TicketTracker;

use crate::types::Reference;

/// Inline issue marker
static ISSUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([0-9]+)").expect("Invalid regex"));

/// User mention
static MENTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([a-zA-Z0-9_]+)").expect("Invalid regex"));

/// Closing keyword followed by one or more issue markers
static ACTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?P<action>close[sd]?|fix(?:e[sd])?|resolve[sd]?)\b[\s:]*(?P<issues>(?:#[0-9]+(?:\s*,\s*|\s+and\s+|\s+))*#[0-9]+)",
    )
    .expect("Invalid regex")
});

/// Find every issue marker in `text`, in order of appearance.
///
/// Markers that follow a closing keyword ("closes #1, #2") carry that
/// keyword as their action.
pub fn extract_references(text: &str) -> Vec<Reference> {
    let mut found: Vec<(usize, Reference)> = Vec::new();
    let mut covered: Vec<Range<usize>> = Vec::new();

    for caps in ACTION_REGEX.captures_iter(text) {
        let (Some(action), Some(issues)) = (caps.name("action"), caps.name("issues")) else {
            continue;
        };
        covered.push(issues.range());

        for issue in ISSUE_REGEX.captures_iter(issues.as_str()) {
            let whole = issue.get(0).map_or(0..0, |m| m.range());
            found.push((
                issues.start() + whole.start,
                Reference {
                    action: Some(action.as_str().to_string()),
                    issue: issue[1].to_string(),
                    prefix: "#".to_string(),
                    raw: issue[0].to_string(),
                },
            ));
        }
    }

    for issue in ISSUE_REGEX.captures_iter(text) {
        let start = issue.get(0).map_or(0, |m| m.start());
        if covered.iter().any(|r| r.contains(&start)) {
            continue;
        }
        found.push((
            start,
            Reference {
                action: None,
                issue: issue[1].to_string(),
                prefix: "#".to_string(),
                raw: issue[0].to_string(),
            },
        ));
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, r)| r).collect()
}

/// Append `extra` to `references`, skipping issues already present
pub fn merge_references(references: &mut Vec<Reference>, extra: impl IntoIterator<Item = Reference>) {
    for reference in extra {
        if !references.iter().any(|r| r.issue == reference.issue) {
            references.push(reference);
        }
    }
}

/// Inline ticket link: `[[PROJ-12]](url)`
pub fn issue_link(tracker: &TicketTracker, issue: &str) -> String {
    format!(
        "[[{}]]({})",
        tracker.ticket_label(issue),
        tracker.ticket_url(issue)
    )
}

/// Ticket link used in trailing "closes" lists: `[[PROJ-12](url)]`
pub fn trailing_issue_link(tracker: &TicketTracker, issue: &str) -> String {
    format!(
        "[[{}]({})]",
        tracker.ticket_label(issue),
        tracker.ticket_url(issue)
    )
}

/// Replace every `#123` in `text` with an inline ticket link.
///
/// Returns the rewritten text and the linked issue ids in order.
pub fn link_issues(text: &str, tracker: &TicketTracker) -> (String, Vec<String>) {
    let mut issues = Vec::new();
    let linked = ISSUE_REGEX.replace_all(text, |caps: &Captures| {
        let issue = &caps[1];
        issues.push(issue.to_string());
        issue_link(tracker, issue)
    });
    (linked.into_owned(), issues)
}

/// Replace every `@name` in `text` with a profile link under `user_url`.
///
/// Returns the rewritten text and the mentioned names in order.
pub fn link_mentions(text: &str, user_url: &str) -> (String, Vec<String>) {
    let user_url = user_url.strip_suffix('/').unwrap_or(user_url);
    let mut names = Vec::new();
    let linked = MENTION_REGEX.replace_all(text, |caps: &Captures| {
        let name = &caps[1];
        names.push(name.to_string());
        format!("[@{}]({}/{})", name, user_url, name)
    });
    (linked.into_owned(), names)
}
