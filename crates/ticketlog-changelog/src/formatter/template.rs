//! Template-driven markdown formatter
//!
//! Every fragment is plain text with `{name}` placeholders. Substitution is
//! a single pass: inserted values are never scanned again, and unknown
//! placeholders are copied through unchanged.

use tracing::{debug, instrument};

use ticketlog_core::{TemplateConfig, TicketTracker};

use super::{ChangelogFormatter, FinalizedContext};
use crate::references::trailing_issue_link;
use crate::types::{DisplayCommit, Group, Note, BREAKING_CHANGES_TITLE};

const DEFAULT_MAIN: &str = "{header}{groups}{notes}{footer}";
const DEFAULT_HEADER: &str = "## {release}\n";
const DEFAULT_GROUP: &str = "\n### {title}\n\n{commits}";
const DEFAULT_COMMIT: &str = "* {ticket}{subject}{hash}{references}\n";
const DEFAULT_NOTES: &str = "\n### {title}\n\n{notes}";
const DEFAULT_NOTE: &str = "* {text}\n";
const DEFAULT_FOOTER: &str = "";

/// The set of template fragments a changelog is composed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Templates {
    /// Whole document: `{header}`, `{groups}`, `{notes}`, `{footer}`
    pub main: String,
    /// Release header
    pub header: String,
    /// One group: `{title}`, `{commits}`
    pub group: String,
    /// One commit: `{ticket}`, `{subject}`, `{hash}`, `{references}`, `{category}`
    pub commit: String,
    /// Breaking-changes section: `{title}`, `{notes}`
    pub notes: String,
    /// One note: `{title}`, `{text}`
    pub note: String,
    /// Document footer
    pub footer: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            main: DEFAULT_MAIN.to_string(),
            header: DEFAULT_HEADER.to_string(),
            group: DEFAULT_GROUP.to_string(),
            commit: DEFAULT_COMMIT.to_string(),
            notes: DEFAULT_NOTES.to_string(),
            note: DEFAULT_NOTE.to_string(),
            footer: DEFAULT_FOOTER.to_string(),
        }
    }
}

impl Templates {
    /// Defaults with any configured overrides applied
    pub fn from_config(config: &TemplateConfig) -> Self {
        let defaults = Self::default();
        let pick = |value: &Option<String>, default: String| value.clone().unwrap_or(default);

        Self {
            main: pick(&config.main, defaults.main),
            header: pick(&config.header, defaults.header),
            group: pick(&config.group, defaults.group),
            commit: pick(&config.commit, defaults.commit),
            notes: pick(&config.notes, defaults.notes),
            note: pick(&config.note, defaults.note),
            footer: pick(&config.footer, defaults.footer),
        }
    }
}

/// Substitute `{name}` placeholders in `template`
pub fn render_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        output.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let value = after.find('}').and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, end))
        });

        match value {
            Some((value, end)) => {
                output.push_str(value);
                rest = &after[end + 1..];
            }
            None => {
                output.push('{');
                rest = after;
            }
        }
    }

    output.push_str(rest);
    output
}

/// Formatter composing the changelog from [`Templates`]
#[derive(Debug, Clone, Default)]
pub struct TemplateFormatter {
    templates: Templates,
}

impl TemplateFormatter {
    /// Create a formatter with the default templates
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom templates
    pub fn with_templates(templates: Templates) -> Self {
        Self { templates }
    }

    /// Templates in use
    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    fn format_group(&self, group: &Group, tracker: &TicketTracker) -> String {
        let commits: String = group
            .commits
            .iter()
            .map(|commit| self.format_commit(commit, tracker))
            .collect();

        render_template(
            &self.templates.group,
            &[("title", group.title.as_str()), ("commits", commits.as_str())],
        )
    }

    fn format_commit(&self, commit: &DisplayCommit, tracker: &TicketTracker) -> String {
        let ticket = commit
            .ticket
            .as_ref()
            .map(|t| format!("[[{}]]({}) ", t.label, t.url))
            .unwrap_or_default();

        let hash = if commit.hash.is_empty() {
            String::new()
        } else {
            format!(" ({})", commit.hash)
        };

        let references = if commit.references.is_empty() {
            String::new()
        } else {
            let links: Vec<String> = commit
                .references
                .iter()
                .map(|r| trailing_issue_link(tracker, &r.issue))
                .collect();
            format!(", closes {}", links.join(" "))
        };

        render_template(
            &self.templates.commit,
            &[
                ("ticket", ticket.as_str()),
                ("subject", commit.subject.as_str()),
                ("hash", hash.as_str()),
                ("references", references.as_str()),
                ("category", commit.category.title()),
            ],
        )
    }

    fn format_notes(&self, notes: &[Note]) -> String {
        if notes.is_empty() {
            return String::new();
        }

        let lines: String = notes
            .iter()
            .map(|note| {
                render_template(
                    &self.templates.note,
                    &[("title", note.title.as_str()), ("text", note.text.as_str())],
                )
            })
            .collect();

        render_template(
            &self.templates.notes,
            &[("title", BREAKING_CHANGES_TITLE), ("notes", lines.as_str())],
        )
    }
}

impl ChangelogFormatter for TemplateFormatter {
    #[instrument(skip(self, context), fields(groups = context.groups().len(), notes = context.notes().len()))]
    fn format(&self, context: &FinalizedContext) -> String {
        let data = context.context();
        let release = data.release();
        let version = data.version.clone().unwrap_or_default();
        let date = data
            .date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let project: [(&str, &str); 5] = [
            ("release", release.as_str()),
            ("version", version.as_str()),
            ("date", date.as_str()),
            ("project_key", context.project_key()),
            ("ticket_base_url", context.ticket_base_url()),
        ];

        let header = render_template(&self.templates.header, &project);
        let footer = render_template(&self.templates.footer, &project);
        let groups: String = context
            .groups()
            .iter()
            .map(|group| self.format_group(group, context.tracker()))
            .collect();
        let notes = self.format_notes(context.notes());

        let output = render_template(
            &self.templates.main,
            &[
                ("header", header.as_str()),
                ("groups", groups.as_str()),
                ("notes", notes.as_str()),
                ("footer", footer.as_str()),
            ],
        );

        debug!(output_len = output.len(), "changelog rendered");
        output
    }
}
