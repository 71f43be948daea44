//! Changelog types

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical title given to every breaking-change note
pub const BREAKING_CHANGES_TITLE: &str = "BREAKING CHANGES";

/// A commit as supplied by the history reader
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCommit {
    /// Full commit message (subject line, optional body and footers)
    pub message: String,
    /// Full commit hash
    #[serde(default)]
    pub hash: String,
    /// Tag names pointing at this commit
    #[serde(default)]
    pub tags: Vec<String>,
    /// References already discovered by a pre-pass
    #[serde(default)]
    pub references: Vec<Reference>,
}

impl RawCommit {
    /// Create a new raw commit
    pub fn new(hash: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            hash: hash.into(),
            tags: Vec::new(),
            references: Vec::new(),
        }
    }

    /// Attach a tag name
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Attach a known reference
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }
}

/// An issue mentioned in commit text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Closing keyword governing the mention ("closes", "fixes", ...)
    #[serde(default)]
    pub action: Option<String>,
    /// Numeric issue id as text
    pub issue: String,
    /// Marker preceding the id
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Matched source text
    #[serde(default)]
    pub raw: String,
}

fn default_prefix() -> String {
    "#".to_string()
}

impl Reference {
    /// Create a reference to an issue id
    pub fn new(issue: impl Into<String>) -> Self {
        let issue = issue.into();
        Self {
            action: None,
            raw: format!("#{}", issue),
            issue,
            prefix: default_prefix(),
        }
    }

    /// Set the closing keyword
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// A breaking-change note from a commit footer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Keyword that introduced the note
    pub title: String,
    /// Note body
    pub text: String,
}

impl Note {
    /// Create a note
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Details of a revert commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revert {
    /// Header of the reverted commit
    pub header: String,
    /// Hash of the reverted commit
    pub hash: String,
}

/// A commit split into its typed fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedCommit {
    /// Ticket id from a `[KEY-1234]` prefix
    pub ticket_id: Option<String>,
    /// Free-form type tag, empty when the header did not match
    pub commit_type: String,
    /// Subject text, empty when the header did not match
    pub subject: String,
    /// First line of the message
    pub header: String,
    /// Lines after the header, excluding notes
    pub body: Option<String>,
    /// Full commit hash
    pub hash: String,
    /// Tag names pointing at this commit
    pub tags: BTreeSet<String>,
    /// Breaking-change notes
    pub notes: Vec<Note>,
    /// Issues mentioned anywhere outside notes, unique by issue id
    pub references: Vec<Reference>,
    /// Set for `revert:` commits carrying a "This reverts commit" line
    pub revert: Option<Revert>,
}

/// Changelog category a commit type maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Features,
    BugFixes,
    PerformanceImprovements,
    Reverts,
    Documentation,
    Styles,
    CodeRefactoring,
    Tests,
    Chores,
    Uncategorized,
}

/// Lowercase type tag to category
const CATEGORY_TABLE: &[(&str, Category)] = &[
    ("feat", Category::Features),
    ("add", Category::Features),
    ("change", Category::Features),
    ("remove", Category::Features),
    ("fix", Category::BugFixes),
    ("perf", Category::PerformanceImprovements),
    ("revert", Category::Reverts),
    ("docs", Category::Documentation),
    ("style", Category::Styles),
    ("refactor", Category::CodeRefactoring),
    ("test", Category::Tests),
    ("chore", Category::Chores),
];

impl Category {
    /// Resolve a type tag, ignoring case
    pub fn from_type(commit_type: &str) -> Self {
        let commit_type = commit_type.to_lowercase();
        CATEGORY_TABLE
            .iter()
            .find(|(tag, _)| *tag == commit_type)
            .map(|(_, category)| *category)
            .unwrap_or(Self::Uncategorized)
    }

    /// Section title
    pub fn title(&self) -> &'static str {
        match self {
            Self::Features => "Features",
            Self::BugFixes => "Bug Fixes",
            Self::PerformanceImprovements => "Performance Improvements",
            Self::Reverts => "Reverts",
            Self::Documentation => "Documentation",
            Self::Styles => "Styles",
            Self::CodeRefactoring => "Code Refactoring",
            Self::Tests => "Tests",
            Self::Chores => "Chores",
            Self::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A resolved tracker ticket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLink {
    /// Numeric ticket id
    pub id: String,
    /// Label such as `PROJ-1001`
    pub label: String,
    /// Ticket URL
    pub url: String,
}

/// A commit ready to be rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayCommit {
    /// Category the commit is grouped under
    pub category: Category,
    /// Ticket from the header prefix
    pub ticket: Option<TicketLink>,
    /// Subject with issue and user links
    pub subject: String,
    /// Abbreviated hash
    pub hash: String,
    /// Trailing references not already linked in the subject
    pub references: Vec<Reference>,
    /// Notes with canonical titles
    pub notes: Vec<Note>,
    /// Issue ids linked inline in the subject, in order of appearance
    pub linked_issues: Vec<String>,
    /// User names linked inline in the subject
    pub mentions: Vec<String>,
    /// Revert details
    pub revert: Option<Revert>,
}

impl DisplayCommit {
    /// Ticket id used as the primary sort key
    pub fn ticket_id(&self) -> Option<&str> {
        self.ticket.as_ref().map(|t| t.id.as_str())
    }
}

/// Commits sharing one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Category title
    pub title: String,
    /// Commits in this group
    pub commits: Vec<DisplayCommit>,
}

impl Group {
    /// Create a new group
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            commits: Vec::new(),
        }
    }

    /// Add a commit to the group
    pub fn add_commit(&mut self, commit: DisplayCommit) {
        self.commits.push(commit);
    }

    /// Check if group is empty
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}

/// Grouped and sorted changelog data for one release
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChangelogContext {
    /// Version being released, `None` for unreleased changes
    pub version: Option<String>,
    /// Release date
    pub date: Option<NaiveDate>,
    /// Groups ordered by title
    pub groups: Vec<Group>,
    /// Breaking-change notes
    pub notes: Vec<Note>,
}

impl ChangelogContext {
    /// Create an empty context
    pub fn new(version: Option<&str>) -> Self {
        Self {
            version: version.map(str::to_string),
            ..Default::default()
        }
    }

    /// Set the date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Release label, e.g. `1.2.0 (2024-05-01)` or `Unreleased`
    pub fn release(&self) -> String {
        let version = self.version.as_deref().unwrap_or("Unreleased");
        match self.date {
            Some(date) => format!("{} ({})", version, date.format("%Y-%m-%d")),
            None => version.to_string(),
        }
    }

    /// Number of commits across all groups
    pub fn commit_count(&self) -> usize {
        self.groups.iter().map(|g| g.commits.len()).sum()
    }

    /// Check if context has any content
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.notes.is_empty()
    }
}
