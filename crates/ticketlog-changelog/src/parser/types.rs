//! Parser configuration types

use ticketlog_core::ChangelogConfig;

/// Configuration for the commit parser
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Footer keywords that start a note (matched case-sensitively)
    pub note_keywords: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            note_keywords: vec![
                "BREAKING CHANGE".to_string(),
                "BREAKING CHANGES".to_string(),
            ],
        }
    }
}

impl ParserConfig {
    /// Build parser settings from the changelog configuration
    pub fn from_changelog(config: &ChangelogConfig) -> Self {
        Self {
            note_keywords: config.note_keywords.clone(),
        }
    }

    /// Add a note keyword
    pub fn note_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.note_keywords.push(keyword.into());
        self
    }
}
