//! Changelog generation

use std::cmp::Ordering;

use tracing::{debug, info, instrument};

use ticketlog_core::config::validate_config;
use ticketlog_core::{Config, Result};

use crate::formatter::{finalize_context, ChangelogFormatter, TemplateFormatter, Templates};
use crate::grouping::{collect_notes, group_commits, NoteOrder};
use crate::parser::{CommitParser, ParserConfig, TicketHeaderParser};
use crate::transform::CommitTransformer;
use crate::types::{ChangelogContext, DisplayCommit, Note, RawCommit};

/// Changelog generator
pub struct ChangelogGenerator {
    parser: Box<dyn CommitParser>,
    transformer: CommitTransformer,
    formatter: Box<dyn ChangelogFormatter>,
    note_order: Option<Box<NoteOrder>>,
}

impl ChangelogGenerator {
    /// Create a generator from project configuration.
    ///
    /// Fails when the tracker URL or project key is missing or any value is
    /// malformed, before any commit is looked at.
    pub fn new(config: &Config) -> Result<Self> {
        validate_config(config)?;
        let tracker = config.tracker.require()?;
        let parser =
            TicketHeaderParser::with_config(ParserConfig::from_changelog(&config.changelog))?;
        let transformer = CommitTransformer::with_config(tracker, &config.changelog)?;
        let formatter =
            TemplateFormatter::with_templates(Templates::from_config(&config.changelog.templates));

        debug!(
            project_key = transformer.tracker().project_key(),
            base_url = transformer.tracker().base_url(),
            "changelog generator configured"
        );

        Ok(Self {
            parser: Box::new(parser),
            transformer,
            formatter: Box::new(formatter),
            note_order: None,
        })
    }

    /// Use a custom parser
    pub fn with_parser<P: CommitParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Box::new(parser);
        self
    }

    /// Use a custom formatter
    pub fn with_formatter<F: ChangelogFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    /// Sort breaking-change notes with `order` instead of keeping commit order
    pub fn with_note_order<F>(mut self, order: F) -> Self
    where
        F: Fn(&Note, &Note) -> Ordering + Send + Sync + 'static,
    {
        self.note_order = Some(Box::new(order));
        self
    }

    /// Parse, classify and group commits
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn generate(&self, version: Option<&str>, commits: &[RawCommit]) -> ChangelogContext {
        info!(
            version = version.unwrap_or("unreleased"),
            commit_count = commits.len(),
            "generating changelog"
        );

        let shown: Vec<DisplayCommit> = commits
            .iter()
            .map(|commit| self.parser.parse(commit))
            .filter_map(|parsed| self.transformer.transform(parsed))
            .collect();
        let shown_count = shown.len();

        let notes = collect_notes(&shown, self.note_order.as_deref());
        let groups = group_commits(shown);

        debug!(
            shown = shown_count,
            dropped = commits.len() - shown_count,
            group_count = groups.len(),
            note_count = notes.len(),
            "changelog groups built"
        );

        let mut context = ChangelogContext::new(version);
        context.groups = groups;
        context.notes = notes;
        context
    }

    /// Finalize and render a context
    pub fn format(&self, context: ChangelogContext) -> String {
        let finalized = finalize_context(context, self.transformer.tracker());
        self.formatter.format(&finalized)
    }

    /// Generate and format in one step
    #[instrument(skip(self, commits), fields(commit_count = commits.len()))]
    pub fn generate_formatted(&self, version: Option<&str>, commits: &[RawCommit]) -> String {
        let context = self.generate(version, commits);
        let output = self.format(context);
        debug!(output_len = output.len(), "changelog formatted");
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formatter::FinalizedContext;
    use crate::types::{ParsedCommit, Reference};
    use ticketlog_core::{ConfigError, TicketlogError, TrackerConfig};

    /// Treats every message as a feature whose subject is the first line
    struct FeatureOnlyParser;

    impl CommitParser for FeatureOnlyParser {
        fn parse(&self, commit: &RawCommit) -> ParsedCommit {
            let header = commit.message.lines().next().unwrap_or("").to_string();
            ParsedCommit {
                commit_type: "feat".to_string(),
                subject: header.clone(),
                header,
                hash: commit.hash.clone(),
                ..Default::default()
            }
        }
    }

    /// Renders one `title: count` line per group
    struct SummaryFormatter;

    impl ChangelogFormatter for SummaryFormatter {
        fn format(&self, context: &FinalizedContext) -> String {
            context
                .groups()
                .iter()
                .map(|g| format!("{}: {}\n", g.title, g.commits.len()))
                .collect()
        }
    }

    fn config() -> Config {
        Config {
            tracker: TrackerConfig::new("https://my-organization.atlassian.net/", "PROJ"),
            ..Default::default()
        }
    }

    fn generator() -> ChangelogGenerator {
        ChangelogGenerator::new(&config()).unwrap()
    }

    fn commit(hash: &str, message: &str) -> RawCommit {
        RawCommit::new(hash, message)
    }

    fn render(commits: &[RawCommit]) -> String {
        generator().generate_formatted(None, commits)
    }

    #[test]
    fn test_missing_tracker_url_is_fatal() {
        let config = Config {
            tracker: TrackerConfig {
                url: None,
                project_key: Some("PROJ".to_string()),
            },
            ..Default::default()
        };
        let Err(err) = ChangelogGenerator::new(&config) else {
            panic!("generator built without tracker url");
        };
        assert!(matches!(
            err,
            TicketlogError::Config(ConfigError::MissingField(ref field)) if field == "tracker.url"
        ));
    }

    #[test]
    fn test_missing_project_key_is_fatal() {
        let config = Config {
            tracker: TrackerConfig {
                url: Some("https://my-organization.atlassian.net".to_string()),
                project_key: None,
            },
            ..Default::default()
        };
        assert!(ChangelogGenerator::new(&config).is_err());
    }

    #[test]
    fn test_invalid_tracker_url_is_fatal() {
        let config = Config {
            tracker: TrackerConfig::new("not a url", "PROJ"),
            ..Default::default()
        };
        let Err(err) = ChangelogGenerator::new(&config) else {
            panic!("generator built with invalid tracker url");
        };
        assert!(err.is_config());
    }

    #[test]
    fn test_ticket_and_breaking_change() {
        let output = render(&[
            commit(
                "a1b2c3d4e5f6",
                "[PROJ-1001] fix: avoid a bug\n\nBREAKING CHANGE: The Change is huge #1.",
            ),
            commit("b2c3d4e5f6a1", "perf: make it faster\n\n closes #1002, #1003"),
            commit("c3d4e5f6a1b2", "revert: bad commit"),
            commit("d4e5f6a1b2c3", "fix: oops"),
        ]);

        assert!(output.contains(
            "* [[PROJ-1001]](https://my-organization.atlassian.net/browse/PROJ-1001) avoid a bug"
        ));
        assert!(output.contains("* make it faster"));
        assert!(output.contains(
            ", closes [[PROJ-1002](https://my-organization.atlassian.net/browse/PROJ-1002)] [[PROJ-1003](https://my-organization.atlassian.net/browse/PROJ-1003)]"
        ));
        assert!(output.contains("The Change is huge #1."));
        assert!(output.contains("Bug Fixes"));
        assert!(output.contains("Performance Improvements"));
        assert!(output.contains("Reverts"));
        assert!(output.contains("bad commit"));
        assert!(output.contains("BREAKING CHANGES"));

        for raw_type in ["feat", "fix", "perf", "revert"] {
            assert!(!output.contains(raw_type), "output leaks type {raw_type}");
        }
        assert!(!output.contains("***:**"));
    }

    #[test]
    fn test_group_and_commit_order() {
        let output = render(&[
            commit("d4e5f6a1b2c3", "fix: oops"),
            commit("c3d4e5f6a1b2", "revert: bad commit"),
            commit("a1b2c3d4e5f6", "[PROJ-1001] fix: avoid a bug"),
        ]);

        let bug_fixes = output.find("### Bug Fixes").unwrap();
        let reverts = output.find("### Reverts").unwrap();
        assert!(bug_fixes < reverts);

        let ticketed = output.find("avoid a bug").unwrap();
        let plain = output.find("oops").unwrap();
        assert!(ticketed < plain);
    }

    #[test]
    fn test_issue_in_subject_is_linked() {
        let output = render(&[commit(
            "a1b2c3d",
            "[PROJ-1004] feat: addresses the issue brought up in #933",
        )]);
        assert!(output
            .contains("[[PROJ-933]](https://my-organization.atlassian.net/browse/PROJ-933)"));
    }

    #[test]
    fn test_subject_issue_not_repeated_in_closes_list() {
        let output = render(&[commit("a1b2c3d", "feat: fix #988")]);
        assert!(output
            .contains("[[PROJ-988]](https://my-organization.atlassian.net/browse/PROJ-988)"));
        assert!(!output.contains("closes [[PROJ-988]"));
    }

    #[test]
    fn test_issue_rendered_once_with_reference_hint() {
        let output = render(&[commit("a1b2c3d", "feat: handle #123\n\ncloses #123")
            .with_reference(Reference::new("123"))]);
        assert_eq!(output.matches("PROJ-123]").count(), 1);
    }

    #[test]
    fn test_user_mention_is_linked() {
        let output = render(&[
            commit("a1b2c3d", "feat: issue brought up by @alice on Friday"),
            commit("b2c3d4e", "feat: issue brought up by @santobiasatti! on Friday"),
        ]);
        assert!(output.contains("[@alice](https://github.com/alice)"));
        assert!(output.contains("[@santobiasatti](https://github.com/santobiasatti)"));
    }

    #[test]
    fn test_breaking_change_commits_are_kept() {
        let output = render(&[
            commit("a000001", "docs: make it clear\n\nBREAKING CHANGE: The Change is huge #2."),
            commit(
                "a000002",
                "[TNRE-1009] style: make it easier to read for @pollovignolo\n\nBREAKING CHANGE: The Change is huge #3.",
            ),
            commit(
                "a000003",
                "[TNRE-1010] refactor: change a lot of code\n\nBREAKING CHANGE: The Change is huge #4.",
            ),
            commit("a000004", "test: more tests\n\nBREAKING CHANGE: The Change is huge #5."),
            commit("a000005", "chore: bump\n\nBREAKING CHANGE: The Change is huge #6."),
        ]);

        for title in ["Documentation", "Styles", "Code Refactoring", "Tests", "Chores"] {
            assert!(output.contains(title), "missing group {title}");
        }
        assert_eq!(output.matches("BREAKING CHANGES").count(), 1);
        assert!(!output.contains("BREAKING CHANGE\n"));
    }

    #[test]
    fn test_breaking_changes_keyword_variant() {
        let output = render(&[commit("a1b2c3d", "feat: bump\n\nBREAKING CHANGES: Also works :)")]);
        assert!(output.contains("### BREAKING CHANGES\n\n* Also works :)"));
    }

    #[test]
    fn test_release_commit_excluded() {
        let output = render(&[
            commit("a1b2c3d", "feat: bump\n\nBREAKING CHANGES: Also works :)").with_tag("v1.4.0"),
            commit("b2c3d4e", "feat: some more features"),
        ]);
        assert!(output.contains("some more features"));
        assert!(!output.contains("bump"));
        assert!(!output.contains("BREAKING"));
    }

    #[test]
    fn test_feature_type_aliases() {
        let context = generator().generate(
            None,
            &[
                commit("a000001", "add: include missing type"),
                commit("a000002", "change: update users API token"),
                commit("a000003", "remove: external API no longer supported"),
            ],
        );
        assert_eq!(context.groups.len(), 1);
        assert_eq!(context.groups[0].title, "Features");
        assert_eq!(context.commit_count(), 3);

        let output = generator().format(context);
        assert!(output.contains("* include missing type"));
        assert!(output.contains("* update users API token"));
        assert!(output.contains("* external API no longer supported"));
    }

    #[test]
    fn test_type_case_insensitive() {
        let context = generator().generate(
            None,
            &[
                commit("a000001", "TEST: add new tests"),
                commit("a000002", "Chore: update package.json version"),
                commit("a000003", "FEat: created new users module"),
            ],
        );
        let titles: Vec<_> = context.groups.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, vec!["Chores", "Features", "Tests"]);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let commits = vec![
            commit("a1b2c3d4e5f6", "[PROJ-7] feat: seven #8 by @bob\n\nBREAKING CHANGE: x"),
            commit("b2c3d4e5f6a1", "fix: two\n\nresolves #9"),
            commit("c3d4e5f6a1b2", "unparseable message"),
        ];
        let first = generator().generate_formatted(Some("1.0.0"), &commits);
        let second = generator().generate_formatted(Some("1.0.0"), &commits);
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_document_layout() {
        let output = generator().generate_formatted(
            Some("1.0.0"),
            &[
                commit("a1b2c3d4e5f6", "[PROJ-1001] fix: avoid a bug\n\nBREAKING CHANGE: huge"),
                commit("b2c3d4e5f6a1", "feat: new thing"),
            ],
        );

        assert_eq!(
            output,
            "## 1.0.0\n\
             \n### Bug Fixes\n\n\
             * [[PROJ-1001]](https://my-organization.atlassian.net/browse/PROJ-1001) avoid a bug (a1b2c3d)\n\
             \n### Features\n\n\
             * new thing (b2c3d4e)\n\
             \n### BREAKING CHANGES\n\n\
             * huge\n"
        );
    }

    #[test]
    fn test_custom_note_order() {
        let generator = generator().with_note_order(|a: &Note, b: &Note| a.text.cmp(&b.text));
        let context = generator.generate(
            None,
            &[
                commit("a000001", "feat: one\n\nBREAKING CHANGE: zebra"),
                commit("a000002", "feat: two\n\nBREAKING CHANGE: apple"),
            ],
        );
        let texts: Vec<_> = context.notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["apple", "zebra"]);
    }

    #[test]
    fn test_custom_parser_replaces_header_grammar() {
        let generator = generator().with_parser(FeatureOnlyParser);
        let context = generator.generate(
            None,
            &[
                commit("a000001", "no type prefix here"),
                commit("a000002", "fix: still a feature"),
            ],
        );

        assert_eq!(context.groups.len(), 1);
        assert_eq!(context.groups[0].title, "Features");
        let subjects: Vec<_> = context.groups[0]
            .commits
            .iter()
            .map(|c| c.subject.as_str())
            .collect();
        assert_eq!(subjects, vec!["fix: still a feature", "no type prefix here"]);
    }

    #[test]
    fn test_custom_formatter_receives_finalized_context() {
        let generator = generator().with_formatter(SummaryFormatter);
        let output = generator.generate_formatted(
            Some("1.0.0"),
            &[
                commit("a000001", "feat: one"),
                commit("a000002", "feat: two"),
                commit("a000003", "fix: three"),
            ],
        );
        assert_eq!(output, "Bug Fixes: 1\nFeatures: 2\n");
    }

    #[test]
    fn test_configured_templates_are_used() {
        let mut config = config();
        config.changelog.templates.footer = Some("\n-- {project_key}\n".to_string());
        let generator = ChangelogGenerator::new(&config).unwrap();

        let output = generator.generate_formatted(None, &[commit("a1b2c3d", "feat: x")]);
        assert!(output.starts_with("## Unreleased\n"));
        assert!(output.ends_with("\n-- PROJ\n"));
    }

    #[test]
    fn test_empty_history() {
        let context = generator().generate(Some("0.1.0"), &[]);
        assert!(context.is_empty());
        assert_eq!(generator().format(context), "## 0.1.0\n");
    }
}
