//! Changelog formatters

mod context;
mod template;

pub use context::{finalize_context, FinalizedContext};
pub use template::{render_template, TemplateFormatter, Templates};

/// Trait for changelog formatters
pub trait ChangelogFormatter: Send + Sync {
    /// Render a finalized changelog context to text
    fn format(&self, context: &FinalizedContext) -> String;
}
