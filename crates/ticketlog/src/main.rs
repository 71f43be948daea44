//! Ticketlog - Ticket-linked changelog generator
//!
//! Reads a JSON object `{ "version"?, "date"?, "commits": [...] }` on stdin
//! and prints the rendered changelog on stdout. Configuration is discovered
//! from the current directory.

use std::io::{self, Read, Write};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use ticketlog_changelog::{ChangelogGenerator, RawCommit};
use ticketlog_core::config::load_config_from_dir;

/// Release description read from stdin
#[derive(Debug, Deserialize)]
struct ChangelogInput {
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    date: Option<NaiveDate>,
    commits: Vec<RawCommit>,
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let (config, config_path) = load_config_from_dir(&cwd)
        .with_context(|| format!("failed to load configuration from {}", cwd.display()))?;
    info!(
        path = %config_path.display(),
        project = config.name.as_deref().unwrap_or("unnamed"),
        "loaded configuration"
    );

    let generator = ChangelogGenerator::new(&config).context("invalid configuration")?;

    let mut raw = String::new();
    io::stdin()
        .read_to_string(&mut raw)
        .context("failed to read stdin")?;
    let input = parse_input(&raw)?;

    let output = render(&generator, input);

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("failed to write changelog")?;
    stdout.flush()?;

    Ok(())
}

fn parse_input(raw: &str) -> anyhow::Result<ChangelogInput> {
    serde_json::from_str(raw).context("stdin is not a valid changelog input document")
}

fn render(generator: &ChangelogGenerator, input: ChangelogInput) -> String {
    let mut context = generator.generate(input.version.as_deref(), &input.commits);
    if let Some(date) = input.date {
        context = context.with_date(date);
    }
    generator.format(context)
}

/// Console logging to stderr, controlled by RUST_LOG (default: warn)
fn init_tracing() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_filter(console_filter),
        )
        .init();
}
