//! Configuration validation

use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::{ConfigError, Result};

use super::types::Config;

/// Validate configuration
///
/// Checks the shape of values that are present. Whether the tracker values
/// exist at all is decided when a changelog run starts, see
/// [`TrackerConfig::require`](super::TrackerConfig::require).
pub fn validate_config(config: &Config) -> Result<()> {
    debug!("validating configuration");
    validate_tracker(config)?;
    validate_changelog(config)?;
    debug!("configuration validation passed");
    Ok(())
}

fn validate_tracker(config: &Config) -> Result<()> {
    if let Some(url) = config.tracker.url.as_deref().filter(|u| !u.is_empty()) {
        validate_url("tracker.url", url)?;
    }

    if let Some(key) = config.tracker.project_key.as_deref() {
        if key.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidValue {
                field: "tracker.project_key".to_string(),
                message: "project key cannot contain whitespace".to_string(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_changelog(config: &Config) -> Result<()> {
    let changelog = &config.changelog;

    if changelog.note_keywords.is_empty() {
        return Err(ConfigError::InvalidValue {
            field: "changelog.note_keywords".to_string(),
            message: "at least one keyword is required".to_string(),
        }
        .into());
    }

    for (i, keyword) in changelog.note_keywords.iter().enumerate() {
        if keyword.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: format!("changelog.note_keywords[{}]", i),
                message: "keyword cannot be empty".to_string(),
            }
            .into());
        }
    }

    validate_url("changelog.user_url", &changelog.user_url)?;

    if let Err(e) = Regex::new(&changelog.release_tag_pattern) {
        return Err(ConfigError::InvalidValue {
            field: "changelog.release_tag_pattern".to_string(),
            message: e.to_string(),
        }
        .into());
    }

    Ok(())
}

fn validate_url(field: &str, value: &str) -> Result<()> {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        Ok(url) => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("unsupported scheme '{}'", url.scheme()),
        }
        .into()),
        Err(e) => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: e.to_string(),
        }
        .into()),
    }
}
