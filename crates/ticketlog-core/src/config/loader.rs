//! Configuration loading

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{ConfigError, Result};

use super::defaults::config_file_names;
use super::types::Config;
use super::validation::validate_config;

/// Read, parse and validate a config file.
///
/// The format follows the extension: `toml`, or `yaml`/`yml`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config = parse_config(path, &content)?;

    validate_config(&config)?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

fn parse_config(path: &Path, content: &str) -> Result<Config> {
    let config = match path.extension().and_then(OsStr::to_str) {
        Some("toml") => toml::from_str(content).map_err(ConfigError::TomlError)?,
        Some("yaml" | "yml") => serde_yaml::from_str(content).map_err(ConfigError::YamlError)?,
        _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf()).into()),
    };
    Ok(config)
}

/// Find the nearest config file.
///
/// Each directory from `start_dir` up to the root is checked for the known
/// file names, first directly and then under `.github/`.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let found = start_dir
        .ancestors()
        .flat_map(|dir| [dir.to_path_buf(), dir.join(".github")])
        .flat_map(|dir| config_file_names().into_iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file());

    match &found {
        Some(path) => debug!(path = %path.display(), "found config file"),
        None => debug!(start_dir = %start_dir.display(), "no config file found"),
    }
    found
}

/// Find and load the nearest config file, returning it with its path
pub fn load_config_from_dir(dir: &Path) -> Result<(Config, PathBuf)> {
    let path = find_config(dir).ok_or_else(|| ConfigError::NotFound(dir.to_path_buf()))?;
    let config = load_config(&path)?;
    Ok((config, path))
}
