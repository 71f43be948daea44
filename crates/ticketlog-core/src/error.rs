//! Error types for ticketlog

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using TicketlogError
pub type Result<T> = std::result::Result<T, TicketlogError>;

/// Main error type for ticketlog operations
#[derive(Debug, Error)]
pub enum TicketlogError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Configuration file with an extension other than toml, yaml or yml
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// Missing required field
    #[error("Missing required configuration field: {0}")]
    MissingField(String),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

impl TicketlogError {
    /// Whether this error comes from configuration
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
