//! ticketlog core - shared library for changelog generation
//!
//! This crate provides the error taxonomy and the configuration layer
//! (types, discovery, loading and validation) used by the changelog pipeline.

pub mod config;
pub mod error;

pub use config::{ChangelogConfig, Config, TemplateConfig, TicketTracker, TrackerConfig};
pub use error::{ConfigError, Result, TicketlogError};
