//! Typed error variants for the clipnote-config crate.
//!
//! Callers that only need a message can rely on `Display`; the binary wraps
//! these into `anyhow` at startup.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when loading, validating or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error on config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file contained invalid YAML that could not be parsed.
    #[error("YAML parse error in config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    /// The config could not be serialized for saving.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml_ng::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("Config validation error: {0}")]
    Validation(String),
}
