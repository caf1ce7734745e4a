//! Configuration system for clipnote.
//!
//! This crate provides configuration loading, saving, validation, and default
//! values for the annotation panel. It includes:
//!
//! - The [`Config`] struct and its YAML persistence
//! - Default value functions used as serde defaults ([`defaults`])
//! - The [`LogLevel`] setting shared with the binary's file logger
//! - Typed errors ([`ConfigError`])

pub mod config;
pub mod defaults;
mod error;
mod types;

pub use config::{CONFIG_PATH_ENV, Config};
pub use error::ConfigError;
pub use types::LogLevel;
