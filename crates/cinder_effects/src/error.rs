//! # Effects Error Types
//!
//! Failures that reach the caller. Pool exhaustion is deliberately absent:
//! a full pool truncates an effect and is reported through
//! [`Emission`](crate::emitters::Emission), not here.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while configuring or feeding the particle engine.
#[derive(Error, Debug)]
pub enum EffectsError {
    /// Configuration text did not parse.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    ConfigFileNotFound(PathBuf),

    /// Trace-point file does not exist; the effect simply does not run.
    #[error("couldn't open {}", .0.display())]
    PointFileNotFound(PathBuf),

    /// Any other I/O failure while reading an input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for effects operations.
pub type EffectsResult<T> = Result<T, EffectsError>;
