//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// A single rule a configuration broke.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("{field} must be greater than zero")]
    ZeroDelay { field: &'static str },

    #[error("{field} is {value} ms, the maximum is {max} ms")]
    DelayOutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
}

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Every rule the configuration broke
    #[error("Invalid configuration: {}", join(.violations))]
    Invalid { violations: Vec<ConfigViolation> },
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
