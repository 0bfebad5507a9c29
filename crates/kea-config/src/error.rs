//! Error types for kea configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::{de, ser};

/// Errors that can occur when loading or processing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A setting holds a value outside its allowed range.
    #[error("invalid value for {key} in {path}: {reason}")]
    InvalidValue {
        /// Config file that set the value.
        path: PathBuf,
        /// Dotted key of the setting.
        key: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// An effective setting holds a value outside its allowed range.
    #[error("invalid value for {key}: {reason}")]
    InvalidSetting {
        /// Dotted key of the setting.
        key: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },

    /// Failed to serialize the effective settings.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[source] ser::Error),
}
