//! Error types for document loading.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors that can occur when loading documents and answers.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a file.
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The corpus directory does not exist.
    #[error("corpus directory not found: {path}")]
    CorpusNotFound {
        /// Path that was expected to be a directory.
        path: PathBuf,
    },

    /// Invalid stemmer language.
    #[error("unsupported stemmer language: {0}")]
    InvalidLanguage(String),
}
