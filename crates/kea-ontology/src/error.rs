//! Error types for the kea-ontology crate.

use std::{io, path::PathBuf};

use kea_document::DocumentError;
use thiserror::Error;

/// Errors that can occur when loading or compiling an ontology.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// Failed to read the ontology source.
    #[error("failed to read ontology {path}: {source}")]
    ReadFile {
        /// Path to the source file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The ontology source is not valid JSON for the expected schema.
    #[error("failed to parse ontology {path}: {source}")]
    Parse {
        /// Path to the source file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Two concepts share the same canonical label.
    #[error("duplicate concept label: {0}")]
    DuplicateLabel(String),

    /// A concept has a label that normalizes to no tokens.
    #[error("concept label has no indexable words: {0:?}")]
    EmptyLabel(String),

    /// A relation points at a label that is not defined.
    #[error("concept {from:?} links to unknown concept {to:?}")]
    UnknownConcept {
        /// Label of the concept holding the link.
        from: String,
        /// Label that could not be found.
        to: String,
    },

    /// Text analysis could not be set up.
    #[error(transparent)]
    Analysis(#[from] DocumentError),
}
