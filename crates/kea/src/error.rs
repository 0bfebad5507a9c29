//! Error types for the kea pipeline.

use std::path::PathBuf;

use kea_config::ConfigError;
use kea_document::DocumentError;
use kea_model::ModelError;
use kea_ontology::OntologyError;
use thiserror::Error;

/// Errors raised while training, testing or extracting.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration could not be loaded or holds an out-of-range value.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A document or answers file could not be read.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The ontology could not be loaded.
    #[error(transparent)]
    Ontology(#[from] OntologyError),

    /// The model rejected its input or could not be persisted.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A corpus directory contains no documents.
    #[error("no documents found in {path}")]
    EmptyCorpus {
        /// The corpus directory.
        path: PathBuf,
    },

    /// A required path is neither configured nor given on the command line.
    #[error("no {0} path configured")]
    MissingPath(&'static str),
}
