//! Error types for the kea-model crate.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised by feature matrices and the learning model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The columns of a matrix differ from the schema the model was fitted on.
    #[error("feature schema mismatch: expected {expected:?}, found {found:?}")]
    SchemaMismatch {
        /// Column names the model was fitted on.
        expected: Vec<String>,
        /// Column names of the offending matrix.
        found: Vec<String>,
    },

    /// A prediction or classifier fit was attempted on an unfitted model.
    #[error("model is not fitted: {0}")]
    NotFitted(&'static str),

    /// The label vector length differs from the number of rows.
    #[error("expected {rows} labels, got {labels}")]
    LabelCount {
        /// Number of matrix rows.
        rows: usize,
        /// Number of labels supplied.
        labels: usize,
    },

    /// Fitting requires at least one row.
    #[error("cannot fit on an empty feature matrix")]
    EmptyMatrix,

    /// Gradient descent left the finite range; lower the learning rate.
    #[error("training diverged after {epochs} epochs with learning rate {learning_rate}")]
    Diverged {
        /// Epochs run.
        epochs: usize,
        /// Step size that was used.
        learning_rate: f64,
    },

    /// A row's width differs from the number of columns.
    #[error("row {row} has {found} values, expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Number of columns.
        expected: usize,
        /// Number of values in the row.
        found: usize,
    },

    /// Failed to read or write a model file.
    #[error("model file {path}: {source}")]
    Io {
        /// Path of the model file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to encode or decode a model file.
    #[error("model file {path}: {source}")]
    Serialize {
        /// Path of the model file.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The model file was written by an incompatible version.
    #[error("unsupported model format version {found}, expected {expected}")]
    UnsupportedVersion {
        /// Version this build reads and writes.
        expected: u32,
        /// Version found in the file.
        found: u32,
    },
}
