//! kea: ontology-anchored keyword extraction.
//!
//! kea extracts keywords from plain-text documents by matching them against a
//! controlled vocabulary and letting a trained classifier decide which of the
//! matched concepts are keywords. Every prediction is therefore a canonical
//! ontology label, never free text.
//!
//! The pipeline is split across the workspace:
//! - `kea-document`: analysis, corpora and ground-truth answers
//! - `kea-ontology`: the compiled vocabulary and its on-disk cache
//! - `kea-index`: per-document positional index
//! - `kea-features`: candidate generation and the feature schema
//! - `kea-model`: idf, scaling and logistic regression, persisted as JSON
//!
//! This crate wires them into the [`train`], [`test`] and [`extract`] drivers.

#![warn(missing_docs)]

mod context;
mod error;
mod evaluate;
mod pipeline;
mod scoring;

pub use context::{Context, train_params};
pub use error::PipelineError;
pub use evaluate::{Evaluation, evaluate};
pub use pipeline::{
    Extraction, ScoredCandidate, TestReport, TrainReport, extract, test, train,
};
pub use scoring::predicted_keywords;
