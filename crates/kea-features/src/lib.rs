//! Keyword candidates and feature extraction for kea.
//!
//! Given a [`Document`](kea_document::Document) and an
//! [`Ontology`](kea_ontology::Ontology), this crate produces:
//! - [`KeywordCandidate`]s via greedy longest-match [`CandidateGenerator`]
//! - Training-time ground-truth augmentation with [`add_ground_truth`]
//! - A fixed-schema [`FeatureMatrix`](kea_model::FeatureMatrix) per document
//!   via the two-phase [`FeatureExtractor`]

#![warn(missing_docs)]

mod candidates;
mod extractor;
mod row;

pub use candidates::{
    CandidateGenerator, DEFAULT_MAX_NGRAM, GeneratorSettings, KeywordCandidate, Match, Matches,
    Span, add_ground_truth,
};
pub use extractor::{DEFAULT_MAX_HOPS, FeatureExtractor, FeatureSettings, anchor};
pub use row::{FEATURE_COLUMNS, FeatureRow, feature_schema};
