//! Ontology source format.
//!
//! The on-disk source is a JSON document listing concepts with their synonyms
//! and SKOS-style links:
//!
//! ```json
//! { "concepts": [
//!     { "label": "Higgs boson", "synonyms": ["higgs particle"], "broader": ["boson"] }
//! ] }
//! ```
//!
//! Links are undirected for distance purposes; `broader`, `narrower` and
//! `related` only differ in how curators write them down.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::OntologyError;

/// Raw ontology as parsed from the source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RawOntology {
    /// All concepts, in source order.
    pub concepts: Vec<RawConcept>,
}

/// One concept of the source file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RawConcept {
    /// Canonical label.
    pub label: String,
    /// Alternative surface forms.
    pub synonyms: Vec<String>,
    /// Labels of more general concepts.
    pub broader: Vec<String>,
    /// Labels of more specific concepts.
    pub narrower: Vec<String>,
    /// Labels of otherwise related concepts.
    pub related: Vec<String>,
}

impl RawConcept {
    /// Creates a concept with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Adds synonyms.
    pub fn synonyms<I, S>(mut self, synonyms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.extend(synonyms.into_iter().map(Into::into));
        self
    }

    /// Adds a broader concept link.
    pub fn broader(mut self, label: impl Into<String>) -> Self {
        self.broader.push(label.into());
        self
    }

    /// Adds a related concept link.
    pub fn related(mut self, label: impl Into<String>) -> Self {
        self.related.push(label.into());
        self
    }

    /// Iterates over every linked label regardless of link kind.
    pub fn links(&self) -> impl Iterator<Item = &String> {
        self.broader
            .iter()
            .chain(self.narrower.iter())
            .chain(self.related.iter())
    }
}

impl RawOntology {
    /// Creates an ontology source from concepts.
    pub fn new(concepts: Vec<RawConcept>) -> Self {
        Self { concepts }
    }
}

/// Parses an ontology source from a JSON string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_ontology_str(contents: &str, path: &Path) -> Result<RawOntology, OntologyError> {
    serde_json::from_str(contents).map_err(|source| OntologyError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads an ontology source file.
pub fn read_ontology_file(path: &Path) -> Result<(RawOntology, String), OntologyError> {
    let contents = fs::read_to_string(path).map_err(|source| OntologyError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = parse_ontology_str(&contents, path)?;
    Ok((raw, contents))
}
