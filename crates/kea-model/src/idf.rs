//! Corpus inverse document frequency of canonical forms.
//!
//! The table is fitted once over the candidates generated for every training
//! document and then frozen inside the model, so training and inference see
//! the same values.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Source of idf values for canonical forms.
pub trait IdfProvider {
    /// Returns the idf of a canonical form.
    ///
    /// Forms never seen during fitting get the largest value the corpus
    /// allows.
    fn idf(&self, canonical: &str) -> f64;
}

/// Frozen document frequencies over a training corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdfTable {
    /// Number of documents the table was fitted on.
    documents: usize,
    /// Number of documents in which each canonical form was a candidate.
    document_frequency: BTreeMap<String, usize>,
}

impl IdfTable {
    /// Fits the table over the canonical forms found in each document.
    ///
    /// Repeated forms within one document count once.
    pub fn fit<D, I, S>(documents: D) -> Self
    where
        D: IntoIterator<Item = I>,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for forms in documents {
            table.documents += 1;
            let unique: BTreeSet<String> = forms
                .into_iter()
                .map(|f| f.as_ref().to_string())
                .collect();
            for form in unique {
                *table.document_frequency.entry(form).or_default() += 1;
            }
        }
        table
    }

    /// Number of documents the table was fitted on.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Number of documents containing a canonical form.
    pub fn document_frequency(&self, canonical: &str) -> usize {
        self.document_frequency.get(canonical).copied().unwrap_or(0)
    }

    /// Number of distinct canonical forms seen.
    pub fn len(&self) -> usize {
        self.document_frequency.len()
    }

    /// Returns true if no canonical form was seen.
    pub fn is_empty(&self) -> bool {
        self.document_frequency.is_empty()
    }
}

impl IdfProvider for IdfTable {
    /// Smoothed idf: `ln((N + 1) / (df + 1)) + 1`.
    fn idf(&self, canonical: &str) -> f64 {
        let n = self.documents as f64;
        let df = self.document_frequency(canonical) as f64;
        ((n + 1.0) / (df + 1.0)).ln() + 1.0
    }
}
