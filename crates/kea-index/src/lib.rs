//! Per-document inverted index for kea.
//!
//! An [`InvertedIndex`] maps every normalized word of one [`Document`] to the
//! ordered positions where it occurs. Feature extraction reads term
//! frequencies and occurrence positions from it; it is built once per
//! document and never mutated.

#![warn(missing_docs)]

use std::collections::HashMap;

use kea_document::Document;

/// Normalized word to ordered token positions, for one document.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    /// Positions of each normalized word, ascending.
    postings: HashMap<String, Vec<usize>>,
    /// Number of tokens in the document.
    total_tokens: usize,
}

impl InvertedIndex {
    /// Builds the index over a document's normalized tokens.
    pub fn build(document: &Document) -> Self {
        Self::from_tokens(document.tokens())
    }

    /// Builds the index over a token sequence.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut postings: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, token) in tokens.iter().enumerate() {
            postings
                .entry(token.as_ref().to_string())
                .or_default()
                .push(position);
        }
        Self {
            postings,
            total_tokens: tokens.len(),
        }
    }

    /// Ordered positions of a word; empty if it does not occur.
    pub fn positions(&self, word: &str) -> &[usize] {
        self.postings.get(word).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of occurrences of a word.
    pub fn count(&self, word: &str) -> usize {
        self.positions(word).len()
    }

    /// Number of tokens in the document.
    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    /// Number of distinct normalized words.
    pub fn distinct_words(&self) -> usize {
        self.postings.len()
    }

    /// Occurrences of a word divided by the document length.
    ///
    /// Returns 0 for an empty document.
    pub fn term_frequency(&self, word: &str) -> f64 {
        if self.total_tokens == 0 {
            return 0.0;
        }
        self.count(word) as f64 / self.total_tokens as f64
    }

    /// Start positions where `words` occur as consecutive tokens.
    ///
    /// An empty phrase never matches.
    pub fn phrase_positions<S: AsRef<str>>(&self, words: &[S]) -> Vec<usize> {
        let Some((first, rest)) = words.split_first() else {
            return Vec::new();
        };

        let tails: Vec<&[usize]> = rest.iter().map(|w| self.positions(w.as_ref())).collect();
        self.positions(first.as_ref())
            .iter()
            .copied()
            .filter(|&start| {
                tails
                    .iter()
                    .enumerate()
                    .all(|(offset, positions)| positions.binary_search(&(start + offset + 1)).is_ok())
            })
            .collect()
    }
}
