//! Stopword filtering for candidate generation.
//!
//! Combines the standard English stopwords from the `stop-words` crate with
//! fillers common in scientific prose ("fig", "eq", "et al"). A single-word
//! ontology match on one of these is almost always an abbreviation collision.

use std::collections::HashSet;

use stop_words::LANGUAGE;

/// A stopword filter for English scientific text.
///
/// All words are stored in lowercase for case-insensitive matching.
#[derive(Clone)]
pub struct Stopwords {
    /// Lowercased stopwords.
    words: HashSet<String>,
}

impl Default for Stopwords {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwords {
    /// Creates a new stopword filter with the default English and scientific stopwords.
    pub fn new() -> Self {
        let mut words: HashSet<String> = HashSet::new();

        let mut add_words = |slice: &[&str]| {
            for word in slice {
                words.insert(word.to_ascii_lowercase());
            }
        };

        add_words(stop_words::get(LANGUAGE::English));
        add_words(SCIENTIFIC_FILLERS);

        Self { words }
    }

    /// Creates an empty filter that matches nothing.
    pub fn none() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// Checks if a term is a stopword.
    ///
    /// The check is case-insensitive for ASCII characters.
    pub fn contains(&self, term: &str) -> bool {
        let lower = term.to_ascii_lowercase();
        self.words.contains(&lower)
    }

    /// Returns the total number of stopwords.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no stopwords are configured.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Abbreviations and fillers of paper prose.
static SCIENTIFIC_FILLERS: &[&str] = &[
    "al", "approx", "cf", "eq", "eqs", "et", "etc", "fig", "figs", "ibid", "ie", "eg", "ref",
    "refs", "sec", "tab", "viz", "vs", "wrt",
];
