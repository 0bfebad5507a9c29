//! Ontology-anchored keyword candidates.
//!
//! The generator scans a document left to right and, at each position, tries
//! the longest n-gram first. A hit on the ontology's synonym table emits a
//! match and jumps past its span; otherwise the scan advances one token. So
//! "quantum computing" wins over the overlapping "computing" without any
//! post-filtering.

use std::collections::{BTreeSet, HashMap};

use kea_document::{Analyzer, Document, Stopwords};
use kea_ontology::{ConceptId, Ontology};
use tracing::debug;

/// Default upper bound on candidate length, in tokens.
pub const DEFAULT_MAX_NGRAM: usize = 4;

/// Half-open token range `[start, end)` within a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    /// First token of the match.
    pub start: usize,
    /// One past the last token of the match.
    pub end: usize,
}

impl Span {
    /// Number of tokens covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span covers no tokens.
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// One surface match of an ontology synonym.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Where the synonym occurs.
    pub span: Span,
    /// The concept it resolves to.
    pub concept: ConceptId,
}

/// All occurrences of one canonical form within a document.
///
/// Candidates injected from ground truth have no spans.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCandidate {
    /// The concept this candidate stands for.
    concept: ConceptId,
    /// Canonical label of the concept.
    canonical: String,
    /// Normalized tokens of the canonical label.
    key: Vec<String>,
    /// Matched spans, in document order.
    spans: Vec<Span>,
}

impl KeywordCandidate {
    /// Creates a candidate without occurrences.
    pub fn synthetic(ontology: &Ontology, concept: ConceptId) -> Self {
        let c = ontology.concept(concept);
        Self {
            concept,
            canonical: c.label().to_string(),
            key: c.key().to_vec(),
            spans: Vec::new(),
        }
    }

    /// The concept id.
    pub fn concept(&self) -> ConceptId {
        self.concept
    }

    /// The canonical form.
    pub fn canonical_form(&self) -> &str {
        &self.canonical
    }

    /// Normalized tokens of the canonical form.
    pub fn key(&self) -> &[String] {
        &self.key
    }

    /// Matched spans, in document order.
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Returns true for candidates injected from ground truth.
    pub fn is_synthetic(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns true if any span starts within the first `title_len` tokens.
    pub fn in_title(&self, title_len: usize) -> bool {
        self.spans.first().is_some_and(|s| s.start < title_len)
    }
}

/// Settings for candidate generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    /// Longest n-gram to try. Clipped to the ontology's longest synonym.
    pub max_ngram: usize,
    /// Skip single-token matches whose surface word is a stopword.
    pub skip_stopwords: bool,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            max_ngram: DEFAULT_MAX_NGRAM,
            skip_stopwords: true,
        }
    }
}

/// Produces keyword candidates for documents against one ontology.
pub struct CandidateGenerator<'a> {
    /// Vocabulary to match against.
    ontology: &'a Ontology,
    /// Words that never form a candidate on their own.
    stopwords: &'a Stopwords,
    /// Generation settings.
    settings: GeneratorSettings,
}

impl<'a> CandidateGenerator<'a> {
    /// Creates a generator.
    pub fn new(ontology: &'a Ontology, stopwords: &'a Stopwords, settings: GeneratorSettings) -> Self {
        Self {
            ontology,
            stopwords,
            settings,
        }
    }

    /// Effective maximum n-gram length.
    pub fn max_ngram(&self) -> usize {
        self.settings.max_ngram.min(self.ontology.max_phrase_len())
    }

    /// Lazily yields greedy longest matches in document order.
    pub fn matches<'d>(&'d self, document: &'d Document) -> Matches<'d> {
        Matches {
            generator: self,
            tokens: document.tokens(),
            words: document.words(),
            max_ngram: self.max_ngram(),
            position: 0,
        }
    }

    /// Materializes the candidates of a document.
    ///
    /// Matches are grouped by canonical form; candidates appear in the order
    /// of their first occurrence.
    pub fn generate(&self, document: &Document) -> Vec<KeywordCandidate> {
        let mut candidates: Vec<KeywordCandidate> = Vec::new();
        let mut by_concept: HashMap<ConceptId, usize> = HashMap::new();

        for m in self.matches(document) {
            let slot = *by_concept.entry(m.concept).or_insert_with(|| {
                candidates.push(KeywordCandidate::synthetic(self.ontology, m.concept));
                candidates.len() - 1
            });
            candidates[slot].spans.push(m.span);
        }

        debug!(
            doc_id = document.doc_id,
            tokens = document.len(),
            candidates = candidates.len(),
            "generated candidates"
        );
        candidates
    }
}

/// Iterator returned by [`CandidateGenerator::matches`].
pub struct Matches<'d> {
    /// Generator holding the ontology and settings.
    generator: &'d CandidateGenerator<'d>,
    /// Normalized tokens of the document.
    tokens: &'d [String],
    /// Surface words of the document.
    words: &'d [String],
    /// Effective maximum n-gram length.
    max_ngram: usize,
    /// Next token to scan from.
    position: usize,
}

impl Matches<'_> {
    /// Finds the longest match starting at `start`.
    fn longest_at(&self, start: usize) -> Option<Match> {
        let longest = self.max_ngram.min(self.tokens.len() - start);
        (1..=longest).rev().find_map(|n| {
            let concept = self.generator.ontology.lookup(&self.tokens[start..start + n])?;
            if n == 1
                && self.generator.settings.skip_stopwords
                && self.generator.stopwords.contains(&self.words[start])
            {
                return None;
            }
            Some(Match {
                span: Span {
                    start,
                    end: start + n,
                },
                concept,
            })
        })
    }
}

impl Iterator for Matches<'_> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        while self.position < self.tokens.len() {
            match self.longest_at(self.position) {
                Some(m) => {
                    self.position = m.span.end;
                    return Some(m);
                }
                None => self.position += 1,
            }
        }
        None
    }
}

/// Appends a synthetic candidate for each answer the generator missed.
///
/// Answers are resolved against the ontology by canonical label or synonym;
/// answers it cannot resolve are skipped. Returns the number of candidates
/// added.
pub fn add_ground_truth(
    candidates: &mut Vec<KeywordCandidate>,
    answers: &BTreeSet<String>,
    ontology: &Ontology,
    analyzer: &mut Analyzer,
) -> usize {
    let mut present: BTreeSet<ConceptId> = candidates.iter().map(|c| c.concept).collect();
    let before = candidates.len();

    for answer in answers {
        let Some(concept) = ontology.resolve(answer, analyzer) else {
            debug!(answer, "ground truth answer not in ontology");
            continue;
        };
        if present.insert(concept) {
            candidates.push(KeywordCandidate::synthetic(ontology, concept));
        }
    }
    candidates.len() - before
}
