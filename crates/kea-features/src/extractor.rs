//! Feature extraction for keyword candidates.
//!
//! Extraction runs in two phases over a preallocated vector of
//! [`FeatureRow`]s, one per candidate:
//! 1. Keyword features: frequencies, positions, label shape and the graph
//!    distance to the document's anchor concept
//! 2. Document features: length and vocabulary statistics, broadcast to every
//!    row
//!
//! [`FeatureExtractor::rebuild`] then turns the rows into the canonical
//! [`FeatureMatrix`], replacing any non-finite value with 0.

use kea_document::Document;
use kea_index::InvertedIndex;
use kea_model::{FeatureMatrix, IdfProvider};
use kea_ontology::Ontology;
use tracing::debug;

use crate::{FEATURE_COLUMNS, FeatureRow, KeywordCandidate};

/// Default bound on the anchor distance search.
pub const DEFAULT_MAX_HOPS: usize = 5;

/// Settings for feature extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSettings {
    /// Deepest graph search for `hops_from_anchor`; farther concepts get
    /// `max_hops + 1`.
    pub max_hops: usize,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
        }
    }
}

/// Computes feature rows for the candidates of one document at a time.
pub struct FeatureExtractor<'a, P: ?Sized> {
    /// Concept graph for hop distances.
    ontology: &'a Ontology,
    /// Frozen corpus idf.
    idf: &'a P,
    /// Extraction settings.
    settings: FeatureSettings,
}

/// Chooses the anchor candidate of a document.
///
/// Prefers the candidate with the most occurrences among those that appear
/// in the title, then the most frequent candidate overall. Ties go to the
/// earlier candidate. Synthetic candidates never anchor.
pub fn anchor(candidates: &[KeywordCandidate], title_len: usize) -> Option<usize> {
    let most_frequent = |in_title: bool| {
        candidates
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_synthetic() && (!in_title || c.in_title(title_len)))
            .fold(None, |best: Option<(usize, usize)>, (i, c)| match best {
                Some((_, n)) if n >= c.spans().len() => best,
                _ => Some((i, c.spans().len())),
            })
            .map(|(i, _)| i)
    };
    most_frequent(true).or_else(|| most_frequent(false))
}

impl<'a, P: IdfProvider + ?Sized> FeatureExtractor<'a, P> {
    /// Creates an extractor.
    pub fn new(ontology: &'a Ontology, idf: &'a P, settings: FeatureSettings) -> Self {
        Self {
            ontology,
            idf,
            settings,
        }
    }

    /// Allocates one zeroed row per candidate.
    pub fn preallocate(candidates: usize) -> Vec<FeatureRow> {
        vec![FeatureRow::default(); candidates]
    }

    /// Fills the per-candidate fields of `rows`.
    ///
    /// Occurrences come from the candidate's spans; candidates without spans
    /// fall back to a phrase lookup of their canonical key in the index.
    pub fn extract_keyword_features(
        &self,
        document: &Document,
        index: &InvertedIndex,
        candidates: &[KeywordCandidate],
        rows: &mut [FeatureRow],
    ) {
        let length = index.total_tokens() as f64;
        let unreachable = (self.settings.max_hops + 1) as f64;
        let anchor = anchor(candidates, document.title_len()).map(|i| candidates[i].concept());

        for (candidate, row) in candidates.iter().zip(rows.iter_mut()) {
            let starts: Vec<usize> = if candidate.is_synthetic() {
                index.phrase_positions(candidate.key())
            } else {
                candidate.spans().iter().map(|s| s.start).collect()
            };

            if let (Some(&first), Some(&last)) = (starts.first(), starts.last())
                && length > 0.0
            {
                row.tf = starts.len() as f64 / length;
                row.first_occurrence = first as f64 / length;
                row.last_occurrence = last as f64 / length;
                row.spread = row.last_occurrence - row.first_occurrence;
            }

            row.idf = self.idf.idf(candidate.canonical_form());
            row.tfidf = row.tf * row.idf;

            row.hops_from_anchor = anchor
                .and_then(|a| {
                    self.ontology
                        .hops(a, candidate.concept(), self.settings.max_hops)
                })
                .map_or(unreachable, |h| h as f64);

            let label = candidate.canonical_form();
            row.no_of_letters = label.chars().filter(|c| !c.is_whitespace()).count() as f64;
            row.no_of_words = label.split_whitespace().count() as f64;
        }
    }

    /// Fills the document-level fields of every row.
    pub fn extract_document_features(
        &self,
        document: &Document,
        index: &InvertedIndex,
        candidates: &[KeywordCandidate],
        rows: &mut [FeatureRow],
    ) {
        let total = index.total_tokens() as f64;
        let unique = index.distinct_words() as f64;
        let richness = if total > 0.0 { unique / total } else { 0.0 };
        let title_matches = candidates
            .iter()
            .filter(|c| c.in_title(document.title_len()))
            .count() as f64;

        for row in rows {
            row.total_words = total;
            row.unique_words = unique;
            row.vocabulary_richness = richness;
            row.title_matches = title_matches;
        }
    }

    /// Converts rows into the canonical matrix, zeroing non-finite values.
    pub fn rebuild(rows: Vec<FeatureRow>) -> FeatureMatrix {
        FeatureMatrix::from_arrays(
            FEATURE_COLUMNS,
            rows.into_iter()
                .map(|row| row.values().map(|v| if v.is_finite() { v } else { 0.0 })),
        )
    }

    /// Runs both phases and the rebuild for one document.
    pub fn extract(
        &self,
        document: &Document,
        index: &InvertedIndex,
        candidates: &[KeywordCandidate],
    ) -> FeatureMatrix {
        let mut rows = Self::preallocate(candidates.len());
        self.extract_keyword_features(document, index, candidates, &mut rows);
        self.extract_document_features(document, index, candidates, &mut rows);
        debug!(doc_id = document.doc_id, rows = rows.len(), "extracted features");
        Self::rebuild(rows)
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use kea_document::Stopwords;
    use kea_model::IdfTable;

    use super::*;
    use crate::{
        CandidateGenerator, GeneratorSettings, add_ground_truth,
        test_support::{analyzer, document, physics},
    };

    struct MockIdf(f64);

    impl IdfProvider for MockIdf {
        fn idf(&self, _canonical: &str) -> f64 {
            self.0
        }
    }

    fn column(matrix: &FeatureMatrix, row: usize, name: &str) -> f64 {
        matrix.row(row).unwrap()[matrix.column_index(name).unwrap()]
    }

    fn extract(text: &str) -> (Vec<KeywordCandidate>, FeatureMatrix) {
        let ontology = physics();
        let stopwords = Stopwords::new();
        let doc = document(text);
        let candidates =
            CandidateGenerator::new(&ontology, &stopwords, GeneratorSettings::default())
                .generate(&doc);
        let index = InvertedIndex::build(&doc);
        let idf = MockIdf(2.0);
        let matrix = FeatureExtractor::new(&ontology, &idf, FeatureSettings::default())
            .extract(&doc, &index, &candidates);
        (candidates, matrix)
    }

    fn hundred_words_with_higgs_at_ten() -> String {
        let mut words: Vec<String> = (0..10).map(|i| format!("w{i}")).collect();
        words.push("Higgs".into());
        words.push("boson".into());
        words.extend((12..100).map(|i| format!("w{i}")));
        words.join(" ")
    }

    #[test]
    fn single_occurrence_in_hundred_words() {
        let (candidates, matrix) = extract(&hundred_words_with_higgs_at_ten());
        assert_eq!(candidates.len(), 1);
        assert_eq!(matrix.n_rows(), 1);
        assert_eq!(column(&matrix, 0, "tf"), 0.01);
        assert_eq!(column(&matrix, 0, "first_occurrence"), 0.1);
        assert_eq!(column(&matrix, 0, "last_occurrence"), 0.1);
        assert_eq!(column(&matrix, 0, "spread"), 0.0);
        assert_eq!(column(&matrix, 0, "idf"), 2.0);
        assert_eq!(column(&matrix, 0, "tfidf"), 0.02);
        assert_eq!(column(&matrix, 0, "total_words"), 100.0);
        assert_eq!(column(&matrix, 0, "no_of_letters"), 10.0);
        assert_eq!(column(&matrix, 0, "no_of_words"), 2.0);
    }

    #[test]
    fn positions_are_ordered_and_bounded() {
        let (_, matrix) = extract(
            "Dark matter and the Higgs boson\n\
             Cosmology constrains dark matter. The Higgs boson mass is known.\n\
             Dark matter remains elusive in cosmology.",
        );
        for r in 0..matrix.n_rows() {
            let first = column(&matrix, r, "first_occurrence");
            let last = column(&matrix, r, "last_occurrence");
            assert!((0.0..=1.0).contains(&first));
            assert!(first <= last && last <= 1.0);
            assert_eq!(column(&matrix, r, "spread"), last - first);
        }
    }

    #[test]
    fn row_order_matches_candidates() {
        let (candidates, matrix) = extract("Cosmology and dark matter, then the Higgs boson");
        assert_eq!(matrix.n_rows(), candidates.len());
        let words: Vec<f64> = (0..matrix.n_rows())
            .map(|r| column(&matrix, r, "no_of_words"))
            .collect();
        assert_eq!(words, vec![1.0, 2.0, 2.0]);
        assert_eq!(matrix.columns(), crate::feature_schema().as_slice());
    }

    #[test]
    fn hops_from_title_anchor() {
        let (candidates, matrix) = extract(
            "Higgs boson\nThe boson is an elementary particle. Dark matter is unrelated.",
        );
        let forms: Vec<&str> = candidates.iter().map(|c| c.canonical_form()).collect();
        assert_eq!(
            forms,
            vec!["Higgs boson", "boson", "elementary particle", "dark matter"]
        );
        let hops: Vec<f64> = (0..matrix.n_rows())
            .map(|r| column(&matrix, r, "hops_from_anchor"))
            .collect();
        assert_eq!(hops, vec![0.0, 1.0, 2.0, 6.0]);
        assert_eq!(column(&matrix, 0, "title_matches"), 1.0);
    }

    #[test]
    fn anchor_prefers_title_then_frequency() {
        let (candidates, _) = extract("Cosmology\ndark matter dark matter dark matter cosmology");
        assert_eq!(anchor(&candidates, 1), Some(0));
        assert_eq!(anchor(&candidates, 0), Some(1));
        assert_eq!(anchor(&[], 3), None);
    }

    #[test]
    fn synthetic_candidate_uses_phrase_lookup_or_zero() {
        let ontology = physics();
        let doc = document("Notes on cosmology and elementary particles");
        let index = InvertedIndex::build(&doc);
        let mut candidates = Vec::new();
        let answers: BTreeSet<String> = ["cosmology", "dark matter"]
            .into_iter()
            .map(String::from)
            .collect();
        add_ground_truth(&mut candidates, &answers, &ontology, &mut analyzer());
        let idf = IdfTable::default();
        let matrix = FeatureExtractor::new(&ontology, &idf, FeatureSettings::default())
            .extract(&doc, &index, &candidates);

        assert_eq!(column(&matrix, 0, "first_occurrence"), 2.0 / 6.0);
        assert_eq!(column(&matrix, 0, "tf"), 1.0 / 6.0);
        assert_eq!(column(&matrix, 1, "tf"), 0.0);
        assert_eq!(column(&matrix, 1, "first_occurrence"), 0.0);
        assert_eq!(column(&matrix, 1, "hops_from_anchor"), 6.0);
        assert_eq!(column(&matrix, 1, "idf"), 1.0);
    }

    #[test]
    fn empty_document_yields_empty_matrix() {
        let (candidates, matrix) = extract("");
        assert!(candidates.is_empty());
        assert!(matrix.is_empty());
        assert_eq!(matrix.n_cols(), FEATURE_COLUMNS.len());
    }

    #[test]
    fn rebuild_zeroes_non_finite() {
        let rows = vec![FeatureRow {
            tf: f64::NAN,
            idf: f64::INFINITY,
            spread: 0.5,
            ..FeatureRow::default()
        }];
        let matrix = FeatureExtractor::<MockIdf>::rebuild(rows);
        assert_eq!(column(&matrix, 0, "tf"), 0.0);
        assert_eq!(column(&matrix, 0, "idf"), 0.0);
        assert_eq!(column(&matrix, 0, "spread"), 0.5);
    }
}
