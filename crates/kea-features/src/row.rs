//! The fixed feature schema.

/// Column names of the feature matrix, in order.
pub const FEATURE_COLUMNS: [&str; 13] = [
    "tf",
    "idf",
    "tfidf",
    "first_occurrence",
    "last_occurrence",
    "spread",
    "hops_from_anchor",
    "no_of_letters",
    "no_of_words",
    "total_words",
    "unique_words",
    "vocabulary_richness",
    "title_matches",
];

/// Features of one candidate, one field per column of [`FEATURE_COLUMNS`].
///
/// The first nine fields are filled per candidate; the last four are
/// document-level values broadcast to every row of the document.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeatureRow {
    /// Occurrences divided by document length.
    pub tf: f64,
    /// Frozen corpus idf of the canonical form.
    pub idf: f64,
    /// `tf * idf`.
    pub tfidf: f64,
    /// First start position divided by document length.
    pub first_occurrence: f64,
    /// Last start position divided by document length.
    pub last_occurrence: f64,
    /// `last_occurrence - first_occurrence`.
    pub spread: f64,
    /// Graph distance to the document's anchor concept.
    pub hops_from_anchor: f64,
    /// Non-whitespace characters of the canonical label.
    pub no_of_letters: f64,
    /// Words of the canonical label.
    pub no_of_words: f64,
    /// Document length in tokens.
    pub total_words: f64,
    /// Distinct normalized words of the document.
    pub unique_words: f64,
    /// `unique_words / total_words`.
    pub vocabulary_richness: f64,
    /// Number of candidates occurring in the title.
    pub title_matches: f64,
}

impl FeatureRow {
    /// Values in [`FEATURE_COLUMNS`] order.
    pub fn values(&self) -> [f64; 13] {
        [
            self.tf,
            self.idf,
            self.tfidf,
            self.first_occurrence,
            self.last_occurrence,
            self.spread,
            self.hops_from_anchor,
            self.no_of_letters,
            self.no_of_words,
            self.total_words,
            self.unique_words,
            self.vocabulary_richness,
            self.title_matches,
        ]
    }
}

/// Column names as owned strings, for schema checks.
pub fn feature_schema() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect()
}
