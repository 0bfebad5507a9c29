//! Collapsing per-row predictions into keyword sets.

use std::collections::BTreeSet;

use kea_features::KeywordCandidate;

/// Canonical forms of the candidates predicted positive.
///
/// Predictions are matched to candidates by position. Each canonical form
/// appears once no matter how many rows predicted it.
pub fn predicted_keywords(candidates: &[KeywordCandidate], predictions: &[u8]) -> BTreeSet<String> {
    candidates
        .iter()
        .zip(predictions)
        .filter(|&(_, &bit)| bit == 1)
        .map(|(candidate, _)| candidate.canonical_form().to_string())
        .collect()
}
