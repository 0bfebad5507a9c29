//! Corpus-level evaluation of predictions against ground truth.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

/// Precision, recall, F1 and accuracy over a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Evaluation {
    /// Correct positive predictions over all positive predictions.
    pub precision: f64,
    /// Correct positive predictions over all ground-truth answers.
    pub recall: f64,
    /// Harmonic mean of precision and recall.
    pub f1: f64,
    /// Rows whose prediction agrees with the ground truth, over all rows.
    pub accuracy: f64,
}

/// Scores predictions against per-document answer sets.
///
/// `keywords[i]` is the `(doc_id, canonical form)` of the row predicted by
/// `predictions[i]`. Documents missing from `answers` have no answers.
pub fn evaluate(
    predictions: &[u8],
    keywords: &[(usize, String)],
    answers: &HashMap<usize, BTreeSet<String>>,
) -> Evaluation {
    let mut predicted_positive = 0usize;
    let mut true_positive = 0usize;
    let mut correct = 0usize;
    let mut rows = 0usize;

    for (&bit, (doc_id, keyword)) in predictions.iter().zip(keywords) {
        let expected = answers.get(doc_id).is_some_and(|a| a.contains(keyword));
        let predicted = bit == 1;
        rows += 1;
        if predicted {
            predicted_positive += 1;
        }
        if predicted && expected {
            true_positive += 1;
        }
        if predicted == expected {
            correct += 1;
        }
    }

    let total_answers: usize = answers.values().map(BTreeSet::len).sum();
    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let precision = ratio(true_positive, predicted_positive);
    let recall = ratio(true_positive, total_answers);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Evaluation {
        precision,
        recall,
        f1,
        accuracy: ratio(correct, rows),
    }
}
