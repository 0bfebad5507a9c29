//! Binary logistic regression.
//!
//! Training is full-batch gradient descent from a zero initialization with an
//! L2 penalty on the weights, so the same data and parameters always produce
//! the same model.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{FeatureMatrix, ModelError};

/// Hyperparameters of the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Number of full passes over the data.
    pub epochs: usize,
    /// L2 penalty on the weights (not the bias).
    pub l2: f64,
    /// Probability at or above which a row is predicted positive.
    pub threshold: f64,
    /// Weight classes inversely to their frequency.
    pub balance_classes: bool,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 500,
            l2: 0.001,
            threshold: 0.5,
            balance_classes: true,
        }
    }
}

/// Fitted logistic regression weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// One weight per column.
    weights: Vec<f64>,
    /// Intercept.
    bias: f64,
}

/// Numerically stable logistic function.
fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl LogisticRegression {
    /// Trains on (already scaled) rows and 0/1 labels.
    ///
    /// Any non-zero label counts as positive.
    pub fn fit(x: &FeatureMatrix, y: &[u8], params: &TrainParams) -> Result<Self, ModelError> {
        if x.is_empty() {
            return Err(ModelError::EmptyMatrix);
        }
        if y.len() != x.n_rows() {
            return Err(ModelError::LabelCount {
                rows: x.n_rows(),
                labels: y.len(),
            });
        }

        let n = x.n_rows() as f64;
        let targets: Vec<f64> = y.iter().map(|&l| if l != 0 { 1.0 } else { 0.0 }).collect();
        let positives = targets.iter().filter(|&&t| t > 0.5).count() as f64;
        let negatives = n - positives;
        let (w_pos, w_neg) = if params.balance_classes && positives > 0.0 && negatives > 0.0 {
            (n / (2.0 * positives), n / (2.0 * negatives))
        } else {
            (1.0, 1.0)
        };

        let mut model = Self {
            weights: vec![0.0; x.n_cols()],
            bias: 0.0,
        };
        let mut grad = vec![0.0; x.n_cols()];

        for _ in 0..params.epochs {
            grad.iter_mut().for_each(|g| *g = 0.0);
            let mut grad_bias = 0.0;

            for (row, &t) in x.rows().iter().zip(&targets) {
                let sample_weight = if t > 0.5 { w_pos } else { w_neg };
                let error = sample_weight * (model.probability(row) - t);
                for (g, v) in grad.iter_mut().zip(row) {
                    *g += error * v;
                }
                grad_bias += error;
            }

            for (w, g) in model.weights.iter_mut().zip(&grad) {
                *w -= params.learning_rate * (g / n + params.l2 * *w);
            }
            model.bias -= params.learning_rate * grad_bias / n;
        }

        // Non-finite weights would serialize as null and never load back.
        if !(model.bias.is_finite() && model.weights.iter().all(|w| w.is_finite())) {
            return Err(ModelError::Diverged {
                epochs: params.epochs,
                learning_rate: params.learning_rate,
            });
        }

        debug!(
            rows = x.n_rows(),
            positives,
            epochs = params.epochs,
            "trained logistic regression"
        );
        Ok(model)
    }

    /// Probability that a row is positive.
    pub fn probability(&self, row: &[f64]) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(row)
            .map(|(w, v)| w * v)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }

    /// Predicts 1 when the probability reaches `threshold`, else 0.
    pub fn predict(&self, row: &[f64], threshold: f64) -> u8 {
        u8::from(self.probability(row) >= threshold)
    }

    /// Learned weights, one per column.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Learned intercept.
    pub fn bias(&self) -> f64 {
        self.bias
    }
}
