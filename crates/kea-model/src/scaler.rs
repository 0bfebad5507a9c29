//! Per-column standardization.

use serde::{Deserialize, Serialize};

use crate::{FeatureMatrix, ModelError};

/// Column means and standard deviations learned from training data.
///
/// Scaling maps each value to `(x - mean) / scale`, where `scale` is the
/// population standard deviation of the column, or 1 for constant columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-column mean.
    mean: Vec<f64>,
    /// Per-column divisor.
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Learns column statistics from a non-empty matrix.
    pub fn fit(matrix: &FeatureMatrix) -> Result<Self, ModelError> {
        if matrix.is_empty() {
            return Err(ModelError::EmptyMatrix);
        }

        let n = matrix.n_rows() as f64;
        let mut mean = Vec::with_capacity(matrix.n_cols());
        let mut scale = Vec::with_capacity(matrix.n_cols());
        for j in 0..matrix.n_cols() {
            let m = matrix.column(j).sum::<f64>() / n;
            let variance = matrix.column(j).map(|x| (x - m) * (x - m)).sum::<f64>() / n;
            let std = variance.sqrt();
            mean.push(m);
            scale.push(if std > 0.0 && std.is_finite() { std } else { 1.0 });
        }
        Ok(Self { mean, scale })
    }

    /// Number of columns the scaler was fitted on.
    pub fn n_cols(&self) -> usize {
        self.mean.len()
    }

    /// Per-column means.
    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    /// Per-column divisors.
    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Standardizes every row of a matrix.
    pub fn transform(&self, matrix: &FeatureMatrix) -> FeatureMatrix {
        matrix.map_rows(|row| {
            row.iter()
                .zip(self.mean.iter().zip(&self.scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect()
        })
    }
}
