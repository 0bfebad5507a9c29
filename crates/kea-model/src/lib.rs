//! Learning model for kea.
//!
//! This crate holds everything numeric about keyword classification:
//! - [`FeatureMatrix`]: named columns plus rows of `f64`
//! - [`IdfTable`]: corpus idf of canonical forms, fitted once and frozen
//! - [`StandardScaler`]: per-column standardization
//! - [`LogisticRegression`]: the binary classifier
//! - [`LearningModel`]: ties the above together, validates the column schema
//!   at every boundary, and persists itself as JSON

#![warn(missing_docs)]

mod classifier;
mod error;
mod idf;
mod matrix;
mod scaler;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

pub use classifier::{LogisticRegression, TrainParams};
pub use error::ModelError;
pub use idf::{IdfProvider, IdfTable};
pub use matrix::FeatureMatrix;
pub use scaler::StandardScaler;

/// Version of the persisted model format.
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// Reads only the version of a model file.
#[derive(Deserialize)]
struct VersionProbe {
    /// Format version.
    version: u32,
}

/// Scaler, classifier and frozen corpus statistics.
///
/// A model goes through two fitting steps, always on the same column schema:
/// 1. [`fit_and_scale`](Self::fit_and_scale) learns the scaler on raw features
/// 2. [`fit_classifier`](Self::fit_classifier) learns the classifier on the scaled features
///
/// Inference with [`scale_and_predict`](Self::scale_and_predict) never mutates
/// the model and refuses matrices whose columns differ from the fitted schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningModel {
    /// Format version, checked on load.
    version: u32,
    /// Training hyperparameters, including the decision threshold.
    params: TrainParams,
    /// Frozen corpus idf.
    idf: IdfTable,
    /// Column names seen by `fit_and_scale`.
    schema: Option<Vec<String>>,
    /// Fitted scaler.
    scaler: Option<StandardScaler>,
    /// Fitted classifier.
    classifier: Option<LogisticRegression>,
}

impl LearningModel {
    /// Creates an untrained model around a frozen idf table.
    pub fn new(idf: IdfTable, params: TrainParams) -> Self {
        Self {
            version: MODEL_FORMAT_VERSION,
            params,
            idf,
            schema: None,
            scaler: None,
            classifier: None,
        }
    }

    /// The frozen idf table.
    pub fn idf(&self) -> &IdfTable {
        &self.idf
    }

    /// Training hyperparameters.
    pub fn params(&self) -> &TrainParams {
        &self.params
    }

    /// Overrides the decision threshold used by predictions.
    pub fn set_threshold(&mut self, threshold: f64) {
        self.params.threshold = threshold;
    }

    /// Column names the model was fitted on, if any.
    pub fn schema(&self) -> Option<&[String]> {
        self.schema.as_deref()
    }

    /// The fitted classifier, if any.
    pub fn classifier(&self) -> Option<&LogisticRegression> {
        self.classifier.as_ref()
    }

    /// Returns true once both the scaler and the classifier are fitted.
    pub fn is_fitted(&self) -> bool {
        self.scaler.is_some() && self.classifier.is_some()
    }

    /// Fits the scaler on `x`, records its schema, and returns `x` scaled.
    ///
    /// Refitting discards any previously fitted classifier.
    pub fn fit_and_scale(&mut self, x: &FeatureMatrix) -> Result<FeatureMatrix, ModelError> {
        let scaler = StandardScaler::fit(x)?;
        let scaled = scaler.transform(x);
        self.schema = Some(x.columns().to_vec());
        self.scaler = Some(scaler);
        self.classifier = None;
        Ok(scaled)
    }

    /// Trains the classifier on scaled features and 0/1 labels.
    pub fn fit_classifier(&mut self, x_scaled: &FeatureMatrix, y: &[u8]) -> Result<(), ModelError> {
        let schema = self
            .schema
            .as_deref()
            .ok_or(ModelError::NotFitted("fit_and_scale must run before fit_classifier"))?;
        x_scaled.check_schema(schema)?;
        let classifier = LogisticRegression::fit(x_scaled, y, &self.params)?;
        info!(
            rows = x_scaled.n_rows(),
            columns = x_scaled.n_cols(),
            "fitted classifier"
        );
        self.classifier = Some(classifier);
        Ok(())
    }

    /// Scales raw features with the stored scaler and predicts 0/1 per row.
    pub fn scale_and_predict(&self, x: &FeatureMatrix) -> Result<Vec<u8>, ModelError> {
        let scaled = self.scale(x)?;
        self.predict_scaled(&scaled)
    }

    /// Scales raw features and returns the positive-class probability per row.
    pub fn scale_and_score(&self, x: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        let scaled = self.scale(x)?;
        let classifier = self.fitted_classifier(&scaled)?;
        Ok(scaled
            .rows()
            .iter()
            .map(|row| classifier.probability(row))
            .collect())
    }

    /// Predicts 0/1 per row of already scaled features.
    pub fn predict_scaled(&self, x_scaled: &FeatureMatrix) -> Result<Vec<u8>, ModelError> {
        let classifier = self.fitted_classifier(x_scaled)?;
        Ok(x_scaled
            .rows()
            .iter()
            .map(|row| classifier.predict(row, self.params.threshold))
            .collect())
    }

    /// Applies the stored scaler after validating the schema.
    fn scale(&self, x: &FeatureMatrix) -> Result<FeatureMatrix, ModelError> {
        let (Some(schema), Some(scaler)) = (self.schema.as_deref(), self.scaler.as_ref()) else {
            return Err(ModelError::NotFitted("scaler has not been fitted"));
        };
        x.check_schema(schema)?;
        Ok(scaler.transform(x))
    }

    /// Returns the classifier after validating the schema of `x`.
    fn fitted_classifier(&self, x: &FeatureMatrix) -> Result<&LogisticRegression, ModelError> {
        let (Some(schema), Some(classifier)) = (self.schema.as_deref(), self.classifier.as_ref())
        else {
            return Err(ModelError::NotFitted("classifier has not been fitted"));
        };
        x.check_schema(schema)?;
        Ok(classifier)
    }

    /// Writes the model as JSON.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let io_err = |source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let contents = serde_json::to_string_pretty(self).map_err(|source| ModelError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, contents).map_err(io_err)
    }

    /// Reads a model written by [`save`](Self::save).
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let contents = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let serde_err = |source| ModelError::Serialize {
            path: path.to_path_buf(),
            source,
        };
        let probe: VersionProbe = serde_json::from_str(&contents).map_err(serde_err)?;
        if probe.version != MODEL_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion {
                expected: MODEL_FORMAT_VERSION,
                found: probe.version,
            });
        }
        serde_json::from_str(&contents).map_err(serde_err)
    }
}
