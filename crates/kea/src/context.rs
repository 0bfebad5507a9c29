//! Shared, read-only state for a pipeline run.

use kea_config::{Config, ModelSettings};
use kea_document::{Analyzer, Stopwords};
use kea_features::{CandidateGenerator, FeatureExtractor, FeatureSettings, GeneratorSettings};
use kea_model::{IdfProvider, TrainParams};
use kea_ontology::{Ontology, load_ontology};

use crate::PipelineError;

/// Everything a pipeline stage needs besides the model.
///
/// A context is built once per run and shared by reference across worker
/// threads; nothing in it changes after construction.
pub struct Context {
    /// Compiled vocabulary.
    ontology: Ontology,
    /// Analyzer the ontology was compiled with; cloned per worker.
    analyzer: Analyzer,
    /// Stopwords suppressing single-word candidates.
    stopwords: Stopwords,
    /// Candidate generation settings.
    generator: GeneratorSettings,
    /// Feature extraction settings.
    features: FeatureSettings,
}

impl Context {
    /// Creates a context from its parts.
    pub fn new(
        ontology: Ontology,
        analyzer: Analyzer,
        generator: GeneratorSettings,
        features: FeatureSettings,
    ) -> Self {
        Self {
            ontology,
            analyzer,
            stopwords: Stopwords::new(),
            generator,
            features,
        }
    }

    /// Builds a context from configuration, loading the configured ontology.
    ///
    /// The configuration is validated first, so command-line overrides are
    /// checked too. With `recreate` set the compiled ontology cache is rebuilt.
    pub fn from_config(config: &Config, recreate: bool) -> Result<Self, PipelineError> {
        config.validate()?;
        let path = config
            .paths
            .ontology
            .as_deref()
            .ok_or(PipelineError::MissingPath("ontology"))?;
        let analyzer = Analyzer::from_name(&config.analysis.stemmer)?;
        let ontology = load_ontology(path, &analyzer, recreate)?;
        Ok(Self::new(
            ontology,
            analyzer,
            GeneratorSettings {
                max_ngram: config.analysis.max_ngram,
                skip_stopwords: config.analysis.skip_stopwords,
            },
            FeatureSettings {
                max_hops: config.features.max_hops,
            },
        ))
    }

    /// The compiled ontology.
    pub fn ontology(&self) -> &Ontology {
        &self.ontology
    }

    /// The shared analyzer. Clone it to analyze text.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// A candidate generator over this context's ontology.
    pub fn generator(&self) -> CandidateGenerator<'_> {
        CandidateGenerator::new(&self.ontology, &self.stopwords, self.generator.clone())
    }

    /// A feature extractor using the given idf source.
    pub fn extractor<'a, P: IdfProvider + ?Sized>(&'a self, idf: &'a P) -> FeatureExtractor<'a, P> {
        FeatureExtractor::new(&self.ontology, idf, self.features.clone())
    }
}

/// Converts configured model settings into classifier parameters.
pub fn train_params(settings: &ModelSettings) -> TrainParams {
    TrainParams {
        learning_rate: settings.learning_rate,
        epochs: settings.epochs,
        l2: settings.l2,
        threshold: settings.threshold,
        balance_classes: settings.balance_classes,
    }
}
