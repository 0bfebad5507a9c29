//! Configuration system for kea.
//!
//! kea uses TOML configuration files named `.kea.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.kea.toml` files found,
//! then loading `~/.kea.toml` as the global config with lowest precedence. Merged values are
//! range-checked per file, and [`Config::validate`] re-checks them after command-line overrides.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
mod validate;

use std::path::{Path, PathBuf};

pub use discovery::{
    CONFIG_FILENAME, ProjectLayout, detect_project, discover_config_files, global_config_path,
    is_global_config, is_home_dir,
};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawAnalysisSettings, RawConfig, RawFeatureSettings, RawModelSettings, RawPathSettings,
    parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{local_template, project_template};
pub use validate::{check_threshold, validate_config};

/// Top-level merged configuration for kea.
///
/// This represents the fully resolved configuration after merging all discovered `.kea.toml`
/// files according to precedence rules.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Text analysis and candidate generation settings.
    pub analysis: AnalysisSettings,
    /// Feature extraction settings.
    pub features: FeatureSettings,
    /// Classifier training settings.
    pub model: ModelSettings,
    /// Resolved file locations.
    pub paths: PathSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.kea.toml` files.
    ///
    /// This is the main entry point for loading configuration. It:
    /// 1. Discovers all `.kea.toml` files from `cwd` up to the filesystem root
    /// 2. Appends `~/.kea.toml` if it exists
    /// 3. Parses each file
    /// 4. Merges them according to precedence rules (closest to `cwd` wins)
    ///
    /// Paths left unset by every file resolve against the closest config directory,
    /// or `cwd` when no config file was found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        let mut config = Self::load_from_files(&config_files)?;
        let base = config
            .config_root
            .clone()
            .unwrap_or_else(|| cwd.to_path_buf());
        config.paths.resolve_defaults(&base);
        Ok(config)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    /// This is primarily useful for testing.
    ///
    /// Returns `Ok(Config::default())` if the list is empty.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Checks the effective settings. See [`validate_config`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            analysis: &self.analysis,
            features: &self.features,
            model: &self.model,
            paths: &self.paths,
        };
        toml::to_string_pretty(&serializable).map_err(ConfigError::Serialize)
    }
}

/// Text analysis and candidate generation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Stemming language.
    pub stemmer: String,
    /// Longest n-gram, in words, matched against the ontology.
    pub max_ngram: usize,
    /// Whether single-word candidates that are stopwords are dropped.
    pub skip_stopwords: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            stemmer: String::from("english"),
            max_ngram: 4,
            skip_stopwords: true,
        }
    }
}

/// Feature extraction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureSettings {
    /// Largest anchor distance reported before clamping.
    pub max_hops: usize,
}

impl Default for FeatureSettings {
    fn default() -> Self {
        Self { max_hops: 5 }
    }
}

/// Classifier training settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelSettings {
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Number of full-batch gradient descent passes.
    pub epochs: usize,
    /// L2 penalty on the weights.
    pub l2: f64,
    /// Probability at or above which a row is predicted as a keyword.
    pub threshold: f64,
    /// Reweight classes inversely to their frequency.
    pub balance_classes: bool,
}

impl Default for ModelSettings {
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

/// File locations used by the CLI.
///
/// `None` means "not configured"; [`PathSettings::resolve_defaults`] fills the
/// conventional names relative to a base directory.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PathSettings {
    /// Ontology source file.
    pub ontology: Option<PathBuf>,
    /// Trained model file.
    pub model: Option<PathBuf>,
    /// Training corpus directory.
    pub train: Option<PathBuf>,
    /// Test corpus directory.
    pub test: Option<PathBuf>,
}

impl PathSettings {
    /// Fills every unset path with its conventional name under `base`.
    pub fn resolve_defaults(&mut self, base: &Path) {
        let fill = |slot: &mut Option<PathBuf>, name: &str| {
            if slot.is_none() {
                *slot = Some(base.join(name));
            }
        };
        fill(&mut self.ontology, "ontology.json");
        fill(&mut self.model, "model.json");
        fill(&mut self.train, "data/train");
        fill(&mut self.test, "data/test");
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings<'a> {
    /// Text analysis settings.
    analysis: &'a AnalysisSettings,
    /// Feature extraction settings.
    features: &'a FeatureSettings,
    /// Classifier training settings.
    model: &'a ModelSettings,
    /// File locations.
    paths: &'a PathSettings,
}
