//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`,
//! applying precedence rules and resolving paths.

use std::path::{Path, PathBuf};

use crate::{
    AnalysisSettings, Config, ConfigError, FeatureSettings, ModelSettings, PathSettings,
    parse::{RawAnalysisSettings, RawConfig, RawModelSettings, RawPathSettings},
    validate::{check_l2, check_learning_rate, check_max_ngram, check_threshold},
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory that relative paths in this file are resolved against.
    fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config). For every scalar the first defined value wins;
/// relative paths are resolved against the directory of the file that defined them.
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let mut analysis = AnalysisSettings::default();
    let mut features = FeatureSettings::default();
    let mut model = ModelSettings::default();
    let mut paths = PathSettings::default();

    // Lowest precedence first so higher precedence overwrites.
    for parsed in configs.iter().rev() {
        if let Some(ref raw) = parsed.config.analysis {
            apply_raw_analysis(&mut analysis, raw, &parsed.path)?;
        }
        if let Some(ref raw) = parsed.config.features
            && let Some(v) = raw.max_hops
        {
            features.max_hops = v;
        }
        if let Some(ref raw) = parsed.config.model {
            apply_raw_model(&mut model, raw, &parsed.path)?;
        }
        if let Some(ref raw) = parsed.config.paths {
            apply_raw_paths(&mut paths, raw, parsed.base_dir());
        }
    }

    let config_root = configs.first().map(|c| c.base_dir().to_path_buf());

    Ok(Config {
        analysis,
        features,
        model,
        paths,
        config_root,
    })
}

/// Applies raw analysis settings to result.
fn apply_raw_analysis(
    result: &mut AnalysisSettings,
    raw: &RawAnalysisSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(ref v) = raw.stemmer {
        result.stemmer = v.clone();
    }
    if let Some(v) = raw.max_ngram {
        check_max_ngram(v).map_err(|reason| ConfigError::InvalidValue {
            path: path.to_path_buf(),
            key: "analysis.max_ngram",
            reason,
        })?;
        result.max_ngram = v;
    }
    if let Some(v) = raw.skip_stopwords {
        result.skip_stopwords = v;
    }
    Ok(())
}

/// Applies raw model settings to result.
fn apply_raw_model(
    result: &mut ModelSettings,
    raw: &RawModelSettings,
    path: &Path,
) -> Result<(), ConfigError> {
    let invalid = |key: &'static str| {
        move |reason: &'static str| ConfigError::InvalidValue {
            path: path.to_path_buf(),
            key,
            reason,
        }
    };

    if let Some(v) = raw.learning_rate {
        check_learning_rate(v).map_err(invalid("model.learning_rate"))?;
        result.learning_rate = v;
    }
    if let Some(v) = raw.epochs {
        result.epochs = v;
    }
    if let Some(v) = raw.l2 {
        check_l2(v).map_err(invalid("model.l2"))?;
        result.l2 = v;
    }
    if let Some(v) = raw.threshold {
        check_threshold(v).map_err(invalid("model.threshold"))?;
        result.threshold = v;
    }
    if let Some(v) = raw.balance_classes {
        result.balance_classes = v;
    }
    Ok(())
}

/// Applies raw path settings, resolving relative paths against `base`.
fn apply_raw_paths(result: &mut PathSettings, raw: &RawPathSettings, base: &Path) {
    let resolve = |value: &Option<String>, slot: &mut Option<PathBuf>| {
        if let Some(v) = value {
            *slot = Some(base.join(v));
        }
    };
    resolve(&raw.ontology, &mut result.ontology);
    resolve(&raw.model, &mut result.model);
    resolve(&raw.train, &mut result.train);
    resolve(&raw.test, &mut result.test);
}
