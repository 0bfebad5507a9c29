//! Configuration file parsing.
//!
//! Parses individual `.kea.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::ConfigError;

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Analysis section.
    pub analysis: Option<RawAnalysisSettings>,
    /// Feature section.
    pub features: Option<RawFeatureSettings>,
    /// Model section.
    pub model: Option<RawModelSettings>,
    /// Paths section.
    pub paths: Option<RawPathSettings>,
}

/// Raw analysis settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawAnalysisSettings {
    /// Stemming language.
    pub stemmer: Option<String>,
    /// Longest n-gram matched against the ontology.
    pub max_ngram: Option<usize>,
    /// Whether stopword-only candidates are dropped.
    pub skip_stopwords: Option<bool>,
}

/// Raw feature settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawFeatureSettings {
    /// Largest anchor distance reported before clamping.
    pub max_hops: Option<usize>,
}

/// Raw model settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawModelSettings {
    /// Gradient descent step size.
    pub learning_rate: Option<f64>,
    /// Number of training passes.
    pub epochs: Option<usize>,
    /// L2 penalty.
    pub l2: Option<f64>,
    /// Decision threshold.
    pub threshold: Option<f64>,
    /// Class reweighting.
    pub balance_classes: Option<bool>,
}

/// Raw path settings, as written in the file (unresolved).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawPathSettings {
    /// Ontology source file.
    pub ontology: Option<String>,
    /// Model file.
    pub model: Option<String>,
    /// Training corpus directory.
    pub train: Option<String>,
    /// Test corpus directory.
    pub test: Option<String>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config_str("", Path::new("test.toml")).unwrap();
        assert!(config.analysis.is_none());
        assert!(config.model.is_none());
        assert!(config.paths.is_none());
    }

    #[test]
    fn test_parse_partial_sections() {
        let toml = r#"
[analysis]
stemmer = "german"

[model]
epochs = 50
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let analysis = config.analysis.unwrap();
        assert_eq!(analysis.stemmer.as_deref(), Some("german"));
        assert!(analysis.max_ngram.is_none());
        assert_eq!(config.model.unwrap().epochs, Some(50));
    }

    #[test]
    fn test_parse_paths() {
        let toml = r#"
[paths]
ontology = "hep.json"
train = "corpus/train"
"#;
        let config = parse_config_str(toml, Path::new("test.toml")).unwrap();
        let paths = config.paths.unwrap();
        assert_eq!(paths.ontology.as_deref(), Some("hep.json"));
        assert_eq!(paths.train.as_deref(), Some("corpus/train"));
        assert!(paths.model.is_none());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let toml = r#"
[model]
epoch = 5
"#;
        let err = parse_config_str(toml, Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_is_root_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".kea.toml");

        fs::write(&path, "root = true\n").unwrap();
        assert!(is_root_config(&path));

        fs::write(&path, "[analysis]\nmax_ngram = 3\n").unwrap();
        assert!(!is_root_config(&path));

        assert!(!is_root_config(&dir.path().join("missing.toml")));
    }
}
