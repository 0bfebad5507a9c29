//! Discovery of configuration and project files.
//!
//! Configuration is looked up from the working directory towards the
//! filesystem root, with `~/.kea.toml` as the lowest-precedence fallback.
//! [`detect_project`] inspects a single directory for the ontology, model and
//! corpora that `kea init` records in a new configuration.

use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".kea.toml";

/// Suffix of compiled ontology caches, which are never project inputs.
const CACHE_SUFFIX: &str = ".kea-cache.json";

/// Bytes of a JSON file inspected when guessing what it holds.
const SNIFF_LEN: u64 = 4096;

/// Conventional corpus locations, in order of preference.
const TRAIN_DIRS: [&str; 2] = ["data/train", "train"];
/// Conventional test corpus locations, in order of preference.
const TEST_DIRS: [&str; 2] = ["data/test", "test"];

/// Lists the configuration files that apply to `cwd`, closest first.
///
/// Every `.kea.toml` between `cwd` and the filesystem root is included until
/// one sets `root = true`. Unless such a root file was found, the global file
/// is appended last when it exists.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();
    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let is_root = is_root_config(&candidate);
        configs.push(candidate);
        if is_root {
            return configs;
        }
    }

    if let Some(global) = global_config_path().filter(|p| p.is_file() && !configs.contains(p)) {
        configs.push(global);
    }
    configs
}

/// The user's home directory, if it can be determined.
fn home_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Returns the path of the global configuration file (`~/.kea.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    home_dir().map(|home| home.join(CONFIG_FILENAME))
}

/// Checks if a path is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

/// Checks if `dir` is the home directory, whose config is the global one.
pub fn is_home_dir(dir: &Path) -> bool {
    home_dir().is_some_and(|home| home == dir)
}

/// Project inputs found in a directory, relative to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectLayout {
    /// Ontology JSON file.
    pub ontology: Option<String>,
    /// Previously trained model file.
    pub model: Option<String>,
    /// Training corpus directory.
    pub train: Option<String>,
    /// Test corpus directory.
    pub test: Option<String>,
}

impl ProjectLayout {
    /// True when nothing was found.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Found entries as `(paths key, relative path)` pairs, in template order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("ontology", &self.ontology),
            ("model", &self.model),
            ("train", &self.train),
            ("test", &self.test),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
    }
}

/// What a top-level JSON file appears to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JsonKind {
    /// An ontology with a `concepts` array.
    Ontology,
    /// A persisted learning model.
    Model,
}

/// Looks for kea inputs directly inside `dir`.
///
/// `ontology.json` and `model.json` win when present; otherwise the first
/// JSON file (by name) that looks like an ontology or a model is used.
/// Corpus directories are only recognized at their conventional locations.
pub fn detect_project(dir: &Path) -> ProjectLayout {
    let mut json_files: Vec<String> = fs::read_dir(dir)
        .into_iter()
        .flatten()
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".json") && !name.ends_with(CACHE_SUFFIX))
        .collect();
    json_files.sort();

    let find = |conventional: &str, kind: JsonKind| {
        if json_files.iter().any(|name| name == conventional) {
            return Some(conventional.to_string());
        }
        json_files
            .iter()
            .find(|name| sniff_json(&dir.join(name)) == Some(kind))
            .cloned()
    };

    let first_dir = |candidates: &[&str]| {
        candidates
            .iter()
            .find(|rel| dir.join(rel).is_dir())
            .map(|rel| (*rel).to_string())
    };

    ProjectLayout {
        ontology: find("ontology.json", JsonKind::Ontology),
        model: find("model.json", JsonKind::Model),
        train: first_dir(&TRAIN_DIRS),
        test: first_dir(&TEST_DIRS),
    }
}

/// Guesses the kind of a JSON file from its leading bytes.
fn sniff_json(path: &Path) -> Option<JsonKind> {
    let mut head = Vec::new();
    File::open(path)
        .ok()?
        .take(SNIFF_LEN)
        .read_to_end(&mut head)
        .ok()?;
    let head = String::from_utf8_lossy(&head);

    if head.contains("\"concepts\"") {
        Some(JsonKind::Ontology)
    } else if head.contains("\"version\"") && head.contains("\"params\"") {
        Some(JsonKind::Model)
    } else {
        None
    }
}
