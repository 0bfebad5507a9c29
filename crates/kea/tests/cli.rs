//! CLI integration tests for kea commands.
//!
//! These tests focus on exit codes and basic behavioral verification,
//! not specific output formatting which may change.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::{fs, path::Path};

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a temp directory for tests.
fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

/// Helper to get a kea command.
fn kea() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("kea").unwrap()
}

/// Helper to run `kea` with HOME isolated to the provided directory.
fn kea_with_home(home: &Path) -> Command {
    let mut cmd = kea();
    cmd.env("HOME", home);
    cmd.env_remove("KEA_LOG");
    cmd
}

/// Strips ANSI escape sequences from a string.
fn strip_ansi(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            output.push(ch);
        }
    }

    output
}

/// Small physics vocabulary.
const ONTOLOGY: &str = r#"{
  "concepts": [
    {"label": "Higgs boson", "synonyms": ["higgs particle"], "broader": ["boson"]},
    {"label": "boson"},
    {"label": "dark matter", "related": ["cosmology"]},
    {"label": "cosmology"},
    {"label": "detector"},
    {"label": "neutrino"}
  ]
}"#;

/// Writes a document and its answers.
fn write_doc(dir: &Path, name: &str, text: &str, answers: &str) {
    fs::write(dir.join(format!("{name}.txt")), text).unwrap();
    fs::write(dir.join(format!("{name}.key")), answers).unwrap();
}

/// Creates a project with an ontology and train/test corpora at the
/// default configured locations.
fn setup_project() -> tempfile::TempDir {
    let dir = temp_dir();
    fs::write(dir.path().join("ontology.json"), ONTOLOGY).unwrap();

    for corpus in ["data/train", "data/test"] {
        let path = dir.path().join(corpus);
        fs::create_dir_all(&path).unwrap();
        write_doc(
            &path,
            "higgs",
            "Higgs boson discovery\nThe Higgs boson was seen by the detector. The Higgs particle decays.",
            "Higgs boson\n",
        );
        write_doc(
            &path,
            "dark",
            "Dark matter in cosmology\nDark matter shapes cosmology. A detector looked for dark matter.",
            "dark matter\ncosmology\n",
        );
        write_doc(
            &path,
            "neutrino",
            "Neutrino detector design\nThe neutrino detector was calibrated. Each neutrino was counted.",
            "neutrino\n",
        );
    }
    dir
}

/// Trains a model in a project created by [`setup_project`].
fn train_project(dir: &Path) {
    kea_with_home(dir)
        .current_dir(dir)
        .arg("train")
        .assert()
        .success();
}

mod init {
    use super::*;

    #[test]
    fn creates_config_file() {
        let dir = temp_dir();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success();

        let config_path = dir.path().join(".kea.toml");
        assert!(config_path.exists());

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("# [analysis]"));
    }

    #[test]
    fn fails_if_config_exists() {
        let dir = temp_dir();
        fs::write(dir.path().join(".kea.toml"), "existing").unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("use --force to overwrite"));
    }

    #[test]
    fn force_overwrites_existing() {
        let dir = temp_dir();
        fs::write(dir.path().join(".kea.toml"), "old content").unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();

        let contents = fs::read_to_string(dir.path().join(".kea.toml")).unwrap();
        assert!(contents.contains("# [paths]"));
    }

    #[test]
    fn updates_gitignore_when_present() {
        let dir = temp_dir();
        let home = temp_dir();
        fs::write(dir.path().join(".gitignore"), "*.log").unwrap();

        kea_with_home(home.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Added *.kea-cache.json to .gitignore"));

        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "*.log\n*.kea-cache.json\n");
    }

    #[test]
    fn home_init_leaves_gitignore_untouched() {
        let home = temp_dir();
        fs::write(home.path().join(".gitignore"), "*.log").unwrap();

        kea_with_home(home.path())
            .current_dir(home.path())
            .arg("init")
            .assert()
            .success();

        assert!(home.path().join(".kea.toml").exists());
        let gitignore = fs::read_to_string(home.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "*.log");
    }

    #[test]
    fn does_not_duplicate_gitignore_entry() {
        let dir = temp_dir();
        let home = temp_dir();
        fs::write(dir.path().join(".gitignore"), "*.log\n*.kea-cache.json\n").unwrap();

        kea_with_home(home.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success();

        let gitignore = fs::read_to_string(dir.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore.matches("*.kea-cache.json").count(), 1);
    }

    #[test]
    fn prints_config_preview() {
        let dir = temp_dir();

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success();

        let stdout = strip_ansi(&String::from_utf8_lossy(&assert.get_output().stdout));
        assert!(
            stdout.contains("Configuration written:"),
            "output did not include preview header: {stdout}"
        );
        assert!(
            stdout.contains("max_hops"),
            "output did not include template content: {stdout}"
        );
    }

    #[test]
    fn records_detected_project_paths() {
        let dir = setup_project();
        let home = temp_dir();
        fs::rename(dir.path().join("ontology.json"), dir.path().join("hep.json")).unwrap();

        kea_with_home(home.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success()
            .stdout(predicate::str::contains("Found ontology: hep.json"))
            .stdout(predicate::str::contains("Found train: data/train"));

        let contents = fs::read_to_string(dir.path().join(".kea.toml")).unwrap();
        assert!(contents.contains("[paths]\nontology = "), "{contents}");
        assert!(!home.path().join(".kea.toml").exists());

        // The recorded ontology path is what train picks up.
        kea_with_home(home.path())
            .current_dir(dir.path())
            .args(["train", "--epochs", "50"])
            .assert()
            .success();
        assert!(dir.path().join("model.json").exists());
    }

    #[test]
    fn warns_when_no_ontology_found() {
        let dir = temp_dir();
        let home = temp_dir();

        kea_with_home(home.path())
            .current_dir(dir.path())
            .arg("init")
            .assert()
            .success()
            .stderr(predicate::str::contains("no ontology found"));

        let contents = fs::read_to_string(dir.path().join(".kea.toml")).unwrap();
        assert!(contents.contains("# [paths]"));
        assert!(!contents.contains("\n[paths]"));
    }

    #[test]
    fn works_with_invalid_existing_config() {
        let dir = temp_dir();
        fs::write(dir.path().join(".kea.toml"), "[[[ not toml").unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["init", "--force"])
            .assert()
            .success();
    }
}

mod config {
    use super::*;

    #[test]
    fn shows_defaults_without_config() {
        let dir = temp_dir();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("[analysis]"))
            .stdout(predicate::str::contains("stemmer = \"english\""));
    }

    #[test]
    fn reflects_local_overrides() {
        let dir = temp_dir();
        fs::write(dir.path().join(".kea.toml"), "[features]\nmax_hops = 9\n").unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .success()
            .stdout(predicate::str::contains("max_hops = 9"));
    }

    #[test]
    fn fails_on_invalid_toml() {
        let dir = temp_dir();
        fs::write(dir.path().join(".kea.toml"), "[[[ not toml").unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid configuration"));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let dir = temp_dir();
        fs::write(dir.path().join(".kea.toml"), "[model]\nthreshold = 2.0\n").unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("config")
            .assert()
            .failure()
            .stderr(predicate::str::contains("model.threshold"));
    }
}

mod train {
    use super::*;

    #[test]
    fn fails_without_ontology() {
        let dir = temp_dir();
        fs::create_dir_all(dir.path().join("data/train")).unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("train")
            .assert()
            .failure()
            .stderr(predicate::str::contains("error:"));
    }

    #[test]
    fn fails_on_empty_corpus() {
        let dir = temp_dir();
        fs::write(dir.path().join("ontology.json"), ONTOLOGY).unwrap();
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["train", "empty"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("no documents found"));
    }

    #[test]
    fn writes_model_and_cache() {
        let dir = setup_project();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("train")
            .assert()
            .success()
            .stdout(predicate::str::contains("Model written to"));

        assert!(dir.path().join("model.json").exists());
        assert!(dir.path().join("ontology.json.kea-cache.json").exists());
    }

    #[test]
    fn json_report() {
        let dir = setup_project();

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["train", "--json", "--epochs", "50", "--model", "custom.json"])
            .assert()
            .success();

        let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(report["documents"], 3);
        assert_eq!(report["positives"], 4);
        assert!(dir.path().join("custom.json").exists());
    }

    #[test]
    fn rejects_nonpositive_learning_rate() {
        let dir = setup_project();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["train", "--learning-rate", "0"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("model.learning_rate"));

        assert!(!dir.path().join("model.json").exists());
    }

    #[test]
    fn divergence_fails_without_writing_model() {
        let dir = setup_project();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["train", "--learning-rate", "1e300", "--epochs", "5"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("diverged"));

        assert!(!dir.path().join("model.json").exists());
    }

    #[test]
    fn honors_configured_paths() {
        let dir = setup_project();
        fs::rename(dir.path().join("ontology.json"), dir.path().join("hep.json")).unwrap();
        fs::write(
            dir.path().join(".kea.toml"),
            "[paths]\nontology = \"hep.json\"\nmodel = \"models/hep-model.json\"\n",
        )
        .unwrap();

        train_project(dir.path());
        assert!(dir.path().join("models/hep-model.json").exists());
    }
}

mod test {
    use super::*;

    #[test]
    fn fails_without_model() {
        let dir = setup_project();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("test")
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load model"));
    }

    #[test]
    fn json_evaluation() {
        let dir = setup_project();
        train_project(dir.path());

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["test", "--json"])
            .assert()
            .success();

        let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert_eq!(report["documents"], 3);
        for key in ["precision", "recall", "f1", "accuracy"] {
            let value = report[key].as_f64().unwrap();
            assert!((0.0..=1.0).contains(&value), "{key} = {value}");
        }
    }

    #[test]
    fn prints_table() {
        let dir = setup_project();
        train_project(dir.path());

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .arg("test")
            .assert()
            .success();

        let stdout = strip_ansi(&String::from_utf8_lossy(&assert.get_output().stdout));
        assert!(stdout.contains("Precision"), "missing table: {stdout}");
    }
}

mod extract {
    use super::*;

    #[test]
    fn fails_on_nonexistent_file() {
        let dir = setup_project();
        train_project(dir.path());

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["extract", "missing.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn fails_on_corrupt_model() {
        let dir = setup_project();
        fs::write(dir.path().join("model.json"), "{}").unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["extract", "data/test/higgs.txt"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to load model"));
    }

    #[test]
    fn rejects_threshold_above_one() {
        let dir = setup_project();
        train_project(dir.path());

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["extract", "data/test/higgs.txt", "--threshold", "1.5"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--threshold"));
    }

    #[test]
    fn keywords_are_canonical_forms() {
        let dir = setup_project();
        train_project(dir.path());

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["extract", "data/test/higgs.txt", "--threshold", "0"])
            .assert()
            .success();

        // Threshold 0 selects every candidate.
        let stdout = String::from_utf8_lossy(&assert.get_output().stdout);
        let keywords: Vec<&str> = stdout.lines().collect();
        assert_eq!(keywords, vec!["Higgs boson", "detector"]);
    }

    #[test]
    fn json_explain_includes_candidates() {
        let dir = setup_project();
        train_project(dir.path());

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["extract", "data/test/dark.txt", "--json", "--explain"])
            .assert()
            .success();

        let output: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        let columns = output["columns"].as_array().unwrap();
        let candidates = output["candidates"].as_array().unwrap();
        assert_eq!(candidates.len(), 3);
        for c in candidates {
            assert_eq!(c["features"].as_array().unwrap().len(), columns.len());
        }
        assert!(output["keywords"].is_array());
    }

    #[test]
    fn json_without_explain_omits_candidates() {
        let dir = setup_project();
        train_project(dir.path());

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["extract", "data/test/dark.txt", "--json"])
            .assert()
            .success();

        let output: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
        assert!(output.get("candidates").is_none());
        assert!(output.get("columns").is_none());
    }

    #[test]
    fn explain_shows_ground_truth() {
        let dir = setup_project();
        train_project(dir.path());

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["extract", "data/test/higgs.txt", "--explain"])
            .assert()
            .success();

        let stdout = strip_ansi(&String::from_utf8_lossy(&assert.get_output().stdout));
        assert!(stdout.contains("Ground truth (1):"), "{stdout}");
        assert!(stdout.contains("Higgs boson (in candidates)"), "{stdout}");
        assert!(stdout.contains("Candidates (2):"), "{stdout}");
    }

    #[test]
    fn empty_document_has_no_keywords() {
        let dir = setup_project();
        train_project(dir.path());
        fs::write(dir.path().join("empty.txt"), "").unwrap();

        kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["extract", "empty.txt"])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());
    }

    #[test]
    fn debug_logs_go_to_stderr() {
        let dir = setup_project();
        train_project(dir.path());

        let assert = kea_with_home(dir.path())
            .current_dir(dir.path())
            .args(["-vv", "extract", "data/test/higgs.txt", "--json"])
            .assert()
            .success()
            .stderr(predicate::str::contains("loaded cached ontology"));

        // stdout stays parseable
        let stdout = &assert.get_output().stdout;
        assert!(serde_json::from_slice::<serde_json::Value>(stdout).is_ok());
    }
}
