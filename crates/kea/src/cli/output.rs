//! Rendering and JSON serialization for CLI output.

use std::{path::Path, process::ExitCode, time::Duration};

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use kea::{Evaluation, Extraction, TestReport, TrainReport};
use serde::Serialize;

/// ANSI color codes for terminal output.
pub mod colors {
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Cyan text (for headers).
    pub const CYAN: &str = "\x1b[36m";
    /// Green text (for predicted keywords).
    pub const GREEN: &str = "\x1b[32m";
    /// Yellow text (for warnings).
    pub const YELLOW: &str = "\x1b[33m";
    /// Dim/gray text (for less important info).
    pub const DIM: &str = "\x1b[2m";
    /// Reset all formatting.
    pub const RESET: &str = "\x1b[0m";
}

/// Formats a header with bold cyan styling.
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a success marker (green).
pub fn success(text: &str) -> String {
    format!("{}{}{}", colors::GREEN, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Prints any serializable value as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Milliseconds with fractional part, for JSON timings.
fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// JSON output for `kea train`.
#[derive(Serialize)]
struct JsonTrainReport<'a> {
    /// Where the model was written.
    model: &'a Path,
    /// Documents in the corpus.
    documents: usize,
    /// Rows the classifier was fitted on.
    rows: usize,
    /// Positive rows.
    positives: usize,
    /// Candidates injected from ground truth.
    augmented: usize,
    /// Stage timings in milliseconds.
    timings_ms: JsonTrainTimings,
}

/// Training stage timings.
#[derive(Serialize)]
struct JsonTrainTimings {
    /// Candidate generation.
    candidates: f64,
    /// Feature extraction.
    features: f64,
    /// Scaling and fitting.
    fit: f64,
}

/// Outputs a training report.
pub fn output_train_report(report: &TrainReport, model: &Path, json: bool) -> ExitCode {
    if json {
        return print_json(&JsonTrainReport {
            model,
            documents: report.documents,
            rows: report.rows,
            positives: report.positives,
            augmented: report.augmented,
            timings_ms: JsonTrainTimings {
                candidates: millis(report.candidate_time),
                features: millis(report.feature_time),
                fit: millis(report.fit_time),
            },
        });
    }

    println!("{}", header("Training"));
    println!("   Documents:  {}", report.documents);
    println!(
        "   Rows:       {} ({} positive, {} injected)",
        report.rows, report.positives, report.augmented
    );
    println!(
        "   {}",
        dim(&format!(
            "candidates {:.2?}, features {:.2?}, fit {:.2?}",
            report.candidate_time, report.feature_time, report.fit_time
        ))
    );
    println!();
    println!("Model written to {}", model.display());
    ExitCode::SUCCESS
}

/// JSON output for `kea test`.
#[derive(Serialize)]
struct JsonTestReport {
    /// Documents in the corpus.
    documents: usize,
    /// Candidate rows scored.
    rows: usize,
    /// Scores against the ground truth.
    #[serde(flatten)]
    evaluation: Evaluation,
}

/// Outputs an evaluation report.
pub fn output_test_report(report: &TestReport, json: bool) -> ExitCode {
    if json {
        return print_json(&JsonTestReport {
            documents: report.documents,
            rows: report.rows,
            evaluation: report.evaluation,
        });
    }

    let e = &report.evaluation;
    println!("{}", header("Evaluation"));
    println!(
        "   {}",
        dim(&format!(
            "{} documents, {} candidates",
            report.documents, report.rows
        ))
    );
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Precision", "Recall", "F1", "Accuracy"]);
    table.add_row(vec![
        Cell::new(format!("{:.4}", e.precision)),
        Cell::new(format!("{:.4}", e.recall)),
        Cell::new(format!("{:.4}", e.f1)),
        Cell::new(format!("{:.4}", e.accuracy)),
    ]);
    println!("{table}");
    println!(
        "{}",
        dim(&format!(
            "features {:.2?}, prediction {:.2?}",
            report.feature_time, report.predict_time
        ))
    );
    ExitCode::SUCCESS
}

/// One candidate in JSON extraction output.
#[derive(Serialize)]
struct JsonCandidate<'a> {
    /// Canonical form.
    keyword: &'a str,
    /// Whether the model selected it.
    predicted: bool,
    /// Positive-class probability.
    probability: f64,
    /// Whether it is a ground-truth answer.
    expected: bool,
    /// Feature values in `columns` order.
    features: &'a [f64],
}

/// JSON output for `kea extract`.
#[derive(Serialize)]
struct JsonExtraction<'a> {
    /// The document.
    file: &'a Path,
    /// Predicted keywords, sorted.
    keywords: Vec<&'a str>,
    /// Feature column names, present with `--explain`.
    #[serde(skip_serializing_if = "Option::is_none")]
    columns: Option<&'a [&'a str]>,
    /// Every candidate, present with `--explain`.
    #[serde(skip_serializing_if = "Option::is_none")]
    candidates: Option<Vec<JsonCandidate<'a>>>,
}

/// Outputs extracted keywords, optionally with every scored candidate.
pub fn output_extraction(
    extraction: &Extraction,
    file: &Path,
    columns: &[&str],
    explain: bool,
    json: bool,
) -> ExitCode {
    if json {
        let candidates = explain.then(|| {
            extraction
                .candidates
                .iter()
                .map(|c| JsonCandidate {
                    keyword: &c.canonical,
                    predicted: c.predicted,
                    probability: c.probability,
                    expected: c.expected,
                    features: &c.features,
                })
                .collect()
        });
        return print_json(&JsonExtraction {
            file,
            keywords: extraction.keywords.iter().map(String::as_str).collect(),
            columns: explain.then_some(columns),
            candidates,
        });
    }

    if explain {
        print_explanation(extraction, columns);
        println!("{}", subheader("Keywords:"));
    }
    if extraction.keywords.is_empty() {
        eprintln!("{}", dim("No keywords found."));
    }
    for keyword in &extraction.keywords {
        println!("{keyword}");
    }
    ExitCode::SUCCESS
}

/// Prints ground truth and the full candidate table.
fn print_explanation(extraction: &Extraction, columns: &[&str]) {
    println!(
        "{}",
        subheader(&format!("Ground truth ({}):", extraction.answers.len()))
    );
    if extraction.answers.is_empty() {
        println!("   {}", dim("(none)"));
    }
    for answer in &extraction.answers {
        let found = extraction.candidates.iter().any(|c| &c.canonical == answer);
        if found {
            println!("   {answer} {}", dim("(in candidates)"));
        } else {
            println!("   {answer} {}", warning("(not generated)"));
        }
    }
    println!();

    println!(
        "{}",
        subheader(&format!("Candidates ({}):", extraction.candidates.len()))
    );
    if extraction.candidates.is_empty() {
        println!("   {}", dim("(none)"));
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    let mut head = vec!["Keyword", "Pred", "Truth", "P"];
    head.extend_from_slice(columns);
    table.set_header(head);
    for c in &extraction.candidates {
        let mut row = vec![
            Cell::new(&c.canonical),
            Cell::new(if c.predicted { success("yes") } else { String::new() }),
            Cell::new(if c.expected { "yes" } else { "" }),
            Cell::new(format!("{:.3}", c.probability)),
        ];
        row.extend(c.features.iter().map(|v| Cell::new(format!("{v:.3}"))));
        table.add_row(row);
    }
    println!("{table}");
    println!();
}
