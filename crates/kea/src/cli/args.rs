//! Clap argument definitions for the `kea` CLI.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "kea")]
#[command(about = "Ontology-anchored keyword extraction")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that loads the ontology.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Ontology JSON file [default: paths.ontology]
    #[arg(long)]
    pub ontology: Option<PathBuf>,

    /// Model file [default: paths.model]
    #[arg(short = 'm', long)]
    pub model: Option<PathBuf>,

    /// Rebuild the compiled ontology cache
    #[arg(long)]
    pub recreate_ontology: bool,
}

/// Arguments for `kea train`.
#[derive(Args, Debug, Clone)]
pub struct TrainCommand {
    /// Training corpus directory [default: paths.train]
    pub corpus: Option<PathBuf>,

    #[command(flatten)]
    /// Ontology and model locations.
    pub pipeline: PipelineArgs,

    /// Gradient descent passes [default: model.epochs]
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Gradient descent step size [default: model.learning_rate]
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Output the training report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kea test`.
#[derive(Args, Debug, Clone)]
pub struct TestCommand {
    /// Test corpus directory [default: paths.test]
    pub corpus: Option<PathBuf>,

    #[command(flatten)]
    /// Ontology and model locations.
    pub pipeline: PipelineArgs,

    /// Probability at or above which a candidate is a keyword [default: stored in model]
    #[arg(short = 't', long)]
    pub threshold: Option<f64>,

    /// Output the evaluation as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kea extract`.
#[derive(Args, Debug, Clone)]
pub struct ExtractCommand {
    /// Plain-text document to extract keywords from
    pub file: PathBuf,

    #[command(flatten)]
    /// Ontology and model locations.
    pub pipeline: PipelineArgs,

    /// Probability at or above which a candidate is a keyword [default: stored in model]
    #[arg(short = 't', long)]
    pub threshold: Option<f64>,

    /// Show every candidate with its probability and features
    #[arg(long)]
    pub explain: bool,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `kea init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Create global ~/.kea.toml instead
    #[arg(long)]
    pub global: bool,

    /// Overwrite existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Supported `kea` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Train a model on a corpus of documents with .key answers
    #[command(after_help = "\
CORPUS LAYOUT:
  data/train/paper1.txt     Document text; the first line is the title
  data/train/paper1.key     Ground-truth keywords, one per line

EXAMPLES:
  kea train
  kea train data/train --ontology hep.json --model hep-model.json
  kea train --epochs 2000 -v")]
    Train(TrainCommand),
    /// Evaluate a trained model against a corpus with .key answers
    Test(TestCommand),
    /// Extract keywords from a single document
    #[command(after_help = "\
EXAMPLES:
  kea extract paper.txt
  kea extract paper.txt --explain
  kea extract paper.txt --threshold 0.7 --json")]
    Extract(ExtractCommand),
    /// Initialize kea configuration in current directory
    Init(InitCommand),
    /// Show effective configuration settings
    Config,
}
