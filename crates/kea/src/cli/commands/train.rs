//! Implementation of `kea train`.

use std::process::ExitCode;

use kea::{train, train_params};
use kea_model::ModelError;

use crate::cli::{
    args::TrainCommand,
    context::{CommandContext, report},
    output::output_train_report,
};

/// Trains a model on a corpus and writes it to the model path.
pub fn run(ctx: &mut CommandContext, cmd: &TrainCommand) -> ExitCode {
    ctx.apply_overrides(&cmd.pipeline);
    let corpus = match ctx.resolve_path(
        cmd.corpus.as_deref(),
        ctx.config.paths.train.as_deref(),
        "training corpus",
    ) {
        Ok(path) => path,
        Err(code) => return code,
    };
    let model_path = match ctx.model_path() {
        Ok(path) => path,
        Err(code) => return code,
    };
    if let Some(epochs) = cmd.epochs {
        ctx.config.model.epochs = epochs;
    }
    if let Some(learning_rate) = cmd.learning_rate {
        ctx.config.model.learning_rate = learning_rate;
    }
    let pipeline = match ctx.pipeline(cmd.pipeline.recreate_ontology) {
        Ok(p) => p,
        Err(code) => return code,
    };

    let params = train_params(&ctx.config.model);
    let (model, train_report) = match train(&pipeline, &corpus, params) {
        Ok(result) => result,
        Err(e) => return report(&e),
    };

    if let Err(e) = model.save(&model_path) {
        return report_model_error(&e);
    }

    output_train_report(&train_report, &model_path, cmd.json)
}

/// Prints a model persistence error.
fn report_model_error(error: &ModelError) -> ExitCode {
    eprintln!("error: failed to save model: {error}");
    ExitCode::FAILURE
}
