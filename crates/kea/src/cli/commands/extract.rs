//! Implementation of `kea extract`.

use std::process::ExitCode;

use kea::extract;
use kea_features::FEATURE_COLUMNS;

use crate::cli::{
    args::ExtractCommand,
    context::{CommandContext, apply_threshold, report},
    output::output_extraction,
};

/// Extracts keywords from one document.
pub fn run(ctx: &mut CommandContext, cmd: &ExtractCommand) -> ExitCode {
    ctx.apply_overrides(&cmd.pipeline);
    let file = ctx.cwd.join(&cmd.file);
    if !file.is_file() {
        eprintln!("error: file not found: {}", cmd.file.display());
        return ExitCode::FAILURE;
    }

    let mut model = match ctx.load_model() {
        Ok(model) => model,
        Err(code) => return code,
    };
    if let Err(code) = apply_threshold(&mut model, cmd.threshold) {
        return code;
    }
    let pipeline = match ctx.pipeline(cmd.pipeline.recreate_ontology) {
        Ok(p) => p,
        Err(code) => return code,
    };

    match extract(&pipeline, &model, &file) {
        Ok(extraction) => output_extraction(
            &extraction,
            &cmd.file,
            &FEATURE_COLUMNS,
            cmd.explain,
            cmd.json,
        ),
        Err(e) => report(&e),
    }
}
