//! Implementation of `kea config`.

use std::process::ExitCode;

use kea::PipelineError;
use kea_config::{discover_config_files, is_global_config};

use crate::cli::{
    context::{CommandContext, report},
    output::{dim, subheader},
};

/// Shows the config files in effect and the merged settings.
pub fn run(ctx: &CommandContext) -> ExitCode {
    let files = discover_config_files(&ctx.cwd);
    if files.is_empty() {
        println!("{}", dim("# No configuration files found; showing defaults."));
    } else {
        println!("{}", subheader("# Config files (highest precedence first):"));
        for path in &files {
            let scope = if is_global_config(path) { " (global)" } else { "" };
            println!("{}", dim(&format!("#   {}{scope}", path.display())));
        }
    }
    println!();

    match ctx.config.settings_to_toml() {
        Ok(toml) => {
            print!("{toml}");
            ExitCode::SUCCESS
        }
        Err(e) => report(&PipelineError::from(e)),
    }
}
