//! Command-line interface for the `kea` keyword extractor.

mod cli;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::{CommandContext, args::Cli, args::Commands, commands, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = match &cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    let mut ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &mut ctx)
}
