//! Command implementations and dispatch.

pub mod config;
pub mod extract;
pub mod init;
pub mod train;

use std::process::ExitCode;

use super::{args::Commands, context::CommandContext};

/// Dispatches to the selected subcommand.
pub fn run(command: Commands, ctx: &mut CommandContext) -> ExitCode {
    match command {
        Commands::Train(cmd) => train::run(ctx, &cmd),
        Commands::Test(cmd) => test::run(ctx, &cmd),
        Commands::Extract(cmd) => extract::run(ctx, &cmd),
        Commands::Init(cmd) => init::run(ctx, &cmd),
        Commands::Config => config::run(ctx),
    }
}
