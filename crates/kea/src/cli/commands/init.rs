//! Implementation of `kea init`.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use kea_config::{
    CONFIG_FILENAME, ProjectLayout, detect_project, global_config_path, is_home_dir,
    local_template, project_template,
};

use crate::cli::{args::InitCommand, context::CommandContext, output::subheader};

/// Pattern matching compiled ontology caches.
const CACHE_PATTERN: &str = "*.kea-cache.json";

/// Writes a `.kea.toml` recording the project files found in the working
/// directory.
///
/// The global file, written with `--global` or when run from the home
/// directory, gets the plain template: paths found in one project would be
/// wrong for every other.
pub fn run(ctx: &CommandContext, cmd: &InitCommand) -> ExitCode {
    let global = cmd.global || is_home_dir(&ctx.cwd);
    let Some(config_path) = target_path(&ctx.cwd, global) else {
        eprintln!("error: could not determine home directory");
        return ExitCode::FAILURE;
    };

    if config_path.exists() && !cmd.force {
        eprintln!(
            "error: configuration file already exists: {}",
            config_path.display()
        );
        eprintln!("use --force to overwrite");
        return ExitCode::FAILURE;
    }

    let (layout, template) = if global {
        (ProjectLayout::default(), local_template())
    } else {
        let layout = detect_project(&ctx.cwd);
        let template = project_template(&layout);
        (layout, template)
    };

    if let Err(e) = fs::write(&config_path, &template) {
        eprintln!("error: failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    println!("Created {}", config_path.display());
    if !global {
        print_findings(&layout);
    }
    println!();
    println!("{}", subheader("Configuration written:"));
    for line in template.lines() {
        println!("  {line}");
    }

    if !global && let Err(e) = update_gitignore(&ctx.cwd) {
        eprintln!("warning: could not update .gitignore: {e}");
    }

    ExitCode::SUCCESS
}

/// Chooses between the project and the global configuration file.
fn target_path(cwd: &Path, global: bool) -> Option<PathBuf> {
    if global {
        global_config_path()
    } else {
        Some(cwd.join(CONFIG_FILENAME))
    }
}

/// Reports detected project files, and what training still needs.
fn print_findings(layout: &ProjectLayout) {
    for (key, value) in layout.entries() {
        println!("Found {key}: {value}");
    }
    if layout.ontology.is_none() {
        eprintln!("warning: no ontology found; set paths.ontology before running 'kea train'");
    }
    if layout.train.is_none() {
        eprintln!("warning: no training corpus found; expected data/train or train");
    }
}

/// Appends the ontology cache pattern to an existing `.gitignore` in `dir`.
fn update_gitignore(dir: &Path) -> io::Result<()> {
    let gitignore_path = dir.join(".gitignore");
    if !gitignore_path.is_file() {
        return Ok(());
    }

    let contents = fs::read_to_string(&gitignore_path)?;
    if contents.lines().any(|line| line.trim() == CACHE_PATTERN) {
        return Ok(());
    }

    let mut file = fs::OpenOptions::new().append(true).open(&gitignore_path)?;
    let separator = if contents.is_empty() || contents.ends_with('\n') {
        ""
    } else {
        "\n"
    };
    writeln!(file, "{separator}{CACHE_PATTERN}")?;
    println!("Added {CACHE_PATTERN} to .gitignore");
    Ok(())
}
