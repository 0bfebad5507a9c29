//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use kea::{Context, PipelineError};
use kea_config::{Config, ConfigError, check_threshold};
use kea_model::LearningModel;

use super::args::PipelineArgs;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used for `init`, which should work even when an existing config file is
    /// invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Applies command-line path overrides to the loaded configuration.
    ///
    /// Relative paths given on the command line resolve against the working
    /// directory.
    pub fn apply_overrides(&mut self, args: &PipelineArgs) {
        if let Some(path) = &args.ontology {
            self.config.paths.ontology = Some(self.cwd.join(path));
        }
        if let Some(path) = &args.model {
            self.config.paths.model = Some(self.cwd.join(path));
        }
    }

    /// Resolves an optional command-line path, falling back to a configured one.
    pub fn resolve_path(
        &self,
        arg: Option<&Path>,
        configured: Option<&Path>,
        name: &'static str,
    ) -> Result<PathBuf, ExitCode> {
        arg.map(|p| self.cwd.join(p))
            .or_else(|| configured.map(Path::to_path_buf))
            .ok_or_else(|| report(&PipelineError::MissingPath(name)))
    }

    /// Builds the pipeline context, loading the configured ontology.
    pub fn pipeline(&self, recreate: bool) -> Result<Context, ExitCode> {
        Context::from_config(&self.config, recreate).map_err(|e| report(&e))
    }

    /// Returns the configured model path.
    pub fn model_path(&self) -> Result<PathBuf, ExitCode> {
        self.resolve_path(None, self.config.paths.model.as_deref(), "model")
    }

    /// Loads the trained model from the configured path.
    pub fn load_model(&self) -> Result<LearningModel, ExitCode> {
        let path = self.model_path()?;
        LearningModel::load(&path).map_err(|e| {
            eprintln!("error: failed to load model: {e}");
            if !path.exists() {
                eprintln!("Run 'kea train' to create one.");
            }
            ExitCode::FAILURE
        })
    }
}

/// Applies a command-line decision threshold to a loaded model.
pub fn apply_threshold(model: &mut LearningModel, threshold: Option<f64>) -> Result<(), ExitCode> {
    let Some(threshold) = threshold else {
        return Ok(());
    };
    check_threshold(threshold).map_err(|reason| {
        report(&PipelineError::from(ConfigError::InvalidSetting {
            key: "--threshold",
            reason,
        }))
    })?;
    model.set_threshold(threshold);
    Ok(())
}

/// Prints a pipeline error and converts it into a failing exit code.
pub fn report(error: &PipelineError) -> ExitCode {
    eprintln!("error: {error}");
    ExitCode::FAILURE
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| report(&PipelineError::from(e)))
}
