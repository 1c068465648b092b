//! `runexport export` — translate run flags and print the compose document.

use std::process::ExitCode;

use clap::Args;
use runexport_common::config::ExportConfig;
use runexport_compose::{Positionals, RunOptions, marshal_as, translate};

use crate::output;

/// Arguments for the `export` command.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Flags accepted by `run`.
    #[command(flatten)]
    pub options: RunOptions,

    /// Image the container runs.
    pub image: String,

    /// Command and arguments passed to the container.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Executes the `export` command.
///
/// Diagnostics go to standard error. If any flag failed to translate, no
/// document is written and the exit status is a failure.
///
/// # Errors
///
/// Returns an error if serialization or writing the document fails.
pub fn execute(args: ExportArgs, config: &ExportConfig) -> anyhow::Result<ExitCode> {
    let positionals = Positionals::new(args.image, args.command);
    let translation = translate(&config.project_name, &args.options, &positionals);

    output::report(&translation)?;
    if translation.has_errors() {
        tracing::info!(
            errors = translation.errors.len(),
            "export aborted due to translation errors"
        );
        return Ok(ExitCode::FAILURE);
    }

    let bytes = marshal_as(&translation.project, config.format)?;
    output::write_document(&bytes, config.format)?;
    Ok(ExitCode::SUCCESS)
}
