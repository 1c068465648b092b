//! CLI command definitions and dispatch.

pub mod export;

use std::process::ExitCode;

use clap::{Arg, ArgAction, Parser, Subcommand};
use runexport_common::config::ExportConfig;
use runexport_common::constants::{BIN_NAME, FORMAT_ENV, PROJECT_ENV};

/// runexport — translate a container `run` invocation into a compose file.
#[derive(Parser, Debug)]
#[command(name = BIN_NAME, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: compose (YAML) or json.
    #[arg(long, global = true, alias = "dre-format", env = FORMAT_ENV, default_value = "compose")]
    pub format: String,

    /// Project name stamped on the generated document.
    #[arg(long, global = true, alias = "dre-project", env = PROJECT_ENV, default_value = "")]
    pub project: String,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the compose equivalent of `run [flags] <image> [command...]`.
    #[command(
        disable_help_flag = true,
        arg = Arg::new("help").long("help").action(ArgAction::Help).help("Print help")
    )]
    Export(export::ExportArgs),
}

/// Dispatches the parsed CLI command to its handler.
///
/// # Errors
///
/// Returns an error if the output format is unknown, serialization fails, or
/// the document cannot be written.
pub fn execute(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = ExportConfig {
        project_name: cli.project,
        format: cli.format.parse()?,
    };
    match cli.command {
        Command::Export(args) => export::execute(args, &config),
    }
}
