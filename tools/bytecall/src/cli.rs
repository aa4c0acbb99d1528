use std::process::ExitCode;

use bytecall_runtime::errors::FunctionCallError;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use color_eyre::owo_colors::OwoColorize;
use const_format::concatcp;
use eyre::Report as EyreReport;
use serde::{Serialize, Serializer};
use thiserror::Error as ThisError;

use crate::config::ConfigFile;
use crate::output::{Format, Output, Report};

mod call;
mod config;
mod inspect;

use call::CallCommand;
use config::ConfigCommand;
use inspect::InspectCommand;

pub const EXAMPLES: &str = r"
  # Call a function with two string arguments
  $ bytecall call hello.wasm concatenate foo bar

  # Call a function with raw bytes
  $ bytecall call --hex-args hello.wasm complex_data a26178016179f94100

  # Check that a module can be hosted
  $ bytecall inspect hello.wasm

  # Print the limits in effect
  $ bytecall --config bytecall.toml config
";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(after_help = concatcp!(
    "Environment variables:\n",
    "  BYTECALL_CONFIG    Path to the configuration file\n\n",
    "Examples:",
    EXAMPLES
))]
pub struct RootCommand {
    #[command(flatten)]
    pub args: RootArgs,

    #[command(subcommand)]
    pub action: SubCommands,
}

#[derive(Debug, Subcommand)]
pub enum SubCommands {
    Call(CallCommand),
    Inspect(InspectCommand),
    Config(ConfigCommand),
}

#[derive(Debug, Parser)]
pub struct RootArgs {
    /// Configuration file, built-in defaults when absent
    #[arg(long, value_name = "PATH", global = true)]
    #[arg(env = "BYTECALL_CONFIG", hide_env_values = true)]
    pub config: Option<Utf8PathBuf>,

    #[arg(long, value_name = "FORMAT", default_value_t, value_enum, global = true)]
    pub output_format: Format,
}

pub struct Environment {
    pub output: Output,
    pub config: ConfigFile,
}

impl RootCommand {
    pub fn run(self) -> Result<(), CliError> {
        let output = Output::new(self.args.output_format);

        let config = match ConfigFile::load_or_default(self.args.config.as_deref()) {
            Ok(config) => config,
            Err(err) => {
                let err = CliError::Other(err);
                output.write(&err);
                return Err(err);
            }
        };

        let environment = Environment { output, config };

        let result = match self.action {
            SubCommands::Call(call) => call.run(&environment),
            SubCommands::Inspect(inspect) => inspect.run(&environment),
            SubCommands::Config(config) => config.run(&environment),
        };

        if let Err(err) = result {
            let err = match err.downcast::<FunctionCallError>() {
                Ok(err) => CliError::CallFailed(err),
                Err(err) => CliError::Other(err),
            };

            environment.output.write(&err);
            return Err(err);
        }

        Ok(())
    }
}

#[derive(Debug, Serialize, ThisError)]
#[serde(tag = "type", content = "data")]
pub enum CliError {
    #[error(transparent)]
    CallFailed(#[from] FunctionCallError),

    #[error(transparent)]
    Other(
        #[from]
        #[serde(serialize_with = "serialize_eyre_report")]
        EyreReport,
    ),
}

impl From<CliError> for ExitCode {
    fn from(error: CliError) -> Self {
        match error {
            CliError::CallFailed(FunctionCallError::ExecutionError { .. }) => Self::from(1),
            CliError::CallFailed(_) => Self::from(101),
            CliError::Other(_) => Self::from(2),
        }
    }
}

impl Report for CliError {
    fn report(&self) {
        match self {
            Self::CallFailed(err) => eprintln!("{} {err}", "error:".red().bold()),
            Self::Other(err) => eprintln!("{} {err:?}", "error:".red().bold()),
        }
    }
}

fn serialize_eyre_report<S>(report: &EyreReport, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(report.chain().map(ToString::to_string))
}
