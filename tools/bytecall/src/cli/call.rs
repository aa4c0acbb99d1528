use std::fs::read;

use bytecall_runtime::Plugin;
use camino::Utf8PathBuf;
use clap::Parser;
use const_format::concatcp;
use eyre::{Result as EyreResult, WrapErr};
use serde::Serialize;
use tracing::info;

use crate::cli::Environment;
use crate::output::Report;

pub const EXAMPLES: &str = r"
  # Pass each argument as its UTF-8 bytes
  $ bytecall call hello.wasm concatenate foo bar

  # Pass each argument as hex-encoded bytes
  $ bytecall call --hex-args hello.wasm double_it 00ff
";

#[derive(Debug, Parser)]
#[command(about = "Call a function exported by a guest")]
#[command(after_help = concatcp!("Examples:", EXAMPLES))]
pub struct CallCommand {
    /// Guest binary, or its text form
    #[arg(value_name = "MODULE")]
    pub module: Utf8PathBuf,

    #[arg(value_name = "FUNCTION", value_parser = non_empty_string)]
    pub function: String,

    /// One value per argument, in order
    #[arg(value_name = "ARGS", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Decode every argument from hex instead of taking its UTF-8 bytes
    #[arg(long)]
    pub hex_args: bool,
}

impl CallCommand {
    pub fn run(self, environment: &Environment) -> EyreResult<()> {
        let code = read(&self.module)
            .wrap_err_with(|| format!("failed to read module from {:?}", self.module))?;

        let args = self.arguments()?;
        let args = args.iter().map(Vec::as_slice).collect::<Vec<_>>();

        let mut plugin = Plugin::new(&code, &environment.config.limits)
            .wrap_err_with(|| format!("failed to instantiate {:?}", self.module))?;

        info!(function = %self.function, arity = args.len(), "calling");

        let payload = plugin.call(&self.function, &args).into_result()?;

        environment
            .output
            .write(&CallResponse::new(&self.function, payload));

        Ok(())
    }

    fn arguments(&self) -> EyreResult<Vec<Vec<u8>>> {
        self.args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                if self.hex_args {
                    hex::decode(arg)
                        .wrap_err_with(|| format!("argument {index} is not valid hex"))
                } else {
                    Ok(arg.as_bytes().to_vec())
                }
            })
            .collect()
    }
}

fn non_empty_string(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("function name cannot be empty".to_owned());
    }

    Ok(value.to_owned())
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
enum Encoding {
    Utf8,
    Hex,
}

#[derive(Debug, Serialize)]
struct CallResponse<'a> {
    function: &'a str,
    encoding: Encoding,
    payload: String,
}

impl<'a> CallResponse<'a> {
    fn new(function: &'a str, payload: Vec<u8>) -> Self {
        let (encoding, payload) = match String::from_utf8(payload) {
            Ok(text) => (Encoding::Utf8, text),
            Err(err) => (Encoding::Hex, hex::encode(err.into_bytes())),
        };

        Self {
            function,
            encoding,
            payload,
        }
    }
}

impl Report for CallResponse<'_> {
    fn report(&self) {
        println!("{}", self.payload);
    }
}
