use clap::{Parser, ValueEnum};
use eyre::Result as EyreResult;

use crate::cli::Environment;
use crate::config::ConfigFile;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
#[clap(rename_all = "lower")]
pub enum PrintFormat {
    #[default]
    Toml,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Print the configuration in effect")]
pub struct ConfigCommand {
    #[arg(long, value_enum, default_value_t)]
    pub print: PrintFormat,
}

impl ConfigCommand {
    pub fn run(self, environment: &Environment) -> EyreResult<()> {
        println!("{}", render(&environment.config, self.print)?);

        Ok(())
    }
}

fn render(config: &ConfigFile, format: PrintFormat) -> EyreResult<String> {
    let rendered = match format {
        PrintFormat::Toml => toml::to_string_pretty(config)?,
        PrintFormat::Json => serde_json::to_string_pretty(config)?,
    };

    Ok(rendered)
}
