use std::fs::read;

use bytecall_runtime::inspect::{inspect, Inspection};
use camino::Utf8PathBuf;
use clap::Parser;
use color_eyre::owo_colors::OwoColorize;
use eyre::{bail, Result as EyreResult, WrapErr};

use crate::cli::Environment;
use crate::output::Report;

#[derive(Debug, Parser)]
#[command(about = "Report how a guest fits the calling convention")]
pub struct InspectCommand {
    /// Guest binary, or its text form
    #[arg(value_name = "MODULE")]
    pub module: Utf8PathBuf,

    /// Fail unless the guest can be hosted as is
    #[arg(long)]
    pub strict: bool,
}

impl InspectCommand {
    pub fn run(self, environment: &Environment) -> EyreResult<()> {
        let code = read(&self.module)
            .wrap_err_with(|| format!("failed to read module from {:?}", self.module))?;

        let inspection =
            inspect(&code).wrap_err_with(|| format!("failed to compile {:?}", self.module))?;

        environment.output.write(&inspection);

        if self.strict && !inspection.is_conforming() {
            bail!("{:?} cannot be hosted", self.module);
        }

        Ok(())
    }
}

impl Report for Inspection {
    fn report(&self) {
        println!("{}", "Functions".bold());
        for function in &self.functions {
            println!("  {} ({} arguments)", function.name.green(), function.arity);
        }
        for function in &self.nonconforming {
            println!(
                "  {} {} {}",
                function.name.yellow(),
                "not callable:".yellow(),
                function.signature
            );
        }

        println!("{}", "Imports".bold());
        for primitive in &self.primitives {
            println!("  {}", primitive.green());
        }
        for import in &self.foreign_imports {
            println!(
                "  {}.{} {} {}",
                import.module.red(),
                import.name.red(),
                "unresolvable:".red(),
                import.ty
            );
        }

        if !self.exports_memory {
            println!("{}", "Linear memory is not exported as \"memory\"".red());
        }

        if self.is_conforming() {
            println!("{}", "Conforming".green().bold());
        } else {
            println!("{}", "Not conforming".red().bold());
        }
    }
}
