//! Validate command implementation.
//!
//! Runs every pipeline stage up to serialization and reports diagnostics.
//! Nothing is written.

use clap::Args;

use crate::error::{BakeError, Result};
use crate::output::Printer;
use crate::pipeline::compile;
use crate::validation::{print_diagnostics, ValidationResult};

use super::{load_project_images, settings, InputArgs};

/// Run the pipeline and report diagnostics without writing output
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print diagnostics as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ValidateArgs, printer: &Printer) -> Result<()> {
    let project = args.input.project()?;
    let images = load_project_images(&project, printer)?;

    let mut report = ValidationResult::new();
    let compiled = compile(&images, &settings(&project), printer, &mut report);

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| BakeError::Config {
            message: format!("Failed to serialize diagnostics: {}", e),
            help: None,
        })?;
        println!("{}", json);
    } else {
        print_diagnostics(printer, &report);
    }

    compiled.map(|_| ())
}
