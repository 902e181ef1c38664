//! Build command implementation.
//!
//! Runs the full pipeline and writes the data table and tile atlas.

use std::path::PathBuf;

use clap::Args;

use crate::error::Result;
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{compile, write_outputs};
use crate::validation::{print_diagnostics, ValidationResult};

use super::{load_project_images, settings, InputArgs};

/// Build the data table and tile atlas
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output path of the Lua data table
    #[arg(long, short)]
    pub table: Option<PathBuf>,

    /// Output path of the tile atlas
    #[arg(long, short)]
    pub atlas: Option<PathBuf>,

    /// Name of the top-level Lua table
    #[arg(long)]
    pub prefix: Option<String>,

    /// Atlas width in tiles
    #[arg(long)]
    pub tiles_per_row: Option<usize>,
}

pub fn run(args: BuildArgs, printer: &Printer) -> Result<()> {
    let mut project = args.input.project()?;
    let manifest = &mut project.manifest;
    if let Some(table) = args.table {
        manifest.table = table;
    }
    if let Some(atlas) = args.atlas {
        manifest.atlas = atlas;
    }
    if let Some(prefix) = args.prefix {
        manifest.table_prefix = prefix;
    }
    if let Some(per_row) = args.tiles_per_row {
        manifest.tiles_per_row = per_row;
    }
    manifest.check()?;

    let images = load_project_images(&project, printer)?;
    let settings = settings(&project);

    let mut report = ValidationResult::new();
    let compiled = compile(&images, &settings, printer, &mut report);
    if report.iter().next().is_some() {
        print_diagnostics(printer, &report);
    }
    let run = compiled?;

    let manifest = &project.manifest;
    write_outputs(&run, &settings, &manifest.table, &manifest.atlas)?;

    printer.info("Wrote", &display_path(&manifest.table));
    printer.info("Wrote", &display_path(&manifest.atlas));
    printer.success(
        "Finished",
        &format!(
            "{} from {}",
            plural(run.table.len(), "unique tile", "unique tiles"),
            plural(images.len(), "layer", "layers")
        ),
    );

    Ok(())
}
