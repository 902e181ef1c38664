pub mod build;
pub mod completions;
pub mod init;
pub mod list;
pub mod usage;
pub mod validate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::discovery::{discover, load_images, LoadedImage, Project};
use crate::error::Result;
use crate::output::{plural, Printer};
use crate::pipeline::BuildSettings;

/// tilebake - Compile layered tile art into tile tables and gameplay metadata
#[derive(Parser, Debug)]
#[command(name = "tilebake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Print detail lines while building
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the data table and tile atlas
    Build(build::BuildArgs),

    /// Run the pipeline and report diagnostics without writing output
    Validate(validate::ValidateArgs),

    /// List the annotations found in a metadata image
    List(list::ListArgs),

    /// Report how often tiles are used across art layers
    Usage(usage::UsageArgs),

    /// Initialize a tilebake project (generates tilebake.yaml)
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Input selection and pipeline settings shared by the commands that run
/// the pipeline. Flags override the manifest.
#[derive(Args, Debug, Default, Clone)]
pub struct InputArgs {
    /// Input images or directories, in processing order
    pub inputs: Vec<PathBuf>,

    /// Manifest to use instead of ./tilebake.yaml
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// File name substring that marks metadata images
    #[arg(long)]
    pub marker: Option<String>,

    /// Collectible limit per metadata layer
    #[arg(long)]
    pub max_collectibles: Option<usize>,
}

impl InputArgs {
    /// Load the manifest and apply flag overrides.
    pub fn project(&self) -> Result<Project> {
        let mut project = discover(".", self.config.as_deref())?;
        let manifest = &mut project.manifest;
        if !self.inputs.is_empty() {
            manifest.inputs = self.inputs.clone();
        }
        if let Some(marker) = &self.marker {
            manifest.metadata_marker = marker.clone();
        }
        if let Some(max) = self.max_collectibles {
            manifest.max_collectibles = max;
        }
        manifest.check()?;
        Ok(project)
    }
}

/// Expand and decode every input of a project.
pub fn load_project_images(project: &Project, printer: &Printer) -> Result<Vec<LoadedImage>> {
    let sources = project.sources()?;
    printer.detail(
        "Found",
        &plural(sources.len(), "input image", "input images"),
    );
    load_images(&sources)
}

/// Pipeline settings from a project's manifest.
pub fn settings(project: &Project) -> BuildSettings {
    let manifest = &project.manifest;
    BuildSettings {
        max_collectibles: manifest.max_collectibles,
        table_prefix: manifest.table_prefix.clone(),
        tiles_per_row: manifest.tiles_per_row,
    }
}
