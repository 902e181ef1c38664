//! Init command implementation.
//!
//! Generates a `tilebake.yaml` manifest. Directories below the project
//! root that contain PNG files become the input list.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::discovery::{scan_directory, Manifest, MANIFEST_FILENAME};
use crate::error::{BakeError, Result};
use crate::output::{display_path, plural, Printer};

/// Initialize a tilebake project by generating a tilebake.yaml manifest
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to scan (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing tilebake.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let manifest_path = args.path.join(MANIFEST_FILENAME);

    if manifest_path.exists() && !args.force {
        return Err(BakeError::Config {
            message: format!("{} already exists", MANIFEST_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    printer.status("Scanning", &display_path(&args.path));
    let images = scan_directory(&args.path, &Manifest::default().rebase(&args.path))?;

    let mut input_dirs = BTreeSet::new();
    for image in &images {
        if let Some(parent) = image.parent() {
            let relative = parent.strip_prefix(&args.path).unwrap_or(parent);
            if relative != Path::new("") {
                input_dirs.insert(relative.to_path_buf());
            }
        }
    }
    let manifest = Manifest {
        inputs: input_dirs.into_iter().collect(),
        ..Default::default()
    };

    fs::write(&manifest_path, manifest.to_yaml()?).map_err(|e| BakeError::Io {
        path: manifest_path.clone(),
        message: format!("Failed to write manifest: {}", e),
    })?;

    if !manifest.inputs.is_empty() {
        let dirs: Vec<String> = manifest.inputs.iter().map(|d| display_path(d)).collect();
        printer.info("Discovered", &dirs.join(", "));
    }
    printer.success(
        "Created",
        &format!(
            "{} ({} found)",
            MANIFEST_FILENAME,
            plural(images.len(), "image", "images")
        ),
    );

    Ok(())
}
