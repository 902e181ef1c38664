//! List command implementation.
//!
//! Prints every annotation found in a metadata image, one per line.

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;

use crate::annotate::annotate_tile;
use crate::discovery::{load_image, InputKind, SourceImage};
use crate::error::{BakeError, Result};
use crate::output::{display_path, plural, Printer};
use crate::types::PixelBuffer;

/// List the annotations found in a metadata image
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Metadata image to inspect
    pub image: PathBuf,

    /// Print annotations as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// One annotation at a pixel position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    pub x: usize,
    pub y: usize,
    pub label: &'static str,
}

/// Annotations of a metadata buffer in raster order of cells.
///
/// Tags are reported at the cell's top-left corner; starting positions and
/// teleport stations at their exact pixel.
pub fn collect_annotations(buffer: &PixelBuffer) -> Vec<Annotation> {
    let mut found = Vec::new();
    for tile in buffer.tiles() {
        let cell = annotate_tile(&tile);
        if let Some(tag) = cell.tag {
            let origin = cell.origin();
            found.push(Annotation {
                x: origin.x,
                y: origin.y,
                label: tag.label(),
            });
        }
        if let Some(p) = cell.start {
            found.push(Annotation {
                x: p.x,
                y: p.y,
                label: "starting position",
            });
        }
        if let Some(p) = cell.teleport {
            found.push(Annotation {
                x: p.x,
                y: p.y,
                label: "teleport station",
            });
        }
    }
    found
}

pub fn run(args: ListArgs, printer: &Printer) -> Result<()> {
    let source = SourceImage {
        path: args.image.clone(),
        name: String::new(),
        kind: InputKind::Metadata,
    };
    let loaded = load_image(&source)?;
    let annotations = collect_annotations(&loaded.buffer);

    if args.json {
        let json = serde_json::to_string_pretty(&annotations).map_err(|e| BakeError::Config {
            message: format!("Failed to serialize annotations: {}", e),
            help: None,
        })?;
        println!("{}", json);
        return Ok(());
    }

    for a in &annotations {
        println!("{},{}: {}", a.x, a.y, a.label);
    }
    printer.detail(
        "Listed",
        &format!(
            "{} in {}",
            plural(annotations.len(), "annotation", "annotations"),
            display_path(&args.image)
        ),
    );
    Ok(())
}
