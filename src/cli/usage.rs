//! Usage command implementation.
//!
//! Indexes the art layers and reports how many tiles each one introduces
//! and how often those tiles are reused.

use clap::Args;

use crate::error::{BakeError, Result};
use crate::index::{Rarity, UsageReport};
use crate::output::Printer;
use crate::pipeline::index_images;

use super::{load_project_images, InputArgs};

/// Report how often tiles are used across art layers
#[derive(Args, Debug, Default)]
pub struct UsageArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print the report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

/// Plain text rendering, one line per layer plus a total.
pub fn format_report(report: &UsageReport) -> String {
    let mut out = String::new();
    for layer in &report.layers {
        let histogram: Vec<String> = Rarity::ALL
            .iter()
            .zip(layer.rarity)
            .filter(|(_, n)| *n > 0)
            .map(|(rarity, n)| format!("{} {}", n, rarity.label()))
            .collect();
        out.push_str(&format!(
            "{}: {} tiles, {} new",
            layer.name, layer.tiles, layer.new_tiles
        ));
        if !histogram.is_empty() {
            out.push_str(&format!(" ({})", histogram.join(", ")));
        }
        out.push('\n');
    }
    out.push_str(&format!("total: {} unique tiles\n", report.unique_tiles));
    out
}

pub fn run(args: UsageArgs, printer: &Printer) -> Result<()> {
    let project = args.input.project()?;
    let images = load_project_images(&project, printer)?;
    let run = index_images(&images, printer)?;
    let report = run.usage();

    if args.json {
        let json = serde_json::to_string_pretty(&report).map_err(|e| BakeError::Config {
            message: format!("Failed to serialize usage report: {}", e),
            help: None,
        })?;
        println!("{}", json);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::LayerUsage;

    #[test]
    fn test_format_report() {
        let report = UsageReport {
            unique_tiles: 7,
            layers: vec![
                LayerUsage {
                    name: "bg0".to_string(),
                    tiles: 40,
                    new_tiles: 5,
                    rarity: [1, 0, 0, 0, 4],
                },
                LayerUsage {
                    name: "fg".to_string(),
                    tiles: 3,
                    new_tiles: 0,
                    rarity: [0; 5],
                },
            ],
        };

        insta::assert_snapshot!(format_report(&report), @r###"
        bg0: 40 tiles, 5 new (1 unique, 4 common)
        fg: 3 tiles, 0 new
        total: 7 unique tiles
        "###);
    }
}
