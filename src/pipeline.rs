//! The build pipeline.
//!
//! A [`Run`] owns everything one invocation produces: the dedup table and
//! the world of layers. Stages run strictly in order:
//!
//! 1. index art layers and annotate metadata layers, in input order
//! 2. check tile capacity
//! 3. detect mount points
//! 4. validate (resolving collectible directions)
//! 5. remove ghost collision
//! 6. serialize the table and the atlas
//!
//! Indexing is sequential on purpose: the first image to contain a tile
//! fixes its index.

use std::fs;
use std::path::{Path, PathBuf};

use crate::annotate::annotate;
use crate::discovery::{InputKind, LoadedImage};
use crate::error::{BakeError, Result};
use crate::index::{check_capacity, index_layer, DedupTable, UsageReport};
use crate::mount::detect_mount_points;
use crate::output::{display_path, plural, Printer};
use crate::render::{build_atlas, render_table, write_atlas};
use crate::types::{ArtGrid, Layer, World};
use crate::validation::{remove_ghosts, validate_layer, Diagnostic, ValidationResult};

/// State of one build.
#[derive(Debug, Default)]
pub struct Run {
    pub table: DedupTable,
    pub world: World,
    /// Art layer names in indexing order.
    art_order: Vec<String>,
}

impl Run {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index or annotate one image and add it as a layer.
    pub fn add_image(&mut self, image: &LoadedImage) -> Result<Layer> {
        let source = &image.source;
        if self.world.contains(&source.name) {
            return Err(BakeError::Dimension {
                path: source.path.clone(),
                message: format!("duplicate layer name '{}'", source.name),
                help: Some("Each input file stem must be unique".to_string()),
            });
        }

        let layer = match source.kind {
            InputKind::Art => {
                self.art_order.push(source.name.clone());
                Layer::Art(index_layer(&image.buffer, &mut self.table))
            }
            InputKind::Metadata => Layer::Metadata(annotate(&image.buffer)),
        };
        self.world.insert(source.name.clone(), layer.clone());
        Ok(layer)
    }

    /// Detect mounts and validate every metadata layer, then drop ghost
    /// collision. Returns all diagnostics; the caller decides whether
    /// errors are fatal.
    pub fn finish(&mut self, max_collectibles: usize) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.world.metadata_layers().next().is_none() {
            result.push(
                Diagnostic::warning(
                    "tilebake::validate::no-metadata",
                    "no metadata layer found; map info counts are zero",
                )
                .with_help("Add an annotation image whose name contains the metadata marker"),
            );
        }

        for (name, layer) in self.world.metadata_layers_mut() {
            detect_mount_points(&mut layer.grid);
            let mut layer_result = validate_layer(layer, max_collectibles);
            layer_result.set_layer(name);
            result.merge(layer_result);
            remove_ghosts(&mut layer.grid);
        }

        result
    }

    /// Tile usage across art layers, in indexing order.
    pub fn usage(&self) -> UsageReport {
        let layers: Vec<(&str, &ArtGrid)> = self
            .art_order
            .iter()
            .filter_map(|name| match self.world.get(name) {
                Some(Layer::Art(grid)) => Some((name.as_str(), grid)),
                _ => None,
            })
            .collect();
        UsageReport::build(&layers)
    }

    pub fn render_table(&self, prefix: &str) -> String {
        render_table(&self.world, self.table.len(), prefix)
    }
}

/// Settings that shape a build, taken from the manifest and CLI flags.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub max_collectibles: usize,
    pub table_prefix: String,
    pub tiles_per_row: usize,
}

/// Load every image into a fresh run and check tile capacity.
pub fn index_images(images: &[LoadedImage], printer: &Printer) -> Result<Run> {
    let mut run = Run::new();
    for image in images {
        let verb = match image.source.kind {
            InputKind::Art => "Indexing",
            InputKind::Metadata => "Annotating",
        };
        let before = run.table.len();
        printer.status(
            verb,
            &format!(
                "{} ({}x{})",
                display_path(&image.source.path),
                image.buffer.grid_width(),
                image.buffer.grid_height()
            ),
        );
        run.add_image(image)?;
        if image.source.kind == InputKind::Art {
            printer.detail(
                "Indexed",
                &format!(
                    "{} new, {} total",
                    plural(run.table.len() - before, "tile", "tiles"),
                    run.table.len()
                ),
            );
        }
    }
    check_capacity(&run.table)?;
    Ok(run)
}

/// Run the whole pipeline up to, but not including, writing outputs.
///
/// Fails with [`BakeError::Validation`] when any error diagnostic was
/// raised; the diagnostics are returned either way through `report`.
pub fn compile(
    images: &[LoadedImage],
    settings: &BuildSettings,
    printer: &Printer,
    report: &mut ValidationResult,
) -> Result<Run> {
    let mut run = index_images(images, printer)?;
    *report = run.finish(settings.max_collectibles);
    if report.has_errors() {
        return Err(BakeError::Validation {
            message: plural(report.error_count(), "error", "errors"),
            help: Some("Fix the annotations listed above".to_string()),
        });
    }
    Ok(run)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| BakeError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create directory: {}", e),
            })
        }
        _ => Ok(()),
    }
}

fn stage_outputs(run: &Run, settings: &BuildSettings, table_tmp: &Path, atlas_tmp: &Path) -> Result<()> {
    let text = run.render_table(&settings.table_prefix);
    fs::write(table_tmp, text).map_err(|e| BakeError::Io {
        path: table_tmp.to_path_buf(),
        message: format!("Failed to write table: {}", e),
    })?;
    let atlas = build_atlas(&run.table, settings.tiles_per_row);
    write_atlas(&atlas, atlas_tmp)
}

/// Write the table and atlas. Both are fully encoded to temporary files
/// next to their targets before either target is replaced.
pub fn write_outputs(run: &Run, settings: &BuildSettings, table: &Path, atlas: &Path) -> Result<()> {
    ensure_parent(table)?;
    ensure_parent(atlas)?;

    let table_tmp = temp_sibling(table);
    let atlas_tmp = temp_sibling(atlas);
    if let Err(e) = stage_outputs(run, settings, &table_tmp, &atlas_tmp) {
        let _ = fs::remove_file(&table_tmp);
        let _ = fs::remove_file(&atlas_tmp);
        return Err(e);
    }

    for (tmp, target) in [(&table_tmp, table), (&atlas_tmp, atlas)] {
        fs::rename(tmp, target).map_err(|e| BakeError::Io {
            path: target.to_path_buf(),
            message: format!("Failed to move output into place: {}", e),
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::SourceImage;
    use crate::types::{Colour, PixelBuffer, PixelFormat, TileIndex, TILE_SIZE};
    use tempfile::tempdir;

    fn settings() -> BuildSettings {
        BuildSettings {
            max_collectibles: 84,
            table_prefix: "world".to_string(),
            tiles_per_row: 60,
        }
    }

    fn loaded(name: &str, kind: InputKind, buffer: PixelBuffer) -> LoadedImage {
        LoadedImage {
            source: SourceImage {
                path: PathBuf::from(format!("{}.png", name)),
                name: name.to_string(),
                kind,
            },
            buffer,
        }
    }

    fn art_64x32(fill: bool) -> PixelBuffer {
        let mut buffer = PixelBuffer::transparent(64, 32, PixelFormat::GrayAlpha);
        if fill {
            buffer.fill_tile(0, 0, &[90, 255]);
            buffer.fill_tile(1, 0, &[90, 255]);
        }
        buffer
    }

    #[test]
    fn test_two_input_scenario() {
        let images = vec![
            loaded("bg", InputKind::Art, art_64x32(false)),
            loaded("fg", InputKind::Art, art_64x32(true)),
        ];
        let mut report = ValidationResult::new();
        let run = compile(&images, &settings(), &Printer::plain(false), &mut report).unwrap();

        assert_eq!(run.table.len(), 1);
        let Some(Layer::Art(fg)) = run.world.get("fg") else {
            panic!("fg missing");
        };
        assert_eq!(fg.get(0, 0), Some(&Some(TileIndex(0))));
        assert_eq!(fg.get(1, 0), Some(&Some(TileIndex(0))));

        let text = run.render_table("world");
        assert!(text.contains("world.bg =\n{\n\t2,\n\t-2,\n}\n"));
        assert!(text.contains("world.fg =\n{\n\t2,\n\t65537,\n}\n"));
        assert!(text.contains("world.UNIQUE_TILE_COUNT = 1\n"));

        // Only the missing metadata layer is reported
        assert_eq!(report.codes(), vec!["tilebake::validate::no-metadata"]);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_empty_tile_set_fails() {
        let images = vec![loaded("bg", InputKind::Art, art_64x32(false))];
        let mut report = ValidationResult::new();
        let result = compile(&images, &settings(), &Printer::plain(false), &mut report);
        assert!(matches!(result, Err(BakeError::Capacity { .. })));
    }

    #[test]
    fn test_duplicate_layer_rejected() {
        let mut run = Run::new();
        run.add_image(&loaded("bg", InputKind::Art, art_64x32(true)))
            .unwrap();
        let result = run.add_image(&loaded("bg", InputKind::Art, art_64x32(true)));
        assert!(matches!(result, Err(BakeError::Dimension { .. })));
    }

    #[test]
    fn test_validation_failure_reports_every_error() {
        // Two breakable markers without collision
        let mut meta = PixelBuffer::transparent(64, 32, PixelFormat::Rgba);
        for col in 0..2 {
            meta.put_pixel(col * TILE_SIZE + 16, 16, &Colour::RED.to_rgba());
        }
        let images = vec![
            loaded("fg", InputKind::Art, art_64x32(true)),
            loaded("metadata", InputKind::Metadata, meta),
        ];
        let mut report = ValidationResult::new();
        let result = compile(&images, &settings(), &Printer::plain(false), &mut report);

        assert!(matches!(result, Err(BakeError::Validation { .. })));
        assert_eq!(report.error_count(), 2);
        assert!(report
            .iter()
            .all(|d| d.layer.as_deref() == Some("metadata")));
    }

    #[test]
    fn test_ghosts_removed_after_mount_detection() {
        // A ghost square in the middle of an otherwise empty 5x5 map
        let mut meta = PixelBuffer::transparent(160, 160, PixelFormat::Rgba);
        meta.fill_tile(2, 2, &Colour::RED.to_rgba());
        let images = vec![
            loaded("fg", InputKind::Art, {
                let mut b = PixelBuffer::transparent(160, 160, PixelFormat::GrayAlpha);
                b.fill_tile(0, 0, &[1, 255]);
                b
            }),
            loaded("metadata", InputKind::Metadata, meta),
        ];
        let mut report = ValidationResult::new();
        let run = compile(&images, &settings(), &Printer::plain(false), &mut report).unwrap();

        let Some(Layer::Metadata(layer)) = run.world.get("metadata") else {
            panic!("metadata missing");
        };
        let cell = layer.grid.get(2, 2).unwrap();
        assert_eq!(cell.pack(), crate::types::bits::MOUNT_MASK);
    }

    #[test]
    fn test_write_outputs_replaces_targets() {
        let images = vec![loaded("fg", InputKind::Art, art_64x32(true))];
        let mut report = ValidationResult::new();
        let run = compile(&images, &settings(), &Printer::plain(false), &mut report).unwrap();

        let dir = tempdir().unwrap();
        let table = dir.path().join("out/world.lua");
        let atlas = dir.path().join("out/tiles.png");
        write_outputs(&run, &settings(), &table, &atlas).unwrap();

        let text = fs::read_to_string(&table).unwrap();
        assert!(text.starts_with("world = world or {}\n"));
        let img = image::open(&atlas).unwrap();
        assert_eq!((img.width(), img.height()), (1920, 32));

        let leftovers: Vec<_> = fs::read_dir(dir.path().join("out"))
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_usage_follows_input_order() {
        let mut run = Run::new();
        run.add_image(&loaded("zz", InputKind::Art, art_64x32(true)))
            .unwrap();
        let mut other = PixelBuffer::transparent(64, 32, PixelFormat::GrayAlpha);
        other.fill_tile(0, 0, &[90, 255]);
        other.fill_tile(1, 0, &[12, 255]);
        run.add_image(&loaded("aa", InputKind::Art, other)).unwrap();

        let usage = run.usage();
        assert_eq!(usage.layers[0].name, "zz");
        assert_eq!(usage.layers[0].new_tiles, 1);
        assert_eq!(usage.layers[1].name, "aa");
        assert_eq!(usage.layers[1].new_tiles, 1);
        assert_eq!(usage.unique_tiles, 2);
    }
}
