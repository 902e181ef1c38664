//! Input expansion.
//!
//! Turns the input list into an ordered list of source images. Files are
//! kept in the order given; a directory expands to the `.png` files below
//! it in sorted path order. The order matters: tiles first seen in an
//! earlier image receive lower indices.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{BakeError, Result};

use super::manifest::{is_identifier, Manifest};

/// How an input image is decoded and processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Grayscale+alpha art, indexed into the tile table.
    Art,
    /// Full colour annotation, classified into metadata.
    Metadata,
}

/// One input image and the layer it becomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    /// Layer name, the file stem.
    pub name: String,
    pub kind: InputKind,
}

impl SourceImage {
    /// Classify a path. The layer name must be usable as a table key.
    pub fn from_path(path: &Path, metadata_marker: &str) -> Result<Self> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        if !is_identifier(&name) {
            return Err(BakeError::Config {
                message: format!(
                    "{}: layer name '{}' is not a valid table key",
                    path.display(),
                    name
                ),
                help: Some("Rename the file using letters, digits and underscores".to_string()),
            });
        }

        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy())
            .unwrap_or_default();
        let kind = if file_name.contains(metadata_marker) {
            InputKind::Metadata
        } else {
            InputKind::Art
        };

        Ok(Self {
            path: path.to_path_buf(),
            name,
            kind,
        })
    }

    pub fn is_metadata(&self) -> bool {
        self.kind == InputKind::Metadata
    }
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

/// PNG files below a directory, sorted by path.
///
/// The manifest's own output files are skipped. Unreadable entries are an
/// error: silently dropping a layer would shift every later tile index.
pub fn scan_directory(root: &Path, manifest: &Manifest) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|e| BakeError::Io {
            path: e.path().unwrap_or(root).to_path_buf(),
            message: format!("Failed to read directory: {}", e),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.into_path();
        if is_png(&path) && !manifest.is_excluded(&path) && !manifest.is_output(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Expand inputs into source images, in processing order.
///
/// Fails on missing inputs, on invalid layer names, and when two inputs
/// map to the same layer name.
pub fn scan_inputs(inputs: &[PathBuf], manifest: &Manifest) -> Result<Vec<SourceImage>> {
    let mut sources = Vec::new();
    let mut seen = HashSet::new();

    for input in inputs {
        let files = if input.is_dir() {
            scan_directory(input, manifest)?
        } else if input.is_file() {
            vec![input.clone()]
        } else {
            return Err(BakeError::Io {
                path: input.clone(),
                message: "No such file or directory".to_string(),
            });
        };

        for file in files {
            let source = SourceImage::from_path(&file, &manifest.metadata_marker)?;
            if !seen.insert(source.name.clone()) {
                return Err(BakeError::Dimension {
                    path: file,
                    message: format!("duplicate layer name '{}'", source.name),
                    help: Some("Each input file stem must be unique".to_string()),
                });
            }
            sources.push(source);
        }
    }

    Ok(sources)
}
