//! Project manifest (tilebake.yaml) parsing.
//!
//! The manifest names the input images, the two output files, and the
//! knobs of the table format. Every field has a default, so an empty file
//! is a valid manifest.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BakeError, Result};
use crate::render::{DEFAULT_TABLE_PREFIX, DEFAULT_TILES_PER_ROW};
use crate::validation::DEFAULT_MAX_COLLECTIBLES;

/// Project manifest loaded from tilebake.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Input images or directories of images, in processing order.
    pub inputs: Vec<PathBuf>,

    /// Output path of the Lua data table.
    pub table: PathBuf,

    /// Output path of the tile atlas image.
    pub atlas: PathBuf,

    /// Images whose file name contains this string are metadata layers.
    pub metadata_marker: String,

    /// Name of the Lua table everything is stored under.
    pub table_prefix: String,

    /// Atlas width in tiles.
    pub tiles_per_row: usize,

    /// Collectible limit checked during validation.
    pub max_collectibles: usize,

    /// Patterns to skip when expanding input directories.
    pub excludes: Vec<String>,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            inputs: vec![],
            table: PathBuf::from("world.lua"),
            atlas: PathBuf::from("world_tiles.png"),
            metadata_marker: "metadata".to_string(),
            table_prefix: DEFAULT_TABLE_PREFIX.to_string(),
            tiles_per_row: DEFAULT_TILES_PER_ROW,
            max_collectibles: DEFAULT_MAX_COLLECTIBLES,
            excludes: vec![],
        }
    }
}

/// True for names usable as Lua table keys without quoting.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

impl Manifest {
    /// Load manifest from a tilebake.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BakeError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read manifest: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse manifest from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Manifest = serde_yaml::from_str(content).map_err(|e| BakeError::Config {
            message: format!("Invalid manifest: {}", e),
            help: Some("Check tilebake.yaml syntax".to_string()),
        })?;
        manifest.check()?;
        Ok(manifest)
    }

    /// Reject settings that would produce an unusable table or atlas.
    pub fn check(&self) -> Result<()> {
        if self.tiles_per_row == 0 {
            return Err(BakeError::Config {
                message: "tiles_per_row must be at least 1".to_string(),
                help: None,
            });
        }
        if !is_identifier(&self.table_prefix) {
            return Err(BakeError::Config {
                message: format!("table_prefix '{}' is not a Lua identifier", self.table_prefix),
                help: Some("Use letters, digits and underscores, not starting with a digit".to_string()),
            });
        }
        if self.metadata_marker.is_empty() {
            return Err(BakeError::Config {
                message: "metadata_marker must not be empty".to_string(),
                help: Some("An empty marker would treat every image as metadata".to_string()),
            });
        }
        Ok(())
    }

    /// Check if a path should be excluded based on exclude patterns.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy().replace('\\', "/");
        self.excludes
            .iter()
            .any(|pattern| Self::matches_pattern(&path_str, pattern))
    }

    /// Simple glob pattern matching.
    fn matches_pattern(path: &str, pattern: &str) -> bool {
        if let Some(suffix) = pattern.strip_prefix("**/") {
            // **/dir/* matches anything inside dir anywhere in the path
            if let Some(dir) = suffix.strip_suffix("/*") {
                return path.starts_with(&format!("{}/", dir))
                    || path.contains(&format!("/{}/", dir));
            }
            return path.ends_with(suffix);
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            if !pattern.contains('/') {
                return path.ends_with(suffix);
            }
        }

        if let Some(prefix) = pattern.strip_suffix("/*") {
            return path.starts_with(&format!("{}/", prefix))
                || path.contains(&format!("/{}/", prefix));
        }

        path.contains(pattern)
    }

    /// Input paths, defaulting to the project root.
    pub fn effective_inputs(&self, root: &Path) -> Vec<PathBuf> {
        if self.inputs.is_empty() {
            vec![root.to_path_buf()]
        } else {
            self.inputs.clone()
        }
    }

    /// True if `path` is one of the files this manifest writes.
    pub fn is_output(&self, path: &Path) -> bool {
        [&self.table, &self.atlas]
            .into_iter()
            .any(|output| same_file(output, path))
    }

    /// Resolve relative input and output paths against `base`.
    pub fn rebase(mut self, base: &Path) -> Self {
        let join = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                base.join(p)
            }
        };
        self.inputs = self.inputs.iter().map(|p| join(p)).collect();
        self.table = join(&self.table);
        self.atlas = join(&self.atlas);
        self
    }

    /// Render as YAML, for `tilebake init`.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| BakeError::Config {
            message: format!("Failed to serialize manifest: {}", e),
            help: None,
        })
    }
}
