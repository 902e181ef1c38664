//! Input discovery and image loading for tilebake projects.
//!
//! This module finds the `tilebake.yaml` manifest, expands the input list
//! into source images, and decodes them into pixel buffers.
//!
//! # Example
//!
//! ```ignore
//! use tilebake::discovery::{discover, load_images};
//!
//! let project = discover(".", None)?;
//! let sources = project.sources()?;
//! let images = load_images(&sources)?;
//! ```

mod loader;
mod manifest;
mod scanner;

use std::path::{Path, PathBuf};

use crate::error::Result;

pub use loader::{check_uniform_size, load_image, load_images, LoadedImage};
pub use manifest::{is_identifier, Manifest};
pub use scanner::{scan_directory, scan_inputs, InputKind, SourceImage};

/// The name of the manifest file.
pub const MANIFEST_FILENAME: &str = "tilebake.yaml";

/// A manifest and where it came from.
#[derive(Debug, Clone)]
pub struct Project {
    /// Directory relative paths are resolved against.
    pub root: PathBuf,

    /// The loaded manifest (default if no tilebake.yaml was found).
    pub manifest: Manifest,

    /// Path of the manifest file, if one was loaded.
    pub manifest_path: Option<PathBuf>,
}

impl Project {
    /// Expand the manifest's inputs into source images.
    pub fn sources(&self) -> Result<Vec<SourceImage>> {
        scan_inputs(&self.manifest.effective_inputs(&self.root), &self.manifest)
    }
}

/// Load the project configuration.
///
/// An explicit `config` path must exist. Otherwise `tilebake.yaml` in
/// `root` is used when present, and defaults when not. Relative paths in
/// the manifest are resolved against the manifest's directory, or `root`
/// for the defaults.
pub fn discover(root: impl AsRef<Path>, config: Option<&Path>) -> Result<Project> {
    let root = root.as_ref().to_path_buf();

    let manifest_path = match config {
        Some(path) => Some(path.to_path_buf()),
        None => Some(root.join(MANIFEST_FILENAME)).filter(|p| p.exists()),
    };

    let Some(path) = manifest_path else {
        return Ok(Project {
            manifest: Manifest::default().rebase(&root),
            root,
            manifest_path: None,
        });
    };

    let base = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map_or_else(|| root.clone(), Path::to_path_buf);
    let manifest = Manifest::load(&path)?.rebase(&base);

    Ok(Project {
        root: base,
        manifest,
        manifest_path: Some(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BakeError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_discover_without_manifest() {
        let dir = tempdir().unwrap();
        let project = discover(dir.path(), None).unwrap();

        assert!(project.manifest_path.is_none());
        assert_eq!(project.manifest.atlas, dir.path().join("world_tiles.png"));
        assert_eq!(project.manifest.tiles_per_row, 60);
    }

    #[test]
    fn test_discover_with_manifest() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILENAME),
            "inputs:\n  - art/\ntable: out/world.lua\n",
        )
        .unwrap();

        let project = discover(dir.path(), None).unwrap();
        assert!(project.manifest_path.is_some());
        assert_eq!(project.manifest.inputs, vec![dir.path().join("art/")]);
        assert_eq!(project.manifest.table, dir.path().join("out/world.lua"));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempdir().unwrap();
        let result = discover(dir.path(), Some(&dir.path().join("other.yaml")));
        assert!(matches!(result, Err(BakeError::Io { .. })));
    }

    #[test]
    fn test_default_inputs_follow_config_directory() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("level")).unwrap();
        fs::write(dir.path().join("level/bg.png"), b"").unwrap();
        fs::write(dir.path().join("level/world_tiles.png"), b"").unwrap();
        fs::write(dir.path().join("level/tilebake.yaml"), "").unwrap();

        let config = dir.path().join("level/tilebake.yaml");
        let project = discover(dir.path(), Some(&config)).unwrap();
        let names: Vec<String> = project
            .sources()
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["bg"]);
    }

    #[test]
    fn test_project_sources() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("art")).unwrap();
        fs::write(dir.path().join("art/bg.png"), b"").unwrap();
        fs::write(dir.path().join("art/metadata.png"), b"").unwrap();
        fs::write(dir.path().join(MANIFEST_FILENAME), "inputs: [art]\n").unwrap();

        let sources = discover(dir.path(), None).unwrap().sources().unwrap();
        let kinds: Vec<_> = sources.iter().map(|s| (s.name.as_str(), s.kind)).collect();
        assert_eq!(
            kinds,
            vec![("bg", InputKind::Art), ("metadata", InputKind::Metadata)]
        );
    }
}
