//! tilebake - Offline compiler for layered tile maps
//!
//! Turns a set of same-sized PNG layers into a deduplicated tile atlas and
//! a Lua data table. Art layers are split into 32x32 tiles and indexed;
//! metadata layers are annotation images that become per-cell gameplay
//! bits (collision shape, mount points, collectibles, reactions).

pub mod annotate;
pub mod cli;
pub mod discovery;
pub mod error;
pub mod index;
pub mod mount;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod types;
pub mod validation;

pub use discovery::{discover, load_images, LoadedImage, Manifest, Project, SourceImage};
pub use error::{BakeError, Result};
pub use index::{DedupTable, UsageReport, MAX_TILE_COUNT};
pub use pipeline::{compile, write_outputs, BuildSettings, Run};
pub use render::{build_atlas, render_table};
pub use types::{
    ArtGrid, Collision, Colour, Grid, Layer, MetadataCell, MetadataLayer, PixelBuffer, TileIndex,
    World, TILE_SIZE,
};
pub use validation::{validate_layer, Diagnostic, Severity, ValidationResult};
