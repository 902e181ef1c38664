//! Core domain types for tilebake.
//!
//! This module contains the fundamental types used throughout the pipeline:
//! - `PixelBuffer` / `TileView` - decoded images and borrowed 32x32 tiles
//! - `Grid` - row-major cell storage shared by all layers
//! - `MetadataCell` - structured gameplay metadata and its packed form
//! - `World` - the named layers of one run

mod colour;
mod grid;
mod metadata;
mod tile;
mod world;

pub use colour::{Colour, Marker};
pub use grid::Grid;
pub use metadata::{
    bits, Collectible, Collision, Direction, MetadataCell, MetadataGrid, MountFlags, Reaction,
};
pub use tile::{PixelBuffer, PixelFormat, TileIndex, TileView, TILE_SIZE};
pub use world::{ArtGrid, Layer, MetadataLayer, Point, PositionList, Positions, World};
