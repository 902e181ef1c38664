//! Layers and the world they form.
//!
//! A world is a set of named layers that all share the same grid size.
//! Layers are kept in a `BTreeMap` so every consumer sees them in
//! alphabetical order, which is the order of the serialized tables.

use std::collections::BTreeMap;

use serde::Serialize;

use super::grid::Grid;
use super::metadata::MetadataGrid;
use super::tile::{TileIndex, TILE_SIZE};

/// A pixel coordinate in world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Ordered list of pixel coordinates, in raster scan order.
pub type PositionList = Vec<Point>;

/// Special coordinates collected from a metadata image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Positions {
    /// Right-facing mount points where the player may start.
    pub start: PositionList,
    /// Top-facing mount points acting as teleport stations.
    pub teleport: PositionList,
    /// Initial positions of throwable objects.
    pub throwables: PositionList,
}

impl Positions {
    pub fn is_empty(&self) -> bool {
        self.start.is_empty() && self.teleport.is_empty() && self.throwables.is_empty()
    }

    pub fn extend(&mut self, other: &Positions) {
        self.start.extend_from_slice(&other.start);
        self.teleport.extend_from_slice(&other.teleport);
        self.throwables.extend_from_slice(&other.throwables);
    }
}

/// Grid of tile references; `None` marks a blank cell.
pub type ArtGrid = Grid<Option<TileIndex>>;

/// Metadata grid plus the positions found while annotating it.
#[derive(Debug, Clone)]
pub struct MetadataLayer {
    pub grid: MetadataGrid,
    pub positions: Positions,
}

/// A named grid in the world.
#[derive(Debug, Clone)]
pub enum Layer {
    Art(ArtGrid),
    Metadata(MetadataLayer),
}

impl Layer {
    /// Grid dimensions in cells.
    pub fn size(&self) -> (usize, usize) {
        match self {
            Layer::Art(grid) => grid.size(),
            Layer::Metadata(layer) => layer.grid.size(),
        }
    }

    pub fn is_metadata(&self) -> bool {
        matches!(self, Layer::Metadata(_))
    }
}

/// All layers of a run, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct World {
    layers: BTreeMap<String, Layer>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer. Returns false if the name is already taken.
    pub fn insert(&mut self, name: impl Into<String>, layer: Layer) -> bool {
        let name = name.into();
        if self.layers.contains_key(&name) {
            return false;
        }
        self.layers.insert(name, layer);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.layers.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Iterate over layers in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Layer)> + '_ {
        self.layers.iter().map(|(name, layer)| (name.as_str(), layer))
    }

    /// Iterate over metadata layers in alphabetical order.
    pub fn metadata_layers(&self) -> impl Iterator<Item = (&str, &MetadataLayer)> + '_ {
        self.iter().filter_map(|(name, layer)| match layer {
            Layer::Metadata(m) => Some((name, m)),
            Layer::Art(_) => None,
        })
    }

    /// Iterate mutably over metadata layers in alphabetical order.
    pub fn metadata_layers_mut(
        &mut self,
    ) -> impl Iterator<Item = (&str, &mut MetadataLayer)> + '_ {
        self.layers.iter_mut().filter_map(|(name, layer)| match layer {
            Layer::Metadata(m) => Some((name.as_str(), m)),
            Layer::Art(_) => None,
        })
    }

    /// Iterate over art layers in alphabetical order.
    pub fn art_layers(&self) -> impl Iterator<Item = (&str, &ArtGrid)> + '_ {
        self.iter().filter_map(|(name, layer)| match layer {
            Layer::Art(grid) => Some((name, grid)),
            Layer::Metadata(_) => None,
        })
    }

    /// Pixel dimensions shared by all layers, taken from the first one.
    pub fn pixel_size(&self) -> (usize, usize) {
        self.layers
            .values()
            .next()
            .map_or((0, 0), |layer| {
                let (w, h) = layer.size();
                (w * TILE_SIZE, h * TILE_SIZE)
            })
    }

    /// All positions across metadata layers, in layer order.
    pub fn positions(&self) -> Positions {
        let mut all = Positions::default();
        for (_, layer) in self.metadata_layers() {
            all.extend(&layer.positions);
        }
        all
    }
}
