//! Tile usage statistics.
//!
//! Used to find layers that spend the tile budget on rarely reused tiles.
//! Each layer reports how many tiles it introduces, and how often those
//! new tiles are used across the whole world.

use serde::Serialize;

use crate::types::ArtGrid;

/// Usage class of a tile, from its total use count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Unique,
    Rare,
    Sparse,
    Uncommon,
    Common,
}

impl Rarity {
    pub const ALL: [Rarity; 5] = [
        Rarity::Unique,
        Rarity::Rare,
        Rarity::Sparse,
        Rarity::Uncommon,
        Rarity::Common,
    ];

    /// Use count thresholds: a tile used at most this many times gets the
    /// rarity at the same position in [`Rarity::ALL`].
    const THRESHOLDS: [usize; 4] = [1, 4, 8, 16];

    pub fn from_use_count(count: usize) -> Self {
        Self::THRESHOLDS
            .iter()
            .position(|&limit| count <= limit)
            .map_or(Rarity::Common, |i| Self::ALL[i])
    }

    pub fn label(self) -> &'static str {
        match self {
            Rarity::Unique => "unique",
            Rarity::Rare => "rare",
            Rarity::Sparse => "sparse",
            Rarity::Uncommon => "uncommon",
            Rarity::Common => "common",
        }
    }
}

/// Global use count for every unique tile.
#[derive(Debug, Clone, Default)]
pub struct TileUsage {
    counts: Vec<usize>,
}

impl TileUsage {
    pub fn new(unique_tiles: usize) -> Self {
        Self {
            counts: vec![0; unique_tiles],
        }
    }

    pub fn add_layer(&mut self, grid: &ArtGrid) {
        for (_, _, cell) in grid.iter_cells() {
            if let Some(index) = cell {
                let i = index.0 as usize;
                if i >= self.counts.len() {
                    self.counts.resize(i + 1, 0);
                }
                self.counts[i] += 1;
            }
        }
    }

    pub fn count(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0)
    }
}

/// Usage summary for one art layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerUsage {
    pub name: String,
    /// Non-blank cells in the layer.
    pub tiles: usize,
    /// Tiles first seen in this layer.
    pub new_tiles: usize,
    /// Rarity histogram of the new tiles, in [`Rarity::ALL`] order.
    pub rarity: [usize; 5],
}

/// Usage summary for all art layers, in input order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageReport {
    pub unique_tiles: usize,
    pub layers: Vec<LayerUsage>,
}

impl UsageReport {
    /// Build the report. `layers` must be given in the order they were
    /// indexed, otherwise "new" tiles are misattributed.
    pub fn build<'a>(layers: &[(&'a str, &'a ArtGrid)]) -> Self {
        let mut usage = TileUsage::default();
        for (_, grid) in layers {
            usage.add_layer(grid);
        }

        let mut next_new = 0usize;
        let mut report = UsageReport::default();
        for (name, grid) in layers {
            let mut layer = LayerUsage {
                name: name.to_string(),
                tiles: 0,
                new_tiles: 0,
                rarity: [0; 5],
            };
            for (_, _, cell) in grid.iter_cells() {
                let Some(index) = cell else {
                    continue;
                };
                layer.tiles += 1;

                // Indices are handed out in scan order, so a tile is new
                // exactly when it is the next unseen index.
                let i = index.0 as usize;
                if i < next_new {
                    continue;
                }
                next_new = i + 1;
                layer.new_tiles += 1;
                let rarity = Rarity::from_use_count(usage.count(i));
                layer.rarity[rarity as usize] += 1;
            }
            report.layers.push(layer);
        }
        report.unique_tiles = next_new;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Grid, TileIndex};

    fn art(rows: Vec<Vec<Option<u32>>>) -> ArtGrid {
        Grid::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(|c| c.map(TileIndex)).collect())
                .collect(),
        )
    }

    #[test]
    fn test_rarity_thresholds() {
        assert_eq!(Rarity::from_use_count(1), Rarity::Unique);
        assert_eq!(Rarity::from_use_count(2), Rarity::Rare);
        assert_eq!(Rarity::from_use_count(4), Rarity::Rare);
        assert_eq!(Rarity::from_use_count(8), Rarity::Sparse);
        assert_eq!(Rarity::from_use_count(16), Rarity::Uncommon);
        assert_eq!(Rarity::from_use_count(17), Rarity::Common);
    }

    #[test]
    fn test_usage_report_attributes_new_tiles() {
        let a = art(vec![vec![Some(0), Some(1), None]]);
        let b = art(vec![vec![Some(1), Some(2), Some(0)]]);
        let report = UsageReport::build(&[("a", &a), ("b", &b)]);

        assert_eq!(report.unique_tiles, 3);
        assert_eq!(report.layers[0].tiles, 2);
        assert_eq!(report.layers[0].new_tiles, 2);
        // Tiles 0 and 1 are used twice each
        assert_eq!(report.layers[0].rarity, [0, 2, 0, 0, 0]);
        assert_eq!(report.layers[1].tiles, 3);
        assert_eq!(report.layers[1].new_tiles, 1);
        assert_eq!(report.layers[1].rarity, [1, 0, 0, 0, 0]);
    }
}
