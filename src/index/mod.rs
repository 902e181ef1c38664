//! Tile indexing for art layers.
//!
//! Every non-blank tile of an art image is interned in the run's
//! [`DedupTable`]. Images must be indexed one at a time, in input order,
//! and tiles in raster order: the first occurrence of a tile fixes its
//! index, and existing data tables depend on that assignment.

mod table;
mod usage;

pub use table::{hash_rows, DedupTable, StoredTile};
pub use usage::{LayerUsage, Rarity, TileUsage, UsageReport};

use crate::error::{BakeError, Result};
use crate::types::{ArtGrid, Grid, PixelBuffer};

/// Maximum number of unique tiles. Serialized indices are 1-based and
/// must fit in a signed 16-bit half of a packed table entry.
pub const MAX_TILE_COUNT: usize = 32767;

/// Assign indices to the tiles of one art image.
///
/// Blank tiles map to `None` and are never interned.
pub fn index_layer(buffer: &PixelBuffer, table: &mut DedupTable) -> ArtGrid {
    let mut grid = Grid::new(buffer.grid_width(), buffer.grid_height());
    for tile in buffer.tiles() {
        if tile.is_blank() {
            continue;
        }
        let index = table.intern(&tile);
        grid.set(tile.col(), tile.row(), Some(index));
    }
    grid
}

/// Check the unique tile count once all art layers are indexed.
pub fn check_capacity(table: &DedupTable) -> Result<()> {
    check_count(table.len())
}

/// Accept between one and [`MAX_TILE_COUNT`] unique tiles.
pub fn check_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(BakeError::Capacity {
            message: "No tiles to output".to_string(),
            help: Some("At least one art layer must contain a non-transparent tile".to_string()),
        });
    }
    if count > MAX_TILE_COUNT {
        return Err(BakeError::Capacity {
            message: format!(
                "Too many tiles: limit is {}, got {}",
                MAX_TILE_COUNT, count
            ),
            help: Some("Reuse identical tiles across layers to reduce the count".to_string()),
        });
    }
    Ok(())
}
