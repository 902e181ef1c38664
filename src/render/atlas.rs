//! Tile atlas image.
//!
//! Every unique tile is drawn once, in index order, left to right and top
//! to bottom. Tile `i` sits at `((i % per_row) * 32, (i / per_row) * 32)`.

use std::path::Path;

use image::{GrayAlphaImage, ImageFormat};

use crate::error::{BakeError, Result};
use crate::index::DedupTable;
use crate::types::{PixelFormat, TILE_SIZE};

/// Default atlas width in tiles.
pub const DEFAULT_TILES_PER_ROW: usize = 60;

/// Pixel dimensions of an atlas holding `tile_count` tiles.
pub fn atlas_size(tile_count: usize, tiles_per_row: usize) -> (u32, u32) {
    let per_row = tiles_per_row.max(1);
    let rows = tile_count.div_ceil(per_row);
    ((per_row * TILE_SIZE) as u32, (rows * TILE_SIZE) as u32)
}

/// Draw all unique tiles into one grayscale+alpha image.
pub fn build_atlas(table: &DedupTable, tiles_per_row: usize) -> GrayAlphaImage {
    let per_row = tiles_per_row.max(1);
    let (width, height) = atlas_size(table.len(), per_row);
    let mut atlas = GrayAlphaImage::new(width, height);

    let bpp = PixelFormat::GrayAlpha.bytes_per_pixel();
    let stride = width as usize * bpp;
    let pixels: &mut [u8] = &mut atlas;

    for (index, tile) in table.iter() {
        let i = index.0 as usize;
        let x0 = (i % per_row) * TILE_SIZE;
        let y0 = (i / per_row) * TILE_SIZE;
        for (y, row) in tile.rows().enumerate() {
            let start = (y0 + y) * stride + x0 * bpp;
            pixels[start..start + row.len()].copy_from_slice(row);
        }
    }

    atlas
}

/// Encode an atlas as PNG.
pub fn write_atlas(atlas: &GrayAlphaImage, path: &Path) -> Result<()> {
    atlas
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| BakeError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write PNG: {}", e),
        })
}
