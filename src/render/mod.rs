//! Output rendering for tilebake.
//!
//! This module turns a finished world into its two artifacts: the Lua data
//! table and the tile atlas image.

mod atlas;
mod table;

pub use atlas::{atlas_size, build_atlas, write_atlas, DEFAULT_TILES_PER_ROW};
pub use table::{
    art_entries, pack_tiles, render_table, scanned_rows, unpack_tiles, MapSummary, TableWriter,
    DEFAULT_TABLE_PREFIX,
};
