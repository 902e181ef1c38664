//! Content-addressed table of unique tiles.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::types::{TileIndex, TileView};

/// Hash a sequence of rows, order-sensitively.
///
/// Each row is hashed on its own, then folded in with the boost
/// `hash_combine` mix so swapping two rows changes the result.
pub fn hash_rows<'a>(rows: impl Iterator<Item = &'a [u8]>) -> u64 {
    rows.fold(0u64, |seed, row| {
        let mut hasher = DefaultHasher::new();
        row.hash(&mut hasher);
        let h = hasher.finish();
        seed ^ h
            .wrapping_add(0x9e37_79b9)
            .wrapping_add(seed << 6)
            .wrapping_add(seed >> 2)
    })
}

/// A unique tile, copied out of its source image at insertion time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTile {
    bytes: Vec<u8>,
    row_len: usize,
}

impl StoredTile {
    fn from_view(view: &TileView<'_>) -> Self {
        let row_len = view.rows().next().map_or(0, |row| row.len());
        Self {
            bytes: view.to_bytes(),
            row_len,
        }
    }

    /// The tile's rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.bytes.chunks(self.row_len.max(1))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn matches(&self, view: &TileView<'_>) -> bool {
        self.rows().eq(view.rows())
    }
}

/// Maps tile content to the first index it was assigned.
///
/// Buckets are keyed by [`hash_rows`]; within a bucket, candidates are
/// compared row by row, so colliding hashes never merge distinct tiles.
/// Indices are assigned sequentially from zero and never reused.
#[derive(Debug, Default)]
pub struct DedupTable {
    buckets: HashMap<u64, Vec<TileIndex>>,
    tiles: Vec<StoredTile>,
}

impl DedupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unique tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Look up a tile without inserting it.
    pub fn find(&self, view: &TileView<'_>) -> Option<TileIndex> {
        self.find_hashed(hash_rows(view.rows()), view)
    }

    fn find_hashed(&self, hash: u64, view: &TileView<'_>) -> Option<TileIndex> {
        self.buckets.get(&hash).and_then(|candidates| {
            candidates
                .iter()
                .copied()
                .find(|&index| self.tiles[index.0 as usize].matches(view))
        })
    }

    /// Return the index of this content, assigning the next one if unseen.
    pub fn intern(&mut self, view: &TileView<'_>) -> TileIndex {
        let hash = hash_rows(view.rows());
        if let Some(index) = self.find_hashed(hash, view) {
            return index;
        }

        let index = TileIndex(self.tiles.len() as u32);
        self.tiles.push(StoredTile::from_view(view));
        self.buckets.entry(hash).or_default().push(index);
        index
    }

    /// Stored content for an index.
    pub fn get(&self, index: TileIndex) -> Option<&StoredTile> {
        self.tiles.get(index.0 as usize)
    }

    /// Unique tiles in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (TileIndex, &StoredTile)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, tile)| (TileIndex(i as u32), tile))
    }
}
