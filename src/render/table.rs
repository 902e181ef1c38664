//! Lua data table output.
//!
//! Art layers are run-length encoded: a run of blank cells becomes one
//! negative count, and non-blank cells are packed two per entry as
//! `(first << 16) | second`. Metadata layers are written uncompressed, one
//! brace row per grid row. Layers appear in alphabetical order.

use crate::types::{bits, ArtGrid, Layer, MetadataGrid, MetadataLayer, Point, TileIndex, World};

/// Values per line in art tables.
const VALUES_PER_LINE: usize = 10;

/// Default name of the Lua table holding everything.
pub const DEFAULT_TABLE_PREFIX: &str = "world";

/// Run-length encode serialized tile values.
///
/// `None` is a blank cell. An unpaired value waiting for its partner is
/// written alone when a blank run starts or the data ends.
pub fn pack_tiles(cells: impl IntoIterator<Item = Option<TileIndex>>) -> Vec<i32> {
    let mut entries = Vec::new();
    let mut pending: Option<i32> = None;
    let mut blanks = 0i32;

    for cell in cells {
        match cell {
            None => {
                if let Some(value) = pending.take() {
                    entries.push(value);
                }
                blanks += 1;
            }
            Some(index) => {
                if blanks > 0 {
                    entries.push(-blanks);
                    blanks = 0;
                }
                let value = index.serialized() as i32;
                match pending.take() {
                    Some(first) => entries.push((first << 16) | value),
                    None => pending = Some(value),
                }
            }
        }
    }

    if let Some(value) = pending {
        entries.push(value);
    }
    if blanks > 0 {
        entries.push(-blanks);
    }
    entries
}

/// Decode entries written by [`pack_tiles`].
pub fn unpack_tiles(entries: &[i32]) -> Vec<Option<TileIndex>> {
    let mut cells = Vec::new();
    let to_index = |value: i32| Some(TileIndex(value as u32 - 1));

    for &entry in entries {
        if entry < 0 {
            cells.extend(std::iter::repeat(None).take(entry.unsigned_abs() as usize));
        } else if entry > 0xffff {
            cells.push(to_index(entry >> 16));
            cells.push(to_index(entry & 0xffff));
        } else if entry > 0 {
            cells.push(to_index(entry));
        }
    }
    cells
}

/// Rows written for an art layer: up to and including the last row with a
/// non-blank cell. The first row is always kept.
pub fn scanned_rows(grid: &ArtGrid) -> usize {
    grid.rows()
        .rposition(|row| row.iter().any(Option::is_some))
        .map_or(1, |last| last + 1)
        .min(grid.height())
}

/// Packed entries of an art layer, prefixed with the scanned cell count.
pub fn art_entries(grid: &ArtGrid) -> Vec<i32> {
    let rows = scanned_rows(grid);
    let cells = grid.rows().take(rows).flatten().copied();
    let mut entries = vec![(rows * grid.width()) as i32];
    entries.extend(pack_tiles(cells));
    entries
}

/// Gameplay totals written to the map info section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapSummary {
    /// Collectible cells.
    pub items: usize,
    /// Upper bound on tiles that can be removed during play.
    pub removable_tiles: usize,
}

impl MapSummary {
    pub fn from_grid(grid: &MetadataGrid) -> Self {
        let mut summary = Self::default();
        for (_, _, cell) in grid.iter_cells() {
            if cell.collectible.is_some() {
                summary.items += 1;
                // The background tile behind the item
                summary.removable_tiles += 1;
            }
            if cell.reaction.is_chain() || cell.reaction.is_terminal() {
                summary.removable_tiles += 1;
            } else if cell.breakable {
                // Foreground and background
                summary.removable_tiles += 2;
            }
        }
        summary
    }

    pub fn from_world(world: &World) -> Self {
        world
            .metadata_layers()
            .map(|(_, layer)| Self::from_grid(&layer.grid))
            .fold(Self::default(), |a, b| Self {
                items: a.items + b.items,
                removable_tiles: a.removable_tiles + b.removable_tiles,
            })
    }
}

fn coordinates(points: &[Point]) -> String {
    let inner: Vec<String> = points
        .iter()
        .map(|p| format!("{{{}, {}}}", p.x, p.y))
        .collect();
    format!("{{{}}}", inner.join(", "))
}

/// Builds the text of a data table.
pub struct TableWriter {
    prefix: String,
    output: String,
}

impl TableWriter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            output: String::new(),
        }
    }

    fn constant(&mut self, name: &str, value: impl std::fmt::Display) {
        self.output
            .push_str(&format!("{}.{} = {}\n", self.prefix, name, value));
    }

    /// Bit constants and position lists.
    pub fn write_constants(&mut self, world: &World) {
        self.output
            .push_str(&format!("{0} = {0} or {{}}\n-- {{{{{{ Constants\n", self.prefix));

        let constants = [
            ("COLLISION_MASK", bits::COLLISION_MASK),
            ("COLLISION_NONE", bits::COLLISION_NONE),
            ("COLLISION_SQUARE", bits::COLLISION_SQUARE),
            ("COLLISION_UP_LEFT", bits::COLLISION_UP_LEFT),
            ("COLLISION_UP_RIGHT", bits::COLLISION_UP_RIGHT),
            ("COLLISION_DOWN_LEFT", bits::COLLISION_DOWN_LEFT),
            ("COLLISION_DOWN_RIGHT", bits::COLLISION_DOWN_RIGHT),
            ("MOUNT_MASK", bits::MOUNT_MASK),
            ("MOUNT_UP", bits::MOUNT_UP),
            ("MOUNT_DOWN", bits::MOUNT_DOWN),
            ("MOUNT_LEFT", bits::MOUNT_LEFT),
            ("MOUNT_RIGHT", bits::MOUNT_RIGHT),
            ("BREAKABLE", bits::BREAKABLE),
            ("COLLECTIBLE_UP", bits::COLLECTIBLE_UP),
            ("COLLECTIBLE_DOWN", bits::COLLECTIBLE_DOWN),
            ("COLLECTIBLE_LEFT", bits::COLLECTIBLE_LEFT),
            ("COLLECTIBLE_RIGHT", bits::COLLECTIBLE_RIGHT),
            ("COLLECTIBLE_MASK", bits::COLLECTIBLE_MASK),
            ("CHAIN_REACTION", bits::CHAIN_REACTION),
            ("TERMINAL_REACTION", bits::TERMINAL_REACTION),
            ("GHOST_COLLISION", bits::GHOST_COLLISION),
        ];
        for (name, value) in constants {
            self.constant(name, value);
        }

        let positions = world.positions();
        self.constant("START", coordinates(&positions.start));
        self.constant("TELEPORT_POSITIONS", coordinates(&positions.teleport));
        self.constant("INIT_BALLS", coordinates(&positions.throwables));
        self.output.push_str("-- }}} End constants\n");
    }

    /// Map totals and dimensions.
    pub fn write_map_info(&mut self, world: &World, unique_tiles: usize) {
        let summary = MapSummary::from_world(world);
        let (width, height) = world.pixel_size();

        self.output.push_str("-- {{{ Map info\n");
        self.constant("ITEM_COUNT", summary.items);
        self.constant("UNIQUE_TILE_COUNT", unique_tiles);
        self.constant("REMOVABLE_TILE_COUNT", summary.removable_tiles);
        self.constant("WIDTH", width);
        self.constant("HEIGHT", height);
        self.output.push_str("-- }}} End map info\n");
    }

    fn open_table(&mut self, name: &str) {
        self.output
            .push_str(&format!("{}.{} =\n{{\n", self.prefix, name));
    }

    pub fn write_art_layer(&mut self, name: &str, grid: &ArtGrid) {
        self.open_table(name);

        let entries = art_entries(grid);
        // The cell count sits on its own line
        if let Some((count, rest)) = entries.split_first() {
            self.output.push_str(&format!("\t{},\n", count));
            for line in rest.chunks(VALUES_PER_LINE) {
                let values: Vec<String> = line.iter().map(|v| format!("{},", v)).collect();
                self.output.push_str(&format!("\t{}\n", values.join(" ")));
            }
        }
        self.output.push_str("}\n");
    }

    pub fn write_metadata_layer(&mut self, name: &str, layer: &MetadataLayer) {
        self.open_table(name);
        for row in layer.grid.rows() {
            let cells: Vec<String> = row.iter().map(|cell| cell.pack().to_string()).collect();
            self.output.push_str(&format!("\t{{{}}},\n", cells.join(", ")));
        }
        self.output.push_str("}\n");
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Render the complete data table for a world.
pub fn render_table(world: &World, unique_tiles: usize, prefix: &str) -> String {
    let mut writer = TableWriter::new(prefix);
    writer.write_constants(world);
    writer.write_map_info(world, unique_tiles);
    for (name, layer) in world.iter() {
        match layer {
            Layer::Art(grid) => writer.write_art_layer(name, grid),
            Layer::Metadata(metadata) => writer.write_metadata_layer(name, metadata),
        }
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Collectible, Collision, Direction, Grid, MetadataCell, MountFlags, Positions, Reaction,
    };
    use pretty_assertions::assert_eq;

    fn tiles(values: &[u32]) -> Vec<Option<TileIndex>> {
        values
            .iter()
            .map(|&v| (v > 0).then(|| TileIndex(v - 1)))
            .collect()
    }

    #[test]
    fn test_pack_pairs_and_blank_runs() {
        let mut cells = tiles(&[3, 5, 7]);
        cells.extend(std::iter::repeat(None).take(40));

        let entries = pack_tiles(cells.clone());
        assert_eq!(entries, vec![(3 << 16) | 5, 7, -40]);
        assert_eq!(unpack_tiles(&entries), cells);
    }

    #[test]
    fn test_pack_flushes_pending_before_blanks() {
        let cells = tiles(&[0, 0, 4, 0, 1, 2, 9]);
        let entries = pack_tiles(cells.clone());
        assert_eq!(entries, vec![-2, 4, -1, (1 << 16) | 2, 9]);
        assert_eq!(unpack_tiles(&entries), cells);
    }

    #[test]
    fn test_pack_largest_index() {
        let cells = tiles(&[32767, 32767]);
        let entries = pack_tiles(cells.clone());
        assert_eq!(entries, vec![0x7fff_7fff]);
        assert_eq!(unpack_tiles(&entries), cells);
    }

    #[test]
    fn test_trailing_blank_rows_are_dropped() {
        let grid: ArtGrid = Grid::from_rows(vec![
            tiles(&[0, 1]),
            tiles(&[2, 0]),
            tiles(&[0, 0]),
            tiles(&[0, 0]),
        ]);
        assert_eq!(scanned_rows(&grid), 2);
        assert_eq!(art_entries(&grid), vec![4, -1, (1 << 16) | 2, -1]);

        let blank: ArtGrid = Grid::new(3, 2);
        assert_eq!(scanned_rows(&blank), 1);
        assert_eq!(art_entries(&blank), vec![3, -3]);
    }

    #[test]
    fn test_summary_counts() {
        let grid = Grid::from_rows(vec![vec![
            MetadataCell {
                collectible: Some(Collectible::Resolved(Direction::Up)),
                ..Default::default()
            },
            MetadataCell {
                collectible: Some(Collectible::Resolved(Direction::Up)),
                reaction: Reaction::TerminalTrigger,
                ..Default::default()
            },
            MetadataCell {
                breakable: true,
                reaction: Reaction::Effect,
                ..Default::default()
            },
            MetadataCell {
                breakable: true,
                ..MetadataCell::with_collision(Collision::Square)
            },
        ]]);
        let summary = MapSummary::from_grid(&grid);
        assert_eq!(summary.items, 2);
        assert_eq!(summary.removable_tiles, 1 + 2 + 1 + 2);
    }

    fn sample_world() -> World {
        let mut world = World::new();
        let mut cells = tiles(&[1, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 3]);
        cells.extend(tiles(&[1; 12]));
        let art: ArtGrid = Grid::from_rows(cells.chunks(12).map(|c| c.to_vec()).collect());
        world.insert("fg", Layer::Art(art));

        let mut grid = Grid::new(12, 2);
        grid.set(
            0,
            1,
            MetadataCell {
                mount: MountFlags::UP | MountFlags::RIGHT,
                ..MetadataCell::with_collision(Collision::Square)
            },
        );
        let positions = Positions {
            start: vec![Point::new(31, 48)],
            teleport: vec![Point::new(16, 32)],
            throwables: vec![],
        };
        world.insert("metadata", Layer::Metadata(MetadataLayer { grid, positions }));
        world
    }

    #[test]
    fn test_art_layer_text() {
        let world = sample_world();
        let Some(Layer::Art(grid)) = world.get("fg") else {
            panic!("missing art layer");
        };
        let mut writer = TableWriter::new("world");
        writer.write_art_layer("fg", grid);
        assert_eq!(
            writer.finish(),
            "world.fg =\n{\n\t24,\n\t65538, 2, -8, 196609, 65537, 65537, 65537, 65537, 65537, 1,\n}\n"
        );
    }

    #[test]
    fn test_full_table_header() {
        let text = render_table(&sample_world(), 3, "world");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "world = world or {}");
        assert_eq!(lines[1], "-- {{{ Constants");
        assert_eq!(lines[2], "world.COLLISION_MASK = 7");
        assert!(lines.contains(&"world.GHOST_COLLISION = 16384"));
        assert!(lines.contains(&"world.START = {{31, 48}}"));
        assert!(lines.contains(&"world.TELEPORT_POSITIONS = {{16, 32}}"));
        assert!(lines.contains(&"world.INIT_BALLS = {}"));
        assert!(lines.contains(&"world.UNIQUE_TILE_COUNT = 3"));
        assert!(lines.contains(&"world.WIDTH = 384"));
        assert!(lines.contains(&"world.HEIGHT = 64"));

        // Layers in alphabetical order, metadata uncompressed
        let fg = text.find("world.fg =").unwrap();
        let metadata = text.find("world.metadata =").unwrap();
        assert!(fg < metadata);
        assert!(text.ends_with(
            "world.metadata =\n{\n\t{0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0},\n\t{145, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0},\n}\n"
        ));
    }

    #[test]
    fn test_custom_prefix() {
        let text = render_table(&World::new(), 0, "level");
        assert!(text.starts_with("level = level or {}\n"));
        assert!(text.contains("level.ITEM_COUNT = 0\n"));
    }
}
