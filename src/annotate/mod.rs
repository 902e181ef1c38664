//! Metadata annotation.
//!
//! Turns a full-colour annotation image into a metadata grid. Each cell is
//! read at a handful of fixed sample points:
//!
//! ```text
//! +-------+
//! |   U   |      U, D, L, R  edge midpoints, inset by MARGIN
//! | L C R |      C           centre
//! |   D   |      O           off-centre, a quarter in from the corner
//! +-------+
//! ```
//!
//! The edge samples give the collision shape from their opacity. The
//! centre colour selects an annotation tag, and the off-centre sample picks
//! the "doubled" variant when it repeats the centre colour. Blue dots on
//! the right and top edges mark starting positions and teleport stations.

mod tag;

pub use tag::Tag;

use serde::Serialize;

use crate::types::{
    Collision, Colour, Grid, Marker, MetadataCell, MetadataLayer, PixelBuffer, Point, Positions,
    TileView, TILE_SIZE,
};

/// Inset of the edge samples, to tolerate grid snapping and anti-aliasing.
pub const MARGIN: usize = 2;

const UP: (usize, usize) = (TILE_SIZE / 2, MARGIN);
const DOWN: (usize, usize) = (TILE_SIZE / 2, TILE_SIZE - 1 - MARGIN);
const LEFT: (usize, usize) = (MARGIN, TILE_SIZE / 2);
const RIGHT: (usize, usize) = (TILE_SIZE - 1 - MARGIN, TILE_SIZE / 2);
const CENTER: (usize, usize) = (TILE_SIZE / 2, TILE_SIZE / 2);
const OFF_CENTER: (usize, usize) = (TILE_SIZE / 4 + 1, TILE_SIZE / 4 + 1);

const _: () = assert!(OFF_CENTER.0 != MARGIN);

/// Collision shape from edge occupancy. Returns `None` for patterns that
/// do not describe a supported shape; those carry no collision.
pub fn classify_occupancy(up: bool, down: bool, left: bool, right: bool) -> Option<Collision> {
    match (up, down, left, right) {
        (false, false, false, false) => Some(Collision::None),
        (true, true, true, true) => Some(Collision::Square),
        (true, false, true, false) => Some(Collision::DownRight),
        (true, false, false, true) => Some(Collision::DownLeft),
        (false, true, true, false) => Some(Collision::UpRight),
        (false, true, false, true) => Some(Collision::UpLeft),
        _ => None,
    }
}

/// Everything read from one metadata cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CellAnnotation {
    pub col: usize,
    pub row: usize,
    /// `None` when the edge pattern was not recognized.
    #[serde(skip)]
    pub collision: Option<Collision>,
    pub tag: Option<Tag>,
    pub start: Option<Point>,
    pub teleport: Option<Point>,
    pub throwable: Option<Point>,
}

impl CellAnnotation {
    /// Metadata bits for this cell.
    pub fn cell(&self) -> MetadataCell {
        let mut cell = MetadataCell::with_collision(self.collision.unwrap_or_default());
        if let Some(tag) = self.tag {
            tag.apply(&mut cell);
        }
        cell
    }

    /// Pixel coordinate of the cell's top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.col * TILE_SIZE, self.row * TILE_SIZE)
    }
}

fn sample(tile: &TileView<'_>, point: (usize, usize)) -> Colour {
    Colour::from_rgba_bytes(tile.pixel(point.0, point.1))
}

/// Read one RGBA tile.
pub fn annotate_tile(tile: &TileView<'_>) -> CellAnnotation {
    let (x, y) = tile.origin();

    let up = sample(tile, UP);
    let down = sample(tile, DOWN);
    let left = sample(tile, LEFT);
    let right = sample(tile, RIGHT);
    let collision = classify_occupancy(
        up.is_opaque(),
        down.is_opaque(),
        left.is_opaque(),
        right.is_opaque(),
    );

    // Starting positions sit on the rightmost pixel column, so mounted
    // fingertips overlap the wall by one pixel.
    let start = (right.marker() == Some(Marker::Blue))
        .then(|| Point::new(x + TILE_SIZE - 1, y + TILE_SIZE / 2));
    let teleport =
        (up.marker() == Some(Marker::Blue)).then(|| Point::new(x + TILE_SIZE / 2, y));

    let tag = Tag::classify(sample(tile, CENTER), sample(tile, OFF_CENTER));
    let throwable = (tag == Some(Tag::Throwable))
        .then(|| Point::new(x + TILE_SIZE / 2, y + TILE_SIZE / 2));

    CellAnnotation {
        col: tile.col(),
        row: tile.row(),
        collision,
        tag,
        start,
        teleport,
        throwable,
    }
}

/// Classify every cell of an RGBA metadata image, in raster order.
pub fn annotate(buffer: &PixelBuffer) -> MetadataLayer {
    let mut grid = Grid::new(buffer.grid_width(), buffer.grid_height());
    let mut positions = Positions::default();

    for tile in buffer.tiles() {
        let annotation = annotate_tile(&tile);
        grid.set(annotation.col, annotation.row, annotation.cell());
        positions.start.extend(annotation.start);
        positions.teleport.extend(annotation.teleport);
        positions.throwables.extend(annotation.throwable);
    }

    MetadataLayer { grid, positions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PixelFormat, Reaction};

    fn metadata_image(cols: usize, rows: usize) -> PixelBuffer {
        PixelBuffer::transparent(cols * TILE_SIZE, rows * TILE_SIZE, PixelFormat::Rgba)
    }

    fn paint(buffer: &mut PixelBuffer, col: usize, row: usize, at: (usize, usize), c: Colour) {
        buffer.put_pixel(
            col * TILE_SIZE + at.0,
            row * TILE_SIZE + at.1,
            &c.to_rgba(),
        );
    }

    #[test]
    fn test_occupancy_patterns() {
        assert_eq!(classify_occupancy(false, false, false, false), Some(Collision::None));
        assert_eq!(classify_occupancy(true, true, true, true), Some(Collision::Square));
        assert_eq!(classify_occupancy(true, false, true, false), Some(Collision::DownRight));
        assert_eq!(classify_occupancy(true, false, false, true), Some(Collision::DownLeft));
        assert_eq!(classify_occupancy(false, true, true, false), Some(Collision::UpRight));
        assert_eq!(classify_occupancy(false, true, false, true), Some(Collision::UpLeft));
    }

    #[test]
    fn test_unrecognized_occupancy_is_ignored() {
        assert_eq!(classify_occupancy(true, true, false, false), None);
        assert_eq!(classify_occupancy(true, false, false, false), None);
        assert_eq!(classify_occupancy(true, true, true, false), None);

        let mut buffer = metadata_image(1, 1);
        paint(&mut buffer, 0, 0, UP, Colour::BLACK);
        paint(&mut buffer, 0, 0, DOWN, Colour::BLACK);
        let layer = annotate(&buffer);
        assert_eq!(layer.grid.get(0, 0), Some(&MetadataCell::default()));
    }

    #[test]
    fn test_square_and_triangle() {
        let mut buffer = metadata_image(2, 1);
        buffer.fill_tile(0, 0, &Colour::BLACK.to_rgba());
        paint(&mut buffer, 1, 0, DOWN, Colour::BLACK);
        paint(&mut buffer, 1, 0, RIGHT, Colour::BLACK);

        let layer = annotate(&buffer);
        assert_eq!(layer.grid.get(0, 0).unwrap().collision, Collision::Square);
        assert_eq!(layer.grid.get(1, 0).unwrap().collision, Collision::UpLeft);
    }

    #[test]
    fn test_breakable_and_ghost() {
        let mut buffer = metadata_image(2, 1);
        buffer.fill_tile(0, 0, &Colour::BLACK.to_rgba());
        paint(&mut buffer, 0, 0, CENTER, Colour::RED);
        buffer.fill_tile(1, 0, &Colour::RED.to_rgba());

        let layer = annotate(&buffer);
        let breakable = layer.grid.get(0, 0).unwrap();
        assert!(breakable.breakable);
        assert!(!breakable.ghost);
        assert_eq!(breakable.collision, Collision::Square);

        let ghost = layer.grid.get(1, 0).unwrap();
        assert!(ghost.ghost);
        assert!(!ghost.breakable);
        assert_eq!(ghost.collision, Collision::Square);
    }

    #[test]
    fn test_reaction_tags() {
        let mut buffer = metadata_image(4, 1);
        paint(&mut buffer, 0, 0, CENTER, Colour::CYAN);
        paint(&mut buffer, 1, 0, CENTER, Colour::CYAN);
        paint(&mut buffer, 1, 0, OFF_CENTER, Colour::CYAN);
        paint(&mut buffer, 2, 0, CENTER, Colour::MAGENTA);
        paint(&mut buffer, 3, 0, CENTER, Colour::MAGENTA);
        paint(&mut buffer, 3, 0, OFF_CENTER, Colour::MAGENTA);

        let layer = annotate(&buffer);
        let cell = |x| *layer.grid.get(x, 0).unwrap();
        assert_eq!(cell(0).reaction, Reaction::Trigger);
        assert_eq!(cell(1).reaction, Reaction::TerminalTrigger);
        assert_eq!(cell(2).reaction, Reaction::Effect);
        assert!(cell(2).breakable);
        assert_eq!(cell(3).reaction, Reaction::TerminalEffect);
        assert!(cell(3).breakable);
    }

    #[test]
    fn test_positions_recorded() {
        let mut buffer = metadata_image(2, 2);
        paint(&mut buffer, 1, 0, RIGHT, Colour::BLUE);
        paint(&mut buffer, 0, 1, UP, Colour::BLUE);
        paint(&mut buffer, 1, 1, CENTER, Colour::YELLOW);

        let layer = annotate(&buffer);
        assert_eq!(layer.positions.start, vec![Point::new(63, 16)]);
        assert_eq!(layer.positions.teleport, vec![Point::new(16, 32)]);
        assert_eq!(layer.positions.throwables, vec![Point::new(48, 48)]);

        // Throwables carry no grid bits
        assert_eq!(layer.grid.get(1, 1).unwrap().pack(), 0);
    }

    #[test]
    fn test_collectible_variants() {
        let mut buffer = metadata_image(2, 1);
        paint(&mut buffer, 0, 0, CENTER, Colour::GREEN);
        paint(&mut buffer, 1, 0, CENTER, Colour::GREEN);
        paint(&mut buffer, 1, 0, OFF_CENTER, Colour::GREEN);

        let layer = annotate(&buffer);
        let plain = layer.grid.get(0, 0).unwrap();
        assert!(plain.collectible.is_some());
        assert_eq!(plain.reaction, Reaction::None);

        let hidden = layer.grid.get(1, 0).unwrap();
        assert!(hidden.collectible.is_some());
        assert_eq!(hidden.reaction, Reaction::TerminalTrigger);
    }
}
