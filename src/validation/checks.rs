//! Validation checks for metadata grids.
//!
//! Each check walks the grid in raster order and returns a
//! `ValidationResult`. Only `check_collectibles` writes to the grid: it
//! replaces each collectible's placeholder bits with the resolved
//! approach direction.

use crate::types::{
    Collectible, Collision, Direction, MetadataCell, MetadataGrid, MountFlags, PositionList,
    Reaction, TILE_SIZE,
};

use super::warning::{Diagnostic, ValidationResult};

/// A breakable cell needs something to break: collision or a reaction.
pub fn check_breakable(grid: &MetadataGrid) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (x, y, cell) in grid.iter_cells() {
        if cell.breakable && cell.collision == Collision::None && cell.reaction == Reaction::None {
            result.push(
                Diagnostic::error(
                    "tilebake::validate::breakable-without-collision",
                    "breakable tile needs collision",
                )
                .at(x, y)
                .with_help("Paint the collision edges, or use a reaction colour"),
            );
        }
    }

    result
}

/// True if the cell carries anything besides the collectible itself and an
/// optional terminal trigger (the hidden collectible form).
fn overlaps_other_annotations(cell: &MetadataCell) -> bool {
    cell.collision != Collision::None
        || !cell.mount.is_empty()
        || cell.breakable
        || cell.ghost
        || !matches!(cell.reaction, Reaction::None | Reaction::TerminalTrigger)
}

/// Neighbors in resolution priority order, with the approach direction
/// each one implies when it is the wall.
const WALL_PRIORITY: [(Direction, Direction); 4] = [
    (Direction::Down, Direction::Up),
    (Direction::Up, Direction::Down),
    (Direction::Right, Direction::Left),
    (Direction::Left, Direction::Right),
];

enum Resolution {
    Resolved(Direction),
    NeedsSquare,
    NeedsOneWall,
    NeedsThreeEmpty,
}

fn resolve_collectible(grid: &MetadataGrid, x: usize, y: usize) -> Resolution {
    let neighbor = |side: Direction| {
        let (dx, dy) = side.offset();
        grid.neighbor(x, y, dx, dy).copied().unwrap_or_default()
    };

    let clear = Direction::ALL
        .iter()
        .filter(|&&side| neighbor(side).is_empty_or_breakable())
        .count();

    match clear {
        3 => WALL_PRIORITY
            .iter()
            .find(|(side, _)| neighbor(*side).is_unbreakable_square())
            .map_or(Resolution::NeedsSquare, |&(_, approach)| {
                Resolution::Resolved(approach)
            }),
        4 => {
            let breakable: Vec<_> = WALL_PRIORITY
                .iter()
                .filter(|(side, _)| neighbor(*side).breakable)
                .collect();
            match breakable.as_slice() {
                [(_, approach)] => Resolution::Resolved(*approach),
                _ => Resolution::NeedsOneWall,
            }
        }
        _ => Resolution::NeedsThreeEmpty,
    }
}

/// Check collectible placement and resolve approach directions in place.
///
/// A collectible must sit against exactly one wall: either one permanent
/// square with the other three sides clear, or one breakable tile with the
/// other three sides empty.
pub fn check_collectibles(grid: &mut MetadataGrid, max_collectibles: usize) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut resolved = 0usize;
    let (width, height) = grid.size();

    for y in 0..height {
        for x in 0..width {
            let Some(cell) = grid.get(x, y).copied() else {
                continue;
            };
            if cell.collectible.is_none() {
                continue;
            }

            if overlaps_other_annotations(&cell) {
                result.push(
                    Diagnostic::error(
                        "tilebake::validate::collectible-overlap",
                        "collectible tile can not overlap other annotations",
                    )
                    .at(x, y),
                );
                continue;
            }
            if grid.is_border(x, y) {
                result.push(
                    Diagnostic::error(
                        "tilebake::validate::collectible-on-border",
                        "collectible tile can not be placed near edge of map",
                    )
                    .at(x, y),
                );
                continue;
            }

            let approach = match resolve_collectible(grid, x, y) {
                Resolution::Resolved(direction) => direction,
                Resolution::NeedsSquare => {
                    result.push(
                        Diagnostic::error(
                            "tilebake::validate::collectible-needs-square",
                            "collectible tile must be adjacent to 1 square collision tile",
                        )
                        .at(x, y)
                        .with_help("The single wall must be an unbreakable square"),
                    );
                    continue;
                }
                Resolution::NeedsOneWall => {
                    result.push(
                        Diagnostic::error(
                            "tilebake::validate::collectible-needs-one-wall",
                            "collectible tile must be adjacent to exactly 1 wall",
                        )
                        .at(x, y),
                    );
                    continue;
                }
                Resolution::NeedsThreeEmpty => {
                    result.push(
                        Diagnostic::error(
                            "tilebake::validate::collectible-needs-three-empty",
                            "collectible tile must be surrounded by 3 empty tiles and 1 wall",
                        )
                        .at(x, y),
                    );
                    continue;
                }
            };

            if let Some(cell) = grid.get_mut(x, y) {
                cell.collectible = Some(Collectible::Resolved(approach));
            }
            resolved += 1;
            if resolved > max_collectibles {
                result.push(
                    Diagnostic::error(
                        "tilebake::validate::too-many-collectibles",
                        "too many collectible tiles",
                    )
                    .at(x, y)
                    .with_help(format!("At most {} collectibles are supported", max_collectibles)),
                );
            }
        }
    }

    result
}

/// Terminal reactions only fire from an orthogonal chain reaction neighbor.
pub fn check_terminal_reactions(grid: &MetadataGrid) -> ValidationResult {
    let mut result = ValidationResult::new();

    for (x, y, cell) in grid.iter_cells() {
        if !cell.reaction.is_terminal() {
            continue;
        }
        let reachable = Direction::ALL.iter().any(|side| {
            let (dx, dy) = side.offset();
            grid.neighbor(x, y, dx, dy)
                .is_some_and(|n| n.reaction.is_chain())
        });
        if !reachable {
            result.push(
                Diagnostic::error(
                    "tilebake::validate::unreachable-terminal-reaction",
                    "terminal reaction tile must be adjacent to at least one chain reaction tile",
                )
                .at(x, y),
            );
        }
    }

    result
}

fn stored_mounts(grid: &MetadataGrid, col: usize, row: usize) -> MountFlags {
    grid.get(col, row).map_or(MountFlags::empty(), |cell| cell.mount)
}

/// Starting positions hang on a right-facing wall.
pub fn check_start_positions(grid: &MetadataGrid, start: &PositionList) -> ValidationResult {
    let mut result = ValidationResult::new();

    for point in start {
        let col = point.x / TILE_SIZE;
        let row = point.y.saturating_sub(TILE_SIZE / 2) / TILE_SIZE;
        let mounts = stored_mounts(grid, col, row);
        if mounts != MountFlags::RIGHT && mounts != MountFlags::LEFT | MountFlags::RIGHT {
            result.push(
                Diagnostic::error(
                    "tilebake::validate::start-not-mountable",
                    format!(
                        "tile[{}][{}] does not support mounting at ({},{})",
                        row, col, point.x, point.y
                    ),
                )
                .with_help("A starting position needs a wall mountable from the right only"),
            );
        }
    }

    result
}

/// Teleport stations sit on top of a floor.
pub fn check_teleport_positions(grid: &MetadataGrid, teleport: &PositionList) -> ValidationResult {
    let mut result = ValidationResult::new();

    for point in teleport {
        let col = point.x.saturating_sub(TILE_SIZE / 2) / TILE_SIZE;
        let row = point.y / TILE_SIZE;
        let mounts = stored_mounts(grid, col, row);
        if mounts != MountFlags::UP && mounts != MountFlags::UP | MountFlags::DOWN {
            result.push(
                Diagnostic::error(
                    "tilebake::validate::teleport-not-mountable",
                    format!(
                        "tile[{}][{}] does not support mounting at ({},{})",
                        row, col, point.x, point.y
                    ),
                )
                .with_help("A teleport station needs a floor mountable from above only"),
            );
        }
    }

    result
}
