//! Mount point detection.
//!
//! A collision side is mountable when the player's hand fits in front of
//! it: two clear cells along the surface normal. Triangles additionally
//! need to be part of a continuous diagonal wall, so a lone slope or a
//! corner that only touches the next slope at a single pixel never
//! mounts.

use crate::types::{Collision, Direction, MetadataGrid, MountFlags};

/// Grid offset relative to the cell being evaluated.
type Offset = (isize, isize);

fn is_clear(grid: &MetadataGrid, x: usize, y: usize, at: Offset) -> bool {
    grid.neighbor(x, y, at.0, at.1)
        .is_some_and(|cell| cell.is_empty_or_breakable())
}

/// Two clear cells stepping from `base` along `normal`. The base cell
/// itself is not checked.
fn has_clearance(grid: &MetadataGrid, x: usize, y: usize, base: Offset, normal: Offset) -> bool {
    is_clear(grid, x, y, (base.0 + normal.0, base.1 + normal.1))
        && is_clear(grid, x, y, (base.0 + normal.0 * 2, base.1 + normal.1 * 2))
}

fn square_mounts(grid: &MetadataGrid, x: usize, y: usize) -> MountFlags {
    Direction::ALL
        .into_iter()
        .filter(|&direction| has_clearance(grid, x, y, (0, 0), direction.offset()))
        .fold(MountFlags::empty(), |flags, direction| {
            flags | MountFlags::from_direction(direction)
        })
}

fn triangle_mounts(grid: &MetadataGrid, x: usize, y: usize, shape: Collision) -> MountFlags {
    let Some(normal) = shape.normal() else {
        return MountFlags::empty();
    };
    if !has_clearance(grid, x, y, (0, 0), normal) {
        return MountFlags::empty();
    }

    // Neighbors along the wall, the normal rotated by +-90 degrees
    let pre = (-normal.1, normal.0);
    let post = (normal.1, -normal.0);
    let same_shape =
        |at: Offset| grid.neighbor(x, y, at.0, at.1).map(|cell| cell.collision) == Some(shape);
    if !same_shape(pre) || !same_shape(post) {
        return MountFlags::empty();
    }
    if !has_clearance(grid, x, y, pre, normal) || !has_clearance(grid, x, y, post, normal) {
        return MountFlags::empty();
    }

    // Cells just behind each lateral, off the diagonal line. Without these a
    // staircase that meets the slope at one corner would pass.
    let (kx, ky) = (-normal.0, -normal.1);
    let corners = [
        (pre.0 + kx, pre.1),
        (pre.0, pre.1 + ky),
        (post.0 + kx, post.1),
        (post.0, post.1 + ky),
    ];
    if corners
        .iter()
        .all(|&corner| has_clearance(grid, x, y, corner, normal))
    {
        shape.corner_mounts()
    } else {
        MountFlags::empty()
    }
}

/// Mount flags for one cell, from its neighbors' collision shapes.
pub fn mounts_at(grid: &MetadataGrid, x: usize, y: usize) -> MountFlags {
    let Some(cell) = grid.get(x, y) else {
        return MountFlags::empty();
    };
    if cell.breakable {
        return MountFlags::empty();
    }
    match cell.collision {
        Collision::None => MountFlags::empty(),
        Collision::Square => square_mounts(grid, x, y),
        shape => triangle_mounts(grid, x, y, shape),
    }
}

/// Add mount flags to every cell, in one raster pass.
///
/// Only collision and breakable bits are read, so the result does not
/// depend on the order in which cells receive their flags.
pub fn detect_mount_points(grid: &mut MetadataGrid) {
    let (width, height) = grid.size();
    for y in 0..height {
        for x in 0..width {
            let flags = mounts_at(grid, x, y);
            if let Some(cell) = grid.get_mut(x, y) {
                cell.mount |= flags;
            }
        }
    }
}
