//! Structured metadata cells and their packed bit layout.
//!
//! Classification, mount detection and validation all work on
//! `MetadataCell`. Only the serializer flattens a cell into the bit-flag
//! integer stored in the data table, through [`MetadataCell::pack`].

use bitflags::bitflags;

use super::grid::Grid;

/// Bit constants of the packed metadata format.
pub mod bits {
    pub const COLLISION_MASK: u32 = 0x07;
    pub const COLLISION_NONE: u32 = 0x00;
    pub const COLLISION_SQUARE: u32 = 0x01;
    pub const COLLISION_UP_LEFT: u32 = 0x02;
    pub const COLLISION_UP_RIGHT: u32 = 0x03;
    pub const COLLISION_DOWN_LEFT: u32 = 0x04;
    pub const COLLISION_DOWN_RIGHT: u32 = 0x05;

    pub const BREAKABLE: u32 = 0x08;

    pub const MOUNT_UP: u32 = 0x10;
    pub const MOUNT_DOWN: u32 = 0x20;
    pub const MOUNT_LEFT: u32 = 0x40;
    pub const MOUNT_RIGHT: u32 = 0x80;
    pub const MOUNT_MASK: u32 = MOUNT_UP | MOUNT_DOWN | MOUNT_LEFT | MOUNT_RIGHT;

    pub const COLLECTIBLE_UP: u32 = 0x100;
    pub const COLLECTIBLE_DOWN: u32 = 0x200;
    pub const COLLECTIBLE_LEFT: u32 = 0x400;
    pub const COLLECTIBLE_RIGHT: u32 = 0x800;
    pub const COLLECTIBLE_MASK: u32 =
        COLLECTIBLE_UP | COLLECTIBLE_DOWN | COLLECTIBLE_LEFT | COLLECTIBLE_RIGHT;

    pub const CHAIN_REACTION: u32 = 0x1000;
    pub const TERMINAL_REACTION: u32 = 0x2000;
    pub const GHOST_COLLISION: u32 = 0x4000;

    const GROUPS: [u32; 7] = [
        COLLISION_MASK,
        BREAKABLE,
        MOUNT_MASK,
        COLLECTIBLE_MASK,
        CHAIN_REACTION,
        TERMINAL_REACTION,
        GHOST_COLLISION,
    ];

    const fn groups_disjoint() -> bool {
        let mut i = 0;
        while i < GROUPS.len() {
            let mut j = i + 1;
            while j < GROUPS.len() {
                if GROUPS[i] & GROUPS[j] != 0 {
                    return false;
                }
                j += 1;
            }
            i += 1;
        }
        true
    }

    const _: () = assert!(groups_disjoint());
}

/// Orthogonal direction on the grid. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Grid step `(dx, dy)` for this direction.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Solid region of a cell. Triangles are named after their open corner,
/// which is also the direction of the surface normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Collision {
    #[default]
    None,
    Square,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Collision {
    /// Diagonal surface normal of a triangle, `None` otherwise.
    pub const fn normal(self) -> Option<(isize, isize)> {
        match self {
            Collision::UpLeft => Some((-1, -1)),
            Collision::UpRight => Some((1, -1)),
            Collision::DownLeft => Some((-1, 1)),
            Collision::DownRight => Some((1, 1)),
            Collision::None | Collision::Square => None,
        }
    }

    /// Mount bits granted when a triangle's open corner is mountable.
    pub fn corner_mounts(self) -> MountFlags {
        match self {
            Collision::UpLeft => MountFlags::UP | MountFlags::LEFT,
            Collision::UpRight => MountFlags::UP | MountFlags::RIGHT,
            Collision::DownLeft => MountFlags::DOWN | MountFlags::LEFT,
            Collision::DownRight => MountFlags::DOWN | MountFlags::RIGHT,
            Collision::None | Collision::Square => MountFlags::empty(),
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            Collision::None => bits::COLLISION_NONE,
            Collision::Square => bits::COLLISION_SQUARE,
            Collision::UpLeft => bits::COLLISION_UP_LEFT,
            Collision::UpRight => bits::COLLISION_UP_RIGHT,
            Collision::DownLeft => bits::COLLISION_DOWN_LEFT,
            Collision::DownRight => bits::COLLISION_DOWN_RIGHT,
        }
    }
}

bitflags! {
    /// Sides of a collision shape that can be grabbed. Named by the
    /// direction of the surface normal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MountFlags: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

impl MountFlags {
    pub fn from_direction(direction: Direction) -> Self {
        match direction {
            Direction::Up => MountFlags::UP,
            Direction::Down => MountFlags::DOWN,
            Direction::Left => MountFlags::LEFT,
            Direction::Right => MountFlags::RIGHT,
        }
    }

    pub fn packed(self) -> u32 {
        let mut packed = 0;
        if self.contains(MountFlags::UP) {
            packed |= bits::MOUNT_UP;
        }
        if self.contains(MountFlags::DOWN) {
            packed |= bits::MOUNT_DOWN;
        }
        if self.contains(MountFlags::LEFT) {
            packed |= bits::MOUNT_LEFT;
        }
        if self.contains(MountFlags::RIGHT) {
            packed |= bits::MOUNT_RIGHT;
        }
        packed
    }
}

/// Chain reaction role of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Reaction {
    #[default]
    None,
    /// Starts a reaction and propagates it to neighbors.
    Trigger,
    /// Removed by a neighboring reaction, then propagates further.
    Effect,
    /// Removed by a neighboring reaction without propagating.
    TerminalTrigger,
    /// Like `TerminalTrigger`, and also loses its collision.
    TerminalEffect,
}

impl Reaction {
    /// Trigger or effect: a cell that can carry a reaction onward.
    pub fn is_chain(self) -> bool {
        matches!(self, Reaction::Trigger | Reaction::Effect)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Reaction::TerminalTrigger | Reaction::TerminalEffect)
    }

    pub fn bits(self) -> u32 {
        if self.is_chain() {
            bits::CHAIN_REACTION
        } else if self.is_terminal() {
            bits::TERMINAL_REACTION
        } else {
            0
        }
    }
}

/// Collectible item state. The approach direction is only known once the
/// neighbors have been inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collectible {
    Unresolved,
    /// Side from which the player approaches the item.
    Resolved(Direction),
}

impl Collectible {
    pub fn bits(self) -> u32 {
        match self {
            Collectible::Unresolved => bits::COLLECTIBLE_MASK,
            Collectible::Resolved(Direction::Up) => bits::COLLECTIBLE_UP,
            Collectible::Resolved(Direction::Down) => bits::COLLECTIBLE_DOWN,
            Collectible::Resolved(Direction::Left) => bits::COLLECTIBLE_LEFT,
            Collectible::Resolved(Direction::Right) => bits::COLLECTIBLE_RIGHT,
        }
    }
}

/// Gameplay metadata for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MetadataCell {
    pub collision: Collision,
    pub mount: MountFlags,
    pub breakable: bool,
    pub ghost: bool,
    pub collectible: Option<Collectible>,
    pub reaction: Reaction,
}

impl MetadataCell {
    /// A cell with the given collision and nothing else.
    pub fn with_collision(collision: Collision) -> Self {
        Self {
            collision,
            ..Self::default()
        }
    }

    /// Passable for clearance purposes: no collision, or removable.
    pub fn is_empty_or_breakable(&self) -> bool {
        self.collision == Collision::None || self.breakable
    }

    /// A square that can never be removed.
    pub fn is_unbreakable_square(&self) -> bool {
        self.collision == Collision::Square && !self.breakable
    }

    /// Flatten into the packed integer format.
    pub fn pack(&self) -> u32 {
        let mut packed = self.collision.bits() | self.mount.packed() | self.reaction.bits();
        if self.breakable {
            packed |= bits::BREAKABLE;
        }
        if self.ghost {
            packed |= bits::GHOST_COLLISION;
        }
        if let Some(collectible) = self.collectible {
            packed |= collectible.bits();
        }
        packed
    }
}

/// Grid of metadata cells.
pub type MetadataGrid = Grid<MetadataCell>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_empty_cell() {
        assert_eq!(MetadataCell::default().pack(), 0);
    }

    #[test]
    fn test_pack_collision_and_mounts() {
        let cell = MetadataCell {
            collision: Collision::Square,
            mount: MountFlags::UP | MountFlags::RIGHT,
            ..Default::default()
        };
        assert_eq!(cell.pack(), 0x01 | 0x10 | 0x80);
    }

    #[test]
    fn test_pack_reactions() {
        let effect = MetadataCell {
            breakable: true,
            reaction: Reaction::Effect,
            ..Default::default()
        };
        assert_eq!(effect.pack(), bits::BREAKABLE | bits::CHAIN_REACTION);

        let terminal = MetadataCell {
            reaction: Reaction::TerminalTrigger,
            ..Default::default()
        };
        assert_eq!(terminal.pack(), bits::TERMINAL_REACTION);
    }

    #[test]
    fn test_pack_collectible() {
        let mut cell = MetadataCell {
            collectible: Some(Collectible::Unresolved),
            ..Default::default()
        };
        assert_eq!(cell.pack(), bits::COLLECTIBLE_MASK);

        cell.collectible = Some(Collectible::Resolved(Direction::Left));
        assert_eq!(cell.pack(), bits::COLLECTIBLE_LEFT);
    }

    #[test]
    fn test_pack_ghost() {
        let cell = MetadataCell {
            collision: Collision::DownRight,
            ghost: true,
            ..Default::default()
        };
        assert_eq!(cell.pack(), bits::COLLISION_DOWN_RIGHT | bits::GHOST_COLLISION);
    }

    #[test]
    fn test_triangle_normals() {
        assert_eq!(Collision::UpLeft.normal(), Some((-1, -1)));
        assert_eq!(Collision::DownRight.normal(), Some((1, 1)));
        assert_eq!(Collision::Square.normal(), None);
        assert_eq!(
            Collision::UpRight.corner_mounts(),
            MountFlags::UP | MountFlags::RIGHT
        );
    }

    #[test]
    fn test_empty_or_breakable() {
        assert!(MetadataCell::default().is_empty_or_breakable());
        let wall = MetadataCell::with_collision(Collision::Square);
        assert!(!wall.is_empty_or_breakable());
        assert!(wall.is_unbreakable_square());

        let breakable = MetadataCell {
            breakable: true,
            ..wall
        };
        assert!(breakable.is_empty_or_breakable());
        assert!(!breakable.is_unbreakable_square());
    }
}
