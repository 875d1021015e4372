// Core types shared across the generator.
//
// Defines world positions (`VoxelCoord`), the four cardinal directions used
// by every search and placement, block-state axes, and the lattice model:
// `LatticeRole` (what a lattice cell is, derived from coordinate parity) and
// `Occupancy` (what a floor plan says about a cell: its category plus how
// crowded it is by same-category neighbours).
//
// The lattice overlays a footprint at half-unit resolution. Even indices are
// the one-block-thick seams between units (posts and walls), odd indices the
// unit interiors (rooms). `index_to_offset` maps a lattice index to its
// block offset from the footprint origin.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A block position in the world. Y is up; X grows east, Z grows south.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    pub const fn up(self, dy: i32) -> Self {
        self.offset(0, dy, 0)
    }

    /// One block over in a horizontal direction.
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dz) = dir.offset();
        self.offset(dx, 0, dz)
    }
}

impl fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Horizontal cardinal direction.
///
/// `ALL` is the scan order used by every search, so ties always resolve the
/// same way: east, west, south, north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    East,
    West,
    South,
    North,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Unit `(dx, dz)` vector.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
            Direction::South => (0, 1),
            Direction::North => (0, -1),
        }
    }

    /// Block-state name for `facing=`.
    pub const fn facing(self) -> &'static str {
        match self {
            Direction::East => "east",
            Direction::West => "west",
            Direction::South => "south",
            Direction::North => "north",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Direction::East => Direction::West,
            Direction::West => Direction::East,
            Direction::South => Direction::North,
            Direction::North => Direction::South,
        }
    }

    /// Absolute unit vector perpendicular to this one, i.e. the direction a
    /// wall facing this way runs along.
    pub const fn along_wall(self) -> (i32, i32) {
        let (dx, dz) = self.offset();
        (dz.abs(), dx.abs())
    }
}

/// Block-state axis for logs, pillars and beams.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const fn name(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

// ---------------------------------------------------------------------------
// Lattice
// ---------------------------------------------------------------------------

/// Structural role of a lattice cell, a pure function of index parity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatticeRole {
    /// Both indices even: a single column where walls meet.
    Post,
    /// Odd `ux`, even `uy`: a wall running along X.
    XWall,
    /// Even `ux`, odd `uy`: a wall running along Z.
    YWall,
    /// Both indices odd: a unit interior.
    Room,
}

impl LatticeRole {
    pub const fn of(ux: usize, uy: usize) -> Self {
        match (ux % 2 == 1, uy % 2 == 1) {
            (false, false) => LatticeRole::Post,
            (true, false) => LatticeRole::XWall,
            (false, true) => LatticeRole::YWall,
            (true, true) => LatticeRole::Room,
        }
    }

    pub const fn is_wall(self) -> bool {
        matches!(self, LatticeRole::XWall | LatticeRole::YWall)
    }

    /// Axis substituted for `{axis}` when this cell's template is placed.
    pub const fn axis(self) -> Axis {
        match self {
            LatticeRole::XWall => Axis::X,
            LatticeRole::YWall => Axis::Z,
            LatticeRole::Post | LatticeRole::Room => Axis::Y,
        }
    }
}

/// Block offset of lattice index `index` from the footprint origin.
///
/// Even indices land on the seams every `unit_size` blocks; odd indices land
/// on the first block inside the unit.
pub fn index_to_offset(index: usize, unit_size: i32) -> i32 {
    let base = unit_size * (index / 2) as i32;
    if index % 2 == 1 { base + 1 } else { base }
}

/// Coarse category of a floor-plan cell. Doubles as the index into a
/// blueprint set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Nothing here: open sky.
    Sky,
    /// Roofing or garden: walkable, never grows another floor.
    Roof,
    /// An enclosed room that may grow a floor above.
    Room,
}

impl Category {
    pub const COUNT: usize = 3;

    pub const fn index(self) -> usize {
        match self {
            Category::Sky => 0,
            Category::Roof => 1,
            Category::Room => 2,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Category::Sky),
            1 => Some(Category::Roof),
            2 => Some(Category::Room),
            _ => None,
        }
    }

    /// Whether a room cell of this category plans the floor above it.
    pub const fn grows(self) -> bool {
        matches!(self, Category::Room)
    }
}

/// One cell of a floor plan.
///
/// Written in plans as the float `category + crowding / 10`: `2.1` is a room
/// cell that one extra neighbouring room has reinforced. Crowding saturates
/// at `MAX_CROWDING` so it never crosses into the next category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occupancy {
    pub category: Category,
    pub crowding: u8,
}

impl Occupancy {
    pub const MAX_CROWDING: u8 = 3;

    pub const fn new(category: Category) -> Self {
        Self {
            category,
            crowding: 0,
        }
    }

    pub const fn sky() -> Self {
        Self::new(Category::Sky)
    }

    pub const fn with_crowding(category: Category, crowding: u8) -> Self {
        let crowding = if crowding > Self::MAX_CROWDING {
            Self::MAX_CROWDING
        } else {
            crowding
        };
        Self { category, crowding }
    }

    pub const fn is_sky(self) -> bool {
        matches!(self.category, Category::Sky)
    }

    /// Parse the float form. Fractions are read to the nearest tenth below
    /// (with a small tolerance for accumulated rounding) and clamped to the
    /// saturation limit. Negative values and unknown categories yield `None`.
    pub fn from_value(value: f32) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let category = Category::from_index(value.trunc() as usize)?;
        let tenths = (value.fract() * 10.0 + 1e-3).floor() as u8;
        Some(Self::with_crowding(category, tenths))
    }

    /// Add one tenth of crowding, saturating.
    pub fn reinforce(&mut self) {
        if self.crowding < Self::MAX_CROWDING {
            self.crowding += 1;
        }
    }
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::sky()
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category.index(), self.crowding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_follows_parity() {
        assert_eq!(LatticeRole::of(0, 0), LatticeRole::Post);
        assert_eq!(LatticeRole::of(4, 2), LatticeRole::Post);
        assert_eq!(LatticeRole::of(1, 0), LatticeRole::XWall);
        assert_eq!(LatticeRole::of(0, 3), LatticeRole::YWall);
        assert_eq!(LatticeRole::of(3, 5), LatticeRole::Room);
        assert!(LatticeRole::of(1, 2).is_wall());
        assert!(!LatticeRole::of(1, 1).is_wall());
    }

    #[test]
    fn wall_axes() {
        assert_eq!(LatticeRole::XWall.axis(), Axis::X);
        assert_eq!(LatticeRole::YWall.axis(), Axis::Z);
        assert_eq!(LatticeRole::Room.axis(), Axis::Y);
    }

    #[test]
    fn lattice_offsets() {
        let offsets: Vec<i32> = (0..6).map(|i| index_to_offset(i, 4)).collect();
        assert_eq!(offsets, vec![0, 1, 4, 5, 8, 9]);
    }

    #[test]
    fn direction_table() {
        assert_eq!(Direction::East.offset(), (1, 0));
        assert_eq!(Direction::North.facing(), "north");
        for d in Direction::ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
        assert_eq!(Direction::East.along_wall(), (0, 1));
        assert_eq!(Direction::North.along_wall(), (1, 0));
    }

    #[test]
    fn occupancy_float_form() {
        let occ = Occupancy::from_value(2.1).unwrap();
        assert_eq!(occ.category, Category::Room);
        assert_eq!(occ.crowding, 1);

        // Accumulated float error still lands on the right tenth.
        let drifted = 1.0f32 + 0.1 + 0.1 + 0.1;
        assert_eq!(Occupancy::from_value(drifted).unwrap().crowding, 3);

        // Crowding beyond the limit is clamped.
        assert_eq!(Occupancy::from_value(2.7).unwrap().crowding, 3);
        assert!(Occupancy::from_value(3.0).is_none());
        assert!(Occupancy::from_value(-1.0).is_none());
    }

    #[test]
    fn reinforcement_saturates() {
        let mut occ = Occupancy::new(Category::Roof);
        for _ in 0..10 {
            occ.reinforce();
        }
        assert_eq!(occ.crowding, Occupancy::MAX_CROWDING);
        assert_eq!(occ.to_string(), "1.3");
        assert_eq!(occ.category, Category::Roof);
    }

    #[test]
    fn category_order_matches_index() {
        assert!(Category::Sky < Category::Roof);
        assert!(Category::Roof < Category::Room);
        for i in 0..Category::COUNT {
            assert_eq!(Category::from_index(i).unwrap().index(), i);
        }
    }
}
