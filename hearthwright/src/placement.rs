// Block placement: turning a palette-resolved template entry into a block
// the world store accepts.
//
// A resolved entry such as `spruce_log` or
// `spruce_door[facing={facing}, half=lower]` is not yet a valid placement:
// orientation placeholders still need filling, the entry may need an
// `axis`/`waterlogged` state the store expects, and plain material names
// (`spruce`) are only valid as `spruce_planks`. The store tells us which
// form it accepts by rejecting the others, so `BlockPlacer::place` walks a short
// list of candidates and stops at the first one placed:
//
//   1. `block[axis=A, waterlogged=W]`
//   2. `block[axis=A]`
//   3. `block[waterlogged=W]`
//   4. `block`
//   5. `block_planks`
//
// Entries that already spell out a state are tried as written, then bare.
//
// Two modes: `Overwrite` places unconditionally, `Punch` only replaces a
// block that is not passable (used to cut windows and doors into walls
// without filling empty space next to them).
//
// Waterlogging: a block placed into water is waterlogged, and wettable
// materials are swapped for their weathered variants (see `WetnessTable`).

use crate::blueprint::SKIP;
use crate::config::{BlockTables, WetnessTable};
use crate::error::WorldError;
use crate::types::{Axis, Direction, VoxelCoord};
use crate::world::{PlacementStatus, WorldAccess, normalize_block_id};

/// Values substituted for `{axis}` and `{facing}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Orientation {
    pub axis: Axis,
    pub facing: Direction,
}

impl Orientation {
    pub const fn new(axis: Axis, facing: Direction) -> Self {
        Self { axis, facing }
    }

    pub const fn facing(facing: Direction) -> Self {
        Self::new(Axis::Y, facing)
    }

    pub const fn axis(axis: Axis) -> Self {
        Self::new(axis, Direction::North)
    }

    /// Fill orientation placeholders in `block`.
    pub fn apply(self, block: &str) -> String {
        block
            .replace("{axis}", self.axis.name())
            .replace("{facing}", self.facing.facing())
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(Axis::Y, Direction::North)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaceMode {
    Overwrite,
    /// Only replace blocks that are not passable.
    Punch,
}

/// What happened to one placement request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The entry was the skip sentinel, or a punch hit open space.
    Skipped,
    /// Placed in the given form.
    Placed(String),
    /// Every candidate was refused; holds the last diagnostic.
    Rejected(String),
}

/// Placement rules shared by every block a house places.
#[derive(Clone, Copy, Debug)]
pub struct BlockPlacer<'c> {
    pub blocks: &'c BlockTables,
    pub wetness: &'c WetnessTable,
}

impl<'c> BlockPlacer<'c> {
    pub fn new(blocks: &'c BlockTables, wetness: &'c WetnessTable) -> Self {
        Self { blocks, wetness }
    }

    /// Place one palette-resolved entry.
    pub fn place<W: WorldAccess + ?Sized>(
        &self,
        world: &mut W,
        coord: VoxelCoord,
        block: &str,
        orientation: Orientation,
        mode: PlaceMode,
    ) -> Result<Placement, WorldError> {
        if block == SKIP {
            return Ok(Placement::Skipped);
        }
        let current = world.get_block(coord)?;
        if mode == PlaceMode::Punch && self.blocks.is_ignorable(&current) {
            return Ok(Placement::Skipped);
        }

        let (block, waterlogged) = self.weather(block, &current);
        let mut last = String::new();
        for candidate in candidates(&block, waterlogged) {
            let candidate = orientation.apply(&candidate);
            match world.set_block(coord, &candidate)? {
                PlacementStatus::Placed => return Ok(Placement::Placed(candidate)),
                PlacementStatus::Rejected(reason) => last = reason,
            }
        }
        Ok(Placement::Rejected(last))
    }

    /// Apply the water swap if `current` is water. Returns the (possibly
    /// swapped) block and whether it is waterlogged.
    fn weather(&self, block: &str, current: &str) -> (String, bool) {
        if !self.wetness.enabled || !self.blocks.is_water(current) {
            return (block.to_string(), false);
        }
        let id = normalize_block_id(block);
        let bare = id.split_once(':').map_or(id.as_str(), |(_, name)| name);
        if self.wetness.unwettable.iter().any(|u| u == bare) {
            return (block.to_string(), false);
        }
        for (dry, wet) in &self.wetness.swaps {
            if block.contains(dry.as_str()) {
                return (block.replace(dry.as_str(), wet), true);
            }
        }
        (block.to_string(), true)
    }
}

/// Candidate spellings of `block`, most specific first.
fn candidates(block: &str, waterlogged: bool) -> Vec<String> {
    if let Some((bare, _)) = block.split_once('[') {
        return vec![block.to_string(), bare.to_string()];
    }
    vec![
        format!("{block}[axis={{axis}}, waterlogged={waterlogged}]"),
        format!("{block}[axis={{axis}}]"),
        format!("{block}[waterlogged={waterlogged}]"),
        block.to_string(),
        format!("{block}_planks"),
    ]
}
