// World access: the capability the generator queries and builds through.
//
// `WorldAccess` is the whole contract the generator has with the outside
// world: a point query and a point placement. Implementations must give
// read-after-write visibility. The carving heuristics in `search.rs` query
// blocks the same build placed a moment earlier (a door is sited by looking
// at the walls this house just raised), so a store that batches or caches
// placements without reflecting them in `get_block` will mislead them.
//
// Placement replies follow the world store's convention: a numeric reply
// means the block was set, anything else is a diagnostic. A diagnostic is
// not an error (`PlacementStatus::Rejected`); only a failure to talk to the
// store at all is (`WorldError`).
//
// `VoxelWorld` is a dense in-memory store over a bounded box, used by the
// tests and the demo driver. Block ids are interned: storage is one `u16`
// per voxel indexed by `x + z * size_x + y * size_x * size_z` relative to
// the box origin, so one world holds at most 65,536 distinct ids; interning
// past that is a `WorldError`. Ids are normalised the way the live store reports them:
// namespaced (`minecraft:`), without block state. Out-of-bounds reads
// return air; out-of-bounds writes are rejected.

use crate::error::WorldError;
use crate::types::VoxelCoord;
use rustc_hash::{FxHashMap, FxHashSet};

pub const AIR: &str = "minecraft:air";

/// Terrain plus every block id the built-in themes can place, including
/// their waterlogged swaps. Hand it to `VoxelWorld::with_known_blocks` to
/// get a store that refuses bare material names the way a live one does.
pub const BUILDING_BLOCKS: &[&str] = &[
    "stone",
    "dirt",
    "grass_block",
    "sand",
    "water",
    "spruce_log",
    "spruce_wood",
    "spruce_planks",
    "spruce_slab",
    "spruce_fence",
    "spruce_fence_gate",
    "spruce_trapdoor",
    "spruce_door",
    "spruce_stairs",
    "spruce_button",
    "dark_oak_log",
    "dark_oak_wood",
    "dark_oak_planks",
    "dark_oak_slab",
    "dark_oak_fence",
    "dark_oak_fence_gate",
    "dark_oak_trapdoor",
    "dark_oak_door",
    "dark_oak_stairs",
    "dark_oak_button",
    "acacia_log",
    "acacia_planks",
    "acacia_slab",
    "acacia_fence",
    "acacia_fence_gate",
    "acacia_trapdoor",
    "acacia_door",
    "acacia_stairs",
    "acacia_button",
    "cobblestone",
    "cobblestone_slab",
    "mossy_cobblestone",
    "mossy_cobblestone_slab",
    "sandstone",
    "chiseled_sandstone",
    "smooth_sandstone",
    "smooth_sandstone_slab",
    "glass_pane",
    "redstone_lamp",
    "redstone_block",
    "lantern",
];

/// Outcome of a placement the store answered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlacementStatus {
    Placed,
    /// The store refused the block; the text is its diagnostic.
    Rejected(String),
}

impl PlacementStatus {
    /// Interpret a raw store reply: numeric means success.
    pub fn from_reply(reply: &str) -> Self {
        let reply = reply.trim();
        if !reply.is_empty() && reply.chars().all(|c| c.is_ascii_digit()) {
            PlacementStatus::Placed
        } else {
            PlacementStatus::Rejected(reply.to_string())
        }
    }

    pub fn is_placed(&self) -> bool {
        matches!(self, PlacementStatus::Placed)
    }
}

/// Point access to a mutable voxel world.
pub trait WorldAccess {
    /// Namespaced id of the block at `coord`.
    fn get_block(&self, coord: VoxelCoord) -> Result<String, WorldError>;

    /// Place `block` (id plus optional `[state]`) at `coord`.
    fn set_block(&mut self, coord: VoxelCoord, block: &str) -> Result<PlacementStatus, WorldError>;
}

impl<W: WorldAccess + ?Sized> WorldAccess for &mut W {
    fn get_block(&self, coord: VoxelCoord) -> Result<String, WorldError> {
        (**self).get_block(coord)
    }

    fn set_block(&mut self, coord: VoxelCoord, block: &str) -> Result<PlacementStatus, WorldError> {
        (**self).set_block(coord, block)
    }
}

/// Strip block state and NBT, and add the default namespace.
pub fn normalize_block_id(block: &str) -> String {
    let base = block
        .split(['[', '{'])
        .next()
        .unwrap_or_default()
        .trim();
    if base.contains(':') {
        base.to_string()
    } else {
        format!("minecraft:{base}")
    }
}

/// Dense in-memory voxel store.
#[derive(Clone, Debug)]
pub struct VoxelWorld {
    origin: VoxelCoord,
    size_x: u32,
    size_y: u32,
    size_z: u32,
    /// Index into `names` per voxel.
    voxels: Vec<u16>,
    names: Vec<String>,
    ids: FxHashMap<String, u16>,
    /// When set, placements of ids outside this list are rejected.
    known: Option<FxHashSet<String>>,
    placements: u64,
}

impl VoxelWorld {
    /// A world of air spanning `origin .. origin + size`.
    pub fn new(origin: VoxelCoord, size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        let mut ids = FxHashMap::default();
        ids.insert(AIR.to_string(), 0);
        Self {
            origin,
            size_x,
            size_y,
            size_z,
            voxels: vec![0; total],
            names: vec![AIR.to_string()],
            ids,
            known: None,
            placements: 0,
        }
    }

    /// Only accept placements of the listed block ids (plus air), the way a
    /// live store rejects ids it does not know.
    pub fn with_known_blocks<I, S>(mut self, blocks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known: FxHashSet<String> = blocks
            .into_iter()
            .map(|b| normalize_block_id(b.as_ref()))
            .collect();
        known.insert(AIR.to_string());
        self.known = Some(known);
        self
    }

    pub fn in_bounds(&self, coord: VoxelCoord) -> bool {
        let (x, y, z) = (
            coord.x - self.origin.x,
            coord.y - self.origin.y,
            coord.z - self.origin.z,
        );
        x >= 0
            && y >= 0
            && z >= 0
            && (x as u32) < self.size_x
            && (y as u32) < self.size_y
            && (z as u32) < self.size_z
    }

    fn index(&self, coord: VoxelCoord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        let x = (coord.x - self.origin.x) as usize;
        let y = (coord.y - self.origin.y) as usize;
        let z = (coord.z - self.origin.z) as usize;
        let sx = self.size_x as usize;
        let sz = self.size_z as usize;
        Some(x + z * sx + y * sx * sz)
    }

    fn intern(&mut self, id: String) -> Result<u16, WorldError> {
        if let Some(&i) = self.ids.get(&id) {
            return Ok(i);
        }
        let i = u16::try_from(self.names.len())
            .map_err(|_| WorldError::TooManyBlocks(self.names.len()))?;
        self.names.push(id.clone());
        self.ids.insert(id, i);
        Ok(i)
    }

    /// Block id at `coord`; air outside the box.
    pub fn block(&self, coord: VoxelCoord) -> &str {
        self.index(coord)
            .map(|i| self.names[self.voxels[i] as usize].as_str())
            .unwrap_or(AIR)
    }

    /// Unconditionally write a block, bypassing the known-block check.
    /// No-op outside the box.
    pub fn put(&mut self, coord: VoxelCoord, block: &str) -> Result<(), WorldError> {
        if let Some(i) = self.index(coord) {
            let id = self.intern(normalize_block_id(block))?;
            self.voxels[i] = id;
        }
        Ok(())
    }

    /// Fill the inclusive box `from ..= to` with one block.
    pub fn fill(
        &mut self,
        from: VoxelCoord,
        to: VoxelCoord,
        block: &str,
    ) -> Result<(), WorldError> {
        for y in from.y.min(to.y)..=from.y.max(to.y) {
            for z in from.z.min(to.z)..=from.z.max(to.z) {
                for x in from.x.min(to.x)..=from.x.max(to.x) {
                    self.put(VoxelCoord::new(x, y, z), block)?;
                }
            }
        }
        Ok(())
    }

    /// Number of accepted `set_block` calls so far.
    pub fn placements(&self) -> u64 {
        self.placements
    }

    /// Count voxels whose id contains `needle`.
    pub fn count_matching(&self, needle: &str) -> usize {
        self.voxels
            .iter()
            .filter(|&&i| self.names[i as usize].contains(needle))
            .count()
    }
}

impl WorldAccess for VoxelWorld {
    fn get_block(&self, coord: VoxelCoord) -> Result<String, WorldError> {
        Ok(self.block(coord).to_string())
    }

    fn set_block(&mut self, coord: VoxelCoord, block: &str) -> Result<PlacementStatus, WorldError> {
        let Some(i) = self.index(coord) else {
            return Ok(PlacementStatus::Rejected(format!(
                "position {coord} is outside the build area"
            )));
        };
        let id = normalize_block_id(block);
        if let Some(known) = &self.known {
            if !known.contains(&id) {
                return Ok(PlacementStatus::Rejected(format!("unknown block: {block}")));
            }
        }
        let interned = self.intern(id)?;
        self.voxels[i] = interned;
        self.placements += 1;
        Ok(PlacementStatus::Placed)
    }
}
