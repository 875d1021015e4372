// Data-driven generator configuration.
//
// All tunable generation parameters live in `GenConfig`, loadable from JSON.
// Lattice geometry (`unit_size`, `unit_height`), the floor budget, the
// category pools rooms grow from, door density, and the block tables that
// decide what counts as passable all come from here rather than from
// constants scattered through the generator.
//
// `BlockTables` is the generator's only knowledge of block semantics: which
// ids are "ignorable" (air and foliage: free to walk through and to build
// over) and which are liquids (never an obstruction for outer-wall search).
// `WetnessTable` drives the waterlogging swap applied when a block is placed
// into water (see `placement.rs`).
//
// See also: `house.rs` which owns a `GenConfig`, `floor.rs` for the pools,
// `search.rs` for the passability rules.

use crate::error::ConfigError;
use crate::types::Category;
use serde::{Deserialize, Serialize};

/// Passability classification of block ids. Ids are fully namespaced
/// (`minecraft:air`), matching what the world store reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockTables {
    /// Blocks that neither obstruct movement nor need clearing.
    pub ignorables: Vec<String>,
    /// Fluids. Not ignorable, but never count as a wall.
    pub liquids: Vec<String>,
    /// The fluid that can count as free space and waterlog placed blocks.
    pub water: String,
}

impl BlockTables {
    pub fn is_ignorable(&self, block: &str) -> bool {
        self.ignorables.iter().any(|b| b == block)
    }

    pub fn is_liquid(&self, block: &str) -> bool {
        self.liquids.iter().any(|b| b == block)
    }

    pub fn is_water(&self, block: &str) -> bool {
        self.water == block
    }
}

impl Default for BlockTables {
    fn default() -> Self {
        let ignorables = [
            "minecraft:air",
            "minecraft:oak_leaves",
            "minecraft:dark_oak_leaves",
            "minecraft:spruce_leaves",
            "minecraft:birch_leaves",
            "minecraft:acacia_leaves",
            "minecraft:jungle_leaves",
        ];
        Self {
            ignorables: ignorables.iter().map(|s| s.to_string()).collect(),
            liquids: vec!["minecraft:water".into(), "minecraft:lava".into()],
            water: "minecraft:water".into(),
        }
    }
}

/// Material substitutions applied when a block lands in water.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WetnessTable {
    pub enabled: bool,
    /// `(dry, wet)` pairs, tried in order; the first `dry` substring found in
    /// the block id is replaced.
    pub swaps: Vec<(String, String)>,
    /// Block ids that are never swapped.
    pub unwettable: Vec<String>,
}

impl Default for WetnessTable {
    fn default() -> Self {
        let swaps = [
            ("birch", "oak"),
            ("oak", "spruce"),
            ("spruce", "dark_oak"),
            ("cobblestone", "mossy_cobblestone"),
            ("stone_bricks", "mossy_stone_bricks"),
        ];
        Self {
            enabled: true,
            swaps: swaps
                .iter()
                .map(|(dry, wet)| (dry.to_string(), wet.to_string()))
                .collect(),
            unwettable: vec!["birch_log".into(), "birch_wood".into()],
        }
    }
}

/// All tunable generation parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenConfig {
    /// Horizontal pitch of the lattice in blocks: one seam block plus
    /// `unit_size - 1` interior blocks.
    pub unit_size: i32,
    /// Vertical distance between floors in blocks.
    pub unit_height: i32,
    /// Floor budget. Floors at or above this level may only grow roofing,
    /// which guarantees the plan collapses.
    pub max_floors: usize,
    /// Pool for the throwaway pass that turns a solid footprint into the
    /// ground-floor plan.
    pub footprint_pool: Vec<Category>,
    /// Pool rooms draw from when planning the floor above. Repeat entries
    /// to weight them.
    pub growth_pool: Vec<Category>,
    /// Probability that a wall cell becomes a door candidate.
    pub door_chance: f64,
    pub blocks: BlockTables,
    pub wetness: WetnessTable,
}

impl GenConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GenConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unit_size < 2 {
            return Err(ConfigError::InvalidValue {
                field: "unit_size",
                reason: format!("must be at least 2, got {}", self.unit_size),
            });
        }
        if self.unit_height < 2 {
            return Err(ConfigError::InvalidValue {
                field: "unit_height",
                reason: format!("must be at least 2, got {}", self.unit_height),
            });
        }
        if self.footprint_pool.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "footprint_pool",
                reason: "must not be empty".into(),
            });
        }
        if self.growth_pool.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "growth_pool",
                reason: "must not be empty".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.door_chance) {
            return Err(ConfigError::InvalidValue {
                field: "door_chance",
                reason: format!("must be within [0, 1], got {}", self.door_chance),
            });
        }
        Ok(())
    }

    /// The pool in effect for a floor at `level`.
    pub fn pool_for_level(&self, level: usize) -> &[Category] {
        if level >= self.max_floors {
            &[Category::Roof]
        } else {
            &self.growth_pool
        }
    }
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            unit_size: 4,
            unit_height: 4,
            max_floors: 1,
            footprint_pool: vec![Category::Roof, Category::Room, Category::Room],
            growth_pool: vec![Category::Roof, Category::Room, Category::Room],
            door_chance: 0.5,
            blocks: BlockTables::default(),
            wetness: WetnessTable::default(),
        }
    }
}
