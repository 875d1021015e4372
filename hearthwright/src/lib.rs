// hearthwright: procedural multi-storey house generator for voxel worlds.
//
// Given a footprint and a theme, plans a stack of floors by growing each
// floor's plan from the one below it, then builds the stack block by block
// into a world and carves windows, doors and decorations into the result.
//
// Module overview:
// - `types.rs`:     VoxelCoord, Direction, Axis, and the lattice model
//                    (LatticeRole, Category, Occupancy).
// - `config.rs`:    GenConfig + BlockTables + WetnessTable: all tunable parameters, JSON-loadable.
// - `error.rs`:     ConfigError, WorldError, HouseError.
// - `palette.rs`:   Palette: material roles and decoration flags.
// - `blueprint.rs`: LayerTemplate, StructuralClass, BlueprintSet, Theme, ThemeRegistry.
// - `floor.rs`:     FloorGrid + Floor: cell classification and growth of the plan above.
// - `house.rs`:     House: floor planning and the geometry/navigation/decoration passes.
// - `search.rs`:    Outer-wall, free-side, access-height and ground searches over the world.
// - `placement.rs`: BlockPlacer: skip/punch rules, waterlogging, state fallback chain.
// - `world.rs`:     WorldAccess trait + VoxelWorld, a dense in-memory store.
// - `report.rs`:    BuildReport + BuildEvent: what a build did and what it skipped.
// - `prng`:         Re-exported from `hearthwright_prng`: xoshiro256++ with SplitMix64 seeding.
//
// The world store is reached only through `WorldAccess`; the generator
// never caches what it reads, so the store must reflect placements in
// subsequent queries. All randomness comes from one `BuildRng` the caller
// passes in: the same seed and the same starting world give the same house.

pub mod blueprint;
pub mod config;
pub mod error;
pub mod floor;
pub mod house;
pub mod palette;
pub mod placement;
pub use hearthwright_prng as prng;
pub mod report;
pub mod search;
pub mod types;
pub mod world;
