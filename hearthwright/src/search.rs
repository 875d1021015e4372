// Geometric search helpers over the live world.
//
// The generator does not remember what it built. Windows, doors and
// decorations are sited by probing the world around a lattice cell after the
// geometry pass has raised it, so these helpers work equally on a house that
// was just built, a house built into uneven terrain, or a house whose walls
// were partly overwritten by a neighbouring structure.
//
// Every query goes to the world; nothing is cached (see the read-after-write
// note in `world.rs`).
//
// - `check_free_sides`: how many of the four horizontal neighbours are open.
// - `find_outer_wall`: which side of a wall faces the outside.
// - `find_access_height`: at which height a doorway would connect exactly two
//   open sides, and whether a step is needed to reach it.
// - `find_ground`: the top solid block of a column.
//
// See also: `house.rs` for the callers, `config.rs` for `BlockTables`.

use crate::config::BlockTables;
use crate::error::WorldError;
use crate::types::{Axis, Direction, VoxelCoord};
use crate::world::WorldAccess;

/// Whether standing water counts as an open side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FluidPolicy {
    Passable,
    Blocking,
}

/// Result of `check_free_sides`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FreeSides {
    pub count: usize,
    /// The last open side in scan order, if any.
    pub last_free: Option<Direction>,
}

/// A doorway height found by `find_access_height`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Access {
    /// Vertical offset from the probe position.
    pub offset: i32,
    /// Side on which a step is needed to reach the doorway, if any.
    pub step: Option<Direction>,
}

/// Point `start` at the middle of a wall cell running along `axis`.
pub fn unit_middle(start: VoxelCoord, axis: Axis, unit_size: i32) -> VoxelCoord {
    let half = (unit_size - 1) / 2;
    match axis {
        Axis::X => start.offset(half, 0, 0),
        Axis::Z => start.offset(0, 0, half),
        Axis::Y => start,
    }
}

/// Count the open horizontal neighbours of `pos`.
pub fn check_free_sides<W: WorldAccess + ?Sized>(
    world: &W,
    tables: &BlockTables,
    pos: VoxelCoord,
    fluids: FluidPolicy,
) -> Result<FreeSides, WorldError> {
    let mut sides = FreeSides {
        count: 0,
        last_free: None,
    };
    for dir in Direction::ALL {
        let block = world.get_block(pos.step(dir))?;
        let open = tables.is_ignorable(&block)
            || (fluids == FluidPolicy::Passable && tables.is_water(&block));
        if open {
            sides.count += 1;
            sides.last_free = Some(dir);
        }
    }
    Ok(sides)
}

/// Find the side of the cell at `pos` that faces outside.
///
/// First rises to the lowest height (within `unit_height`) that has any open
/// side, so a probe buried in a floor slab starts from the room instead.
/// From there each direction is scanned upwards for its first solid block.
/// A direction with no solid block within the scan is open exterior and wins
/// at once; otherwise the direction whose obstruction starts highest wins,
/// the earliest in scan order on ties. `None` when every side is blocked at
/// the starting height.
pub fn find_outer_wall<W: WorldAccess + ?Sized>(
    world: &W,
    tables: &BlockTables,
    pos: VoxelCoord,
    unit_height: i32,
) -> Result<Option<Direction>, WorldError> {
    let mut base = pos;
    for h in 0..=unit_height {
        let probe = pos.up(h);
        if check_free_sides(world, tables, probe, FluidPolicy::Blocking)?.count > 0 {
            base = probe;
            break;
        }
    }

    let mut best: Option<(i32, Direction)> = None;
    for dir in Direction::ALL {
        let side = base.step(dir);
        let mut obstruction = None;
        for h in 0..=unit_height {
            let block = world.get_block(side.up(h))?;
            if !tables.is_ignorable(&block) && !tables.is_liquid(&block) {
                obstruction = Some(h);
                break;
            }
        }
        match obstruction {
            None => return Ok(Some(dir)),
            Some(h) => {
                if best.is_none_or(|(top, _)| h > top) {
                    best = Some((h, dir));
                }
            }
        }
    }

    Ok(best.filter(|&(h, _)| h > 0).map(|(_, dir)| dir))
}

/// Find a doorway height near `pos`.
///
/// Descends while more than one side is open, then rises while fewer than
/// two are, each leg bounded by `unit_height`. When rising, the last open
/// side of the height below is remembered as the side a step must go on.
/// The result must have exactly two open sides, and a step must have
/// something under it. Water is never an open side, so a doorway beside a
/// pond is raised above the waterline and stepped from the dry side.
pub fn find_access_height<W: WorldAccess + ?Sized>(
    world: &W,
    tables: &BlockTables,
    pos: VoxelCoord,
    unit_height: i32,
) -> Result<Option<Access>, WorldError> {
    let free = |h: i32| check_free_sides(world, tables, pos.up(h), FluidPolicy::Blocking);

    let mut h = 0;
    let mut sides = free(h)?;
    while sides.count > 1 && h > -unit_height {
        h -= 1;
        sides = free(h)?;
    }

    let mut step = None;
    let lowest = h;
    while sides.count < 2 && h < lowest + unit_height {
        step = sides.last_free;
        h += 1;
        sides = free(h)?;
    }
    if sides.count != 2 {
        return Ok(None);
    }

    if let Some(dir) = step {
        let below = world.get_block(pos.step(dir).up(h - 2))?;
        if tables.is_ignorable(&below) {
            return Ok(None);
        }
    }
    Ok(Some(Access { offset: h, step }))
}

/// Height of the highest non-ignorable block in column `(x, z)` at or
/// below `start_y`. `None` if the column is open down to `floor_y`.
pub fn find_ground<W: WorldAccess + ?Sized>(
    world: &W,
    tables: &BlockTables,
    x: i32,
    z: i32,
    start_y: i32,
    floor_y: i32,
) -> Result<Option<i32>, WorldError> {
    let mut y = start_y;
    while y >= floor_y {
        if !tables.is_ignorable(&world.get_block(VoxelCoord::new(x, y, z))?) {
            return Ok(Some(y));
        }
        y -= 1;
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::VoxelWorld;

    fn plot() -> VoxelWorld {
        let mut w = VoxelWorld::new(VoxelCoord::new(0, 0, 0), 16, 16, 16);
        w.fill(VoxelCoord::new(0, 0, 0), VoxelCoord::new(15, 2, 15), "dirt")
            .unwrap();
        w
    }

    #[test]
    fn free_sides_in_a_corridor() {
        let tables = BlockTables::default();
        let mut w = plot();
        let pos = VoxelCoord::new(5, 3, 5);
        // Walls east and west, open north and south.
        w.put(pos.step(Direction::East), "stone").unwrap();
        w.put(pos.step(Direction::West), "stone").unwrap();
        let sides = check_free_sides(&w, &tables, pos, FluidPolicy::Blocking).unwrap();
        assert_eq!(sides.count, 2);
        assert_eq!(sides.last_free, Some(Direction::North));
    }

    #[test]
    fn water_counts_only_when_passable() {
        let tables = BlockTables::default();
        let mut w = plot();
        let pos = VoxelCoord::new(5, 3, 5);
        for dir in Direction::ALL {
            w.put(pos.step(dir), "stone").unwrap();
        }
        w.put(pos.step(Direction::South), "water").unwrap();
        let blocking = check_free_sides(&w, &tables, pos, FluidPolicy::Blocking).unwrap();
        let passable = check_free_sides(&w, &tables, pos, FluidPolicy::Passable).unwrap();
        assert_eq!(blocking.count, 0);
        assert_eq!(passable.count, 1);
        assert_eq!(passable.last_free, Some(Direction::South));
    }

    #[test]
    fn open_site_has_an_outer_wall() {
        let tables = BlockTables::default();
        let w = plot();
        let dir = find_outer_wall(&w, &tables, VoxelCoord::new(5, 3, 5), 4).unwrap();
        assert_eq!(dir, Some(Direction::East));
    }

    #[test]
    fn outer_wall_prefers_open_exterior() {
        let tables = BlockTables::default();
        let mut w = plot();
        let pos = VoxelCoord::new(5, 3, 5);
        // Enclosed on three sides up to the scan height; south stays open.
        for dir in [Direction::East, Direction::West, Direction::North] {
            let side = pos.step(dir);
            w.fill(side, side.up(4), "stone").unwrap();
        }
        let dir = find_outer_wall(&w, &tables, pos, 4).unwrap();
        assert_eq!(dir, Some(Direction::South));
    }

    #[test]
    fn outer_wall_picks_highest_obstruction() {
        let tables = BlockTables::default();
        let mut w = plot();
        let pos = VoxelCoord::new(5, 3, 5);
        // Every side is obstructed somewhere; north's obstruction starts
        // highest (a lintel over open space).
        for dir in [Direction::East, Direction::West, Direction::South] {
            let side = pos.step(dir);
            w.fill(side.up(1), side.up(4), "stone").unwrap();
        }
        w.put(pos.step(Direction::North).up(3), "stone").unwrap();
        let dir = find_outer_wall(&w, &tables, pos, 4).unwrap();
        assert_eq!(dir, Some(Direction::North));
    }

    #[test]
    fn enclosed_cell_has_no_outer_wall() {
        let tables = BlockTables::default();
        let mut w = plot();
        let pos = VoxelCoord::new(5, 3, 5);
        for dir in Direction::ALL {
            let side = pos.step(dir);
            w.fill(side, side.up(4), "stone").unwrap();
        }
        assert_eq!(find_outer_wall(&w, &tables, pos, 4).unwrap(), None);
    }

    #[test]
    fn outer_wall_ignores_water_and_leaves() {
        let tables = BlockTables::default();
        let mut w = plot();
        let pos = VoxelCoord::new(5, 3, 5);
        for dir in [Direction::East, Direction::West, Direction::South] {
            let side = pos.step(dir);
            w.fill(side, side.up(4), "stone").unwrap();
        }
        let north = pos.step(Direction::North);
        w.fill(north, north.up(2), "water").unwrap();
        w.fill(north.up(3), north.up(4), "oak_leaves").unwrap();
        let dir = find_outer_wall(&w, &tables, pos, 4).unwrap();
        assert_eq!(dir, Some(Direction::North));
    }

    #[test]
    fn access_height_with_step() {
        let tables = BlockTables::default();
        let mut w = plot();
        // A wall running along X at z = 5 with the house interior to the
        // south: a floor slab at y = 3 inside, open air outside at y = 3.
        let pos = VoxelCoord::new(5, 3, 5);
        w.fill(VoxelCoord::new(3, 3, 5), VoxelCoord::new(7, 6, 5), "cobblestone")
            .unwrap();
        w.fill(VoxelCoord::new(3, 3, 6), VoxelCoord::new(7, 3, 8), "cobblestone_slab")
            .unwrap();

        let access = find_access_height(&w, &tables, pos, 4).unwrap();
        assert_eq!(
            access,
            Some(Access {
                offset: 1,
                step: Some(Direction::North)
            })
        );
    }

    #[test]
    fn water_outside_raises_the_doorway() {
        let tables = BlockTables::default();
        let mut w = plot();
        // A wall along X at z = 5: dry floor to the south, a pond at floor
        // level to the north.
        let pos = VoxelCoord::new(5, 3, 5);
        w.fill(VoxelCoord::new(3, 3, 5), VoxelCoord::new(7, 6, 5), "cobblestone")
            .unwrap();
        w.fill(VoxelCoord::new(0, 3, 0), VoxelCoord::new(15, 3, 4), "water")
            .unwrap();

        let access = find_access_height(&w, &tables, pos, 4).unwrap();
        assert_eq!(
            access,
            Some(Access {
                offset: 1,
                step: Some(Direction::South)
            })
        );
    }

    #[test]
    fn floating_step_is_rejected() {
        let tables = BlockTables::default();
        let mut w = plot();
        // Same wall, raised so the outside drops away below the step.
        let pos = VoxelCoord::new(5, 8, 5);
        w.fill(VoxelCoord::new(3, 8, 5), VoxelCoord::new(7, 11, 5), "cobblestone")
            .unwrap();
        w.fill(VoxelCoord::new(3, 8, 6), VoxelCoord::new(7, 8, 8), "cobblestone_slab")
            .unwrap();
        assert_eq!(find_access_height(&w, &tables, pos, 4).unwrap(), None);
    }

    #[test]
    fn no_two_sided_height_means_no_door() {
        let tables = BlockTables::default();
        let mut w = plot();
        // A solid column enclosed on all four sides for the whole scan.
        let pos = VoxelCoord::new(5, 6, 5);
        for dir in Direction::ALL {
            let side = pos.step(dir);
            w.fill(side.up(-4), side.up(8), "stone").unwrap();
        }
        assert_eq!(find_access_height(&w, &tables, pos, 4).unwrap(), None);
    }

    #[test]
    fn three_open_sides_are_not_a_doorway() {
        let tables = BlockTables::default();
        let mut w = plot();
        let pos = VoxelCoord::new(5, 3, 5);
        let east = pos.step(Direction::East);
        w.fill(east, east.up(8), "stone").unwrap();
        // Descends into the dirt (zero sides), then rises back to three.
        assert_eq!(find_access_height(&w, &tables, pos, 4).unwrap(), None);
    }

    #[test]
    fn ground_is_highest_solid_block() {
        let tables = BlockTables::default();
        let mut w = plot();
        w.put(VoxelCoord::new(2, 3, 2), "oak_leaves").unwrap();
        assert_eq!(find_ground(&w, &tables, 2, 2, 15, 0).unwrap(), Some(2));
        w.put(VoxelCoord::new(2, 6, 2), "stone").unwrap();
        assert_eq!(find_ground(&w, &tables, 2, 2, 15, 0).unwrap(), Some(6));
        assert_eq!(find_ground(&w, &tables, 2, 2, 15, 7).unwrap(), None);
    }

    #[test]
    fn middle_of_a_wall() {
        let start = VoxelCoord::new(1, 0, 4);
        assert_eq!(unit_middle(start, Axis::X, 4), VoxelCoord::new(2, 0, 4));
        assert_eq!(unit_middle(start, Axis::Z, 4), VoxelCoord::new(1, 0, 5));
        assert_eq!(unit_middle(start, Axis::Y, 4), start);
    }
}
