// House assembler: plans a stack of floors and builds it into a world.
//
// ## Planning
//
// `House::plan` turns a footprint (in blocks) into a lattice of
// `2 * units + 1` cells per side, where `units = (size - 1) / unit_size`.
// The ground plan is not the raw footprint: a solid all-room grid is grown
// once with the footprint pool and thrown away, and the grid it grows is the
// ground floor. Floors are then chained, each floor's grown grid feeding the
// next, until a grid comes out empty. Level 0 uses the theme's ground
// blueprint set and every level above it the regular set. Pools turn
// roof-only at `max_floors`, so at most `max_floors + 2` floors are ever
// planned; hitting that cap is an invariant violation.
//
// ## Building
//
// `House::build` runs four passes, recorded in `HouseState`:
//
// 1. Geometry (per floor, bottom up): every cell's template is placed. Posts
//    take one column, rooms fill their `(unit_size - 1)^2` interior, walls
//    run `unit_size - 1` columns along their axis. Wall cells may become
//    door candidates. Then every wall gets the stage's window punched at its
//    middle, facing out, and the window is recorded as a site.
// 2. Navigation (per floor, right after its geometry): door candidates are
//    carved (`punch_door`) and cleared. A door removes its wall's window
//    site.
// 3. Decoration (after all floors): shutters beside the remaining window
//    sites on tiers whose palette flag is set, and studs along the top of
//    every outer wall if the palette has them.
//
// Features whose geometry is ambiguous are skipped, logged and recorded in
// the `BuildReport`; only world transport failures and broken invariants
// abort a build. Nothing is rolled back.
//
// See also: `floor.rs` for classification and growth, `search.rs` for the
// wall and doorway searches, `placement.rs` for block placement rules.

use crate::blueprint::{Layer, LayerTemplate, Stage, Theme, ThemeRegistry};
use crate::config::GenConfig;
use crate::error::HouseError;
use crate::floor::{Floor, FloorGrid};
use crate::placement::{BlockPlacer, Orientation, PlaceMode, Placement};
use crate::report::{BuildEventKind, BuildReport, Feature};
use crate::search::{find_access_height, find_outer_wall, unit_middle};
use crate::types::{Axis, Category, LatticeRole, Occupancy, VoxelCoord, index_to_offset};
use crate::world::WorldAccess;
use hearthwright_prng::BuildRng;

const STAIRS: &str = "{doorMat}_stairs[facing={facing}]";
const FENCE_GATE: &str = "{doorMat}_fence_gate[facing={facing}]";
const DOOR_LOWER: &str = "{doorMat}_door[facing={facing}, half=lower]";
const DOOR_UPPER: &str = "{doorMat}_door[facing={facing}, half=upper]";
const SHUTTER: &str = "{doorMat}_trapdoor[open=true, facing={facing}]";
const STUD: &str = "{lightMat}_button[facing={facing}]";

/// Where a house is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HouseState {
    Planning,
    GeometryPass,
    NavigationPass,
    DecorationPass,
    Complete,
}

/// A wall cell picked for a door during the geometry pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DoorSite {
    pub floor: usize,
    /// First block of the wall at floor level.
    pub wall: VoxelCoord,
    pub axis: Axis,
}

/// A window punched during the geometry pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSite {
    pub floor: usize,
    /// First block of the wall at floor level.
    pub wall: VoxelCoord,
    /// The window block itself: wall middle at window height.
    pub pos: VoxelCoord,
}

/// A planned house.
#[derive(Clone, Debug)]
pub struct House {
    theme: Theme,
    config: GenConfig,
    x_size: u32,
    z_size: u32,
    floors: Vec<Floor>,
    state: HouseState,
    windows: Vec<WindowSite>,
}

impl House {
    /// Plan a house on an `x_size` by `z_size` footprint in `theme_name`.
    pub fn plan(
        x_size: u32,
        z_size: u32,
        theme_name: &str,
        registry: &ThemeRegistry,
        config: GenConfig,
        rng: &mut BuildRng,
    ) -> Result<Self, HouseError> {
        config.validate()?;
        let theme = registry.get(theme_name)?.clone();

        let unit = config.unit_size;
        if i64::from(x_size) <= i64::from(unit) || i64::from(z_size) <= i64::from(unit) {
            return Err(HouseError::FootprintTooSmall {
                x_size,
                z_size,
                unit_size: unit,
            });
        }
        let cells = |size: u32| 2 * ((size as usize - 1) / unit as usize) + 1;
        let footprint = FloorGrid::filled(
            cells(x_size),
            cells(z_size),
            Occupancy::new(Category::Room),
        );
        let mut grid = Floor::new(footprint, Stage::Ground, 0, &config.footprint_pool, rng)?
            .into_next_grid();

        let cap = config.max_floors + 2;
        let mut floors: Vec<Floor> = Vec::new();
        while !grid.is_empty() {
            if floors.len() >= cap {
                return Err(HouseError::Invariant(format!(
                    "floor plan did not collapse within {cap} floors"
                )));
            }
            let level = floors.len();
            let floor = Floor::new(
                grid,
                Stage::for_level(level),
                level,
                config.pool_for_level(level),
                rng,
            )?;
            grid = floor.next_grid().clone();
            floors.push(floor);
        }

        tracing::info!(
            "Planned {} floor(s) for a {}x{} {} house",
            floors.len(),
            x_size,
            z_size,
            theme.name
        );
        Ok(Self {
            theme,
            config,
            x_size,
            z_size,
            floors,
            state: HouseState::Planning,
            windows: Vec::new(),
        })
    }

    pub fn state(&self) -> HouseState {
        self.state
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &GenConfig {
        &self.config
    }

    /// Window sites left after doors claimed theirs.
    pub fn window_sites(&self) -> &[WindowSite] {
        &self.windows
    }

    /// Build the planned house with its footprint corner at `origin`.
    ///
    /// Leftover blocks of a footprint that is not a whole number of units
    /// are split evenly around the house, the odd one at random.
    pub fn build<W: WorldAccess + ?Sized>(
        &mut self,
        world: &mut W,
        origin: VoxelCoord,
        rng: &mut BuildRng,
    ) -> Result<BuildReport, HouseError> {
        if self.state != HouseState::Planning {
            return Err(HouseError::Invariant(format!(
                "house already built (state {:?})",
                self.state
            )));
        }

        let unit = self.config.unit_size;
        let origin = origin.offset(
            centring_shift(self.x_size, unit, rng),
            0,
            centring_shift(self.z_size, unit, rng),
        );
        tracing::info!("Building {} floor(s) at {}", self.floors.len(), origin);

        let mut site = Site {
            world,
            theme: &self.theme,
            config: &self.config,
            placer: BlockPlacer::new(&self.config.blocks, &self.config.wetness),
            origin,
            doors: Vec::new(),
            windows: Vec::new(),
            report: BuildReport {
                floors: self.floors.len(),
                ..BuildReport::default()
            },
        };

        for floor in &self.floors {
            self.state = HouseState::GeometryPass;
            site.geometry(floor, rng)?;
            self.state = HouseState::NavigationPass;
            site.navigation()?;
        }
        self.state = HouseState::DecorationPass;
        site.decoration(&self.floors)?;
        self.state = HouseState::Complete;

        let Site {
            windows, report, ..
        } = site;
        self.windows = windows;
        tracing::info!(
            "Built house: {} blocks, {} windows, {} doors, {} skipped features",
            report.blocks_placed,
            report.windows,
            report.doors,
            report.ambiguities()
        );
        Ok(report)
    }
}

/// Offset that centres a footprint's leftover blocks.
fn centring_shift(size: u32, unit_size: i32, rng: &mut BuildRng) -> i32 {
    let leftover = (size.saturating_sub(1) % unit_size.max(1) as u32) as i32;
    let odd = if leftover % 2 == 1 { rng.below(2) as i32 } else { 0 };
    leftover / 2 + odd
}

// ---------------------------------------------------------------------------
// Build passes
// ---------------------------------------------------------------------------

/// Per-build state: the world, the rules, and the sites collected so far.
struct Site<'a, W: WorldAccess + ?Sized> {
    world: &'a mut W,
    theme: &'a Theme,
    config: &'a GenConfig,
    placer: BlockPlacer<'a>,
    origin: VoxelCoord,
    doors: Vec<DoorSite>,
    windows: Vec<WindowSite>,
    report: BuildReport,
}

impl<W: WorldAccess + ?Sized> Site<'_, W> {
    fn cell_start(&self, level: usize, ux: usize, uy: usize) -> VoxelCoord {
        let unit = self.config.unit_size;
        VoxelCoord::new(
            self.origin.x + index_to_offset(ux, unit),
            self.origin.y + level as i32 * self.config.unit_height,
            self.origin.z + index_to_offset(uy, unit),
        )
    }

    fn is_ignorable(&self, coord: VoxelCoord) -> Result<bool, HouseError> {
        Ok(self
            .config
            .blocks
            .is_ignorable(&self.world.get_block(coord)?))
    }

    /// Resolve and place one block template. Returns whether it was placed.
    fn place(
        &mut self,
        floor: usize,
        coord: VoxelCoord,
        template: &str,
        orientation: Orientation,
        mode: PlaceMode,
    ) -> Result<bool, HouseError> {
        let block = self.theme.palette.resolve(template)?;
        match self
            .placer
            .place(&mut *self.world, coord, &block, orientation, mode)?
        {
            Placement::Placed(_) => {
                self.report.blocks_placed += 1;
                Ok(true)
            }
            Placement::Skipped => Ok(false),
            Placement::Rejected(reason) => {
                tracing::warn!("Could not place {} at {}: {}", block, coord, reason);
                self.report.blocks_rejected += 1;
                self.report
                    .record(floor, coord, BuildEventKind::PlacementRejected { block, reason });
                Ok(false)
            }
        }
    }

    /// Place a column template upwards from `base`. Returns how many blocks
    /// were placed.
    fn place_column(
        &mut self,
        floor: usize,
        base: VoxelCoord,
        template: &LayerTemplate,
        orientation: Orientation,
        mode: PlaceMode,
    ) -> Result<usize, HouseError> {
        let mut placed = 0;
        for (h, layer) in template.layers() {
            if let Layer::Block(block) = layer {
                if self.place(floor, base.up(h), block, orientation, mode)? {
                    placed += 1;
                }
            }
        }
        Ok(placed)
    }

    fn skip(&mut self, floor: usize, coord: VoxelCoord, kind: BuildEventKind) {
        self.report.record(floor, coord, kind);
    }

    // -- Geometry ----------------------------------------------------------

    fn geometry(&mut self, floor: &Floor, rng: &mut BuildRng) -> Result<(), HouseError> {
        let theme = self.theme;
        let set = theme.set(floor.stage);
        let span = self.config.unit_size - 1;
        let level = floor.level;
        tracing::debug!("Geometry pass, floor {}", level);

        for (ux, uy, cell) in floor.cells() {
            let template = set.class(cell.category).slot(cell.slot);
            let start = self.cell_start(level, ux, uy);
            let role = LatticeRole::of(ux, uy);
            match role {
                LatticeRole::Post => {
                    self.place_column(
                        level,
                        start,
                        template,
                        Orientation::default(),
                        PlaceMode::Overwrite,
                    )?;
                }
                LatticeRole::Room => {
                    for dx in 0..span {
                        for dz in 0..span {
                            self.place_column(
                                level,
                                start.offset(dx, 0, dz),
                                template,
                                Orientation::default(),
                                PlaceMode::Overwrite,
                            )?;
                        }
                    }
                }
                LatticeRole::XWall | LatticeRole::YWall => {
                    let axis = role.axis();
                    for i in 0..span {
                        let column = match axis {
                            Axis::X => start.offset(i, 0, 0),
                            _ => start.offset(0, 0, i),
                        };
                        self.place_column(
                            level,
                            column,
                            template,
                            Orientation::axis(axis),
                            PlaceMode::Overwrite,
                        )?;
                    }
                    if cell.category != Category::Sky && rng.chance(self.config.door_chance) {
                        self.doors.push(DoorSite {
                            floor: level,
                            wall: start,
                            axis,
                        });
                    }
                }
            }
        }

        let window = set.window();
        for (ux, uy, cell) in floor.cells() {
            let role = LatticeRole::of(ux, uy);
            if role.is_wall() && cell.category != Category::Sky {
                let start = self.cell_start(level, ux, uy);
                self.punch_window(level, start, role.axis(), window)?;
            }
        }
        Ok(())
    }

    fn punch_window(
        &mut self,
        floor: usize,
        wall: VoxelCoord,
        axis: Axis,
        template: &LayerTemplate,
    ) -> Result<(), HouseError> {
        let middle = unit_middle(wall, axis, self.config.unit_size);
        let Some(outward) =
            find_outer_wall(&*self.world, &self.config.blocks, middle, self.config.unit_height)?
        else {
            tracing::warn!("No outer wall for window at {} (floor {})", middle, floor);
            self.skip(
                floor,
                middle,
                BuildEventKind::NoOuterWall {
                    feature: Feature::Window,
                },
            );
            return Ok(());
        };

        let orientation = Orientation::new(axis, outward);
        if self.place_column(floor, middle, template, orientation, PlaceMode::Punch)? > 0 {
            let height = template.first_block_height().unwrap_or(0);
            self.windows.push(WindowSite {
                floor,
                wall,
                pos: middle.up(height),
            });
            self.report.windows += 1;
            tracing::debug!("Window at {} facing {}", middle, outward.facing());
        }
        Ok(())
    }

    // -- Navigation --------------------------------------------------------

    fn navigation(&mut self) -> Result<(), HouseError> {
        for door in std::mem::take(&mut self.doors) {
            self.punch_door(door)?;
        }
        Ok(())
    }

    fn punch_door(&mut self, door: DoorSite) -> Result<(), HouseError> {
        let config = self.config;
        let blocks = &config.blocks;
        let unit_height = config.unit_height;
        let middle = unit_middle(door.wall, door.axis, config.unit_size);

        let Some(access) = find_access_height(&*self.world, blocks, middle, unit_height)? else {
            tracing::debug!("No access height for door at {}", middle);
            self.skip(door.floor, middle, BuildEventKind::NoAccessHeight);
            return Ok(());
        };
        let mut pos = middle.up(access.offset);

        let Some(outward) = find_outer_wall(&*self.world, blocks, pos, unit_height)? else {
            tracing::warn!("No outer wall for door at {}", pos);
            self.skip(
                door.floor,
                pos,
                BuildEventKind::NoOuterWall {
                    feature: Feature::Door,
                },
            );
            return Ok(());
        };
        let inward = outward.opposite();

        if !self.is_ignorable(pos.step(inward))? {
            if !self.is_ignorable(pos.step(inward).up(1))? {
                tracing::debug!("Door at {} opens onto a solid interior", pos);
                self.skip(door.floor, pos, BuildEventKind::DoorBlocked);
                return Ok(());
            }
            pos = pos.up(1);
        }

        if let Some(step) = access.step {
            self.place(
                door.floor,
                pos.step(step).up(-1),
                STAIRS,
                Orientation::facing(inward),
                PlaceMode::Overwrite,
            )?;
        }

        let facing = Orientation::facing(outward);
        let placed = if self.world.get_block(pos)?.contains("fence") {
            self.place(door.floor, pos, FENCE_GATE, facing, PlaceMode::Overwrite)?
        } else {
            let lower = self.place(door.floor, pos, DOOR_LOWER, facing, PlaceMode::Punch)?;
            let upper = self.place(door.floor, pos.up(1), DOOR_UPPER, facing, PlaceMode::Punch)?;
            lower || upper
        };
        if placed {
            self.report.doors += 1;
            tracing::debug!("Door at {} facing {}", pos, outward.facing());
        }

        self.windows
            .retain(|w| !(w.floor == door.floor && w.wall == door.wall));
        Ok(())
    }

    // -- Decoration --------------------------------------------------------

    fn decoration(&mut self, floors: &[Floor]) -> Result<(), HouseError> {
        let theme = self.theme;
        let palette = &theme.palette;
        tracing::debug!("Decoration pass over {} window(s)", self.windows.len());

        let sites: Vec<WindowSite> = self
            .windows
            .iter()
            .copied()
            .filter(|w| palette.shutters_on(w.floor))
            .collect();
        for window in sites {
            self.place_shutters(window)?;
        }

        if palette.has_studs {
            for floor in floors {
                for (ux, uy, cell) in floor.cells() {
                    if LatticeRole::of(ux, uy).is_wall() && cell.category != Category::Sky {
                        let top = self
                            .cell_start(floor.level, ux, uy)
                            .up(self.config.unit_height - 1);
                        self.place_studs(floor.level, top)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn place_shutters(&mut self, window: WindowSite) -> Result<(), HouseError> {
        let Some(outward) = find_outer_wall(
            &*self.world,
            &self.config.blocks,
            window.pos,
            self.config.unit_height,
        )?
        else {
            tracing::warn!("No outer wall for shutters at {}", window.pos);
            self.skip(
                window.floor,
                window.pos,
                BuildEventKind::NoOuterWall {
                    feature: Feature::Shutter,
                },
            );
            return Ok(());
        };

        let (px, pz) = outward.along_wall();
        let front = window.pos.step(outward);
        for sign in [1, -1] {
            let coord = front.offset(sign * px, 0, sign * pz);
            if self.place(
                window.floor,
                coord,
                SHUTTER,
                Orientation::facing(outward),
                PlaceMode::Overwrite,
            )? {
                self.report.shutters += 1;
            }
        }
        Ok(())
    }

    /// Buttons along the outside of a wall's top layer, starting at the
    /// wall's first block `top`.
    fn place_studs(&mut self, floor: usize, top: VoxelCoord) -> Result<(), HouseError> {
        if self.is_ignorable(top)? {
            return Ok(());
        }
        let Some(outward) =
            find_outer_wall(&*self.world, &self.config.blocks, top, self.config.unit_height)?
        else {
            tracing::warn!("No outer wall for studs at {}", top);
            self.skip(
                floor,
                top,
                BuildEventKind::NoOuterWall {
                    feature: Feature::Stud,
                },
            );
            return Ok(());
        };

        let (px, pz) = outward.along_wall();
        let front = top.step(outward);
        for i in 0..self.config.unit_size - 1 {
            let coord = front.offset(i * px, 0, i * pz);
            if self.is_ignorable(coord)?
                && self.place(
                    floor,
                    coord,
                    STUD,
                    Orientation::facing(outward),
                    PlaceMode::Overwrite,
                )?
            {
                self.report.studs += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::templates;
    use crate::error::ConfigError;
    use crate::palette::Palette;
    use crate::report::BuildEvent;
    use crate::world::VoxelWorld;

    fn registry() -> ThemeRegistry {
        ThemeRegistry::builtin().unwrap()
    }

    /// Flat dirt plot with its surface at y = 3.
    fn plot() -> VoxelWorld {
        let mut w = VoxelWorld::new(VoxelCoord::new(0, 0, 0), 32, 32, 32);
        w.fill(VoxelCoord::new(0, 0, 0), VoxelCoord::new(31, 3, 31), "dirt")
            .unwrap();
        w
    }

    /// A build site over `world` with no house planned, for driving single
    /// carving steps.
    fn site_on<'a>(
        world: &'a mut VoxelWorld,
        theme: &'a Theme,
        config: &'a GenConfig,
    ) -> Site<'a, VoxelWorld> {
        Site {
            world,
            theme,
            config,
            placer: BlockPlacer::new(&config.blocks, &config.wetness),
            origin: VoxelCoord::new(0, 0, 0),
            doors: Vec::new(),
            windows: Vec::new(),
            report: BuildReport::default(),
        }
    }

    #[test]
    fn tiny_footprint_is_rejected() {
        let mut rng = BuildRng::new(1);
        let err = House::plan(4, 12, "rustic", &registry(), GenConfig::default(), &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            HouseError::FootprintTooSmall {
                x_size: 4,
                z_size: 12,
                unit_size: 4
            }
        ));
    }

    #[test]
    fn unknown_theme_is_a_config_error() {
        let mut rng = BuildRng::new(1);
        let err = House::plan(9, 9, "gothic", &registry(), GenConfig::default(), &mut rng)
            .unwrap_err();
        assert!(matches!(err, HouseError::Config(ConfigError::UnknownTheme(_))));
    }

    #[test]
    fn planning_terminates_within_the_cap() {
        let registry = registry();
        for seed in 0..100 {
            let mut rng = BuildRng::new(seed);
            let config = GenConfig {
                max_floors: 3,
                ..GenConfig::default()
            };
            let house = House::plan(17, 13, "rustic", &registry, config, &mut rng).unwrap();
            assert!(house.floors().len() <= 5, "seed {seed}");
            for (level, floor) in house.floors().iter().enumerate() {
                assert_eq!(floor.level, level);
                assert_eq!(floor.stage, Stage::for_level(level));
                assert_eq!(floor.grid().size_x(), 9);
                assert_eq!(floor.grid().size_y(), 7);
            }
            let last = house.floors().last().unwrap();
            assert!(last.next_grid().is_empty());
        }
    }

    #[test]
    fn footprint_pool_of_sky_plans_nothing() {
        let mut rng = BuildRng::new(3);
        let config = GenConfig {
            footprint_pool: vec![Category::Sky],
            ..GenConfig::default()
        };
        let house = House::plan(9, 9, "arid", &registry(), config, &mut rng).unwrap();
        assert!(house.floors().is_empty());
    }

    #[test]
    fn build_runs_every_pass() {
        let mut rng = BuildRng::new(7);
        let mut house =
            House::plan(9, 9, "rustic", &registry(), GenConfig::default(), &mut rng).unwrap();
        assert_eq!(house.state(), HouseState::Planning);

        let mut world = plot();
        let report = house
            .build(&mut world, VoxelCoord::new(4, 4, 4), &mut rng)
            .unwrap();
        assert_eq!(house.state(), HouseState::Complete);
        assert_eq!(report.floors, house.floors().len());
        assert!(report.blocks_placed > 0);
        assert_eq!(report.blocks_placed, world.placements());
        assert!(world.count_matching("spruce_log") > 0);

        let again = house.build(&mut world, VoxelCoord::new(4, 4, 4), &mut rng);
        assert!(matches!(again, Err(HouseError::Invariant(_))));
    }

    #[test]
    fn no_door_chance_means_no_doors() {
        let config = GenConfig {
            door_chance: 0.0,
            ..GenConfig::default()
        };
        for seed in 0..5 {
            let mut rng = BuildRng::new(seed);
            let mut house =
                House::plan(13, 13, "rustic", &registry(), config.clone(), &mut rng).unwrap();
            let mut world = plot();
            let report = house
                .build(&mut world, VoxelCoord::new(4, 4, 4), &mut rng)
                .unwrap();
            assert_eq!(report.doors, 0);
            assert_eq!(world.count_matching("spruce_door"), 0);
            assert_eq!(house.window_sites().len(), report.windows);
        }
    }

    #[test]
    fn shutters_follow_the_floor_tier() {
        let mut no_shutters = Theme::rustic();
        no_shutters.name = "plain".into();
        no_shutters.palette = Palette {
            has_shutters: (false, false),
            ..Palette::rustic()
        };
        let mut all_shutters = Theme::rustic();
        all_shutters.name = "shuttered".into();
        all_shutters.palette = Palette {
            has_shutters: (true, true),
            ..Palette::rustic()
        };
        let mut registry = registry();
        registry.register(no_shutters).unwrap();
        registry.register(all_shutters).unwrap();

        let config = GenConfig {
            door_chance: 0.0,
            ..GenConfig::default()
        };
        let mut shutters = 0;
        for seed in 0..10 {
            for (theme, expect_any) in [("plain", false), ("shuttered", true)] {
                let mut rng = BuildRng::new(seed);
                let mut house =
                    House::plan(13, 13, theme, &registry, config.clone(), &mut rng).unwrap();
                let mut world = plot();
                let report = house
                    .build(&mut world, VoxelCoord::new(4, 4, 4), &mut rng)
                    .unwrap();
                if expect_any {
                    shutters += report.shutters;
                } else {
                    assert_eq!(report.shutters, 0);
                }
            }
        }
        assert!(shutters > 0);
    }

    #[test]
    fn arid_houses_get_studs() {
        let mut studs = 0;
        for seed in 0..10 {
            let mut rng = BuildRng::new(seed);
            let mut house =
                House::plan(13, 9, "arid", &registry(), GenConfig::default(), &mut rng).unwrap();
            let mut world = plot();
            let report = house
                .build(&mut world, VoxelCoord::new(4, 4, 4), &mut rng)
                .unwrap();
            assert_eq!(report.shutters, 0);
            studs += report.studs;
        }
        assert!(studs > 0);
    }

    #[test]
    fn centring_splits_leftover_blocks() {
        let mut rng = BuildRng::new(11);
        // (9 - 1) % 4 == 0: nothing left over.
        assert_eq!(centring_shift(9, 4, &mut rng), 0);
        // (12 - 1) % 4 == 3: one on each side plus one at random.
        for _ in 0..20 {
            let shift = centring_shift(12, 4, &mut rng);
            assert!(shift == 1 || shift == 2);
        }
        // (11 - 1) % 4 == 2: one on each side.
        assert_eq!(centring_shift(11, 4, &mut rng), 1);
    }

    #[test]
    fn bad_config_is_rejected_before_planning() {
        let mut rng = BuildRng::new(1);
        let config = GenConfig {
            growth_pool: Vec::new(),
            ..GenConfig::default()
        };
        let err = House::plan(9, 9, "rustic", &registry(), config, &mut rng).unwrap_err();
        assert!(matches!(err, HouseError::Config(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn door_without_access_height_is_dropped() {
        let theme = Theme::rustic();
        let config = GenConfig::default();
        let mut world = plot();
        // The wall's middle column is boxed in by stone well past one storey,
        // so no height has exactly two open sides.
        world
            .fill(VoxelCoord::new(3, 4, 3), VoxelCoord::new(7, 12, 5), "stone")
            .unwrap();
        let wall = VoxelCoord::new(4, 4, 4);
        let window = WindowSite {
            floor: 0,
            wall,
            pos: VoxelCoord::new(5, 6, 4),
        };

        let mut site = site_on(&mut world, &theme, &config);
        site.windows.push(window);
        site.punch_door(DoorSite {
            floor: 0,
            wall,
            axis: Axis::X,
        })
        .unwrap();

        assert_eq!(site.report.doors, 0);
        assert_eq!(site.report.blocks_placed, 0);
        assert_eq!(
            site.report
                .count(|k| matches!(k, BuildEventKind::NoAccessHeight)),
            1
        );
        // An abandoned door keeps its wall's window.
        assert_eq!(site.windows, vec![window]);
        drop(site);
        assert_eq!(world.count_matching("door"), 0);
        assert_eq!(world.placements(), 0);
    }

    #[test]
    fn door_into_solid_interior_is_dropped() {
        let theme = Theme::rustic();
        let config = GenConfig::default();
        let mut world = plot();
        // A wall along X at z = 4 backed by solid ground to the south. The
        // only gap is one block up on its west side, which gives an access
        // height of 1 with a step to the open north.
        world
            .fill(VoxelCoord::new(3, 4, 4), VoxelCoord::new(7, 12, 4), "cobblestone")
            .unwrap();
        world
            .fill(VoxelCoord::new(0, 4, 5), VoxelCoord::new(31, 12, 31), "stone")
            .unwrap();
        world.put(VoxelCoord::new(4, 5, 4), "air").unwrap();

        let mut site = site_on(&mut world, &theme, &config);
        site.punch_door(DoorSite {
            floor: 0,
            wall: VoxelCoord::new(4, 4, 4),
            axis: Axis::X,
        })
        .unwrap();

        assert_eq!(site.report.doors, 0);
        assert_eq!(
            site.report
                .count(|k| matches!(k, BuildEventKind::DoorBlocked)),
            1
        );
        assert_eq!(site.report.events[0].coord, VoxelCoord::new(5, 5, 4));
        drop(site);
        // Neither the stairs nor the door went in.
        assert_eq!(world.count_matching("stairs"), 0);
        assert_eq!(world.count_matching("door"), 0);
    }

    #[test]
    fn window_without_outer_wall_is_recorded() {
        let theme = Theme::rustic();
        let config = GenConfig::default();
        let mut world = plot();
        world
            .fill(VoxelCoord::new(0, 4, 0), VoxelCoord::new(31, 12, 31), "stone")
            .unwrap();

        let mut site = site_on(&mut world, &theme, &config);
        site.punch_window(0, VoxelCoord::new(4, 4, 4), Axis::X, &templates::cellarwindow())
            .unwrap();

        assert!(site.windows.is_empty());
        assert_eq!(site.report.windows, 0);
        assert_eq!(
            site.report.events,
            vec![BuildEvent {
                floor: 0,
                coord: VoxelCoord::new(5, 4, 4),
                kind: BuildEventKind::NoOuterWall {
                    feature: Feature::Window,
                },
            }]
        );
        drop(site);
        assert_eq!(world.count_matching("cobblestone"), 0);
    }
}
