// Floor grid generator.
//
// A floor plan is a `FloorGrid` over the half-unit lattice (see `types.rs`):
// one `Occupancy` per lattice cell. `Floor::new` takes the plan for its own
// level and does two things in one sweep:
//
// 1. Classification. Every cell gets a `CellPlan`: its category (which class
//    of the blueprint set to draw from) and its slot (which of the class's
//    templates), chosen by `Slot::select` from the cell's parity role and
//    crowding.
// 2. Growth. Every room cell whose category grows (`Category::Room`) plans
//    the cell above it in the next floor's grid: it draws a category from
//    the level's pool and spreads it to the eight surrounding cells,
//    reinforcing those that already share it and promoting those below it.
//    Neighbours in a higher category are left alone, so no cell of the
//    next grid ever loses category to a later growth.
//
// The next grid starts empty and only gains cells through growth, so a floor
// whose pool is roof-only yields a next floor with no rooms, and the floor
// after that is empty. The house relies on this to terminate planning.
//
// See also: `house.rs` which chains floors, `blueprint.rs` for slots.

use crate::blueprint::{BlueprintSet, LayerTemplate, Slot, Stage};
use crate::error::{ConfigError, HouseError};
use crate::types::{Category, LatticeRole, Occupancy};
use hearthwright_prng::BuildRng;
use std::fmt;

// ---------------------------------------------------------------------------
// FloorGrid
// ---------------------------------------------------------------------------

/// A rectangular plan of occupancies, indexed `(ux, uy)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorGrid {
    size_x: usize,
    size_y: usize,
    cells: Vec<Occupancy>,
}

impl FloorGrid {
    /// A grid with every cell set to `fill`.
    pub fn filled(size_x: usize, size_y: usize, fill: Occupancy) -> Self {
        Self {
            size_x,
            size_y,
            cells: vec![fill; size_x * size_y],
        }
    }

    pub fn sky(size_x: usize, size_y: usize) -> Self {
        Self::filled(size_x, size_y, Occupancy::sky())
    }

    /// Build from rows indexed `[ux][uy]`. Rows of unequal length are an
    /// invariant violation.
    pub fn from_rows(rows: Vec<Vec<Occupancy>>) -> Result<Self, HouseError> {
        let size_x = rows.len();
        let size_y = rows.first().map_or(0, Vec::len);
        if let Some((ux, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size_y) {
            return Err(HouseError::Invariant(format!(
                "ragged floor grid: row {ux} has {} cells, expected {size_y}",
                row.len()
            )));
        }
        Ok(Self {
            size_x,
            size_y,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Build from the float form (`2.1` etc.), rows indexed `[ux][uy]`.
    pub fn from_values(rows: &[&[f32]]) -> Result<Self, HouseError> {
        let rows = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&v| {
                        Occupancy::from_value(v).ok_or_else(|| {
                            HouseError::Invariant(format!("invalid occupancy value {v}"))
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    pub fn size_x(&self) -> usize {
        self.size_x
    }

    pub fn size_y(&self) -> usize {
        self.size_y
    }

    fn index(&self, ux: usize, uy: usize) -> Option<usize> {
        (ux < self.size_x && uy < self.size_y).then(|| ux * self.size_y + uy)
    }

    pub fn get(&self, ux: usize, uy: usize) -> Option<Occupancy> {
        self.index(ux, uy).map(|i| self.cells[i])
    }

    pub fn get_mut(&mut self, ux: usize, uy: usize) -> Option<&mut Occupancy> {
        self.index(ux, uy).map(|i| &mut self.cells[i])
    }

    /// Whether `(ux, uy)` lies on the outer ring of the grid.
    pub fn is_boundary(&self, ux: usize, uy: usize) -> bool {
        ux == 0 || uy == 0 || ux + 1 >= self.size_x || uy + 1 >= self.size_y
    }

    /// True when no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_sky())
    }

    /// Cells in `(ux, uy, occupancy)` order, `uy` fastest.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, Occupancy)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, &c)| (i / self.size_y.max(1), i % self.size_y.max(1), c))
    }

    pub fn count(&self, category: Category) -> usize {
        self.cells.iter().filter(|c| c.category == category).count()
    }
}

impl fmt::Display for FloorGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ux in 0..self.size_x {
            for uy in 0..self.size_y {
                if uy > 0 {
                    write!(f, " ")?;
                }
                let cell = self.cells[ux * self.size_y + uy];
                if cell.is_sky() {
                    write!(f, " . ")?;
                } else {
                    write!(f, "{cell}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Floor
// ---------------------------------------------------------------------------

/// What a lattice cell of a floor is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPlan {
    pub category: Category,
    pub slot: Slot,
}

/// One classified level of a house.
#[derive(Clone, Debug)]
pub struct Floor {
    pub level: usize,
    pub stage: Stage,
    plan: Vec<CellPlan>,
    grid: FloorGrid,
    next: FloorGrid,
}

impl Floor {
    /// Classify `grid` and grow the plan for the level above, drawing room
    /// growth from `pool`.
    pub fn new(
        grid: FloorGrid,
        stage: Stage,
        level: usize,
        pool: &[Category],
        rng: &mut BuildRng,
    ) -> Result<Self, HouseError> {
        if pool.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "growth_pool",
                reason: "must not be empty".into(),
            }
            .into());
        }

        let mut next = FloorGrid::sky(grid.size_x(), grid.size_y());
        let mut plan = Vec::with_capacity(grid.size_x() * grid.size_y());
        for (ux, uy, cell) in grid.cells() {
            let role = LatticeRole::of(ux, uy);
            plan.push(CellPlan {
                category: cell.category,
                slot: Slot::select(role, cell.crowding),
            });
            if role == LatticeRole::Room && cell.category.grows() {
                grow_above(&mut next, ux, uy, pool, rng);
            }
        }

        Ok(Self {
            level,
            stage,
            plan,
            grid,
            next,
        })
    }

    /// The plan this floor was built from.
    pub fn grid(&self) -> &FloorGrid {
        &self.grid
    }

    /// The plan grown for the floor above.
    pub fn next_grid(&self) -> &FloorGrid {
        &self.next
    }

    pub fn into_next_grid(self) -> FloorGrid {
        self.next
    }

    pub fn cell(&self, ux: usize, uy: usize) -> Option<CellPlan> {
        self.grid.index(ux, uy).map(|i| self.plan[i])
    }

    /// Cells in lattice order with their plans.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellPlan)> + '_ {
        self.grid
            .cells()
            .zip(&self.plan)
            .map(|((ux, uy, _), &plan)| (ux, uy, plan))
    }

    /// The template a cell is built from, looked up in `set`.
    pub fn template<'s>(
        &self,
        set: &'s BlueprintSet,
        ux: usize,
        uy: usize,
    ) -> Option<&'s LayerTemplate> {
        self.cell(ux, uy)
            .map(|c| set.class(c.category).slot(c.slot))
    }
}

/// Plan the cell above `(ux, uy)` in `next`.
///
/// The cell takes a category drawn from `pool`. Unless that is sky, each of
/// the eight neighbours already in that category gains a tenth of crowding,
/// and each in a lower category is promoted to it with no crowding.
/// Boundary cells are never grown.
pub fn grow_above(
    next: &mut FloorGrid,
    ux: usize,
    uy: usize,
    pool: &[Category],
    rng: &mut BuildRng,
) {
    if next.is_boundary(ux, uy) {
        return;
    }
    let Some(&pick) = rng.choose(pool) else {
        return;
    };
    if let Some(cell) = next.get_mut(ux, uy) {
        *cell = Occupancy::new(pick);
    }
    if pick == Category::Sky {
        return;
    }

    for dx in -1i64..=1 {
        for dy in -1i64..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let (Ok(nx), Ok(ny)) = (
                usize::try_from(ux as i64 + dx),
                usize::try_from(uy as i64 + dy),
            ) else {
                continue;
            };
            let Some(neighbour) = next.get_mut(nx, ny) else {
                continue;
            };
            if neighbour.category == pick {
                neighbour.reinforce();
            } else if neighbour.category < pick {
                *neighbour = Occupancy::new(pick);
            }
        }
    }
}
