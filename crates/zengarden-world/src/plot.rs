//! Plot grid: the per-cell plant state machine.
//!
//! Each of the nine cells is **Empty**, **Growing**, or **Ready**:
//!
//! ```text
//! Empty --plant--> Growing --advance--> Ready --harvest--> Empty
//!                     ^                   |
//!                     +---- (regrows) ----+
//! ```
//!
//! Growth is never accumulated. [`PlotGrid::advance`] recomputes elapsed
//! time from each plant's absolute `planted_at`, so it is idempotent and can
//! be called at any cadence, including after a long suspension.

use tracing::{debug, warn};

use zengarden_types::{CELL_COUNT, CellPos, CellState, EpochMillis, PlantInstance};

use crate::catalog::{SeedCatalog, SeedDefinition};
use crate::error::WorldError;

// ---------------------------------------------------------------------------
// Harvest outcome
// ---------------------------------------------------------------------------

/// What happened to a cell when its plant was harvested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestOutcome {
    /// The plant as it was just before harvesting.
    pub plant: PlantInstance,
    /// `true` if the cell is now empty, `false` if the plant regrows.
    pub cleared: bool,
}

// ---------------------------------------------------------------------------
// PlotGrid
// ---------------------------------------------------------------------------

/// The fixed 3x3 garden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotGrid {
    /// Row-major cell contents.
    cells: [Option<PlantInstance>; CELL_COUNT],
}

impl Default for PlotGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotGrid {
    /// An all-empty grid.
    pub fn new() -> Self {
        Self {
            cells: core::array::from_fn(|_| None),
        }
    }

    /// Build a grid from placed plants. Later entries for the same cell win.
    pub fn from_plants(plants: impl IntoIterator<Item = (CellPos, PlantInstance)>) -> Self {
        let mut grid = Self::new();
        for (pos, plant) in plants {
            if let Some(slot) = grid.cells.get_mut(pos.index()) {
                *slot = Some(plant);
            }
        }
        grid
    }

    /// The plant in a cell, if any.
    pub fn get(&self, pos: CellPos) -> Option<&PlantInstance> {
        self.cells.get(pos.index()).and_then(Option::as_ref)
    }

    /// Current state of a cell.
    pub fn state(&self, pos: CellPos) -> CellState {
        self.get(pos).map_or(CellState::Empty, PlantInstance::state)
    }

    /// Every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellPos, Option<&PlantInstance>)> {
        CellPos::all().map(|pos| (pos, self.get(pos)))
    }

    /// Occupied cells in row-major order.
    pub fn plants(&self) -> impl Iterator<Item = (CellPos, &PlantInstance)> {
        self.iter().filter_map(|(pos, plant)| plant.map(|p| (pos, p)))
    }

    /// Cells currently in the Ready state, row-major.
    pub fn ready_cells(&self) -> Vec<CellPos> {
        self.plants()
            .filter(|(_, plant)| plant.is_grown)
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// Check that a cell can receive a seed.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellOccupied`] if the cell holds a plant.
    pub fn ensure_empty(&self, pos: CellPos) -> Result<(), WorldError> {
        if self.get(pos).is_some() {
            return Err(WorldError::CellOccupied(pos));
        }
        Ok(())
    }

    /// Empty -> Growing. Plants a fresh seedling of `def` at `now`.
    ///
    /// Inventory is not touched here; the caller checks and decrements it.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellOccupied`] if the cell holds a plant.
    pub fn plant(
        &mut self,
        pos: CellPos,
        def: &SeedDefinition,
        now: EpochMillis,
    ) -> Result<&PlantInstance, WorldError> {
        self.ensure_empty(pos)?;
        let plant = PlantInstance::seedling(
            def.id.clone(),
            now,
            def.is_multi_harvest,
            def.initial_harvests(),
        );
        let slot = self
            .cells
            .get_mut(pos.index())
            .ok_or(WorldError::CellEmpty(pos))?;
        debug!(%pos, seed = %def.id, now, "Seed planted");
        Ok(slot.insert(plant))
    }

    /// Growing -> Ready for every plant whose current cycle has elapsed.
    ///
    /// Returns the cells that transitioned during this call. Plants whose
    /// seed is missing from the catalog are left untouched.
    pub fn advance(&mut self, now: EpochMillis, catalog: &SeedCatalog) -> Vec<CellPos> {
        let mut transitioned = Vec::new();
        for (index, slot) in self.cells.iter_mut().enumerate() {
            let Some(plant) = slot.as_mut() else { continue };
            if plant.is_grown {
                continue;
            }
            let Some(def) = catalog.find(plant.seed_id.as_str()) else {
                warn!(seed = %plant.seed_id, "Growing plant references unknown seed");
                continue;
            };
            let duration = def.grow_duration_for(plant.is_first_cycle());
            if now.saturating_sub(plant.planted_at) >= duration {
                plant.is_grown = true;
                if let Some(pos) = CellPos::from_index(index) {
                    debug!(%pos, seed = %plant.seed_id, "Plant fully grown");
                    transitioned.push(pos);
                }
            }
        }
        transitioned
    }

    /// Borrow the plant in a Ready cell.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellEmpty`] for an empty cell or
    /// [`WorldError::NotGrown`] for a growing one.
    pub fn ready_plant(&self, pos: CellPos) -> Result<&PlantInstance, WorldError> {
        let plant = self.get(pos).ok_or(WorldError::CellEmpty(pos))?;
        if !plant.is_grown {
            return Err(WorldError::NotGrown {
                pos,
                seed_id: plant.seed_id.clone(),
            });
        }
        Ok(plant)
    }

    /// Ready -> Empty, or Ready -> Growing for a plant with credits left.
    ///
    /// A regrowing plant restarts its cycle at `now`; finite credits are
    /// decremented and infinite credits are kept.
    ///
    /// # Errors
    ///
    /// Same as [`PlotGrid::ready_plant`]; the grid is unchanged on error.
    pub fn harvest(&mut self, pos: CellPos, now: EpochMillis) -> Result<HarvestOutcome, WorldError> {
        self.ready_plant(pos)?;
        let slot = self
            .cells
            .get_mut(pos.index())
            .ok_or(WorldError::CellEmpty(pos))?;
        let Some(plant) = slot.as_mut() else {
            return Err(WorldError::CellEmpty(pos));
        };
        let before = plant.clone();

        let regrow = if plant.is_multi_harvest {
            plant.harvests_remaining.after_harvest()
        } else {
            None
        };

        if let Some(remaining) = regrow {
            plant.harvests_remaining = remaining;
            plant.harvests_taken = plant.harvests_taken.saturating_add(1);
            plant.planted_at = now;
            plant.is_grown = false;
            debug!(%pos, seed = %plant.seed_id, %remaining, "Plant harvested and regrowing");
            Ok(HarvestOutcome {
                plant: before,
                cleared: false,
            })
        } else {
            *slot = None;
            debug!(%pos, seed = %before.seed_id, "Plant harvested and cleared");
            Ok(HarvestOutcome {
                plant: before,
                cleared: true,
            })
        }
    }

    /// Remove whatever grows in a cell, in any state.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::CellEmpty`] if nothing is planted.
    pub fn dig_up(&mut self, pos: CellPos) -> Result<PlantInstance, WorldError> {
        self.cells
            .get_mut(pos.index())
            .and_then(Option::take)
            .ok_or(WorldError::CellEmpty(pos))
    }
}

// ---------------------------------------------------------------------------
// Growth progress
// ---------------------------------------------------------------------------

/// Fraction of the current growth cycle completed, in `[0, 1]`.
///
/// Ready plants always report `1.0`.
pub fn growth_progress(plant: &PlantInstance, def: &SeedDefinition, now: EpochMillis) -> f64 {
    if plant.is_grown {
        return 1.0;
    }
    let duration = def.grow_duration_for(plant.is_first_cycle());
    if duration == 0 {
        return 1.0;
    }
    let elapsed = now.saturating_sub(plant.planted_at);
    // Millisecond durations stay far below 2^52, so the conversion is exact.
    #[allow(clippy::cast_precision_loss)]
    let fraction = elapsed as f64 / duration as f64;
    fraction.clamp(0.0, 1.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::arithmetic_side_effects)]
mod tests {
    use zengarden_types::{Harvests, SeedId};

    use super::*;
    use crate::starting_catalog::starting_catalog;

    fn pos(row: u8, col: u8) -> CellPos {
        CellPos::new(row, col).unwrap()
    }

    fn catalog() -> SeedCatalog {
        starting_catalog().unwrap()
    }

    fn grown(seed: &str, multi: bool, harvests: Harvests) -> PlantInstance {
        PlantInstance {
            seed_id: SeedId::from(seed),
            planted_at: 0,
            is_grown: true,
            harvests_remaining: harvests,
            is_multi_harvest: multi,
            harvests_taken: 0,
        }
    }

    #[test]
    fn plant_fills_empty_cell() {
        let catalog = catalog();
        let mut grid = PlotGrid::new();
        let carrot = catalog.get("carrot").unwrap();
        let plant = grid.plant(pos(0, 0), carrot, 1_000).unwrap();
        assert_eq!(plant.planted_at, 1_000);
        assert!(!plant.is_grown);
        assert_eq!(grid.state(pos(0, 0)), CellState::Growing);
        assert_eq!(grid.occupied_count(), 1);
    }

    #[test]
    fn plant_on_occupied_cell_is_rejected_without_change() {
        let catalog = catalog();
        let mut grid = PlotGrid::new();
        let carrot = catalog.get("carrot").unwrap();
        let corn = catalog.get("corn").unwrap();
        grid.plant(pos(1, 1), carrot, 0).unwrap();
        let before = grid.clone();
        let result = grid.plant(pos(1, 1), corn, 5);
        assert!(matches!(result, Err(WorldError::CellOccupied(_))));
        assert_eq!(grid, before);
    }

    #[test]
    fn advance_marks_ready_exactly_at_duration() {
        let catalog = catalog();
        let mut grid = PlotGrid::new();
        let carrot = catalog.get("carrot").unwrap();
        grid.plant(pos(0, 0), carrot, 1_000).unwrap();

        assert!(grid.advance(1_000 + carrot.grow_duration_ms - 1, &catalog).is_empty());
        assert_eq!(grid.state(pos(0, 0)), CellState::Growing);

        let ready = grid.advance(1_000 + carrot.grow_duration_ms, &catalog);
        assert_eq!(ready, vec![pos(0, 0)]);
        assert_eq!(grid.state(pos(0, 0)), CellState::Ready);
    }

    #[test]
    fn advance_is_idempotent() {
        let catalog = catalog();
        let mut grid = PlotGrid::new();
        grid.plant(pos(2, 2), catalog.get("carrot").unwrap(), 0).unwrap();
        assert_eq!(grid.advance(60_000, &catalog).len(), 1);
        let after_first = grid.clone();
        assert!(grid.advance(60_000, &catalog).is_empty());
        assert!(grid.advance(120_000, &catalog).is_empty());
        assert_eq!(grid, after_first);
    }

    #[test]
    fn advance_after_long_gap_catches_up() {
        let catalog = catalog();
        let mut grid = PlotGrid::new();
        grid.plant(pos(0, 1), catalog.get("corn").unwrap(), 0).unwrap();
        grid.plant(pos(0, 2), catalog.get("carrot").unwrap(), 0).unwrap();
        let ready = grid.advance(86_400_000, &catalog);
        assert_eq!(ready, vec![pos(0, 1), pos(0, 2)]);
    }

    #[test]
    fn advance_tolerates_clock_going_backwards() {
        let catalog = catalog();
        let mut grid = PlotGrid::new();
        grid.plant(pos(0, 0), catalog.get("carrot").unwrap(), 50_000).unwrap();
        assert!(grid.advance(10_000, &catalog).is_empty());
    }

    #[test]
    fn first_cycle_uses_initial_duration() {
        let catalog = catalog();
        let tomato = catalog.get("tomato").unwrap();
        let mut grid = PlotGrid::new();
        grid.plant(pos(0, 0), tomato, 0).unwrap();
        assert!(grid.advance(tomato.grow_duration_ms, &catalog).is_empty());
        let initial = tomato.initial_grow_duration_ms.unwrap();
        assert_eq!(grid.advance(initial, &catalog).len(), 1);

        // Second cycle uses the regular duration.
        grid.harvest(pos(0, 0), initial).unwrap();
        let ready = grid.advance(initial + tomato.grow_duration_ms, &catalog);
        assert_eq!(ready, vec![pos(0, 0)]);
    }

    #[test]
    fn harvest_single_harvest_clears_cell() {
        let mut grid = PlotGrid::from_plants([(pos(0, 0), grown("carrot", false, Harvests::ONCE))]);
        let outcome = grid.harvest(pos(0, 0), 500).unwrap();
        assert!(outcome.cleared);
        assert_eq!(grid.state(pos(0, 0)), CellState::Empty);
    }

    #[test]
    fn harvest_multi_with_three_left_regrows_with_two() {
        let mut grid =
            PlotGrid::from_plants([(pos(1, 0), grown("tomato", true, Harvests::Finite(3)))]);
        let outcome = grid.harvest(pos(1, 0), 7_777).unwrap();
        assert!(!outcome.cleared);
        let plant = grid.get(pos(1, 0)).unwrap();
        assert_eq!(plant.harvests_remaining, Harvests::Finite(2));
        assert_eq!(plant.planted_at, 7_777);
        assert!(!plant.is_grown);
        assert_eq!(plant.harvests_taken, 1);
        assert_eq!(grid.state(pos(1, 0)), CellState::Growing);
    }

    #[test]
    fn harvest_multi_last_credit_clears_cell() {
        let mut grid =
            PlotGrid::from_plants([(pos(1, 0), grown("tomato", true, Harvests::Finite(1)))]);
        assert!(grid.harvest(pos(1, 0), 1).unwrap().cleared);
        assert!(grid.get(pos(1, 0)).is_none());
    }

    #[test]
    fn harvest_infinite_never_decrements() {
        let catalog = catalog();
        let mut grid =
            PlotGrid::from_plants([(pos(2, 0), grown("tomato", true, Harvests::Infinite))]);
        let mut now = 0;
        for _ in 0..5 {
            let outcome = grid.harvest(pos(2, 0), now).unwrap();
            assert!(!outcome.cleared);
            assert_eq!(
                grid.get(pos(2, 0)).unwrap().harvests_remaining,
                Harvests::Infinite
            );
            now += 1_000_000;
            grid.advance(now, &catalog);
        }
    }

    #[test]
    fn harvest_rejects_growing_and_empty_cells() {
        let catalog = catalog();
        let mut grid = PlotGrid::new();
        assert!(matches!(
            grid.harvest(pos(0, 0), 0),
            Err(WorldError::CellEmpty(_))
        ));
        grid.plant(pos(0, 0), catalog.get("corn").unwrap(), 0).unwrap();
        let before = grid.clone();
        assert!(matches!(
            grid.harvest(pos(0, 0), 1),
            Err(WorldError::NotGrown { .. })
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn dig_up_removes_growing_plant() {
        let catalog = catalog();
        let mut grid = PlotGrid::new();
        grid.plant(pos(0, 0), catalog.get("corn").unwrap(), 0).unwrap();
        let removed = grid.dig_up(pos(0, 0)).unwrap();
        assert_eq!(removed.seed_id.as_str(), "corn");
        assert!(matches!(grid.dig_up(pos(0, 0)), Err(WorldError::CellEmpty(_))));
    }

    #[test]
    fn progress_is_clamped() {
        let catalog = catalog();
        let carrot = catalog.get("carrot").unwrap();
        let plant = PlantInstance::seedling(SeedId::from("carrot"), 10_000, false, Harvests::ONCE);
        assert_eq!(growth_progress(&plant, carrot, 0), 0.0);
        assert_eq!(growth_progress(&plant, carrot, 10_000 + carrot.grow_duration_ms / 2), 0.5);
        assert_eq!(growth_progress(&plant, carrot, u64::MAX), 1.0);
    }
}
