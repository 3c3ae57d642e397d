use crate::game::lattice::{Lattice, DEFAULT_COST, IMPASSABLE_COST};
use super::terrain::{TerrainClass, TerrainQuery};

/// Increment applied once to a cell touched by rough terrain.
pub const DEFAULT_ROUGH_INCREMENT: u8 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CostSummary {
    pub impassable: usize,
    pub rough: usize,
}

/// Resets every cell to [`DEFAULT_COST`], including a marked goal.
pub fn reset(lattice: &mut Lattice) {
    lattice.take_goal_marker();
    for cell in lattice.cells_mut() {
        cell.cost = DEFAULT_COST;
    }
}

/// Rebuilds the cost field from terrain classifications.
///
/// Impassable terrain saturates the cell at 255 and ends its classification.
/// Rough terrain adds `rough_increment` once per cell no matter how many
/// rough patches overlap it.
pub fn generate<T: TerrainQuery + ?Sized>(lattice: &mut Lattice, terrain: &T, rough_increment: u8) -> CostSummary {
    reset(lattice);

    let mut summary = CostSummary::default();
    for id in 0..lattice.len() {
        let Some(bounds) = lattice.cell_bounds(id) else { continue };
        let hits = terrain.classify(&bounds);
        let Some(cell) = lattice.cell_mut(id) else { continue };

        let mut rough_applied = false;
        for class in hits {
            match class {
                TerrainClass::Impassable => {
                    cell.increase_cost(IMPASSABLE_COST);
                    break;
                }
                TerrainClass::Rough if !rough_applied => {
                    cell.increase_cost(rough_increment);
                    rough_applied = true;
                }
                TerrainClass::Rough => {}
            }
        }

        if cell.is_impassable() {
            summary.impassable += 1;
        } else if rough_applied {
            summary.rough += 1;
        }
    }
    summary
}
