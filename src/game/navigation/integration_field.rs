use std::collections::VecDeque;

use bevy::prelude::*;
use smallvec::SmallVec;

use crate::game::lattice::{CellId, Lattice, GOAL_COST};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegrationSummary {
    pub reached: usize,
    pub unreached: usize,
    /// Number of successful relaxations, including repeated ones for the same cell.
    pub relaxations: usize,
}

/// Floods goal distances outward from `goal`.
///
/// Label-correcting relaxation over a FIFO queue: a neighbour is re-queued
/// every time its `best_cost` improves, so non-uniform terrain costs settle
/// to their minimum. Impassable cells are never relaxed and therefore never
/// forward a finite distance. Cells the wavefront cannot reach keep
/// [`crate::game::lattice::UNREACHED`].
///
/// Terrain costs are left intact apart from the goal, which is marked with
/// [`GOAL_COST`] until the next call; that call puts the goal's terrain cost
/// back. Occupancy is cleared because every agent has to re-read the new field.
pub fn generate(lattice: &mut Lattice, goal: CellId) -> IntegrationSummary {
    if goal >= lattice.len() {
        warn!("Integration goal {} out of range ({} cells), field left unchanged", goal, lattice.len());
        return IntegrationSummary::default();
    }

    if let Some((previous, displaced_cost)) = lattice.take_goal_marker() {
        if let Some(cell) = lattice.cell_mut(previous) {
            if cell.cost == GOAL_COST {
                cell.cost = displaced_cost;
            }
        }
    }
    for cell in lattice.cells_mut() {
        cell.reset_navigation();
    }

    let displaced_cost = {
        let cell = &mut lattice.cells_mut()[goal];
        let displaced = cell.cost;
        cell.cost = GOAL_COST;
        cell.best_cost = 0;
        displaced
    };
    lattice.set_goal_marker(goal, displaced_cost);

    let mut summary = IntegrationSummary::default();
    let mut queue = VecDeque::with_capacity(lattice.len());
    queue.push_back(goal);

    while let Some(current) = queue.pop_front() {
        let neighbors: SmallVec<[CellId; 8]> = lattice.neighbors(current).map(|(_, id)| id).collect();
        let cells = lattice.cells_mut();
        let current_best = cells[current].best_cost;

        for neighbor in neighbors {
            let cell = &mut cells[neighbor];
            if cell.is_impassable() {
                continue;
            }
            let candidate = (cell.cost as u32).saturating_add(current_best);
            if candidate < cell.best_cost {
                cell.best_cost = candidate;
                summary.relaxations += 1;
                queue.push_back(neighbor);
            }
        }
    }

    summary.reached = lattice.cells().iter().filter(|c| c.is_reachable()).count();
    summary.unreached = lattice.len() - summary.reached;
    if summary.unreached > 0 {
        debug!("{} cells unreachable from goal {}", summary.unreached, goal);
    }
    summary
}
