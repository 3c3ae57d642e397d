use std::time::{Duration, Instant};

use bevy::prelude::*;

use crate::game::lattice::{CellId, Lattice};
use super::cost_field::{self, CostSummary, DEFAULT_ROUGH_INCREMENT};
use super::direction_field;
use super::integration_field::{self, IntegrationSummary};
use super::terrain::TerrainQuery;

/// Regenerations slower than this are reported with `warn!`.
const SLOW_REGENERATION: Duration = Duration::from_millis(16);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlowFieldStats {
    pub goal: CellId,
    pub cost: CostSummary,
    pub integration: IntegrationSummary,
    pub directed: usize,
    pub elapsed: Duration,
}

/// Shared navigation field toward a single goal.
///
/// Runs cost field, integration field and direction field in sequence over
/// the lattice. The whole pipeline is rebuilt on every goal change; there is
/// no incremental update.
///
/// # Algorithm
///
/// 1. **Cost Field:** terrain classification, 1 (open) to 255 (impassable)
/// 2. **Integration Field:** label-correcting wavefront from the goal
/// 3. **Direction Field:** each cell points at its lowest neighbour
#[derive(Resource, Clone, Debug)]
pub struct FlowField {
    goal: Option<CellId>,
    rough_increment: u8,
    generation: u64,
    last_stats: Option<FlowFieldStats>,
}

impl Default for FlowField {
    fn default() -> Self {
        Self::new(DEFAULT_ROUGH_INCREMENT)
    }
}

impl FlowField {
    pub fn new(rough_increment: u8) -> Self {
        Self {
            goal: None,
            rough_increment,
            generation: 0,
            last_stats: None,
        }
    }

    pub fn goal(&self) -> Option<CellId> {
        self.goal
    }

    /// How many times the field has been rebuilt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_stats(&self) -> Option<&FlowFieldStats> {
        self.last_stats.as_ref()
    }

    /// Rebuilds the field if `goal` differs from the current goal.
    /// Returns whether a rebuild happened.
    pub fn regenerate<T: TerrainQuery + ?Sized>(&mut self, lattice: &mut Lattice, goal: CellId, terrain: &T) -> bool {
        if self.goal == Some(goal) {
            return false;
        }
        self.rebuild(lattice, goal, terrain).is_some()
    }

    /// Rebuilds the field unconditionally, e.g. after terrain changed.
    pub fn rebuild<T: TerrainQuery + ?Sized>(
        &mut self,
        lattice: &mut Lattice,
        goal: CellId,
        terrain: &T,
    ) -> Option<FlowFieldStats> {
        if goal >= lattice.len() {
            warn!("Goal cell {} out of range ({} cells), flow field not rebuilt", goal, lattice.len());
            return None;
        }

        let start = Instant::now();
        let cost = cost_field::generate(lattice, terrain, self.rough_increment);
        let integration = integration_field::generate(lattice, goal);
        let directed = direction_field::generate(lattice);

        let stats = FlowFieldStats {
            goal,
            cost,
            integration,
            directed,
            elapsed: start.elapsed(),
        };
        self.goal = Some(goal);
        self.generation += 1;
        self.last_stats = Some(stats);

        info!(
            "Flow field #{} -> goal {:?}: {} reached, {} unreachable, {} impassable, {} rough in {:?}",
            self.generation,
            lattice.cell(goal).map(|c| c.coord()),
            integration.reached,
            integration.unreached,
            cost.impassable,
            cost.rough,
            stats.elapsed
        );
        if stats.elapsed > SLOW_REGENERATION {
            warn!("[NAVIGATION] Slow flow field rebuild: {:?} for {} cells", stats.elapsed, lattice.len());
        }
        Some(stats)
    }
}
