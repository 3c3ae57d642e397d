use super::cell::{Cell, CellId};
use super::compass::Compass;
use super::field::{CellField, FieldValue, WallMode};

/// How one border cell is re-derived after an interior pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryRule {
    /// One cardinal neighbour is missing: take the value of the cell opposite it.
    Wall { source: CellId },
    /// Cardinal neighbours are missing on both axes: average the two that exist.
    Corner { first: CellId, second: CellId },
    /// No opposite neighbour exists on a missing axis (1-wide lattice). Left untouched.
    Pinned,
}

/// Precomputed boundary rules for every border cell of a lattice.
///
/// Walls are applied before corners so that corners average freshly updated
/// wall values.
#[derive(Clone, Debug, Default)]
pub struct BoundaryPolicy {
    walls: Vec<(CellId, CellId)>,
    corners: Vec<(CellId, CellId, CellId)>,
    pinned: usize,
}

impl BoundaryPolicy {
    pub(super) fn from_cells(cells: &[Cell]) -> Self {
        let mut policy = Self::default();
        for (id, cell) in cells.iter().enumerate() {
            if !cell.is_border_cell() {
                continue;
            }
            match rule_for(cell) {
                BoundaryRule::Wall { source } => policy.walls.push((id, source)),
                BoundaryRule::Corner { first, second } => policy.corners.push((id, first, second)),
                BoundaryRule::Pinned => policy.pinned += 1,
            }
        }
        policy
    }

    pub fn rule(&self, id: CellId) -> Option<BoundaryRule> {
        if let Some(&(_, source)) = self.walls.iter().find(|(cell, _)| *cell == id) {
            return Some(BoundaryRule::Wall { source });
        }
        self.corners
            .iter()
            .find(|(cell, _, _)| *cell == id)
            .map(|&(_, first, second)| BoundaryRule::Corner { first, second })
    }

    pub fn pinned_count(&self) -> usize {
        self.pinned
    }

    /// Re-derives every border cell of field `F` from its interior neighbours.
    pub fn apply<F: CellField>(&self, cells: &mut [Cell]) {
        for &(id, source) in &self.walls {
            let value = F::get(&cells[source]);
            let value = match F::WALL {
                WallMode::Negate => -value,
                WallMode::Mirror => value,
            };
            F::set(&mut cells[id], value);
        }
        for &(id, first, second) in &self.corners {
            let value = average(F::get(&cells[first]), F::get(&cells[second]));
            F::set(&mut cells[id], value);
        }
    }
}

fn average<T: FieldValue>(a: T, b: T) -> T {
    (a + b) * 0.5
}

/// The neighbour on the axis opposite a single missing side, if exactly one side is missing.
fn axis_source(cell: &Cell, low: Compass, high: Compass) -> Option<CellId> {
    match (cell.neighbor(low), cell.neighbor(high)) {
        (None, Some(id)) | (Some(id), None) => Some(id),
        _ => None,
    }
}

fn rule_for(cell: &Cell) -> BoundaryRule {
    let x_open = cell.neighbor(Compass::West).is_none() || cell.neighbor(Compass::East).is_none();
    let y_open = cell.neighbor(Compass::South).is_none() || cell.neighbor(Compass::North).is_none();
    let x_source = axis_source(cell, Compass::West, Compass::East);
    let y_source = axis_source(cell, Compass::South, Compass::North);

    match (x_open, y_open) {
        (true, true) => match (x_source, y_source) {
            (Some(first), Some(second)) => BoundaryRule::Corner { first, second },
            _ => BoundaryRule::Pinned,
        },
        (true, false) => x_source.map_or(BoundaryRule::Pinned, |source| BoundaryRule::Wall { source }),
        (false, true) => y_source.map_or(BoundaryRule::Pinned, |source| BoundaryRule::Wall { source }),
        (false, false) => BoundaryRule::Pinned,
    }
}
