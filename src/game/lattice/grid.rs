use bevy::prelude::*;
use fixedbitset::FixedBitSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::fixed_math::{FixedNum, FixedVec2};
use super::boundary::BoundaryPolicy;
use super::cell::{Cell, CellId, GridCoord};
use super::compass::Compass;

/// Smallest accepted cell radius; smaller values would make world-to-cell snapping divide by zero.
pub const MIN_CELL_RADIUS: f32 = 0.001;

/// Which neighbour relations a cell links to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// North, east, south, west.
    Four,
    /// Cardinals plus the four diagonals.
    #[default]
    Eight,
}

/// World-space axis-aligned box covered by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellBounds {
    pub min: FixedVec2,
    pub max: FixedVec2,
}

impl CellBounds {
    pub fn center(&self) -> FixedVec2 {
        (self.min + self.max) / FixedNum::from_num(2)
    }

    pub fn overlaps(&self, other: &CellBounds) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Fixed-size grid of cells shared by the flow field and the fluid solver.
///
/// Cells live in a flat row-major arena (`id = y * width + x`) and refer to
/// their neighbours by id. Topology never changes after [`Lattice::build`].
///
/// # Example
///
/// ```rust,ignore
/// let mut lattice = Lattice::build(UVec2::new(64, 64), IVec2::ZERO, FixedNum::from_num(0.5), Connectivity::Eight);
/// let goal = lattice.cell_at_world(click_position);
/// flow_field.regenerate(&mut lattice, goal, &terrain);
/// let heading = lattice.cell(goal).map(Cell::direction_vector);
/// ```
#[derive(Clone, Debug)]
pub struct Lattice {
    width: usize,
    height: usize,
    offset: IVec2,
    cell_radius: FixedNum,
    cell_diameter: FixedNum,
    connectivity: Connectivity,
    cells: Vec<Cell>,
    border: FixedBitSet,
    boundary: BoundaryPolicy,
    /// Current goal and the terrain cost its transient goal marker replaced.
    goal_marker: Option<(CellId, u8)>,
}

impl Lattice {
    /// Allocates every cell, then links neighbours in a second pass.
    ///
    /// Zero dimensions are raised to 1; a 1x1 lattice is valid and entirely border.
    /// Radii below [`MIN_CELL_RADIUS`] are raised to it.
    pub fn build(size: UVec2, offset: IVec2, cell_radius: FixedNum, connectivity: Connectivity) -> Self {
        let width = size.x.max(1) as usize;
        let height = size.y.max(1) as usize;
        let cell_radius = cell_radius.max(FixedNum::from_num(MIN_CELL_RADIUS));
        let cell_diameter = cell_radius + cell_radius;

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let world_position = FixedVec2::new(
                    cell_diameter * FixedNum::from_num(x as i64 + offset.x as i64) + cell_radius,
                    cell_diameter * FixedNum::from_num(y as i64 + offset.y as i64) + cell_radius,
                );
                cells.push(Cell::new(GridCoord::new(x, y), world_position));
            }
        }

        let mut lattice = Self {
            width,
            height,
            offset,
            cell_radius,
            cell_diameter,
            connectivity,
            cells,
            border: FixedBitSet::with_capacity(width * height),
            boundary: BoundaryPolicy::default(),
            goal_marker: None,
        };
        lattice.link_neighbors();
        lattice.boundary = BoundaryPolicy::from_cells(&lattice.cells);

        info!(
            "Lattice built: {}x{} cells ({:?}), {} border, {} pinned",
            width,
            height,
            connectivity,
            lattice.border.count_ones(..),
            lattice.boundary.pinned_count()
        );
        lattice
    }

    fn link_neighbors(&mut self) {
        let max = IVec2::new(self.width as i32 - 1, self.height as i32 - 1);
        for id in 0..self.cells.len() {
            let origin = self.cells[id].coord().as_ivec2();
            let mut neighbors = [None; 8];

            for direction in Compass::SCAN_ORDER {
                if direction.is_diagonal() && self.connectivity == Connectivity::Four {
                    continue;
                }
                let wanted = origin + direction.offset();
                // A clamped index that moved is off the lattice: no neighbour that way.
                let clamped = wanted.clamp(IVec2::ZERO, max);
                if clamped != wanted || clamped == origin {
                    continue;
                }
                neighbors[direction.as_index()] = Some(clamped.y as usize * self.width + clamped.x as usize);
            }

            let border = Compass::CARDINALS.iter().any(|d| neighbors[d.as_index()].is_none());
            let cell = &mut self.cells[id];
            cell.neighbors = neighbors;
            cell.border = border;
            self.border.set(id, border);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn offset(&self) -> IVec2 {
        self.offset
    }

    pub fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    pub fn cell_radius(&self) -> FixedNum {
        self.cell_radius
    }

    pub fn cell_diameter(&self) -> FixedNum {
        self.cell_diameter
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id)
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        self.cells.get_mut(id)
    }

    pub fn index(&self, x: usize, y: usize) -> Option<CellId> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    pub fn boundary(&self) -> &BoundaryPolicy {
        &self.boundary
    }

    /// Split borrow used by the solver stages.
    pub(crate) fn cells_and_boundary(&mut self) -> (&mut [Cell], &BoundaryPolicy) {
        (&mut self.cells, &self.boundary)
    }

    pub(crate) fn take_goal_marker(&mut self) -> Option<(CellId, u8)> {
        self.goal_marker.take()
    }

    pub(crate) fn set_goal_marker(&mut self, goal: CellId, displaced_cost: u8) {
        self.goal_marker = Some((goal, displaced_cost));
    }

    pub fn is_border(&self, id: CellId) -> bool {
        self.border.contains(id)
    }

    pub fn border_count(&self) -> usize {
        self.border.count_ones(..)
    }

    /// Linked neighbours of `id` in [`Compass::SCAN_ORDER`].
    pub fn neighbors(&self, id: CellId) -> impl Iterator<Item = (Compass, CellId)> + '_ {
        let slots = self.cells.get(id).map(|cell| cell.neighbors);
        Compass::SCAN_ORDER
            .into_iter()
            .filter_map(move |direction| slots.and_then(|s| s[direction.as_index()]).map(|n| (direction, n)))
    }

    /// Nearest cell to a world position, clamped to the lattice.
    /// Positions too far away to divide saturate and clamp like any other.
    pub fn cell_at_world(&self, position: FixedVec2) -> CellId {
        let x = position.x.saturating_div(self.cell_diameter).floor().to_num::<i64>() - self.offset.x as i64;
        let y = position.y.saturating_div(self.cell_diameter).floor().to_num::<i64>() - self.offset.y as i64;
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        y * self.width + x
    }

    /// Like [`Lattice::cell_at_world`], but rejects positions that only landed
    /// on an edge cell through clamping (outside that cell's bounds).
    pub fn cell_at_pointer(&self, position: FixedVec2) -> Option<CellId> {
        let id = self.cell_at_world(position);
        let coord = self.cells[id].coord();
        let on_edge = coord.x == 0 || coord.y == 0 || coord.x + 1 == self.width || coord.y + 1 == self.height;
        if !on_edge {
            return Some(id);
        }
        let bounds = self.cell_bounds(id)?;
        // Compared against the bounds rather than a distance, which could overflow.
        let inside = position.x >= bounds.min.x
            && position.x <= bounds.max.x
            && position.y >= bounds.min.y
            && position.y <= bounds.max.y;
        inside.then_some(id)
    }

    pub fn cell_bounds(&self, id: CellId) -> Option<CellBounds> {
        self.cells.get(id).map(|cell| {
            let half = FixedVec2::splat(self.cell_radius);
            CellBounds {
                min: cell.world_position() - half,
                max: cell.world_position() + half,
            }
        })
    }

    /// The neighbour a cell's flow direction points at, or the cell itself.
    pub fn next_cell(&self, id: CellId) -> CellId {
        self.cells
            .get(id)
            .and_then(|cell| cell.direction().and_then(|d| cell.neighbor(d)))
            .unwrap_or(id)
    }

    /// Random cell away from the lattice edge. Thin lattices fall back to the full range.
    pub fn random_interior_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> CellId {
        let x = if self.width >= 3 { rng.random_range(1..self.width - 1) } else { rng.random_range(0..self.width) };
        let y = if self.height >= 3 { rng.random_range(1..self.height - 1) } else { rng.random_range(0..self.height) };
        y * self.width + x
    }

    pub fn set_occupant(&mut self, id: CellId, occupant: Option<Entity>) {
        match self.cells.get_mut(id) {
            Some(cell) => cell.set_occupant(occupant),
            None => warn!("set_occupant: cell {} out of range ({} cells)", id, self.cells.len()),
        }
    }
}
