use bevy::prelude::*;

use crate::game::lattice::{
    BoundaryPolicy, Cell, CellField, CellId, Compass, Density, Divergence, Lattice, Pressure, PreviousDensity,
    PreviousVelocity, Velocity,
};

/// Gauss-Seidel sweeps per stage unless configured otherwise.
pub const DEFAULT_ITERATIONS: usize = 20;

/// Stable-fluids solver over the lattice.
///
/// Every call to [`FluidSolver::step`] runs, in order:
///
/// 1. **Diffuse** velocity (by viscosity) and density (by diffusion)
/// 2. **Project** velocity onto a near divergence-free field
/// 3. **Advect** velocity and density backwards along the projected velocity
/// 4. Re-derive border cells from the boundary policy
///
/// All relaxation loops run a fixed number of sweeps and update cells in
/// place, so a sweep reads neighbours that were already updated earlier in
/// the same sweep. A lattice without interior cells (either side below 3)
/// is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FluidSolver {
    pub diffuse_iterations: usize,
    pub project_iterations: usize,
}

impl Default for FluidSolver {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS, DEFAULT_ITERATIONS)
    }
}

impl FluidSolver {
    pub fn new(diffuse_iterations: usize, project_iterations: usize) -> Self {
        Self { diffuse_iterations, project_iterations }
    }

    pub fn step(&self, lattice: &mut Lattice, dt: f32, diffusion: f32, viscosity: f32) {
        let Some(grid) = Interior::of(lattice) else { return };
        let (cells, boundary) = lattice.cells_and_boundary();

        swap_buffers::<Velocity, PreviousVelocity>(cells);
        self.diffuse::<Velocity, PreviousVelocity>(cells, boundary, &grid, dt, viscosity);
        swap_buffers::<Density, PreviousDensity>(cells);
        self.diffuse::<Density, PreviousDensity>(cells, boundary, &grid, dt, diffusion);

        self.project(cells, boundary, &grid);

        swap_buffers::<Velocity, PreviousVelocity>(cells);
        swap_buffers::<Density, PreviousDensity>(cells);
        advect::<Density, PreviousDensity>(cells, &grid, dt);
        advect::<Velocity, PreviousVelocity>(cells, &grid, dt);

        boundary.apply::<Velocity>(cells);
        boundary.apply::<Density>(cells);
    }

    /// Runs only the projection stage.
    pub fn project_velocity(&self, lattice: &mut Lattice) {
        let Some(grid) = Interior::of(lattice) else { return };
        let (cells, boundary) = lattice.cells_and_boundary();
        self.project(cells, boundary, &grid);
    }

    /// Implicit diffusion: solves `x = (x0 + a * sum(cardinal x)) / (1 + 4a)`
    /// with `a = dt * rate * (width - 2) * (height - 2)`, starting from `x0`.
    fn diffuse<F, P>(&self, cells: &mut [Cell], boundary: &BoundaryPolicy, grid: &Interior, dt: f32, rate: f32)
    where
        F: CellField,
        P: CellField<Value = F::Value>,
    {
        let a = dt * rate * grid.interior_area();
        let inv = 1.0 / (1.0 + 4.0 * a);

        for cell in cells.iter_mut() {
            F::set(cell, P::get(cell));
        }
        for _ in 0..self.diffuse_iterations {
            for id in 0..cells.len() {
                let Some([n, e, s, w]) = cardinals(&cells[id]) else { continue };
                let sum = F::get(&cells[n]) + F::get(&cells[e]) + F::get(&cells[s]) + F::get(&cells[w]);
                let value = (P::get(&cells[id]) + sum * a) * inv;
                F::set(&mut cells[id], value);
            }
            boundary.apply::<F>(cells);
        }
    }

    /// Removes the gradient of a pressure field solved from the velocity divergence.
    fn project(&self, cells: &mut [Cell], boundary: &BoundaryPolicy, grid: &Interior) {
        let h = grid.diameter;

        for id in 0..cells.len() {
            cells[id].pressure = 0.0;
            let Some([n, e, s, w]) = cardinals(&cells[id]) else { continue };
            let dx = cells[e].velocity.x - cells[w].velocity.x;
            let dy = cells[n].velocity.y - cells[s].velocity.y;
            cells[id].divergence = -0.5 * h * (dx + dy);
        }
        boundary.apply::<Divergence>(cells);
        boundary.apply::<Pressure>(cells);

        for _ in 0..self.project_iterations {
            for id in 0..cells.len() {
                let Some([n, e, s, w]) = cardinals(&cells[id]) else { continue };
                let sum = cells[n].pressure + cells[e].pressure + cells[s].pressure + cells[w].pressure;
                cells[id].pressure = (cells[id].divergence + sum) / 4.0;
            }
            boundary.apply::<Pressure>(cells);
        }

        let scale = 0.5 / h;
        for id in 0..cells.len() {
            let Some([n, e, s, w]) = cardinals(&cells[id]) else { continue };
            let gradient = Vec2::new(
                cells[e].pressure - cells[w].pressure,
                cells[n].pressure - cells[s].pressure,
            );
            cells[id].velocity -= gradient * scale;
        }
        boundary.apply::<Velocity>(cells);
    }
}

/// Semi-Lagrangian advection of `F` from the buffer `P`, traced along the
/// previous velocity and sampled bilinearly.
fn advect<F, P>(cells: &mut [Cell], grid: &Interior, dt: f32)
where
    F: CellField,
    P: CellField<Value = F::Value>,
{
    // Half-cell margin keeps both bilinear taps on the lattice.
    let max_x = grid.width as f32 - 1.5;
    let max_y = grid.height as f32 - 1.5;

    for id in 0..cells.len() {
        if cells[id].is_border_cell() {
            continue;
        }
        let coord = cells[id].coord();
        let flow = cells[id].previous_velocity;
        let x = (coord.x as f32 - dt * flow.x / grid.diameter).max(0.5).min(max_x);
        let y = (coord.y as f32 - dt * flow.y / grid.diameter).max(0.5).min(max_y);

        let x0 = x.floor() as usize;
        let y0 = y.floor() as usize;
        let s1 = x - x0 as f32;
        let s0 = 1.0 - s1;
        let t1 = y - y0 as f32;
        let t0 = 1.0 - t1;

        let sample = |sx: usize, sy: usize| P::get(&cells[sy * grid.width + sx]);
        let value = (sample(x0, y0) * t0 + sample(x0, y0 + 1) * t1) * s0
            + (sample(x0 + 1, y0) * t0 + sample(x0 + 1, y0 + 1) * t1) * s1;
        F::set(&mut cells[id], value);
    }
}

fn swap_buffers<F, P>(cells: &mut [Cell])
where
    F: CellField,
    P: CellField<Value = F::Value>,
{
    for cell in cells.iter_mut() {
        let current = F::get(cell);
        F::set(cell, P::get(cell));
        P::set(cell, current);
    }
}

/// North, east, south and west neighbours of an interior cell; `None` on the border.
fn cardinals(cell: &Cell) -> Option<[CellId; 4]> {
    if cell.is_border_cell() {
        return None;
    }
    Some([
        cell.neighbor(Compass::North)?,
        cell.neighbor(Compass::East)?,
        cell.neighbor(Compass::South)?,
        cell.neighbor(Compass::West)?,
    ])
}

/// Lattice dimensions as seen by the solver stages.
#[derive(Clone, Copy, Debug)]
struct Interior {
    width: usize,
    height: usize,
    diameter: f32,
}

impl Interior {
    /// `None` when the lattice has no interior cell.
    fn of(lattice: &Lattice) -> Option<Self> {
        if lattice.width() < 3 || lattice.height() < 3 {
            return None;
        }
        Some(Self {
            width: lattice.width(),
            height: lattice.height(),
            diameter: lattice.cell_diameter().to_num::<f32>(),
        })
    }

    fn interior_area(&self) -> f32 {
        ((self.width - 2) * (self.height - 2)) as f32
    }
}

/// Mean absolute velocity divergence over interior cells, in world units.
pub fn mean_divergence(lattice: &Lattice) -> f32 {
    let Some(grid) = Interior::of(lattice) else { return 0.0 };
    let cells = lattice.cells();
    let mut total = 0.0;
    let mut count = 0usize;
    for cell in cells {
        let Some([n, e, s, w]) = cardinals(cell) else { continue };
        let dx = cells[e].velocity.x - cells[w].velocity.x;
        let dy = cells[n].velocity.y - cells[s].velocity.y;
        total += ((dx + dy) / (2.0 * grid.diameter)).abs();
        count += 1;
    }
    if count == 0 { 0.0 } else { total / count as f32 }
}
