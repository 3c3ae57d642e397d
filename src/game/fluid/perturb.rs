use bevy::prelude::*;

use crate::game::lattice::{CellId, Lattice};

/// How strongly a pointer drag stirs the fluid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerStrength {
    /// Density added to the cell under the pointer.
    pub density: f32,
    /// Multiplier from pointer displacement (world units) to added velocity.
    pub velocity_scale: f32,
    /// Fraction of the perturbation each linked neighbour receives.
    pub neighbor_falloff: f32,
}

impl Default for PointerStrength {
    fn default() -> Self {
        Self {
            density: 100.0,
            velocity_scale: 5.0,
            neighbor_falloff: 0.5,
        }
    }
}

/// Adds density and velocity at `id` and a scaled share to its neighbours.
///
/// Purely additive. Negative strengths are treated as zero so density never
/// goes below zero. Returns `false` if `id` is not a cell of `lattice`.
pub fn perturb(lattice: &mut Lattice, id: CellId, delta: Vec2, strength: &PointerStrength) -> bool {
    if lattice.cell(id).is_none() {
        return false;
    }
    let density = strength.density.max(0.0);
    let velocity = delta * strength.velocity_scale;
    let falloff = strength.neighbor_falloff.max(0.0);

    let neighbors: smallvec::SmallVec<[CellId; 8]> = lattice.neighbors(id).map(|(_, n)| n).collect();
    let cells = lattice.cells_mut();

    cells[id].density += density;
    cells[id].velocity += velocity;
    for neighbor in neighbors {
        cells[neighbor].density += density * falloff;
        cells[neighbor].velocity += velocity * falloff;
    }
    true
}
