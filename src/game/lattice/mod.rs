//! The fixed cell lattice shared by navigation and fluid simulation.
//!
//! - **cell**: per-cell identity, topology and field storage
//! - **compass**: the eight lattice directions and their scan order
//! - **grid**: [`Lattice`] construction, lookup and world-space snapping
//! - **field**: typed accessors for the fluid fields
//! - **boundary**: the wall/corner rules applied to border cells

mod boundary;
mod cell;
mod compass;
mod field;
mod grid;

#[cfg(test)]
mod tests;

pub use boundary::{BoundaryPolicy, BoundaryRule};
pub use cell::{Cell, CellId, GridCoord, DEFAULT_COST, GOAL_COST, IMPASSABLE_COST, UNREACHED};
pub use compass::Compass;
pub use field::{CellField, Density, Divergence, FieldValue, Pressure, PreviousDensity, PreviousVelocity, Velocity, WallMode};
pub use grid::{CellBounds, Connectivity, Lattice, MIN_CELL_RADIUS};

use bevy::prelude::*;
use crate::game::config::{load_initial_config, InitialConfig};

/// The session's lattice. Built once at startup and never resized.
#[derive(Resource)]
pub struct MapLattice(pub Lattice);

pub struct LatticePlugin;

impl Plugin for LatticePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_lattice.after(load_initial_config));
    }
}

pub fn init_lattice(
    mut commands: Commands,
    initial_config: Option<Res<InitialConfig>>,
    existing: Option<Res<MapLattice>>,
) {
    if existing.is_some() {
        return;
    }
    let config = initial_config.as_deref().cloned().unwrap_or_default();
    let lattice = Lattice::build(
        config.lattice_size(),
        config.lattice_offset(),
        config.lattice_cell_radius(),
        config.connectivity,
    );
    commands.insert_resource(MapLattice(lattice));
}
