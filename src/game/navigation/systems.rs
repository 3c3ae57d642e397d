use bevy::prelude::*;
use driftgrid_macros::profile;

use crate::game::config::InitialConfig;
use crate::game::fixed_math::FixedVec2;
use crate::game::lattice::{CellId, MapLattice};
use super::flow_field::FlowField;
use super::terrain::{OpenTerrain, TerrainMap};

/// Request to move the shared goal.
#[derive(Event, Message, Debug, Clone, Copy, PartialEq)]
pub enum GoalRequest {
    /// Snap a world position to the nearest cell.
    AtPosition(FixedVec2),
    AtCell(CellId),
    /// Any random interior cell.
    Random,
}

pub fn init_navigation(mut commands: Commands, initial_config: Option<Res<InitialConfig>>) {
    let config = initial_config.as_deref().cloned().unwrap_or_default();
    let patches = config.terrain.iter().map(|p| p.to_patch()).collect::<Vec<_>>();
    info!("Terrain: {} patches, rough increment {}", patches.len(), config.rough_cost_increment);
    commands.insert_resource(TerrainMap::new(patches));
    commands.insert_resource(FlowField::new(config.rough_cost_increment));
}

/// Applies the most recent goal request of this tick.
#[profile]
pub fn process_goal_requests(
    mut requests: MessageReader<GoalRequest>,
    lattice: Option<ResMut<MapLattice>>,
    flow_field: Option<ResMut<FlowField>>,
    terrain: Option<Res<TerrainMap>>,
) {
    let Some(request) = requests.read().last().copied() else { return };
    let (Some(mut lattice), Some(mut flow_field)) = (lattice, flow_field) else {
        warn!("Goal request {:?} before the lattice exists", request);
        return;
    };
    let lattice = &mut lattice.0;

    let goal = match request {
        GoalRequest::AtPosition(position) => lattice.cell_at_world(position),
        GoalRequest::AtCell(id) => id,
        GoalRequest::Random => lattice.random_interior_cell(&mut rand::rng()),
    };

    match terrain.as_deref() {
        Some(terrain) => flow_field.regenerate(lattice, goal, terrain),
        None => flow_field.regenerate(lattice, goal, &OpenTerrain),
    };
}
