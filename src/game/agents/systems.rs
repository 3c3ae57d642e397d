use bevy::prelude::*;

use crate::game::config::InitialConfig;
use crate::game::fixed_math::FixedNum;
use crate::game::lattice::MapLattice;
use crate::game::navigation::{FlowField, GoalRequest};
use super::components::{Agent, AgentCell, SimPosition};
use super::resources::{AgentAssets, AgentSettings, GoalTimer, SpawnAgents};

pub fn init_agents(
    mut commands: Commands,
    initial_config: Option<Res<InitialConfig>>,
    mut spawn: MessageWriter<SpawnAgents>,
    mut goals: MessageWriter<GoalRequest>,
) {
    let config = initial_config.as_deref().cloned().unwrap_or_default();
    commands.insert_resource(AgentSettings::from_initial(&config));
    commands.insert_resource(GoalTimer::from_secs(config.goal_timer_secs));
    if config.initial_agents > 0 {
        spawn.write(SpawnAgents { count: config.initial_agents });
    }
    goals.write(GoalRequest::Random);
}

pub fn setup_agent_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    lattice: Option<Res<MapLattice>>,
) {
    let radius = lattice.map_or(0.5, |l| l.0.cell_radius().to_num::<f32>());
    commands.insert_resource(AgentAssets {
        mesh: meshes.add(Cuboid::from_length(radius)),
        material: materials.add(Color::srgb(0.9, 0.6, 0.2)),
    });
}

pub fn spawn_agents(
    mut commands: Commands,
    mut requests: MessageReader<SpawnAgents>,
    lattice: Option<Res<MapLattice>>,
    settings: Res<AgentSettings>,
    agents: Query<(), With<Agent>>,
) {
    let Some(lattice) = lattice else {
        requests.clear();
        return;
    };
    let mut existing = agents.iter().count();
    let mut rng = rand::rng();

    for request in requests.read() {
        let count = request.count.min(settings.max_count.saturating_sub(existing));
        for _ in 0..count {
            let id = lattice.0.random_interior_cell(&mut rng);
            let Some(cell) = lattice.0.cell(id) else { continue };
            commands.spawn((Agent, SimPosition(cell.world_position()), AgentCell(None)));
        }
        existing += count;
        if count < request.count {
            debug!("Agent cap {} reached, spawned {} of {}", settings.max_count, count, request.count);
        }
    }
}

/// Moves every agent one tick along its cell's flow direction.
///
/// An agent whose next cell is held by another agent moves at reduced speed.
/// Each agent records itself as the occupant of the cell it ends up in.
pub fn move_agents(
    mut lattice: Option<ResMut<MapLattice>>,
    settings: Res<AgentSettings>,
    flow_field: Option<Res<FlowField>>,
    mut timer: ResMut<GoalTimer>,
    mut goals: MessageWriter<GoalRequest>,
    mut agents: Query<(Entity, &mut SimPosition, &mut AgentCell), With<Agent>>,
) {
    let Some(lattice) = lattice.as_deref_mut() else { return };
    let lattice = &mut lattice.0;
    let goal = flow_field.as_deref().and_then(FlowField::goal);
    let mut at_goal = false;

    for (entity, mut position, mut agent_cell) in agents.iter_mut() {
        let current = lattice.cell_at_world(position.0);
        let next = lattice.next_cell(current);
        let Some(cell) = lattice.cell(current) else { continue };

        if let Some(direction) = cell.direction() {
            let blocked = lattice
                .cell(next)
                .and_then(|c| c.occupant())
                .is_some_and(|occupant| occupant != entity);
            let step = if blocked { settings.step * settings.occupied_slowdown } else { settings.step };
            position.0 += direction.fixed_unit_vector() * step;
        }

        let landed = lattice.cell_at_world(position.0);
        if agent_cell.0 != Some(landed) {
            if let Some(previous) = agent_cell.0 {
                if lattice.cell(previous).and_then(|c| c.occupant()) == Some(entity) {
                    lattice.set_occupant(previous, None);
                }
            }
            agent_cell.0 = Some(landed);
        }
        lattice.set_occupant(landed, Some(entity));

        if Some(landed) == goal {
            at_goal = true;
        }
    }

    if at_goal {
        timer.0.tick(std::time::Duration::from_secs_f32(settings.tick_seconds));
        if timer.0.just_finished() {
            info!("Agents reached the goal, choosing a new one");
            goals.write(GoalRequest::Random);
        }
    }
}

pub fn attach_agent_visuals(
    mut commands: Commands,
    assets: Option<Res<AgentAssets>>,
    agents: Query<(Entity, &SimPosition), Added<Agent>>,
) {
    let Some(assets) = assets else { return };
    for (entity, position) in agents.iter() {
        commands.entity(entity).insert((
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material.clone()),
            Transform::from_translation(position.0.to_ground(0.25)),
        ));
    }
}

pub fn sync_agent_transforms(mut agents: Query<(&SimPosition, &mut Transform), With<Agent>>) {
    for (position, mut transform) in agents.iter_mut() {
        transform.translation = position.0.to_ground(transform.translation.y);
    }
}

/// Keeps agents on the lattice even if a direction points off an edge cell.
pub fn clamp_agents_to_lattice(
    lattice: Option<Res<MapLattice>>,
    mut agents: Query<&mut SimPosition, With<Agent>>,
) {
    let Some(lattice) = lattice else { return };
    let lattice = &lattice.0;
    let (Some(first), Some(last)) = (lattice.cell_bounds(0), lattice.cell_bounds(lattice.len() - 1)) else { return };
    let min = first.min;
    let max = last.max - crate::game::fixed_math::FixedVec2::splat(FixedNum::DELTA);
    for mut position in agents.iter_mut() {
        position.0 = position.0.max(min).min(max);
    }
}
