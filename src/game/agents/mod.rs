//! Agents that follow the shared flow field.
//!
//! Agents are consumers of the lattice: they read directions, mark the cell
//! they stand on as occupied and slow down behind each other. They never
//! touch solver state otherwise.

mod components;
mod resources;
mod systems;

pub use components::{Agent, AgentCell, SimPosition};
pub use resources::{AgentAssets, AgentSettings, GoalTimer, SpawnAgents};
pub use systems::{clamp_agents_to_lattice, move_agents, spawn_agents};

use bevy::prelude::*;
use crate::game::config::load_initial_config;
use crate::game::lattice::init_lattice;
use crate::game::{GameState, SimSet};

pub struct AgentPlugin;

impl Plugin for AgentPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SpawnAgents>()
           .init_resource::<AgentSettings>()
           .init_resource::<GoalTimer>()
           .add_systems(Startup, (
               systems::init_agents.after(load_initial_config),
               systems::setup_agent_assets.after(init_lattice),
           ))
           .add_systems(FixedUpdate, (
               spawn_agents,
               move_agents,
               clamp_agents_to_lattice,
           ).chain().in_set(SimSet::Agents))
           .add_systems(Update, (
               systems::attach_agent_visuals,
               systems::sync_agent_transforms,
           ).run_if(in_state(GameState::Running)));
    }
}
