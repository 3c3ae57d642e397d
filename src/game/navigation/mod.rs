//! Flow-field navigation over the shared lattice.
//!
//! - **terrain**: terrain classes and the query interface the cost field consumes
//! - **cost_field**: saturating per-cell terrain cost
//! - **integration_field**: goal-distance wavefront
//! - **direction_field**: per-cell compass direction toward the goal
//! - **flow_field**: the three stages as one regenerate-on-goal-change pipeline
//! - **systems**: goal requests and startup wiring

pub mod cost_field;
pub mod direction_field;
pub mod integration_field;
mod flow_field;
mod systems;
mod terrain;


pub use cost_field::{CostSummary, DEFAULT_ROUGH_INCREMENT};
pub use flow_field::{FlowField, FlowFieldStats};
pub use integration_field::IntegrationSummary;
pub use systems::{init_navigation, process_goal_requests, GoalRequest};
pub use terrain::{OpenTerrain, TerrainClass, TerrainHits, TerrainMap, TerrainPatch, TerrainQuery};

use bevy::prelude::*;
use crate::game::config::load_initial_config;
use crate::game::SimSet;

pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<GoalRequest>();
        app.add_systems(Startup, init_navigation.after(load_initial_config));
        app.add_systems(FixedUpdate, process_goal_requests.in_set(SimSet::Navigation));
    }
}
