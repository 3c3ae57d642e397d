//! Stable-fluids simulation on the shared lattice.
//!
//! - **solver**: the diffuse, project and advect pipeline
//! - **perturb**: additive pointer perturbation
//! - **systems**: settings, toggles and the per-tick step

mod perturb;
mod solver;
mod systems;

#[cfg(test)]
mod tests;

pub use perturb::{perturb, PointerStrength};
pub use solver::{mean_divergence, FluidSolver, DEFAULT_ITERATIONS};
pub use systems::{apply_pointer_drags, init_fluid_settings, step_fluid, FluidSettings, FluidToggle, PointerDrag};

use bevy::prelude::*;
use crate::game::config::load_initial_config;
use crate::game::SimSet;

pub struct FluidPlugin;

impl Plugin for FluidPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<PointerDrag>();
        app.init_resource::<FluidSettings>();
        app.init_resource::<FluidToggle>();
        app.add_systems(Startup, init_fluid_settings.after(load_initial_config));
        app.add_systems(FixedUpdate, (
            apply_pointer_drags,
            step_fluid,
        ).chain().in_set(SimSet::Fluid));
    }
}
