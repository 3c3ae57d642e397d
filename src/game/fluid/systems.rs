use std::time::{Duration, Instant};

use bevy::prelude::*;
use driftgrid_macros::profile;

use crate::game::config::InitialConfig;
use crate::game::fixed_math::FixedVec2;
use crate::game::lattice::MapLattice;
use crate::game::SimTick;
use crate::profile_log;
use super::perturb::{perturb, PointerStrength};
use super::solver::FluidSolver;
#[cfg(feature = "perf_stats")]
use super::solver::mean_divergence;

/// Solver steps slower than this are reported with `warn!`.
const SLOW_STEP: Duration = Duration::from_millis(16);

/// Solver parameters, fixed for the session.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct FluidSettings {
    pub solver: FluidSolver,
    pub time_step: f32,
    pub diffusion: f32,
    pub viscosity: f32,
    pub pointer: PointerStrength,
}

impl Default for FluidSettings {
    fn default() -> Self {
        Self::from_initial(&InitialConfig::default())
    }
}

impl FluidSettings {
    pub fn from_initial(config: &InitialConfig) -> Self {
        Self {
            solver: FluidSolver::new(config.diffuse_iterations, config.pressure_iterations),
            time_step: config.fluid_time_step(),
            diffusion: config.fluid_diffusion(),
            viscosity: config.fluid_viscosity(),
            pointer: PointerStrength {
                density: config.pointer_density,
                velocity_scale: config.pointer_velocity_scale,
                neighbor_falloff: config.pointer_neighbor_falloff,
            },
        }
    }
}

/// Whether the fluid solver runs each tick.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FluidToggle {
    pub active: bool,
}

impl Default for FluidToggle {
    fn default() -> Self {
        Self { active: true }
    }
}

/// Pointer drag over the lattice: world position and displacement since the last frame.
#[derive(Event, Message, Debug, Clone, Copy, PartialEq)]
pub struct PointerDrag {
    pub position: FixedVec2,
    pub delta: Vec2,
}

pub fn init_fluid_settings(mut commands: Commands, initial_config: Option<Res<InitialConfig>>) {
    let settings = initial_config
        .as_deref()
        .map(FluidSettings::from_initial)
        .unwrap_or_default();
    info!(
        "Fluid solver: dt {}, diffusion {}, viscosity {}, {}/{} sweeps",
        settings.time_step,
        settings.diffusion,
        settings.viscosity,
        settings.solver.diffuse_iterations,
        settings.solver.project_iterations
    );
    commands.insert_resource(settings);
}

pub fn apply_pointer_drags(
    mut drags: MessageReader<PointerDrag>,
    lattice: Option<ResMut<MapLattice>>,
    settings: Res<FluidSettings>,
    toggle: Res<FluidToggle>,
) {
    let Some(mut lattice) = lattice else {
        drags.clear();
        return;
    };
    if !toggle.active {
        drags.clear();
        return;
    }
    for drag in drags.read() {
        if let Some(id) = lattice.0.cell_at_pointer(drag.position) {
            perturb(&mut lattice.0, id, drag.delta, &settings.pointer);
        }
    }
}

#[profile]
pub fn step_fluid(
    lattice: Option<ResMut<MapLattice>>,
    settings: Res<FluidSettings>,
    toggle: Res<FluidToggle>,
    tick: Res<SimTick>,
) {
    if !toggle.active {
        return;
    }
    let Some(mut lattice) = lattice else { return };
    let start = Instant::now();
    settings
        .solver
        .step(&mut lattice.0, settings.time_step, settings.diffusion, settings.viscosity);
    let elapsed = start.elapsed();
    if elapsed > SLOW_STEP {
        warn!("[FLUID] Slow solver step: {:?} for {} cells", elapsed, lattice.0.len());
    }
    profile_log!(tick, "[FLUID] mean divergence {:.5}", mean_divergence(&lattice.0));
}
