use bevy::prelude::*;

pub mod agents;
mod camera;
mod control;
mod debug;
pub mod config;
pub mod fixed_math;
pub mod fluid;
pub mod lattice;
pub mod navigation;

use agents::AgentPlugin;
use camera::TopDownCameraPlugin;
use config::GameConfigPlugin;
use control::ControlPlugin;
use debug::DebugDrawPlugin;
use fluid::FluidPlugin;
use lattice::{LatticePlugin, MapLattice};
use navigation::NavigationPlugin;

pub use agents::{Agent, AgentCell, GoalTimer, SimPosition};

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Running,
    Paused,
}

/// Fixed-tick ordering: goal changes land before agents read directions,
/// and the fluid steps after both.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
pub enum SimSet {
    Navigation,
    Agents,
    Fluid,
}

/// Number of fixed ticks simulated so far.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimTick(pub u64);

impl SimTick {
    pub fn increment(&mut self) {
        self.0 += 1;
    }
}

pub fn increment_sim_tick(mut tick: ResMut<SimTick>) {
    tick.increment();
}

fn configure_tick_rate(initial_config: Option<Res<config::InitialConfig>>, time: Option<ResMut<Time<Fixed>>>) {
    let (Some(config), Some(mut time)) = (initial_config, time) else { return };
    let rate = if config.tick_rate > 0.0 { config.tick_rate } else { 30.0 };
    time.set_timestep_hz(rate);
    info!("Fixed tick rate {} Hz", rate);
}

/// The full application: simulation plus agents, input, camera and debug
/// drawing. Expects `DefaultPlugins`.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .add_plugins((
                GameConfigPlugin,
                SimulationPlugin,
                AgentPlugin,
                TopDownCameraPlugin,
                ControlPlugin,
                DebugDrawPlugin,
            ))
            .add_systems(Startup, setup_scene.after(lattice::init_lattice));
    }
}

/// The headless part of the game: lattice, navigation, fluid and the tick.
/// Integration tests run this on top of `MinimalPlugins`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimTick>();
        app.configure_sets(FixedUpdate, (
            SimSet::Navigation,
            SimSet::Agents,
            SimSet::Fluid,
        ).chain().run_if(in_state(GameState::Running)));
        app.add_systems(Startup, configure_tick_rate.after(config::load_initial_config));
        app.add_systems(FixedUpdate, increment_sim_tick
            .before(SimSet::Navigation)
            .run_if(in_state(GameState::Running)));
        app.add_plugins((LatticePlugin, NavigationPlugin, FluidPlugin));
    }
}

fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    lattice: Option<Res<MapLattice>>,
) {
    let Some(lattice) = lattice else { return };
    let lattice = &lattice.0;
    let diameter: f32 = lattice.cell_diameter().to_num();
    let size = Vec2::new(lattice.width() as f32 * diameter, lattice.height() as f32 * diameter);
    let origin = lattice.offset().as_vec2() * diameter;
    let center = origin + size / 2.0;
    info!("Scene setup: ground {}x{} centred at {:?}", size.x, size.y, center);

    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size.x, size.y))),
        MeshMaterial3d(materials.add(Color::srgb(0.15, 0.17, 0.2))),
        Transform::from_xyz(center.x, -0.01, center.y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            ..default()
        },
        Transform::from_xyz(center.x, 30.0, center.y).looking_at(Vec3::new(center.x, 0.0, center.y + 10.0), Vec3::Y),
    ));
}
