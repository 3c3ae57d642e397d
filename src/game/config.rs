use bevy::prelude::*;
use bevy_common_assets::ron::RonAssetPlugin;
use serde::{Deserialize, Serialize};

use crate::game::fixed_math::{FixedNum, FixedVec2};
use crate::game::lattice::{Connectivity, MIN_CELL_RADIUS};
use crate::game::navigation::{TerrainClass, TerrainPatch};

pub const INITIAL_CONFIG_PATH: &str = "assets/initial_config.ron";

/// Smallest accepted fluid time step, diffusion and viscosity.
pub const MIN_FLUID_PARAMETER: f32 = 0.001;

/// Static configuration loaded once at startup. The lattice is built from
/// these values and is never resized, so changing them requires a restart.
#[derive(Resource, Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct InitialConfig {
    pub tick_rate: f64,

    // Lattice
    pub grid_width: u32,
    pub grid_height: u32,
    pub grid_offset_x: i32,
    pub grid_offset_y: i32,
    pub cell_radius: f32,
    pub connectivity: Connectivity,

    // Cost field
    pub rough_cost_increment: u8,
    pub terrain: Vec<TerrainPatchConfig>,

    // Fluid solver
    pub fluid_time_step: f32,
    pub fluid_diffusion: f32,
    pub fluid_viscosity: f32,
    pub diffuse_iterations: usize,
    pub pressure_iterations: usize,

    // Pointer perturbation
    pub pointer_density: f32,
    pub pointer_velocity_scale: f32,
    pub pointer_neighbor_falloff: f32,

    // Agents
    pub agent_speed: f32,
    pub initial_agents: usize,
    pub agent_spawn_batch: usize,
    pub agent_max_count: usize,
    pub occupied_slowdown: f32,
    pub goal_timer_secs: f32,
}

/// One rectangle of classified terrain, in world units.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct TerrainPatchConfig {
    pub class: TerrainClass,
    pub center: (f32, f32),
    pub half_extents: (f32, f32),
}

impl TerrainPatchConfig {
    pub fn to_patch(&self) -> TerrainPatch {
        TerrainPatch::new(
            self.class,
            FixedVec2::from_f32(self.center.0, self.center.1),
            FixedVec2::from_f32(self.half_extents.0.abs(), self.half_extents.1.abs()),
        )
    }
}

impl InitialConfig {
    pub fn lattice_size(&self) -> UVec2 {
        UVec2::new(self.grid_width.max(1), self.grid_height.max(1))
    }

    pub fn lattice_offset(&self) -> IVec2 {
        IVec2::new(self.grid_offset_x, self.grid_offset_y)
    }

    pub fn lattice_cell_radius(&self) -> FixedNum {
        FixedNum::from_num(self.cell_radius.max(MIN_CELL_RADIUS))
    }

    pub fn fluid_time_step(&self) -> f32 {
        self.fluid_time_step.max(MIN_FLUID_PARAMETER)
    }

    pub fn fluid_diffusion(&self) -> f32 {
        self.fluid_diffusion.max(MIN_FLUID_PARAMETER)
    }

    pub fn fluid_viscosity(&self) -> f32 {
        self.fluid_viscosity.max(MIN_FLUID_PARAMETER)
    }
}

/// Runtime configuration that can be hot-reloaded while the simulation runs.
/// Nothing here feeds the solvers; it only drives input, camera and debug drawing.
#[derive(Deserialize, Serialize, Asset, TypePath, Clone, Debug)]
pub struct GameConfig {
    // Controls
    pub key_camera_forward: KeyCode,
    pub key_camera_backward: KeyCode,
    pub key_camera_left: KeyCode,
    pub key_camera_right: KeyCode,
    pub key_toggle_flow_field: KeyCode,
    pub key_toggle_fluid: KeyCode,
    pub key_spawn_agents: KeyCode,
    pub key_random_goal: KeyCode,
    pub key_pause: KeyCode,

    // Camera
    pub camera_speed: f32,
    pub camera_zoom_speed: f32,

    // Debug visualization
    pub debug_arrow_length: f32,
    pub debug_density_scale: f32,
    pub debug_show_border_cells: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            key_camera_forward: KeyCode::KeyW,
            key_camera_backward: KeyCode::KeyS,
            key_camera_left: KeyCode::KeyA,
            key_camera_right: KeyCode::KeyD,
            key_toggle_flow_field: KeyCode::KeyF,
            key_toggle_fluid: KeyCode::KeyL,
            key_spawn_agents: KeyCode::KeyP,
            key_random_goal: KeyCode::KeyG,
            key_pause: KeyCode::Space,
            camera_speed: 20.0,
            camera_zoom_speed: 50.0,
            debug_arrow_length: 0.8,
            debug_density_scale: 0.01,
            debug_show_border_cells: false,
        }
    }
}

#[derive(Resource)]
pub struct GameConfigHandle(pub Handle<GameConfig>);

pub struct GameConfigPlugin;

impl Plugin for GameConfigPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<GameConfig>::new(&["game_config.ron"]))
           .add_systems(Startup, (load_initial_config, setup_runtime_config).chain());
    }
}

/// Load static initial configuration synchronously at startup.
/// The lattice is built from it, so it must complete before `init_lattice`.
pub fn load_initial_config(mut commands: Commands) {
    commands.insert_resource(read_initial_config(INITIAL_CONFIG_PATH));
}

/// Reads and parses an [`InitialConfig`], falling back to defaults on any failure.
pub fn read_initial_config(path: &str) -> InitialConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match ron::from_str::<InitialConfig>(&contents) {
            Ok(config) => {
                info!("Loaded initial config from {}", path);
                config
            }
            Err(e) => {
                error!("Failed to parse initial config: {}", e);
                error!("Using default InitialConfig");
                InitialConfig::default()
            }
        },
        Err(e) => {
            error!("Failed to read {}: {}", path, e);
            error!("Using default InitialConfig");
            InitialConfig::default()
        }
    }
}

/// Load runtime configuration asynchronously (can be hot-reloaded).
fn setup_runtime_config(mut commands: Commands, asset_server: Res<AssetServer>) {
    let handle = asset_server.load("game_config.ron");
    commands.insert_resource(GameConfigHandle(handle));
}

impl Default for InitialConfig {
    fn default() -> Self {
        Self {
            tick_rate: 30.0,
            grid_width: 64,
            grid_height: 40,
            grid_offset_x: 0,
            grid_offset_y: 0,
            cell_radius: 0.5,
            connectivity: Connectivity::Eight,
            rough_cost_increment: 3,
            terrain: Vec::new(),
            fluid_time_step: 0.1,
            fluid_diffusion: 0.001,
            fluid_viscosity: 0.001,
            diffuse_iterations: 20,
            pressure_iterations: 20,
            pointer_density: 100.0,
            pointer_velocity_scale: 5.0,
            pointer_neighbor_falloff: 0.5,
            agent_speed: 4.0,
            initial_agents: 50,
            agent_spawn_batch: 10,
            agent_max_count: 500,
            occupied_slowdown: 0.5,
            goal_timer_secs: 3.0,
        }
    }
}
