use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::game::agents::{AgentSettings, SpawnAgents};
use crate::game::camera::TopDownCamera;
use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::debug::DebugDrawSettings;
use crate::game::fixed_math::FixedVec2;
use crate::game::fluid::{FluidToggle, PointerDrag};
use crate::game::lattice::MapLattice;
use crate::game::navigation::GoalRequest;
use crate::game::GameState;

pub struct ControlPlugin;

impl Plugin for ControlPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PointerState>()
           .add_systems(Update, (
               handle_pointer.run_if(in_state(GameState::Running)),
               handle_keys,
           ));
    }
}

/// Cell centre under the pointer on the previous frame while the button is held.
#[derive(Resource, Default)]
pub struct PointerState {
    pub previous: Option<Vec2>,
}

/// While the left button is held, the cell under the cursor becomes the goal
/// and the fluid is stirred by the cursor's movement.
fn handle_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<TopDownCamera>>,
    lattice: Option<Res<MapLattice>>,
    mut pointer: ResMut<PointerState>,
    mut goals: MessageWriter<GoalRequest>,
    mut drags: MessageWriter<PointerDrag>,
) {
    if !mouse.pressed(MouseButton::Left) {
        pointer.previous = None;
        return;
    }
    let Some(lattice) = lattice else { return };
    let Ok(window) = q_window.single() else { return };
    let Ok((camera, camera_transform)) = q_camera.single() else { return };
    let Some(cursor_position) = window.cursor_position() else { return };
    let Ok(ray) = camera.viewport_to_world(camera_transform, cursor_position) else { return };

    // Intersect with ground plane (y=0)
    if ray.direction.y.abs() <= 0.0001 {
        return;
    }
    let t = -ray.origin.y / ray.direction.y;
    if t < 0.0 {
        return;
    }
    let hit = ray.origin + ray.direction * t;
    let position = FixedVec2::from_f32(hit.x, hit.z);

    let Some(id) = lattice.0.cell_at_pointer(position) else { return };
    let Some(cell) = lattice.0.cell(id) else { return };
    let cell_position = cell.world_position();
    let center = cell_position.to_vec2();

    goals.write(GoalRequest::AtCell(id));
    let previous = pointer.previous.unwrap_or(center);
    drags.write(PointerDrag {
        position: cell_position,
        delta: center - previous,
    });
    pointer.previous = Some(center);
}

fn handle_keys(
    keys: Res<ButtonInput<KeyCode>>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    state: Res<State<GameState>>,
    mut next_state: ResMut<NextState<GameState>>,
    mut fluid: ResMut<FluidToggle>,
    mut debug_draw: ResMut<DebugDrawSettings>,
    agent_settings: Res<AgentSettings>,
    mut spawn: MessageWriter<SpawnAgents>,
    mut goals: MessageWriter<GoalRequest>,
) {
    let config = config_handle
        .and_then(|handle| game_configs.get(&handle.0).cloned())
        .unwrap_or_default();

    if keys.just_pressed(config.key_pause) {
        let next = match state.get() {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
        };
        info!("Simulation {:?}", next);
        next_state.set(next);
    }
    if keys.just_pressed(config.key_toggle_fluid) {
        fluid.active = !fluid.active;
        info!("Fluid simulation {}", if fluid.active { "on" } else { "off" });
    }
    if keys.just_pressed(config.key_toggle_flow_field) {
        debug_draw.show_flow_field = !debug_draw.show_flow_field;
    }
    if keys.pressed(config.key_spawn_agents) {
        spawn.write(SpawnAgents { count: agent_settings.spawn_batch });
    }
    if keys.just_pressed(config.key_random_goal) {
        goals.write(GoalRequest::Random);
    }
}
