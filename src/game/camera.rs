use bevy::prelude::*;
use bevy::input::mouse::MouseWheel;

use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::lattice::{init_lattice, MapLattice};

pub struct TopDownCameraPlugin;

impl Plugin for TopDownCameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera.after(init_lattice))
           .add_systems(Update, move_camera);
    }
}

#[derive(Component)]
pub struct TopDownCamera;

/// Places the camera above the lattice centre, high enough to see all of it.
fn spawn_camera(mut commands: Commands, lattice: Option<Res<MapLattice>>) {
    let (center, extent) = match lattice {
        Some(lattice) => {
            let lattice = &lattice.0;
            let diameter: f32 = lattice.cell_diameter().to_num();
            let size = Vec2::new(lattice.width() as f32, lattice.height() as f32) * diameter;
            (lattice.offset().as_vec2() * diameter + size / 2.0, size.max_element())
        }
        None => (Vec2::ZERO, 20.0),
    };

    // Looking almost straight down; a small z offset keeps `looking_at` well defined.
    let translation = Vec3::new(center.x, extent * 1.1, center.y + 0.01);
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(translation).looking_at(Vec3::new(center.x, 0.0, center.y), Vec3::NEG_Z),
        TopDownCamera,
    ));
}

fn move_camera(
    mut query: Query<&mut Transform, With<TopDownCamera>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut scroll_evr: MessageReader<MouseWheel>,
    time: Res<Time>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
) {
    let Ok(mut transform) = query.single_mut() else { return };
    let config = config_handle
        .and_then(|handle| game_configs.get(&handle.0).cloned())
        .unwrap_or_default();

    let mut velocity = Vec3::ZERO;
    if keys.pressed(config.key_camera_forward) {
        velocity.z -= 1.0;
    }
    if keys.pressed(config.key_camera_backward) {
        velocity.z += 1.0;
    }
    if keys.pressed(config.key_camera_left) {
        velocity.x -= 1.0;
    }
    if keys.pressed(config.key_camera_right) {
        velocity.x += 1.0;
    }

    let velocity = velocity.normalize_or_zero();
    transform.translation.x += velocity.x * config.camera_speed * time.delta_secs();
    transform.translation.z += velocity.z * config.camera_speed * time.delta_secs();

    for ev in scroll_evr.read() {
        let forward = transform.forward();
        transform.translation += forward * ev.y * config.camera_zoom_speed * time.delta_secs();
    }
}
