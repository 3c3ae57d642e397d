use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::game::config::{GameConfig, GameConfigHandle};
use crate::game::fluid::FluidToggle;
use crate::game::lattice::MapLattice;

pub struct DebugDrawPlugin;

impl Plugin for DebugDrawPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DebugDrawSettings>()
           .add_systems(Update, (draw_flow_field, draw_fluid));
    }
}

#[derive(Resource, Debug, Clone, Copy)]
pub struct DebugDrawSettings {
    pub show_flow_field: bool,
}

impl Default for DebugDrawSettings {
    fn default() -> Self {
        Self { show_flow_field: true }
    }
}

/// Four-band ramp: blue, magenta, yellow, green, then dark green as `value`
/// goes from 0 to 1. Values outside the range are clamped.
pub fn density_color(value: f32) -> Color {
    let value = value.clamp(0.0, 1.0);
    let (r, g, b) = if value < 0.25 {
        (4.0 * value, 0.0, 1.0)
    } else if value < 0.5 {
        (1.0, 4.0 * (value - 0.25), 1.0 - 4.0 * (value - 0.25))
    } else if value < 0.75 {
        (1.0 - 4.0 * (value - 0.5), 1.0, 0.0)
    } else {
        (0.0, 1.0 - 4.0 * (value - 0.75), 0.0)
    };
    Color::srgb(r, g, b)
}

fn runtime_config(handle: Option<Res<GameConfigHandle>>, configs: &Assets<GameConfig>) -> GameConfig {
    handle
        .and_then(|handle| configs.get(&handle.0).cloned())
        .unwrap_or_default()
}

fn draw_flow_field(
    lattice: Option<Res<MapLattice>>,
    settings: Res<DebugDrawSettings>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    mut gizmos: Gizmos,
) {
    if !settings.show_flow_field {
        return;
    }
    let Some(lattice) = lattice else { return };
    let config = runtime_config(config_handle, &game_configs);
    let half_length = lattice.0.cell_radius().to_num::<f32>() * config.debug_arrow_length;

    for cell in lattice.0.cells() {
        let center = cell.world_position().to_ground(0.05);
        if cell.is_impassable() {
            gizmos.cross(
                Isometry3d::new(center, Quat::from_rotation_x(-FRAC_PI_2)),
                half_length,
                Color::srgb(0.8, 0.1, 0.1),
            );
            continue;
        }
        let direction = cell.direction_vector();
        if direction == Vec2::ZERO {
            continue;
        }
        let offset = Vec3::new(direction.x, 0.0, direction.y) * half_length;
        gizmos.arrow(center - offset, center + offset, Color::WHITE);
    }
}

fn draw_fluid(
    lattice: Option<Res<MapLattice>>,
    toggle: Res<FluidToggle>,
    config_handle: Option<Res<GameConfigHandle>>,
    game_configs: Res<Assets<GameConfig>>,
    mut gizmos: Gizmos,
) {
    if !toggle.active {
        return;
    }
    let Some(lattice) = lattice else { return };
    let config = runtime_config(config_handle, &game_configs);
    let size = Vec2::splat(lattice.0.cell_diameter().to_num::<f32>() * 0.9);
    let flat = Quat::from_rotation_x(-FRAC_PI_2);

    for cell in lattice.0.cells() {
        if cell.is_border_cell() && !config.debug_show_border_cells {
            continue;
        }
        let value = cell.density() * config.debug_density_scale;
        if value <= f32::EPSILON && !cell.is_border_cell() {
            continue;
        }
        let center = cell.world_position().to_ground(0.02);
        gizmos.rect(Isometry3d::new(center, flat), size, density_color(value));
    }
}
