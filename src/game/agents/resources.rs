use bevy::prelude::*;

use crate::game::config::InitialConfig;
use crate::game::fixed_math::FixedNum;

/// Movement parameters converted once from [`InitialConfig`].
#[derive(Resource, Clone, Copy, Debug)]
pub struct AgentSettings {
    /// Distance covered per tick at full speed.
    pub step: FixedNum,
    /// Speed multiplier when the next cell is occupied by another agent.
    pub occupied_slowdown: FixedNum,
    pub spawn_batch: usize,
    pub max_count: usize,
    pub tick_seconds: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::from_initial(&InitialConfig::default())
    }
}

impl AgentSettings {
    pub fn from_initial(config: &InitialConfig) -> Self {
        let tick_seconds = 1.0 / config.tick_rate.max(1.0) as f32;
        Self {
            step: FixedNum::from_num(config.agent_speed.max(0.0) * tick_seconds),
            occupied_slowdown: FixedNum::from_num(config.occupied_slowdown.clamp(0.0, 1.0)),
            spawn_batch: config.agent_spawn_batch,
            max_count: config.agent_max_count,
            tick_seconds,
        }
    }
}

/// Counts down while an agent stands on the goal, then moves the goal.
#[derive(Resource, Debug, Clone)]
pub struct GoalTimer(pub Timer);

impl Default for GoalTimer {
    fn default() -> Self {
        Self::from_secs(InitialConfig::default().goal_timer_secs)
    }
}

impl GoalTimer {
    pub fn from_secs(secs: f32) -> Self {
        Self(Timer::from_seconds(secs.max(0.0), TimerMode::Repeating))
    }
}

#[derive(Resource)]
pub struct AgentAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Request to spawn agents at random interior cells.
#[derive(Event, Message, Debug, Clone, Copy)]
pub struct SpawnAgents {
    pub count: usize,
}
