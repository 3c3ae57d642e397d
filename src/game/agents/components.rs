use bevy::prelude::*;

use crate::game::fixed_math::FixedVec2;
use crate::game::lattice::CellId;

/// A flow-field follower.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Agent;

/// Deterministic world position on the ground plane (x, z mapped to x, y).
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct SimPosition(pub FixedVec2);

/// The cell the agent occupied after its last move.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AgentCell(pub Option<CellId>);
