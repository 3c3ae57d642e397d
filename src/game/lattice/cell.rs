use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::fixed_math::FixedVec2;
use super::compass::Compass;

/// Row-major index of a cell inside its [`super::Lattice`].
pub type CellId = usize;

/// Cost of a cell nothing can path through.
pub const IMPASSABLE_COST: u8 = u8::MAX;
/// Cost every cell starts from before terrain classification.
pub const DEFAULT_COST: u8 = 1;
/// Transient cost marking the current goal; never a terrain cost.
pub const GOAL_COST: u8 = 0;
/// Integration value of a cell the goal wavefront never reached.
pub const UNREACHED: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: usize,
    pub y: usize,
}

impl GridCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    pub fn as_ivec2(self) -> IVec2 {
        IVec2::new(self.x as i32, self.y as i32)
    }
}

/// The atomic unit shared by the flow field and the fluid solver.
///
/// Identity and topology are fixed when the lattice is built. Navigation
/// fields are rewritten wholesale on every goal change; fluid fields are
/// mutated in place every tick.
#[derive(Clone, Debug)]
pub struct Cell {
    coord: GridCoord,
    world_position: FixedVec2,
    pub(super) neighbors: [Option<CellId>; 8],
    pub(super) border: bool,

    pub(crate) cost: u8,
    pub(crate) best_cost: u32,
    pub(crate) direction: Option<Compass>,
    occupant: Option<Entity>,

    pub(crate) velocity: Vec2,
    pub(crate) previous_velocity: Vec2,
    pub(crate) density: f32,
    pub(crate) previous_density: f32,
    pub(crate) pressure: f32,
    pub(crate) divergence: f32,
}

impl Cell {
    pub(super) fn new(coord: GridCoord, world_position: FixedVec2) -> Self {
        Self {
            coord,
            world_position,
            neighbors: [None; 8],
            border: true,
            cost: DEFAULT_COST,
            best_cost: UNREACHED,
            direction: None,
            occupant: None,
            velocity: Vec2::ZERO,
            previous_velocity: Vec2::ZERO,
            density: 0.0,
            previous_density: 0.0,
            pressure: 0.0,
            divergence: 0.0,
        }
    }

    pub fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Centre of the cell in world space, fixed at construction.
    pub fn world_position(&self) -> FixedVec2 {
        self.world_position
    }

    pub fn neighbor(&self, direction: Compass) -> Option<CellId> {
        self.neighbors[direction.as_index()]
    }

    /// True when any cardinal neighbour is missing.
    pub fn is_border_cell(&self) -> bool {
        self.border
    }

    pub fn cost(&self) -> u8 {
        self.cost
    }

    pub fn is_impassable(&self) -> bool {
        self.cost == IMPASSABLE_COST
    }

    pub fn best_cost(&self) -> u32 {
        self.best_cost
    }

    pub fn is_reachable(&self) -> bool {
        self.best_cost != UNREACHED
    }

    pub fn direction(&self) -> Option<Compass> {
        self.direction
    }

    /// Normalised flow direction, zero for the goal and for cells without a path.
    pub fn direction_vector(&self) -> Vec2 {
        self.direction.map_or(Vec2::ZERO, Compass::unit_vector)
    }

    pub fn occupant(&self) -> Option<Entity> {
        self.occupant
    }

    pub fn set_occupant(&mut self, occupant: Option<Entity>) {
        self.occupant = occupant;
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn density(&self) -> f32 {
        self.density
    }

    pub fn pressure(&self) -> f32 {
        self.pressure
    }

    pub fn divergence(&self) -> f32 {
        self.divergence
    }

    /// Saturating cost increase. Once a cell is impassable it stays impassable
    /// until the next full cost reset.
    pub fn increase_cost(&mut self, amount: u8) {
        self.cost = self.cost.saturating_add(amount);
    }

    pub(crate) fn reset_navigation(&mut self) {
        self.best_cost = UNREACHED;
        self.direction = None;
        self.occupant = None;
    }
}
