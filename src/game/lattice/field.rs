//! Typed access to the per-cell fluid fields.
//!
//! The solver stages and the boundary policy are written once against
//! [`CellField`] and run over velocity, density, pressure and divergence
//! alike.

use std::ops::{Add, Mul, Neg, Sub};

use bevy::prelude::*;

use super::cell::Cell;

/// Value stored in a fluid field: `f32` for scalars, `Vec2` for velocity.
pub trait FieldValue:
    Copy + Default + Add<Output = Self> + Sub<Output = Self> + Neg<Output = Self> + Mul<f32, Output = Self>
{
}

impl FieldValue for f32 {}
impl FieldValue for Vec2 {}

/// How a border cell is derived from the interior cell opposite its missing neighbour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallMode {
    /// Reflective no-slip wall: the border value is the negated interior value.
    Negate,
    /// Zero-gradient wall: the border value copies the interior value.
    Mirror,
}

pub trait CellField {
    type Value: FieldValue;
    const WALL: WallMode;

    fn get(cell: &Cell) -> Self::Value;
    fn set(cell: &mut Cell, value: Self::Value);
}

pub struct Velocity;
pub struct PreviousVelocity;
pub struct Density;
pub struct PreviousDensity;
pub struct Pressure;
pub struct Divergence;

impl CellField for Velocity {
    type Value = Vec2;
    const WALL: WallMode = WallMode::Negate;
    fn get(cell: &Cell) -> Vec2 { cell.velocity }
    fn set(cell: &mut Cell, value: Vec2) { cell.velocity = value; }
}

impl CellField for PreviousVelocity {
    type Value = Vec2;
    const WALL: WallMode = WallMode::Negate;
    fn get(cell: &Cell) -> Vec2 { cell.previous_velocity }
    fn set(cell: &mut Cell, value: Vec2) { cell.previous_velocity = value; }
}

// Density must stay non-negative, so its walls copy instead of negating.
impl CellField for Density {
    type Value = f32;
    const WALL: WallMode = WallMode::Mirror;
    fn get(cell: &Cell) -> f32 { cell.density }
    fn set(cell: &mut Cell, value: f32) { cell.density = value; }
}

impl CellField for PreviousDensity {
    type Value = f32;
    const WALL: WallMode = WallMode::Mirror;
    fn get(cell: &Cell) -> f32 { cell.previous_density }
    fn set(cell: &mut Cell, value: f32) { cell.previous_density = value; }
}

impl CellField for Pressure {
    type Value = f32;
    const WALL: WallMode = WallMode::Negate;
    fn get(cell: &Cell) -> f32 { cell.pressure }
    fn set(cell: &mut Cell, value: f32) { cell.pressure = value; }
}

impl CellField for Divergence {
    type Value = f32;
    const WALL: WallMode = WallMode::Negate;
    fn get(cell: &Cell) -> f32 { cell.divergence }
    fn set(cell: &mut Cell, value: f32) { cell.divergence = value; }
}
