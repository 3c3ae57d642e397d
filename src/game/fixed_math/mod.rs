//! Deterministic fixed-point mathematics.
//!
//! Lattice geometry (cell centres, bounds, goal snapping) and agent positions
//! use fixed-point arithmetic so that the same world position always resolves
//! to the same cell on every platform. The fluid solver works in `f32`; it
//! never derives positions from these values after the lattice is built.

use fixed::types::I48F16;

pub use vec2::FixedVec2;

mod vec2;

/// Fixed-point number type used for lattice geometry.
///
/// Uses I48F16 format: 48 bits for the integer part, 16 bits for the fractional part.
pub type FixedNum = I48F16;
