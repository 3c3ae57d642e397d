use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::game::fixed_math::{FixedNum, FixedVec2};

/// One of the eight lattice directions. North is +y, east is +x.
///
/// The discriminant doubles as the neighbour slot index in [`super::Cell`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Compass {
    pub const CARDINALS: [Compass; 4] = [Compass::North, Compass::East, Compass::South, Compass::West];

    /// Neighbour traversal order: a column-major sweep of the 3x3 block,
    /// x outer from -1 to 1, y inner from -1 to 1.
    ///
    /// Direction selection keeps the first strictly-smaller neighbour in this
    /// order, so changing it changes which of two equal candidates wins.
    pub const SCAN_ORDER: [Compass; 8] = [
        Compass::SouthWest,
        Compass::West,
        Compass::NorthWest,
        Compass::South,
        Compass::North,
        Compass::SouthEast,
        Compass::East,
        Compass::NorthEast,
    ];

    pub fn as_index(self) -> usize {
        self as usize
    }

    pub fn offset(self) -> IVec2 {
        match self {
            Compass::North => IVec2::new(0, 1),
            Compass::NorthEast => IVec2::new(1, 1),
            Compass::East => IVec2::new(1, 0),
            Compass::SouthEast => IVec2::new(1, -1),
            Compass::South => IVec2::new(0, -1),
            Compass::SouthWest => IVec2::new(-1, -1),
            Compass::West => IVec2::new(-1, 0),
            Compass::NorthWest => IVec2::new(-1, 1),
        }
    }

    /// Maps an integer index offset between two adjacent cells to a direction.
    /// Returns `None` for the zero offset and for anything farther than one step.
    pub fn from_offset(offset: IVec2) -> Option<Self> {
        match (offset.x, offset.y) {
            (0, 1) => Some(Compass::North),
            (1, 1) => Some(Compass::NorthEast),
            (1, 0) => Some(Compass::East),
            (1, -1) => Some(Compass::SouthEast),
            (0, -1) => Some(Compass::South),
            (-1, -1) => Some(Compass::SouthWest),
            (-1, 0) => Some(Compass::West),
            (-1, 1) => Some(Compass::NorthWest),
            _ => None,
        }
    }

    pub fn is_diagonal(self) -> bool {
        matches!(
            self,
            Compass::NorthEast | Compass::SouthEast | Compass::SouthWest | Compass::NorthWest
        )
    }

    pub fn opposite(self) -> Self {
        match self {
            Compass::North => Compass::South,
            Compass::NorthEast => Compass::SouthWest,
            Compass::East => Compass::West,
            Compass::SouthEast => Compass::NorthWest,
            Compass::South => Compass::North,
            Compass::SouthWest => Compass::NorthEast,
            Compass::West => Compass::East,
            Compass::NorthWest => Compass::SouthEast,
        }
    }

    /// Unit-length movement vector in lattice space.
    pub fn unit_vector(self) -> Vec2 {
        self.offset().as_vec2().normalize()
    }

    pub fn fixed_unit_vector(self) -> FixedVec2 {
        let offset = self.offset();
        FixedVec2::new(FixedNum::from_num(offset.x), FixedNum::from_num(offset.y)).normalize()
    }
}
