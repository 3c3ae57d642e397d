use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::game::fixed_math::FixedVec2;
use crate::game::lattice::CellBounds;

/// Terrain classification reported for a cell's footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainClass {
    Impassable,
    Rough,
}

pub type TerrainHits = SmallVec<[TerrainClass; 4]>;

/// Source of terrain classifications consumed by the cost field.
///
/// Implementations may report any number of overlapping classifications per
/// cell, in any order; the cost field applies its own saturation rules.
pub trait TerrainQuery {
    fn classify(&self, bounds: &CellBounds) -> TerrainHits;
}

impl<F> TerrainQuery for F
where
    F: Fn(&CellBounds) -> TerrainHits,
{
    fn classify(&self, bounds: &CellBounds) -> TerrainHits {
        self(bounds)
    }
}

/// Terrain with nothing on it: every cell keeps the default cost.
pub struct OpenTerrain;

impl TerrainQuery for OpenTerrain {
    fn classify(&self, _bounds: &CellBounds) -> TerrainHits {
        TerrainHits::new()
    }
}

/// Axis-aligned rectangle of classified terrain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainPatch {
    pub class: TerrainClass,
    pub center: FixedVec2,
    pub half_extents: FixedVec2,
}

impl TerrainPatch {
    pub fn new(class: TerrainClass, center: FixedVec2, half_extents: FixedVec2) -> Self {
        Self { class, center, half_extents }
    }

    pub fn bounds(&self) -> CellBounds {
        CellBounds {
            min: self.center - self.half_extents,
            max: self.center + self.half_extents,
        }
    }
}

/// Terrain placed in the world, queried by footprint overlap.
#[derive(Resource, Clone, Debug, Default)]
pub struct TerrainMap {
    patches: Vec<TerrainPatch>,
}

impl TerrainMap {
    pub fn new(patches: Vec<TerrainPatch>) -> Self {
        Self { patches }
    }

    pub fn patches(&self) -> &[TerrainPatch] {
        &self.patches
    }

    pub fn add(&mut self, patch: TerrainPatch) {
        self.patches.push(patch);
    }
}

impl TerrainQuery for TerrainMap {
    fn classify(&self, bounds: &CellBounds) -> TerrainHits {
        self.patches
            .iter()
            .filter(|patch| patch.bounds().overlaps(bounds))
            .map(|patch| patch.class)
            .collect()
    }
}
