//! Tests for lattice construction, lookup and boundary rules

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::*;
use crate::game::fixed_math::{FixedNum, FixedVec2};

fn lattice(width: u32, height: u32) -> Lattice {
    Lattice::build(UVec2::new(width, height), IVec2::ZERO, FixedNum::from_num(0.5), Connectivity::Eight)
}

fn world(x: f32, y: f32) -> FixedVec2 {
    FixedVec2::from_f32(x, y)
}

#[test]
fn test_build_dimensions_and_border() {
    let lattice = lattice(5, 4);
    assert_eq!(lattice.width(), 5);
    assert_eq!(lattice.height(), 4);
    assert_eq!(lattice.len(), 20);
    // 3x2 interior
    assert_eq!(lattice.border_count(), 14);
    assert!(lattice.is_border(0));
    assert!(!lattice.is_border(7));
    assert!(lattice.is_border(19));

    for (id, cell) in lattice.cells().iter().enumerate() {
        let coord = cell.coord();
        assert_eq!(lattice.index(coord.x, coord.y), Some(id));
        assert_eq!(cell.cost(), DEFAULT_COST);
        assert_eq!(cell.best_cost(), UNREACHED);
        assert_eq!(cell.direction(), None);
        assert_eq!(cell.is_border_cell(), lattice.is_border(id));
    }
    assert_eq!(lattice.index(5, 0), None);
}

#[test]
fn test_world_positions_are_cell_centres() {
    let lattice = lattice(5, 4);
    let cell = lattice.cell(7).unwrap();
    assert_eq!(cell.coord(), GridCoord::new(2, 1));
    assert_eq!(cell.world_position(), world(2.5, 1.5));

    let offset = Lattice::build(UVec2::new(3, 3), IVec2::new(-2, -1), FixedNum::from_num(0.5), Connectivity::Eight);
    assert_eq!(offset.cell(0).unwrap().world_position(), world(-1.5, -0.5));
    assert_eq!(offset.cell_at_world(world(-1.5, -0.5)), 0);
}

#[test]
fn test_corner_neighbors() {
    let lattice = lattice(5, 4);
    let corner = lattice.cell(0).unwrap();
    assert_eq!(corner.neighbor(Compass::North), Some(5));
    assert_eq!(corner.neighbor(Compass::East), Some(1));
    assert_eq!(corner.neighbor(Compass::NorthEast), Some(6));
    assert_eq!(corner.neighbor(Compass::South), None);
    assert_eq!(corner.neighbor(Compass::West), None);
    assert_eq!(corner.neighbor(Compass::SouthWest), None);
    assert_eq!(lattice.neighbors(0).count(), 3);
}

#[test]
fn test_neighbors_follow_scan_order() {
    let lattice = lattice(5, 4);
    let visited: Vec<_> = lattice.neighbors(7).collect();
    assert_eq!(
        visited,
        vec![
            (Compass::SouthWest, 1),
            (Compass::West, 6),
            (Compass::NorthWest, 11),
            (Compass::South, 2),
            (Compass::North, 12),
            (Compass::SouthEast, 3),
            (Compass::East, 8),
            (Compass::NorthEast, 13),
        ]
    );
}

#[test]
fn test_neighbor_links_are_symmetric() {
    let lattice = lattice(6, 5);
    for id in 0..lattice.len() {
        for (direction, neighbor) in lattice.neighbors(id) {
            assert_eq!(lattice.cell(neighbor).unwrap().neighbor(direction.opposite()), Some(id));
        }
    }
}

#[test]
fn test_four_connectivity_skips_diagonals() {
    let lattice = Lattice::build(UVec2::new(4, 4), IVec2::ZERO, FixedNum::from_num(0.5), Connectivity::Four);
    let id = lattice.index(1, 1).unwrap();
    let directions: Vec<_> = lattice.neighbors(id).map(|(d, _)| d).collect();
    assert_eq!(directions, vec![Compass::West, Compass::South, Compass::North, Compass::East]);
}

#[test]
fn test_single_cell_lattice() {
    let lattice = lattice(1, 1);
    assert_eq!(lattice.len(), 1);
    assert!(lattice.is_border(0));
    assert_eq!(lattice.neighbors(0).count(), 0);
    assert_eq!(lattice.boundary().pinned_count(), 1);
    assert_eq!(lattice.cell_at_world(world(-50.0, 50.0)), 0);
}

#[test]
fn test_zero_size_is_raised_to_one() {
    let lattice = lattice(0, 3);
    assert_eq!(lattice.width(), 1);
    assert_eq!(lattice.len(), 3);
}

#[test]
fn test_cell_at_world_clamps() {
    let lattice = lattice(5, 4);
    assert_eq!(lattice.cell_at_world(world(2.3, 1.7)), 7);
    assert_eq!(lattice.cell_at_world(world(-10.0, -10.0)), 0);
    assert_eq!(lattice.cell_at_world(world(100.0, 100.0)), 19);
    assert_eq!(lattice.cell_at_world(world(100.0, 0.2)), 4);
}

#[test]
fn test_cell_at_pointer_rejects_clamped_positions() {
    let lattice = lattice(5, 4);
    assert_eq!(lattice.cell_at_pointer(world(2.3, 1.7)), Some(7));
    assert_eq!(lattice.cell_at_pointer(world(0.2, 0.3)), Some(0));
    assert_eq!(lattice.cell_at_pointer(world(-10.0, -10.0)), None);
    assert_eq!(lattice.cell_at_pointer(world(-0.1, 0.5)), None);
    // Inside the corner cell's square, outside its inscribed circle.
    assert_eq!(lattice.cell_at_pointer(world(0.95, 0.95)), Some(0));
}

#[test]
fn test_far_positions_clamp_without_overflow() {
    let lattice = lattice(8, 8);
    assert_eq!(lattice.cell_at_pointer(world(1e8, 3.0)), None);
    assert_eq!(lattice.cell_at_pointer(world(-1e8, -1e8)), None);
    assert_eq!(lattice.cell_at_world(world(1e8, 3.0)), 3 * 8 + 7);

    let fine = Lattice::build(UVec2::new(8, 8), IVec2::ZERO, FixedNum::from_num(0.01), Connectivity::Eight);
    assert_eq!(fine.cell_at_world(world(1e13, 0.03)), 8 + 7);
    assert_eq!(fine.cell_at_world(world(-1e13, -1e13)), 0);
    assert_eq!(fine.cell_at_world(FixedVec2::new(FixedNum::MAX, FixedNum::MIN)), 7);
    assert_eq!(fine.cell_at_pointer(world(1e13, 0.03)), None);
}

#[test]
fn test_cell_bounds() {
    let lattice = lattice(5, 4);
    let bounds = lattice.cell_bounds(7).unwrap();
    assert_eq!(bounds.min, world(2.0, 1.0));
    assert_eq!(bounds.max, world(3.0, 2.0));
    assert_eq!(bounds.center(), world(2.5, 1.5));
    assert!(lattice.cell_bounds(20).is_none());

    let right = lattice.cell_bounds(8).unwrap();
    // Touching edges do not overlap.
    assert!(!bounds.overlaps(&right));
    assert!(bounds.overlaps(&bounds));
}

#[test]
fn test_increase_cost_saturates() {
    let mut lattice = lattice(3, 3);
    let cell = lattice.cell_mut(4).unwrap();
    cell.increase_cost(3);
    assert_eq!(cell.cost(), 4);
    cell.increase_cost(IMPASSABLE_COST);
    assert_eq!(cell.cost(), IMPASSABLE_COST);
    assert!(cell.is_impassable());
    cell.increase_cost(3);
    assert_eq!(cell.cost(), IMPASSABLE_COST);
}

#[test]
fn test_next_cell_follows_direction() {
    let mut lattice = lattice(5, 4);
    assert_eq!(lattice.next_cell(7), 7);
    lattice.cell_mut(7).unwrap().direction = Some(Compass::East);
    assert_eq!(lattice.next_cell(7), 8);
    assert_eq!(lattice.cell(7).unwrap().direction_vector(), Vec2::X);
    assert_eq!(lattice.next_cell(99), 99);
}

#[test]
fn test_random_interior_cell_avoids_border() {
    let grid = lattice(6, 5);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let id = grid.random_interior_cell(&mut rng);
        assert!(id < grid.len());
        assert!(!grid.is_border(id));
    }

    let thin = lattice(1, 4);
    for _ in 0..20 {
        assert!(thin.random_interior_cell(&mut rng) < thin.len());
    }
}

#[test]
fn test_occupants() {
    let mut lattice = lattice(3, 3);
    let entity = World::new().spawn_empty().id();
    lattice.set_occupant(4, Some(entity));
    assert_eq!(lattice.cell(4).unwrap().occupant(), Some(entity));
    // Out of range is logged, not a panic.
    lattice.set_occupant(40, Some(entity));
    lattice.set_occupant(4, None);
    assert!(lattice.cells().iter().all(|c| c.occupant().is_none()));
}

#[test]
fn test_boundary_rules() {
    let lattice = lattice(5, 4);
    let boundary = lattice.boundary();
    assert_eq!(boundary.rule(10), Some(BoundaryRule::Wall { source: 11 }));
    assert_eq!(boundary.rule(17), Some(BoundaryRule::Wall { source: 12 }));
    assert_eq!(boundary.rule(0), Some(BoundaryRule::Corner { first: 1, second: 5 }));
    assert_eq!(boundary.rule(19), Some(BoundaryRule::Corner { first: 18, second: 14 }));
    assert_eq!(boundary.rule(7), None);
    assert_eq!(boundary.pinned_count(), 0);
}

#[test]
fn test_one_wide_lattice_is_pinned() {
    let lattice = lattice(1, 5);
    assert_eq!(lattice.boundary().pinned_count(), 5);
    assert_eq!(lattice.boundary().rule(2), None);
}

#[test]
fn test_boundary_negates_velocity_and_mirrors_density() {
    let mut lattice = lattice(5, 4);
    {
        let cell = lattice.cell_mut(6).unwrap();
        cell.velocity = Vec2::new(1.0, 2.0);
        cell.density = 3.0;
    }
    let (cells, boundary) = lattice.cells_and_boundary();
    boundary.apply::<Velocity>(cells);
    boundary.apply::<Density>(cells);

    // West wall of (1,1) and south wall of (1,1)
    assert_eq!(cells[5].velocity, Vec2::new(-1.0, -2.0));
    assert_eq!(cells[1].velocity, Vec2::new(-1.0, -2.0));
    assert_eq!(cells[5].density, 3.0);
    assert_eq!(cells[1].density, 3.0);
    // The corner averages the two walls it touches.
    assert_eq!(cells[0].velocity, Vec2::new(-1.0, -2.0));
    assert_eq!(cells[0].density, 3.0);
    // Walls fed by untouched interior cells stay zero.
    assert_eq!(cells[9].velocity, Vec2::ZERO);
}

#[test]
fn test_compass_offsets_round_trip() {
    for direction in Compass::SCAN_ORDER {
        assert_eq!(Compass::from_offset(direction.offset()), Some(direction));
        assert_eq!(direction.opposite().opposite(), direction);
        assert!((direction.unit_vector().length() - 1.0).abs() < 1e-6);
    }
    assert_eq!(Compass::from_offset(IVec2::ZERO), None);
    assert_eq!(Compass::from_offset(IVec2::new(2, 0)), None);
}
