//! Tests for the stable-fluids solver and pointer perturbation

use bevy::prelude::*;

use super::*;
use crate::game::fixed_math::FixedNum;
use crate::game::lattice::{Connectivity, Lattice, Velocity};

const DT: f32 = 0.1;
const DIFFUSION: f32 = 0.001;
const VISCOSITY: f32 = 0.001;

fn lattice(width: u32, height: u32) -> Lattice {
    Lattice::build(UVec2::new(width, height), IVec2::ZERO, FixedNum::from_num(0.5), Connectivity::Eight)
}

fn fill_velocity(lattice: &mut Lattice, mut field: impl FnMut(usize, usize) -> Vec2) {
    for cell in lattice.cells_mut() {
        if cell.is_border_cell() {
            continue;
        }
        let coord = cell.coord();
        cell.velocity = field(coord.x, coord.y);
    }
    let (cells, boundary) = lattice.cells_and_boundary();
    boundary.apply::<Velocity>(cells);
}

#[test]
fn test_quiescent_fluid_stays_at_rest() {
    let mut lattice = lattice(8, 8);
    let solver = FluidSolver::default();
    for _ in 0..25 {
        solver.step(&mut lattice, DT, DIFFUSION, VISCOSITY);
    }
    for cell in lattice.cells() {
        assert_eq!(cell.velocity(), Vec2::ZERO);
        assert_eq!(cell.density(), 0.0);
    }
}

#[test]
fn test_projection_reduces_source_divergence() {
    // Outflow from a source in the middle, fading out well before the walls.
    let mut lattice = lattice(16, 16);
    fill_velocity(&mut lattice, |x, y| {
        let offset = Vec2::new(x as f32 - 7.5, y as f32 - 7.5);
        offset * (-offset.length_squared() / 8.0).exp()
    });

    let before = mean_divergence(&lattice);
    assert!(before > 0.0);
    FluidSolver::default().project_velocity(&mut lattice);
    let after = mean_divergence(&lattice);
    assert!(after < before, "divergence {before} -> {after}");
}

#[test]
fn test_projection_reduces_random_divergence() {
    let mut rng = fastrand::Rng::with_seed(42);
    let mut lattice = lattice(24, 24);
    fill_velocity(&mut lattice, |_, _| Vec2::new(rng.f32() * 2.0 - 1.0, rng.f32() * 2.0 - 1.0));

    let before = mean_divergence(&lattice);
    FluidSolver::new(20, 40).project_velocity(&mut lattice);
    let after = mean_divergence(&lattice);
    assert!(after < before, "divergence {before} -> {after}");
}

#[test]
fn test_diffusion_spreads_density() {
    let mut lattice = lattice(8, 8);
    let center = lattice.index(4, 4).unwrap();
    lattice.cells_mut()[center].density = 100.0;

    FluidSolver::default().step(&mut lattice, DT, DIFFUSION, VISCOSITY);

    let neighbor = lattice.index(5, 4).unwrap();
    assert!(lattice.cell(center).unwrap().density() < 100.0);
    assert!(lattice.cell(neighbor).unwrap().density() > 0.0);
    // The corner only sees what the mirrored walls carried out of the interior.
    let corner = lattice.cell(0).unwrap().density();
    assert!(corner < 1e-6, "corner density {corner}");
    let walls = (lattice.cell(1).unwrap().density() + lattice.cell(8).unwrap().density()) * 0.5;
    assert_eq!(corner, walls);
}

#[test]
fn test_density_never_goes_negative() {
    let mut rng = fastrand::Rng::with_seed(7);
    let mut lattice = lattice(12, 10);
    let strength = PointerStrength::default();
    let solver = FluidSolver::default();

    for tick in 0..30 {
        let id = lattice.index(1 + rng.usize(..10), 1 + rng.usize(..8)).unwrap();
        let delta = Vec2::new(rng.f32() * 4.0 - 2.0, rng.f32() * 4.0 - 2.0);
        assert!(perturb(&mut lattice, id, delta, &strength), "tick {tick}");
        solver.step(&mut lattice, DT, DIFFUSION, VISCOSITY);
    }
    for cell in lattice.cells() {
        assert!(cell.density() >= 0.0, "{:?} has density {}", cell.coord(), cell.density());
        assert!(cell.velocity().is_finite());
    }
}

#[test]
fn test_step_ends_with_reflective_walls() {
    let mut lattice = lattice(6, 6);
    fill_velocity(&mut lattice, |x, y| Vec2::new(y as f32, x as f32));
    FluidSolver::default().step(&mut lattice, DT, DIFFUSION, VISCOSITY);

    let wall = lattice.index(0, 3).unwrap();
    let inner = lattice.index(1, 3).unwrap();
    assert_eq!(lattice.cell(wall).unwrap().velocity(), -lattice.cell(inner).unwrap().velocity());

    let corner = lattice.cell(0).unwrap().velocity();
    let east = lattice.cell(1).unwrap().velocity();
    let north = lattice.cell(6).unwrap().velocity();
    assert_eq!(corner, (east + north) * 0.5);
}

#[test]
fn test_degenerate_lattice_is_untouched() {
    let mut lattice = lattice(2, 5);
    for cell in lattice.cells_mut() {
        cell.velocity = Vec2::ONE;
        cell.density = 1.0;
    }
    let solver = FluidSolver::default();
    solver.step(&mut lattice, DT, DIFFUSION, VISCOSITY);
    solver.project_velocity(&mut lattice);

    assert!(lattice.cells().iter().all(|c| c.velocity() == Vec2::ONE && c.density() == 1.0));
    assert_eq!(mean_divergence(&lattice), 0.0);
}

#[test]
fn test_perturb_is_additive() {
    let mut lattice = lattice(5, 5);
    let strength = PointerStrength::default();
    let center = lattice.index(2, 2).unwrap();
    let east = lattice.index(3, 2).unwrap();

    assert!(perturb(&mut lattice, center, Vec2::X, &strength));
    assert_eq!(lattice.cell(center).unwrap().density(), 100.0);
    assert_eq!(lattice.cell(center).unwrap().velocity(), Vec2::new(5.0, 0.0));
    assert_eq!(lattice.cell(east).unwrap().density(), 50.0);
    assert_eq!(lattice.cell(east).unwrap().velocity(), Vec2::new(2.5, 0.0));
    assert_eq!(lattice.cell(0).unwrap().density(), 0.0);

    assert!(perturb(&mut lattice, center, Vec2::NEG_X, &strength));
    assert_eq!(lattice.cell(center).unwrap().density(), 200.0);
    assert_eq!(lattice.cell(center).unwrap().velocity(), Vec2::ZERO);
}

#[test]
fn test_perturb_edge_cases() {
    let mut lattice = lattice(3, 3);
    assert!(!perturb(&mut lattice, 9, Vec2::X, &PointerStrength::default()));

    let drain = PointerStrength {
        density: -10.0,
        velocity_scale: 1.0,
        neighbor_falloff: -1.0,
    };
    assert!(perturb(&mut lattice, 4, Vec2::Y, &drain));
    assert_eq!(lattice.cell(4).unwrap().density(), 0.0);
    assert_eq!(lattice.cell(4).unwrap().velocity(), Vec2::Y);
    assert_eq!(lattice.cell(0).unwrap().velocity(), Vec2::ZERO);
}
