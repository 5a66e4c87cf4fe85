use glam::Vec3;
use sph_core::grid::SpatialHashGrid;
use sph_core::kernels::{density_kernel, near_density_kernel, viscosity_kernel};
use sph_core::params::SimulationParams;
use sph_core::particle::{Density, ParticleSet};
use sph_core::solver::{
    apply_pressure_forces, apply_viscosity, compute_densities, density_at, pressure_force,
    viscosity_force,
};

fn particles_at(positions: &[Vec3]) -> ParticleSet {
    let mut particles = ParticleSet::new(positions.len());
    particles.position.copy_from_slice(positions);
    particles.predicted.copy_from_slice(positions);
    particles
}

fn built_grid(particles: &ParticleSet, params: &SimulationParams) -> SpatialHashGrid {
    let mut grid = SpatialHashGrid::new();
    grid.build(&particles.predicted, params.interaction_radius, params.dimension);
    grid
}

#[test]
fn test_single_particle_density_is_self_contribution() {
    let params = SimulationParams::default();
    let mut particles = particles_at(&[Vec3::new(0.3, -0.2, 0.1)]);
    let grid = built_grid(&particles, &params);
    compute_densities(&mut particles, &grid);

    let h = params.interaction_radius;
    let d = particles.densities[0];
    assert!((d.density - density_kernel(0.0, h)).abs() < 1e-4);
    assert!((d.near - near_density_kernel(0.0, h)).abs() < 1e-4);
}

#[test]
fn test_density_sums_neighbours_in_range() {
    let params = SimulationParams::default();
    let h = params.interaction_radius;
    let positions = [
        Vec3::ZERO,
        Vec3::new(0.1, 0.0, 0.0),
        Vec3::new(0.0, 0.2, 0.0),
        Vec3::new(2.0, 0.0, 0.0),
    ];
    let particles = particles_at(&positions);
    let grid = built_grid(&particles, &params);

    let d = density_at(Vec3::ZERO, &particles.predicted, &grid);
    let expected = density_kernel(0.0, h) + density_kernel(0.1, h) + density_kernel(0.2, h);
    let expected_near =
        near_density_kernel(0.0, h) + near_density_kernel(0.1, h) + near_density_kernel(0.2, h);
    assert!((d.density - expected).abs() < expected * 1e-5, "density {} vs {}", d.density, expected);
    assert!((d.near - expected_near).abs() < expected_near * 1e-5);
}

#[test]
fn test_two_particle_pressure_symmetry() {
    let params = SimulationParams::default();
    let mut particles = particles_at(&[Vec3::ZERO, Vec3::new(0.12, 0.05, -0.03)]);
    let grid = built_grid(&particles, &params);

    // Equal densities, both above the target density.
    let shared = Density {
        density: params.target_density + 15.0,
        near: 10.0,
    };
    particles.densities.fill(shared);

    let f0 = pressure_force(0, &particles.predicted, &particles.densities, &grid, &params);
    let f1 = pressure_force(1, &particles.predicted, &particles.densities, &grid, &params);

    assert!(f0.length() > 0.0, "compressed pair should repel");
    assert!((f0 + f1).length() < f0.length() * 1e-5, "f0 = {f0}, f1 = {f1}");

    let separation = particles.predicted[1] - particles.predicted[0];
    assert!(f0.dot(separation) < 0.0, "particle 0 should be pushed away from particle 1");
}

#[test]
fn test_symmetric_pair_from_density_pass() {
    let params = SimulationParams::default();
    let mut particles = particles_at(&[Vec3::new(-0.05, 0.0, 0.0), Vec3::new(0.05, 0.0, 0.0)]);
    let grid = built_grid(&particles, &params);
    compute_densities(&mut particles, &grid);

    assert!((particles.densities[0].density - particles.densities[1].density).abs() < 1e-4);

    let f0 = pressure_force(0, &particles.predicted, &particles.densities, &grid, &params);
    let f1 = pressure_force(1, &particles.predicted, &particles.densities, &grid, &params);
    assert!((f0 + f1).length() < f0.length() * 1e-4);
}

#[test]
fn test_coincident_particles_stay_finite() {
    let params = SimulationParams::default();
    let mut particles = particles_at(&[Vec3::splat(0.5), Vec3::splat(0.5)]);
    let grid = built_grid(&particles, &params);
    compute_densities(&mut particles, &grid);
    apply_pressure_forces(&mut particles, &grid, &params, 1.0 / 60.0);

    for v in &particles.velocity {
        assert!(v.is_finite(), "velocity should stay finite, got {v}");
    }
    // The fallback direction is +y, so both particles move along y only.
    assert_eq!(particles.velocity[0].x, 0.0);
    assert_eq!(particles.velocity[0].z, 0.0);
}

#[test]
fn test_zero_density_neighbour_is_floored() {
    let params = SimulationParams::default();
    let mut particles = particles_at(&[Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0)]);
    let grid = built_grid(&particles, &params);
    particles.densities[0] = Density { density: 50.0, near: 5.0 };
    particles.densities[1] = Density::default();

    let f0 = pressure_force(0, &particles.predicted, &particles.densities, &grid, &params);
    assert!(f0.is_finite(), "zero neighbour density must not produce {f0}");
}

#[test]
fn test_pressure_ignores_out_of_range_particles() {
    let params = SimulationParams::default();
    let mut particles = particles_at(&[Vec3::ZERO, Vec3::new(params.interaction_radius * 1.5, 0.0, 0.0)]);
    let grid = built_grid(&particles, &params);
    compute_densities(&mut particles, &grid);

    let f0 = pressure_force(0, &particles.predicted, &particles.densities, &grid, &params);
    assert_eq!(f0, Vec3::ZERO);
}

#[test]
fn test_viscosity_pulls_velocities_together() {
    let params = SimulationParams {
        viscosity_strength: 0.5,
        ..Default::default()
    };
    let mut particles = particles_at(&[Vec3::ZERO, Vec3::new(0.1, 0.0, 0.0)]);
    particles.velocity[0] = Vec3::new(1.0, 0.0, 0.0);
    particles.velocity[1] = Vec3::new(-1.0, 0.0, 0.0);
    let grid = built_grid(&particles, &params);

    let h = params.interaction_radius;
    let force = viscosity_force(0, &particles.predicted, &particles.velocity, &grid);
    let expected = Vec3::new(-2.0, 0.0, 0.0) * viscosity_kernel(0.1, h);
    assert!((force - expected).length() < expected.length() * 1e-5);

    let dt = 0.01;
    apply_viscosity(&mut particles, &grid, &params, dt);

    // Both particles read pre-pass velocities, so momentum is conserved.
    let total = particles.velocity[0] + particles.velocity[1];
    assert!(total.length() < 1e-5, "total momentum drifted to {total}");
    assert!(particles.velocity[0].x < 1.0 && particles.velocity[1].x > -1.0);
    let expected_v0 = 1.0 + expected.x * params.viscosity_strength * dt;
    assert!((particles.velocity[0].x - expected_v0).abs() < 1e-5);
}

#[test]
fn test_pressure_pass_pushes_compressed_pair_apart() {
    let params = SimulationParams::default();
    let mut particles = particles_at(&[Vec3::new(-0.02, 0.0, 0.0), Vec3::new(0.02, 0.0, 0.0)]);
    let grid = built_grid(&particles, &params);
    compute_densities(&mut particles, &grid);
    apply_pressure_forces(&mut particles, &grid, &params, 1.0 / 60.0);

    assert!(particles.velocity[0].x < 0.0);
    assert!(particles.velocity[1].x > 0.0);
    assert!((particles.velocity[0] + particles.velocity[1]).length() < 1e-3);
}

#[test]
fn test_kernels_use_grid_cell_size_as_support() {
    let params = SimulationParams::default();
    let radius = 0.5;
    assert!(radius > params.interaction_radius);

    // 0.4 lies outside the default radius but inside the grid's support.
    let mut particles = particles_at(&[Vec3::ZERO, Vec3::new(0.4, 0.0, 0.0)]);
    particles.velocity[1] = Vec3::new(1.0, 0.0, 0.0);
    let mut grid = SpatialHashGrid::new();
    grid.build(&particles.predicted, radius, params.dimension);

    let d = density_at(Vec3::ZERO, &particles.predicted, &grid);
    let expected = density_kernel(0.0, radius) + density_kernel(0.4, radius);
    assert!((d.density - expected).abs() < expected * 1e-5, "density {} vs {}", d.density, expected);

    let force = viscosity_force(0, &particles.predicted, &particles.velocity, &grid);
    let expected_force = Vec3::X * viscosity_kernel(0.4, radius);
    assert!((force - expected_force).length() < expected_force.length() * 1e-5);

    compute_densities(&mut particles, &grid);
    let f0 = pressure_force(0, &particles.predicted, &particles.densities, &grid, &params);
    assert!(f0.x != 0.0, "neighbour inside the grid support should exert pressure");
}
