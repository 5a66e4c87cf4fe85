//! Density, pressure and viscosity passes.
//!
//! Each pass runs over every particle and may be split across threads; the
//! passes themselves are strictly ordered since each reads the previous one's
//! output. Neighbour queries always use predicted positions, and every kernel
//! is evaluated with the grid's cell size as its support radius.

use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::grid::SpatialHashGrid;
use crate::kernels::{
    density_kernel, near_density_kernel, near_pressure_kernel_derivative,
    pressure_kernel_derivative, viscosity_kernel,
};
use crate::params::{SimulationParams, DENSITY_EPSILON};
use crate::particle::{Density, ParticleSet};

/// Direction used when two particles occupy exactly the same point.
const COINCIDENT_DIR: Vec3 = Vec3::Y;

/// Sum the density and near-density kernels over every particle within
/// range of `pos`, including a particle sitting at `pos` itself.
pub fn density_at(pos: Vec3, predicted: &[Vec3], grid: &SpatialHashGrid) -> Density {
    let radius = grid.cell_size();
    let mut sample = Density::default();
    grid.for_each_neighbour(pos, predicted, |_, _, sqr_dist| {
        let dist = sqr_dist.sqrt();
        sample.density += density_kernel(dist, radius);
        sample.near += near_density_kernel(dist, radius);
    });
    sample
}

/// Pass A: recompute `densities` for every particle.
pub fn compute_densities(particles: &mut ParticleSet, grid: &SpatialHashGrid) {
    let predicted = &particles.predicted;

    #[cfg(feature = "parallel")]
    particles
        .densities
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, d)| *d = density_at(predicted[i], predicted, grid));

    #[cfg(not(feature = "parallel"))]
    for (i, d) in particles.densities.iter_mut().enumerate() {
        *d = density_at(predicted[i], predicted, grid);
    }
}

#[inline]
pub fn density_to_pressure(density: f32, params: &SimulationParams) -> f32 {
    (density - params.target_density) * params.pressure_multiplier
}

#[inline]
pub fn near_density_to_pressure(near_density: f32, params: &SimulationParams) -> f32 {
    near_density * params.near_pressure_multiplier
}

/// Pressure force on particle `i`, before division by its own density.
///
/// Each pair uses the mean of both particles' pressures and is normalised by
/// the neighbour's density (near term: the neighbour's near-density). Divisor
/// densities are floored at `DENSITY_EPSILON`.
pub fn pressure_force(
    i: usize,
    predicted: &[Vec3],
    densities: &[Density],
    grid: &SpatialHashGrid,
    params: &SimulationParams,
) -> Vec3 {
    let radius = grid.cell_size();
    let pos = predicted[i];
    let own = densities[i];
    let pressure = density_to_pressure(own.density, params);
    let near_pressure = near_density_to_pressure(own.near, params);

    let mut force = Vec3::ZERO;
    grid.for_each_neighbour(pos, predicted, |j, offset, sqr_dist| {
        if j == i {
            return;
        }
        let dist = sqr_dist.sqrt();
        let dir = if dist > 0.0 { offset / dist } else { COINCIDENT_DIR };

        let neighbour = densities[j];
        let neighbour_density = neighbour.density.max(DENSITY_EPSILON);
        let neighbour_near = neighbour.near.max(DENSITY_EPSILON);

        let shared_pressure = (pressure + density_to_pressure(neighbour.density, params)) * 0.5;
        let shared_near_pressure =
            (near_pressure + near_density_to_pressure(neighbour.near, params)) * 0.5;

        force += dir * pressure_kernel_derivative(dist, radius) * shared_pressure / neighbour_density;
        force += dir * near_pressure_kernel_derivative(dist, radius) * shared_near_pressure
            / neighbour_near;
    });
    force
}

/// Pass B: accelerate every particle by its pressure force.
pub fn apply_pressure_forces(
    particles: &mut ParticleSet,
    grid: &SpatialHashGrid,
    params: &SimulationParams,
    dt: f32,
) {
    let predicted = &particles.predicted;
    let densities = &particles.densities;
    let accelerate = |i: usize, vel: &mut Vec3| {
        let force = pressure_force(i, predicted, densities, grid, params);
        let own_density = densities[i].density.max(DENSITY_EPSILON);
        *vel += force / own_density * dt;
    };

    #[cfg(feature = "parallel")]
    particles
        .velocity
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, vel)| accelerate(i, vel));

    #[cfg(not(feature = "parallel"))]
    for (i, vel) in particles.velocity.iter_mut().enumerate() {
        accelerate(i, vel);
    }
}

/// Unscaled viscosity force on particle `i`: sum of `(v_j - v_i) * W(d)`.
pub fn viscosity_force(
    i: usize,
    predicted: &[Vec3],
    velocity: &[Vec3],
    grid: &SpatialHashGrid,
) -> Vec3 {
    let radius = grid.cell_size();
    let vel = velocity[i];
    let mut force = Vec3::ZERO;
    grid.for_each_neighbour(predicted[i], predicted, |j, _, sqr_dist| {
        if j == i {
            return;
        }
        force += (velocity[j] - vel) * viscosity_kernel(sqr_dist.sqrt(), radius);
    });
    force
}

/// Pass C: blend velocities towards neighbours.
///
/// Changes are collected in `velocity_delta` first so every particle reads
/// its neighbours' pre-pass velocities.
pub fn apply_viscosity(particles: &mut ParticleSet, grid: &SpatialHashGrid, params: &SimulationParams, dt: f32) {
    let scale = params.viscosity_strength * dt;
    let predicted = &particles.predicted;
    let velocity = &particles.velocity;

    #[cfg(feature = "parallel")]
    particles
        .velocity_delta
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, delta)| *delta = viscosity_force(i, predicted, velocity, grid) * scale);

    #[cfg(not(feature = "parallel"))]
    for (i, delta) in particles.velocity_delta.iter_mut().enumerate() {
        *delta = viscosity_force(i, predicted, velocity, grid) * scale;
    }

    for (vel, delta) in particles.velocity.iter_mut().zip(&particles.velocity_delta) {
        *vel += *delta;
    }
}
