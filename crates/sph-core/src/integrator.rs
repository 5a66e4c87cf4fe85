use glam::Vec3;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::forces::{external_acceleration, PointerParams};
use crate::params::{SimulationParams, LOOKAHEAD_DT};
use crate::particle::ParticleSet;

/// Apply external forces, then predict each particle's position one fixed
/// lookahead step ahead.
///
/// The lookahead is `LOOKAHEAD_DT` regardless of `dt` so density estimates
/// do not depend on frame-rate jitter.
pub fn apply_external_forces(
    particles: &mut ParticleSet,
    params: &SimulationParams,
    pointer: &PointerParams,
    dt: f32,
) {
    let position = &particles.position;
    let dimension = params.dimension;
    let step = |i: usize, vel: &mut Vec3, predicted: &mut Vec3| {
        let pos = dimension.project(position[i]);
        let acc = external_acceleration(pos, *vel, params, pointer);
        *vel = dimension.project(*vel + acc * dt);
        *predicted = pos + *vel * LOOKAHEAD_DT;
    };

    #[cfg(feature = "parallel")]
    particles
        .velocity
        .par_iter_mut()
        .zip(particles.predicted.par_iter_mut())
        .enumerate()
        .for_each(|(i, (vel, predicted))| step(i, vel, predicted));

    #[cfg(not(feature = "parallel"))]
    for (i, (vel, predicted)) in particles
        .velocity
        .iter_mut()
        .zip(particles.predicted.iter_mut())
        .enumerate()
    {
        step(i, vel, predicted);
    }
}

/// Clamp `pos` into the box `[-half_bound, half_bound]`, reflecting and
/// damping the velocity component of every axis that crossed a wall.
///
/// Axes are handled independently.
#[inline]
pub fn resolve_collisions(pos: &mut Vec3, vel: &mut Vec3, half_bound: Vec3, damping: f32) {
    for axis in 0..3 {
        if pos[axis].abs() > half_bound[axis] {
            pos[axis] = half_bound[axis] * pos[axis].signum();
            vel[axis] *= -damping;
        }
    }
}

/// Advance positions by their velocities and keep them inside the bound.
///
/// In 2-D the depth components are held at zero.
pub fn integrate(particles: &mut ParticleSet, params: &SimulationParams, dt: f32) {
    let half_bound = params.half_bound();
    let damping = params.collision_damping;
    let dimension = params.dimension;
    let step = |pos: &mut Vec3, vel: &mut Vec3| {
        *vel = dimension.project(*vel);
        *pos = dimension.project(*pos + *vel * dt);
        resolve_collisions(pos, vel, half_bound, damping);
    };

    #[cfg(feature = "parallel")]
    particles
        .position
        .par_iter_mut()
        .zip(particles.velocity.par_iter_mut())
        .for_each(|(pos, vel)| step(pos, vel));

    #[cfg(not(feature = "parallel"))]
    for (pos, vel) in particles.position.iter_mut().zip(particles.velocity.iter_mut()) {
        step(pos, vel);
    }
}
