//! SPH smoothing kernels.
//!
//! Every kernel takes a distance `dist` and the interaction radius `radius`
//! and is exactly zero outside its support. The density kernels use a strict
//! `dist < radius` test, the two pressure derivatives include the boundary.

use std::f32::consts::PI;

/// Density kernel: `(h - d)^2 * 15 / (2 PI h^5)` for `d < h`.
#[inline]
pub fn density_kernel(dist: f32, radius: f32) -> f32 {
    if dist >= radius {
        return 0.0;
    }
    let volume = 15.0 / (2.0 * PI * radius.powi(5));
    let v = radius - dist;
    v * v * volume
}

/// Near-density kernel: `(h - d)^3 * 15 / (PI h^6)` for `d < h`.
#[inline]
pub fn near_density_kernel(dist: f32, radius: f32) -> f32 {
    if dist >= radius {
        return 0.0;
    }
    let volume = 15.0 / (PI * radius.powi(6));
    let v = radius - dist;
    v * v * v * volume
}

/// Slope of [`density_kernel`]: `-(h - d) * 15 / (PI h^5)` for `d <= h`.
#[inline]
pub fn pressure_kernel_derivative(dist: f32, radius: f32) -> f32 {
    if dist > radius {
        return 0.0;
    }
    let scale = 15.0 / (radius.powi(5) * PI);
    -(radius - dist) * scale
}

/// Slope of [`near_density_kernel`]: `-(h - d)^2 * 45 / (PI h^6)` for `d <= h`.
#[inline]
pub fn near_pressure_kernel_derivative(dist: f32, radius: f32) -> f32 {
    if dist > radius {
        return 0.0;
    }
    let scale = 45.0 / (radius.powi(6) * PI);
    let v = radius - dist;
    -v * v * scale
}

/// Poly6 viscosity kernel: `(h^2 - d^2)^3 * 315 / (64 PI h^9)` for `d < h`.
#[inline]
pub fn viscosity_kernel(dist: f32, radius: f32) -> f32 {
    if dist >= radius {
        return 0.0;
    }
    let scale = 315.0 / (64.0 * PI * radius.abs().powi(9));
    let v = radius * radius - dist * dist;
    v * v * v * scale
}
