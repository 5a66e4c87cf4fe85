//! Initial particle placements.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::params::Dimension;

/// Preferred distance between neighbouring particles in lattice placements.
pub const DEFAULT_SPACING: f32 = 0.2;

/// Placement attempts per particle before random sampling accepts an overlap.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 32;

const GOLDEN_ANGLE: f32 = 2.399_963_2;

/// How particles are laid out when the simulation is (re)initialised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Arrangement {
    /// Evenly spaced lattice centred on the origin.
    #[default]
    Grid,
    /// Rejection-sampled positions inside the bound.
    Random { seed: u64 },
    /// Fibonacci-packed ball (disc in 2-D) centred on the origin.
    Circle,
}

/// Produce `count` positions for `arrangement` inside a box of `bound_size`
/// centred at the origin.
pub fn arrange(arrangement: Arrangement, count: usize, bound_size: Vec3, dimension: Dimension) -> Vec<Vec3> {
    match arrangement {
        Arrangement::Grid => grid_positions(count, bound_size, dimension),
        Arrangement::Random { seed } => random_positions(count, bound_size, dimension, seed),
        Arrangement::Circle => circle_positions(count, bound_size, dimension),
    }
}

/// Particles along each lattice side: `ceil(cbrt(n))`, or `ceil(sqrt(n))` in 2-D.
pub fn lattice_side(count: usize, dimension: Dimension) -> usize {
    let n = count as f64;
    let (root, power) = match dimension {
        Dimension::Two => (n.sqrt(), 2),
        Dimension::Three => (n.cbrt(), 3),
    };
    let mut side = (root.ceil() as usize).max(1);
    // Float roots of perfect powers may land a hair above the integer.
    while side > 1 && (side - 1).pow(power) >= count {
        side -= 1;
    }
    side
}

fn fitted_spacing(side: usize, bound_size: Vec3, dimension: Dimension) -> f32 {
    let extent = match dimension {
        Dimension::Two => bound_size.x.min(bound_size.y),
        Dimension::Three => bound_size.min_element(),
    };
    DEFAULT_SPACING.min(extent / side as f32)
}

/// Lattice sized so `count` particles fit inside `bound_size`.
pub fn grid_positions(count: usize, bound_size: Vec3, dimension: Dimension) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }
    let side = lattice_side(count, dimension);
    let spacing = fitted_spacing(side, bound_size, dimension);

    let rows = count.div_ceil(side);
    let (layers, rows_per_layer) = match dimension {
        Dimension::Two => (1, rows),
        Dimension::Three => (rows.div_ceil(side), side.min(rows)),
    };
    let extent = Vec3::new(
        (side.min(count) - 1) as f32,
        (rows_per_layer - 1) as f32,
        (layers - 1) as f32,
    ) * spacing;
    let origin = -extent * 0.5;

    (0..count)
        .map(|i| {
            let x = i % side;
            let (y, z) = match dimension {
                Dimension::Two => (i / side, 0),
                Dimension::Three => ((i / side) % side, i / (side * side)),
            };
            origin + Vec3::new(x as f32, y as f32, z as f32) * spacing
        })
        .collect()
}

/// Uniform random positions that try to keep a minimum separation.
///
/// Each particle gets `MAX_PLACEMENT_ATTEMPTS` tries; after that the last
/// candidate is accepted so placement always terminates.
pub fn random_positions(count: usize, bound_size: Vec3, dimension: Dimension, seed: u64) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(seed);
    let half = bound_size * 0.5;
    let side = lattice_side(count, dimension);
    let min_dist = fitted_spacing(side, bound_size, dimension) * 0.5;
    let min_dist_sq = min_dist * min_dist;

    let mut occupied: std::collections::HashMap<(i32, i32, i32), Vec<usize>> =
        std::collections::HashMap::new();
    let cell_of = |p: Vec3| {
        let c = (p / min_dist).floor();
        (c.x as i32, c.y as i32, c.z as i32)
    };

    let mut positions: Vec<Vec3> = Vec::with_capacity(count);
    let mut overlapping = 0usize;
    for _ in 0..count {
        let mut candidate = Vec3::ZERO;
        let mut placed = false;
        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            candidate = Vec3::new(
                rng.gen_range(-half.x..=half.x),
                rng.gen_range(-half.y..=half.y),
                match dimension {
                    Dimension::Two => 0.0,
                    Dimension::Three => rng.gen_range(-half.z..=half.z),
                },
            );
            let (cx, cy, cz) = cell_of(candidate);
            let mut clear = true;
            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(bucket) = occupied.get(&(cx + dx, cy + dy, cz + dz)) else {
                            continue;
                        };
                        if bucket
                            .iter()
                            .any(|&j| positions[j].distance_squared(candidate) < min_dist_sq)
                        {
                            clear = false;
                            break 'search;
                        }
                    }
                }
            }
            if clear {
                placed = true;
                break;
            }
        }
        if !placed {
            overlapping += 1;
        }
        occupied.entry(cell_of(candidate)).or_default().push(positions.len());
        positions.push(candidate);
    }

    if overlapping > 0 {
        log::warn!(
            "random arrangement: {overlapping} of {count} particles placed after {MAX_PLACEMENT_ATTEMPTS} attempts without clearance"
        );
    }
    positions
}

/// Fibonacci sphere packing (sunflower disc in 2-D) with the lattice spacing.
pub fn circle_positions(count: usize, bound_size: Vec3, dimension: Dimension) -> Vec<Vec3> {
    let side = lattice_side(count, dimension);
    let spacing = fitted_spacing(side, bound_size, dimension);
    let max_radius = match dimension {
        Dimension::Two => bound_size.x.min(bound_size.y),
        Dimension::Three => bound_size.min_element(),
    } * 0.5;

    let n = count as f32;
    let radius = match dimension {
        Dimension::Two => spacing * (n / std::f32::consts::PI).sqrt(),
        Dimension::Three => spacing * (3.0 * n / (4.0 * std::f32::consts::PI)).cbrt(),
    }
    .min(max_radius);

    (0..count)
        .map(|i| {
            let t = (i as f32 + 0.5) / n;
            let theta = i as f32 * GOLDEN_ANGLE;
            match dimension {
                Dimension::Two => {
                    let r = radius * t.sqrt();
                    Vec3::new(theta.cos() * r, theta.sin() * r, 0.0)
                }
                Dimension::Three => {
                    // Radius grows with the cube root so the ball is filled uniformly.
                    let r = radius * t.cbrt();
                    let y = 1.0 - 2.0 * ((i as f32 * 0.618_034) % 1.0);
                    let ring = (1.0 - y * y).max(0.0).sqrt();
                    Vec3::new(theta.cos() * ring, y, theta.sin() * ring) * r
                }
            }
        })
        .collect()
}
