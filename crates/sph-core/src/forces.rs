use glam::Vec3;

use crate::params::SimulationParams;

/// How the pointer pushes particles inside its radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PointerMode {
    #[default]
    Attract,
    Repel,
}

/// Parameters describing the pointer (cursor) interaction state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerParams {
    pub active: bool,
    pub mode: PointerMode,
    pub position: Vec3,
    pub radius: f32,
    pub strength: f32,
}

impl Default for PointerParams {
    fn default() -> Self {
        Self {
            active: false,
            mode: PointerMode::Attract,
            position: Vec3::ZERO,
            radius: 2.0,
            strength: 10.0,
        }
    }
}

/// Acceleration the pointer applies to a particle at `pos` moving at `vel`.
///
/// Inside the radius the particle is steered towards (or away from) the
/// pointer, with its own velocity cancelled proportionally to how close to
/// the centre it is. Outside the radius the result is zero.
pub fn pointer_acceleration(pos: Vec3, vel: Vec3, pointer: &PointerParams) -> Vec3 {
    if !pointer.active || pointer.radius <= 0.0 {
        return Vec3::ZERO;
    }

    let offset = pointer.position - pos;
    let sqr_dist = offset.length_squared();
    if sqr_dist >= pointer.radius * pointer.radius {
        return Vec3::ZERO;
    }

    let dist = sqr_dist.sqrt();
    let dir = if dist > 1e-6 { offset / dist } else { Vec3::ZERO };
    let centre_t = 1.0 - dist / pointer.radius;
    let strength = match pointer.mode {
        PointerMode::Attract => pointer.strength,
        PointerMode::Repel => -pointer.strength,
    };

    (dir * strength - vel) * centre_t
}

/// Total external acceleration: gravity plus the optional pointer force.
#[inline]
pub fn external_acceleration(
    pos: Vec3,
    vel: Vec3,
    params: &SimulationParams,
    pointer: &PointerParams,
) -> Vec3 {
    params.gravity() + pointer_acceleration(pos, vel, pointer)
}
