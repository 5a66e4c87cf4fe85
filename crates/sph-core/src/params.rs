use glam::Vec3;

use crate::error::{Result, SimError};

/// Fixed lookahead used for predicted positions, decoupled from the frame `dt`.
pub const LOOKAHEAD_DT: f32 = 1.0 / 120.0;

/// Speed that maps to 1.0 in [`normalized_speed`](crate::simulation::FluidSimulation::normalized_speed).
pub const MAX_DISPLAY_SPEED: f32 = 1.0;

/// Floor applied to every density used as a divisor.
pub const DENSITY_EPSILON: f32 = 1e-6;

/// Number of spatial axes the simulation runs in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Dimension {
    /// Planar simulation in the xy plane; neighbour search visits 9 cells.
    Two,
    /// Volumetric simulation; neighbour search visits 27 cells.
    #[default]
    Three,
}

impl Dimension {
    /// Drop the depth component in 2-D; identity in 3-D.
    #[inline]
    pub fn project(self, v: Vec3) -> Vec3 {
        match self {
            Dimension::Two => Vec3::new(v.x, v.y, 0.0),
            Dimension::Three => v,
        }
    }
}

/// Tunable simulation parameters.
///
/// Read once at the start of every step, so changes take effect on the next
/// `update` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    pub interaction_radius: f32,
    pub target_density: f32,
    pub pressure_multiplier: f32,
    pub near_pressure_multiplier: f32,
    pub viscosity_strength: f32,
    pub gravity_enabled: bool,
    pub gravity_scale: f32,
    /// Full extents of the simulation box, centred at the origin.
    pub bound_size: Vec3,
    /// Fraction of the normal velocity kept after hitting a wall.
    pub collision_damping: f32,
    pub dimension: Dimension,
    /// Auxiliary scalar written to the `w` component of the render output.
    pub point_size: f32,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            interaction_radius: 0.35,
            target_density: 45.0,
            pressure_multiplier: 20.0,
            near_pressure_multiplier: 2.0,
            viscosity_strength: 0.05,
            gravity_enabled: false,
            gravity_scale: 9.82,
            bound_size: Vec3::new(16.0, 9.0, 9.0),
            collision_damping: 0.95,
            dimension: Dimension::Three,
            point_size: 0.05,
        }
    }
}

impl SimulationParams {
    /// Check the values that would otherwise cause divisions by zero.
    pub fn validate(&self) -> Result<()> {
        validate_radius(self.interaction_radius)?;
        validate_bound(self.bound_size)?;
        validate_target_density(self.target_density)
    }

    /// Half extents of the simulation box.
    #[inline]
    pub fn half_bound(&self) -> Vec3 {
        self.bound_size * 0.5
    }

    /// Constant acceleration applied each step, zero when gravity is off.
    #[inline]
    pub fn gravity(&self) -> Vec3 {
        if self.gravity_enabled {
            Vec3::new(0.0, -self.gravity_scale, 0.0)
        } else {
            Vec3::ZERO
        }
    }
}

pub(crate) fn validate_radius(radius: f32) -> Result<()> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidInteractionRadius(radius))
    }
}

pub(crate) fn validate_bound(bound: Vec3) -> Result<()> {
    if bound.is_finite() && bound.min_element() > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidBoundSize(bound))
    }
}

pub(crate) fn validate_target_density(density: f32) -> Result<()> {
    if density.is_finite() && density >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidTargetDensity(density))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SimulationParams::default().validate().is_ok());
    }

    #[test]
    fn gravity_points_down_only_when_enabled() {
        let mut params = SimulationParams::default();
        assert_eq!(params.gravity(), Vec3::ZERO);
        params.gravity_enabled = true;
        assert_eq!(params.gravity(), Vec3::new(0.0, -9.82, 0.0));
    }

    #[test]
    fn rejects_degenerate_values() {
        let params = SimulationParams {
            interaction_radius: 0.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(SimError::InvalidInteractionRadius(0.0)));

        let params = SimulationParams {
            bound_size: Vec3::new(1.0, -1.0, 1.0),
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(SimError::InvalidBoundSize(_))));

        assert!(validate_radius(f32::NAN).is_err());
        assert!(validate_target_density(-1.0).is_err());
    }
}
