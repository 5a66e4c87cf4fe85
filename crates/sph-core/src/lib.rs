//! Smoothed-particle hydrodynamics fluid simulation core.
//!
//! [`FluidSimulation`] owns the particle arrays and parameters and advances
//! them one step per [`FluidSimulation::update`] call: external forces and
//! position prediction, spatial grid rebuild, density, pressure, viscosity,
//! then integration with box-boundary reflection.

pub mod arrangement;
pub mod error;
pub mod forces;
pub mod grid;
pub mod integrator;
pub mod kernels;
pub mod palette;
pub mod params;
pub mod particle;
pub mod simulation;
pub mod solver;
pub mod timing;

pub use arrangement::Arrangement;
pub use error::{Result, SimError};
pub use forces::{PointerMode, PointerParams};
pub use params::{Dimension, SimulationParams};
pub use simulation::{FluidSimulation, SimulationState};
pub use timing::StageTimings;
