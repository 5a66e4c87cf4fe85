use glam::{Vec3, Vec4};

use crate::arrangement::{arrange, Arrangement};
use crate::error::{Result, SimError};
use crate::forces::PointerParams;
use crate::grid::SpatialHashGrid;
use crate::params::{self, Dimension, SimulationParams, MAX_DISPLAY_SPEED};
use crate::particle::ParticleSet;
use crate::timing::{timed, StageTimings};
use crate::{integrator, solver};

/// Whether the owner is currently advancing the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SimulationState {
    #[default]
    Idle,
    Running,
}

/// SPH fluid simulation: particle state, parameters and the per-frame step.
///
/// Owned by the caller; nothing here is global, so several simulations can
/// live side by side.
pub struct FluidSimulation {
    params: SimulationParams,
    pointer: PointerParams,
    particles: ParticleSet,
    grid: SpatialHashGrid,
    state: SimulationState,
    /// Count and arrangement of the last successful `initialize`, for `reset`.
    last_init: Option<(usize, Arrangement)>,
    sim_time: f32,
    frame_count: u64,
    timings: StageTimings,
}

impl Default for FluidSimulation {
    fn default() -> Self {
        Self::with_valid_params(SimulationParams::default())
    }
}

impl FluidSimulation {
    /// Create an empty simulation. Call [`initialize`](Self::initialize) to
    /// allocate particles.
    pub fn new(params: SimulationParams) -> Result<Self> {
        params.validate()?;
        Ok(Self::with_valid_params(params))
    }

    fn with_valid_params(params: SimulationParams) -> Self {
        Self {
            params,
            pointer: PointerParams::default(),
            particles: ParticleSet::default(),
            grid: SpatialHashGrid::new(),
            state: SimulationState::Idle,
            last_init: None,
            sim_time: 0.0,
            frame_count: 0,
            timings: StageTimings::default(),
        }
    }

    /// (Re)allocate `count` particles laid out by `arrangement` inside a box
    /// of `bound_size`, then build the grid and compute initial densities.
    ///
    /// On error the simulation is left empty and `update` is a no-op.
    pub fn initialize(&mut self, count: usize, arrangement: Arrangement, bound_size: Vec3) -> Result<()> {
        self.clear();

        if count == 0 {
            log::warn!("initialize: refusing an empty particle set");
            return Err(SimError::EmptyParticleSet);
        }
        if count >= u32::MAX as usize {
            log::warn!("initialize: {count} particles exceed the spatial index capacity");
            return Err(SimError::TooManyParticles(count));
        }
        if let Err(err) = params::validate_bound(bound_size) {
            log::warn!("initialize: {err}");
            return Err(err);
        }

        self.params.bound_size = bound_size;
        let positions = arrange(arrangement, count, bound_size, self.params.dimension);
        log::debug!("initialize: {arrangement:?} placement of {count} particles in {bound_size}");

        self.particles.resize(count);
        self.particles.position.copy_from_slice(&positions);
        self.particles.predicted.copy_from_slice(&positions);

        let params = self.params;
        self.grid.build(&self.particles.predicted, params.interaction_radius, params.dimension);
        solver::compute_densities(&mut self.particles, &self.grid);
        self.particles.write_output(params.point_size);

        self.last_init = Some((count, arrangement));
        log::info!("fluid simulation initialized with {count} particles");
        Ok(())
    }

    /// Repeat the last successful initialisation with the current bound size.
    pub fn reset(&mut self) -> Result<()> {
        match self.last_init {
            Some((count, arrangement)) => self.initialize(count, arrangement, self.params.bound_size),
            None => Err(SimError::EmptyParticleSet),
        }
    }

    fn clear(&mut self) {
        self.particles.resize(0);
        self.grid.build(&[], self.params.interaction_radius, self.params.dimension);
        self.state = SimulationState::Idle;
        self.sim_time = 0.0;
        self.frame_count = 0;
        self.timings = StageTimings::default();
    }

    /// Advance the simulation by one step of `dt` seconds.
    ///
    /// The caller is expected to clamp `dt` (e.g. to 1/30 s); large steps are
    /// not rejected here.
    pub fn update(&mut self, dt: f32) {
        if self.particles.is_empty() {
            return;
        }

        let params = self.params;
        let Self {
            particles,
            grid,
            pointer,
            timings,
            ..
        } = self;

        timed(&mut timings.external_forces, || {
            integrator::apply_external_forces(particles, &params, pointer, dt)
        });
        timed(&mut timings.spatial_rebuild, || {
            grid.build(&particles.predicted, params.interaction_radius, params.dimension)
        });
        timed(&mut timings.density, || solver::compute_densities(particles, grid));
        timed(&mut timings.pressure, || {
            solver::apply_pressure_forces(particles, grid, &params, dt)
        });
        timed(&mut timings.viscosity, || solver::apply_viscosity(particles, grid, &params, dt));
        timed(&mut timings.integrate, || {
            integrator::integrate(particles, &params, dt);
            particles.write_output(params.point_size);
        });

        self.sim_time += dt;
        self.frame_count += 1;
    }

    /// Step only while [`SimulationState::Running`]. Returns whether a step ran.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state == SimulationState::Running {
            self.update(dt);
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn play(&mut self) {
        self.state = SimulationState::Running;
    }

    pub fn pause(&mut self) {
        self.state = SimulationState::Idle;
    }

    pub fn toggle(&mut self) {
        self.state = match self.state {
            SimulationState::Idle => SimulationState::Running,
            SimulationState::Running => SimulationState::Idle,
        };
    }

    // ---------- per-particle access ----------

    pub fn particle_count(&self) -> usize {
        self.particles.count
    }

    pub fn position(&self, i: usize) -> Vec3 {
        self.particles.position.get(i).copied().unwrap_or_default()
    }

    pub fn velocity(&self, i: usize) -> Vec3 {
        self.particles.velocity.get(i).copied().unwrap_or_default()
    }

    pub fn density(&self, i: usize) -> f32 {
        self.particles.densities.get(i).map_or(0.0, |d| d.density)
    }

    pub fn near_density(&self, i: usize) -> f32 {
        self.particles.densities.get(i).map_or(0.0, |d| d.near)
    }

    pub fn speed(&self, i: usize) -> f32 {
        self.velocity(i).length()
    }

    /// Speed scaled into [0, 1] against `MAX_DISPLAY_SPEED`, for colour mapping.
    pub fn normalized_speed(&self, i: usize) -> f32 {
        (self.speed(i) / MAX_DISPLAY_SPEED).clamp(0.0, 1.0)
    }

    /// Overwrite a particle's position. Out-of-range indices are ignored.
    pub fn set_position(&mut self, i: usize, position: Vec3) {
        if let Some(p) = self.particles.position.get_mut(i) {
            *p = position;
            self.particles.output[i] = position.extend(self.params.point_size);
        }
    }

    /// Overwrite a particle's velocity. Out-of-range indices are ignored.
    pub fn set_velocity(&mut self, i: usize, velocity: Vec3) {
        if let Some(v) = self.particles.velocity.get_mut(i) {
            *v = velocity;
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.particles.position
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.particles.velocity
    }

    /// Render projection of every particle: xyz = position, w = point size.
    pub fn output_positions(&self) -> &[Vec4] {
        &self.particles.output
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn grid(&self) -> &SpatialHashGrid {
        &self.grid
    }

    // ---------- parameters ----------

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn set_params(&mut self, params: SimulationParams) -> Result<()> {
        if let Err(err) = params.validate() {
            log::warn!("rejected simulation parameters: {err}");
            return Err(err);
        }
        self.params = params;
        Ok(())
    }

    pub fn interaction_radius(&self) -> f32 {
        self.params.interaction_radius
    }

    pub fn set_interaction_radius(&mut self, radius: f32) -> Result<()> {
        params::validate_radius(radius).inspect_err(|err| log::warn!("{err}"))?;
        self.params.interaction_radius = radius;
        Ok(())
    }

    pub fn target_density(&self) -> f32 {
        self.params.target_density
    }

    pub fn set_target_density(&mut self, density: f32) -> Result<()> {
        params::validate_target_density(density).inspect_err(|err| log::warn!("{err}"))?;
        self.params.target_density = density;
        Ok(())
    }

    pub fn pressure_multiplier(&self) -> f32 {
        self.params.pressure_multiplier
    }

    pub fn set_pressure_multiplier(&mut self, value: f32) {
        self.params.pressure_multiplier = value;
    }

    pub fn near_pressure_multiplier(&self) -> f32 {
        self.params.near_pressure_multiplier
    }

    pub fn set_near_pressure_multiplier(&mut self, value: f32) {
        self.params.near_pressure_multiplier = value;
    }

    pub fn viscosity_strength(&self) -> f32 {
        self.params.viscosity_strength
    }

    pub fn set_viscosity_strength(&mut self, value: f32) {
        self.params.viscosity_strength = value;
    }

    pub fn gravity_enabled(&self) -> bool {
        self.params.gravity_enabled
    }

    pub fn set_gravity_enabled(&mut self, enabled: bool) {
        self.params.gravity_enabled = enabled;
    }

    pub fn gravity_scale(&self) -> f32 {
        self.params.gravity_scale
    }

    pub fn set_gravity_scale(&mut self, value: f32) {
        self.params.gravity_scale = value;
    }

    pub fn bound_size(&self) -> Vec3 {
        self.params.bound_size
    }

    pub fn set_bound_size(&mut self, bound_size: Vec3) -> Result<()> {
        params::validate_bound(bound_size).inspect_err(|err| log::warn!("{err}"))?;
        self.params.bound_size = bound_size;
        Ok(())
    }

    pub fn collision_damping(&self) -> f32 {
        self.params.collision_damping
    }

    pub fn set_collision_damping(&mut self, value: f32) {
        self.params.collision_damping = value;
    }

    pub fn dimension(&self) -> Dimension {
        self.params.dimension
    }

    /// Takes effect on the next `initialize`/`reset` for placement and on the
    /// next `update` for neighbour search.
    pub fn set_dimension(&mut self, dimension: Dimension) {
        self.params.dimension = dimension;
    }

    pub fn pointer(&self) -> &PointerParams {
        &self.pointer
    }

    pub fn set_pointer(&mut self, pointer: PointerParams) {
        self.pointer = pointer;
    }

    // ---------- time and diagnostics ----------

    /// Accumulated simulated time since the last initialisation.
    pub fn simulation_time(&self) -> f32 {
        self.sim_time
    }

    pub fn set_simulation_time(&mut self, time: f32) {
        self.sim_time = time;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Per-stage wall time of the last `update`.
    pub fn timings(&self) -> StageTimings {
        self.timings
    }
}
