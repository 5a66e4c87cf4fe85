use glam::{Vec3, Vec4};

/// Density and near-density sampled at a particle's predicted position.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Density {
    pub density: f32,
    pub near: f32,
}

/// SoA particle storage.
///
/// Every vector has length `count`; index `i` is the identity of a particle
/// and is never reordered.
#[derive(Default)]
pub struct ParticleSet {
    pub count: usize,
    /// Authoritative positions, written only by the integrator.
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,
    /// Lookahead positions used for every neighbour query within a step
    pub predicted: Vec<Vec3>,
    pub densities: Vec<Density>,
    /// Render projection: xyz = position, w = point size
    pub output: Vec<Vec4>,
    /// Per-pass velocity changes, applied after the pass so neighbours read
    /// pre-pass velocities.
    pub velocity_delta: Vec<Vec3>,
}

impl ParticleSet {
    pub fn new(count: usize) -> Self {
        let mut particles = Self::default();
        particles.resize(count);
        particles
    }

    /// Reallocate every array to `count` zeroed particles.
    pub fn resize(&mut self, count: usize) {
        self.count = count;
        reset_vec(&mut self.position, count, Vec3::ZERO);
        reset_vec(&mut self.velocity, count, Vec3::ZERO);
        reset_vec(&mut self.predicted, count, Vec3::ZERO);
        reset_vec(&mut self.densities, count, Density::default());
        reset_vec(&mut self.output, count, Vec4::ZERO);
        reset_vec(&mut self.velocity_delta, count, Vec3::ZERO);
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Refresh the render projection from the current positions.
    pub fn write_output(&mut self, point_size: f32) {
        for (out, pos) in self.output.iter_mut().zip(&self.position) {
            *out = pos.extend(point_size);
        }
    }
}

fn reset_vec<T: Clone>(v: &mut Vec<T>, len: usize, value: T) {
    v.clear();
    v.resize(len, value);
}
