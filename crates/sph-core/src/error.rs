use glam::Vec3;

/// Configuration errors reported by the simulation.
///
/// Numeric degeneracy inside a step is never reported here; only misuse of
/// the public API (bad counts, radii, bounds) surfaces as an error.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimError {
    /// `initialize` was called with a particle count of zero.
    EmptyParticleSet,
    /// The particle count does not fit the `u32` spatial index.
    TooManyParticles(usize),
    /// Interaction radius must be finite and strictly positive.
    InvalidInteractionRadius(f32),
    /// Every bound component must be finite and strictly positive.
    InvalidBoundSize(Vec3),
    /// Target density must be finite and non-negative.
    InvalidTargetDensity(f32),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::EmptyParticleSet => write!(f, "particle count must be greater than zero"),
            SimError::TooManyParticles(count) => {
                write!(f, "particle count {count} exceeds the spatial index capacity")
            }
            SimError::InvalidInteractionRadius(r) => {
                write!(f, "interaction radius must be positive, got {r}")
            }
            SimError::InvalidBoundSize(b) => {
                write!(f, "bound size components must be positive, got {b}")
            }
            SimError::InvalidTargetDensity(d) => {
                write!(f, "target density must be non-negative, got {d}")
            }
        }
    }
}

impl std::error::Error for SimError {}

pub type Result<T> = std::result::Result<T, SimError>;
