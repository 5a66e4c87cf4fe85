use std::time::Duration;

/// Wall time spent in each stage of the last step.
///
/// Only recorded with the `profiling` feature; otherwise every field stays
/// zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageTimings {
    pub external_forces: Duration,
    pub spatial_rebuild: Duration,
    pub density: Duration,
    pub pressure: Duration,
    pub viscosity: Duration,
    pub integrate: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.external_forces
            + self.spatial_rebuild
            + self.density
            + self.pressure
            + self.viscosity
            + self.integrate
    }
}

/// Run `f`, storing its wall time in `slot` when profiling is enabled.
#[inline]
pub(crate) fn timed<R>(slot: &mut Duration, f: impl FnOnce() -> R) -> R {
    #[cfg(feature = "profiling")]
    {
        let start = std::time::Instant::now();
        let result = f();
        *slot = start.elapsed();
        result
    }

    #[cfg(not(feature = "profiling"))]
    {
        *slot = Duration::ZERO;
        f()
    }
}
