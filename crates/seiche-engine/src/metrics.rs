//! Per-step timing metrics.

/// Timing data collected during a single advection step.
///
/// All durations are in microseconds. The stepper populates these
/// after each `advance()`; consumers (telemetry, profiling) read them
/// from the most recent step.
#[derive(Clone, Debug, Default)]
pub struct StepMetrics {
    /// Wall-clock time for the entire step.
    pub total_us: u64,
    /// Per-kernel execution times: `(name, microseconds)`, summed over
    /// acoustic sub-steps for kernels in the acoustic phase.
    pub dynamics_us: Vec<(String, u64)>,
    /// Time spent rebuilding relations at the end of the step.
    pub configuration_us: u64,
    /// Number of acoustic sub-steps taken inside the step.
    pub acoustic_substeps: u32,
    /// The advection step size used.
    pub advection_dt: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = StepMetrics::default();
        assert_eq!(m.total_us, 0);
        assert!(m.dynamics_us.is_empty());
        assert_eq!(m.configuration_us, 0);
        assert_eq!(m.acoustic_substeps, 0);
        assert_eq!(m.advection_dt, 0.0);
    }
}
