//! The [`LocalDynamics`] and [`ReduceDynamics`] traits.

/// One physics update rule applied per particle per step.
///
/// # Contract
///
/// - Construction resolves everything the kernel needs (field handles,
///   material constants, smoothing length) through its binding; `exec`
///   performs no lookups and no re-validation.
/// - `exec` is deterministic: same topology and same input state
///   produce identical output state.
/// - `exec` mutates only the kernel's declared output field; the driver
///   sequences kernels that target the same field.
/// - Invocation is synchronous and blocking; it is safe to invoke
///   repeatedly across steps with a refreshed relation.
///
/// # Object safety
///
/// The driver stores kernels as `Box<dyn LocalDynamics>`.
pub trait LocalDynamics {
    /// Kernel name, for error reporting and step metrics.
    fn name(&self) -> &str;

    /// Maximum stable time step for this kernel (e.g. a CFL or
    /// diffusion bound). The driver validates `dt <= min(max_dt)`
    /// across the sequence at startup. `None` imposes no constraint.
    fn max_dt(&self) -> Option<f64> {
        None
    }

    /// Apply the update over every governed particle, sequentially.
    fn exec(&self, dt: f64);

    /// Apply the update with a flat parallel-for over particle indices.
    ///
    /// Particle updates are independent given the current topology
    /// snapshot, so no ordering between particles is guaranteed or
    /// required. Defaults to the sequential path.
    fn parallel_exec(&self, dt: f64) {
        self.exec(dt);
    }
}

/// A reduction over the particles of a body, producing one value per
/// invocation (e.g. a time-step criterion).
pub trait ReduceDynamics {
    /// The reduced value type.
    type Output;

    /// Reduction name, for error reporting and step metrics.
    fn name(&self) -> &str;

    /// Run the reduction over the current particle state.
    fn exec(&self) -> Self::Output;
}
