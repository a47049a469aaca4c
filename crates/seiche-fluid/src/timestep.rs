//! Per-body time-step criteria.

use std::rc::Rc;

use seiche_body::Body;
use seiche_core::{vec2, BindingError};
use seiche_dynamics::{FluidBinding, ReduceDynamics};

const ADVECTION_CFL: f64 = 0.25;
const ACOUSTIC_CFL: f64 = 0.6;

fn max_speed(binding: &FluidBinding) -> f32 {
    let velocity = binding.store().vector(binding.velocity());
    let mut max_sq = 0.0f32;
    for i in 0..binding.store().len() {
        max_sq = max_sq.max(vec2::norm_sq(vec2::at(&velocity, i)));
    }
    max_sq.sqrt()
}

/// Advection time-step size: `0.25 h / U` where `U` is the largest of
/// the current particle speed, the viscous velocity scale
/// `mu / (rho0 h)`, and a caller-supplied reference speed.
pub struct AdvectionTimeStep {
    binding: FluidBinding,
    reference_speed: f32,
}

impl AdvectionTimeStep {
    const NAME: &'static str = "advection_time_step";

    /// Criterion for `body` with a reference speed (the expected
    /// characteristic flow speed; keeps the step bounded while the
    /// flow is still developing).
    pub fn new(body: &Rc<Body>, reference_speed: f32) -> Result<Self, BindingError> {
        Ok(Self {
            binding: FluidBinding::bind(body, Self::NAME)?,
            reference_speed,
        })
    }
}

impl ReduceDynamics for AdvectionTimeStep {
    type Output = f64;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn exec(&self) -> f64 {
        let h = self.binding.smoothing_length();
        let viscous_speed = if self.binding.rho0() > 0.0 {
            self.binding.viscosity() / (self.binding.rho0() * h)
        } else {
            0.0
        };
        let speed = max_speed(&self.binding)
            .max(viscous_speed)
            .max(self.reference_speed)
            .max(f32::EPSILON);
        ADVECTION_CFL * h as f64 / speed as f64
    }
}

/// Acoustic time-step size: `0.6 h / (c0 + U_max)`.
pub struct AcousticTimeStep {
    binding: FluidBinding,
}

impl AcousticTimeStep {
    const NAME: &'static str = "acoustic_time_step";

    /// Criterion for `body`.
    pub fn new(body: &Rc<Body>) -> Result<Self, BindingError> {
        Ok(Self {
            binding: FluidBinding::bind(body, Self::NAME)?,
        })
    }
}

impl ReduceDynamics for AcousticTimeStep {
    type Output = f64;

    fn name(&self) -> &str {
        Self::NAME
    }

    fn exec(&self) -> f64 {
        let h = self.binding.smoothing_length() as f64;
        let c0 = self.binding.sound_speed() as f64;
        let u_max = max_speed(&self.binding) as f64;
        ACOUSTIC_CFL * h / (c0 + u_max)
    }
}
