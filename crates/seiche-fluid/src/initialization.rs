//! Per-step reset of the prior-acceleration field.

use std::rc::Rc;

use rayon::prelude::*;
use seiche_body::Body;
use seiche_core::{BindingError, Vec2, VectorField, DIM};
use seiche_dynamics::{resolve_vector, LocalDynamics};

/// Resets every particle's prior acceleration to the body force
/// (gravity) at the start of an advection step, so the interaction
/// kernels that follow accumulate onto a clean slate.
///
/// Needs only the prior-acceleration field; no material capability is
/// required.
pub struct TimeStepInitialization {
    body: Rc<Body>,
    prior_acceleration: VectorField,
    gravity: Vec2,
}

impl TimeStepInitialization {
    const NAME: &'static str = "time_step_initialization";

    /// Initialization with a constant body force.
    pub fn new(body: &Rc<Body>, gravity: Vec2) -> Result<Self, BindingError> {
        Ok(Self {
            prior_acceleration: resolve_vector(body.store(), "prior_acceleration", Self::NAME)?,
            body: Rc::clone(body),
            gravity,
        })
    }
}

impl LocalDynamics for TimeStepInitialization {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn exec(&self, _dt: f64) {
        let mut prior = self.body.store().vector_mut(self.prior_acceleration);
        for out in prior.chunks_exact_mut(DIM) {
            out[0] = self.gravity[0];
            out[1] = self.gravity[1];
        }
    }

    fn parallel_exec(&self, _dt: f64) {
        let gravity = self.gravity;
        let mut prior = self.body.store().vector_mut(self.prior_acceleration);
        prior.par_chunks_mut(DIM).for_each(|out| {
            out[0] = gravity[0];
            out[1] = gravity[1];
        });
    }
}
