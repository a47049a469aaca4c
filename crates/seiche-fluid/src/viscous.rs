//! Viscous shear acceleration.

use std::fmt;
use std::rc::Rc;

use rayon::prelude::*;
use seiche_core::{vec2, BindingError, Vec2, DIM};
use seiche_dynamics::{FluidBinding, LocalDynamics, WallBinding};
use seiche_relation::{ContactRelation, InnerRelation, Neighbor};

/// Acceleration from viscous shear between neighboring particles,
/// accumulated into the prior-acceleration field.
///
/// Per governed particle `i`:
///
/// `acc_i += sum_j 2 mu (v_i - v_j) / (r_ij + 0.01 h) * dW_ij * V_j / rho_i`
///
/// over the inner neighborhood, plus the same sum over wall contacts
/// (with the wall's velocity and volume) when constructed with a
/// contact relation. A uniform velocity field therefore contributes
/// nothing, and the contribution vanishes as `mu -> 0`.
///
/// The binding is resolved at construction: field handles, `mu`, and
/// `h` are cached, and a non-fluid material fails `new` immediately.
/// Density and velocity are read-only here; only the governed body's
/// prior acceleration is mutated.
pub struct ViscousAcceleration {
    inner: Rc<InnerRelation>,
    binding: FluidBinding,
    wall: Option<(Rc<ContactRelation>, WallBinding)>,
}

impl fmt::Debug for ViscousAcceleration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViscousAcceleration").finish_non_exhaustive()
    }
}

impl ViscousAcceleration {
    const NAME: &'static str = "viscous_acceleration";

    /// Viscous interaction within one fluid body.
    pub fn new(inner: &Rc<InnerRelation>) -> Result<Self, BindingError> {
        Ok(Self {
            binding: FluidBinding::bind(inner.body(), Self::NAME)?,
            inner: Rc::clone(inner),
            wall: None,
        })
    }

    /// Viscous interaction within one fluid body plus wall drag from a
    /// contact relation. The contact's source must be the inner
    /// relation's body.
    pub fn with_wall(
        inner: &Rc<InnerRelation>,
        contact: &Rc<ContactRelation>,
    ) -> Result<Self, BindingError> {
        debug_assert_eq!(
            inner.body().id(),
            contact.source().id(),
            "contact relation must govern the same body as the inner relation"
        );
        Ok(Self {
            binding: FluidBinding::bind(inner.body(), Self::NAME)?,
            inner: Rc::clone(inner),
            wall: Some((
                Rc::clone(contact),
                WallBinding::bind(contact.target(), Self::NAME)?,
            )),
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn particle_contribution(
        mu: f32,
        h: f32,
        rho_i: f32,
        vel_i: Vec2,
        velocity: &[f32],
        volume: &[f32],
        neighbors: &[Neighbor],
    ) -> Vec2 {
        let mut acc = vec2::ZERO;
        for nb in neighbors {
            let dv = vec2::sub(vel_i, vec2::at(velocity, nb.index as usize));
            let scale = 2.0 * mu / (nb.r + 0.01 * h) * nb.dw * volume[nb.index as usize] / rho_i;
            acc = vec2::add(acc, vec2::scale(dv, scale));
        }
        acc
    }

    fn run(&self, parallel: bool) {
        let store = self.binding.store();
        debug_assert!(
            !self.binding.is_stale(),
            "store resized without refreshing the viscous binding"
        );
        debug_assert_eq!(
            self.inner.revision(),
            store.revision(),
            "inner relation is stale; update_configuration must run after a resize"
        );

        let mu = self.binding.viscosity();
        let h = self.binding.smoothing_length();

        let density = store.scalar(self.binding.density());
        let velocity = store.vector(self.binding.velocity());
        let volume = store.scalar(self.binding.volume());
        let neighborhoods = self.inner.neighborhoods();
        let mut prior = store.vector_mut(self.binding.prior_acceleration());

        let density: &[f32] = &density;
        let velocity: &[f32] = &velocity;
        let volume: &[f32] = &volume;
        let neighborhoods: &[Vec<Neighbor>] = &neighborhoods;

        let wall = self.wall.as_ref().map(|(contact, binding)| {
            (
                contact.neighborhoods(),
                binding.store().vector(binding.velocity()),
                binding.store().scalar(binding.volume()),
            )
        });
        let wall_views = wall
            .as_ref()
            .map(|(nbh, vel, vol)| (&nbh[..], &vel[..], &vol[..]));

        let update = |i: usize, out: &mut [f32]| {
            let rho_i = density[i];
            let vel_i = vec2::at(velocity, i);
            let mut acc = Self::particle_contribution(
                mu,
                h,
                rho_i,
                vel_i,
                velocity,
                volume,
                &neighborhoods[i],
            );
            if let Some((wall_nbh, wall_vel, wall_vol)) = wall_views {
                acc = vec2::add(
                    acc,
                    Self::particle_contribution(
                        mu,
                        h,
                        rho_i,
                        vel_i,
                        wall_vel,
                        wall_vol,
                        &wall_nbh[i],
                    ),
                );
            }
            out[0] += acc[0];
            out[1] += acc[1];
        };

        if parallel {
            prior
                .par_chunks_mut(DIM)
                .enumerate()
                .for_each(|(i, out)| update(i, out));
        } else {
            for (i, out) in prior.chunks_exact_mut(DIM).enumerate() {
                update(i, out);
            }
        }
    }
}

impl LocalDynamics for ViscousAcceleration {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn max_dt(&self) -> Option<f64> {
        // Momentum diffusion stability bound.
        let mu = self.binding.viscosity() as f64;
        if mu == 0.0 {
            return None;
        }
        let h = self.binding.smoothing_length() as f64;
        Some(0.125 * h * h * self.binding.rho0() as f64 / mu)
    }

    fn exec(&self, _dt: f64) {
        self.run(false);
    }

    fn parallel_exec(&self, _dt: f64) {
        self.run(true);
    }
}
