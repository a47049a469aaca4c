//! Pressure and density relaxation: the two half-steps of the
//! weakly compressible acoustic update.
//!
//! [`PressureRelaxation`] advances density by half a step, evaluates
//! the equation of state, drifts positions by half a step, computes the
//! pressure-gradient acceleration, and kicks velocities.
//! [`DensityRelaxation`] completes the position drift, evaluates the
//! velocity divergence, and advances density by the remaining half
//! step. Run in this order inside the acoustic loop they form a
//! kick-drift scheme with trapezoidal density integration.
//!
//! Both kernels require the `pressure` and `density_rate` scalar
//! fields ([`crate::RELAXATION_SCALARS`]) registered on the fluid body.

use std::fmt;
use std::rc::Rc;

use rayon::prelude::*;
use seiche_core::{vec2, BindingError, ScalarField, VectorField, DIM};
use seiche_dynamics::{resolve_scalar, resolve_vector, FluidBinding, LocalDynamics, WallBinding};
use seiche_relation::{ContactRelation, InnerRelation, Neighbor};

/// First half-step: equation of state, pressure-gradient acceleration,
/// velocity kick.
///
/// Writes density (half step), pressure, position (half drift),
/// acceleration, and velocity. The pressure acceleration per particle
/// is
///
/// `acc_i = -(1/rho_i) * sum_j (p_i + p_j) V_j dW_ij e_ij`
///
/// with the wall term using the mirrored fluid pressure (`p_w = p_i`).
pub struct PressureRelaxation {
    inner: Rc<InnerRelation>,
    binding: FluidBinding,
    pressure: ScalarField,
    density_rate: ScalarField,
    position: VectorField,
    wall: Option<(Rc<ContactRelation>, WallBinding)>,
}

impl fmt::Debug for PressureRelaxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PressureRelaxation").finish_non_exhaustive()
    }
}

impl PressureRelaxation {
    const NAME: &'static str = "pressure_relaxation";

    /// Relaxation over one fluid body's inner neighborhood.
    pub fn new(inner: &Rc<InnerRelation>) -> Result<Self, BindingError> {
        Self::build(inner, None)
    }

    /// Relaxation including a wall-boundary term.
    pub fn with_wall(
        inner: &Rc<InnerRelation>,
        contact: &Rc<ContactRelation>,
    ) -> Result<Self, BindingError> {
        debug_assert_eq!(
            inner.body().id(),
            contact.source().id(),
            "contact relation must govern the same body as the inner relation"
        );
        let wall = (
            Rc::clone(contact),
            WallBinding::bind(contact.target(), Self::NAME)?,
        );
        Self::build(inner, Some(wall))
    }

    fn build(
        inner: &Rc<InnerRelation>,
        wall: Option<(Rc<ContactRelation>, WallBinding)>,
    ) -> Result<Self, BindingError> {
        let store = inner.body().store();
        Ok(Self {
            binding: FluidBinding::bind(inner.body(), Self::NAME)?,
            pressure: resolve_scalar(store, "pressure", Self::NAME)?,
            density_rate: resolve_scalar(store, "density_rate", Self::NAME)?,
            position: resolve_vector(store, "position", Self::NAME)?,
            inner: Rc::clone(inner),
            wall,
        })
    }

    fn run(&self, dt: f64, parallel: bool) {
        let store = self.binding.store();
        debug_assert!(!self.binding.is_stale());
        debug_assert_eq!(self.inner.revision(), store.revision());
        let dt = dt as f32;
        let count = store.len();

        // Half density step and equation of state.
        {
            let density_rate = store.scalar(self.density_rate);
            let mut density = store.scalar_mut(self.binding.density());
            for i in 0..count {
                density[i] += 0.5 * dt * density_rate[i];
            }
            let density_now: &[f32] = &density;
            let mut pressure = store.scalar_mut(self.pressure);
            for i in 0..count {
                pressure[i] = self.binding.eos_pressure(density_now[i]);
            }
        }

        // Half position drift.
        {
            let velocity = store.vector(self.binding.velocity());
            let mut position = store.vector_mut(self.position);
            for i in 0..count {
                let drift = vec2::scale(vec2::at(&velocity, i), 0.5 * dt);
                vec2::accumulate(&mut position, i, drift);
            }
        }

        // Pressure-gradient acceleration.
        {
            let density = store.scalar(self.binding.density());
            let pressure = store.scalar(self.pressure);
            let volume = store.scalar(self.binding.volume());
            let neighborhoods = self.inner.neighborhoods();
            let mut acceleration = store.vector_mut(self.binding.acceleration());

            let density: &[f32] = &density;
            let pressure: &[f32] = &pressure;
            let volume: &[f32] = &volume;
            let neighborhoods: &[Vec<Neighbor>] = &neighborhoods;

            let wall = self.wall.as_ref().map(|(contact, binding)| {
                (
                    contact.neighborhoods(),
                    binding.store().scalar(binding.volume()),
                )
            });
            let wall_views = wall.as_ref().map(|(nbh, vol)| (&nbh[..], &vol[..]));

            let update = |i: usize, out: &mut [f32]| {
                let mut acc = vec2::ZERO;
                for nb in &neighborhoods[i] {
                    let strength = (pressure[i] + pressure[nb.index as usize])
                        * volume[nb.index as usize]
                        * nb.dw;
                    acc = vec2::add(acc, vec2::scale(nb.e, strength));
                }
                if let Some((wall_nbh, wall_vol)) = wall_views {
                    for nb in &wall_nbh[i] {
                        let strength = 2.0 * pressure[i] * wall_vol[nb.index as usize] * nb.dw;
                        acc = vec2::add(acc, vec2::scale(nb.e, strength));
                    }
                }
                let inv_rho = -1.0 / density[i];
                out[0] = acc[0] * inv_rho;
                out[1] = acc[1] * inv_rho;
            };

            if parallel {
                acceleration
                    .par_chunks_mut(DIM)
                    .enumerate()
                    .for_each(|(i, out)| update(i, out));
            } else {
                for (i, out) in acceleration.chunks_exact_mut(DIM).enumerate() {
                    update(i, out);
                }
            }
        }

        // Velocity kick from pressure plus prior accelerations.
        {
            let acceleration = store.vector(self.binding.acceleration());
            let prior = store.vector(self.binding.prior_acceleration());
            let mut velocity = store.vector_mut(self.binding.velocity());
            for i in 0..count {
                let total = vec2::add(vec2::at(&acceleration, i), vec2::at(&prior, i));
                vec2::accumulate(&mut velocity, i, vec2::scale(total, dt));
            }
        }
    }
}

impl LocalDynamics for PressureRelaxation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn exec(&self, dt: f64) {
        self.run(dt, false);
    }

    fn parallel_exec(&self, dt: f64) {
        self.run(dt, true);
    }
}

/// Second half-step: position drift completion and density rate.
///
/// Writes position (half drift), the `density_rate` field from the
/// velocity divergence
///
/// `drho_i/dt = rho_i * sum_j (v_i - v_j) . e_ij dW_ij V_j`
///
/// (wall term with the wall's velocity), and density (half step).
pub struct DensityRelaxation {
    inner: Rc<InnerRelation>,
    binding: FluidBinding,
    density_rate: ScalarField,
    position: VectorField,
    wall: Option<(Rc<ContactRelation>, WallBinding)>,
}

impl DensityRelaxation {
    const NAME: &'static str = "density_relaxation";

    /// Relaxation over one fluid body's inner neighborhood.
    pub fn new(inner: &Rc<InnerRelation>) -> Result<Self, BindingError> {
        Self::build(inner, None)
    }

    /// Relaxation including a wall-boundary term.
    pub fn with_wall(
        inner: &Rc<InnerRelation>,
        contact: &Rc<ContactRelation>,
    ) -> Result<Self, BindingError> {
        debug_assert_eq!(
            inner.body().id(),
            contact.source().id(),
            "contact relation must govern the same body as the inner relation"
        );
        let wall = (
            Rc::clone(contact),
            WallBinding::bind(contact.target(), Self::NAME)?,
        );
        Self::build(inner, Some(wall))
    }

    fn build(
        inner: &Rc<InnerRelation>,
        wall: Option<(Rc<ContactRelation>, WallBinding)>,
    ) -> Result<Self, BindingError> {
        let store = inner.body().store();
        Ok(Self {
            binding: FluidBinding::bind(inner.body(), Self::NAME)?,
            density_rate: resolve_scalar(store, "density_rate", Self::NAME)?,
            position: resolve_vector(store, "position", Self::NAME)?,
            inner: Rc::clone(inner),
            wall,
        })
    }

    fn run(&self, dt: f64, parallel: bool) {
        let store = self.binding.store();
        debug_assert!(!self.binding.is_stale());
        debug_assert_eq!(self.inner.revision(), store.revision());
        let dt = dt as f32;
        let count = store.len();

        // Complete the position drift.
        {
            let velocity = store.vector(self.binding.velocity());
            let mut position = store.vector_mut(self.position);
            for i in 0..count {
                let drift = vec2::scale(vec2::at(&velocity, i), 0.5 * dt);
                vec2::accumulate(&mut position, i, drift);
            }
        }

        // Velocity divergence.
        {
            let density = store.scalar(self.binding.density());
            let velocity = store.vector(self.binding.velocity());
            let volume = store.scalar(self.binding.volume());
            let neighborhoods = self.inner.neighborhoods();
            let mut density_rate = store.scalar_mut(self.density_rate);

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

            let divergence = |i: usize, velocity_j: &[f32], volume_j: &[f32], nbh: &[Neighbor]| {
                let vel_i = vec2::at(velocity, i);
                let mut div = 0.0f32;
                for nb in nbh {
                    let dv = vec2::sub(vel_i, vec2::at(velocity_j, nb.index as usize));
                    div += vec2::dot(dv, nb.e) * nb.dw * volume_j[nb.index as usize];
                }
                div
            };

            let update = |i: usize, rate: &mut f32| {
                let mut div = divergence(i, velocity, volume, &neighborhoods[i]);
                if let Some((wall_nbh, wall_vel, wall_vol)) = wall_views {
                    div += divergence(i, wall_vel, wall_vol, &wall_nbh[i]);
                }
                *rate = density[i] * div;
            };

            if parallel {
                density_rate
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(i, rate)| update(i, rate));
            } else {
                for (i, rate) in density_rate.iter_mut().enumerate() {
                    update(i, rate);
                }
            }
        }

        // Remaining half density step.
        {
            let density_rate = store.scalar(self.density_rate);
            let mut density = store.scalar_mut(self.binding.density());
            for i in 0..count {
                density[i] += 0.5 * dt * density_rate[i];
            }
        }
    }
}

impl LocalDynamics for DensityRelaxation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn exec(&self, dt: f64) {
        self.run(dt, false);
    }

    fn parallel_exec(&self, dt: f64) {
        self.run(dt, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seiche_body::fields::{DENSITY, POSITION, VELOCITY};
    use seiche_body::{Adaptation, Body, WeaklyCompressibleFluid};
    use seiche_test_utils::fluid_block;

    #[test]
    fn rest_state_is_a_fixed_point() {
        // Uniform lattice at rest density, zero velocity, no body
        // force: both half-steps must leave the state untouched.
        let body = fluid_block(5, 5, 0.1, 1e-3);
        let inner = Rc::new(InnerRelation::new(Rc::clone(&body)));
        let pressure = PressureRelaxation::new(&inner).unwrap();
        let density = DensityRelaxation::new(&inner).unwrap();

        let pos_before = body.store().vector(POSITION).to_vec();
        let rho_before = body.store().scalar(DENSITY).to_vec();

        pressure.exec(1e-4);
        density.exec(1e-4);

        assert_eq!(body.store().vector(POSITION).to_vec(), pos_before);
        assert_eq!(body.store().scalar(DENSITY).to_vec(), rho_before);
        assert!(body
            .store()
            .vector(VELOCITY)
            .iter()
            .all(|&v| v == 0.0));
    }

    #[test]
    fn missing_relaxation_fields_fail_at_construction() {
        // A body without the pressure/density_rate scalars cannot host
        // the relaxation kernels.
        let bare = Rc::new(Body::new(
            "bare",
            Box::new(WeaklyCompressibleFluid::new(1000.0, 10.0, 1e-3)),
            Adaptation::new(0.1),
        ));
        let inner = Rc::new(InnerRelation::new(bare));
        let err = PressureRelaxation::new(&inner).unwrap_err();
        assert!(matches!(err, BindingError::MissingField { .. }));
    }

    #[test]
    fn compressed_block_accelerates_corner_particles_outward() {
        let body = fluid_block(3, 3, 0.1, 1e-3);
        {
            // 1% over rest density: positive pressure everywhere.
            let mut density = body.store().scalar_mut(DENSITY);
            density.iter_mut().for_each(|rho| *rho *= 1.01);
        }
        let inner = Rc::new(InnerRelation::new(Rc::clone(&body)));
        let kernel = PressureRelaxation::new(&inner).unwrap();
        kernel.exec(1e-5);

        let velocity = body.store().vector(VELOCITY);
        // Corner particle (lower-left) is pushed down-left; the center
        // particle sees a symmetric neighborhood and stays put.
        let corner = vec2::at(&velocity, 0);
        assert!(corner[0] < 0.0 && corner[1] < 0.0);
        let center = vec2::at(&velocity, 4);
        assert!(vec2::norm(center) < vec2::norm(corner) * 1e-3);
    }

    #[test]
    fn approaching_particles_raise_density() {
        let body = fluid_block(2, 1, 0.1, 1e-3);
        {
            let mut velocity = body.store().vector_mut(VELOCITY);
            vec2::set(&mut velocity, 0, [0.5, 0.0]);
            vec2::set(&mut velocity, 1, [-0.5, 0.0]);
        }
        let inner = Rc::new(InnerRelation::new(Rc::clone(&body)));
        let kernel = DensityRelaxation::new(&inner).unwrap();

        let rho_before = body.store().scalar(DENSITY).to_vec();
        kernel.exec(1e-4);
        let rho_after = body.store().scalar(DENSITY);
        assert!(rho_after[0] > rho_before[0]);
        assert!(rho_after[1] > rho_before[1]);
    }

    #[test]
    fn drift_halves_compose_to_full_step() {
        let body = fluid_block(1, 1, 0.1, 1e-3);
        vec2::set(&mut body.store().vector_mut(VELOCITY), 0, [1.0, 2.0]);
        let start = vec2::at(&body.store().vector(POSITION), 0);

        let inner = Rc::new(InnerRelation::new(Rc::clone(&body)));
        let pressure = PressureRelaxation::new(&inner).unwrap();
        let density = DensityRelaxation::new(&inner).unwrap();

        let dt = 1e-3;
        pressure.exec(dt);
        density.exec(dt);

        let end = vec2::at(&body.store().vector(POSITION), 0);
        // An isolated particle keeps its velocity, so the two half
        // drifts add up to dt * v exactly.
        assert!((end[0] - (start[0] + 1.0e-3)).abs() < 1e-6);
        assert!((end[1] - (start[1] + 2.0e-3)).abs() < 1e-6);
    }
}
