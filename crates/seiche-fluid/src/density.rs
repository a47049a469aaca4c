//! Summation density.

use std::rc::Rc;

use rayon::prelude::*;
use seiche_core::BindingError;
use seiche_dynamics::{FluidBinding, LocalDynamics, WallBinding};
use seiche_relation::{ContactRelation, InnerRelation, Neighbor};

/// Density evaluated by kernel summation over the neighborhood:
///
/// `rho_i = m_i W(0) + sum_j m_j W_ij`
///
/// plus, when constructed with a wall contact, the boundary
/// contribution `sum_w rho0 V_w W_iw` (wall samples carry the fluid's
/// rest density). Writes the density field; reads mass and topology
/// only.
pub struct DensitySummation {
    inner: Rc<InnerRelation>,
    binding: FluidBinding,
    wall: Option<(Rc<ContactRelation>, WallBinding)>,
    w0: f32,
}

impl DensitySummation {
    const NAME: &'static str = "density_summation";

    /// Summation over one fluid body's inner neighborhood.
    pub fn new(inner: &Rc<InnerRelation>) -> Result<Self, BindingError> {
        Ok(Self {
            binding: FluidBinding::bind(inner.body(), Self::NAME)?,
            w0: inner.kernel().w0(),
            inner: Rc::clone(inner),
            wall: None,
        })
    }

    /// Summation including a wall-boundary contribution.
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
            w0: inner.kernel().w0(),
            inner: Rc::clone(inner),
            wall: Some((
                Rc::clone(contact),
                WallBinding::bind(contact.target(), Self::NAME)?,
            )),
        })
    }

    fn run(&self, parallel: bool) {
        let store = self.binding.store();
        debug_assert!(!self.binding.is_stale());
        debug_assert_eq!(self.inner.revision(), store.revision());

        let rho0 = self.binding.rho0();
        let w0 = self.w0;

        let mass = store.scalar(self.binding.mass());
        let neighborhoods = self.inner.neighborhoods();
        let mut density = store.scalar_mut(self.binding.density());

        let mass: &[f32] = &mass;
        let neighborhoods: &[Vec<Neighbor>] = &neighborhoods;

        let wall = self.wall.as_ref().map(|(contact, binding)| {
            (
                contact.neighborhoods(),
                binding.store().scalar(binding.volume()),
            )
        });
        let wall_views = wall.as_ref().map(|(nbh, vol)| (&nbh[..], &vol[..]));

        let update = |i: usize, rho: &mut f32| {
            let mut sum = mass[i] * w0;
            for nb in &neighborhoods[i] {
                sum += mass[nb.index as usize] * nb.w;
            }
            if let Some((wall_nbh, wall_vol)) = wall_views {
                for nb in &wall_nbh[i] {
                    sum += rho0 * wall_vol[nb.index as usize] * nb.w;
                }
            }
            *rho = sum;
        };

        if parallel {
            density
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, rho)| update(i, rho));
        } else {
            for (i, rho) in density.iter_mut().enumerate() {
                update(i, rho);
            }
        }
    }
}

impl LocalDynamics for DensitySummation {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn exec(&self, _dt: f64) {
        self.run(false);
    }

    fn parallel_exec(&self, _dt: f64) {
        self.run(true);
    }
}
