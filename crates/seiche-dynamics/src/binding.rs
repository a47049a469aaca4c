//! Construction-time state bindings.
//!
//! A binding resolves, once, the exact state a kernel needs from a
//! body: field handles out of the particle store, derived constants out
//! of the material (after a checked capability downcast), and the
//! reference smoothing length out of the adaptation. After `bind`
//! succeeds the owning kernel reaches all of that state with plain
//! indexed access.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use seiche_body::{Body, Material, ParticleStore, WeaklyCompressibleFluid};
use seiche_core::{BindingError, ScalarField, StoreRevision, VectorField};

/// Resolve a named scalar field or fail with the kernel's name.
pub fn resolve_scalar(
    store: &ParticleStore,
    name: &str,
    dynamics: &str,
) -> Result<ScalarField, BindingError> {
    store
        .scalar_handle(name)
        .ok_or_else(|| BindingError::MissingField {
            dynamics: dynamics.to_string(),
            field: name.to_string(),
        })
}

/// Resolve a named vector field or fail with the kernel's name.
pub fn resolve_vector(
    store: &ParticleStore,
    name: &str,
    dynamics: &str,
) -> Result<VectorField, BindingError> {
    store
        .vector_handle(name)
        .ok_or_else(|| BindingError::MissingField {
            dynamics: dynamics.to_string(),
            field: name.to_string(),
        })
}

/// State binding for kernels acting on a weakly compressible fluid
/// body.
///
/// Construction performs the one-time capability check: the body's
/// material must be a [`WeaklyCompressibleFluid`], or `bind` fails with
/// a [`BindingError::MaterialMismatch`] naming the expected and actual
/// kinds — before any simulation step runs.
pub struct FluidBinding {
    body: Rc<Body>,
    density: ScalarField,
    mass: ScalarField,
    volume: ScalarField,
    velocity: VectorField,
    acceleration: VectorField,
    prior_acceleration: VectorField,
    rho0: f32,
    sound_speed: f32,
    viscosity: f32,
    smoothing_length: f32,
    bound_against: Cell<StoreRevision>,
}

impl fmt::Debug for FluidBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluidBinding").finish_non_exhaustive()
    }
}

impl FluidBinding {
    /// Resolve the fluid state of `body` on behalf of the kernel named
    /// `dynamics`.
    pub fn bind(body: &Rc<Body>, dynamics: &str) -> Result<Self, BindingError> {
        let fluid = body
            .material()
            .downcast_ref::<WeaklyCompressibleFluid>()
            .ok_or_else(|| BindingError::MaterialMismatch {
                dynamics: dynamics.to_string(),
                expected: WeaklyCompressibleFluid::KIND,
                actual: body.material().kind(),
            })?;

        let store = body.store();
        let binding = Self {
            density: resolve_scalar(store, "density", dynamics)?,
            mass: resolve_scalar(store, "mass", dynamics)?,
            volume: resolve_scalar(store, "volume", dynamics)?,
            velocity: resolve_vector(store, "velocity", dynamics)?,
            acceleration: resolve_vector(store, "acceleration", dynamics)?,
            prior_acceleration: resolve_vector(store, "prior_acceleration", dynamics)?,
            rho0: fluid.reference_density(),
            sound_speed: fluid.sound_speed(),
            viscosity: fluid.reference_viscosity(),
            smoothing_length: body.adaptation().smoothing_length(),
            bound_against: Cell::new(store.revision()),
            body: Rc::clone(body),
        };
        Ok(binding)
    }

    /// The bound body.
    pub fn body(&self) -> &Rc<Body> {
        &self.body
    }

    /// The bound body's particle store.
    pub fn store(&self) -> &ParticleStore {
        self.body.store()
    }

    /// Density field handle.
    pub fn density(&self) -> ScalarField {
        self.density
    }

    /// Mass field handle.
    pub fn mass(&self) -> ScalarField {
        self.mass
    }

    /// Volume field handle.
    pub fn volume(&self) -> ScalarField {
        self.volume
    }

    /// Velocity field handle.
    pub fn velocity(&self) -> VectorField {
        self.velocity
    }

    /// Pressure-pass acceleration field handle.
    pub fn acceleration(&self) -> VectorField {
        self.acceleration
    }

    /// Prior-acceleration field handle (body forces, viscous shear).
    pub fn prior_acceleration(&self) -> VectorField {
        self.prior_acceleration
    }

    /// Reference density `rho0`, cached from the material.
    pub fn rho0(&self) -> f32 {
        self.rho0
    }

    /// Artificial sound speed `c0`, cached from the material.
    pub fn sound_speed(&self) -> f32 {
        self.sound_speed
    }

    /// Dynamic viscosity `mu`, cached from the material.
    pub fn viscosity(&self) -> f32 {
        self.viscosity
    }

    /// Reference smoothing length `h`, cached from the adaptation.
    pub fn smoothing_length(&self) -> f32 {
        self.smoothing_length
    }

    /// The fluid's linear equation of state, `c0^2 * (rho - rho0)`,
    /// evaluated from the cached constants.
    pub fn eos_pressure(&self, rho: f32) -> f32 {
        self.sound_speed * self.sound_speed * (rho - self.rho0)
    }

    /// Whether the store has been structurally resized since this
    /// binding was resolved (or last refreshed).
    ///
    /// Using a stale binding is a driver contract violation: resizes
    /// must happen between kernel invocations, followed by `refresh`
    /// and a relation rebuild.
    pub fn is_stale(&self) -> bool {
        self.bound_against.get() != self.body.store().revision()
    }

    /// Re-validate the binding in place after a structural resize.
    ///
    /// Field handles survive a resize (the registry never shrinks), so
    /// re-validation only re-reads the store revision.
    pub fn refresh(&self) {
        self.bound_against.set(self.body.store().revision());
    }
}

/// State binding for the target side of a contact relation (e.g. a
/// rigid wall).
///
/// Requires no material capability: any body exposing velocity and
/// volume can act as a boundary.
pub struct WallBinding {
    body: Rc<Body>,
    velocity: VectorField,
    volume: ScalarField,
}

impl WallBinding {
    /// Resolve the boundary state of `body` on behalf of the kernel
    /// named `dynamics`.
    pub fn bind(body: &Rc<Body>, dynamics: &str) -> Result<Self, BindingError> {
        let store = body.store();
        Ok(Self {
            velocity: resolve_vector(store, "velocity", dynamics)?,
            volume: resolve_scalar(store, "volume", dynamics)?,
            body: Rc::clone(body),
        })
    }

    /// The bound body.
    pub fn body(&self) -> &Rc<Body> {
        &self.body
    }

    /// The bound body's particle store.
    pub fn store(&self) -> &ParticleStore {
        self.body.store()
    }

    /// Velocity field handle.
    pub fn velocity(&self) -> VectorField {
        self.velocity
    }

    /// Volume field handle.
    pub fn volume(&self) -> ScalarField {
        self.volume
    }
}
