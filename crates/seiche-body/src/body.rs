//! The [`Body`]: a named particle group with one material and one
//! resolution descriptor.

use seiche_core::BodyId;

use crate::adaptation::Adaptation;
use crate::material::Material;
use crate::store::ParticleStore;

/// A named collection of particles sharing one material and one
/// spatial adaptation.
///
/// Bodies are shared (`Rc<Body>`) between the driver, relations, and
/// kernel bindings; mutation of particle state goes through the store's
/// interior mutability, under the driver's sequencing discipline.
pub struct Body {
    id: BodyId,
    name: String,
    store: ParticleStore,
    material: Box<dyn Material>,
    adaptation: Adaptation,
}

impl Body {
    /// Create an empty body. The material is attached here and never
    /// reassigned.
    pub fn new(name: impl Into<String>, material: Box<dyn Material>, adaptation: Adaptation) -> Self {
        Self {
            id: BodyId::next(),
            name: name.into(),
            store: ParticleStore::new(),
            material,
            adaptation,
        }
    }

    /// Create an empty body with extra kernel-specific fields
    /// registered beyond the standard set.
    pub fn with_fields(
        name: impl Into<String>,
        material: Box<dyn Material>,
        adaptation: Adaptation,
        extra_scalars: &[&str],
        extra_vectors: &[&str],
    ) -> Self {
        let mut body = Self::new(name, material, adaptation);
        for field in extra_scalars {
            body.store.register_scalar(field);
        }
        for field in extra_vectors {
            body.store.register_vector(field);
        }
        body
    }

    /// Unique body ID.
    pub fn id(&self) -> BodyId {
        self.id
    }

    /// Body name, for error messages and logging.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The particle state store.
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// The attached material.
    pub fn material(&self) -> &dyn Material {
        self.material.as_ref()
    }

    /// The resolution descriptor.
    pub fn adaptation(&self) -> &Adaptation {
        &self.adaptation
    }

    /// Current particle count.
    pub fn particle_count(&self) -> usize {
        self.store.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Solid, WeaklyCompressibleFluid};

    #[test]
    fn body_exposes_material_and_adaptation() {
        let body = Body::new(
            "water",
            Box::new(WeaklyCompressibleFluid::new(1000.0, 10.0, 1e-3)),
            Adaptation::new(0.05),
        );
        assert_eq!(body.name(), "water");
        assert_eq!(body.material().kind(), WeaklyCompressibleFluid::KIND);
        assert_eq!(body.particle_count(), 0);
        assert!((body.adaptation().smoothing_length() - 0.065).abs() < 1e-6);
    }

    #[test]
    fn extra_fields_are_registered() {
        let body = Body::with_fields(
            "wall",
            Box::new(Solid::new(1000.0)),
            Adaptation::new(0.05),
            &["pressure"],
            &["normal"],
        );
        assert!(body.store().scalar_handle("pressure").is_some());
        assert!(body.store().vector_handle("normal").is_some());
    }
}
