//! The structure-of-arrays particle state store.
//!
//! [`ParticleStore`] owns one buffer per registered field, all sharing
//! a single particle count. Buffers sit behind `RefCell` so that a
//! kernel holding a shared body handle can take exclusive write access
//! to its declared output field while reading others; the driver's step
//! sequencing guarantees at most one writer per field per pass, and a
//! borrow conflict therefore indicates a sequencing bug, not a
//! recoverable condition.

use std::cell::{Cell, Ref, RefCell, RefMut};

use indexmap::IndexMap;
use seiche_core::{ScalarField, StoreRevision, VectorField, DIM};

use crate::fields;

/// Per-body particle state: parallel arrays indexed by particle id.
///
/// Invariants:
/// - every buffer has length `len` (scalars) or `len * DIM` (vectors);
/// - any structural resize reallocates all buffers together and bumps
///   the [`StoreRevision`];
/// - particle ids are stable within a step; a compaction between steps
///   invalidates them.
pub struct ParticleStore {
    len: Cell<usize>,
    revision: Cell<StoreRevision>,
    scalar_names: IndexMap<String, ScalarField>,
    vector_names: IndexMap<String, VectorField>,
    scalars: Vec<RefCell<Vec<f32>>>,
    vectors: Vec<RefCell<Vec<f32>>>,
}

impl ParticleStore {
    /// Create an empty store carrying the standard fields
    /// (position, velocity, accelerations, density, mass, volume).
    pub fn new() -> Self {
        let mut store = Self {
            len: Cell::new(0),
            revision: Cell::new(StoreRevision::default()),
            scalar_names: IndexMap::new(),
            vector_names: IndexMap::new(),
            scalars: Vec::new(),
            vectors: Vec::new(),
        };
        for name in fields::STANDARD_VECTORS {
            store.register_vector(name);
        }
        for name in fields::STANDARD_SCALARS {
            store.register_scalar(name);
        }
        store
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.len.get()
    }

    /// Whether the store holds no particles.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Current structural revision. Bumped by any resize.
    pub fn revision(&self) -> StoreRevision {
        self.revision.get()
    }

    /// Register a scalar field under `name` and return its handle.
    ///
    /// Re-registering an existing name returns the existing handle.
    /// The new buffer is zero-filled to the current particle count.
    pub fn register_scalar(&mut self, name: &str) -> ScalarField {
        if let Some(&handle) = self.scalar_names.get(name) {
            return handle;
        }
        let handle = ScalarField(self.scalars.len() as u32);
        self.scalar_names.insert(name.to_string(), handle);
        self.scalars.push(RefCell::new(vec![0.0; self.len()]));
        handle
    }

    /// Register a vector field under `name` and return its handle.
    ///
    /// Re-registering an existing name returns the existing handle.
    pub fn register_vector(&mut self, name: &str) -> VectorField {
        if let Some(&handle) = self.vector_names.get(name) {
            return handle;
        }
        let handle = VectorField(self.vectors.len() as u32);
        self.vector_names.insert(name.to_string(), handle);
        self.vectors.push(RefCell::new(vec![0.0; self.len() * DIM]));
        handle
    }

    /// Resolve a registered scalar field by name.
    pub fn scalar_handle(&self, name: &str) -> Option<ScalarField> {
        self.scalar_names.get(name).copied()
    }

    /// Resolve a registered vector field by name.
    pub fn vector_handle(&self, name: &str) -> Option<VectorField> {
        self.vector_names.get(name).copied()
    }

    /// Registered name of a scalar field handle.
    pub fn scalar_name(&self, field: ScalarField) -> &str {
        self.scalar_names
            .get_index(field.0 as usize)
            .map(|(name, _)| name.as_str())
            .unwrap_or("<unregistered>")
    }

    /// Registered name of a vector field handle.
    pub fn vector_name(&self, field: VectorField) -> &str {
        self.vector_names
            .get_index(field.0 as usize)
            .map(|(name, _)| name.as_str())
            .unwrap_or("<unregistered>")
    }

    /// Shared read access to a scalar field's buffer.
    ///
    /// Panics if the field is currently write-borrowed: that means two
    /// kernels targeting the same field ran concurrently, which the
    /// driver must prevent by sequencing.
    pub fn scalar(&self, field: ScalarField) -> Ref<'_, [f32]> {
        match self.scalars[field.0 as usize].try_borrow() {
            Ok(buf) => Ref::map(buf, |v| v.as_slice()),
            Err(_) => panic!(
                "scalar field '{}' is write-locked by another kernel",
                self.scalar_name(field)
            ),
        }
    }

    /// Exclusive write access to a scalar field's buffer.
    pub fn scalar_mut(&self, field: ScalarField) -> RefMut<'_, [f32]> {
        match self.scalars[field.0 as usize].try_borrow_mut() {
            Ok(buf) => RefMut::map(buf, |v| v.as_mut_slice()),
            Err(_) => panic!(
                "scalar field '{}' is already borrowed by another kernel",
                self.scalar_name(field)
            ),
        }
    }

    /// Shared read access to a vector field's flattened buffer.
    pub fn vector(&self, field: VectorField) -> Ref<'_, [f32]> {
        match self.vectors[field.0 as usize].try_borrow() {
            Ok(buf) => Ref::map(buf, |v| v.as_slice()),
            Err(_) => panic!(
                "vector field '{}' is write-locked by another kernel",
                self.vector_name(field)
            ),
        }
    }

    /// Exclusive write access to a vector field's flattened buffer.
    pub fn vector_mut(&self, field: VectorField) -> RefMut<'_, [f32]> {
        match self.vectors[field.0 as usize].try_borrow_mut() {
            Ok(buf) => RefMut::map(buf, |v| v.as_mut_slice()),
            Err(_) => panic!(
                "vector field '{}' is already borrowed by another kernel",
                self.vector_name(field)
            ),
        }
    }

    /// Append one zero-initialized particle to every field and return
    /// its index. Bumps the revision.
    ///
    /// Must only be called between kernel invocations; existing
    /// bindings and relations become stale.
    pub fn push_particle(&self) -> usize {
        let index = self.len();
        for buf in &self.scalars {
            buf.borrow_mut().push(0.0);
        }
        for buf in &self.vectors {
            let mut buf = buf.borrow_mut();
            buf.extend_from_slice(&[0.0; DIM]);
        }
        self.len.set(index + 1);
        self.revision.set(self.revision().bumped());
        index
    }

    /// Compact the store, keeping only particles for which `keep`
    /// returns `true`. Bumps the revision and invalidates particle ids.
    ///
    /// Must only be called between kernel invocations.
    pub fn retain(&self, keep: impl Fn(usize) -> bool) {
        let old_len = self.len();
        let kept: Vec<usize> = (0..old_len).filter(|&i| keep(i)).collect();
        for buf in &self.scalars {
            let mut buf = buf.borrow_mut();
            let packed: Vec<f32> = kept.iter().map(|&i| buf[i]).collect();
            *buf = packed;
        }
        for buf in &self.vectors {
            let mut buf = buf.borrow_mut();
            let mut packed = Vec::with_capacity(kept.len() * DIM);
            for &i in &kept {
                packed.extend_from_slice(&buf[i * DIM..(i + 1) * DIM]);
            }
            *buf = packed;
        }
        self.len.set(kept.len());
        self.revision.set(self.revision().bumped());
    }
}

impl Default for ParticleStore {
    fn default() -> Self {
        Self::new()
    }
}
