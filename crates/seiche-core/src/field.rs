//! Typed handles into a particle store's field registry.
//!
//! Field names are resolved to handles once, at registration or binding
//! time. A handle is an index into the owning store's buffer table, so
//! per-step access is plain indexed lookup with no hashing and no
//! dynamic dispatch.

use std::fmt;

/// Handle to a scalar field (one `f32` per particle).
///
/// Valid only for the store that issued it; handles are never shared
/// across bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScalarField(pub u32);

impl fmt::Display for ScalarField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ScalarField {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Handle to a vector field (two `f32` components per particle, stored
/// flattened as `[n * 2]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VectorField(pub u32);

impl fmt::Display for VectorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VectorField {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
