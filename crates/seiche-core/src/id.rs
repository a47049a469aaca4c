//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Counter for unique [`BodyId`] allocation.
static BODY_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Unique per-instance identifier for a particle body.
///
/// Allocated from a monotonic atomic counter via [`BodyId::next`]. Two
/// distinct bodies always have different IDs, even when their geometry
/// and material coincide. Bindings and relations record the ID of the
/// body they were constructed against so that mismatched invocations
/// can be caught in debug builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u32);

impl BodyId {
    /// Allocate a fresh, unique body ID.
    ///
    /// Each call returns an ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(BODY_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonically increasing step counter.
///
/// Incremented each time the driver completes one advection step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(pub u64);

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StepId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Tracks the structural layout of a particle store.
///
/// Incremented whenever the store's particle count changes (injection,
/// deletion, compaction). Bindings and relations record the revision
/// they resolved against, enabling staleness detection after a resize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreRevision(pub u64);

impl StoreRevision {
    /// The revision following this one.
    pub fn bumped(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for StoreRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_ids_are_unique() {
        let a = BodyId::next();
        let b = BodyId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn revision_bump_is_monotonic() {
        let r = StoreRevision::default();
        assert!(r.bumped() > r);
        assert_eq!(r.bumped().bumped(), StoreRevision(2));
    }
}
