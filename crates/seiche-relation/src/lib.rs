//! Neighbor topology for the seiche SPH engine.
//!
//! A relation maps each particle of a body to its interacting
//! neighbors — within the same body ([`InnerRelation`]) or across
//! bodies ([`ContactRelation`]) — with the smoothing-kernel weight and
//! gradient precomputed per pair. Relations are rebuilt by an external
//! configuration-update step as particles move; kernels only read the
//! current snapshot during one invocation.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod grid;
pub mod kernel;
pub mod neighbor;
pub mod relation;

pub use grid::CellGrid;
pub use kernel::WendlandC2;
pub use neighbor::Neighbor;
pub use relation::{BodyRelation, ContactRelation, InnerRelation};
