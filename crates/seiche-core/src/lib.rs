//! Core types for the seiche particle-dynamics engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary used throughout the seiche workspace:
//! type IDs, field handles, error types, and 2-D vector helpers.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod field;
pub mod id;
pub mod vec2;

pub use error::{BindingError, SequenceError};
pub use field::{ScalarField, VectorField};
pub use id::{BodyId, StepId, StoreRevision};
pub use vec2::{Vec2, DIM};
