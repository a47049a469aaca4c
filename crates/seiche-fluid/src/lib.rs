//! Weakly compressible fluid-dynamics kernels.
//!
//! Each kernel here is a [`LocalDynamics`](seiche_dynamics::LocalDynamics)
//! implementation: constructed once per simulation from a relation (its
//! state binding resolved and material capability checked at that
//! point), then invoked every step against the current topology
//! snapshot. Kernels write only their declared output field and
//! allocate no per-step state; the write target is the existing
//! particle store array.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod density;
pub mod initialization;
pub mod relaxation;
pub mod timestep;
pub mod viscous;

pub use density::DensitySummation;
pub use initialization::TimeStepInitialization;
pub use relaxation::{DensityRelaxation, PressureRelaxation};
pub use timestep::{AcousticTimeStep, AdvectionTimeStep};
pub use viscous::ViscousAcceleration;

/// Names of the extra fields the relaxation kernels need; register
/// them on fluid bodies via `Body::with_fields`.
pub const RELAXATION_SCALARS: [&str; 2] = ["pressure", "density_rate"];
