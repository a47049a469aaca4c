//! Driver loop for the seiche SPH engine.
//!
//! The [`Stepper`] sequences one advection step: initialize, advection
//! kernels, the inner acoustic loop, then relation rebuilds — with the
//! happens-before guarantee that every configuration update completes
//! before the next interaction pass starts. Physical time is explicit
//! state in a [`SimulationClock`] threaded through the loop.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod clock;
pub mod metrics;
pub mod stepper;

pub use clock::SimulationClock;
pub use metrics::StepMetrics;
pub use stepper::{StepConfig, Stepper};
