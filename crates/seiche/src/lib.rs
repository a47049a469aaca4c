//! Seiche: a smoothed-particle-hydrodynamics interaction engine.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all seiche sub-crates. For most users, adding `seiche` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::rc::Rc;
//! use seiche::prelude::*;
//!
//! // A 10x10 water column with the fields the relaxation kernels use.
//! let water = Body::with_fields(
//!     "water",
//!     Box::new(WeaklyCompressibleFluid::new(1000.0, 10.0, 1e-3)),
//!     Adaptation::new(0.05),
//!     &["pressure", "density_rate"],
//!     &[],
//! );
//! LatticeGenerator::new([0.0, 0.0], [0.5, 0.5]).populate(&water);
//! let water = Rc::new(water);
//!
//! // Topology plus the kernels, bound once.
//! let inner = Rc::new(InnerRelation::new(Rc::clone(&water)));
//! let config = StepConfig {
//!     initialize: vec![Box::new(
//!         TimeStepInitialization::new(&water, [0.0, -9.81]).unwrap(),
//!     )],
//!     advection: vec![Box::new(DensitySummation::new(&inner).unwrap())],
//!     acoustic: vec![
//!         Box::new(ViscousAcceleration::new(&inner).unwrap()),
//!         Box::new(PressureRelaxation::new(&inner).unwrap()),
//!         Box::new(DensityRelaxation::new(&inner).unwrap()),
//!     ],
//!     advection_criterion: Box::new(AdvectionTimeStep::new(&water, 1.0).unwrap()),
//!     acoustic_criterion: Box::new(AcousticTimeStep::new(&water).unwrap()),
//!     relations: vec![Rc::clone(&inner) as Rc<dyn BodyRelation>],
//!     parallel: false,
//! };
//!
//! let mut stepper = Stepper::new(config).unwrap();
//! let mut clock = SimulationClock::new();
//! stepper.advance(&mut clock);
//! assert!(clock.time() > 0.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `seiche-core` | IDs, field handles, errors, vector helpers |
//! | [`body`] | `seiche-body` | Bodies, particle stores, materials, generation |
//! | [`relation`] | `seiche-relation` | Neighbor topology and smoothing kernels |
//! | [`dynamics`] | `seiche-dynamics` | Kernel traits, bindings, sequence validation |
//! | [`fluid`] | `seiche-fluid` | Weakly compressible fluid kernels |
//! | [`engine`] | `seiche-engine` | Driver loop, clock, step metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and errors (`seiche-core`).
pub use seiche_core as types;

/// Bodies, particle stores, and materials (`seiche-body`).
pub use seiche_body as body;

/// Neighbor topology and smoothing kernels (`seiche-relation`).
pub use seiche_relation as relation;

/// Kernel traits, bindings, and sequence validation
/// (`seiche-dynamics`).
pub use seiche_dynamics as dynamics;

/// Weakly compressible fluid kernels (`seiche-fluid`).
pub use seiche_fluid as fluid;

/// Driver loop, clock, and step metrics (`seiche-engine`).
pub use seiche_engine as engine;

/// Common imports for typical seiche usage.
///
/// ```rust
/// use seiche::prelude::*;
/// ```
pub mod prelude {
    // Core types and errors
    pub use seiche_core::{
        BindingError, BodyId, ScalarField, SequenceError, StepId, StoreRevision, Vec2,
        VectorField,
    };

    // Bodies and materials
    pub use seiche_body::{
        Adaptation, Body, LatticeGenerator, Material, ParticleStore, Solid,
        WeaklyCompressibleFluid,
    };

    // Topology
    pub use seiche_relation::{
        BodyRelation, ContactRelation, InnerRelation, Neighbor, WendlandC2,
    };

    // Kernel traits and bindings
    pub use seiche_dynamics::{FluidBinding, LocalDynamics, ReduceDynamics, WallBinding};

    // Fluid kernels
    pub use seiche_fluid::{
        AcousticTimeStep, AdvectionTimeStep, DensityRelaxation, DensitySummation,
        PressureRelaxation, TimeStepInitialization, ViscousAcceleration,
    };

    // Driver
    pub use seiche_engine::{SimulationClock, StepConfig, StepMetrics, Stepper};
}
