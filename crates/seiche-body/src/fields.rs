//! Handles and names of the standard per-particle fields.
//!
//! Every [`ParticleStore`](crate::ParticleStore) registers these at
//! construction, in this order, so the handles are compile-time
//! constants. Kernel-specific fields registered afterwards get the
//! subsequent indices.

use seiche_core::{ScalarField, VectorField};

/// Particle position.
pub const POSITION: VectorField = VectorField(0);
/// Particle velocity.
pub const VELOCITY: VectorField = VectorField(1);
/// Acceleration from the pressure-relaxation pass.
pub const ACCELERATION: VectorField = VectorField(2);
/// Accumulated prior acceleration: body forces, viscous shear, and any
/// other contribution computed before the pressure relaxation.
pub const PRIOR_ACCELERATION: VectorField = VectorField(3);

/// Mass density.
pub const DENSITY: ScalarField = ScalarField(0);
/// Particle mass.
pub const MASS: ScalarField = ScalarField(1);
/// Particle volume.
pub const VOLUME: ScalarField = ScalarField(2);

/// Registered names of the standard vector fields, in handle order.
pub const STANDARD_VECTORS: [&str; 4] =
    ["position", "velocity", "acceleration", "prior_acceleration"];

/// Registered names of the standard scalar fields, in handle order.
pub const STANDARD_SCALARS: [&str; 3] = ["density", "mass", "volume"];
