//! Error types for the seiche particle-dynamics engine.
//!
//! All failures in this workspace are setup-time failures: a kernel that
//! cannot resolve its state bindings, or a driver sequence whose time
//! step violates a stability bound. Per-step execution does not return
//! errors; numerical degeneracy is prevented upstream (neighbor lists
//! guard zero separations) and sequencing violations are caller bugs.

use std::error::Error;
use std::fmt;

/// Errors from resolving a kernel's state bindings at construction.
///
/// Returned by binding constructors before any simulation step runs, so
/// a physically invalid kernel/material pairing can never produce a
/// silently wrong result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindingError {
    /// The body's material does not provide the capability the kernel
    /// requires (e.g. a rigid solid passed to a fluid-only kernel).
    MaterialMismatch {
        /// Name of the kernel whose binding failed.
        dynamics: String,
        /// The material kind the kernel requires.
        expected: &'static str,
        /// The material kind the body actually carries.
        actual: &'static str,
    },
    /// The body's store does not carry a field the kernel needs.
    MissingField {
        /// Name of the kernel whose binding failed.
        dynamics: String,
        /// The missing field's registered name.
        field: String,
    },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaterialMismatch {
                dynamics,
                expected,
                actual,
            } => write!(
                f,
                "'{dynamics}' requires a {expected} material, body carries {actual}"
            ),
            Self::MissingField { dynamics, field } => {
                write!(f, "'{dynamics}' requires field '{field}' which the store lacks")
            }
        }
    }
}

impl Error for BindingError {}

/// Errors from validating a driver's kernel sequence (startup-time,
/// never per-step).
#[derive(Clone, Debug, PartialEq)]
pub enum SequenceError {
    /// No kernels registered.
    EmptySequence,
    /// The configured dt is not a valid time step (NaN, infinite, zero,
    /// or negative).
    InvalidDt {
        /// The invalid dt value.
        value: f64,
    },
    /// The configured dt exceeds a kernel's stability bound.
    DtTooLarge {
        /// The dt that was requested.
        configured_dt: f64,
        /// The tightest stability bound across the sequence.
        max_supported: f64,
        /// Which kernel constrains it.
        constraining_dynamics: String,
    },
    /// A kernel's `max_dt()` returned a non-finite or non-positive value.
    InvalidMaxDt {
        /// Which kernel.
        dynamics: String,
        /// The invalid max_dt value.
        value: f64,
    },
}

impl fmt::Display for SequenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySequence => write!(f, "kernel sequence is empty"),
            Self::InvalidDt { value } => {
                write!(f, "dt must be finite and positive, got {value}")
            }
            Self::DtTooLarge {
                configured_dt,
                max_supported,
                constraining_dynamics,
            } => write!(
                f,
                "dt {configured_dt} exceeds max_dt {max_supported} \
                 (constrained by '{constraining_dynamics}')"
            ),
            Self::InvalidMaxDt { dynamics, value } => write!(
                f,
                "kernel '{dynamics}' returned invalid max_dt: {value} \
                 (must be finite and positive)"
            ),
        }
    }
}

impl Error for SequenceError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_mismatch_names_both_kinds() {
        let err = BindingError::MaterialMismatch {
            dynamics: "viscous_acceleration".into(),
            expected: "weakly_compressible_fluid",
            actual: "solid",
        };
        let msg = err.to_string();
        assert!(msg.contains("viscous_acceleration"));
        assert!(msg.contains("weakly_compressible_fluid"));
        assert!(msg.contains("solid"));
    }

    #[test]
    fn sequence_error_names_constraining_kernel() {
        let err = SequenceError::DtTooLarge {
            configured_dt: 0.5,
            max_supported: 0.1,
            constraining_dynamics: "viscous_acceleration".into(),
        };
        assert!(err.to_string().contains("viscous_acceleration"));
    }
}
