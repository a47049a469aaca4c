//! Startup-time validation of a driver's kernel sequence.
//!
//! Runs once when the driver is assembled, never per step: the checks
//! here turn misconfiguration (an unstable time step, an empty
//! sequence) into an immediate, attributed setup failure.

use seiche_core::SequenceError;

use crate::dynamics::LocalDynamics;

/// Tightest stability bound across a kernel sequence, with the kernel
/// that imposes it.
///
/// Fails if the sequence is empty or any kernel reports a non-finite
/// or non-positive `max_dt()`. Returns `None` when no kernel imposes a
/// bound. Adaptive drivers use this at assembly time and clamp their
/// per-step dt to the bound.
pub fn stability_bound(
    dynamics: &[&dyn LocalDynamics],
) -> Result<Option<(f64, String)>, SequenceError> {
    if dynamics.is_empty() {
        return Err(SequenceError::EmptySequence);
    }

    let mut bound: Option<(f64, String)> = None;
    for kernel in dynamics {
        if let Some(max) = kernel.max_dt() {
            if !max.is_finite() || max <= 0.0 {
                return Err(SequenceError::InvalidMaxDt {
                    dynamics: kernel.name().to_string(),
                    value: max,
                });
            }
            if bound.as_ref().is_none_or(|(tightest, _)| max < *tightest) {
                bound = Some((max, kernel.name().to_string()));
            }
        }
    }
    Ok(bound)
}

/// Validate a kernel sequence against a fixed, configured time step.
///
/// Checks performed:
///
/// 1. `dt` is finite and positive.
/// 2. The sequence is non-empty.
/// 3. Every kernel's `max_dt()` is finite and positive.
/// 4. `dt <= min(max_dt)` across the sequence, with the constraining
///    kernel named on failure.
pub fn validate_sequence(
    dynamics: &[&dyn LocalDynamics],
    dt: f64,
) -> Result<(), SequenceError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(SequenceError::InvalidDt { value: dt });
    }

    if let Some((max_supported, constraining_dynamics)) = stability_bound(dynamics)? {
        if dt > max_supported {
            return Err(SequenceError::DtTooLarge {
                configured_dt: dt,
                max_supported,
                constraining_dynamics,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Unconstrained;
    impl LocalDynamics for Unconstrained {
        fn name(&self) -> &str {
            "unconstrained"
        }
        fn exec(&self, _dt: f64) {}
    }

    struct Constrained {
        name: &'static str,
        max: f64,
    }
    impl LocalDynamics for Constrained {
        fn name(&self) -> &str {
            self.name
        }
        fn max_dt(&self) -> Option<f64> {
            Some(self.max)
        }
        fn exec(&self, _dt: f64) {}
    }

    #[test]
    fn valid_sequence_accepted() {
        let a = Unconstrained;
        let b = Constrained {
            name: "loose",
            max: 0.5,
        };
        assert!(validate_sequence(&[&a, &b], 0.5).is_ok());
        assert!(validate_sequence(&[&a, &b], 0.1).is_ok());
    }

    #[test]
    fn empty_sequence_rejected() {
        assert!(matches!(
            validate_sequence(&[], 0.1),
            Err(SequenceError::EmptySequence)
        ));
    }

    #[test]
    fn invalid_dt_rejected() {
        let a = Unconstrained;
        for dt in [0.0, -0.1, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                validate_sequence(&[&a], dt),
                Err(SequenceError::InvalidDt { .. })
            ));
        }
    }

    #[test]
    fn dt_above_bound_names_constraining_kernel() {
        let a = Constrained {
            name: "loose",
            max: 0.5,
        };
        let b = Constrained {
            name: "tight",
            max: 0.2,
        };
        match validate_sequence(&[&a, &b], 0.3) {
            Err(SequenceError::DtTooLarge {
                configured_dt,
                max_supported,
                constraining_dynamics,
            }) => {
                assert_eq!(configured_dt, 0.3);
                assert_eq!(max_supported, 0.2);
                assert_eq!(constraining_dynamics, "tight");
            }
            other => panic!("expected DtTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn invalid_max_dt_rejected() {
        for max in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let a = Constrained { name: "bad", max };
            assert!(matches!(
                validate_sequence(&[&a], 0.1),
                Err(SequenceError::InvalidMaxDt { .. })
            ));
        }
    }
}
