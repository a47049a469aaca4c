//! Per-body spatial resolution constants.

/// Immutable resolution descriptor, fixed at body creation.
///
/// Holds the reference particle spacing and the smoothing ratio that
/// together determine the smoothing length used to scale every
/// interaction kernel on the body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Adaptation {
    spacing: f32,
    smoothing_ratio: f32,
}

impl Adaptation {
    /// Create an adaptation with the conventional smoothing ratio 1.3.
    pub fn new(spacing: f32) -> Self {
        Self::with_ratio(spacing, 1.3)
    }

    /// Create an adaptation with an explicit smoothing ratio.
    pub fn with_ratio(spacing: f32, smoothing_ratio: f32) -> Self {
        debug_assert!(spacing > 0.0 && smoothing_ratio > 0.0);
        Self {
            spacing,
            smoothing_ratio,
        }
    }

    /// Reference particle spacing.
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Reference smoothing length `h = ratio * spacing`.
    pub fn smoothing_length(&self) -> f32 {
        self.smoothing_ratio * self.spacing
    }

    /// Interaction cutoff radius (the smoothing kernel's support, `2h`).
    pub fn kernel_cutoff(&self) -> f32 {
        2.0 * self.smoothing_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoothing_length_scales_with_spacing() {
        let a = Adaptation::new(0.1);
        assert!((a.smoothing_length() - 0.13).abs() < 1e-6);
        assert!((a.kernel_cutoff() - 0.26).abs() < 1e-6);
    }

    #[test]
    fn explicit_ratio_overrides_default() {
        let a = Adaptation::with_ratio(0.1, 1.0);
        assert_eq!(a.smoothing_length(), 0.1);
    }
}
