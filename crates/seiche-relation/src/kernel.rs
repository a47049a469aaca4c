//! The Wendland C2 smoothing kernel, normalized for two dimensions.

use std::f32::consts::PI;

/// Wendland C2 kernel with compact support `2h`.
///
/// `W(q) = alpha * (1 - q/2)^4 * (2q + 1)` for `q = r/h in [0, 2]`,
/// with `alpha = 7 / (4 pi h^2)` in 2-D. The radial derivative is
/// `dW/dr = -(5 alpha / h) * q * (1 - q/2)^3`, non-positive over the
/// whole support.
#[derive(Clone, Copy, Debug)]
pub struct WendlandC2 {
    h: f32,
    inv_h: f32,
    alpha: f32,
}

impl WendlandC2 {
    /// Kernel for smoothing length `h`.
    pub fn new(h: f32) -> Self {
        debug_assert!(h > 0.0);
        Self {
            h,
            inv_h: 1.0 / h,
            alpha: 7.0 / (4.0 * PI * h * h),
        }
    }

    /// Smoothing length `h`.
    pub fn smoothing_length(&self) -> f32 {
        self.h
    }

    /// Support radius `2h`: pairs farther apart do not interact.
    pub fn cutoff(&self) -> f32 {
        2.0 * self.h
    }

    /// Kernel value at zero separation (the self-contribution weight).
    pub fn w0(&self) -> f32 {
        self.alpha
    }

    /// Kernel value at separation `r`.
    pub fn w(&self, r: f32) -> f32 {
        let q = r * self.inv_h;
        if q >= 2.0 {
            return 0.0;
        }
        let t = 1.0 - 0.5 * q;
        self.alpha * t * t * t * t * (2.0 * q + 1.0)
    }

    /// Radial derivative `dW/dr` at separation `r`. Non-positive.
    pub fn dw(&self, r: f32) -> f32 {
        let q = r * self.inv_h;
        if q >= 2.0 {
            return 0.0;
        }
        let t = 1.0 - 0.5 * q;
        -5.0 * self.alpha * self.inv_h * q * t * t * t
    }
}
