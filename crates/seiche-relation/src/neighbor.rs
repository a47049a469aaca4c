//! The per-pair neighbor record.

use seiche_core::Vec2;

/// One precomputed interaction pair, as seen from the governed
/// particle `i`.
///
/// `e` is the unit vector from the neighbor toward `i`, so the kernel
/// gradient with respect to `i`'s position is `dw * e`. Pairs with
/// degenerate (near-zero) separation are filtered out when the
/// topology is built; interaction kernels can divide by `r` freely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Index of the neighbor particle in its owning store.
    pub index: u32,
    /// Kernel weight `W(r)`.
    pub w: f32,
    /// Radial kernel derivative `dW/dr` (non-positive).
    pub dw: f32,
    /// Separation distance `|pos_i - pos_j|`.
    pub r: f32,
    /// Unit vector `(pos_i - pos_j) / r`.
    pub e: Vec2,
}
