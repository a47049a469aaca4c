//! Sparse uniform grid for neighbor-candidate search.
//!
//! Cell edge equals the interaction cutoff, so all neighbors of a
//! particle lie in its own cell or the eight surrounding ones. Buckets
//! live in an `IndexMap` keyed by cell coordinate: iteration follows
//! insertion order, keeping candidate enumeration deterministic for a
//! given particle ordering.

use indexmap::IndexMap;
use smallvec::SmallVec;
use seiche_core::{vec2, Vec2};

/// Sparse cell grid over particle positions.
pub struct CellGrid {
    cell_size: f32,
    cells: IndexMap<[i32; 2], SmallVec<[u32; 8]>>,
}

impl CellGrid {
    /// Build a grid with the given cell edge from a flattened position
    /// buffer.
    pub fn build(cell_size: f32, positions: &[f32]) -> Self {
        debug_assert!(cell_size > 0.0);
        let count = positions.len() / seiche_core::DIM;
        let mut cells: IndexMap<[i32; 2], SmallVec<[u32; 8]>> = IndexMap::new();
        for i in 0..count {
            let key = Self::key_for(cell_size, vec2::at(positions, i));
            cells.entry(key).or_default().push(i as u32);
        }
        Self { cell_size, cells }
    }

    fn key_for(cell_size: f32, pos: Vec2) -> [i32; 2] {
        [
            (pos[0] / cell_size).floor() as i32,
            (pos[1] / cell_size).floor() as i32,
        ]
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Visit every particle index in the 3x3 cell block around `pos`.
    pub fn for_each_candidate(&self, pos: Vec2, mut visit: impl FnMut(u32)) {
        let center = Self::key_for(self.cell_size, pos);
        for dy in -1..=1 {
            for dx in -1..=1 {
                let key = [center[0] + dx, center[1] + dy];
                if let Some(bucket) = self.cells.get(&key) {
                    for &index in bucket {
                        visit(index);
                    }
                }
            }
        }
    }
}
