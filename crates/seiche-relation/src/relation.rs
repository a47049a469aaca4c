//! Inner and contact relations: precomputed neighbor topology.
//!
//! Relations hold shared body handles and keep their neighbor lists
//! behind interior mutability so the driver can rebuild them between
//! interaction passes while kernels keep long-lived handles. During one
//! kernel invocation the topology is read-only; rebuild and execution
//! never overlap (driver sequencing).

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use seiche_body::{fields, Body};
use seiche_core::{vec2, StoreRevision};

use crate::grid::CellGrid;
use crate::kernel::WendlandC2;
use crate::neighbor::Neighbor;

/// Separations below `DEGENERATE_FRACTION * h` are dropped when the
/// topology is built, so kernels can divide by `r` without guards.
const DEGENERATE_FRACTION: f32 = 1e-6;

/// A rebuildable neighbor topology.
///
/// Implementors expose `update_configuration()`, invoked externally
/// between interaction passes whenever particle positions have moved
/// enough to invalidate the previous topology.
pub trait BodyRelation {
    /// Relation name, for logging and step metrics.
    fn name(&self) -> &str;

    /// Rebuild the neighbor lists from current particle positions.
    fn update_configuration(&self);
}

fn build_neighborhoods(
    kernel: &WendlandC2,
    src_positions: &[f32],
    dst_positions: &[f32],
    exclude_same_index: bool,
) -> Vec<Vec<Neighbor>> {
    let cutoff = kernel.cutoff();
    let min_r = DEGENERATE_FRACTION * kernel.smoothing_length();
    let grid = CellGrid::build(cutoff, dst_positions);
    let count = src_positions.len() / seiche_core::DIM;

    let mut neighborhoods = vec![Vec::new(); count];
    for (i, neighbors) in neighborhoods.iter_mut().enumerate() {
        let pi = vec2::at(src_positions, i);
        grid.for_each_candidate(pi, |j| {
            if exclude_same_index && j as usize == i {
                return;
            }
            let pj = vec2::at(dst_positions, j as usize);
            let d = vec2::sub(pi, pj);
            let r = vec2::norm(d);
            if r >= cutoff || r <= min_r {
                return;
            }
            neighbors.push(Neighbor {
                index: j,
                w: kernel.w(r),
                dw: kernel.dw(r),
                r,
                e: vec2::scale(d, 1.0 / r),
            });
        });
    }
    neighborhoods
}

/// Topology between particles of one body.
pub struct InnerRelation {
    name: String,
    body: Rc<Body>,
    kernel: WendlandC2,
    neighborhoods: RefCell<Vec<Vec<Neighbor>>>,
    built_against: Cell<StoreRevision>,
}

impl InnerRelation {
    /// Create the relation and build its first configuration from the
    /// body's current positions.
    pub fn new(body: Rc<Body>) -> Self {
        let relation = Self {
            name: format!("inner({})", body.name()),
            kernel: WendlandC2::new(body.adaptation().smoothing_length()),
            body,
            neighborhoods: RefCell::new(Vec::new()),
            built_against: Cell::new(StoreRevision::default()),
        };
        relation.update_configuration();
        relation
    }

    /// The body whose particles this relation governs.
    pub fn body(&self) -> &Rc<Body> {
        &self.body
    }

    /// The smoothing kernel the pair weights were computed with.
    pub fn kernel(&self) -> &WendlandC2 {
        &self.kernel
    }

    /// The store revision the current topology was built against.
    pub fn revision(&self) -> StoreRevision {
        self.built_against.get()
    }

    /// Read-only view of the current neighbor lists, indexed by
    /// particle id. Hold only for the duration of one invocation.
    pub fn neighborhoods(&self) -> Ref<'_, Vec<Vec<Neighbor>>> {
        self.neighborhoods.borrow()
    }
}

impl BodyRelation for InnerRelation {
    fn name(&self) -> &str {
        &self.name
    }

    fn update_configuration(&self) {
        let store = self.body.store();
        let positions = store.vector(fields::POSITION);
        let rebuilt = build_neighborhoods(&self.kernel, &positions, &positions, true);
        *self.neighborhoods.borrow_mut() = rebuilt;
        self.built_against.set(store.revision());
    }
}

/// Topology from a source body's particles to a target body's
/// particles (e.g. fluid against a wall boundary).
pub struct ContactRelation {
    name: String,
    source: Rc<Body>,
    target: Rc<Body>,
    kernel: WendlandC2,
    neighborhoods: RefCell<Vec<Vec<Neighbor>>>,
    built_against: Cell<StoreRevision>,
}

impl ContactRelation {
    /// Create the relation and build its first configuration.
    ///
    /// Pair weights use the source body's smoothing kernel, so the
    /// governed particles see the boundary at their own resolution.
    pub fn new(source: Rc<Body>, target: Rc<Body>) -> Self {
        let relation = Self {
            name: format!("contact({} -> {})", source.name(), target.name()),
            kernel: WendlandC2::new(source.adaptation().smoothing_length()),
            source,
            target,
            neighborhoods: RefCell::new(Vec::new()),
            built_against: Cell::new(StoreRevision::default()),
        };
        relation.update_configuration();
        relation
    }

    /// The governed (source) body.
    pub fn source(&self) -> &Rc<Body> {
        &self.source
    }

    /// The contacted (target) body; neighbor indices point into its
    /// store.
    pub fn target(&self) -> &Rc<Body> {
        &self.target
    }

    /// The smoothing kernel the pair weights were computed with.
    pub fn kernel(&self) -> &WendlandC2 {
        &self.kernel
    }

    /// The source-store revision the current topology was built
    /// against.
    pub fn revision(&self) -> StoreRevision {
        self.built_against.get()
    }

    /// Read-only view of the current neighbor lists, indexed by source
    /// particle id.
    pub fn neighborhoods(&self) -> Ref<'_, Vec<Vec<Neighbor>>> {
        self.neighborhoods.borrow()
    }
}

impl BodyRelation for ContactRelation {
    fn name(&self) -> &str {
        &self.name
    }

    fn update_configuration(&self) {
        let src_positions = self.source.store().vector(fields::POSITION);
        let dst_positions = self.target.store().vector(fields::POSITION);
        let rebuilt = build_neighborhoods(&self.kernel, &src_positions, &dst_positions, false);
        *self.neighborhoods.borrow_mut() = rebuilt;
        self.built_against.set(self.source.store().revision());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seiche_body::{Adaptation, Solid, WeaklyCompressibleFluid};
    use seiche_core::DIM;

    fn body_with_particles(name: &str, positions: &[[f32; DIM]]) -> Rc<Body> {
        let body = Body::new(
            name,
            Box::new(WeaklyCompressibleFluid::new(1000.0, 10.0, 1e-3)),
            Adaptation::new(0.1),
        );
        for &pos in positions {
            let id = body.store().push_particle();
            vec2::set(&mut body.store().vector_mut(fields::POSITION), id, pos);
        }
        Rc::new(body)
    }

    #[test]
    fn close_pair_is_mutually_neighboring() {
        let body = body_with_particles("pair", &[[0.0, 0.0], [0.1, 0.0]]);
        let relation = InnerRelation::new(body);
        let neighborhoods = relation.neighborhoods();

        assert_eq!(neighborhoods[0].len(), 1);
        assert_eq!(neighborhoods[1].len(), 1);
        let a = neighborhoods[0][0];
        let b = neighborhoods[1][0];
        assert_eq!(a.index, 1);
        assert_eq!(b.index, 0);
        assert_eq!(a.w, b.w);
        assert_eq!(a.e, [-1.0, 0.0]);
        assert_eq!(b.e, [1.0, 0.0]);
        assert!(a.dw < 0.0);
    }

    #[test]
    fn pair_beyond_cutoff_does_not_interact() {
        // cutoff = 2h = 0.26
        let body = body_with_particles("far", &[[0.0, 0.0], [0.3, 0.0]]);
        let relation = InnerRelation::new(body);
        assert!(relation.neighborhoods().iter().all(|n| n.is_empty()));
    }

    #[test]
    fn self_is_never_a_neighbor() {
        let body = body_with_particles("single", &[[0.0, 0.0]]);
        let relation = InnerRelation::new(body);
        assert!(relation.neighborhoods()[0].is_empty());
    }

    #[test]
    fn coincident_pair_is_dropped_as_degenerate() {
        let body = body_with_particles("stacked", &[[0.5, 0.5], [0.5, 0.5]]);
        let relation = InnerRelation::new(body);
        assert!(relation.neighborhoods().iter().all(|n| n.is_empty()));
    }

    #[test]
    fn update_configuration_follows_particle_motion() {
        let body = body_with_particles("moving", &[[0.0, 0.0], [0.1, 0.0]]);
        let relation = InnerRelation::new(Rc::clone(&body));
        assert_eq!(relation.neighborhoods()[0].len(), 1);

        vec2::set(
            &mut body.store().vector_mut(fields::POSITION),
            1,
            [1.0, 0.0],
        );
        relation.update_configuration();
        assert!(relation.neighborhoods()[0].is_empty());
    }

    #[test]
    fn contact_indices_point_into_target_store() {
        let fluid = body_with_particles("water", &[[0.0, 0.0]]);
        let wall = Rc::new(Body::new(
            "wall",
            Box::new(Solid::new(1000.0)),
            Adaptation::new(0.1),
        ));
        for x in 0..3 {
            let id = wall.store().push_particle();
            vec2::set(
                &mut wall.store().vector_mut(fields::POSITION),
                id,
                [x as f32 * 0.1, -0.1],
            );
        }

        let relation = ContactRelation::new(fluid, Rc::clone(&wall));
        let neighborhoods = relation.neighborhoods();
        assert_eq!(neighborhoods.len(), 1);
        assert!(!neighborhoods[0].is_empty());
        assert!(neighborhoods[0]
            .iter()
            .all(|n| (n.index as usize) < wall.particle_count()));
    }

    #[test]
    fn relation_records_store_revision() {
        let body = body_with_particles("rev", &[[0.0, 0.0]]);
        let relation = InnerRelation::new(Rc::clone(&body));
        assert_eq!(relation.revision(), body.store().revision());

        body.store().push_particle();
        assert_ne!(relation.revision(), body.store().revision());
        relation.update_configuration();
        assert_eq!(relation.revision(), body.store().revision());
    }
}
