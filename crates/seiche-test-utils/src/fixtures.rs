//! Reusable body builders and kernel fixtures.

use std::cell::RefCell;
use std::rc::Rc;

use seiche_body::fields::{DENSITY, MASS, POSITION, VELOCITY, VOLUME};
use seiche_body::{Adaptation, Body, LatticeGenerator, Solid, WeaklyCompressibleFluid};
use seiche_core::{vec2, Vec2};
use seiche_dynamics::LocalDynamics;

/// Extra scalar fields the relaxation kernels need; registered on
/// every fluid fixture so any kernel can bind against it.
const EXTRA_SCALARS: [&str; 2] = ["pressure", "density_rate"];

/// An `nx` by `ny` lattice block of weakly compressible fluid
/// (rho0 = 1000, c0 = 10) at the given spacing and viscosity.
pub fn fluid_block(nx: usize, ny: usize, spacing: f32, viscosity: f32) -> Rc<Body> {
    let body = Body::with_fields(
        "fluid",
        Box::new(WeaklyCompressibleFluid::new(1000.0, 10.0, viscosity)),
        Adaptation::new(spacing),
        &EXTRA_SCALARS,
        &[],
    );
    LatticeGenerator::new(
        [0.0, 0.0],
        [nx as f32 * spacing, ny as f32 * spacing],
    )
    .populate(&body);
    Rc::new(body)
}

/// An `nx` by `ny` lattice block of rigid solid (rho0 = 1000) at the
/// given spacing, usable as a wall boundary.
pub fn solid_block(nx: usize, ny: usize, spacing: f32) -> Rc<Body> {
    let body = Body::new("wall", Box::new(Solid::new(1000.0)), Adaptation::new(spacing));
    LatticeGenerator::new(
        [0.0, 0.0],
        [nx as f32 * spacing, ny as f32 * spacing],
    )
    .populate(&body);
    Rc::new(body)
}

/// `count` fluid particles 1.0 apart on the x axis — far beyond the
/// kernel cutoff of their 0.1 spacing, so every neighbor list is
/// empty.
pub fn sparse_chain(count: usize, viscosity: f32) -> Rc<Body> {
    let body = Body::with_fields(
        "sparse",
        Box::new(WeaklyCompressibleFluid::new(1000.0, 10.0, viscosity)),
        Adaptation::new(0.1),
        &EXTRA_SCALARS,
        &[],
    );
    let store = body.store();
    for i in 0..count {
        let id = store.push_particle();
        vec2::set(&mut store.vector_mut(POSITION), id, [i as f32, 0.0]);
        store.scalar_mut(DENSITY)[id] = 1000.0;
        store.scalar_mut(MASS)[id] = 10.0;
        store.scalar_mut(VOLUME)[id] = 0.01;
    }
    Rc::new(body)
}

/// Two mutually neighboring fluid particles 0.1 apart on the x axis
/// with the given velocities: the canonical shear scenario.
pub fn shear_pair(v0: Vec2, v1: Vec2, viscosity: f32) -> Rc<Body> {
    let body = Body::with_fields(
        "pair",
        Box::new(WeaklyCompressibleFluid::new(1000.0, 10.0, viscosity)),
        Adaptation::new(0.1),
        &EXTRA_SCALARS,
        &[],
    );
    let store = body.store();
    for (pos, vel) in [([0.0, 0.0], v0), ([0.1, 0.0], v1)] {
        let id = store.push_particle();
        vec2::set(&mut store.vector_mut(POSITION), id, pos);
        vec2::set(&mut store.vector_mut(VELOCITY), id, vel);
        store.scalar_mut(DENSITY)[id] = 1000.0;
        store.scalar_mut(MASS)[id] = 10.0;
        store.scalar_mut(VOLUME)[id] = 0.01;
    }
    Rc::new(body)
}

/// Records every invocation's dt without touching any state.
///
/// Useful for asserting driver sequencing: which kernels ran, in what
/// order, with which step sizes.
pub struct RecordingDynamics {
    name: String,
    max_dt: Option<f64>,
    calls: RefCell<Vec<f64>>,
}

impl RecordingDynamics {
    /// A recorder with no stability bound.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_dt: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A recorder advertising a stability bound.
    pub fn with_max_dt(name: impl Into<String>, max_dt: f64) -> Self {
        Self {
            name: name.into(),
            max_dt: Some(max_dt),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// The dt of every invocation so far, in order.
    pub fn calls(&self) -> Vec<f64> {
        self.calls.borrow().clone()
    }
}

impl LocalDynamics for RecordingDynamics {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_dt(&self) -> Option<f64> {
        self.max_dt
    }

    fn exec(&self, dt: f64) {
        self.calls.borrow_mut().push(dt);
    }
}
