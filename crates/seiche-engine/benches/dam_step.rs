//! Advection-step throughput on a small dam column.

use std::rc::Rc;

use criterion::{criterion_group, criterion_main, Criterion};
use seiche_engine::{SimulationClock, StepConfig, Stepper};
use seiche_fluid::{
    AcousticTimeStep, AdvectionTimeStep, DensityRelaxation, DensitySummation,
    PressureRelaxation, TimeStepInitialization, ViscousAcceleration,
};
use seiche_relation::{BodyRelation, InnerRelation};
use seiche_test_utils::fluid_block;

fn dam_stepper(nx: usize, ny: usize) -> Stepper {
    let fluid = fluid_block(nx, ny, 0.05, 1e-3);
    let inner = Rc::new(InnerRelation::new(Rc::clone(&fluid)));

    Stepper::new(StepConfig {
        initialize: vec![Box::new(
            TimeStepInitialization::new(&fluid, [0.0, -9.81]).unwrap(),
        )],
        advection: vec![Box::new(DensitySummation::new(&inner).unwrap())],
        acoustic: vec![
            Box::new(ViscousAcceleration::new(&inner).unwrap()),
            Box::new(PressureRelaxation::new(&inner).unwrap()),
            Box::new(DensityRelaxation::new(&inner).unwrap()),
        ],
        advection_criterion: Box::new(AdvectionTimeStep::new(&fluid, 1.0).unwrap()),
        acoustic_criterion: Box::new(AcousticTimeStep::new(&fluid).unwrap()),
        relations: vec![Rc::clone(&inner) as Rc<dyn BodyRelation>],
        parallel: false,
    })
    .unwrap()
}

fn bench_advance(c: &mut Criterion) {
    let mut group = c.benchmark_group("advance");
    for (nx, ny) in [(10, 10), (20, 20)] {
        group.bench_function(format!("{}x{}", nx, ny), |b| {
            let mut stepper = dam_stepper(nx, ny);
            let mut clock = SimulationClock::new();
            b.iter(|| {
                stepper.advance(&mut clock);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_advance);
criterion_main!(benches);
