//! The advection-step driver.

use std::rc::Rc;
use std::time::Instant;

use log::{debug, info};
use seiche_core::SequenceError;
use seiche_dynamics::{stability_bound, LocalDynamics, ReduceDynamics};
use seiche_relation::BodyRelation;

use crate::clock::SimulationClock;
use crate::metrics::StepMetrics;

/// Assembly input for a [`Stepper`].
///
/// Kernels are grouped into the three phases of the dual-criteria
/// scheme and run in declared order within each phase; the driver — not
/// the kernels — is responsible for sequencing writers of the same
/// field and for keeping relation rebuilds disjoint from kernel
/// execution.
pub struct StepConfig {
    /// Kernels run once at the start of each advection step (body
    /// forces, prior-acceleration reset). Invoked with dt = 0.
    pub initialize: Vec<Box<dyn LocalDynamics>>,
    /// Kernels run once per advection step at the advection step size
    /// (density summation, transport corrections).
    pub advection: Vec<Box<dyn LocalDynamics>>,
    /// Kernels run every acoustic sub-step (viscous acceleration,
    /// pressure and density relaxation).
    pub acoustic: Vec<Box<dyn LocalDynamics>>,
    /// Criterion producing the advection step size.
    pub advection_criterion: Box<dyn ReduceDynamics<Output = f64>>,
    /// Criterion producing the acoustic sub-step size.
    pub acoustic_criterion: Box<dyn ReduceDynamics<Output = f64>>,
    /// Relations to rebuild after the acoustic loop, before the next
    /// interaction pass.
    pub relations: Vec<Rc<dyn BodyRelation>>,
    /// Use each kernel's data-parallel path.
    pub parallel: bool,
}

/// Sequences one advection step: initialize, advection kernels, the
/// inner acoustic loop, then relation rebuilds.
///
/// Assembly validates the kernel set once ([`stability_bound`]); every
/// per-step dt is clamped to the tightest kernel bound. The relation
/// rebuild completes before `advance` returns, which gives the
/// happens-before edge between configuration updates and the next
/// step's interaction pass.
pub struct Stepper {
    config: StepConfig,
    max_dt: Option<f64>,
    last_metrics: StepMetrics,
}

impl Stepper {
    /// Validate the configuration and build the stepper.
    pub fn new(config: StepConfig) -> Result<Self, SequenceError> {
        let all: Vec<&dyn LocalDynamics> = config
            .initialize
            .iter()
            .chain(&config.advection)
            .chain(&config.acoustic)
            .map(|k| k.as_ref())
            .collect();
        let max_dt = stability_bound(&all)?.map(|(bound, _)| bound);
        Ok(Self {
            config,
            max_dt,
            last_metrics: StepMetrics::default(),
        })
    }

    fn clamp(&self, dt: f64) -> f64 {
        match self.max_dt {
            Some(bound) => dt.min(bound),
            None => dt,
        }
    }

    fn run_kernel(
        kernel: &dyn LocalDynamics,
        dt: f64,
        parallel: bool,
        timings: &mut Vec<(String, u64)>,
    ) {
        let start = Instant::now();
        if parallel {
            kernel.parallel_exec(dt);
        } else {
            kernel.exec(dt);
        }
        let elapsed = start.elapsed().as_micros() as u64;
        match timings.iter_mut().find(|(name, _)| name == kernel.name()) {
            Some(entry) => entry.1 += elapsed,
            None => timings.push((kernel.name().to_string(), elapsed)),
        }
    }

    /// Execute one advection step, advancing the clock through every
    /// acoustic sub-step.
    pub fn advance(&mut self, clock: &mut SimulationClock) -> &StepMetrics {
        let step_start = Instant::now();
        let parallel = self.config.parallel;
        let mut timings = Vec::new();

        for kernel in &self.config.initialize {
            Self::run_kernel(kernel.as_ref(), 0.0, parallel, &mut timings);
        }

        let advection_dt = self.clamp(self.config.advection_criterion.exec());
        assert!(
            advection_dt.is_finite() && advection_dt > 0.0,
            "advection criterion must produce a positive step, got {advection_dt}"
        );
        for kernel in &self.config.advection {
            Self::run_kernel(kernel.as_ref(), advection_dt, parallel, &mut timings);
        }

        let mut remaining = advection_dt;
        let mut substeps = 0u32;
        while remaining > advection_dt * 1e-12 {
            let dt = self
                .clamp(self.config.acoustic_criterion.exec())
                .min(remaining);
            assert!(
                dt.is_finite() && dt > 0.0,
                "acoustic criterion must produce a positive step, got {dt}"
            );
            for kernel in &self.config.acoustic {
                Self::run_kernel(kernel.as_ref(), dt, parallel, &mut timings);
            }
            remaining -= dt;
            substeps += 1;
            clock.advance(dt);
        }

        let config_start = Instant::now();
        for relation in &self.config.relations {
            relation.update_configuration();
        }
        let configuration_us = config_start.elapsed().as_micros() as u64;

        clock.complete_step();
        debug!(
            "step {}: t = {:.6}, Dt = {:.3e}, {} acoustic sub-steps",
            clock.steps(),
            clock.time(),
            advection_dt,
            substeps
        );

        self.last_metrics = StepMetrics {
            total_us: step_start.elapsed().as_micros() as u64,
            dynamics_us: timings,
            configuration_us,
            acoustic_substeps: substeps,
            advection_dt,
        };
        &self.last_metrics
    }

    /// Step until the clock reaches `end_time`. Returns the number of
    /// advection steps taken.
    pub fn run_until(&mut self, clock: &mut SimulationClock, end_time: f64) -> u64 {
        let mut steps = 0u64;
        while clock.time() < end_time {
            self.advance(clock);
            steps += 1;
            if steps % 100 == 0 {
                info!(
                    "step {} (t = {:.6} of {:.6})",
                    clock.steps(),
                    clock.time(),
                    end_time
                );
            }
        }
        steps
    }

    /// Metrics from the most recent step.
    pub fn last_metrics(&self) -> &StepMetrics {
        &self.last_metrics
    }

    /// The tightest kernel stability bound, if any kernel imposes one.
    pub fn max_dt(&self) -> Option<f64> {
        self.max_dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    use seiche_dynamics::ReduceDynamics;
    use seiche_test_utils::RecordingDynamics;

    struct ConstCriterion {
        name: &'static str,
        value: f64,
    }
    impl ReduceDynamics for ConstCriterion {
        type Output = f64;
        fn name(&self) -> &str {
            self.name
        }
        fn exec(&self) -> f64 {
            self.value
        }
    }

    struct RecordingRelation {
        rebuilds: Cell<u32>,
    }
    impl RecordingRelation {
        fn new() -> Rc<Self> {
            Rc::new(Self {
                rebuilds: Cell::new(0),
            })
        }
    }
    impl BodyRelation for RecordingRelation {
        fn name(&self) -> &str {
            "recording"
        }
        fn update_configuration(&self) {
            self.rebuilds.set(self.rebuilds.get() + 1);
        }
    }

    fn config(
        advection_dt: f64,
        acoustic_dt: f64,
        acoustic: Vec<Box<dyn LocalDynamics>>,
    ) -> StepConfig {
        StepConfig {
            initialize: vec![Box::new(RecordingDynamics::new("init"))],
            advection: vec![Box::new(RecordingDynamics::new("advect"))],
            acoustic,
            advection_criterion: Box::new(ConstCriterion {
                name: "advection",
                value: advection_dt,
            }),
            acoustic_criterion: Box::new(ConstCriterion {
                name: "acoustic",
                value: acoustic_dt,
            }),
            relations: Vec::new(),
            parallel: false,
        }
    }

    #[test]
    fn acoustic_loop_subdivides_the_advection_step() {
        let acoustic = Rc::new(RecordingDynamics::new("relax"));
        let handle = Rc::clone(&acoustic);

        struct Shared(Rc<RecordingDynamics>);
        impl LocalDynamics for Shared {
            fn name(&self) -> &str {
                self.0.name()
            }
            fn exec(&self, dt: f64) {
                self.0.exec(dt);
            }
        }

        let mut stepper =
            Stepper::new(config(0.1, 0.03, vec![Box::new(Shared(acoustic))])).unwrap();
        let mut clock = SimulationClock::new();
        let metrics = stepper.advance(&mut clock);

        assert_eq!(metrics.acoustic_substeps, 4);
        let calls = handle.calls();
        assert_eq!(calls.len(), 4);
        assert!((calls.iter().sum::<f64>() - 0.1).abs() < 1e-12);
        assert!((clock.time() - 0.1).abs() < 1e-12);
        assert_eq!(clock.steps().0, 1);
    }

    #[test]
    fn stability_bound_clamps_both_step_sizes() {
        let mut stepper = Stepper::new(config(
            1.0,
            1.0,
            vec![Box::new(RecordingDynamics::with_max_dt("tight", 0.05))],
        ))
        .unwrap();
        assert_eq!(stepper.max_dt(), Some(0.05));

        let mut clock = SimulationClock::new();
        let metrics = stepper.advance(&mut clock);
        assert_eq!(metrics.advection_dt, 0.05);
        assert_eq!(metrics.acoustic_substeps, 1);
    }

    #[test]
    fn empty_configuration_is_rejected() {
        let result = Stepper::new(StepConfig {
            initialize: Vec::new(),
            advection: Vec::new(),
            acoustic: Vec::new(),
            advection_criterion: Box::new(ConstCriterion {
                name: "advection",
                value: 0.1,
            }),
            acoustic_criterion: Box::new(ConstCriterion {
                name: "acoustic",
                value: 0.1,
            }),
            relations: Vec::new(),
            parallel: false,
        });
        assert!(matches!(result, Err(SequenceError::EmptySequence)));
    }

    #[test]
    fn relations_rebuild_once_per_step() {
        let relation = RecordingRelation::new();
        let mut cfg = config(0.1, 0.02, vec![Box::new(RecordingDynamics::new("relax"))]);
        cfg.relations = vec![Rc::clone(&relation) as Rc<dyn BodyRelation>];
        let mut stepper = Stepper::new(cfg).unwrap();

        let mut clock = SimulationClock::new();
        stepper.advance(&mut clock);
        assert_eq!(relation.rebuilds.get(), 1);
        stepper.advance(&mut clock);
        assert_eq!(relation.rebuilds.get(), 2);
    }

    #[test]
    fn metrics_name_every_kernel() {
        let mut stepper = Stepper::new(config(
            0.1,
            0.05,
            vec![Box::new(RecordingDynamics::new("relax"))],
        ))
        .unwrap();
        let mut clock = SimulationClock::new();
        let metrics = stepper.advance(&mut clock);

        let names: Vec<&str> = metrics.dynamics_us.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["init", "advect", "relax"]);
        assert!((metrics.advection_dt - 0.1).abs() < 1e-12);
    }

    #[test]
    fn run_until_reaches_the_end_time() {
        let mut stepper = Stepper::new(config(
            0.1,
            0.1,
            vec![Box::new(RecordingDynamics::new("relax"))],
        ))
        .unwrap();
        let mut clock = SimulationClock::new();
        let steps = stepper.run_until(&mut clock, 0.95);
        assert_eq!(steps, 10);
        assert!(clock.time() >= 0.95);
    }
}
