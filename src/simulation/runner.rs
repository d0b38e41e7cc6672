// src/simulation/runner.rs

use crate::error::ConfigError;
use crate::simulation::config::{
    SimulationConfig, SWEEP_MAX_PROBABILITY, SWEEP_MIN_PROBABILITY, SWEEP_STEP,
};
use crate::simulation::engine::ControlTower;
use crate::simulation::random::SimRng;
use crate::simulation::stats::{format_probability, ControlStats};
use crate::strategy::implementations::policy_for;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Hooks for whoever drives a run: progress display, cancellation, results.
pub trait SimulationObserver {
    /// Called after every completed tick. Return `Break` to stop the run.
    fn after_tick(&mut self, _tick: u64) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    /// Percentage of the whole job completed so far.
    fn progress(&mut self, _percent: f64) {}

    /// Called once when a run completes all its ticks.
    fn finished(&mut self, _stats: &ControlStats) {}
}

/// Observer that does nothing.
#[derive(Debug, Default)]
pub struct Silent;

impl SimulationObserver for Silent {}

/// Logs progress every ten percent.
#[derive(Debug, Default)]
pub struct ProgressLog {
    next_report: f64,
}

impl SimulationObserver for ProgressLog {
    fn progress(&mut self, percent: f64) {
        if percent >= self.next_report {
            info!("{:.0}% complete", percent.min(100.0));
            self.next_report = (percent / 10.0).floor() * 10.0 + 10.0;
        }
    }
}

/// Cancellation flag shared with another thread. Setting it stops the run
/// after the tick in progress.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl SimulationObserver for CancelFlag {
    fn after_tick(&mut self, _tick: u64) -> ControlFlow<()> {
        if self.is_cancelled() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(ControlStats),
    /// Stopped early; `stats` holds what accumulated before the stop.
    Cancelled { ticks_run: u64, stats: ControlStats },
}

impl RunOutcome {
    pub fn stats(&self) -> &ControlStats {
        match self {
            RunOutcome::Completed(stats) => stats,
            RunOutcome::Cancelled { stats, .. } => stats,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled { .. })
    }
}

/// Result of an automatic sweep over P.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepReport {
    /// Highest crash-free P found for each seed.
    pub best_per_seed: Vec<f64>,
    pub cancelled: bool,
}

impl SweepReport {
    pub fn average(&self) -> Option<f64> {
        if self.best_per_seed.is_empty() {
            None
        } else {
            Some(self.best_per_seed.iter().sum::<f64>() / self.best_per_seed.len() as f64)
        }
    }
}

pub struct Simulator {
    config: SimulationConfig,
    seed: u64,
}

impl Simulator {
    /// Validates `config` and fixes the seed for the run.
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| SimRng::from_entropy().seed());
        Ok(Self { config, seed })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The seed every run of this simulator starts from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs the configured number of ticks on a fresh tower.
    pub fn run(&self, observer: &mut dyn SimulationObserver) -> Result<RunOutcome, ConfigError> {
        let outcome = self.run_one(
            self.config.commercial_probability,
            self.seed,
            0,
            self.config.ticks,
            observer,
        )?;
        if let RunOutcome::Completed(stats) = &outcome {
            observer.finished(stats);
        }
        Ok(outcome)
    }

    /// Runs one tower with `probability` and `seed`. Progress is reported
    /// against `total_ticks`, with `ticks_before` already done.
    fn run_one(
        &self,
        probability: f64,
        seed: u64,
        ticks_before: u64,
        total_ticks: u64,
        observer: &mut dyn SimulationObserver,
    ) -> Result<RunOutcome, ConfigError> {
        let mut tower = ControlTower::new(
            probability,
            policy_for(self.config.policy),
            SimRng::new(seed),
        )?;

        for tick in 0..self.config.ticks {
            tower.tick();
            let done = ticks_before + tick + 1;
            observer.progress(100.0 * done as f64 / total_ticks.max(1) as f64);
            if observer.after_tick(tick).is_break() {
                info!("Simulation has been cancelled");
                return Ok(RunOutcome::Cancelled {
                    ticks_run: tower.ticks_run(),
                    stats: tower.into_stats(),
                });
            }
        }

        Ok(RunOutcome::Completed(tower.into_stats()))
    }

    /// Finds, for each of `runs` seeds, the highest P with no crashes, by
    /// stepping P upward from zero and stopping at the first crash.
    pub fn sweep(
        &self,
        runs: usize,
        observer: &mut dyn SimulationObserver,
    ) -> Result<SweepReport, ConfigError> {
        if runs == 0 {
            return Err(ConfigError::NoSweepRuns);
        }

        let steps = sweep_steps();
        let total_ticks = runs as u64 * steps as u64 * self.config.ticks;
        let mut master = SimRng::new(self.seed);
        let mut report = SweepReport {
            best_per_seed: Vec::with_capacity(runs),
            cancelled: false,
        };

        for run in 0..runs {
            let seed = master.next_seed();
            let mut best = SWEEP_MIN_PROBABILITY;

            for step in 0..steps {
                let probability = sweep_probability(step);
                let ticks_before = (run * steps + step) as u64 * self.config.ticks;
                let outcome = self.run_one(probability, seed, ticks_before, total_ticks, observer)?;

                let stats = match outcome {
                    RunOutcome::Cancelled { .. } => {
                        report.cancelled = true;
                        return Ok(report);
                    }
                    RunOutcome::Completed(stats) => stats,
                };

                if stats.crashes() > 0 {
                    info!(
                        "P{} onwards cause crashes. Discarding.",
                        format_probability(probability)
                    );
                    break;
                }
                info!("P{} had 0 crashes", format_probability(probability));
                best = probability;
            }

            report.best_per_seed.push(best);
        }

        observer.progress(100.0);
        Ok(report)
    }
}

fn sweep_steps() -> usize {
    ((SWEEP_MAX_PROBABILITY - SWEEP_MIN_PROBABILITY) / SWEEP_STEP).floor() as usize + 1
}

/// Computed from the step index to avoid drift from repeated addition.
fn sweep_probability(step: usize) -> f64 {
    SWEEP_MIN_PROBABILITY + step as f64 * SWEEP_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::config::PolicyKind;

    /// Stops after a fixed number of ticks.
    struct StopAfter(u64);

    impl SimulationObserver for StopAfter {
        fn after_tick(&mut self, tick: u64) -> ControlFlow<()> {
            if tick + 1 >= self.0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    }

    #[derive(Default)]
    struct Recorder {
        last_progress: f64,
        finished: bool,
    }

    impl SimulationObserver for Recorder {
        fn progress(&mut self, percent: f64) {
            assert!(percent >= self.last_progress);
            self.last_progress = percent;
        }

        fn finished(&mut self, _stats: &ControlStats) {
            self.finished = true;
        }
    }

    fn config(ticks: u64, seed: u64) -> SimulationConfig {
        SimulationConfig {
            commercial_probability: 0.007,
            ticks,
            policy: PolicyKind::Fifo,
            seed: Some(seed),
        }
    }

    #[test]
    fn run_reports_progress_to_completion() {
        let simulator = Simulator::new(config(200, 42)).expect("valid config");
        let mut recorder = Recorder::default();
        let outcome = simulator.run(&mut recorder).expect("run");
        assert!(!outcome.is_cancelled());
        assert!(recorder.finished);
        assert!((recorder.last_progress - 100.0).abs() < 1e-9);
    }

    #[test]
    fn cancellation_returns_partial_stats() {
        let simulator = Simulator::new(config(2880, 42)).expect("valid config");
        let outcome = simulator.run(&mut StopAfter(10)).expect("run");
        match outcome {
            RunOutcome::Cancelled { ticks_run, .. } => assert_eq!(ticks_run, 10),
            other => panic!("expected cancellation, got {other:?}"),
        }
    }

    #[test]
    fn cancel_flag_stops_run() {
        let flag = CancelFlag::new();
        flag.cancel();
        let simulator = Simulator::new(config(100, 1)).expect("valid config");
        let outcome = simulator.run(&mut flag.clone()).expect("run");
        assert!(outcome.is_cancelled());
    }

    #[test]
    fn invalid_config_never_starts() {
        let mut bad = config(10, 1);
        bad.commercial_probability = f64::INFINITY;
        assert!(Simulator::new(bad).is_err());
    }

    #[test]
    fn sweep_needs_runs() {
        let simulator = Simulator::new(config(10, 1)).expect("valid config");
        assert!(matches!(
            simulator.sweep(0, &mut Silent),
            Err(ConfigError::NoSweepRuns)
        ));
    }

    #[test]
    fn sweep_cancels_cleanly() {
        let simulator = Simulator::new(config(50, 1)).expect("valid config");
        let report = simulator.sweep(2, &mut StopAfter(5)).expect("sweep");
        assert!(report.cancelled);
        assert!(report.best_per_seed.is_empty());
        assert_eq!(report.average(), None);
    }

    #[test]
    fn short_sweep_is_reproducible() {
        let simulator = Simulator::new(config(60, 9)).expect("valid config");
        let a = simulator.sweep(1, &mut Silent).expect("sweep");
        let b = simulator.sweep(1, &mut Silent).expect("sweep");
        assert_eq!(a, b);
        let best = a.average().expect("one seed");
        assert!((0.0..=SWEEP_MAX_PROBABILITY).contains(&best));
    }

    #[test]
    fn sweep_grid_covers_range() {
        assert_eq!(sweep_probability(0), 0.0);
        let last = sweep_probability(sweep_steps() - 1);
        assert!(last <= SWEEP_MAX_PROBABILITY + 1e-12);
        assert!(SWEEP_MAX_PROBABILITY - last < SWEEP_STEP);
    }
}
