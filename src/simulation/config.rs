// src/simulation/config.rs

use crate::error::{check_probability, ConfigError};
use serde::Serialize;

/// One tick models 30 seconds.
pub const TICKS_PER_HOUR: u64 = 120;
pub const TICKS_PER_DAY: u64 = TICKS_PER_HOUR * 24;
pub const TICKS_PER_WEEK: u64 = TICKS_PER_DAY * 7;
pub const TICKS_PER_YEAR: u64 = TICKS_PER_DAY * 365;

pub const GLIDER_SPAWN_PROBABILITY: f64 = 0.002;
pub const LIGHT_SPAWN_PROBABILITY: f64 = 0.005;

/// Per-tick chance that an aircraft waiting to depart breaks down.
pub const BREAKDOWN_PROBABILITY: f64 = 0.0001;

/// Ticks a broken-down aircraft spends in the repair yard.
pub const REPAIR_TICKS: u32 = 120;

pub const SWEEP_STEP: f64 = 0.001;
pub const SWEEP_MIN_PROBABILITY: f64 = 0.0;
pub const SWEEP_MAX_PROBABILITY: f64 =
    1.0 - (GLIDER_SPAWN_PROBABILITY + LIGHT_SPAWN_PROBABILITY);

/// Which runway policy a tower runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
pub enum PolicyKind {
    /// Land whatever is waiting, otherwise launch.
    #[default]
    Fifo,
    /// Arrivals ordered by fuel; departures may jump ahead when it is safe.
    Priority,
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// The tunable "P": chance per tick of a commercial aircraft spawning.
    pub commercial_probability: f64,
    pub ticks: u64,
    pub policy: PolicyKind,
    /// `None` picks a seed from OS entropy at run time.
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// The spawn probabilities are deliberately not required to sum to 1 or less.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("commercial", self.commercial_probability)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            commercial_probability: 0.007,
            ticks: TICKS_PER_DAY,
            policy: PolicyKind::Fifo,
            seed: None,
        }
    }
}
