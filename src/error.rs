// src/error.rs

/// Errors raised while building a simulation. These are fatal: the run
/// never starts when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} probability must be a finite value in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },
    #[error("auto sweep needs at least one run")]
    NoSweepRuns,
}

/// Errors raised while exporting results.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Checks that `value` is usable as a probability.
pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { name, value })
    }
}
