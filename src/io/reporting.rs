// src/io/reporting.rs

use crate::error::ReportError;
use crate::simulation::stats::ControlStats;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// One row of the results file.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub seed: u64,
    pub policy: String,
    pub commercial_probability: f64,
    pub ticks: u64,
    pub total_waiting_ticks: u64,
    pub landings: u32,
    pub departures: u32,
    pub crashes: u32,
    pub average_wait_ticks: Option<f64>,
}

impl RunRecord {
    pub fn new(seed: u64, ticks: u64, stats: &ControlStats) -> Self {
        Self {
            seed,
            policy: stats.policy().to_string(),
            commercial_probability: stats.commercial_probability(),
            ticks,
            total_waiting_ticks: stats.total_waiting_time(),
            landings: stats.landings(),
            departures: stats.departures(),
            crashes: stats.crashes(),
            average_wait_ticks: stats.average_wait_ticks(),
        }
    }
}

/// Writes run results to a CSV file.
///
/// # Arguments
/// * `file_path` - The path to save the file (e.g., "results/run_1.csv").
/// * `data` - One record per completed run.
pub fn write_run_log(file_path: impl AsRef<Path>, data: &[RunRecord]) -> Result<(), ReportError> {
    let path = file_path.as_ref();
    let mut wtr = csv::Writer::from_path(path)?;

    for record in data {
        wtr.serialize(record)?;
    }

    // Flush the buffer to ensure all data is written
    wtr.flush()?;

    info!("Exported {} rows to '{}'", data.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let mut stats = ControlStats::new(0.007, "Fuel priority");
        stats.record_landing();
        stats.add_waiting_time(4);
        let record = RunRecord::new(42, 2880, &stats);

        let path = std::env::temp_dir().join(format!("airport-sim-report-{}.csv", std::process::id()));
        write_run_log(&path, &[record]).expect("write csv");
        let written = std::fs::read_to_string(&path).expect("read back");
        let _ = std::fs::remove_file(&path);

        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("seed,policy,commercial_probability,ticks,total_waiting_ticks,landings,departures,crashes,average_wait_ticks")
        );
        assert_eq!(lines.next(), Some("42,Fuel priority,0.007,2880,4,1,0,0,4.0"));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let result = write_run_log("/nonexistent-dir/for/sure/out.csv", &[]);
        assert!(result.is_err());
    }
}
