// src/simulation/stats.rs

use serde::Serialize;

/// Run-scoped counters. Mutated only by the tower that owns them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlStats {
    total_waiting_time: u64,
    landings: u32,
    departures: u32,
    crashes: u32,
    commercial_probability: f64,
    policy: String,
}

impl ControlStats {
    pub fn new(commercial_probability: f64, policy: &str) -> Self {
        Self {
            total_waiting_time: 0,
            landings: 0,
            departures: 0,
            crashes: 0,
            commercial_probability,
            policy: policy.to_string(),
        }
    }

    pub fn record_landing(&mut self) {
        self.landings += 1;
    }

    pub fn record_departure(&mut self) {
        self.departures += 1;
    }

    pub fn record_crash(&mut self) {
        self.crashes += 1;
    }

    pub fn add_waiting_time(&mut self, ticks: u32) {
        self.total_waiting_time += u64::from(ticks);
    }

    pub fn total_waiting_time(&self) -> u64 {
        self.total_waiting_time
    }

    pub fn landings(&self) -> u32 {
        self.landings
    }

    pub fn departures(&self) -> u32 {
        self.departures
    }

    pub fn crashes(&self) -> u32 {
        self.crashes
    }

    pub fn commercial_probability(&self) -> f64 {
        self.commercial_probability
    }

    pub fn policy(&self) -> &str {
        &self.policy
    }

    /// Mean wait per runway movement, or `None` before the first one.
    pub fn average_wait_ticks(&self) -> Option<f64> {
        let movements = u64::from(self.landings) + u64::from(self.departures);
        (movements > 0).then(|| self.total_waiting_time as f64 / movements as f64)
    }

    /// Multi-line report. Times are shown in minutes (two ticks per minute).
    pub fn summary(&self) -> String {
        format!(
            "Commercial probability: {}\n\
             Queue type: {}\n\
             \n\
             Total Waiting Time: {}\n\
             Total Landings: {}\n\
             Total Departures: {}\n\
             Total Crashes: {}\n\
             \n\
             Average waiting time: {}\n\
             ==========\n",
            format_probability(self.commercial_probability),
            self.policy,
            ticks_as_minutes(self.total_waiting_time as f64),
            self.landings,
            self.departures,
            self.crashes,
            self.average_wait_minutes(),
        )
    }

    /// `p,total wait,landings,departures,crashes,average wait`
    pub fn csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            format_probability(self.commercial_probability),
            ticks_as_minutes(self.total_waiting_time as f64),
            self.landings,
            self.departures,
            self.crashes,
            self.average_wait_minutes(),
        )
    }

    fn average_wait_minutes(&self) -> String {
        self.average_wait_ticks()
            .map(ticks_as_minutes)
            .unwrap_or_else(|| "n/a".to_string())
    }
}

fn ticks_as_minutes(ticks: f64) -> String {
    format!("{} mins", ticks / 2.0)
}

/// Up to four decimals, trailing zeros dropped: `0.007`, `0.5`, `0`.
pub fn format_probability(p: f64) -> String {
    let fixed = format!("{p:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}
