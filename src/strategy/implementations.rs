// src/strategy/implementations.rs

use crate::model::aircraft::{Aircraft, UNLIMITED_FUEL};
use crate::simulation::config::PolicyKind;
use crate::strategy::ordering::QueueOrder;
use crate::strategy::traits::{RunwayDecision, RunwayPolicy};

// =========================================================================
// 1. FIFO Policy
// =========================================================================

/// Landings always win. Departures only go when nothing is waiting to land.
#[derive(Debug, Clone, Default)]
pub struct FifoPolicy;

impl FifoPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl RunwayPolicy for FifoPolicy {
    fn choose(&self, arrival: Option<&Aircraft>, departure: Option<&Aircraft>) -> RunwayDecision {
        match (arrival, departure) {
            (Some(_), _) => RunwayDecision::Land,
            (None, Some(_)) => RunwayDecision::TakeOff,
            (None, None) => RunwayDecision::Idle,
        }
    }

    fn arrivals_order(&self) -> QueueOrder {
        QueueOrder::WaitingTime
    }

    fn label(&self) -> &'static str {
        "Waiting time (FIFO)"
    }
}

// =========================================================================
// 2. Fuel Priority Policy
// =========================================================================

/// Arrivals are served lowest fuel first. A departure may cut in ahead of a
/// waiting arrival when it has waited longer and its take-off finishes
/// before that arrival would run dry.
#[derive(Debug, Clone, Default)]
pub struct FuelPriorityPolicy {
    fallback: FifoPolicy,
}

impl FuelPriorityPolicy {
    pub fn new() -> Self {
        Self {
            fallback: FifoPolicy::new(),
        }
    }
}

impl RunwayPolicy for FuelPriorityPolicy {
    fn choose(&self, arrival: Option<&Aircraft>, departure: Option<&Aircraft>) -> RunwayDecision {
        // With nobody in the air the departure can never starve anyone.
        let (arrival_wait, arrival_fuel) = arrival
            .map(|a| (a.waiting_time, a.fuel()))
            .unwrap_or((0, UNLIMITED_FUEL));

        if let Some(departure) = departure {
            let takeoff = i64::from(departure.time_to_takeoff());
            if departure.waiting_time > arrival_wait && takeoff < i64::from(arrival_fuel) {
                return RunwayDecision::TakeOff;
            }
        }

        self.fallback.choose(arrival, departure)
    }

    fn arrivals_order(&self) -> QueueOrder {
        QueueOrder::Fuel
    }

    fn label(&self) -> &'static str {
        "Fuel priority"
    }
}

/// Builds the policy named by `kind`.
pub fn policy_for(kind: PolicyKind) -> Box<dyn RunwayPolicy> {
    match kind {
        PolicyKind::Fifo => Box::new(FifoPolicy::new()),
        PolicyKind::Priority => Box::new(FuelPriorityPolicy::new()),
    }
}
