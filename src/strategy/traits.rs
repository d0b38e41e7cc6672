// src/strategy/traits.rs

use crate::model::aircraft::Aircraft;
use crate::strategy::ordering::QueueOrder;
use std::fmt::Debug;

/// What the runway does next once it is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunwayDecision {
    /// Pop the arrivals queue and land it.
    Land,
    /// Pop the departures queue and launch it.
    TakeOff,
    Idle,
}

/// Decides who gets a free runway.
///
/// Policies only look at the heads of the two queues; the tower carries out
/// the decision. `Send + Sync` so a tower can be driven from a worker thread.
pub trait RunwayPolicy: Debug + Send + Sync {
    /// # Arguments
    /// * `arrival` - Head of the arrivals queue, if any.
    /// * `departure` - Head of the departures queue, if any.
    fn choose(&self, arrival: Option<&Aircraft>, departure: Option<&Aircraft>) -> RunwayDecision;

    /// Order of the arrivals queue under this policy. Departures always wait
    /// in [`QueueOrder::WaitingTime`].
    fn arrivals_order(&self) -> QueueOrder;

    /// Human-readable name used in reports.
    fn label(&self) -> &'static str;
}
