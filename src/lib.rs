//! Discrete-time simulation of a single-runway airport.
//!
//! A [`simulation::engine::ControlTower`] owns the arrivals and departures
//! queues, the repair yard and the runway, and is advanced one tick at a
//! time. [`simulation::runner::Simulator`] wraps it in a run loop with
//! progress reporting, cancellation and the automatic P sweep.

pub mod error;
pub mod io;
pub mod model;
pub mod simulation;
pub mod strategy;
