pub mod aircraft;
pub mod holding;
pub mod queue;
