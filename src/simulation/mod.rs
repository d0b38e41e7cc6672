pub mod config;
pub mod engine;
pub mod random;
pub mod runner;
pub mod stats;
