pub mod implementations;
pub mod ordering;
pub mod traits;
