pub mod probability;
pub mod sweep;

pub use probability::ProbabilityTable;
pub use sweep::{SweepStats, UpdateEngine};
