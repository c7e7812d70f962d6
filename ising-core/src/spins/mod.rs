pub mod energy;
pub mod snapshot;

pub use energy::COUPLING;
pub use snapshot::{parse_snapshot, read_snapshots};
