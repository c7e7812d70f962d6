pub mod results;
mod stats;

pub use results::{write_csv_header, ThermoRow, CSV_HEADER};
pub use stats::Statistics;
