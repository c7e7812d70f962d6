pub mod config;
pub mod error;
pub mod geometry;
pub mod mcmc;
pub mod rng;
pub mod simulation;
pub mod spins;
pub mod statistics;

mod parallel;

pub use config::{QuenchConfig, SweepMode, TemperatureSweepConfig};
pub use error::{IsingError, Result};
pub use geometry::SpinLattice;
pub use mcmc::{ProbabilityTable, SweepStats, UpdateEngine};
pub use rng::RandomSource;
pub use simulation::{
    build_engine, run_quench, run_temperature, run_temperature_sweep, total_sweeps,
};
pub use spins::COUPLING;
pub use statistics::{write_csv_header, Statistics, ThermoRow};
