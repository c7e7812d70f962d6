use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use ising_core::{QuenchConfig, SweepMode, TemperatureSweepConfig};
use serde::de::DeserializeOwned;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ising2d")]
#[command(about = "2D Ising model Metropolis Monte Carlo", long_about = None)]
pub struct Cli {
    /// Hide progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Measure M, E, Cv and Chi over a temperature range, one CSV per lattice size
    Sweep(SweepArgs),
    /// Quench a random lattice and record snapshots of the domain growth
    Viz(VizArgs),
}

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// YAML file with temperature sweep settings (overridden by flags)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lattice side lengths to simulate
    #[arg(long, value_delimiter = ',', default_values_t = [20usize, 40, 60, 80])]
    pub sizes: Vec<usize>,

    /// Directory receiving ising_L{N}.csv files
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Sweep algorithm: checkerboard or sequential
    #[arg(long)]
    pub mode: Option<SweepMode>,

    /// Base RNG seed; size i uses seed + i
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads for checkerboard sweeps
    #[arg(long)]
    pub workers: Option<usize>,

    #[arg(long)]
    pub t_start: Option<f64>,

    #[arg(long)]
    pub t_end: Option<f64>,

    #[arg(long)]
    pub t_step: Option<f64>,

    /// Sweeps discarded per temperature (default 2000 + 10 * L)
    #[arg(long)]
    pub equilibration_sweeps: Option<usize>,

    #[arg(long)]
    pub collect_sweeps: Option<usize>,

    #[arg(long)]
    pub sample_interval: Option<usize>,
}

impl SweepArgs {
    pub fn resolve(&self) -> Result<TemperatureSweepConfig> {
        let mut cfg: TemperatureSweepConfig = load_config(self.config.as_deref())?;
        if let Some(v) = self.mode {
            cfg.sweep_mode = v;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if self.workers.is_some() {
            cfg.n_workers = self.workers;
        }
        if let Some(v) = self.t_start {
            cfg.t_start = v;
        }
        if let Some(v) = self.t_end {
            cfg.t_end = v;
        }
        if let Some(v) = self.t_step {
            cfg.t_step = v;
        }
        if self.equilibration_sweeps.is_some() {
            cfg.equilibration_sweeps = self.equilibration_sweeps;
        }
        if let Some(v) = self.collect_sweeps {
            cfg.collect_sweeps = v;
        }
        if let Some(v) = self.sample_interval {
            cfg.sample_interval = v;
        }
        Ok(cfg)
    }
}

#[derive(Args, Debug)]
pub struct VizArgs {
    /// YAML file with quench settings (overridden by flags)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Lattice side length
    #[arg(long)]
    pub size: Option<usize>,

    /// Quench temperature
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Snapshots after the initial one
    #[arg(long)]
    pub frames: Option<usize>,

    #[arg(long)]
    pub sweeps_per_frame: Option<usize>,

    /// Sweep algorithm: checkerboard or sequential
    #[arg(long)]
    pub mode: Option<SweepMode>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub workers: Option<usize>,

    /// Snapshot file, one lattice per line
    #[arg(short, long, default_value = "snapshots.txt")]
    pub output: PathBuf,
}

impl VizArgs {
    pub fn resolve(&self) -> Result<QuenchConfig> {
        let mut cfg: QuenchConfig = load_config(self.config.as_deref())?;
        if let Some(v) = self.size {
            cfg.side_length = v;
        }
        if let Some(v) = self.temperature {
            cfg.temperature = v;
        }
        if let Some(v) = self.frames {
            cfg.n_frames = v;
        }
        if let Some(v) = self.sweeps_per_frame {
            cfg.sweeps_per_frame = v;
        }
        if let Some(v) = self.mode {
            cfg.sweep_mode = v;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if self.workers.is_some() {
            cfg.n_workers = self.workers;
        }
        Ok(cfg)
    }
}

/// Read a YAML config file, or fall back to defaults when none is given.
fn load_config<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    info!("Reading configuration from: {}", path.display());
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", path.display()))?;
    serde_yml::from_str(&content).wrap_err("Failed to parse configuration file")
}
