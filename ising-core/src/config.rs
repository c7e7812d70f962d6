use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::error::{IsingError, Result as IsingResult};

/// Longest temperature grid a sweep may request.
pub const MAX_TEMPERATURES: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    /// `N²` Metropolis trials at random sites, single thread.
    Sequential,
    /// Two parity passes covering every site once, rows split across workers.
    Checkerboard,
}

impl TryFrom<&str> for SweepMode {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "checkerboard" => Ok(Self::Checkerboard),
            _ => Err(format!(
                "unknown sweep_mode '{s}', expected 'sequential' or 'checkerboard'"
            )),
        }
    }
}

impl FromStr for SweepMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

impl fmt::Display for SweepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => f.write_str("sequential"),
            Self::Checkerboard => f.write_str("checkerboard"),
        }
    }
}

impl SweepMode {
    /// Whether an `n`×`n` lattice can be swept in this mode.
    ///
    /// Checkerboard sweeps need an even side (or a single site): on an odd
    /// periodic lattice the seam joins two sites of the same parity.
    pub fn check_side_length(self, n: usize) -> IsingResult<()> {
        match self {
            Self::Checkerboard if n > 1 && n % 2 == 1 => Err(IsingError::OddSideLength(n)),
            _ => Ok(()),
        }
    }
}

fn validate_workers(n_workers: Option<usize>) -> Result<(), ValidationError> {
    if n_workers == Some(0) {
        return Err(ValidationError::new("n_workers must be >= 1"));
    }
    Ok(())
}

fn validate_temperature_sweep(cfg: &TemperatureSweepConfig) -> Result<(), ValidationError> {
    if !(cfg.t_start > 0.0 && cfg.t_end > 0.0) {
        return Err(ValidationError::new("t_start and t_end must be > 0"));
    }
    if !(cfg.t_start.is_finite() && cfg.t_end.is_finite()) {
        return Err(ValidationError::new("t_start and t_end must be finite"));
    }
    if !(cfg.t_step > 0.0 && cfg.t_step.is_finite()) {
        return Err(ValidationError::new("t_step must be a finite value > 0"));
    }
    if (cfg.t_end - cfg.t_start).abs() / cfg.t_step >= MAX_TEMPERATURES as f64 {
        return Err(ValidationError::new(
            "temperature range spans too many t_step increments",
        ));
    }
    if cfg.collect_sweeps < 1 {
        return Err(ValidationError::new("collect_sweeps must be >= 1"));
    }
    if cfg.sample_interval < 1 {
        return Err(ValidationError::new("sample_interval must be >= 1"));
    }
    if cfg.sample_interval > cfg.collect_sweeps {
        return Err(ValidationError::new(
            "sample_interval must be <= collect_sweeps",
        ));
    }
    validate_workers(cfg.n_workers)
}

/// Parameters of an annealing run over a range of temperatures.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
#[validate(schema(function = "validate_temperature_sweep"))]
pub struct TemperatureSweepConfig {
    pub t_start: f64,
    pub t_end: f64,
    pub t_step: f64,
    /// Sweeps discarded at each temperature; `None` means `2000 + 10 * N`.
    pub equilibration_sweeps: Option<usize>,
    pub collect_sweeps: usize,
    /// Measure after every `sample_interval`-th collection sweep.
    pub sample_interval: usize,
    pub sweep_mode: SweepMode,
    pub seed: Option<u64>,
    pub n_workers: Option<usize>,
}

impl Default for TemperatureSweepConfig {
    fn default() -> Self {
        Self {
            t_start: 2.6,
            t_end: 2.0,
            t_step: 0.02,
            equilibration_sweeps: None,
            collect_sweeps: 10_000,
            sample_interval: 5,
            sweep_mode: SweepMode::Checkerboard,
            seed: None,
            n_workers: None,
        }
    }
}

impl TemperatureSweepConfig {
    /// Temperatures from `t_start` towards `t_end` in steps of `t_step`,
    /// both ends included when the range is a whole number of steps.
    pub fn temperatures(&self) -> Vec<f64> {
        let span = self.t_end - self.t_start;
        let direction = if span < 0.0 { -1.0 } else { 1.0 };
        let n_steps = (span.abs() / self.t_step + 1e-9).floor() as usize;
        (0..=n_steps)
            .map(|k| self.t_start + direction * k as f64 * self.t_step)
            .collect()
    }

    pub fn equilibration_for(&self, side_length: usize) -> usize {
        self.equilibration_sweeps.unwrap_or(2000 + 10 * side_length)
    }

    /// Number of measurements taken per temperature.
    pub fn n_samples(&self) -> usize {
        self.collect_sweeps.div_ceil(self.sample_interval)
    }
}

fn validate_quench(cfg: &QuenchConfig) -> Result<(), ValidationError> {
    if cfg.side_length < 1 {
        return Err(ValidationError::new("side_length must be >= 1"));
    }
    if cfg.temperature.is_nan() || cfg.temperature <= 0.0 {
        return Err(ValidationError::new("temperature must be > 0"));
    }
    if cfg.n_frames < 1 {
        return Err(ValidationError::new("n_frames must be >= 1"));
    }
    if cfg.sweeps_per_frame < 1 {
        return Err(ValidationError::new("sweeps_per_frame must be >= 1"));
    }
    if cfg.sweep_mode.check_side_length(cfg.side_length).is_err() {
        return Err(ValidationError::new(
            "checkerboard sweeps need an even side_length",
        ));
    }
    validate_workers(cfg.n_workers)
}

/// Parameters of a quench from a random state, recorded as snapshots.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
#[validate(schema(function = "validate_quench"))]
pub struct QuenchConfig {
    pub side_length: usize,
    pub temperature: f64,
    /// Snapshots written after the initial one.
    pub n_frames: usize,
    pub sweeps_per_frame: usize,
    pub sweep_mode: SweepMode,
    pub seed: Option<u64>,
    pub n_workers: Option<usize>,
}

impl Default for QuenchConfig {
    fn default() -> Self {
        Self {
            side_length: 200,
            temperature: 1.0,
            n_frames: 100,
            sweeps_per_frame: 10,
            sweep_mode: SweepMode::Checkerboard,
            seed: None,
            n_workers: None,
        }
    }
}
