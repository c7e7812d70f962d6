use std::ops::{Add, AddAssign};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::SweepMode;
use crate::error::{IsingError, Result};
use crate::geometry::{periodic_neighbors, SpinLattice};
use crate::mcmc::probability::ProbabilityTable;
use crate::parallel::{par_over_rows, SharedSpins};
use crate::rng::RandomSource;

/// Trial and acceptance counts of one or more sweeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SweepStats {
    pub attempted: u64,
    pub accepted: u64,
}

impl SweepStats {
    pub fn acceptance_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.attempted as f64
    }

    #[inline]
    fn trial(accepted: bool) -> Self {
        Self {
            attempted: 1,
            accepted: accepted as u64,
        }
    }
}

impl Add for SweepStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            attempted: self.attempted + rhs.attempted,
            accepted: self.accepted + rhs.accepted,
        }
    }
}

impl AddAssign for SweepStats {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// The Metropolis rule for one site.
///
/// `delta_e = 2 * s * h` (units of J). Moves with `delta_e <= 0` are accepted
/// without consuming randomness; otherwise one uniform draw is compared with
/// the tabulated `exp(-delta_e / T)`.
#[inline]
fn metropolis_accept(
    spin: i8,
    neighbor_sum: i32,
    table: &ProbabilityTable,
    rng: &mut RandomSource,
) -> bool {
    let delta_e = 2 * spin as i32 * neighbor_sum;
    delta_e <= 0 || rng.uniform() < table.acceptance(delta_e)
}

/// Applies Metropolis dynamics to a [`SpinLattice`].
///
/// Owns the acceptance table for the current temperature, the random source
/// for sequential updates, and one random source per checkerboard worker.
/// Worker sources are created once at construction and reused by every
/// parallel sweep.
pub struct UpdateEngine {
    table: Option<ProbabilityTable>,
    rng: RandomSource,
    worker_rngs: Vec<RandomSource>,
    pool: Option<ThreadPool>,
}

impl UpdateEngine {
    /// Engine running checkerboard passes on the global rayon pool, with one
    /// worker stream per rayon thread.
    pub fn new(rng: RandomSource) -> Self {
        Self::build(rng, rayon::current_num_threads(), None)
    }

    /// Engine with a dedicated fixed-size pool of `n_workers` threads.
    pub fn with_workers(rng: RandomSource, n_workers: usize) -> Result<Self> {
        if n_workers == 0 {
            return Err(IsingError::Config("n_workers must be >= 1".to_string()));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(n_workers)
            .thread_name(|i| format!("ising-worker-{i}"))
            .build()
            .map_err(|e| IsingError::Config(format!("failed to build thread pool: {e}")))?;
        Ok(Self::build(rng, n_workers, Some(pool)))
    }

    fn build(mut rng: RandomSource, n_workers: usize, pool: Option<ThreadPool>) -> Self {
        let worker_rngs = rng.split(n_workers.max(1));
        Self {
            table: None,
            rng,
            worker_rngs,
            pool,
        }
    }

    pub fn n_workers(&self) -> usize {
        self.worker_rngs.len()
    }

    /// Recompute the acceptance table. Must precede any sweep at a new `T`.
    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        self.table = Some(ProbabilityTable::new(temperature)?);
        Ok(())
    }

    pub fn temperature(&self) -> Option<f64> {
        self.table.map(|t| t.temperature())
    }

    pub fn table(&self) -> Option<&ProbabilityTable> {
        self.table.as_ref()
    }

    /// The sequential random source, e.g. for [`SpinLattice::initialize`].
    pub fn rng_mut(&mut self) -> &mut RandomSource {
        &mut self.rng
    }

    fn current_table(&self) -> Result<ProbabilityTable> {
        self.table.ok_or(IsingError::MissingProbabilityTable)
    }

    /// Apply the Metropolis rule once at `(x, y)`; returns whether it flipped.
    pub fn metropolis_step(
        &mut self,
        lattice: &mut SpinLattice,
        x: usize,
        y: usize,
    ) -> Result<bool> {
        let table = self.current_table()?;
        Ok(self.step(lattice, &table, x, y))
    }

    #[inline]
    fn step(
        &mut self,
        lattice: &mut SpinLattice,
        table: &ProbabilityTable,
        x: usize,
        y: usize,
    ) -> bool {
        let spin = lattice.spins()[lattice.index(x, y)];
        let h = lattice.neighbor_sum(x, y);
        if metropolis_accept(spin, h, table, &mut self.rng) {
            lattice.flip_spin(x, y);
            true
        } else {
            false
        }
    }

    /// `N²` single-site trials at uniformly random sites, with replacement.
    ///
    /// Sites may be visited several times or not at all within one call.
    #[cfg_attr(feature = "profile", inline(never))]
    pub fn metropolis_sweep(&mut self, lattice: &mut SpinLattice) -> Result<SweepStats> {
        let table = self.current_table()?;
        let n = lattice.side_length();
        let mut stats = SweepStats::default();
        for _ in 0..lattice.n_spins() {
            let x = self.rng.uniform_index(n);
            let y = self.rng.uniform_index(n);
            stats += SweepStats::trial(self.step(lattice, &table, x, y));
        }
        Ok(stats)
    }

    /// Checkerboard sweep: every site exactly once, in two parity passes.
    ///
    /// Pass `p` updates all sites with `(x + y) % 2 == p` concurrently, rows
    /// split statically across the workers. Pass 1 starts only after pass 0
    /// has completed. Odd side lengths above 1 are rejected because sites on
    /// both sides of the periodic seam share a parity.
    #[cfg_attr(feature = "profile", inline(never))]
    pub fn metropolis_sweep_parallel(&mut self, lattice: &mut SpinLattice) -> Result<SweepStats> {
        let table = self.current_table()?;
        let n = lattice.side_length();
        SweepMode::Checkerboard.check_side_length(n)?;

        let shared = SharedSpins::new(lattice.spins_mut());
        let mut stats = SweepStats::default();
        for parity in 0..2 {
            stats += par_over_rows(n, &mut self.worker_rngs, self.pool.as_ref(), |y, rng| {
                let mut row = SweepStats::default();
                let mut x = (y + parity) % 2;
                while x < n {
                    let i = x + y * n;
                    let h: i32 = periodic_neighbors(n, x, y)
                        .iter()
                        .map(|&j| shared.get(j) as i32)
                        .sum();
                    let accepted = metropolis_accept(shared.get(i), h, &table, rng);
                    if accepted {
                        shared.flip(i);
                    }
                    row += SweepStats::trial(accepted);
                    x += 2;
                }
                row
            });
        }
        Ok(stats)
    }

    pub fn sweep(&mut self, lattice: &mut SpinLattice, mode: SweepMode) -> Result<SweepStats> {
        match mode {
            SweepMode::Sequential => self.metropolis_sweep(lattice),
            SweepMode::Checkerboard => self.metropolis_sweep_parallel(lattice),
        }
    }
}
