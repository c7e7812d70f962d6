use std::sync::atomic::{AtomicI8, Ordering};

use rayon::prelude::*;
use rayon::ThreadPool;

use crate::mcmc::SweepStats;
use crate::rng::RandomSource;

/// Spin array shared by all workers of one checkerboard pass.
///
/// Within a pass every worker writes only sites of the active parity in its
/// own rows and reads only sites of the other parity, so no index is written
/// by one worker while another touches it. Relaxed atomics are enough: the
/// rayon join at the end of each pass orders the two passes.
pub(crate) struct SharedSpins<'a> {
    spins: &'a [AtomicI8],
}

impl<'a> SharedSpins<'a> {
    pub(crate) fn new(spins: &'a mut [i8]) -> Self {
        // SAFETY: AtomicI8 has the same size, alignment and bit validity as
        // i8, and the exclusive borrow rules out non-atomic access for 'a.
        let spins = unsafe { &*(spins as *mut [i8] as *const [AtomicI8]) };
        Self { spins }
    }

    #[inline]
    pub(crate) fn get(&self, i: usize) -> i8 {
        self.spins[i].load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn flip(&self, i: usize) {
        let s = self.spins[i].load(Ordering::Relaxed);
        self.spins[i].store(-s, Ordering::Relaxed);
    }
}

/// Dispatch `body(row, rng)` over `n_rows` rows split into one static,
/// contiguous block per worker RNG.
///
/// Blocks when done; the per-row [`SweepStats`] are summed. When `pool` is
/// given the work runs on it, otherwise on the global rayon pool.
pub(crate) fn par_over_rows(
    n_rows: usize,
    rngs: &mut [RandomSource],
    pool: Option<&ThreadPool>,
    body: impl Fn(usize, &mut RandomSource) -> SweepStats + Send + Sync,
) -> SweepStats {
    let n_workers = rngs.len().max(1);
    let rows_per_worker = n_rows.div_ceil(n_workers);

    let mut work = move || {
        rngs.into_par_iter()
            .enumerate()
            .map(|(w, rng)| {
                let start = (w * rows_per_worker).min(n_rows);
                let end = (start + rows_per_worker).min(n_rows);
                (start..end).fold(SweepStats::default(), |acc, y| acc + body(y, rng))
            })
            .reduce(SweepStats::default, |a, b| a + b)
    };

    match pool {
        Some(pool) => pool.install(work),
        None => work(),
    }
}
