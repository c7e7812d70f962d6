use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Pseudo-random source owned by exactly one execution context.
///
/// The sequential sweep uses one instance; the checkerboard sweep hands one
/// instance to each worker. Streams for workers come from [`split`], which
/// advances a copy of the generator by the xoshiro jump function so the
/// streams never overlap.
///
/// [`split`]: RandomSource::split
#[derive(Clone, Debug)]
pub struct RandomSource {
    rng: Xoshiro256StarStar,
}

impl RandomSource {
    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }

    /// Seed from OS entropy; used when the run has no fixed seed.
    pub fn from_entropy() -> Self {
        Self {
            rng: Xoshiro256StarStar::from_entropy(),
        }
    }

    /// Uniform real in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Uniform integer in `[0, n)`. `n` must be non-zero.
    #[inline]
    pub fn uniform_index(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// +1 or -1 with equal probability.
    #[inline]
    pub fn spin(&mut self) -> i8 {
        if self.rng.gen::<bool>() {
            1
        } else {
            -1
        }
    }

    /// Derive `n` independent streams, each 2^128 steps apart.
    ///
    /// `self` is advanced past the last handed-out stream, so later draws
    /// from it do not collide with any worker either.
    pub fn split(&mut self, n: usize) -> Vec<RandomSource> {
        let mut streams = Vec::with_capacity(n);
        for _ in 0..n {
            self.rng.jump();
            streams.push(self.clone());
        }
        self.rng.jump();
        streams
    }
}
