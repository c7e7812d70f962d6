use crate::error::{IsingError, Result};
use crate::rng::RandomSource;

/// Periodic N×N square lattice of ±1 spins.
///
/// Spins are stored contiguously with `index = x + y * N`, so a row `y`
/// occupies `spins[y*N .. (y+1)*N]`. Every element is +1 or -1 for the whole
/// lifetime of the lattice; a fresh lattice starts fully aligned (+1) until
/// [`initialize`](SpinLattice::initialize) randomizes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpinLattice {
    n: usize,
    spins: Vec<i8>,
}

impl SpinLattice {
    /// Create an N×N lattice with all spins up.
    pub fn new(n: usize) -> Result<Self> {
        Self::filled(n, 1)
    }

    /// Create an N×N lattice with every spin set to `spin` (+1 or -1).
    pub fn filled(n: usize, spin: i8) -> Result<Self> {
        if n == 0 {
            return Err(IsingError::InvalidSideLength(n));
        }
        if spin != 1 && spin != -1 {
            return Err(IsingError::InvalidSpin {
                index: 0,
                value: spin,
            });
        }
        Ok(Self {
            n,
            spins: vec![spin; n * n],
        })
    }

    /// Build a lattice from explicit spin values in `x + y * N` order.
    pub fn from_spins(n: usize, spins: Vec<i8>) -> Result<Self> {
        if n == 0 {
            return Err(IsingError::InvalidSideLength(n));
        }
        if spins.len() != n * n {
            return Err(IsingError::SnapshotLength {
                expected: n * n,
                found: spins.len(),
            });
        }
        if let Some((index, &value)) = spins
            .iter()
            .enumerate()
            .find(|&(_, &s)| s != 1 && s != -1)
        {
            return Err(IsingError::InvalidSpin { index, value });
        }
        Ok(Self { n, spins })
    }

    /// Set every site independently to ±1 with equal probability.
    pub fn initialize(&mut self, rng: &mut RandomSource) {
        for s in self.spins.iter_mut() {
            *s = rng.spin();
        }
    }

    #[inline]
    pub fn side_length(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn n_spins(&self) -> usize {
        self.spins.len()
    }

    #[inline]
    pub fn spins(&self) -> &[i8] {
        &self.spins
    }

    #[inline]
    pub(crate) fn spins_mut(&mut self) -> &mut [i8] {
        &mut self.spins
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        x + y * self.n
    }

    /// Spin at `(x, y)`, or 0 when either coordinate lies outside `[0, N)`.
    pub fn get_spin(&self, x: isize, y: isize) -> i8 {
        let n = self.n as isize;
        if x < 0 || x >= n || y < 0 || y >= n {
            return 0;
        }
        self.spins[x as usize + y as usize * self.n]
    }

    /// Set the spin at `(x, y)`. Values other than ±1 are rejected.
    pub fn set_spin(&mut self, x: usize, y: usize, spin: i8) -> Result<()> {
        let index = self.index(x, y);
        if spin != 1 && spin != -1 {
            return Err(IsingError::InvalidSpin { index, value: spin });
        }
        self.spins[index] = spin;
        Ok(())
    }

    /// Negate the spin at `(x, y)`. Coordinates must be in range.
    #[inline]
    pub fn flip_spin(&mut self, x: usize, y: usize) {
        let i = self.index(x, y);
        self.spins[i] = -self.spins[i];
    }

    /// Flat indices of the four periodic neighbors of `(x, y)`, in the
    /// order right, left, up, down.
    #[inline]
    pub fn neighbors(&self, x: usize, y: usize) -> [usize; 4] {
        periodic_neighbors(self.n, x, y)
    }

    /// Sum of the four periodic neighbors; always one of -4, -2, 0, 2, 4.
    #[inline]
    pub fn neighbor_sum(&self, x: usize, y: usize) -> i32 {
        self.neighbors(x, y)
            .iter()
            .map(|&j| self.spins[j] as i32)
            .sum()
    }
}

/// Periodic neighbor lookup on an `n`×`n` lattice: right, left, up, down.
///
/// Wraparound matches `(c ± 1) mod n` without a division.
#[inline]
pub(crate) fn periodic_neighbors(n: usize, x: usize, y: usize) -> [usize; 4] {
    let right = if x + 1 == n { 0 } else { x + 1 };
    let left = if x == 0 { n - 1 } else { x - 1 };
    let up = if y == 0 { n - 1 } else { y - 1 };
    let down = if y + 1 == n { 0 } else { y + 1 };

    let row = y * n;
    [right + row, left + row, x + up * n, x + down * n]
}
