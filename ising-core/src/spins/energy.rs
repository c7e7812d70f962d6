use crate::geometry::SpinLattice;

/// Ferromagnetic coupling constant J.
pub const COUPLING: f64 = 1.0;

impl SpinLattice {
    /// Total energy `E = -J * Σ_<ij> s_i s_j` over nearest-neighbor bonds.
    ///
    /// Each bond is visited once through the right and down neighbors, which
    /// equals halving the per-site sum `Σ_i s_i * h_i`. The bond sum is
    /// accumulated as an integer, so the result is exact.
    pub fn compute_total_energy(&self) -> f64 {
        let n = self.side_length();
        let spins = self.spins();
        let mut bonds = 0i64;
        for y in 0..n {
            for x in 0..n {
                let [right, _, _, down] = self.neighbors(x, y);
                let si = spins[self.index(x, y)] as i64;
                bonds += si * (spins[right] as i64 + spins[down] as i64);
            }
        }
        -COUPLING * bonds as f64
    }

    /// Signed sum of all spins.
    pub fn magnetization(&self) -> i64 {
        self.spins().iter().map(|&s| s as i64).sum()
    }

    pub fn energy_per_site(&self) -> f64 {
        self.compute_total_energy() / self.n_spins() as f64
    }

    pub fn magnetization_per_site(&self) -> f64 {
        self.magnetization() as f64 / self.n_spins() as f64
    }

    /// Energy change, in units of J, if the spin at `(x, y)` were flipped:
    /// `2 * s * h`. One of -8, -4, 0, 4, 8.
    #[inline]
    pub fn delta_energy(&self, x: usize, y: usize) -> i32 {
        let s = self.spins()[self.index(x, y)] as i32;
        2 * s * self.neighbor_sum(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RandomSource;
    use approx::assert_relative_eq;

    #[test]
    fn test_aligned_4x4_energy() {
        let lat = SpinLattice::new(4).unwrap();
        assert_relative_eq!(lat.compute_total_energy(), -32.0);
        assert_eq!(lat.magnetization(), 16);

        let down = SpinLattice::filled(4, -1).unwrap();
        assert_relative_eq!(down.compute_total_energy(), -32.0);
        assert_eq!(down.magnetization(), -16);
    }

    #[test]
    fn test_antiferromagnetic_4x4_energy() {
        // Checkerboard pattern: every bond is unsatisfied.
        let spins: Vec<i8> = (0..16)
            .map(|i| if (i % 4 + i / 4) % 2 == 0 { 1 } else { -1 })
            .collect();
        let lat = SpinLattice::from_spins(4, spins).unwrap();
        assert_relative_eq!(lat.compute_total_energy(), 32.0);
        assert_eq!(lat.magnetization(), 0);
    }

    #[test]
    fn test_energy_matches_half_site_sum() {
        let mut rng = RandomSource::seed_from_u64(1);
        let mut lat = SpinLattice::new(7).unwrap();
        lat.initialize(&mut rng);

        let mut site_sum = 0i64;
        for y in 0..7 {
            for x in 0..7 {
                site_sum += lat.get_spin(x as isize, y as isize) as i64
                    * lat.neighbor_sum(x, y) as i64;
            }
        }
        assert_relative_eq!(
            lat.compute_total_energy(),
            -COUPLING * site_sum as f64 / 2.0
        );
    }

    #[test]
    fn test_flip_changes_energy_by_delta() {
        let mut rng = RandomSource::seed_from_u64(21);
        let mut lat = SpinLattice::new(8).unwrap();
        lat.initialize(&mut rng);

        for y in 0..8 {
            for x in 0..8 {
                let before = lat.compute_total_energy();
                let delta = lat.delta_energy(x, y);
                assert!([-8, -4, 0, 4, 8].contains(&delta));

                lat.flip_spin(x, y);
                let after = lat.compute_total_energy();
                assert_eq!(after - before, COUPLING * delta as f64);

                lat.flip_spin(x, y);
                assert_eq!(lat.compute_total_energy(), before);
            }
        }
    }

    #[test]
    fn test_magnetization_bounded() {
        let mut rng = RandomSource::seed_from_u64(2);
        for n in [1usize, 3, 10] {
            let mut lat = SpinLattice::new(n).unwrap();
            lat.initialize(&mut rng);
            assert!(lat.magnetization().unsigned_abs() as usize <= n * n);
            assert!(lat.magnetization_per_site().abs() <= 1.0);
        }
    }
}
