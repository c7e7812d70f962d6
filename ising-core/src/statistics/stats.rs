use super::results::ThermoRow;

/// Running sums of energy and magnetization samples at one temperature.
///
/// Magnetization enters as `|M|`. Sums are kept in `f64`, which represents
/// the integer-valued samples and their squares exactly at the lattice sizes
/// and sample counts used here.
#[derive(Clone, Debug, Default)]
pub struct Statistics {
    count: usize,
    sum_e: f64,
    sum_e2: f64,
    sum_m: f64,
    sum_m2: f64,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one sample of total energy and signed total magnetization.
    pub fn record(&mut self, energy: f64, magnetization: i64) {
        let m = magnetization.unsigned_abs() as f64;
        self.count += 1;
        self.sum_e += energy;
        self.sum_e2 += energy * energy;
        self.sum_m += m;
        self.sum_m2 += m * m;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Per-site means and fluctuation observables for `n_spins = N²` sites.
    ///
    /// `Cv = Var(E) / (T² N²)` and `Chi = Var(|M|) / (T N²)`, with variances
    /// taken as `<x²> - <x>²` over the recorded samples.
    pub fn finish(&self, temperature: f64, n_spins: usize) -> ThermoRow {
        let sites = n_spins as f64;
        let c = self.count.max(1) as f64;
        let e_mean = self.sum_e / c;
        let m_mean = self.sum_m / c;
        let e_var = self.sum_e2 / c - e_mean * e_mean;
        let m_var = self.sum_m2 / c - m_mean * m_mean;

        ThermoRow {
            temperature,
            magnetization: m_mean / sites,
            energy: e_mean / sites,
            specific_heat: e_var / (temperature * temperature * sites),
            susceptibility: m_var / (temperature * sites),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_samples_have_no_fluctuation() {
        let mut stats = Statistics::new();
        for _ in 0..10 {
            stats.record(-32.0, -16);
        }
        let row = stats.finish(2.0, 16);
        assert_eq!(stats.count(), 10);
        assert_relative_eq!(row.magnetization, 1.0);
        assert_relative_eq!(row.energy, -2.0);
        assert_relative_eq!(row.specific_heat, 0.0);
        assert_relative_eq!(row.susceptibility, 0.0);
    }

    #[test]
    fn test_variances() {
        // E in {-8, -4}: mean -6, var 4. |M| in {2, 4}: mean 3, var 1.
        let mut stats = Statistics::new();
        stats.record(-8.0, 2);
        stats.record(-4.0, -4);
        let row = stats.finish(2.0, 4);
        assert_relative_eq!(row.energy, -1.5);
        assert_relative_eq!(row.magnetization, 0.75);
        assert_relative_eq!(row.specific_heat, 4.0 / (4.0 * 4.0));
        assert_relative_eq!(row.susceptibility, 1.0 / (2.0 * 4.0));
    }

    #[test]
    fn test_empty_is_zero() {
        let row = Statistics::new().finish(1.0, 4);
        assert_eq!(row.energy, 0.0);
        assert_eq!(row.specific_heat, 0.0);
    }
}
