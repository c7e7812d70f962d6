use crate::error::{IsingError, Result};
use crate::spins::COUPLING;

/// Metropolis acceptance probabilities for the two positive energy changes
/// reachable on a 4-neighbor lattice with unit coupling: ΔE = 4J and 8J.
///
/// A table is tied to the temperature it was built for; changing the
/// temperature means building a new table.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbabilityTable {
    temperature: f64,
    p4: f64,
    p8: f64,
}

impl ProbabilityTable {
    /// Precompute `exp(-4J/T)` and `exp(-8J/T)`.
    ///
    /// `T` must be > 0. `T = +inf` is allowed and yields probability 1 for
    /// every move.
    pub fn new(temperature: f64) -> Result<Self> {
        if temperature.is_nan() || temperature <= 0.0 {
            return Err(IsingError::InvalidTemperature(temperature));
        }
        Ok(Self {
            temperature,
            p4: (-4.0 * COUPLING / temperature).exp(),
            p8: (-8.0 * COUPLING / temperature).exp(),
        })
    }

    #[inline]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Acceptance probability for a positive energy change (in units of J).
    #[inline]
    pub fn acceptance(&self, delta_e: i32) -> f64 {
        debug_assert!(
            delta_e == 4 || delta_e == 8,
            "positive energy change must be 4 or 8, got {delta_e}"
        );
        if delta_e <= 4 {
            self.p4
        } else {
            self.p8
        }
    }
}
