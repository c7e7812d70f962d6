use std::io::Write;

use crate::error::Result;

pub const CSV_HEADER: &str = "T,M,E,Cv,Chi";

/// Observables measured at one temperature.
///
/// `magnetization` is the mean of `|M|` per site, `energy` the mean energy
/// per site.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermoRow {
    pub temperature: f64,
    pub magnetization: f64,
    pub energy: f64,
    /// Cv.
    pub specific_heat: f64,
    /// Chi.
    pub susceptibility: f64,
}

impl ThermoRow {
    /// One CSV row, four decimals per field.
    pub fn write_csv<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(
            out,
            "{:.4},{:.4},{:.4},{:.4},{:.4}",
            self.temperature,
            self.magnetization,
            self.energy,
            self.specific_heat,
            self.susceptibility
        )?;
        Ok(())
    }
}

pub fn write_csv_header<W: Write>(out: &mut W) -> Result<()> {
    writeln!(out, "{CSV_HEADER}")?;
    Ok(())
}
