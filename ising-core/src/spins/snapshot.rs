//! Plain-text lattice snapshots.
//!
//! One snapshot per line: all `N*N` spins in `x + y * N` order as `1` or
//! `-1`, separated by single spaces and terminated by `\n`. Repeated saves to
//! the same writer append lines in call order. Readers accept lines with or
//! without a trailing space.

use std::io::{BufRead, Write};

use crate::error::{IsingError, Result};
use crate::geometry::SpinLattice;

impl SpinLattice {
    /// Append the current spin configuration to `out` as one line.
    pub fn save_state<W: Write>(&self, out: &mut W) -> Result<()> {
        let spins = self.spins();
        let last = spins.len() - 1;
        for (i, &s) in spins.iter().enumerate() {
            write!(out, "{s}")?;
            if i != last {
                out.write_all(b" ")?;
            }
        }
        out.write_all(b"\n")?;
        Ok(())
    }
}

/// Parse one snapshot line holding exactly `n_spins` values.
pub fn parse_snapshot(line: &str, n_spins: usize) -> Result<Vec<i8>> {
    let mut spins = Vec::with_capacity(n_spins);
    for token in line.split_whitespace() {
        let value = match token {
            "1" => 1,
            "-1" => -1,
            other => {
                return Err(IsingError::SnapshotParse(format!(
                    "expected 1 or -1 at position {}, got '{other}'",
                    spins.len()
                )))
            }
        };
        spins.push(value);
    }
    if spins.len() != n_spins {
        return Err(IsingError::SnapshotLength {
            expected: n_spins,
            found: spins.len(),
        });
    }
    Ok(spins)
}

/// Read every snapshot of an `n`×`n` lattice from `reader`, skipping blank lines.
pub fn read_snapshots<R: BufRead>(reader: R, n: usize) -> Result<Vec<Vec<i8>>> {
    let n_spins = n * n;
    let mut frames = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        frames.push(parse_snapshot(&line, n_spins)?);
    }
    Ok(frames)
}
