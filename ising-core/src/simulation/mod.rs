use std::io::Write;

use tracing::{debug, info};
use validator::Validate;

use crate::config::{QuenchConfig, SweepMode, TemperatureSweepConfig};
use crate::error::Result;
use crate::geometry::SpinLattice;
use crate::mcmc::UpdateEngine;
use crate::rng::RandomSource;
use crate::statistics::{Statistics, ThermoRow};

/// Build an engine from an optional seed and worker count.
///
/// No seed means OS entropy. No worker count means the global rayon pool.
pub fn build_engine(seed: Option<u64>, n_workers: Option<usize>) -> Result<UpdateEngine> {
    let rng = seed.map_or_else(RandomSource::from_entropy, RandomSource::seed_from_u64);
    let engine = match n_workers {
        Some(n) => UpdateEngine::with_workers(rng, n)?,
        None => UpdateEngine::new(rng),
    };
    debug!("engine ready with {} worker streams", engine.n_workers());
    Ok(engine)
}

/// Total sweeps a temperature sweep performs on an `N`×`N` lattice.
pub fn total_sweeps(config: &TemperatureSweepConfig, side_length: usize) -> usize {
    config.temperatures().len() * (config.equilibration_for(side_length) + config.collect_sweeps)
}

/// Equilibrate and measure at a single temperature.
///
/// Runs `equilibration` unrecorded sweeps, then `collect` sweeps, sampling
/// energy and magnetization after every sweep `i` with `i % interval == 0`.
#[allow(clippy::too_many_arguments)]
pub fn run_temperature(
    lattice: &mut SpinLattice,
    engine: &mut UpdateEngine,
    mode: SweepMode,
    temperature: f64,
    equilibration: usize,
    collect: usize,
    interval: usize,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<ThermoRow> {
    engine.set_temperature(temperature)?;

    debug!("T={temperature:.4}: {equilibration} equilibration sweeps");
    for _ in 0..equilibration {
        engine.sweep(lattice, mode)?;
        on_sweep();
    }

    let mut stats = Statistics::new();
    for i in 0..collect {
        engine.sweep(lattice, mode)?;
        on_sweep();
        if i % interval == 0 {
            stats.record(lattice.compute_total_energy(), lattice.magnetization());
        }
    }

    Ok(stats.finish(temperature, lattice.n_spins()))
}

/// Anneal `lattice` through every temperature of `config`, in order.
///
/// The lattice state carries over from one temperature to the next; the
/// caller initializes it beforehand. `on_row` sees each row as soon as its
/// temperature is done, `on_sweep` is called once per sweep.
pub fn run_temperature_sweep(
    lattice: &mut SpinLattice,
    engine: &mut UpdateEngine,
    config: &TemperatureSweepConfig,
    on_row: &mut dyn FnMut(&ThermoRow) -> Result<()>,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<Vec<ThermoRow>> {
    config.validate()?;
    let n = lattice.side_length();
    config.sweep_mode.check_side_length(n)?;

    let equilibration = config.equilibration_for(n);
    let temperatures = config.temperatures();
    info!(
        "L={n}: {} temperatures, {} sweeps each ({} mode)",
        temperatures.len(),
        equilibration + config.collect_sweeps,
        config.sweep_mode
    );

    let mut rows = Vec::with_capacity(temperatures.len());
    for temperature in temperatures {
        let row = run_temperature(
            lattice,
            engine,
            config.sweep_mode,
            temperature,
            equilibration,
            config.collect_sweeps,
            config.sample_interval,
            on_sweep,
        )?;
        info!(
            "L={n} T={:.4} M={:.4} E={:.4} Cv={:.4} Chi={:.4}",
            row.temperature, row.magnetization, row.energy, row.specific_heat, row.susceptibility
        );
        on_row(&row)?;
        rows.push(row);
    }
    Ok(rows)
}

/// Quench a random (infinite-temperature) lattice to `config.temperature`,
/// appending a snapshot to `sink` before the first sweep and after every
/// `sweeps_per_frame` sweeps. Writes `n_frames + 1` lines and returns the
/// final lattice.
pub fn run_quench<W: Write>(
    engine: &mut UpdateEngine,
    config: &QuenchConfig,
    sink: &mut W,
    on_sweep: &(dyn Fn() + Sync),
) -> Result<SpinLattice> {
    config.validate()?;

    let mut lattice = SpinLattice::new(config.side_length)?;
    lattice.initialize(engine.rng_mut());
    engine.set_temperature(config.temperature)?;
    info!(
        "quench L={} to T={:.4}: {} frames x {} sweeps",
        config.side_length, config.temperature, config.n_frames, config.sweeps_per_frame
    );

    lattice.save_state(sink)?;
    for frame in 1..=config.n_frames {
        for _ in 0..config.sweeps_per_frame {
            engine.sweep(&mut lattice, config.sweep_mode)?;
            on_sweep();
        }
        lattice.save_state(sink)?;
        debug!(
            "frame {frame}: m={:.4} e={:.4}",
            lattice.magnetization_per_site(),
            lattice.energy_per_site()
        );
    }
    sink.flush()?;
    Ok(lattice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IsingError;
    use crate::spins::read_snapshots;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn small_sweep(mode: SweepMode) -> TemperatureSweepConfig {
        TemperatureSweepConfig {
            t_start: 3.0,
            t_end: 2.0,
            t_step: 0.5,
            equilibration_sweeps: Some(20),
            collect_sweeps: 50,
            sample_interval: 5,
            sweep_mode: mode,
            seed: Some(1),
            n_workers: Some(2),
        }
    }

    #[test]
    fn test_temperature_sweep_rows_and_callbacks() {
        for mode in [SweepMode::Sequential, SweepMode::Checkerboard] {
            let config = small_sweep(mode);
            let mut engine = build_engine(config.seed, config.n_workers).unwrap();
            let mut lattice = SpinLattice::new(8).unwrap();
            lattice.initialize(engine.rng_mut());

            let sweeps = AtomicUsize::new(0);
            let mut seen = Vec::new();
            let rows = run_temperature_sweep(
                &mut lattice,
                &mut engine,
                &config,
                &mut |row: &ThermoRow| {
                    seen.push(row.temperature);
                    Ok(())
                },
                &|| {
                    sweeps.fetch_add(1, Ordering::Relaxed);
                },
            )
            .unwrap();

            assert_eq!(rows.len(), 3);
            assert_eq!(seen, vec![3.0, 2.5, 2.0]);
            assert_eq!(sweeps.into_inner(), total_sweeps(&config, 8));
            for row in &rows {
                assert!((0.0..=1.0).contains(&row.magnetization));
                assert!((-2.0..=2.0).contains(&row.energy));
                assert!(row.specific_heat >= -1e-9);
                assert!(row.susceptibility >= -1e-9);
            }
            assert_eq!(engine.temperature(), Some(2.0));
        }
    }

    #[test]
    fn test_temperature_sweep_rejects_bad_config() {
        let config = TemperatureSweepConfig {
            sample_interval: 0,
            ..small_sweep(SweepMode::Sequential)
        };
        let mut engine = build_engine(Some(0), None).unwrap();
        let mut lattice = SpinLattice::new(4).unwrap();
        let result = run_temperature_sweep(
            &mut lattice,
            &mut engine,
            &config,
            &mut |_: &ThermoRow| Ok(()),
            &|| {},
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_odd_checkerboard_fails_before_any_output() {
        let config = small_sweep(SweepMode::Checkerboard);
        let mut engine = build_engine(config.seed, config.n_workers).unwrap();
        let mut lattice = SpinLattice::new(5).unwrap();
        lattice.initialize(engine.rng_mut());
        let start = lattice.clone();

        let mut rows_seen = 0;
        let result = run_temperature_sweep(
            &mut lattice,
            &mut engine,
            &config,
            &mut |_: &ThermoRow| {
                rows_seen += 1;
                Ok(())
            },
            &|| {},
        );
        assert!(matches!(result, Err(IsingError::OddSideLength(5))));
        assert_eq!(rows_seen, 0);
        assert_eq!(lattice, start);

        let quench = QuenchConfig {
            side_length: 5,
            sweep_mode: SweepMode::Checkerboard,
            seed: Some(3),
            ..Default::default()
        };
        let mut buf = Vec::new();
        assert!(run_quench(&mut engine, &quench, &mut buf, &|| {}).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_quench_writes_frames() {
        let config = QuenchConfig {
            side_length: 6,
            temperature: 1.5,
            n_frames: 4,
            sweeps_per_frame: 3,
            sweep_mode: SweepMode::Checkerboard,
            seed: Some(9),
            n_workers: Some(2),
        };
        let mut engine = build_engine(config.seed, config.n_workers).unwrap();
        let mut buf = Vec::new();
        let lattice = run_quench(&mut engine, &config, &mut buf, &|| {}).unwrap();

        let frames = read_snapshots(buf.as_slice(), 6).unwrap();
        assert_eq!(frames.len(), 5);
        assert_eq!(frames[4], lattice.spins());
    }
}
