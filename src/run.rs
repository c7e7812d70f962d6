use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use color_eyre::eyre::{ensure, Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use ising_core::{
    build_engine, run_quench, run_temperature_sweep, total_sweeps, write_csv_header, SpinLattice,
    ThermoRow,
};
use tracing::info;
use validator::Validate;

use crate::cli::{SweepArgs, VizArgs};

fn progress_bar(len: usize, message: String, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )?
        .progress_chars("=> "),
    );
    pb.set_message(message);
    Ok(pb)
}

/// Temperature sweep for every requested size, each to its own CSV file.
pub fn sweep(args: &SweepArgs, no_progress: bool) -> Result<Vec<PathBuf>> {
    let config = args.resolve()?;
    config
        .validate()
        .wrap_err("Invalid temperature sweep configuration")?;
    for &size in &args.sizes {
        ensure!(size > 0, "lattice sizes must be >= 1");
        config
            .sweep_mode
            .check_side_length(size)
            .wrap_err_with(|| format!("Cannot run a {} sweep at L={size}", config.sweep_mode))?;
    }
    fs::create_dir_all(&args.output_dir).wrap_err_with(|| {
        format!(
            "Unable to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    let mut written = Vec::with_capacity(args.sizes.len());
    for (i, &size) in args.sizes.iter().enumerate() {
        info!("--- Simulating lattice L={size} ---");
        let seed = config.seed.map(|s| s.wrapping_add(i as u64));
        let mut engine = build_engine(seed, config.n_workers)?;
        let mut lattice = SpinLattice::new(size)?;
        lattice.initialize(engine.rng_mut());

        let path = args.output_dir.join(format!("ising_L{size}.csv"));
        let file = File::create(&path)
            .wrap_err_with(|| format!("Unable to create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        write_csv_header(&mut out)?;

        let pb = progress_bar(
            total_sweeps(&config, size),
            format!("L={size}"),
            no_progress,
        )?;
        let mut on_row = |row: &ThermoRow| -> ising_core::Result<()> {
            row.write_csv(&mut out)?;
            out.flush()?;
            Ok(())
        };
        run_temperature_sweep(&mut lattice, &mut engine, &config, &mut on_row, &|| {
            pb.inc(1)
        })
        .wrap_err_with(|| format!("Temperature sweep failed for L={size}"))?;
        pb.finish();

        info!("Saved to {}", path.display());
        written.push(path);
    }
    Ok(written)
}

/// Quench run writing one snapshot line per frame.
pub fn viz(args: &VizArgs, no_progress: bool) -> Result<PathBuf> {
    let config = args.resolve()?;
    config.validate().wrap_err("Invalid quench configuration")?;
    let mut engine = build_engine(config.seed, config.n_workers)?;

    let file = File::create(&args.output)
        .wrap_err_with(|| format!("Unable to create {}", args.output.display()))?;
    let mut out = BufWriter::new(file);

    let pb = progress_bar(
        config.n_frames * config.sweeps_per_frame,
        format!("L={} T={}", config.side_length, config.temperature),
        no_progress,
    )?;
    let lattice = run_quench(&mut engine, &config, &mut out, &|| pb.inc(1))
        .wrap_err("Quench failed")?;
    pb.finish();

    info!(
        "Saved {} frames to {} (final m={:.4})",
        config.n_frames + 1,
        args.output.display(),
        lattice.magnetization_per_site()
    );
    Ok(args.output.clone())
}
