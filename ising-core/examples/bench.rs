use std::time::Instant;

use ising_core::{RandomSource, SpinLattice, SweepMode, UpdateEngine};

const L: usize = 256;
const TEMPERATURE: f64 = 2.269;
const N_SWEEPS: usize = 200;

fn time_mode(engine: &mut UpdateEngine, mode: SweepMode) -> f64 {
    let mut lattice = SpinLattice::new(L).unwrap();
    lattice.initialize(engine.rng_mut());
    engine.set_temperature(TEMPERATURE).unwrap();

    let t0 = Instant::now();
    let mut accepted = 0u64;
    for _ in 0..N_SWEEPS {
        accepted += engine.sweep(&mut lattice, mode).unwrap().accepted;
    }
    let elapsed = t0.elapsed().as_secs_f64();

    let per_sweep = elapsed / N_SWEEPS as f64 * 1000.0;
    let rate = accepted as f64 / (N_SWEEPS * L * L) as f64;
    println!(
        "{:<13} {:.3} s  |  {:.3} ms/sweep  |  acceptance {:.3}",
        mode.to_string(),
        elapsed,
        per_sweep,
        rate
    );
    elapsed
}

fn main() {
    let mut engine = UpdateEngine::new(RandomSource::seed_from_u64(42));

    println!(
        "Lattice: {}x{}  |  T: {}  |  Sweeps: {}  |  Workers: {}",
        L,
        L,
        TEMPERATURE,
        N_SWEEPS,
        engine.n_workers()
    );
    println!("{}", "-".repeat(70));

    let seq = time_mode(&mut engine, SweepMode::Sequential);
    let par = time_mode(&mut engine, SweepMode::Checkerboard);
    println!("Speedup: {:.2}x", seq / par);
}
