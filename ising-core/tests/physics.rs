use approx::assert_relative_eq;
use ising_core::{RandomSource, SpinLattice, SweepMode, UpdateEngine, COUPLING};

fn engine(seed: u64) -> UpdateEngine {
    UpdateEngine::with_workers(RandomSource::seed_from_u64(seed), 4).unwrap()
}

#[test]
fn aligned_4x4_energy_is_minus_32() {
    let lattice = SpinLattice::new(4).unwrap();
    assert_relative_eq!(lattice.compute_total_energy(), -COUPLING * 4.0 * 16.0 / 2.0);
    assert_relative_eq!(lattice.compute_total_energy(), -32.0);
}

#[test]
fn flip_round_trip_restores_energy() {
    let mut eng = engine(1);
    let mut lattice = SpinLattice::new(12).unwrap();
    lattice.initialize(eng.rng_mut());
    let e0 = lattice.compute_total_energy();
    let m0 = lattice.magnetization();

    let s = lattice.get_spin(5, 7) as f64;
    let h = lattice.neighbor_sum(5, 7) as f64;
    lattice.flip_spin(5, 7);
    assert_eq!(lattice.compute_total_energy() - e0, 2.0 * COUPLING * s * h);
    assert_eq!(lattice.magnetization() - m0, -2 * s as i64);

    lattice.flip_spin(5, 7);
    assert_eq!(lattice.compute_total_energy(), e0);
    assert_eq!(lattice.magnetization(), m0);
}

#[test]
fn low_temperature_quench_orders() {
    for mode in [SweepMode::Sequential, SweepMode::Checkerboard] {
        let mut eng = engine(2);
        let mut lattice = SpinLattice::new(16).unwrap();
        lattice.initialize(eng.rng_mut());
        eng.set_temperature(0.1).unwrap();
        for _ in 0..1_000 {
            eng.sweep(&mut lattice, mode).unwrap();
        }
        // -2 per site is the ground state; allow a couple of straight domain walls.
        assert!(
            lattice.energy_per_site() < -1.5,
            "{mode}: e = {}",
            lattice.energy_per_site()
        );
    }
}

#[test]
fn high_temperature_magnetization_vanishes() {
    for mode in [SweepMode::Sequential, SweepMode::Checkerboard] {
        let mut eng = engine(3);
        let mut lattice = SpinLattice::new(16).unwrap();
        eng.set_temperature(10.0).unwrap();
        // start fully ordered so disorder has to come from the dynamics
        for _ in 0..100 {
            eng.sweep(&mut lattice, mode).unwrap();
        }
        let mut sum = 0.0;
        let n_samples = 200;
        for _ in 0..n_samples {
            eng.sweep(&mut lattice, mode).unwrap();
            sum += lattice.magnetization_per_site().abs();
        }
        let mean = sum / n_samples as f64;
        assert!(mean < 0.2, "{mode}: <|m|> = {mean}");
    }
}

#[test]
fn sequential_sweep_samples_with_replacement() {
    // At T = inf every trial flips, so a site ends reversed iff it was picked
    // an odd number of times. Random sampling leaves some sites unreversed.
    let mut eng = engine(4);
    eng.set_temperature(f64::INFINITY).unwrap();
    let mut lattice = SpinLattice::new(8).unwrap();
    let stats = eng.metropolis_sweep(&mut lattice).unwrap();
    assert_eq!(stats.attempted, 64);
    assert_ne!(lattice, SpinLattice::filled(8, -1).unwrap());
}

#[test]
fn changing_temperature_replaces_table() {
    let mut eng = engine(5);
    eng.set_temperature(1.0).unwrap();
    let p_cold = eng.table().unwrap().acceptance(4);
    eng.set_temperature(5.0).unwrap();
    let p_hot = eng.table().unwrap().acceptance(4);
    assert_relative_eq!(p_cold, (-4.0f64).exp());
    assert_relative_eq!(p_hot, (-0.8f64).exp());
}
