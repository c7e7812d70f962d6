pub mod lattice;

pub use lattice::SpinLattice;
pub(crate) use lattice::periodic_neighbors;
