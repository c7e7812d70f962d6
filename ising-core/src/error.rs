use thiserror::Error;

pub type Result<T> = std::result::Result<T, IsingError>;

/// Errors raised by the lattice engine and the simulation drivers.
#[derive(Debug, Error)]
pub enum IsingError {
    /// Temperature must be strictly positive (and not NaN).
    #[error("temperature must be > 0, got {0}")]
    InvalidTemperature(f64),

    /// A sweep was requested before any probability table was computed.
    #[error("no probability table: call set_temperature before sweeping")]
    MissingProbabilityTable,

    #[error("lattice side length must be >= 1, got {0}")]
    InvalidSideLength(usize),

    /// Odd periodic lattices have same-colour neighbours across the seam.
    #[error("checkerboard sweep needs an even side length (or 1), got {0}")]
    OddSideLength(usize),

    #[error("spin at index {index} is {value}, expected +1 or -1")]
    InvalidSpin { index: usize, value: i8 },

    #[error("snapshot has {found} spins, expected {expected}")]
    SnapshotLength { expected: usize, found: usize },

    #[error("snapshot parse error: {0}")]
    SnapshotParse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
