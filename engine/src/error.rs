//! Error types for the 2D molecular dynamics engine

use thiserror::Error;

/// Result type alias for the engine crate
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors the engine's public surface can return.
///
/// Contract violations (setup ordering, invalid arguments) and numerical
/// divergence are both represented here rather than as panics: nothing in
/// the public surface panics or `unwrap()`s on caller-supplied input.
#[derive(Error, Debug)]
pub enum EngineError {
    /// `set_size` was called a second time.
    #[error("domain size was already set")]
    SizeAlreadySet,

    /// An atom-creating call happened before any element was declared.
    #[error("elements must be initialized before atoms can be created")]
    ElementsNotInitialized,

    /// `create_atoms_array` was called more than once.
    #[error("atoms array was already created")]
    AtomsAlreadyCreated,

    /// `create_atoms_array(n)` received a count outside `1..=1000`.
    #[error("invalid atom count {n}: must satisfy 1 <= n <= 1000")]
    InvalidAtomCount { n: i64 },

    /// A target temperature was NaN, negative, or infinite.
    #[error("invalid temperature {value}: must be finite and non-negative")]
    InvalidTemperature { value: f64 },

    /// `integrate` or `minimize_energy` was called with no atoms present.
    #[error("cannot integrate: no atoms in the system")]
    NoAtoms,

    /// An atom's coordinate went non-finite or left the simulation domain
    /// by more than 100x its extent during a drift step.
    #[error("model diverged at atom {atom}: position ({x}, {y})")]
    Diverged { atom: usize, x: f64, y: f64 },

    /// A caller tried to mutate the (epsilon, sigma) of an LJ kernel that is
    /// already wired into the pairwise coefficient matrix.
    #[error(
        "Lennard-Jones coefficients for elements ({element_a}, {element_b}) are already in \
         use; set them through the element API instead of mutating the kernel directly"
    )]
    LjCoefficientsInUse { element_a: usize, element_b: usize },

    /// An index (atom, element, bond, obstacle, spring) was out of range.
    #[error("index {index} out of range for {what} (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// Catch-all, mirroring the teacher crate's own `Other` variant.
    #[error("{0}")]
    Other(String),
}

impl EngineError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
