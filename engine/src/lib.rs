//! A 2D classical molecular dynamics engine: Lennard-Jones and Coulomb
//! pairwise forces, bonded/restraint/spring forces, velocity-Verlet
//! integration driven by a cell-list-backed Verlet neighbor list, a
//! velocity-rescaling thermostat, rectangular obstacles with elastic
//! collisions and pressure probes, and steepest-descent energy
//! minimization.

pub mod atoms;
pub mod bonds;
pub mod cell_list;
pub mod config;
pub mod elements;
pub mod engine;
pub mod error;
pub mod lattice;
pub mod neighbor_list;
pub mod obstacles;
pub mod observables;
pub mod potentials;
pub mod pressure_buffers;
pub mod snapshot;
pub mod thermostat;
pub mod units;

mod collisions;
mod forces;
mod integrator;

pub use atoms::AtomProps;
pub use bonds::{AngularBondProps, BondStyle, RadialBondProps, RestraintProps, SpringForce};
pub use config::EngineConfig;
pub use engine::{Engine, ElementProps};
pub use error::{EngineError, Result};
pub use lattice::{
    find_minimum_pe_location, find_minimum_pe_squared_location, place_atoms_on_lattice, setup_atoms_randomly,
    PotentialCalculator,
};
pub use obstacles::ObstacleProps;
pub use observables::{ObstaclePressure, OutputState};
pub use snapshot::EngineState;

/// The crate version, as reported by a host application's `--version` flag.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
