//! CLI surface for driving the md2d-engine molecular dynamics engine from
//! the command line.

pub mod commands;
pub mod error;
pub mod output;

pub use error::{Error, Result};

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "materials-cli")]
#[command(about = "2D molecular dynamics CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a randomly-seeded Lennard-Jones simulation and report its
    /// observables at a fixed cadence.
    Simulate(commands::simulate::SimulateArgs),

    /// Print the engine crate's version.
    Version,
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
