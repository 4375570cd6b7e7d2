//! `materials-cli simulate`: build a randomly-packed Lennard-Jones argon gas
//! in a square box, integrate it, and report observables at a fixed
//! cadence.

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use md2d_engine::{setup_atoms_randomly, Engine, EngineConfig, ElementProps};

use crate::error::Result;
use crate::output;

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Number of argon atoms to place.
    #[arg(short = 'n', long, default_value_t = 50)]
    pub atoms: usize,

    /// Square domain side length, in nm.
    #[arg(long, default_value_t = 10.0)]
    pub box_size: f64,

    /// Initial and thermostat target temperature, in kelvin.
    #[arg(long, default_value_t = 300.0)]
    pub temperature: f64,

    /// Total simulated time, in femtoseconds.
    #[arg(long, default_value_t = 5_000.0)]
    pub duration: f64,

    /// Integration step, in femtoseconds.
    #[arg(long, default_value_t = 1.0)]
    pub dt: f64,

    /// How often to report observables, in femtoseconds.
    #[arg(long, default_value_t = 500.0)]
    pub report_every: f64,

    /// RNG seed for the random placement, for reproducible runs.
    #[arg(long, default_value_t = 1)]
    pub seed: u64,

    /// Enable the velocity-rescaling thermostat.
    #[arg(long, default_value_t = false)]
    pub thermostat: bool,
}

pub fn execute(args: &SimulateArgs) -> Result<()> {
    let config = EngineConfig {
        use_lennard_jones: true,
        use_thermostat: args.thermostat,
        target_temperature: args.temperature,
        ..Default::default()
    };

    let mut engine = Engine::new(config);
    engine.set_size(args.box_size, args.box_size)?;
    let argon = engine.add_element(ElementProps {
        mass: 39.948,
        epsilon: 0.0103,
        sigma: 0.3405,
    });

    let mut rng = StdRng::seed_from_u64(args.seed);
    setup_atoms_randomly(&mut engine, argon, args.atoms, args.temperature, &mut rng)?;

    info!(atoms = args.atoms, box_size = args.box_size, "starting simulation");
    output::print_info(&format!(
        "placed {} argon atoms in a {:.1} x {:.1} nm box",
        args.atoms, args.box_size, args.box_size
    ));

    let mut elapsed = 0.0;
    while elapsed < args.duration {
        let burst = args.report_every.min(args.duration - elapsed);
        engine.integrate(burst, args.dt)?;
        elapsed += burst;

        let state = engine.compute_output_state();
        output::print_info(&format!(
            "t={:>8.1} fs  T={:>7.2} K  PE={:>10.4} eV  KE={:>10.4} eV",
            state.time, state.temperature_kelvin, state.potential_energy_ev, state.kinetic_energy_ev
        ));
    }

    output::print_success("simulation complete");
    Ok(())
}
