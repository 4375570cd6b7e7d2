//! The simulation engine: data model, lifecycle, and the public surface
//! that ties every other module together. Force accumulation, collisions,
//! and observables are implemented as further `impl Engine` blocks in
//! `forces.rs`, `collisions.rs`, and `observables.rs` respectively, mostly
//! to keep this file to the lifecycle/API surface the way the teacher
//! crate splits a large subsystem across sibling files rather than one
//! monolithic `impl`.

use tracing::info;

use crate::atoms::{AtomProps, Atoms};
use crate::bonds::{AngularBondProps, Bonds, RadialBondProps, RestraintProps, SpringForce};
use crate::cell_list::CellList;
use crate::config::EngineConfig;
use crate::elements::{Element, Elements};
use crate::error::{EngineError, Result};
use crate::neighbor_list::NeighborList;
use crate::obstacles::{ObstacleProps, Obstacles};
use crate::pressure_buffers::PressureBuffers;
use crate::snapshot::EngineState;
use crate::thermostat::Thermostat;

/// Properties accepted by [`Engine::add_element`] / [`Engine::initialize_elements`].
#[derive(Debug, Clone, Copy)]
pub struct ElementProps {
    pub mass: f64,
    pub epsilon: f64,
    pub sigma: f64,
}

pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) elements: Elements,
    pub(crate) atoms: Atoms,
    pub(crate) bonds: Bonds,
    pub(crate) obstacles: Obstacles,
    pub(crate) pressure: PressureBuffers,
    pub(crate) cells: CellList,
    pub(crate) neighbors: NeighborList,
    pub(crate) thermostat: Thermostat,
    pub(crate) time: f64,
    pub(crate) vdw_pairs: Vec<(usize, usize)>,
    pub(crate) atoms_created: bool,
    pub(crate) accelerations_initialized: bool,
    pub(crate) last_cell_max_cutoff: f64,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let mut thermostat = Thermostat::new();
        thermostat.enabled = config.use_thermostat;
        thermostat.target_temperature = config.target_temperature;
        Self {
            config,
            elements: Elements::new(),
            atoms: Atoms::new(),
            bonds: Bonds::new(),
            obstacles: Obstacles::new(),
            pressure: PressureBuffers::new(),
            cells: CellList::new(1.0, 1.0, 1.0),
            neighbors: NeighborList::new(),
            thermostat,
            time: 0.0,
            vdw_pairs: Vec::new(),
            atoms_created: false,
            accelerations_initialized: false,
            last_cell_max_cutoff: 0.0,
        }
    }

    // ---- configuration toggles -------------------------------------------------

    pub fn use_coulomb_interaction(&mut self, on: bool) {
        self.config.use_coulomb = on;
    }

    pub fn use_lennard_jones_interaction(&mut self, on: bool) {
        self.config.use_lennard_jones = on;
    }

    pub fn use_thermostat(&mut self, on: bool) {
        self.config.use_thermostat = on;
        self.thermostat.enabled = on;
    }

    pub fn set_target_temperature(&mut self, kelvin: f64) -> Result<()> {
        if !kelvin.is_finite() || kelvin < 0.0 {
            return Err(EngineError::InvalidTemperature { value: kelvin });
        }
        self.config.target_temperature = kelvin;
        self.thermostat.target_temperature = kelvin;
        Ok(())
    }

    pub fn set_gravitational_field(&mut self, g: Option<f64>) {
        self.config.gravity = g;
    }

    pub fn set_viscosity(&mut self, viscosity: f64) {
        self.config.viscosity = viscosity;
    }

    pub fn set_vdw_lines_ratio(&mut self, ratio: f64) {
        self.config.vdw_lines_ratio = ratio;
    }

    pub fn set_size(&mut self, lx: f64, ly: f64) -> Result<()> {
        if self.config.size.is_some() || self.atoms_created {
            return Err(EngineError::SizeAlreadySet);
        }
        self.config.size = Some((lx, ly));
        Ok(())
    }

    pub fn get_size(&self) -> Option<(f64, f64)> {
        self.config.size
    }

    pub fn set_time(&mut self, t: f64) {
        self.time = t;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    // ---- catalog population -----------------------------------------------------

    pub fn initialize_elements(&mut self, list: impl IntoIterator<Item = ElementProps>) -> Vec<usize> {
        list.into_iter().map(|props| self.add_element(props)).collect()
    }

    pub fn add_element(&mut self, props: ElementProps) -> usize {
        self.elements
            .add(Element::new(props.mass, props.epsilon, props.sigma))
    }

    pub fn create_atoms_array(&mut self, n: i64) -> Result<()> {
        if self.elements.is_empty() {
            return Err(EngineError::ElementsNotInitialized);
        }
        if self.atoms_created {
            return Err(EngineError::AtomsAlreadyCreated);
        }
        if !(1..=1000).contains(&n) {
            return Err(EngineError::InvalidAtomCount { n });
        }
        self.atoms_created = true;
        Ok(())
    }

    pub fn add_atom(&mut self, props: AtomProps) -> Result<usize> {
        if self.elements.is_empty() {
            return Err(EngineError::ElementsNotInitialized);
        }
        let element = props.element;
        let idx = self.atoms.add(props, &self.elements)?;
        self.elements.set_in_use(element, true)?;
        self.accelerations_initialized = false;
        Ok(idx)
    }

    pub fn add_radial_bond(&mut self, props: RadialBondProps) -> usize {
        self.bonds.add_radial(props)
    }

    pub fn add_angular_bond(&mut self, props: AngularBondProps) -> usize {
        self.bonds.add_angular(props)
    }

    pub fn add_restraint(&mut self, props: RestraintProps) -> usize {
        self.bonds.add_restraint(props)
    }

    pub fn add_obstacle(&mut self, props: ObstacleProps) -> usize {
        let idx = self.obstacles.add(props);
        let probe_idx = self.pressure.add_obstacle();
        debug_assert_eq!(idx, probe_idx, "obstacle and pressure buffer indices must stay aligned");
        idx
    }

    pub fn add_spring_force(&mut self, spring: SpringForce) -> usize {
        self.bonds.add_spring_force(spring)
    }

    pub fn update_spring_force(&mut self, i: usize, x: f64, y: f64) -> Result<()> {
        self.bonds.update_spring_force(i, x, y)
    }

    pub fn remove_spring_force(&mut self, i: usize) -> Result<()> {
        self.bonds.remove_spring_force(i)
    }

    // ---- per-entity property setters --------------------------------------------

    pub fn set_atom_properties(&mut self, i: usize, props: AtomProps) -> Result<()> {
        let element = props.element;
        self.atoms.set_properties(i, props, &self.elements)?;
        self.elements.set_in_use(element, true)?;
        Ok(())
    }

    pub fn set_element_properties(&mut self, i: usize, props: ElementProps) -> Result<()> {
        self.elements.set_properties(i, props.mass, props.epsilon, props.sigma)?;
        let el = self.elements.get(i)?;
        self.atoms.propagate_element_change(i, el.mass, el.radius);
        Ok(())
    }

    pub fn set_radial_bond_properties(&mut self, i: usize, props: RadialBondProps) -> Result<()> {
        self.bonds.set_radial_properties(i, props)
    }

    pub fn set_obstacle_properties(&mut self, i: usize, props: ObstacleProps) -> Result<()> {
        self.obstacles.set_properties(i, props)
    }

    // ---- queries -----------------------------------------------------------------

    pub fn get_number_of_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn get_total_mass(&self) -> f64 {
        self.atoms.total_mass()
    }

    pub fn get_radius_of_element(&self, i: usize) -> Result<f64> {
        Ok(self.elements.get(i)?.radius)
    }

    pub fn get_atom_kinetic_energy(&self, i: usize) -> Result<f64> {
        if i >= self.atoms.len() {
            return Err(EngineError::IndexOutOfRange {
                what: "atom",
                index: i,
                len: self.atoms.len(),
            });
        }
        Ok(crate::units::mw_energy_to_ev(self.atoms.kinetic_energy_mw(i)))
    }

    pub fn get_atom_neighbors(&self, i: usize) -> Vec<usize> {
        self.neighbors.atom_neighbors(i)
    }

    pub fn get_bonded_atoms(&self, i: usize) -> Vec<usize> {
        self.bonds.matrix.bonded_atoms(i).to_vec()
    }

    pub fn get_molecule_atoms(&self, i: usize) -> Vec<usize> {
        self.bonds.matrix.molecule_atoms(i)
    }

    pub fn atom_in_bounds(&self, x: f64, y: f64, radius: f64) -> bool {
        let Some((lx, ly)) = self.config.size else {
            return false;
        };
        x >= radius && x <= lx - radius && y >= radius && y <= ly - radius
    }

    pub fn can_place_atom(&self, x: f64, y: f64, radius: f64) -> bool {
        if !self.atom_in_bounds(x, y, radius) {
            return false;
        }
        for i in 0..self.atoms.len() {
            let dx = self.atoms.x[i] - x;
            let dy = self.atoms.y[i] - y;
            let min_dist = self.atoms.radius[i] + radius;
            if dx * dx + dy * dy < min_dist * min_dist {
                return false;
            }
        }
        for obstacle in self.obstacles.iter() {
            let inflated_left = obstacle.left() - radius;
            let inflated_right = obstacle.right() + radius;
            let inflated_bottom = obstacle.bottom() - radius;
            let inflated_top = obstacle.top() + radius;
            if x > inflated_left && x < inflated_right && y > inflated_bottom && y < inflated_top {
                return false;
            }
        }
        true
    }

    // ---- snapshot / restore --------------------------------------------------

    pub fn get_state(&self) -> EngineState {
        EngineState {
            atoms: self.atoms.clone(),
            obstacles: self.obstacles.clone(),
            pressure: self.pressure.clone(),
            time: self.time,
        }
    }

    pub fn restore(&mut self, state: &EngineState) {
        self.atoms = state.atoms.clone();
        self.obstacles = state.obstacles.clone();
        self.pressure = state.pressure.clone();
        self.time = state.time;
        self.accelerations_initialized = false;
    }

    // ---- stepping ------------------------------------------------------------

    /// Integrate for `duration` fs at fixed step `dt`. See `integrator.rs`
    /// for the per-step velocity-Verlet substeps.
    pub fn integrate(&mut self, duration: f64, dt: f64) -> Result<()> {
        if self.atoms.is_empty() {
            return Err(EngineError::NoAtoms);
        }
        let steps = (duration / dt).floor() as usize;
        info!(steps, dt, "integrate");

        if !self.accelerations_initialized {
            self.accumulate_forces(true)?;
            self.accelerations_initialized = true;
        }

        for _ in 0..steps {
            self.step(dt)?;
        }

        self.pressure.advance(duration);
        Ok(())
    }

    /// Offline loop: begin a transient temperature change and keep calling
    /// `integrate` in small bursts until the thermostat's windowed average
    /// settles within tolerance of `target`.
    pub fn relax_to_temperature(&mut self, target: f64, dt: f64) -> Result<()> {
        self.set_target_temperature(target)?;
        self.thermostat.begin_transient_temperature_change();
        const BURST_FS: f64 = 100.0;
        const MAX_BURSTS: usize = 10_000;
        let mut bursts = 0;
        while self.thermostat.is_transient_in_progress() && bursts < MAX_BURSTS {
            self.integrate(BURST_FS, dt)?;
            bursts += 1;
        }
        Ok(())
    }

    /// Steepest-descent energy minimization: move every atom along its
    /// acceleration by `stepLength/maxAcc`, recomputing forces each
    /// iteration, until the largest acceleration magnitude drops below
    /// `threshold` or `iterLimit` is reached.
    pub fn minimize_energy(&mut self) -> Result<usize> {
        const STEP_LENGTH: f64 = 1e-3;
        const THRESHOLD: f64 = 1e-4;
        const ITER_LIMIT: usize = 3000;

        if self.atoms.is_empty() {
            return Err(EngineError::NoAtoms);
        }

        for iter in 0..ITER_LIMIT {
            self.accumulate_forces(true)?;
            let mut max_acc = 0.0_f64;
            for i in 0..self.atoms.len() {
                let acc = (self.atoms.ax[i].powi(2) + self.atoms.ay[i].powi(2)).sqrt();
                if acc > max_acc {
                    max_acc = acc;
                }
            }
            if max_acc < THRESHOLD {
                return Ok(iter);
            }
            let step = STEP_LENGTH / max_acc;
            for i in 0..self.atoms.len() {
                if self.atoms.pinned[i] {
                    continue;
                }
                self.atoms.x[i] += step * self.atoms.ax[i];
                self.atoms.y[i] += step * self.atoms.ay[i];
            }
        }
        Ok(ITER_LIMIT)
    }
}

/// Scenario and cross-module invariant tests from the engine's testable
/// properties: these exercise whole integration runs rather than a single
/// function, so they live alongside the engine's public surface rather
/// than in any one of the modules they cross.
#[cfg(test)]
mod scenario_tests {
    use super::*;
    use crate::bonds::{BondStyle, RadialBondProps};
    use crate::obstacles::ObstacleProps;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f64::consts::PI;

    const ARGON_MASS: f64 = 39.948;
    const ARGON_EPSILON: f64 = 0.0103;
    const ARGON_SIGMA: f64 = 0.3405;

    fn engine_with_argon(lx: f64, ly: f64) -> (Engine, usize) {
        let mut engine = Engine::new(EngineConfig {
            size: Some((lx, ly)),
            ..Default::default()
        });
        engine.set_size(lx, ly).unwrap();
        let argon = engine.add_element(ElementProps {
            mass: ARGON_MASS,
            epsilon: ARGON_EPSILON,
            sigma: ARGON_SIGMA,
        });
        (engine, argon)
    }

    /// Scenario 1: two argon atoms released near the LJ minimum oscillate
    /// rather than fly apart or collapse, with total energy drifting by
    /// less than 1% over 500 fs.
    #[test]
    fn argon_dimer_oscillates_with_bounded_energy_drift() {
        let (mut engine, argon) = engine_with_argon(10.0, 10.0);
        let r0 = 1.2 * ARGON_SIGMA;
        engine
            .add_atom(AtomProps {
                x: 5.0,
                y: 5.0,
                element: argon,
                ..Default::default()
            })
            .unwrap();
        engine
            .add_atom(AtomProps {
                x: 5.0 + r0,
                y: 5.0,
                element: argon,
                ..Default::default()
            })
            .unwrap();

        let before = engine.compute_output_state();
        let e_before = before.potential_energy_ev + before.kinetic_energy_ev;

        engine.integrate(500.0, 1.0).unwrap();

        let after = engine.compute_output_state();
        let e_after = after.potential_energy_ev + after.kinetic_energy_ev;

        let drift = (e_after - e_before).abs() / e_before.abs();
        assert!(drift < 0.01, "energy drifted by {:.4}%, expected < 1%", drift * 100.0);

        // The pair should still be close to the LJ minimum, not unbound.
        let dx = engine.atoms.x[1] - engine.atoms.x[0];
        let dy = engine.atoms.y[1] - engine.atoms.y[0];
        let r_min = 2f64.powf(1.0 / 6.0) * ARGON_SIGMA;
        assert!((dx * dx + dy * dy).sqrt() < 2.0 * r_min);
    }

    /// Scenario 2: a free, oppositely-charged atom accelerates toward a
    /// pinned fixed charge under Coulomb attraction alone; the kinetic
    /// energy it gains on approach matches the potential energy it loses.
    #[test]
    fn charged_free_atom_accelerates_toward_pinned_charge() {
        let (mut engine, element) = engine_with_argon(10.0, 10.0);
        engine.use_lennard_jones_interaction(false);
        engine.use_coulomb_interaction(true);

        engine
            .add_atom(AtomProps {
                x: 4.0,
                y: 5.0,
                charge: 1.0,
                pinned: true,
                element,
                ..Default::default()
            })
            .unwrap();
        engine
            .add_atom(AtomProps {
                x: 4.8,
                y: 5.0,
                charge: -1.0,
                element,
                ..Default::default()
            })
            .unwrap();

        let before = engine.compute_output_state();
        engine.integrate(20.0, 0.5).unwrap();
        let after = engine.compute_output_state();

        // The pinned atom never moves or gains velocity.
        assert_eq!(engine.atoms.vx[0], 0.0);
        assert_eq!(engine.atoms.vy[0], 0.0);

        // The free atom moved toward the fixed charge.
        assert!(engine.atoms.x[1] < 4.8, "free atom should have drifted toward the pinned charge");

        let delta_u = after.potential_energy_ev - before.potential_energy_ev;
        let delta_ke = after.kinetic_energy_ev - before.kinetic_energy_ev;
        assert_relative_eq!(delta_ke, -delta_u, max_relative = 0.05);
    }

    /// Scenario 3: with the thermostat on, the instantaneous temperature
    /// of a 100-atom gas sits within 1% of the target after a long run
    /// (in fact the rescale forces equality every step once it engages).
    #[test]
    fn thermostat_keeps_temperature_near_target() {
        let (mut engine, argon) = engine_with_argon(20.0, 20.0);
        engine.use_thermostat(true);
        engine.set_target_temperature(300.0).unwrap();

        let mut rng = StdRng::seed_from_u64(42);
        crate::lattice::setup_atoms_randomly(&mut engine, argon, 100, 300.0, &mut rng).unwrap();

        engine.integrate(2000.0, 1.0).unwrap();

        let state = engine.compute_output_state();
        assert_relative_eq!(state.temperature_kelvin, 300.0, max_relative = 0.01);
    }

    /// Scenario 4: an atom colliding head-on with a stationary, equal-mass,
    /// frictionless movable obstacle exchanges velocities exactly, as a
    /// 1-D elastic collision of equal masses requires.
    #[test]
    fn equal_mass_obstacle_collision_exchanges_velocity() {
        let (mut engine, element) = engine_with_argon(10.0, 10.0);
        engine.use_lennard_jones_interaction(false);
        let mass = engine.elements.get(element).unwrap().mass;

        engine
            .add_atom(AtomProps {
                x: 4.0,
                y: 5.0,
                vx: 0.01,
                element,
                ..Default::default()
            })
            .unwrap();

        let obstacle = engine.add_obstacle(ObstacleProps {
            x: 5.0,
            y: 4.0,
            width: 1.0,
            height: 2.0,
            mass,
            ..Default::default()
        });

        engine.integrate(200.0, 1.0).unwrap();

        assert_relative_eq!(engine.atoms.vx[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(engine.obstacles.get(obstacle).unwrap().vx, 0.01, max_relative = 1e-6);

        // No probe was enabled, so the pressure map reports nothing for
        // this obstacle rather than a spurious zero.
        let state = engine.compute_output_state();
        let pressure = &state.pressures[obstacle];
        assert!(pressure.west.is_none());
        assert!(pressure.east.is_none());
    }

    /// Scenario 5: a harmonic radial bond between two otherwise
    /// non-interacting atoms oscillates with the period of a reduced-mass
    /// harmonic oscillator, `2*pi*sqrt(mu/k)` after unit conversion.
    #[test]
    fn radial_bond_period_matches_harmonic_oscillator_formula() {
        let (mut engine, element) = engine_with_argon(10.0, 10.0);
        engine.use_lennard_jones_interaction(false);
        let mass = engine.elements.get(element).unwrap().mass;

        let k_ev_per_nm2 = 10.0;
        let r0 = 0.2;
        let separation = 0.25;

        engine
            .add_atom(AtomProps {
                x: 5.0,
                y: 5.0,
                element,
                ..Default::default()
            })
            .unwrap();
        engine
            .add_atom(AtomProps {
                x: 5.0 + separation,
                y: 5.0,
                element,
                ..Default::default()
            })
            .unwrap();
        engine.add_radial_bond(RadialBondProps {
            atom1: 0,
            atom2: 1,
            length0: r0,
            strength: k_ev_per_nm2,
            style: BondStyle::Solid,
        });

        let reduced_mass = mass * mass / (mass + mass);
        let k_mw = crate::units::ev_to_mw_energy(k_ev_per_nm2);
        let period_fs = 2.0 * PI * (reduced_mass / k_mw).sqrt();

        engine.integrate(period_fs, 1.0).unwrap();

        let final_separation = engine.atoms.x[1] - engine.atoms.x[0];
        assert_relative_eq!(final_separation, separation, max_relative = 0.05);
    }

    /// Scenario 6: steepest-descent minimization on a pair starting deep
    /// in the repulsive wall converges to a separation within [sigma,
    /// 2*sigma] with near-vanishing per-atom acceleration.
    #[test]
    fn minimize_energy_relaxes_deeply_repulsive_pair() {
        let (mut engine, argon) = engine_with_argon(10.0, 10.0);
        engine
            .add_atom(AtomProps {
                x: 5.0,
                y: 5.0,
                element: argon,
                ..Default::default()
            })
            .unwrap();
        engine
            .add_atom(AtomProps {
                x: 5.0 + 0.5 * ARGON_SIGMA,
                y: 5.0,
                element: argon,
                ..Default::default()
            })
            .unwrap();

        engine.minimize_energy().unwrap();

        let dx = engine.atoms.x[1] - engine.atoms.x[0];
        let dy = engine.atoms.y[1] - engine.atoms.y[0];
        let r = (dx * dx + dy * dy).sqrt();
        assert!(
            r >= ARGON_SIGMA && r <= 2.0 * ARGON_SIGMA,
            "separation {r} should land in [sigma, 2*sigma]"
        );

        for i in 0..engine.atoms.len() {
            let acc = (engine.atoms.ax[i].powi(2) + engine.atoms.ay[i].powi(2)).sqrt();
            assert!(acc < 1e-4, "atom {i} acceleration {acc} should be below threshold");
        }
    }

    /// Invariant 7: a bonded pair that is also LJ- and Coulomb-close
    /// produces zero short-range and Coulomb force between them, since
    /// both loops exclude bonded pairs via the bond matrix. The radial
    /// bond's own strength is zero so the only candidate forces are the
    /// excluded ones; any nonzero acceleration means the exclusion failed.
    #[test]
    fn bonded_pair_is_excluded_from_short_range_and_coulomb_forces() {
        let (mut engine, element) = engine_with_argon(10.0, 10.0);
        engine.use_coulomb_interaction(true);

        engine
            .add_atom(AtomProps {
                x: 5.0,
                y: 5.0,
                charge: 1.0,
                element,
                ..Default::default()
            })
            .unwrap();
        engine
            .add_atom(AtomProps {
                x: 5.0 + 0.5 * ARGON_SIGMA,
                y: 5.0,
                charge: -1.0,
                element,
                ..Default::default()
            })
            .unwrap();
        engine.add_radial_bond(RadialBondProps {
            atom1: 0,
            atom2: 1,
            length0: 0.5 * ARGON_SIGMA,
            strength: 0.0,
            style: BondStyle::Solid,
        });

        engine.accumulate_forces(true).unwrap();

        assert_eq!(engine.atoms.ax[0], 0.0);
        assert_eq!(engine.atoms.ay[0], 0.0);
        assert_eq!(engine.atoms.ax[1], 0.0);
        assert_eq!(engine.atoms.ay[1], 0.0);
    }

    /// Round-trip/idempotence: `get_state` followed by an immediate
    /// `restore` must make a later `integrate` run retrace exactly the
    /// trajectory it would have taken without the round trip.
    #[test]
    fn snapshot_restore_round_trip_reproduces_the_trajectory() {
        let (mut engine, argon) = engine_with_argon(10.0, 10.0);
        engine
            .add_atom(AtomProps {
                x: 5.0,
                y: 5.0,
                element: argon,
                ..Default::default()
            })
            .unwrap();
        engine
            .add_atom(AtomProps {
                x: 5.0 + 1.2 * ARGON_SIGMA,
                y: 5.03,
                vx: 0.001,
                element: argon,
                ..Default::default()
            })
            .unwrap();

        let snapshot = engine.get_state();

        engine.integrate(50.0, 1.0).unwrap();
        let first_run_x = engine.atoms.x.clone();
        let first_run_y = engine.atoms.y.clone();

        engine.restore(&snapshot);
        engine.integrate(50.0, 1.0).unwrap();

        assert_eq!(engine.atoms.x, first_run_x);
        assert_eq!(engine.atoms.y, first_run_y);
    }

    /// With no thermostat, gravity, viscosity, bonds, obstacles or
    /// Coulomb, total energy is conserved to within O(dt^2) over a long
    /// run, per the velocity-Verlet integrator's accuracy order.
    #[test]
    fn energy_is_conserved_over_many_steps_without_dissipative_terms() {
        let (mut engine, argon) = engine_with_argon(10.0, 10.0);
        engine
            .add_atom(AtomProps {
                x: 5.0,
                y: 5.0,
                vx: 0.0002,
                element: argon,
                ..Default::default()
            })
            .unwrap();
        engine
            .add_atom(AtomProps {
                x: 5.0 + 1.1 * ARGON_SIGMA,
                y: 5.0,
                vx: -0.0002,
                element: argon,
                ..Default::default()
            })
            .unwrap();

        let before = engine.compute_output_state();
        let e_before = before.potential_energy_ev + before.kinetic_energy_ev;

        engine.integrate(10_000.0, 1.0).unwrap();

        let after = engine.compute_output_state();
        let e_after = after.potential_energy_ev + after.kinetic_energy_ev;

        let drift = (e_after - e_before).abs() / e_before.abs();
        assert!(drift < 0.02, "energy drifted by {:.4}%, expected O(dt^2)", drift * 100.0);
    }
}
