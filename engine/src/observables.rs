//! Derived quantities: potential/kinetic energy, temperature, center of
//! mass, the thermostat's per-step temperature adjustment, and the
//! pressure-probe / van-der-Waals-line helper arrays a renderer would read.

use crate::engine::Engine;
use crate::pressure_buffers::Wall;
use crate::units::{mw_energy_to_ev, KB_EV_PER_K};

/// Pressure (bar) on each probed wall of one obstacle, from the rolling
/// impulse buffers. `None` for a wall whose probe flag is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObstaclePressure {
    pub obstacle: usize,
    pub west: Option<f64>,
    pub north: Option<f64>,
    pub east: Option<f64>,
    pub south: Option<f64>,
}

/// A full snapshot of the engine's derived observables, the analogue of a
/// single `computeOutputState` call.
#[derive(Debug, Clone)]
pub struct OutputState {
    pub time: f64,
    pub potential_energy_ev: f64,
    pub kinetic_energy_ev: f64,
    pub temperature_kelvin: f64,
    pub center_of_mass: (f64, f64),
    pub center_of_mass_velocity: (f64, f64),
    pub angular_velocity: f64,
    pub pressures: Vec<ObstaclePressure>,
}

impl Engine {
    /// Recompute every derived quantity a host would display: energies,
    /// temperature, center-of-mass kinematics, pressure probes, and refresh
    /// the renderer-facing bond/vdW-pair mirrors.
    pub fn compute_output_state(&mut self) -> OutputState {
        self.bonds.refresh_radial_results(&self.atoms.x, &self.atoms.y);
        self.update_vdw_pairs_array();

        let potential_energy_ev = self.compute_potential_energy_ev();
        let kinetic_energy_mw = self.total_kinetic_energy_mw();
        let kinetic_energy_ev = mw_energy_to_ev(kinetic_energy_mw);
        let temperature_kelvin = self.instantaneous_temperature(kinetic_energy_mw);
        let (center_of_mass, center_of_mass_velocity, angular_velocity) = self.center_of_mass_kinematics();
        let pressures = self.compute_pressure_map();

        OutputState {
            time: self.time,
            potential_energy_ev,
            kinetic_energy_ev,
            temperature_kelvin,
            center_of_mass,
            center_of_mass_velocity,
            angular_velocity,
            pressures,
        }
    }

    fn compute_potential_energy_ev(&self) -> f64 {
        let mut pe = 0.0;

        if self.config.use_lennard_jones {
            for i in 0..self.atoms.len() {
                for &j in self.neighbors.neighbors_of(i) {
                    if self.bonds.matrix.contains(i, j) {
                        continue;
                    }
                    let dx = self.atoms.x[j] - self.atoms.x[i];
                    let dy = self.atoms.y[j] - self.atoms.y[i];
                    let r_sq = dx * dx + dy * dy;
                    let pair = self.elements.pair(self.atoms.element[i], self.atoms.element[j]);
                    if r_sq <= pair.lj_cutoff_sq && r_sq > 0.0 {
                        pe += pair.lj.potential_from_squared_distance(r_sq);
                    }
                }
            }
        }

        if self.config.use_coulomb {
            let charged = self.atoms.charged_indices();
            for (a, &i) in charged.iter().enumerate() {
                for &j in &charged[a + 1..] {
                    if self.bonds.matrix.contains(i, j) {
                        continue;
                    }
                    let dx = self.atoms.x[j] - self.atoms.x[i];
                    let dy = self.atoms.y[j] - self.atoms.y[i];
                    let r_sq = dx * dx + dy * dy;
                    if r_sq > 0.0 {
                        pe += crate::potentials::Coulomb::potential_from_squared_distance(
                            self.atoms.charge[i],
                            self.atoms.charge[j],
                            r_sq,
                        );
                    }
                }
            }
        }

        for bond in &self.bonds.radial {
            let dx = self.atoms.x[bond.atom2] - self.atoms.x[bond.atom1];
            let dy = self.atoms.y[bond.atom2] - self.atoms.y[bond.atom1];
            let r = (dx * dx + dy * dy).sqrt();
            pe += 0.5 * bond.strength * (r - bond.length0).powi(2);
        }

        for bond in &self.bonds.angular {
            let r1x = self.atoms.x[bond.atom1] - self.atoms.x[bond.atom3];
            let r1y = self.atoms.y[bond.atom1] - self.atoms.y[bond.atom3];
            let r2x = self.atoms.x[bond.atom2] - self.atoms.x[bond.atom3];
            let r2y = self.atoms.y[bond.atom2] - self.atoms.y[bond.atom3];
            let len1 = (r1x * r1x + r1y * r1y).sqrt();
            let len2 = (r2x * r2x + r2y * r2y).sqrt();
            if len1 <= 0.0 || len2 <= 0.0 {
                continue;
            }
            let cos_theta = ((r1x * r2x + r1y * r2y) / (len1 * len2)).clamp(-1.0, 1.0);
            let theta = cos_theta.acos();
            pe += 0.5 * bond.strength * (theta - bond.angle0).powi(2);
        }

        for restraint in &self.bonds.restraints {
            let dx = self.atoms.x[restraint.atom] - restraint.x0;
            let dy = self.atoms.y[restraint.atom] - restraint.y0;
            pe += 0.5 * restraint.k * (dx * dx + dy * dy);
        }

        if let Some(g) = self.config.gravity {
            let mut gravity_mw = 0.0;
            for i in 0..self.atoms.len() {
                gravity_mw += self.atoms.mass[i] * g * self.atoms.y[i];
            }
            for obstacle in self.obstacles.iter() {
                if obstacle.is_movable() {
                    gravity_mw += obstacle.mass * g * obstacle.y;
                }
            }
            pe += mw_energy_to_ev(gravity_mw);
        }

        pe
    }

    fn total_kinetic_energy_mw(&self) -> f64 {
        let mut ke = 0.0;
        for i in 0..self.atoms.len() {
            ke += self.atoms.kinetic_energy_mw(i);
        }
        for obstacle in self.obstacles.iter() {
            ke += obstacle.kinetic_energy_mw();
        }
        ke
    }

    /// Degrees of freedom in 2D: two per non-pinned atom, two per movable
    /// obstacle. Pinned atoms and immovable obstacles contribute none.
    fn degrees_of_freedom(&self) -> f64 {
        let movable_obstacles = self.obstacles.iter().filter(|o| o.is_movable()).count();
        2.0 * (self.atoms.len() + movable_obstacles) as f64
    }

    fn instantaneous_temperature(&self, kinetic_energy_mw: f64) -> f64 {
        let dof = self.degrees_of_freedom();
        if dof <= 0.0 {
            return 0.0;
        }
        let ke_ev = mw_energy_to_ev(kinetic_energy_mw);
        2.0 * ke_ev / (dof * KB_EV_PER_K)
    }

    fn center_of_mass_kinematics(&self) -> ((f64, f64), (f64, f64), f64) {
        let total_mass = self.atoms.total_mass();
        if total_mass <= 0.0 {
            return ((0.0, 0.0), (0.0, 0.0), 0.0);
        }
        let mut cx = 0.0;
        let mut cy = 0.0;
        let mut vx = 0.0;
        let mut vy = 0.0;
        for i in 0..self.atoms.len() {
            cx += self.atoms.mass[i] * self.atoms.x[i];
            cy += self.atoms.mass[i] * self.atoms.y[i];
            vx += self.atoms.mass[i] * self.atoms.vx[i];
            vy += self.atoms.mass[i] * self.atoms.vy[i];
        }
        cx /= total_mass;
        cy /= total_mass;
        vx /= total_mass;
        vy /= total_mass;

        let mut angular_momentum = 0.0;
        let mut moment_of_inertia = 0.0;
        for i in 0..self.atoms.len() {
            let rx = self.atoms.x[i] - cx;
            let ry = self.atoms.y[i] - cy;
            let rel_vx = self.atoms.vx[i] - vx;
            let rel_vy = self.atoms.vy[i] - vy;
            angular_momentum += self.atoms.mass[i] * (rx * rel_vy - ry * rel_vx);
            moment_of_inertia += self.atoms.mass[i] * (rx * rx + ry * ry);
        }
        let angular_velocity = if moment_of_inertia > 0.0 {
            angular_momentum / moment_of_inertia
        } else {
            0.0
        };

        ((cx, cy), (vx, vy), angular_velocity)
    }

    fn compute_pressure_map(&self) -> Vec<ObstaclePressure> {
        let mut out = Vec::with_capacity(self.obstacles.len());
        for (idx, obstacle) in self.obstacles.iter().enumerate() {
            out.push(ObstaclePressure {
                obstacle: idx,
                west: obstacle.probe_west.then(|| self.pressure.pressure_bar(idx, Wall::West, obstacle.height)),
                north: obstacle.probe_north.then(|| self.pressure.pressure_bar(idx, Wall::North, obstacle.width)),
                east: obstacle.probe_east.then(|| self.pressure.pressure_bar(idx, Wall::East, obstacle.height)),
                south: obstacle.probe_south.then(|| self.pressure.pressure_bar(idx, Wall::South, obstacle.width)),
            });
        }
        out
    }

    /// Pairs within `vdwLinesRatio * sigma_ij`, not bonded, with zero or
    /// opposite charge. Used by a renderer to draw faint van-der-Waals
    /// contact lines; not consulted by any force computation.
    pub(crate) fn update_vdw_pairs_array(&mut self) {
        self.vdw_pairs.clear();
        let n = self.atoms.len();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.bonds.matrix.contains(i, j) {
                    continue;
                }
                let qi = self.atoms.charge[i];
                let qj = self.atoms.charge[j];
                if qi * qj > 0.0 {
                    continue;
                }
                let dx = self.atoms.x[j] - self.atoms.x[i];
                let dy = self.atoms.y[j] - self.atoms.y[i];
                let r_sq = dx * dx + dy * dy;
                let pair = self.elements.pair(self.atoms.element[i], self.atoms.element[j]);
                let threshold = self.config.vdw_lines_ratio * pair.lj.sigma();
                if r_sq <= threshold * threshold {
                    self.vdw_pairs.push((i, j));
                }
            }
        }
    }

    pub fn vdw_pairs(&self) -> &[(usize, usize)] {
        &self.vdw_pairs
    }

    /// Called once per integration step. `force_adjustment` bypasses the
    /// thermostat's enabled/transient gating, e.g. for a one-shot rescale
    /// right after `relax_to_temperature` sets a new target.
    pub(crate) fn adjust_temperature(&mut self, force_adjustment: bool) {
        let kinetic_energy_mw = self.total_kinetic_energy_mw();
        let instantaneous_t = self.instantaneous_temperature(kinetic_energy_mw);

        if let Some(ratio) = self.thermostat.adjust(instantaneous_t, force_adjustment) {
            for i in 0..self.atoms.len() {
                self.atoms.vx[i] *= ratio;
                self.atoms.vy[i] *= ratio;
                self.atoms.sync_momentum(i);
            }
            for obstacle in self.obstacles.iter_mut() {
                if obstacle.is_movable() {
                    obstacle.vx *= ratio;
                    obstacle.vy *= ratio;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::AtomProps;
    use crate::config::EngineConfig;
    use crate::engine::ElementProps;
    use approx::assert_relative_eq;

    fn argon_engine() -> Engine {
        let mut engine = Engine::new(EngineConfig {
            size: Some((10.0, 10.0)),
            ..Default::default()
        });
        engine.set_size(10.0, 10.0).ok();
        engine.initialize_elements([ElementProps {
            mass: 39.948,
            epsilon: 0.0103,
            sigma: 0.3405,
        }]);
        engine
    }

    #[test]
    fn stationary_population_has_zero_temperature() {
        let mut engine = argon_engine();
        engine
            .add_atom(AtomProps {
                x: 5.0,
                y: 5.0,
                ..Default::default()
            })
            .unwrap();
        let state = engine.compute_output_state();
        assert_relative_eq!(state.temperature_kelvin, 0.0);
        assert_relative_eq!(state.kinetic_energy_ev, 0.0);
    }

    #[test]
    fn center_of_mass_of_symmetric_pair_is_their_midpoint() {
        let mut engine = argon_engine();
        engine
            .add_atom(AtomProps {
                x: 4.0,
                y: 5.0,
                ..Default::default()
            })
            .unwrap();
        engine
            .add_atom(AtomProps {
                x: 6.0,
                y: 5.0,
                ..Default::default()
            })
            .unwrap();
        let state = engine.compute_output_state();
        assert_relative_eq!(state.center_of_mass.0, 5.0, max_relative = 1e-9);
        assert_relative_eq!(state.center_of_mass.1, 5.0, max_relative = 1e-9);
    }
}
