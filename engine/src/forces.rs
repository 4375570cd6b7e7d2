//! Force accumulation: short-range Lennard-Jones via the cell/Verlet lists,
//! long-range Coulomb over the charged-atom list, bonded/restraint/spring
//! forces, drag, and gravity.

use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::units::ev_per_nm2_to_mw_force_per_nm;

/// `sin(theta)` is floored at this value so a near-collinear angular bond
/// still gets a large but bounded restoring force instead of a singularity.
const ANGLE_SIN_EPSILON: f64 = 1e-4;

impl Engine {
    /// Recompute every atom's acceleration. `rebuilding` additionally
    /// rebuilds the cell list and the Verlet neighbor list before the force
    /// loop; the non-rebuilding path reuses the list built by the previous
    /// rebuilding step.
    pub(crate) fn accumulate_forces(&mut self, rebuilding: bool) -> Result<()> {
        let n = self.atoms.len();
        for i in 0..n {
            self.atoms.ax[i] = 0.0;
            self.atoms.ay[i] = 0.0;
        }

        if rebuilding {
            self.rebuild_neighbor_list()?;
        }

        if self.config.use_lennard_jones {
            self.accumulate_lennard_jones();
        }
        if self.config.use_coulomb {
            self.accumulate_coulomb();
        }

        self.accumulate_radial_bonds();
        self.accumulate_angular_bonds();
        self.accumulate_restraints();
        self.accumulate_springs();
        if self.config.viscosity != 0.0 {
            self.accumulate_drag();
        }

        for i in 0..n {
            self.atoms.ax[i] /= self.atoms.mass[i];
            self.atoms.ay[i] /= self.atoms.mass[i];
        }

        if let Some(g) = self.config.gravity {
            for i in 0..n {
                self.atoms.ay[i] -= g;
            }
        }

        Ok(())
    }

    fn rebuild_neighbor_list(&mut self) -> Result<()> {
        let (lx, ly) = self.config.size.ok_or(EngineError::NoAtoms)?;
        let max_cutoff = self.elements.max_cutoff();
        let cutoff = if max_cutoff > 0.0 { max_cutoff } else { lx.max(ly).max(1e-6) };
        if (cutoff - self.last_cell_max_cutoff).abs() > 1e-12 {
            self.cells.reinitialize(lx, ly, cutoff);
            self.last_cell_max_cutoff = cutoff;
        }

        self.cells.clear();
        let n = self.atoms.len();
        for i in 0..n {
            self.cells.add_to_cell(i, self.atoms.x[i], self.atoms.y[i]);
        }

        self.neighbors.begin_rebuild(n);
        for row in 0..self.cells.rows() {
            for col in 0..self.cells.cols() {
                let idx = row * self.cells.cols() + col;
                let here = self.cells.get_cell(idx).to_vec();
                for a in 0..here.len() {
                    for b in (a + 1)..here.len() {
                        self.try_mark_neighbor(here[a], here[b]);
                    }
                }
                for (nr, nc) in self.cells.get_neighboring_cells(row, col) {
                    let nidx = nr * self.cells.cols() + nc;
                    let there = self.cells.get_cell(nidx).to_vec();
                    for &a in &here {
                        for &b in &there {
                            self.try_mark_neighbor(a, b);
                        }
                    }
                }
            }
        }
        self.neighbors.finish_rebuild(n);

        for i in 0..n {
            self.neighbors.save_atom_position(i, self.atoms.x[i], self.atoms.y[i]);
        }
        self.neighbors.set_max_displacement(self.elements.min_skin_width());
        Ok(())
    }

    fn try_mark_neighbor(&mut self, i: usize, j: usize) {
        let dx = self.atoms.x[j] - self.atoms.x[i];
        let dy = self.atoms.y[j] - self.atoms.y[i];
        let r_sq = dx * dx + dy * dy;
        let pair = self.elements.pair(self.atoms.element[i], self.atoms.element[j]);
        if r_sq <= pair.neighbor_cutoff_sq {
            self.neighbors.mark_neighbors(i, j);
        }
    }

    /// Short-range LJ over the Verlet list, excluding bonded pairs.
    fn accumulate_lennard_jones(&mut self) {
        for i in 0..self.atoms.len() {
            let neighbors = self.neighbors.neighbors_of(i).to_vec();
            for j in neighbors {
                if self.bonds.matrix.contains(i, j) {
                    continue;
                }
                let dx = self.atoms.x[j] - self.atoms.x[i];
                let dy = self.atoms.y[j] - self.atoms.y[i];
                let r_sq = dx * dx + dy * dy;
                let pair = self.elements.pair(self.atoms.element[i], self.atoms.element[j]);
                if r_sq > pair.lj_cutoff_sq || r_sq <= 0.0 {
                    continue;
                }
                let factor = pair.lj.force_over_distance_from_squared_distance(r_sq);
                self.atoms.ax[i] -= factor * dx;
                self.atoms.ay[i] -= factor * dy;
                self.atoms.ax[j] += factor * dx;
                self.atoms.ay[j] += factor * dy;
            }
        }
    }

    /// Long-range Coulomb over every pair of charged atoms, excluding
    /// bonded pairs. Unlike LJ, not limited to the Verlet list: electrostatics
    /// has no cutoff here.
    fn accumulate_coulomb(&mut self) {
        let charged = self.atoms.charged_indices().to_vec();
        for (a, &i) in charged.iter().enumerate() {
            for &j in &charged[a + 1..] {
                if self.bonds.matrix.contains(i, j) {
                    continue;
                }
                let dx = self.atoms.x[j] - self.atoms.x[i];
                let dy = self.atoms.y[j] - self.atoms.y[i];
                let r_sq = dx * dx + dy * dy;
                if r_sq <= 0.0 {
                    continue;
                }
                let factor = crate::potentials::Coulomb::force_over_distance_from_squared_distance(
                    self.atoms.charge[i],
                    self.atoms.charge[j],
                    r_sq,
                );
                self.atoms.ax[i] -= factor * dx;
                self.atoms.ay[i] -= factor * dy;
                self.atoms.ax[j] += factor * dx;
                self.atoms.ay[j] += factor * dy;
            }
        }
    }

    fn accumulate_radial_bonds(&mut self) {
        for bond in self.bonds.radial.clone() {
            let dx = self.atoms.x[bond.atom2] - self.atoms.x[bond.atom1];
            let dy = self.atoms.y[bond.atom2] - self.atoms.y[bond.atom1];
            let r = (dx * dx + dy * dy).sqrt();
            if r <= 0.0 {
                continue;
            }
            let k = ev_per_nm2_to_mw_force_per_nm(bond.strength);
            let stretch = r - bond.length0;
            let fx2 = -k * stretch * dx / r;
            let fy2 = -k * stretch * dy / r;
            self.atoms.ax[bond.atom2] += fx2;
            self.atoms.ay[bond.atom2] += fy2;
            self.atoms.ax[bond.atom1] -= fx2;
            self.atoms.ay[bond.atom1] -= fy2;
        }
    }

    /// Harmonic angular bond `U = 0.5*k*(theta - theta0)^2` about the apex
    /// `atom3`, with forces derived so the apex force exactly balances the
    /// other two (no net torque-free force on the triple). `sin(theta)` is
    /// floored rather than skipped so near-collinear triples still feel a
    /// bounded restoring force.
    fn accumulate_angular_bonds(&mut self) {
        for bond in self.bonds.angular.clone() {
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
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt().max(ANGLE_SIN_EPSILON);
            let theta = cos_theta.acos();
            let k = crate::units::ev_to_mw_energy(bond.strength);
            let prefactor = k * (theta - bond.angle0) / (sin_theta * len1 * len2);

            let f1x = prefactor * (r2x - cos_theta * (len2 / len1) * r1x);
            let f1y = prefactor * (r2y - cos_theta * (len2 / len1) * r1y);
            let f2x = prefactor * (r1x - cos_theta * (len1 / len2) * r2x);
            let f2y = prefactor * (r1y - cos_theta * (len1 / len2) * r2y);
            let f3x = -(f1x + f2x);
            let f3y = -(f1y + f2y);

            self.atoms.ax[bond.atom1] += f1x;
            self.atoms.ay[bond.atom1] += f1y;
            self.atoms.ax[bond.atom2] += f2x;
            self.atoms.ay[bond.atom2] += f2y;
            self.atoms.ax[bond.atom3] += f3x;
            self.atoms.ay[bond.atom3] += f3y;
        }
    }

    /// Zero-rest-length harmonic pull toward a fixed anchor.
    fn accumulate_restraints(&mut self) {
        for restraint in self.bonds.restraints.clone() {
            let k = ev_per_nm2_to_mw_force_per_nm(restraint.k);
            let fx = k * (restraint.x0 - self.atoms.x[restraint.atom]);
            let fy = k * (restraint.y0 - self.atoms.y[restraint.atom]);
            self.atoms.ax[restraint.atom] += fx;
            self.atoms.ay[restraint.atom] += fy;
        }
    }

    /// Same formula as a restraint, applied per active (non-removed) user
    /// spring.
    fn accumulate_springs(&mut self) {
        let springs: Vec<_> = self.bonds.active_springs().copied().collect();
        for spring in springs {
            let k = ev_per_nm2_to_mw_force_per_nm(spring.strength);
            let fx = k * (spring.x - self.atoms.x[spring.atom]);
            let fy = k * (spring.y - self.atoms.y[spring.atom]);
            self.atoms.ax[spring.atom] += fx;
            self.atoms.ay[spring.atom] += fy;
        }
    }

    fn accumulate_drag(&mut self) {
        let viscosity = self.config.viscosity;
        for i in 0..self.atoms.len() {
            self.atoms.ax[i] -= viscosity * self.atoms.friction[i] * self.atoms.vx[i];
            self.atoms.ay[i] -= viscosity * self.atoms.friction[i] * self.atoms.vy[i];
        }
    }
}
