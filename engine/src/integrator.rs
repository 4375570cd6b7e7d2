//! Velocity-Verlet step: half-kick / drift / force recompute / half-kick /
//! obstacle update / thermostat, in the fixed order the spec requires.

use tracing::error;

use crate::engine::Engine;
use crate::error::{EngineError, Result};

/// Position components diverge past this multiple of the domain extent
/// before the drift step gives up and reports the model as diverged.
const DIVERGENCE_DOMAIN_MULTIPLE: f64 = 100.0;

impl Engine {
    pub(crate) fn step(&mut self, dt: f64) -> Result<()> {
        self.half_kick(dt);
        self.drift(dt)?;

        let rebuilding = self
            .neighbors
            .should_update(&self.atoms.x, &self.atoms.y);
        self.accumulate_forces(rebuilding)?;

        self.atoms.apply_pin_mask();
        self.half_kick(dt);
        self.atoms.update_speed_cache();

        self.update_obstacles(dt);
        self.adjust_temperature(false);

        self.time += dt;
        Ok(())
    }

    fn half_kick(&mut self, dt: f64) {
        let half_dt = 0.5 * dt;
        for i in 0..self.atoms.len() {
            self.atoms.vx[i] += half_dt * self.atoms.ax[i];
            self.atoms.vy[i] += half_dt * self.atoms.ay[i];
            self.atoms.sync_momentum(i);
        }
    }

    fn drift(&mut self, dt: f64) -> Result<()> {
        let (lx, ly) = self.config.size.ok_or(EngineError::NoAtoms)?;
        let max_extent = (lx.max(ly)) * DIVERGENCE_DOMAIN_MULTIPLE;

        for i in 0..self.atoms.len() {
            let prev_x = self.atoms.x[i];
            let prev_y = self.atoms.y[i];
            self.atoms.x[i] += self.atoms.vx[i] * dt;
            self.atoms.y[i] += self.atoms.vy[i] * dt;

            if !self.atoms.x[i].is_finite()
                || !self.atoms.y[i].is_finite()
                || self.atoms.x[i].abs() > max_extent
                || self.atoms.y[i].abs() > max_extent
            {
                error!(atom = i, x = self.atoms.x[i], y = self.atoms.y[i], "model diverged");
                return Err(EngineError::Diverged {
                    atom: i,
                    x: self.atoms.x[i],
                    y: self.atoms.y[i],
                });
            }

            self.bounce_atom_off_walls(i);
            self.bounce_atom_off_obstacles(i, prev_x, prev_y, true);
        }
        Ok(())
    }
}
