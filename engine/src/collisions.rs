//! Wall and atom-obstacle collisions.

use crate::engine::Engine;
use crate::pressure_buffers::Wall;

/// Reflect `pos` (with paired `vel`) off the boundaries `[lo, hi]`, folding
/// by an integer multiple of `modulus` first so a single runaway step that
/// overshot by more than one domain width still resolves to one
/// reflection instead of landing outside `[lo, hi]` again.
fn reflect_coordinate(pos: &mut f64, vel: &mut f64, lo: f64, hi: f64, modulus: f64) -> bool {
    if hi <= lo {
        return false;
    }
    if *pos < lo {
        let excess = lo - *pos;
        let folds = (excess / modulus).floor();
        *pos += folds * modulus;
        *pos = 2.0 * lo - *pos;
        *vel = -*vel;
        true
    } else if *pos > hi {
        let excess = *pos - hi;
        let folds = (excess / modulus).floor();
        *pos -= folds * modulus;
        *pos = 2.0 * hi - *pos;
        *vel = -*vel;
        true
    } else {
        false
    }
}

impl Engine {
    pub(crate) fn bounce_atom_off_walls(&mut self, i: usize) {
        let Some((lx, ly)) = self.config.size else {
            return;
        };
        let r = self.atoms.radius[i];
        let mut x = self.atoms.x[i];
        let mut vx = self.atoms.vx[i];
        reflect_coordinate(&mut x, &mut vx, r, lx - r, lx);
        self.atoms.x[i] = x;
        self.atoms.vx[i] = vx;

        let mut y = self.atoms.y[i];
        let mut vy = self.atoms.vy[i];
        reflect_coordinate(&mut y, &mut vy, r, ly - r, ly);
        self.atoms.y[i] = y;
        self.atoms.vy[i] = vy;

        self.atoms.sync_momentum(i);
    }

    pub(crate) fn bounce_obstacle_off_walls(&mut self, obstacle_idx: usize) {
        let Some((lx, ly)) = self.config.size else {
            return;
        };
        let obstacle = self.obstacles.get_mut(obstacle_idx).expect("valid obstacle index");
        let width = obstacle.width;
        let height = obstacle.height;
        reflect_coordinate(&mut obstacle.x, &mut obstacle.vx, 0.0, lx - width, lx);
        reflect_coordinate(&mut obstacle.y, &mut obstacle.vy, 0.0, ly - height, ly);
    }

    /// Reflect atom `i` off any obstacle whose atom-radius-inflated box it
    /// currently lies within, using `prev_x`/`prev_y` (the atom's position
    /// before this step's drift) to discriminate which wall was crossed.
    pub(crate) fn bounce_atom_off_obstacles(&mut self, i: usize, prev_x: f64, prev_y: f64, update_pressure: bool) {
        let r = self.atoms.radius[i];
        let x = self.atoms.x[i];
        let y = self.atoms.y[i];

        for obs_idx in 0..self.obstacles.len() {
            let obstacle = *self.obstacles.get(obs_idx).expect("valid obstacle index");

            let left = obstacle.left() - r;
            let right = obstacle.right() + r;
            let bottom = obstacle.bottom() - r;
            let top = obstacle.top() + r;

            if !(x > left && x < right && y > bottom && y < top) {
                continue;
            }

            let prev_left = obstacle.prev_left() - r;
            let prev_right = obstacle.prev_right() + r;
            let prev_bottom = obstacle.prev_bottom() - r;
            let prev_top = obstacle.prev_top() + r;

            let wall = if prev_x <= prev_left {
                Wall::West
            } else if prev_x >= prev_right {
                Wall::East
            } else if prev_y <= prev_bottom {
                Wall::South
            } else if prev_y >= prev_top {
                Wall::North
            } else {
                // The atom's previous position was already inside every
                // inflated edge (e.g. it was placed there directly, or a
                // large step tunneled past every wall test). Fall back to
                // the nearest edge by current penetration depth.
                let penetrations = [
                    (Wall::West, x - left),
                    (Wall::East, right - x),
                    (Wall::South, y - bottom),
                    (Wall::North, top - y),
                ];
                penetrations
                    .into_iter()
                    .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
                    .unwrap()
                    .0
            };

            self.resolve_atom_obstacle_collision(i, obs_idx, wall, left, right, bottom, top, update_pressure);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn resolve_atom_obstacle_collision(
        &mut self,
        atom: usize,
        obs_idx: usize,
        wall: Wall,
        left: f64,
        right: f64,
        bottom: f64,
        top: f64,
        update_pressure: bool,
    ) {
        let is_horizontal = matches!(wall, Wall::West | Wall::East);
        let boundary = match wall {
            Wall::West => left,
            Wall::East => right,
            Wall::South => bottom,
            Wall::North => top,
        };

        if is_horizontal {
            self.atoms.x[atom] = 2.0 * boundary - self.atoms.x[atom];
        } else {
            self.atoms.y[atom] = 2.0 * boundary - self.atoms.y[atom];
        }

        let atom_mass = self.atoms.mass[atom];
        let atom_v_before = if is_horizontal { self.atoms.vx[atom] } else { self.atoms.vy[atom] };

        let obstacle = self.obstacles.get_mut(obs_idx).expect("valid obstacle index");
        let obstacle_v_before = if is_horizontal { obstacle.vx } else { obstacle.vy };

        let (atom_v_after, obstacle_v_after) = if obstacle.is_movable() {
            let m1 = atom_mass;
            let m2 = obstacle.mass;
            let v1 = atom_v_before;
            let v2 = obstacle_v_before;
            let v1p = ((m1 - m2) * v1 + 2.0 * m2 * v2) / (m1 + m2);
            let v2p = ((m2 - m1) * v2 + 2.0 * m1 * v1) / (m1 + m2);
            (v1p, v2p)
        } else {
            (-atom_v_before, obstacle_v_before)
        };

        if is_horizontal {
            self.atoms.vx[atom] = atom_v_after;
        } else {
            self.atoms.vy[atom] = atom_v_after;
        }
        self.atoms.sync_momentum(atom);

        if obstacle.is_movable() {
            if is_horizontal {
                obstacle.vx = obstacle_v_after;
            } else {
                obstacle.vy = obstacle_v_after;
            }
        }

        let probed = match wall {
            Wall::West => obstacle.probe_west,
            Wall::North => obstacle.probe_north,
            Wall::East => obstacle.probe_east,
            Wall::South => obstacle.probe_south,
        };

        if update_pressure && probed {
            let impulse = atom_mass * (atom_v_before - atom_v_after);
            self.pressure.accumulate(obs_idx, wall, impulse);
        }
    }

    /// Kinematic update for every movable obstacle: `v += a*dt` where `a`
    /// is the externally-applied per-mass force (already acceleration,
    /// same as gravity and `friction*v` below) plus friction and gravity,
    /// `x += v*dt`, save the pre-move position for the next step's
    /// collision-side discrimination, then bounce off the domain walls.
    pub(crate) fn update_obstacles(&mut self, dt: f64) {
        let gravity = self.config.gravity.unwrap_or(0.0);
        for idx in 0..self.obstacles.len() {
            let obstacle = self.obstacles.get_mut(idx).expect("valid obstacle index");
            if !obstacle.is_movable() {
                continue;
            }
            obstacle.prev_x = obstacle.x;
            obstacle.prev_y = obstacle.y;

            let ax = obstacle.ext_fx - obstacle.friction * obstacle.vx;
            let ay = obstacle.ext_fy - obstacle.friction * obstacle.vy - gravity;
            obstacle.vx += ax * dt;
            obstacle.vy += ay * dt;
            obstacle.x += obstacle.vx * dt;
            obstacle.y += obstacle.vy * dt;

            self.bounce_obstacle_off_walls(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflect_coordinate_flips_velocity_at_low_boundary() {
        let mut pos = -0.1;
        let mut vel = -1.0;
        let bounced = reflect_coordinate(&mut pos, &mut vel, 0.0, 10.0, 10.0);
        assert!(bounced);
        assert!(pos > 0.0);
        assert_eq!(vel, 1.0);
    }

    #[test]
    fn reflect_coordinate_is_noop_inside_bounds() {
        let mut pos = 5.0;
        let mut vel = 1.0;
        let bounced = reflect_coordinate(&mut pos, &mut vel, 0.0, 10.0, 10.0);
        assert!(!bounced);
        assert_eq!(pos, 5.0);
        assert_eq!(vel, 1.0);
    }

    #[test]
    fn reflect_coordinate_folds_runaway_overshoot() {
        let mut pos = -23.0; // overshot by more than two domain widths
        let mut vel = -1.0;
        reflect_coordinate(&mut pos, &mut vel, 0.0, 10.0, 10.0);
        assert!((0.0..=10.0).contains(&pos));
    }
}
