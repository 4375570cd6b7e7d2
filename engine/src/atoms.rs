//! Atom container: index-aligned parallel arrays plus the invariants tying
//! them to the element table.

use crate::elements::Elements;
use crate::error::{EngineError, Result};

/// Properties accepted by [`Atoms::add`]. Fields not set by the caller take
/// the listed defaults, matching the teacher crate's `..Default::default()`
/// construction idiom for property bags.
#[derive(Debug, Clone)]
pub struct AtomProps {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub element: usize,
    pub charge: f64,
    pub friction: f64,
    pub pinned: bool,
    pub marked: bool,
    pub visible: bool,
    pub draggable: bool,
}

impl Default for AtomProps {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            element: 0,
            charge: 0.0,
            friction: 0.0,
            pinned: false,
            marked: false,
            visible: true,
            draggable: true,
        }
    }
}

/// Parallel, index-aligned atom arrays. `px = mass*vx` and `py = mass*vy`
/// are maintained as an explicit redundant copy after every mutation that
/// touches velocity or mass (invariant 1 in the spec's testable-properties
/// list); `mass`/`radius` mirror the atom's current element.
#[derive(Debug, Clone, Default)]
pub struct Atoms {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub vx: Vec<f64>,
    pub vy: Vec<f64>,
    pub px: Vec<f64>,
    pub py: Vec<f64>,
    pub ax: Vec<f64>,
    pub ay: Vec<f64>,
    pub speed: Vec<f64>,
    pub element: Vec<usize>,
    pub mass: Vec<f64>,
    pub radius: Vec<f64>,
    pub charge: Vec<f64>,
    pub friction: Vec<f64>,
    pub pinned: Vec<bool>,
    pub marked: Vec<bool>,
    pub visible: Vec<bool>,
    pub draggable: Vec<bool>,
    /// Indices with nonzero charge, kept in sync on every add/set so the
    /// Coulomb loop never has to scan the whole population.
    charged: Vec<usize>,
}

impl Atoms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn charged_indices(&self) -> &[usize] {
        &self.charged
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.len() {
            return Err(EngineError::IndexOutOfRange {
                what: "atom",
                index: i,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Append one atom, copying mass/radius from its element and
    /// recomputing momentum and the charged-atom fast list.
    pub fn add(&mut self, props: AtomProps, elements: &Elements) -> Result<usize> {
        let el = elements.get(props.element)?;
        let i = self.len();
        self.x.push(props.x);
        self.y.push(props.y);
        self.vx.push(props.vx);
        self.vy.push(props.vy);
        self.px.push(el.mass * props.vx);
        self.py.push(el.mass * props.vy);
        self.ax.push(0.0);
        self.ay.push(0.0);
        self.speed.push((props.vx * props.vx + props.vy * props.vy).sqrt());
        self.element.push(props.element);
        self.mass.push(el.mass);
        self.radius.push(el.radius);
        self.charge.push(props.charge);
        self.friction.push(props.friction);
        self.pinned.push(props.pinned);
        self.marked.push(props.marked);
        self.visible.push(props.visible);
        self.draggable.push(props.draggable);
        if props.charge != 0.0 {
            self.charged.push(i);
        }
        if props.pinned {
            self.vx[i] = 0.0;
            self.vy[i] = 0.0;
            self.px[i] = 0.0;
            self.py[i] = 0.0;
        }
        Ok(i)
    }

    /// Overwrite an atom's properties in place, re-deriving mass/radius
    /// from `element` and rebuilding the charged-atom list if charge
    /// changed.
    pub fn set_properties(&mut self, i: usize, props: AtomProps, elements: &Elements) -> Result<()> {
        self.check_index(i)?;
        let el = elements.get(props.element)?;
        self.x[i] = props.x;
        self.y[i] = props.y;
        self.vx[i] = props.vx;
        self.vy[i] = props.vy;
        self.element[i] = props.element;
        self.mass[i] = el.mass;
        self.radius[i] = el.radius;
        self.charge[i] = props.charge;
        self.friction[i] = props.friction;
        self.pinned[i] = props.pinned;
        self.marked[i] = props.marked;
        self.visible[i] = props.visible;
        self.draggable[i] = props.draggable;
        self.sync_momentum(i);
        if props.pinned {
            self.vx[i] = 0.0;
            self.vy[i] = 0.0;
            self.ax[i] = 0.0;
            self.ay[i] = 0.0;
            self.px[i] = 0.0;
            self.py[i] = 0.0;
        }
        self.rebuild_charged_list();
        Ok(())
    }

    /// Re-derive `mass`/`radius` for every atom of `element` from the
    /// current element table. Called after `setElementProperties`.
    pub fn propagate_element_change(&mut self, element: usize, mass: f64, radius: f64) {
        for i in 0..self.len() {
            if self.element[i] == element {
                self.mass[i] = mass;
                self.radius[i] = radius;
                self.sync_momentum(i);
            }
        }
    }

    /// Recompute `px[i], py[i] = mass[i]*vx[i], mass[i]*vy[i]`.
    #[inline]
    pub fn sync_momentum(&mut self, i: usize) {
        self.px[i] = self.mass[i] * self.vx[i];
        self.py[i] = self.mass[i] * self.vy[i];
    }

    /// Zero velocity and acceleration on every pinned atom, then
    /// re-synchronize momentum. Invariant: pinned atoms have identically
    /// zero velocity/acceleration after this call.
    pub fn apply_pin_mask(&mut self) {
        for i in 0..self.len() {
            if self.pinned[i] {
                self.vx[i] = 0.0;
                self.vy[i] = 0.0;
                self.ax[i] = 0.0;
                self.ay[i] = 0.0;
                self.px[i] = 0.0;
                self.py[i] = 0.0;
            }
        }
    }

    pub fn update_speed_cache(&mut self) {
        for i in 0..self.len() {
            self.speed[i] = (self.vx[i] * self.vx[i] + self.vy[i] * self.vy[i]).sqrt();
        }
    }

    fn rebuild_charged_list(&mut self) {
        self.charged = (0..self.len()).filter(|&i| self.charge[i] != 0.0).collect();
    }

    pub fn kinetic_energy_mw(&self, i: usize) -> f64 {
        0.5 * self.mass[i] * (self.vx[i] * self.vx[i] + self.vy[i] * self.vy[i])
    }

    pub fn total_mass(&self) -> f64 {
        self.mass.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elements::Element;
    use approx::assert_relative_eq;

    fn argon_elements() -> Elements {
        let mut els = Elements::new();
        let ar = els.add(Element::new(39.948, 0.0103, 0.3405));
        els.set_in_use(ar, true).unwrap();
        els
    }

    #[test]
    fn momentum_invariant_holds_after_add_and_set() {
        let els = argon_elements();
        let mut atoms = Atoms::new();
        let i = atoms
            .add(
                AtomProps {
                    vx: 0.01,
                    vy: -0.02,
                    ..Default::default()
                },
                &els,
            )
            .unwrap();
        assert_relative_eq!(atoms.px[i], atoms.mass[i] * atoms.vx[i]);
        assert_relative_eq!(atoms.py[i], atoms.mass[i] * atoms.vy[i]);

        atoms
            .set_properties(
                i,
                AtomProps {
                    vx: 0.05,
                    vy: 0.03,
                    ..Default::default()
                },
                &els,
            )
            .unwrap();
        assert_relative_eq!(atoms.px[i], atoms.mass[i] * 0.05);
        assert_relative_eq!(atoms.py[i], atoms.mass[i] * 0.03);
    }

    #[test]
    fn charged_list_tracks_nonzero_charge() {
        let els = argon_elements();
        let mut atoms = Atoms::new();
        atoms.add(AtomProps::default(), &els).unwrap();
        let charged = atoms
            .add(
                AtomProps {
                    charge: 1.0,
                    ..Default::default()
                },
                &els,
            )
            .unwrap();
        assert_eq!(atoms.charged_indices(), &[charged]);
    }

    #[test]
    fn pin_mask_zeroes_velocity_and_acceleration() {
        let els = argon_elements();
        let mut atoms = Atoms::new();
        let i = atoms
            .add(
                AtomProps {
                    vx: 1.0,
                    vy: 1.0,
                    pinned: true,
                    ..Default::default()
                },
                &els,
            )
            .unwrap();
        atoms.ax[i] = 5.0;
        atoms.ay[i] = 5.0;
        atoms.apply_pin_mask();
        assert_eq!(atoms.vx[i], 0.0);
        assert_eq!(atoms.vy[i], 0.0);
        assert_eq!(atoms.ax[i], 0.0);
        assert_eq!(atoms.ay[i], 0.0);
        assert_eq!(atoms.px[i], 0.0);
        assert_eq!(atoms.py[i], 0.0);
    }
}
