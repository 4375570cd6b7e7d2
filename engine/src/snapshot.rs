//! Deep-copy snapshot/restore of the engine's physical state.
//!
//! The source represents this as an ordered set of handles sharing a
//! `{clone, restore}` contract. A systems implementation gets the same
//! contract for free from `Clone`: [`EngineState`] is a plain, fully owned
//! copy of every mutable physical-state container, so `get_state` can never
//! alias live arrays and `restore` is just an assignment.

use crate::atoms::Atoms;
use crate::obstacles::Obstacles;
use crate::pressure_buffers::PressureBuffers;

#[derive(Debug, Clone)]
pub struct EngineState {
    pub atoms: Atoms,
    pub obstacles: Obstacles,
    pub pressure: PressureBuffers,
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atoms::AtomProps;
    use crate::elements::{Element, Elements};

    #[test]
    fn clone_is_independent_of_the_live_atoms_array() {
        let mut els = Elements::new();
        let ar = els.add(Element::new(39.948, 0.0103, 0.3405));
        els.set_in_use(ar, true).unwrap();

        let mut atoms = Atoms::new();
        atoms.add(AtomProps::default(), &els).unwrap();

        let snapshot = EngineState {
            atoms: atoms.clone(),
            obstacles: Obstacles::new(),
            pressure: PressureBuffers::new(),
            time: 0.0,
        };

        atoms.x[0] = 42.0;
        assert_eq!(snapshot.atoms.x[0], 0.0, "snapshot must not alias live state");
    }
}
