//! Radial bonds, angular bonds, restraints and spring forces, plus the
//! bond-exclusion matrix shared by the short-range and Coulomb loops.

use std::collections::HashSet;

use crate::error::{EngineError, Result};

/// Cosmetic bond rendering style; carried through from the source but not
/// consulted by any force computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BondStyle {
    #[default]
    Solid,
    Dashed,
    Double,
    Triple,
}

#[derive(Debug, Clone)]
pub struct RadialBondProps {
    pub atom1: usize,
    pub atom2: usize,
    pub length0: f64,
    pub strength: f64,
    pub style: BondStyle,
}

/// A renderer-facing mirror of one radial bond, refreshed every
/// `compute_output_state` call with the bond's current endpoint
/// coordinates.
#[derive(Debug, Clone, Copy)]
pub struct RadialBondResult {
    pub atom1: usize,
    pub atom2: usize,
    pub length0: f64,
    pub strength: f64,
    pub style: BondStyle,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct AngularBondProps {
    pub atom1: usize,
    pub atom2: usize,
    pub atom3: usize,
    pub angle0: f64,
    pub strength: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct RestraintProps {
    pub atom: usize,
    pub k: f64,
    pub x0: f64,
    pub y0: f64,
}

#[derive(Debug, Clone, Copy)]
pub struct SpringForce {
    pub atom: usize,
    pub x: f64,
    pub y: f64,
    pub strength: f64,
}

/// Sparse symmetric exclusion table: `contains(i, j) == contains(j, i)`,
/// true iff a radial bond exists between the two atoms. Backed by a
/// `HashSet` of canonicalized (lo, hi) pairs rather than a dense matrix,
/// since the bond count is normally a small fraction of `N^2`.
#[derive(Debug, Clone, Default)]
pub struct BondMatrix {
    pairs: HashSet<(usize, usize)>,
    adjacency: Vec<Vec<usize>>,
}

impl BondMatrix {
    fn canonical(i: usize, j: usize) -> (usize, usize) {
        if i < j {
            (i, j)
        } else {
            (j, i)
        }
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.pairs.contains(&Self::canonical(i, j))
    }

    fn ensure_capacity(&mut self, atom: usize) {
        if atom >= self.adjacency.len() {
            self.adjacency.resize(atom + 1, Vec::new());
        }
    }

    fn insert(&mut self, i: usize, j: usize) {
        self.ensure_capacity(i.max(j));
        if self.pairs.insert(Self::canonical(i, j)) {
            self.adjacency[i].push(j);
            self.adjacency[j].push(i);
        }
    }

    pub fn bonded_atoms(&self, i: usize) -> &[usize] {
        self.adjacency.get(i).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// Transitive closure over the bond matrix starting from `i`, e.g. "all
    /// atoms in the same molecule". Uses an explicit visited set and
    /// worklist rather than engine-level scratch state, eliminating the
    /// re-entrancy hazard the source's recursive version had.
    pub fn molecule_atoms(&self, i: usize) -> Vec<usize> {
        let mut visited = HashSet::new();
        let mut stack = vec![i];
        visited.insert(i);
        while let Some(atom) = stack.pop() {
            for &neighbor in self.bonded_atoms(atom) {
                if visited.insert(neighbor) {
                    stack.push(neighbor);
                }
            }
        }
        let mut out: Vec<usize> = visited.into_iter().collect();
        out.sort_unstable();
        out
    }
}

/// The engine's full set of bonded/restrained interactions.
#[derive(Debug, Clone, Default)]
pub struct Bonds {
    pub radial: Vec<RadialBondProps>,
    pub radial_results: Vec<RadialBondResult>,
    pub angular: Vec<AngularBondProps>,
    pub restraints: Vec<RestraintProps>,
    /// Indexed by a stable slot; `None` marks a removed spring so indices
    /// returned by `add_spring_force` stay valid across removals.
    pub springs: Vec<Option<SpringForce>>,
    pub matrix: BondMatrix,
}

impl Bonds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_radial(&mut self, props: RadialBondProps) -> usize {
        self.matrix.insert(props.atom1, props.atom2);
        self.radial_results.push(RadialBondResult {
            atom1: props.atom1,
            atom2: props.atom2,
            length0: props.length0,
            strength: props.strength,
            style: props.style,
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 0.0,
        });
        self.radial.push(props);
        self.radial.len() - 1
    }

    pub fn set_radial_properties(&mut self, i: usize, props: RadialBondProps) -> Result<()> {
        let slot = self
            .radial
            .get_mut(i)
            .ok_or(EngineError::IndexOutOfRange {
                what: "radial bond",
                index: i,
                len: self.radial.len(),
            })?;
        *slot = props.clone();
        let result = &mut self.radial_results[i];
        result.atom1 = props.atom1;
        result.atom2 = props.atom2;
        result.length0 = props.length0;
        result.strength = props.strength;
        result.style = props.style;
        Ok(())
    }

    pub fn add_angular(&mut self, props: AngularBondProps) -> usize {
        self.angular.push(props);
        self.angular.len() - 1
    }

    pub fn add_restraint(&mut self, props: RestraintProps) -> usize {
        self.restraints.push(props);
        self.restraints.len() - 1
    }

    /// Insert into the first vacated slot if one exists, else append.
    /// Returns a stable index valid until `remove_spring_force` is called
    /// on it.
    pub fn add_spring_force(&mut self, spring: SpringForce) -> usize {
        if let Some(slot) = self.springs.iter_mut().position(|s| s.is_none()) {
            self.springs[slot] = Some(spring);
            slot
        } else {
            self.springs.push(Some(spring));
            self.springs.len() - 1
        }
    }

    pub fn update_spring_force(&mut self, i: usize, x: f64, y: f64) -> Result<()> {
        let slot = self
            .springs
            .get_mut(i)
            .and_then(|s| s.as_mut())
            .ok_or(EngineError::IndexOutOfRange {
                what: "spring force",
                index: i,
                len: self.springs.len(),
            })?;
        slot.x = x;
        slot.y = y;
        Ok(())
    }

    pub fn remove_spring_force(&mut self, i: usize) -> Result<()> {
        let slot = self.springs.get_mut(i).ok_or(EngineError::IndexOutOfRange {
            what: "spring force",
            index: i,
            len: self.springs.len(),
        })?;
        *slot = None;
        Ok(())
    }

    pub fn active_springs(&self) -> impl Iterator<Item = &SpringForce> {
        self.springs.iter().filter_map(|s| s.as_ref())
    }

    /// Refresh every radial bond's endpoint mirror from the live atom
    /// positions, for downstream renderers. Called once per
    /// `compute_output_state`.
    pub fn refresh_radial_results(&mut self, x: &[f64], y: &[f64]) {
        for (bond, result) in self.radial.iter().zip(self.radial_results.iter_mut()) {
            result.x1 = x[bond.atom1];
            result.y1 = y[bond.atom1];
            result.x2 = x[bond.atom2];
            result.y2 = y[bond.atom2];
        }
    }
}
