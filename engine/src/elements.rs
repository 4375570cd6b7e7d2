//! Element catalog: per-species mass/LJ parameters and the pairwise
//! coefficient matrix derived from them.

use crate::error::{EngineError, Result};
use crate::potentials::{mix_lj, LennardJones};

/// LJ excluded-volume radius conventionally derived from sigma: half the
/// distance to the potential minimum.
pub fn lj_radius(sigma_nm: f64) -> f64 {
    sigma_nm * 2f64.powf(1.0 / 6.0) / 2.0
}

/// One chemical species.
#[derive(Debug, Clone)]
pub struct Element {
    pub mass: f64,   // Dalton
    pub epsilon: f64, // eV
    pub sigma: f64,   // nm
    pub radius: f64,  // nm, derived from sigma
    /// Whether any live atom currently references this element. Gates
    /// `max_cutoff` computation: elements nobody uses don't force the cell
    /// grid to be sized for their cutoff.
    pub in_use: bool,
}

impl Element {
    pub fn new(mass: f64, epsilon_ev: f64, sigma_nm: f64) -> Self {
        Self {
            mass,
            epsilon: epsilon_ev,
            sigma: sigma_nm,
            radius: lj_radius(sigma_nm),
            in_use: false,
        }
    }
}

/// Per-pair derived coefficients: the mixed LJ kernel plus the two cached
/// squared cutoffs used on the hot pairwise loop.
#[derive(Debug, Clone)]
pub struct PairCoefficients {
    pub lj: LennardJones,
    pub lj_cutoff_sq: f64,
    pub neighbor_cutoff_sq: f64,
}

/// Ratios defining the LJ force cutoff and the (larger) Verlet list cutoff,
/// both expressed as multiples of the pair's mixed sigma.
#[derive(Debug, Clone, Copy)]
pub struct CutoffRatios {
    pub cutoff: f64,
    pub cutoff_list: f64,
}

impl Default for CutoffRatios {
    fn default() -> Self {
        Self {
            cutoff: 2.0,
            cutoff_list: 2.5,
        }
    }
}

/// The element table and its derived pairwise coefficient matrix.
#[derive(Debug, Clone)]
pub struct Elements {
    elements: Vec<Element>,
    /// Row-major `elements.len() x elements.len()` matrix of mixed
    /// coefficients, rebuilt whenever an element's parameters change.
    pairs: Vec<PairCoefficients>,
    pub cutoffs: CutoffRatios,
}

impl Elements {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            pairs: Vec::new(),
            cutoffs: CutoffRatios::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, i: usize) -> Result<&Element> {
        self.elements
            .get(i)
            .ok_or(EngineError::IndexOutOfRange {
                what: "element",
                index: i,
                len: self.elements.len(),
            })
    }

    pub fn add(&mut self, element: Element) -> usize {
        self.elements.push(element);
        self.rebuild_pair_matrix();
        self.elements.len() - 1
    }

    pub fn set_properties(&mut self, i: usize, mass: f64, epsilon_ev: f64, sigma_nm: f64) -> Result<()> {
        let el = self
            .elements
            .get_mut(i)
            .ok_or(EngineError::IndexOutOfRange {
                what: "element",
                index: i,
                len: self.elements.len(),
            })?;
        el.mass = mass;
        el.epsilon = epsilon_ev;
        el.sigma = sigma_nm;
        el.radius = lj_radius(sigma_nm);
        self.rebuild_pair_matrix();
        Ok(())
    }

    pub fn set_in_use(&mut self, i: usize, in_use: bool) -> Result<()> {
        let el = self
            .elements
            .get_mut(i)
            .ok_or(EngineError::IndexOutOfRange {
                what: "element",
                index: i,
                len: self.elements.len(),
            })?;
        el.in_use = in_use;
        Ok(())
    }

    fn rebuild_pair_matrix(&mut self) {
        let n = self.elements.len();
        let mut pairs = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                let lj = if i == j {
                    LennardJones::new(self.elements[i].epsilon, self.elements[i].sigma)
                } else {
                    mix_lj(
                        &LennardJones::new(self.elements[i].epsilon, self.elements[i].sigma),
                        &LennardJones::new(self.elements[j].epsilon, self.elements[j].sigma),
                    )
                };
                let sigma = lj.sigma();
                let mut lj = lj;
                lj.mark_in_use();
                pairs.push(PairCoefficients {
                    lj,
                    lj_cutoff_sq: (self.cutoffs.cutoff * sigma).powi(2),
                    neighbor_cutoff_sq: (self.cutoffs.cutoff_list * sigma).powi(2),
                });
            }
        }
        self.pairs = pairs;
    }

    pub fn pair(&self, i: usize, j: usize) -> &PairCoefficients {
        &self.pairs[i * self.elements.len() + j]
    }

    /// Largest `cutoff_list * sigma_ij` over every pair of *in-use*
    /// elements. Sizes the cell grid; gates on `in_use` so stale elements
    /// nobody references don't inflate it.
    pub fn max_cutoff(&self) -> f64 {
        let n = self.elements.len();
        let mut max = 0.0_f64;
        for i in 0..n {
            if !self.elements[i].in_use {
                continue;
            }
            for j in 0..n {
                if !self.elements[j].in_use {
                    continue;
                }
                let sqrt_cutoff = self.pair(i, j).neighbor_cutoff_sq.sqrt();
                if sqrt_cutoff > max {
                    max = sqrt_cutoff;
                }
            }
        }
        max
    }

    /// Smallest `(cutoff_list - cutoff) * sigma_ij` over in-use pairs: the
    /// skin width used by the Verlet list's rebuild trigger.
    pub fn min_skin_width(&self) -> f64 {
        let n = self.elements.len();
        let mut min = f64::INFINITY;
        for i in 0..n {
            if !self.elements[i].in_use {
                continue;
            }
            for j in 0..n {
                if !self.elements[j].in_use {
                    continue;
                }
                let sigma = self.pair(i, j).lj.sigma();
                let skin = (self.cutoffs.cutoff_list - self.cutoffs.cutoff) * sigma;
                if skin < min {
                    min = skin;
                }
            }
        }
        if min.is_finite() {
            min
        } else {
            0.0
        }
    }
}

impl Default for Elements {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mixing_rules_match_for_identical_elements() {
        let mut els = Elements::new();
        let argon = els.add(Element::new(39.948, 0.0103, 0.3405));
        els.set_in_use(argon, true).unwrap();
        let pc = els.pair(argon, argon);
        assert_relative_eq!(pc.lj.sigma(), 0.3405, max_relative = 1e-9);
    }

    #[test]
    fn max_cutoff_ignores_unused_elements() {
        let mut els = Elements::new();
        let a = els.add(Element::new(1.0, 0.01, 0.1));
        let _b = els.add(Element::new(1.0, 0.01, 10.0));
        els.set_in_use(a, true).unwrap();
        assert_relative_eq!(els.max_cutoff(), els.cutoffs.cutoff_list * 0.1, max_relative = 1e-9);
    }
}
