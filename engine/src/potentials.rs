//! Pairwise potentials: Lennard-Jones and Coulomb kernels.
//!
//! Both operate on squared distances to avoid an unnecessary `sqrt` on the
//! hot pairwise loop.

use crate::error::{EngineError, Result};
use crate::units::{ev_to_mw_energy, mw_energy_to_ev, COULOMB_CONSTANT_EV_NM};

/// A Lennard-Jones kernel for one ordered pair of elements.
///
/// `epsilon` and `sigma` are fixed at construction and stored internally in
/// MW energy units; once a kernel has been wired into an element's pair
/// coefficient matrix (`mark_in_use`), further attempts to change its
/// coefficients fail descriptively rather than silently invalidating
/// whatever cached cutoffs depend on them.
#[derive(Debug, Clone)]
pub struct LennardJones {
    epsilon_mw: f64,
    sigma: f64,
    in_use: bool,
}

impl LennardJones {
    /// `epsilon` in eV, `sigma` in nm.
    pub fn new(epsilon_ev: f64, sigma_nm: f64) -> Self {
        Self {
            epsilon_mw: ev_to_mw_energy(epsilon_ev),
            sigma: sigma_nm,
            in_use: false,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn epsilon_ev(&self) -> f64 {
        mw_energy_to_ev(self.epsilon_mw)
    }

    /// Flip the in-use flag once this kernel is installed in a pair matrix.
    pub fn mark_in_use(&mut self) {
        self.in_use = true;
    }

    /// Reject a coefficient change on an in-use kernel.
    pub fn set_coefficients(
        &mut self,
        epsilon_ev: f64,
        sigma_nm: f64,
        element_a: usize,
        element_b: usize,
    ) -> Result<()> {
        if self.in_use {
            return Err(EngineError::LjCoefficientsInUse {
                element_a,
                element_b,
            });
        }
        self.epsilon_mw = ev_to_mw_energy(epsilon_ev);
        self.sigma = sigma_nm;
        Ok(())
    }

    /// `F/r` such that the force on atom `a` from atom `b` is `(F/r)*(b-a)`.
    /// Positive (repulsive) at small r, negative (attractive) near/after the
    /// energy minimum.
    #[inline]
    pub fn force_over_distance_from_squared_distance(&self, r_squared: f64) -> f64 {
        let sigma2 = self.sigma * self.sigma;
        let sr2 = sigma2 / r_squared;
        let sr6 = sr2 * sr2 * sr2;
        let sr12 = sr6 * sr6;
        24.0 * self.epsilon_mw * (2.0 * sr12 - sr6) / r_squared
    }

    /// Potential energy in eV.
    #[inline]
    pub fn potential_from_squared_distance(&self, r_squared: f64) -> f64 {
        let sigma2 = self.sigma * self.sigma;
        let sr2 = sigma2 / r_squared;
        let sr6 = sr2 * sr2 * sr2;
        let sr12 = sr6 * sr6;
        mw_energy_to_ev(4.0 * self.epsilon_mw * (sr12 - sr6))
    }
}

/// Arithmetic/geometric-like mixing rules for unlike-element LJ pairs.
pub fn mix_lj(a: &LennardJones, b: &LennardJones) -> LennardJones {
    let sigma = 0.5 * (a.sigma + b.sigma);
    let epsilon_ev = (a.epsilon_ev() * b.epsilon_ev()).sqrt();
    LennardJones::new(epsilon_ev, sigma)
}

/// Coulomb's law, parameterized by the two point charges rather than by
/// element, since charge is a per-atom rather than per-element property.
pub struct Coulomb;

impl Coulomb {
    #[inline]
    pub fn force_over_distance_from_squared_distance(q1: f64, q2: f64, r_squared: f64) -> f64 {
        let r = r_squared.sqrt();
        ev_to_mw_energy(COULOMB_CONSTANT_EV_NM * q1 * q2) / (r_squared * r)
    }

    #[inline]
    pub fn potential_from_squared_distance(q1: f64, q2: f64, r_squared: f64) -> f64 {
        COULOMB_CONSTANT_EV_NM * q1 * q2 / r_squared.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn lj_minimum_is_attractive_to_repulsive_crossover() {
        let lj = LennardJones::new(0.0103, 0.3405); // argon
        let r_min = 2f64.powf(1.0 / 6.0) * lj.sigma();
        let f_at_min = lj.force_over_distance_from_squared_distance(r_min * r_min);
        assert_relative_eq!(f_at_min, 0.0, epsilon = 1e-9);

        let f_close = lj.force_over_distance_from_squared_distance((0.9 * r_min).powi(2));
        assert!(f_close > 0.0, "should be repulsive inside r_min");

        let f_far = lj.force_over_distance_from_squared_distance((1.5 * r_min).powi(2));
        assert!(f_far < 0.0, "should be attractive outside r_min");
    }

    #[test]
    fn lj_potential_minimum_equals_negative_epsilon() {
        let lj = LennardJones::new(0.0103, 0.3405);
        let r_min = 2f64.powf(1.0 / 6.0) * lj.sigma();
        let u_min = lj.potential_from_squared_distance(r_min * r_min);
        assert_relative_eq!(u_min, -0.0103, max_relative = 1e-9);
    }

    #[test]
    fn lj_rejects_mutation_once_in_use() {
        let mut lj = LennardJones::new(0.01, 0.3);
        lj.mark_in_use();
        let err = lj.set_coefficients(0.02, 0.4, 0, 1).unwrap_err();
        matches!(err, EngineError::LjCoefficientsInUse { .. });
    }

    #[test]
    fn coulomb_like_charges_repel() {
        let f = Coulomb::force_over_distance_from_squared_distance(1.0, 1.0, 1.0);
        assert!(f > 0.0);
        let f_opp = Coulomb::force_over_distance_from_squared_distance(1.0, -1.0, 1.0);
        assert!(f_opp < 0.0);
    }
}
