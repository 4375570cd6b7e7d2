//! Unit conversions and physical constants.
//!
//! Positions are in nm, velocities in nm/fs, masses in Dalton, time in fs.
//! Energies are reported to callers in eV, but accumulated internally in
//! "MW units" (Dalton·nm²/fs² for energy, Dalton·nm/fs² for force) so that
//! dividing a force by a mass in Dalton yields an acceleration in nm/fs²
//! with no further conversion.

/// Boltzmann constant, eV per kelvin.
pub const KB_EV_PER_K: f64 = 8.617_333_262e-5;

/// 1 Dalton·nm²/fs² expressed in eV.
///
/// Derived from CODATA constants: 1 Da = 1.660_539_066_60e-27 kg, 1 nm =
/// 1e-9 m, 1 fs = 1e-15 s, 1 eV = 1.602_176_634e-19 J. Plugging those in:
/// 1 Da·nm²/fs² = 1.660_539_066_60e-15 J = 10364.269 eV.
pub const MW_ENERGY_UNIT_IN_EV: f64 = 10_364.269;

/// `e²/(4πε₀)` expressed in eV·nm, for charges given as multiples of the
/// elementary charge. The commonly cited value is 14.39964 eV·Å = 1.439964
/// eV·nm.
pub const COULOMB_CONSTANT_EV_NM: f64 = 1.439_964;

/// Convert an energy from eV to the internal MW energy unit.
#[inline]
pub fn ev_to_mw_energy(ev: f64) -> f64 {
    ev / MW_ENERGY_UNIT_IN_EV
}

/// Convert an energy from the internal MW energy unit to eV.
#[inline]
pub fn mw_energy_to_ev(mw: f64) -> f64 {
    mw * MW_ENERGY_UNIT_IN_EV
}

/// Convert a radial bond stiffness from eV/nm² (as authored) to the MW
/// force unit per nm, i.e. `Dalton/fs²`, so that `k*(r - r0)` lands
/// directly in MW force units.
#[inline]
pub fn ev_per_nm2_to_mw_force_per_nm(k_ev_per_nm2: f64) -> f64 {
    ev_to_mw_energy(k_ev_per_nm2)
}

/// Pressure-probe impulses are accumulated in `Dalton*nm/fs` (momentum).
/// Dividing by an elapsed time in fs yields a force in MW units; dividing
/// that by a probe length in nm yields a 2D "pressure" (force per unit
/// length) which is reported in bar, assuming a 1 nm out-of-plane depth so
/// the unit matches the conventional 3D force-per-area definition.
///
/// Derivation: `1 Dalton/fs^2 = 1.660_539_066_60e-27 kg / (1e-15 s)^2 =
/// 1660.539_066_60 kg/s^2 = 1660.539_066_60 N/m`. Assuming 1 nm depth,
/// `N/m / 1e-9 m = N/m^2 = Pa`, and `1 bar = 1e5 Pa`.
pub const MW_FORCE_PER_NM_TO_BAR: f64 = 1.660_539_066_60e3 / 1e-9 / 1e5;

/// Convert a force-per-unit-length (MW force unit / nm) to bar.
#[inline]
pub fn force_per_length_to_bar(force_per_nm: f64) -> f64 {
    force_per_nm * MW_FORCE_PER_NM_TO_BAR
}
