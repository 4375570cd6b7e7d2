//! In-process simulation configuration.
//!
//! There is no file or environment-variable surface for the engine (the
//! spec explicitly keeps scenario loading and file I/O out of scope); this
//! struct is the in-process analogue, `serde`-derived like every
//! config-shaped struct in the teacher crate so a host application can
//! still serialize a scenario's toggles for its own persistence needs.

use serde::{Deserialize, Serialize};

/// Domain size and the global force/thermostat toggles. `size` is set once
/// via [`crate::Engine::set_size`] and is otherwise immutable for the life
/// of the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub use_coulomb: bool,
    pub use_lennard_jones: bool,
    pub use_thermostat: bool,
    pub target_temperature: f64,
    /// `None` means gravity is off; `Some(g)` is the downward acceleration
    /// subtracted from every atom's and movable obstacle's `ay`.
    pub gravity: Option<f64>,
    pub viscosity: f64,
    pub vdw_lines_ratio: f64,
    pub size: Option<(f64, f64)>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            use_coulomb: false,
            use_lennard_jones: true,
            use_thermostat: false,
            target_temperature: 300.0,
            gravity: None,
            viscosity: 0.0,
            vdw_lines_ratio: 1.3,
            size: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_lj_on_and_everything_else_off() {
        let config = EngineConfig::default();
        assert!(config.use_lennard_jones);
        assert!(!config.use_coulomb);
        assert!(!config.use_thermostat);
        assert!(config.gravity.is_none());
        assert!(config.size.is_none());
    }

    #[test]
    fn roundtrips_through_json() {
        let config = EngineConfig {
            gravity: Some(9.8e-8),
            size: Some((10.0, 10.0)),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.gravity, config.gravity);
        assert_eq!(back.size, config.size);
    }
}
