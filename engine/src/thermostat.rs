//! Velocity-rescaling thermostat and transient temperature changes.

use std::collections::VecDeque;

use tracing::warn;

/// Relative tolerance for declaring a transient temperature change
/// complete.
const TRANSIENT_TOLERANCE: f64 = 0.001;

/// Relative deviation from target beyond which a single-step rescale is
/// logged as suspicious (probably a misconfigured scenario upstream).
const SUSPICIOUS_RESCALE_FRACTION: f64 = 0.5;

/// The window-size helper from the source yields the same value on both
/// branches; the conditional is kept because a future tuning pass is
/// expected to diverge the two cases.
fn temperature_window_size(_transient: bool) -> usize {
    if _transient {
        1000
    } else {
        1000
    }
}

/// Fixed-capacity running average, implemented as a ring buffer so pushing
/// past capacity evicts the oldest sample rather than reallocating.
#[derive(Debug, Clone)]
struct WindowedAverage {
    capacity: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl WindowedAverage {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: VecDeque::with_capacity(capacity),
            sum: 0.0,
        }
    }

    fn push(&mut self, value: f64) {
        self.values.push_back(value);
        self.sum += value;
        if self.values.len() > self.capacity {
            if let Some(evicted) = self.values.pop_front() {
                self.sum -= evicted;
            }
        }
    }

    fn mean(&self) -> f64 {
        if self.values.is_empty() {
            0.0
        } else {
            self.sum / self.values.len() as f64
        }
    }

    fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}

/// Thermostat state: a steady on/off toggle plus a one-shot "transient
/// change" mode that self-terminates once a windowed average of the
/// instantaneous temperature settles within tolerance of the target.
#[derive(Debug, Clone)]
pub struct Thermostat {
    pub enabled: bool,
    pub target_temperature: f64,
    transient_in_progress: bool,
    window: WindowedAverage,
}

impl Thermostat {
    pub fn new() -> Self {
        Self {
            enabled: false,
            target_temperature: 300.0,
            transient_in_progress: false,
            window: WindowedAverage::new(temperature_window_size(false)),
        }
    }

    pub fn is_transient_in_progress(&self) -> bool {
        self.transient_in_progress
    }

    /// Enable transient-change mode and reset the windowed average so
    /// convergence is judged only on samples taken after this call.
    pub fn begin_transient_temperature_change(&mut self) {
        self.transient_in_progress = true;
        self.window = WindowedAverage::new(temperature_window_size(true));
    }

    /// Given the instantaneous temperature for this step, decide whether a
    /// rescale should happen and return the velocity scale factor
    /// `sqrt(target/T)` if so. Also updates the windowed average and may
    /// clear the transient flag.
    pub fn adjust(&mut self, instantaneous_t: f64, force_adjustment: bool) -> Option<f64> {
        self.window.push(instantaneous_t);

        if self.transient_in_progress
            && self.target_temperature > 0.0
            && (self.window.mean() - self.target_temperature).abs() / self.target_temperature
                <= TRANSIENT_TOLERANCE
        {
            self.transient_in_progress = false;
        }

        let should_rescale = self.enabled
            || (self.transient_in_progress && instantaneous_t > 0.0)
            || force_adjustment;

        if !should_rescale || instantaneous_t <= 0.0 {
            return None;
        }

        if self.target_temperature > 0.0 {
            let deviation = (instantaneous_t - self.target_temperature).abs() / self.target_temperature;
            if deviation > SUSPICIOUS_RESCALE_FRACTION {
                warn!(
                    instantaneous_t,
                    target_temperature = self.target_temperature,
                    "thermostat rescaling a temperature far from target"
                );
            }
        }

        Some((self.target_temperature / instantaneous_t).sqrt())
    }
}

impl Default for Thermostat {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn steady_thermostat_always_rescales() {
        let mut thermostat = Thermostat::new();
        thermostat.enabled = true;
        thermostat.target_temperature = 300.0;
        let ratio = thermostat.adjust(600.0, false).unwrap();
        assert_relative_eq!(ratio, (300.0f64 / 600.0).sqrt());
    }

    #[test]
    fn off_and_no_transient_never_rescales() {
        let mut thermostat = Thermostat::new();
        thermostat.target_temperature = 300.0;
        assert!(thermostat.adjust(600.0, false).is_none());
    }

    #[test]
    fn transient_change_clears_once_windowed_average_converges() {
        let mut thermostat = Thermostat::new();
        thermostat.target_temperature = 300.0;
        thermostat.begin_transient_temperature_change();
        assert!(thermostat.is_transient_in_progress());
        for _ in 0..5 {
            thermostat.adjust(300.0, false);
        }
        assert!(!thermostat.is_transient_in_progress());
    }
}
