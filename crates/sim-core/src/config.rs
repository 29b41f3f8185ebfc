use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Half-open interval a waiting time is drawn from uniformly.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DrawWindow {
    pub low: f64,
    pub high: f64,
}

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed integration step in simulated days.
    pub dt: f64,
    /// Wall-clock milliseconds per simulated day at 1x speed.
    pub real_ms_per_day: f64,
    /// Days the player must survive to win.
    pub term_length: f64,
    /// Seed for the deterministic RNG.
    pub rng_seed: u64,
    /// Reputation at the start of a run, in [0, 100].
    pub initial_reputation: f64,
    /// Maximum samples retained per history series.
    pub history_capacity: usize,
    /// Simulated days between history samples.
    pub history_interval: f64,
    /// Maximum entries in the event log.
    pub event_log_capacity: usize,
    /// Simulated days a credit downgrade lasts before it reverts.
    pub downgrade_duration: f64,
    /// Window for the first event time.
    pub first_event_window: DrawWindow,
    /// Window for the gap between consecutive events.
    pub event_gap_window: DrawWindow,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            dt: 0.05,
            real_ms_per_day: 2000.0,
            term_length: 1200.0,
            rng_seed: 42,
            initial_reputation: 50.0,
            history_capacity: 500,
            history_interval: 0.2,
            event_log_capacity: 10,
            downgrade_duration: 2.0,
            first_event_window: DrawWindow {
                low: 10.0,
                high: 20.0,
            },
            event_gap_window: DrawWindow {
                low: 40.0,
                high: 80.0,
            },
        }
    }
}

impl SimConfig {
    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = [
            ("dt", self.dt),
            ("real_ms_per_day", self.real_ms_per_day),
            ("term_length", self.term_length),
            ("history_interval", self.history_interval),
            ("downgrade_duration", self.downgrade_duration),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(ValidationError::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        if !(0.0..=100.0).contains(&self.initial_reputation) {
            return Err(ValidationError::InvalidConfig(format!(
                "initial_reputation must be within [0,100], got {}",
                self.initial_reputation
            )));
        }
        if self.history_capacity == 0 || self.event_log_capacity == 0 {
            return Err(ValidationError::InvalidConfig(
                "history_capacity and event_log_capacity must be > 0".into(),
            ));
        }
        for (name, w) in [
            ("first_event_window", self.first_event_window),
            ("event_gap_window", self.event_gap_window),
        ] {
            if !(w.low.is_finite() && w.high.is_finite() && w.low >= 0.0 && w.low <= w.high) {
                return Err(ValidationError::InvalidConfig(format!(
                    "{name} must satisfy 0 <= low <= high"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn zero_step_is_rejected() {
        let cfg = SimConfig {
            dt: 0.0,
            ..SimConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ValidationError::InvalidConfig(_))));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let cfg = SimConfig {
            event_gap_window: DrawWindow {
                low: 80.0,
                high: 40.0,
            },
            ..SimConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: SimConfig =
            serde_json::from_str(r#"{"term_length": 10.0, "rng_seed": 7}"#).unwrap();
        assert_eq!(cfg.term_length, 10.0);
        assert_eq!(cfg.rng_seed, 7);
        assert_eq!(cfg.dt, 0.05);
        assert_eq!(cfg.history_capacity, 500);
    }
}
