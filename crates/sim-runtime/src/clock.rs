//! Fixed-step clock reconciling host wall time with simulated days.

use bevy_ecs::prelude::*;
use tracing::debug;

/// Wall-clock to simulated-time reconciliation.
///
/// Real elapsed milliseconds are converted into simulated days at
/// `real_ms_per_day / speed` and accumulated; the engine then consumes the
/// accumulator in whole `dt` steps. Fractional leftovers carry over to the
/// next call. While paused, elapsed time is discarded and the accumulator
/// is frozen, so resuming never replays the pause.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct SimClock {
    dt: f64,
    real_ms_per_day: f64,
    speed: f64,
    running: bool,
    accumulator: f64,
}

impl SimClock {
    pub fn new(dt: f64, real_ms_per_day: f64) -> Self {
        Self {
            dt,
            real_ms_per_day,
            speed: 1.0,
            running: false,
            accumulator: 0.0,
        }
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Caller validates the multiplier.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    /// Simulated days waiting to be integrated.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Add `elapsed_ms` of host time. Ignored while paused or when the
    /// elapsed value is not a positive finite number.
    pub fn accumulate(&mut self, elapsed_ms: f64) {
        if !self.running || !(elapsed_ms.is_finite() && elapsed_ms > 0.0) {
            return;
        }
        let days = elapsed_ms / (self.real_ms_per_day / self.speed);
        self.accumulator += days;
        debug!(elapsed_ms, days, accumulator = self.accumulator, "clock accumulated");
    }

    /// Consume one whole step from the accumulator if available.
    pub fn take_step(&mut self) -> bool {
        if self.accumulator >= self.dt {
            self.accumulator -= self.dt;
            true
        } else {
            false
        }
    }
}
