//! Player reputation scoring.

use bevy_ecs::prelude::*;
use sim_core::CountryState;

pub const REPUTATION_MIN: f64 = 0.0;
pub const REPUTATION_MAX: f64 = 100.0;

/// Per-day reputation drift earned by the player's economy.
///
/// Growth above 2% is rewarded, a recession penalized. Inflation above 5%
/// and debt above 100% of output are penalized, with the higher
/// thresholds (10% inflation, 150% debt) stacking on top.
pub fn reputation_delta(s: &CountryState) -> f64 {
    let mut delta = 0.0;
    if s.growth > 2.0 {
        delta += 0.05;
    } else if s.growth < 0.0 {
        delta -= 0.1;
    }
    if s.inflation > 5.0 {
        delta -= 0.1;
    }
    if s.inflation > 10.0 {
        delta -= 0.2;
    }
    if s.debt > 100.0 {
        delta -= 0.05;
    }
    if s.debt > 150.0 {
        delta -= 0.1;
    }
    delta
}

/// Reputation score, always within [0, 100].
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct Reputation(f64);

impl Reputation {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(REPUTATION_MIN, REPUTATION_MAX))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn set(&mut self, value: f64) {
        *self = Self::new(value);
    }

    /// Apply one tick of the player's drift.
    pub fn score(&mut self, s: &CountryState, dt: f64) {
        self.set(self.0 + reputation_delta(s) * dt);
    }
}
