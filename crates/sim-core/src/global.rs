use serde::{Deserialize, Serialize};

/// Oil price floor applied after every step.
pub const OIL_FLOOR: f64 = 10.0;
/// Global risk aversion floor applied after every step.
pub const RISK_FLOOR: f64 = 0.0;
/// Fraction of a jump term retained after each tick.
pub const JUMP_RETENTION: f64 = 0.9;

/// Mean-reversion parameters of one global factor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactorParams {
    /// Reversion speed per day.
    pub speed: f64,
    /// Long-run mean.
    pub mean: f64,
    /// Diffusion volatility per sqrt(day).
    pub vol: f64,
}

/// Shared world factors every economy responds to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalFactors {
    /// Oil price, USD per barrel (>= [`OIL_FLOOR`]).
    pub oil_price: f64,
    /// Global risk aversion, a VIX-like index (>= 0).
    pub risk_aversion: f64,
    /// World risk-free rate, %.
    pub world_rate: f64,
    pub oil: FactorParams,
    pub risk: FactorParams,
    pub rate: FactorParams,
    /// Transient drift added to oil, decays by [`JUMP_RETENTION`] each tick.
    pub oil_jump: f64,
    /// Transient drift added to risk aversion.
    pub risk_jump: f64,
}

impl Default for GlobalFactors {
    fn default() -> Self {
        Self {
            oil_price: 80.0,
            risk_aversion: 0.0,
            world_rate: 4.0,
            oil: FactorParams {
                speed: 0.02,
                mean: 80.0,
                vol: 1.5,
            },
            risk: FactorParams {
                speed: 0.1,
                mean: 0.0,
                vol: 0.2,
            },
            rate: FactorParams {
                speed: 0.01,
                mean: 4.0,
                vol: 0.05,
            },
            oil_jump: 0.0,
            risk_jump: 0.0,
        }
    }
}
