#![deny(warnings)]

//! Core domain models and invariants for the world-economy simulation.
//!
//! This crate defines the serializable state shared by the model and the
//! runtime (countries, global factors, operator controls, events), the
//! injectable random source, the default calibration, and validation helpers
//! that guard the numeric floors every tick must preserve.

mod config;
mod country;
mod global;
mod rng;
mod trade;

pub use config::{DrawWindow, SimConfig};
pub use country::{default_countries, Country, CountryParams, CountryState, PlayerControls};
pub use global::{FactorParams, GlobalFactors, JUMP_RETENTION, OIL_FLOOR, RISK_FLOOR};
pub use rng::{ChaChaSource, RandomSource, ScriptedSource};
pub use trade::TradeWeights;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Countries keyed in update order.
pub type CountryMap = BTreeMap<Country, CountryState>;

/// A single entry of the rolling event log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Simulated day on which the event fired.
    pub time: f64,
    /// Headline shown to the operator.
    pub text: String,
}

/// Validation errors for domain invariants and rejected operator input.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Country name is not one of the simulated economies.
    #[error("unknown country: {0}")]
    UnknownCountry(String),
    /// Numeric field diverged to NaN or infinity.
    #[error("non-finite value in {field}")]
    NonFinite {
        /// Dotted path of the offending field, e.g. "China.inflation".
        field: String,
    },
    /// Numeric field fell below its model floor.
    #[error("{field} = {value} is below its floor {floor}")]
    BelowFloor {
        /// Dotted path of the offending field.
        field: String,
        /// Observed value.
        value: f64,
        /// Minimum allowed value.
        floor: f64,
    },
    /// Speed multiplier must be finite and non-negative.
    #[error("invalid speed multiplier: {0}")]
    InvalidSpeed(f64),
    /// Configuration value out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

fn check_finite(field: impl Into<String>, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NonFinite {
            field: field.into(),
        })
    }
}

fn check_floor(field: &str, value: f64, floor: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if value < floor {
        return Err(ValidationError::BelowFloor {
            field: field.to_string(),
            value,
            floor,
        });
    }
    Ok(())
}

fn check_positive(field: &str, value: f64) -> Result<(), ValidationError> {
    check_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::BelowFloor {
            field: field.to_string(),
            value,
            floor: 0.0,
        });
    }
    Ok(())
}

/// Validate one country's state: finiteness everywhere, zero lower bound on
/// the policy rate, non-negative debt, strictly positive prices.
pub fn validate_country(country: Country, s: &CountryState) -> Result<(), ValidationError> {
    let name = country.name();
    let f = |field: &str| format!("{name}.{field}");
    for (field, value) in [
        ("growth", s.growth),
        ("inflation", s.inflation),
        ("spread", s.spread),
        ("idio_vol", s.idio_vol),
        ("nominal_output", s.nominal_output),
        ("real_output", s.real_output),
    ] {
        check_finite(f(field), value)?;
    }
    check_floor(&f("rate"), s.rate, 0.0)?;
    check_floor(&f("debt"), s.debt, 0.0)?;
    check_positive(&f("fx"), s.fx)?;
    check_positive(&f("fair_value"), s.fair_value)?;
    check_positive(&f("equity"), s.equity)?;
    Ok(())
}

/// Validate global factors against their floors.
pub fn validate_global(g: &GlobalFactors) -> Result<(), ValidationError> {
    check_floor("global.oil_price", g.oil_price, OIL_FLOOR)?;
    check_floor("global.risk_aversion", g.risk_aversion, RISK_FLOOR)?;
    check_finite("global.world_rate", g.world_rate)?;
    check_finite("global.oil_jump", g.oil_jump)?;
    check_finite("global.risk_jump", g.risk_jump)?;
    Ok(())
}

/// Validate the full economy: global factors plus every country.
pub fn validate_world(
    global: &GlobalFactors,
    countries: &CountryMap,
) -> Result<(), ValidationError> {
    validate_global(global)?;
    for (c, s) in countries {
        validate_country(*c, s)?;
    }
    Ok(())
}

/// Validate reputation bounds.
pub fn validate_reputation(reputation: f64) -> Result<(), ValidationError> {
    check_floor("reputation", reputation, 0.0)?;
    if reputation > 100.0 {
        return Err(ValidationError::InvalidConfig(format!(
            "reputation {reputation} exceeds 100"
        )));
    }
    Ok(())
}
