#![deny(warnings)]

//! Economic models: the reduced-form dynamics of the world economy.
//!
//! This crate provides the two pure state transitions the runtime chains
//! every tick:
//! - Global factors (oil, risk aversion, world rate) as mean-reverting
//!   processes with decaying jump terms
//! - Per-country coupled updates of growth, inflation, policy rate, debt,
//!   risk spread, exchange rate and equity, in a fixed sequential order
//!
//! Both are infallible; floors are re-applied after every compounding step.

mod country;
mod global;

pub use country::{
    advance_countries, advance_country, competitiveness, fiscal_impulse, net_export_shock,
    policy_target, primary_balance, risk_spread_target, ReferenceRates, DAYS_PER_YEAR,
    DEFAULT_PRIMARY_BALANCE, MIN_GROSS_RETURN,
};
pub use global::advance_global;
