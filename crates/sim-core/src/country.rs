use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{CountryMap, ValidationError};

/// The simulated economies. Declaration order is the per-tick update order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Country {
    /// Reference economy; its currency is the numeraire.
    UnitedStates,
    China,
    EuroArea,
    India,
    Japan,
    Brazil,
    Russia,
    SaudiArabia,
}

impl Country {
    /// Every country in update order.
    pub const ALL: [Country; 8] = [
        Country::UnitedStates,
        Country::China,
        Country::EuroArea,
        Country::India,
        Country::Japan,
        Country::Brazil,
        Country::Russia,
        Country::SaudiArabia,
    ];

    /// The economy that defines the numeraire currency.
    pub const REFERENCE: Country = Country::UnitedStates;

    /// Display name, also the key accepted by [`Country::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Country::UnitedStates => "United States",
            Country::China => "China",
            Country::EuroArea => "Euro Area",
            Country::India => "India",
            Country::Japan => "Japan",
            Country::Brazil => "Brazil",
            Country::Russia => "Russia",
            Country::SaudiArabia => "Saudi Arabia",
        }
    }

    /// Look up a country by its display name.
    pub fn from_name(name: &str) -> Option<Country> {
        Country::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Whether this is the reference economy (no FX feedback, no global risk pass-through).
    pub fn is_reference(self) -> bool {
        self == Country::REFERENCE
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Country {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::from_name(s).ok_or_else(|| ValidationError::UnknownCountry(s.to_string()))
    }
}

/// Fixed structural parameters of one economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryParams {
    /// Potential (trend) growth, % per year.
    pub potential_growth: f64,
    /// Central bank inflation target, %.
    pub inflation_target: f64,
    /// Neutral real interest rate, %.
    pub neutral_rate: f64,
    /// Growth mean-reversion speed toward potential.
    pub growth_reversion: f64,
    /// Sensitivity of growth to the real policy gap.
    pub rate_sensitivity: f64,
    /// Sensitivity of growth to the net-export shock.
    pub export_sensitivity: f64,
    /// Inflation mean-reversion speed toward target.
    pub inflation_reversion: f64,
    /// Phillips-curve slope on the output-gap proxy.
    pub phillips_slope: f64,
    /// Pass-through of oil price deviation into inflation (negative for exporters).
    pub oil_passthrough: f64,
    /// Policy rate smoothing speed toward the Taylor target.
    pub rate_smoothing: f64,
    /// Taylor-rule inflation coefficient.
    pub taylor_inflation: f64,
    /// Taylor-rule output coefficient.
    pub taylor_output: f64,
    /// Debt level (% of output) above which local risk builds.
    pub debt_ceiling: f64,
    /// Growth response to fiscal impulse.
    pub fiscal_multiplier: f64,
}

/// Dynamic state of one economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountryState {
    /// Nominal output, trillions of local-reference units.
    pub nominal_output: f64,
    /// Real output, trillions.
    pub real_output: f64,
    /// Real growth rate, % per year.
    pub growth: f64,
    /// Inflation, % per year.
    pub inflation: f64,
    /// Policy interest rate, % (>= 0).
    pub rate: f64,
    /// Exchange rate, local units per reference unit (> 0).
    pub fx: f64,
    /// PPP-implied exchange rate (> 0).
    pub fair_value: f64,
    /// Sovereign debt, % of output (>= 0).
    pub debt: f64,
    /// Sovereign risk spread, %.
    pub spread: f64,
    /// Idiosyncratic volatility add-on feeding the spread target.
    pub idio_vol: f64,
    /// Equity index level (> 0).
    pub equity: f64,
    /// Structural parameters.
    pub params: CountryParams,
}

/// Operator controls applied to the player's economy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerControls {
    /// Percentage points added to the Taylor-rule target.
    pub rate_override: f64,
    /// Target primary balance, % of output (negative = deficit).
    pub fiscal_balance: f64,
    /// Average tariff rate, %.
    pub tariff_level: f64,
    /// FX intervention intensity; accepted but not yet modeled.
    pub intervention: f64,
}

impl Default for PlayerControls {
    fn default() -> Self {
        Self {
            rate_override: 0.0,
            fiscal_balance: 0.0,
            tariff_level: 5.0,
            intervention: 0.0,
        }
    }
}

impl PlayerControls {
    /// Controls a freshly appointed player starts from: no override, the
    /// default 2% deficit and the neutral 5% tariff.
    pub fn reset_for_new_player(&mut self) {
        self.rate_override = 0.0;
        self.fiscal_balance = -2.0;
        self.tariff_level = 5.0;
    }
}

#[allow(clippy::too_many_arguments)]
fn state(
    nominal_output: f64,
    real_output: f64,
    growth: f64,
    inflation: f64,
    rate: f64,
    fx: f64,
    debt: f64,
    spread: f64,
    idio_vol: f64,
    params: CountryParams,
) -> CountryState {
    CountryState {
        nominal_output,
        real_output,
        growth,
        inflation,
        rate,
        fx,
        fair_value: fx,
        debt,
        spread,
        idio_vol,
        equity: 100.0,
        params,
    }
}

#[allow(clippy::too_many_arguments)]
fn params(
    potential_growth: f64,
    inflation_target: f64,
    neutral_rate: f64,
    (growth_reversion, rate_sensitivity, export_sensitivity): (f64, f64, f64),
    (inflation_reversion, phillips_slope, oil_passthrough): (f64, f64, f64),
    (rate_smoothing, taylor_inflation, taylor_output): (f64, f64, f64),
    debt_ceiling: f64,
    fiscal_multiplier: f64,
) -> CountryParams {
    CountryParams {
        potential_growth,
        inflation_target,
        neutral_rate,
        growth_reversion,
        rate_sensitivity,
        export_sensitivity,
        inflation_reversion,
        phillips_slope,
        oil_passthrough,
        rate_smoothing,
        taylor_inflation,
        taylor_output,
        debt_ceiling,
        fiscal_multiplier,
    }
}

/// Baseline calibration of all eight economies. Fair value starts at spot FX.
#[rustfmt::skip]
pub fn default_countries() -> CountryMap {
    use Country::*;
    CountryMap::from([
        (
            UnitedStates,
            state(27.72, 23.77, 2.0, 2.0, 5.25, 1.0, 108.2, 0.0, 0.0,
                params(2.0, 2.0, 1.0, (0.1, 0.5, 0.1), (0.2, 0.1, 0.05), (0.1, 1.5, 0.5), 150.0, 0.5)),
        ),
        (
            China,
            state(17.79, 17.18, 5.0, 2.5, 3.0, 7.2, 80.0, 0.5, 0.1,
                params(4.5, 3.0, 2.0, (0.15, 0.3, 0.2), (0.3, 0.15, 0.1), (0.1, 1.2, 0.5), 120.0, 0.6)),
        ),
        (
            EuroArea,
            state(17.75, 17.75, 1.5, 2.0, 4.5, 0.9, 90.0, 0.2, 0.05,
                params(1.2, 2.0, 0.5, (0.1, 0.4, 0.15), (0.2, 0.1, 0.15), (0.08, 1.5, 0.5), 100.0, 0.4)),
        ),
        (
            India,
            state(3.57, 4.13, 6.5, 5.0, 6.5, 83.0, 82.0, 1.5, 0.2,
                params(6.5, 4.0, 2.0, (0.2, 0.3, 0.1), (0.4, 0.2, 0.2), (0.15, 1.5, 0.5), 90.0, 0.7)),
        ),
        (
            Japan,
            state(4.20, 4.61, 1.0, 1.0, 0.1, 150.0, 250.0, 0.1, 0.05,
                params(0.8, 2.0, -0.5, (0.1, 0.2, 0.1), (0.1, 0.05, 0.15), (0.05, 1.5, 0.5), 300.0, 0.3)),
        ),
        (
            Brazil,
            state(2.17, 2.18, 2.0, 4.5, 10.0, 5.0, 85.0, 2.5, 0.3,
                params(2.0, 3.25, 4.0, (0.2, 0.4, 0.15), (0.5, 0.25, 0.1), (0.2, 1.8, 0.5), 100.0, 0.5)),
        ),
        (
            Russia,
            state(2.02, 0.49, 1.5, 6.0, 15.0, 90.0, 20.0, 4.0, 0.5,
                params(1.0, 4.0, 3.0, (0.15, 0.2, 0.1), (0.4, 0.2, -0.3), (0.2, 1.5, 0.5), 50.0, 0.4)),
        ),
        (
            SaudiArabia,
            state(1.07, 1.07, 3.0, 2.5, 5.0, 3.75, 30.0, 0.8, 0.1,
                params(2.5, 2.0, 1.5, (0.2, 0.1, 0.3), (0.3, 0.1, -0.5), (0.1, 1.2, 0.2), 60.0, 0.6)),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip() {
        for c in Country::ALL {
            assert_eq!(Country::from_name(c.name()), Some(c));
            assert_eq!(c.name().parse::<Country>().unwrap(), c);
        }
        assert_eq!(
            "Atlantis".parse::<Country>(),
            Err(ValidationError::UnknownCountry("Atlantis".into()))
        );
    }

    #[test]
    fn only_united_states_is_reference() {
        let refs: Vec<_> = Country::ALL.into_iter().filter(|c| c.is_reference()).collect();
        assert_eq!(refs, vec![Country::UnitedStates]);
    }

    #[test]
    fn map_iterates_in_update_order() {
        let keys: Vec<_> = default_countries().into_keys().collect();
        assert_eq!(keys, Country::ALL.to_vec());
    }

    #[test]
    fn fair_value_starts_at_spot() {
        for s in default_countries().values() {
            assert_eq!(s.fair_value, s.fx);
        }
    }

    #[test]
    fn new_player_controls() {
        let mut c = PlayerControls {
            rate_override: 3.0,
            fiscal_balance: 4.0,
            tariff_level: 40.0,
            intervention: 1.0,
        };
        c.reset_for_new_player();
        assert_eq!(c.rate_override, 0.0);
        assert_eq!(c.fiscal_balance, -2.0);
        assert_eq!(c.tariff_level, 5.0);
        assert_eq!(c.intervention, 1.0);
    }
}
