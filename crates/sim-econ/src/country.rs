use sim_core::{
    Country, CountryMap, CountryParams, CountryState, GlobalFactors, PlayerControls, RandomSource,
};
use tracing::trace;

/// Day-count basis for annualized rates.
pub const DAYS_PER_YEAR: f64 = 365.0;
/// Primary balance (% of output) run by every non-player government.
pub const DEFAULT_PRIMARY_BALANCE: f64 = -2.0;
/// Lower bound on a multiplicative step so prices stay strictly positive.
pub const MIN_GROSS_RETURN: f64 = 1e-6;

const NEUTRAL_TARIFF: f64 = 5.0;
const TARIFF_DRAG: f64 = 0.1;
const EXPORT_LOADING: f64 = 0.1;
const FISCAL_LOADING: f64 = 0.1;
const GROWTH_NOISE: f64 = 0.5;
const INFLATION_NOISE: f64 = 0.2;
const BASELINE_OIL: f64 = 80.0;
const LOCAL_RISK_SLOPE: f64 = 0.02;
const LOCAL_RISK_CAP: f64 = 20.0;
const SPREAD_RELAXATION: f64 = 0.2;
const FX_VALUATION_PULL: f64 = 0.5;
const FX_VOL: f64 = 0.10;
const EQUITY_BASE_RETURN: f64 = 0.05;
const EQUITY_BASE_VOL: f64 = 0.15;
const EQUITY_RISK_LOADING: f64 = 0.5;

/// Policy rate and inflation of the reference economy, read after it has
/// been updated in the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReferenceRates {
    pub rate: f64,
    pub inflation: f64,
}

impl ReferenceRates {
    pub fn of(s: &CountryState) -> Self {
        Self {
            rate: s.rate,
            inflation: s.inflation,
        }
    }
}

fn gross(x: f64) -> f64 {
    x.max(MIN_GROSS_RETURN)
}

/// Log deviation of spot FX from fair value; zero for the reference economy.
pub fn competitiveness(country: Country, s: &CountryState) -> f64 {
    if country.is_reference() {
        0.0
    } else {
        (s.fx / s.fair_value).ln()
    }
}

/// FX competitiveness contribution net of the player's tariff drag.
pub fn net_export_shock(
    country: Country,
    s: &CountryState,
    controls: Option<&PlayerControls>,
) -> f64 {
    let tariff_drag = controls.map_or(0.0, |c| (c.tariff_level - NEUTRAL_TARIFF) * TARIFF_DRAG);
    EXPORT_LOADING * competitiveness(country, s) - tariff_drag
}

/// Growth impulse from running a deficit beyond the default 2%.
pub fn fiscal_impulse(p: &CountryParams, controls: Option<&PlayerControls>) -> f64 {
    controls.map_or(0.0, |c| {
        (DEFAULT_PRIMARY_BALANCE - c.fiscal_balance) * p.fiscal_multiplier * FISCAL_LOADING
    })
}

/// Taylor-rule target with the player's override added on top.
pub fn policy_target(s: &CountryState, output_gap: f64, controls: Option<&PlayerControls>) -> f64 {
    let p = &s.params;
    let rule = p.neutral_rate
        + s.inflation
        + p.taylor_inflation * (s.inflation - p.inflation_target)
        + p.taylor_output * output_gap;
    rule + controls.map_or(0.0, |c| c.rate_override)
}

pub fn primary_balance(controls: Option<&PlayerControls>) -> f64 {
    controls.map_or(DEFAULT_PRIMARY_BALANCE, |c| c.fiscal_balance)
}

/// Level the spread relaxes toward: capped local debt risk, global risk
/// aversion (except for the reference economy) and the idiosyncratic add-on.
pub fn risk_spread_target(country: Country, s: &CountryState, global: &GlobalFactors) -> f64 {
    let excess = (s.debt - s.params.debt_ceiling).max(0.0);
    let local = (LOCAL_RISK_SLOPE * excess).min(LOCAL_RISK_CAP);
    let world = if country.is_reference() {
        0.0
    } else {
        global.risk_aversion
    };
    local + world + s.idio_vol
}

/// Advance one economy by `dt` days.
///
/// Sub-updates run in a fixed order and each reads the values written by the
/// ones before it: growth and output levels, inflation, policy rate, debt,
/// spread, FX (non-reference only), equity. `controls` is `Some` only for
/// the player's economy.
pub fn advance_country<R: RandomSource + ?Sized>(
    country: Country,
    s: &mut CountryState,
    global: &GlobalFactors,
    reference: ReferenceRates,
    controls: Option<&PlayerControls>,
    dt: f64,
    rng: &mut R,
) {
    let sqrt_dt = dt.sqrt();
    let dt_years = dt / DAYS_PER_YEAR;
    let p = s.params.clone();

    // Growth
    let rate_gap = (s.rate - s.inflation) - p.neutral_rate;
    let nx_shock = net_export_shock(country, s, controls);
    let drift = -p.growth_reversion * (s.growth - p.potential_growth)
        - p.rate_sensitivity * rate_gap
        + p.export_sensitivity * nx_shock;
    let noise = GROWTH_NOISE * rng.standard_normal() * sqrt_dt;
    s.growth += drift * dt + noise + fiscal_impulse(&p, controls) * dt;
    s.real_output *= 1.0 + (s.growth / 100.0) * dt_years;
    s.nominal_output *= 1.0 + ((s.growth + s.inflation) / 100.0) * dt_years;

    // Inflation
    let output_gap = s.growth - p.potential_growth;
    let oil_deviation = (global.oil_price - BASELINE_OIL) / BASELINE_OIL;
    let drift = -p.inflation_reversion * (s.inflation - p.inflation_target)
        + p.phillips_slope * output_gap
        + p.oil_passthrough * oil_deviation;
    s.inflation += drift * dt + INFLATION_NOISE * rng.standard_normal() * sqrt_dt;

    // Policy rate
    let target = policy_target(s, output_gap, controls);
    s.rate += -p.rate_smoothing * (s.rate - target) * dt;
    if s.rate < 0.0 {
        trace!(%country, rate_target = target, "policy rate pinned at zero lower bound");
        s.rate = 0.0;
    }

    // Debt
    let snowball = ((s.rate - s.inflation) - s.growth) / 100.0 * s.debt;
    s.debt += (snowball - primary_balance(controls)) * dt;
    s.debt = s.debt.max(0.0);

    // Spread
    let target = risk_spread_target(country, s, global);
    s.spread += SPREAD_RELAXATION * (target - s.spread) * dt;

    // FX
    if !country.is_reference() {
        s.fair_value *= gross(1.0 + (s.inflation - reference.inflation) / 100.0 * dt_years);
        let carry = -(s.rate - reference.rate - s.spread) / 100.0;
        let pull = FX_VALUATION_PULL * (s.fair_value / s.fx).ln();
        let shock = FX_VOL * rng.standard_normal() * dt_years.sqrt();
        s.fx *= gross(1.0 + (carry + pull) * dt_years + shock);
    }

    // Equity
    let expected = EQUITY_BASE_RETURN + output_gap / 100.0
        - 0.5 * (s.rate - s.inflation) / 100.0
        - 0.5 * s.spread / 100.0;
    let vol = EQUITY_BASE_VOL + EQUITY_RISK_LOADING * global.risk_aversion;
    let shock = vol * rng.standard_normal() * dt_years.sqrt();
    s.equity *= gross(1.0 + expected * dt_years + shock);
}

/// Advance every economy in update order. The reference economy goes first,
/// so the others see its freshly updated rate and inflation.
pub fn advance_countries<R: RandomSource + ?Sized>(
    countries: &mut CountryMap,
    global: &GlobalFactors,
    player: Option<(Country, &PlayerControls)>,
    dt: f64,
    rng: &mut R,
) {
    let order: Vec<Country> = countries.keys().copied().collect();
    for country in order {
        let reference = countries.get(&Country::REFERENCE).map(ReferenceRates::of);
        let Some(state) = countries.get_mut(&country) else {
            continue;
        };
        let reference = reference.unwrap_or_else(|| ReferenceRates::of(state));
        let controls = player.and_then(|(c, controls)| (c == country).then_some(controls));
        advance_country(country, state, global, reference, controls, dt, rng);
    }
}
