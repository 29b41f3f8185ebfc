use sim_core::{FactorParams, GlobalFactors, RandomSource, JUMP_RETENTION, OIL_FLOOR, RISK_FLOOR};

/// One Euler–Maruyama increment of `x` under a mean-reverting process.
fn ou_increment<R: RandomSource + ?Sized>(
    x: f64,
    p: &FactorParams,
    jump: f64,
    dt: f64,
    rng: &mut R,
) -> f64 {
    p.speed * (p.mean - x) * dt + p.vol * rng.standard_normal() * dt.sqrt() + jump * dt
}

/// Advance oil, risk aversion and the world rate by `dt` days.
///
/// Each factor takes its own normal draw, in the order oil, risk, rate.
/// Floors are applied after the step and both jump terms decay by
/// [`JUMP_RETENTION`] whether or not a jump is active.
pub fn advance_global<R: RandomSource + ?Sized>(g: &mut GlobalFactors, dt: f64, rng: &mut R) {
    g.oil_price += ou_increment(g.oil_price, &g.oil, g.oil_jump, dt, rng);
    g.oil_price = g.oil_price.max(OIL_FLOOR);
    g.oil_jump *= JUMP_RETENTION;

    g.risk_aversion += ou_increment(g.risk_aversion, &g.risk, g.risk_jump, dt, rng);
    g.risk_aversion = g.risk_aversion.max(RISK_FLOOR);
    g.risk_jump *= JUMP_RETENTION;

    // The world rate has no jump channel.
    g.world_rate += ou_increment(g.world_rate, &g.rate, 0.0, dt, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sim_core::{ChaChaSource, ScriptedSource};

    #[test]
    fn quiet_step_reverts_toward_mean() {
        let mut g = GlobalFactors {
            oil_price: 100.0,
            risk_aversion: 1.0,
            world_rate: 5.0,
            ..GlobalFactors::default()
        };
        let mut rng = ScriptedSource::quiet(0.5);
        advance_global(&mut g, 1.0, &mut rng);
        assert!((g.oil_price - (100.0 + 0.02 * (80.0 - 100.0))).abs() < 1e-12);
        assert!((g.risk_aversion - 0.9).abs() < 1e-12);
        assert!((g.world_rate - (5.0 + 0.01 * (4.0 - 5.0))).abs() < 1e-12);
    }

    #[test]
    fn jumps_decay_geometrically() {
        let mut g = GlobalFactors {
            oil_jump: 20.0,
            risk_jump: 2.0,
            ..GlobalFactors::default()
        };
        let mut rng = ScriptedSource::quiet(0.5);
        for _ in 0..3 {
            advance_global(&mut g, 0.05, &mut rng);
        }
        assert!((g.oil_jump - 20.0 * 0.9f64.powi(3)).abs() < 1e-12);
        assert!((g.risk_jump - 2.0 * 0.9f64.powi(3)).abs() < 1e-12);
        // The jump is additive drift, so oil sits above its starting level.
        assert!(g.oil_price > 80.0);
    }

    #[test]
    fn draws_are_per_factor() {
        let mut g = GlobalFactors::default();
        let mut rng = ScriptedSource::new(vec![0.5]).with_normals(vec![1.0, 2.0, 3.0]);
        advance_global(&mut g, 1.0, &mut rng);
        assert!((g.oil_price - (80.0 + 1.5)).abs() < 1e-12);
        assert!((g.risk_aversion - 0.4).abs() < 1e-12);
        assert!((g.world_rate - (4.0 + 0.15)).abs() < 1e-12);
    }

    #[test]
    fn floors_hold_under_large_negative_shocks() {
        let mut g = GlobalFactors {
            oil_price: 11.0,
            oil_jump: -500.0,
            risk_aversion: 0.1,
            ..GlobalFactors::default()
        };
        let mut rng = ScriptedSource::new(vec![0.5]).with_normals(vec![-8.0]);
        advance_global(&mut g, 1.0, &mut rng);
        assert_eq!(g.oil_price, OIL_FLOOR);
        assert_eq!(g.risk_aversion, RISK_FLOOR);
    }

    proptest! {
        #[test]
        fn floors_hold_for_any_seed(
            seed in any::<u64>(),
            oil_jump in -100.0f64..100.0,
            risk_jump in -5.0f64..5.0,
        ) {
            let mut g = GlobalFactors {
                oil_jump,
                risk_jump,
                ..GlobalFactors::default()
            };
            let mut rng = ChaChaSource::seed_from_u64(seed);
            for _ in 0..500 {
                advance_global(&mut g, 0.05, &mut rng);
                prop_assert!(g.oil_price >= OIL_FLOOR);
                prop_assert!(g.risk_aversion >= RISK_FLOOR);
                prop_assert!(g.world_rate.is_finite());
            }
        }
    }
}
