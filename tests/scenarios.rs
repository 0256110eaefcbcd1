//! End-to-end scenarios: each concrete case from the IRC testable
//! properties, driven through `quick_irc` exactly as the CLI would.

use approx::assert_relative_eq;
use irc_engine::prep::RawRow;
use irc_engine::{quick_irc, CancellationToken, FxRates, IrcConfig, ReferenceData};

fn row(pairs: &[(&str, &str)]) -> RawRow {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn config(num_simulations: usize, seed: u64) -> IrcConfig {
    IrcConfig {
        num_simulations,
        seed,
        compute_attribution: false,
        ..IrcConfig::default()
    }
}

#[test]
fn single_aaa_short_tenor_irc_is_small() {
    let rows = vec![row(&[
        ("issuer", "ISSUER_A"),
        ("notional", "10000000"),
        ("rating", "AAA"),
        ("tenor_years", "1"),
        ("seniority", "senior_unsecured"),
    ])];
    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let run = quick_irc(&rows, None, &fx, &rd, &config(100_000, 42), &token).unwrap();
    assert!(run.result.irc < 0.005 * 10_000_000.0, "irc = {}", run.result.irc);
}

#[test]
fn single_ccc_long_tenor_irc_is_near_lgd_times_notional() {
    let rows = vec![row(&[
        ("issuer", "ISSUER_B"),
        ("notional", "10000000"),
        ("rating", "CCC"),
        ("tenor_years", "5"),
        ("seniority", "senior_unsecured"),
    ])];
    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let run = quick_irc(&rows, None, &fx, &rd, &config(100_000, 42), &token).unwrap();
    let expected_default_loss = 0.45 * 10_000_000.0;
    assert!(
        run.result.percentile_999 <= expected_default_loss * 1.05,
        "percentile_999 = {}, ceiling = {}",
        run.result.percentile_999,
        expected_default_loss
    );
    assert!(run.result.percentile_999 > expected_default_loss * 0.5);
}

#[test]
fn two_perfectly_correlated_positions_equal_one_combined_position() {
    let split_rows = vec![
        row(&[
            ("issuer", "ISSUER_C"),
            ("notional", "5000000"),
            ("rating", "BB"),
            ("tenor_years", "3"),
        ]),
        row(&[
            ("issuer", "ISSUER_C"),
            ("notional", "5000000"),
            ("rating", "BB"),
            ("tenor_years", "3"),
        ]),
    ];
    let combined_rows = vec![row(&[
        ("issuer", "ISSUER_C"),
        ("notional", "10000000"),
        ("rating", "BB"),
        ("tenor_years", "3"),
    ])];

    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let split = quick_irc(&split_rows, None, &fx, &rd, &config(100_000, 99), &token).unwrap();
    let combined = quick_irc(&combined_rows, None, &fx, &rd, &config(100_000, 99), &token).unwrap();

    assert_relative_eq!(split.result.irc, combined.result.irc, max_relative = 1e-9);
}

#[test]
fn two_independent_issuers_diversify_below_single_combined_issuer() {
    let independent_rows = vec![
        row(&[
            ("issuer", "ISSUER_D1"),
            ("notional", "5000000"),
            ("rating", "BB"),
            ("tenor_years", "3"),
        ]),
        row(&[
            ("issuer", "ISSUER_D2"),
            ("notional", "5000000"),
            ("rating", "BB"),
            ("tenor_years", "3"),
        ]),
    ];
    let combined_rows = vec![row(&[
        ("issuer", "ISSUER_D1"),
        ("notional", "10000000"),
        ("rating", "BB"),
        ("tenor_years", "3"),
    ])];

    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let independent = quick_irc(&independent_rows, None, &fx, &rd, &config(200_000, 7), &token).unwrap();
    let combined = quick_irc(&combined_rows, None, &fx, &rd, &config(200_000, 7), &token).unwrap();

    assert!(
        independent.result.irc < combined.result.irc,
        "independent irc = {}, combined irc = {}",
        independent.result.irc,
        combined.result.irc
    );
}

#[test]
fn hedge_via_offsetting_short_cancels_out() {
    let rows = vec![
        row(&[
            ("issuer", "ISSUER_E"),
            ("position_id", "long"),
            ("notional", "10000000"),
            ("rating", "BBB"),
            ("tenor_years", "4"),
            ("is_long", "true"),
        ]),
        row(&[
            ("issuer", "ISSUER_E"),
            ("position_id", "short"),
            ("notional", "10000000"),
            ("rating", "BBB"),
            ("tenor_years", "4"),
            ("is_long", "false"),
        ]),
    ];
    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let run = quick_irc(&rows, None, &fx, &rd, &config(50_000, 11), &token).unwrap();
    assert_relative_eq!(run.result.irc, 0.0, epsilon = 1e-6);
    assert_relative_eq!(run.result.mean_loss, 0.0, epsilon = 1e-6);
}

#[test]
fn shorter_liquidity_horizon_increases_irc() {
    let long_horizon_rows = vec![row(&[
        ("issuer", "ISSUER_F"),
        ("notional", "10000000"),
        ("rating", "BB"),
        ("tenor_years", "3"),
        ("liquidity_horizon_months", "12"),
    ])];
    let short_horizon_rows = vec![row(&[
        ("issuer", "ISSUER_F"),
        ("notional", "10000000"),
        ("rating", "BB"),
        ("tenor_years", "3"),
        ("liquidity_horizon_months", "3"),
    ])];

    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let long_horizon = quick_irc(&long_horizon_rows, None, &fx, &rd, &config(200_000, 5), &token).unwrap();
    let short_horizon = quick_irc(&short_horizon_rows, None, &fx, &rd, &config(200_000, 5), &token).unwrap();

    assert!(
        short_horizon.result.irc > long_horizon.result.irc,
        "short = {}, long = {}",
        short_horizon.result.irc,
        long_horizon.result.irc
    );
}

#[test]
fn fx_round_trip_preserves_amount() {
    let mut fx = FxRates::new();
    fx.set_spot("EURUSD", 1.08);
    let forward = fx.convert(1_000_000.0, "EUR", "USD").unwrap();
    let back = fx.convert(forward, "USD", "EUR").unwrap();
    assert_relative_eq!(back, 1_000_000.0, max_relative = 1e-12);
}

#[test]
fn rating_normalisation_collapses_modifiers() {
    use irc_engine::ratings::normalise;
    assert_eq!(normalise("AA+").unwrap(), normalise("AA-").unwrap());
    assert_eq!(normalise("AA+").unwrap().as_str(), "AA");
}

#[test]
fn scale_invariance_of_irc_in_notional() {
    let base_rows = vec![row(&[
        ("issuer", "ISSUER_G"),
        ("notional", "2000000"),
        ("rating", "BB"),
        ("tenor_years", "3"),
    ])];
    let scaled_rows = vec![row(&[
        ("issuer", "ISSUER_G"),
        ("notional", "6000000"),
        ("rating", "BB"),
        ("tenor_years", "3"),
    ])];

    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let base = quick_irc(&base_rows, None, &fx, &rd, &config(100_000, 123), &token).unwrap();
    let scaled = quick_irc(&scaled_rows, None, &fx, &rd, &config(100_000, 123), &token).unwrap();

    assert_relative_eq!(scaled.result.irc, base.result.irc * 3.0, max_relative = 1e-9);
    assert_relative_eq!(scaled.result.mean_loss, base.result.mean_loss * 3.0, max_relative = 1e-9);
}

#[test]
fn default_state_idempotence_adding_already_defaulted_issuer_is_a_noop() {
    let base_rows = vec![row(&[
        ("issuer", "ISSUER_H"),
        ("notional", "10000000"),
        ("rating", "BBB"),
        ("tenor_years", "3"),
    ])];
    let with_defaulted_rows = vec![
        row(&[
            ("issuer", "ISSUER_H"),
            ("notional", "10000000"),
            ("rating", "BBB"),
            ("tenor_years", "3"),
        ]),
        row(&[
            ("issuer", "ZOMBIE_ISSUER"),
            ("notional", "3000000"),
            ("rating", "D"),
            ("tenor_years", "2"),
        ]),
    ];

    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let base = quick_irc(&base_rows, None, &fx, &rd, &config(50_000, 77), &token).unwrap();
    let with_defaulted = quick_irc(&with_defaulted_rows, None, &fx, &rd, &config(50_000, 77), &token).unwrap();

    assert_relative_eq!(with_defaulted.result.irc, base.result.irc, max_relative = 1e-9);
}

#[test]
fn attribution_gap_is_non_negative() {
    let rows = vec![
        row(&[
            ("issuer", "ISSUER_I1"),
            ("notional", "5000000"),
            ("rating", "BB"),
            ("tenor_years", "3"),
        ]),
        row(&[
            ("issuer", "ISSUER_I2"),
            ("notional", "5000000"),
            ("rating", "B"),
            ("tenor_years", "2"),
        ]),
    ];
    let fx = FxRates::new();
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let config = IrcConfig {
        num_simulations: 30_000,
        seed: 55,
        compute_attribution: true,
        attribution_simulations: Some(20_000),
        ..IrcConfig::default()
    };

    let run = quick_irc(&rows, None, &fx, &rd, &config, &token).unwrap();
    let attribution = run.attribution.unwrap();

    let standalone_sum: f64 = attribution.issuers.iter().map(|i| i.standalone_irc).sum();
    assert!(standalone_sum + 1e-6 >= run.result.irc);
    assert!(attribution.diversification_benefit >= 0.0);
}

#[test]
fn currency_conversion_scales_irc_by_the_fx_rate() {
    let usd_rows = vec![row(&[
        ("issuer", "ISSUER_J"),
        ("notional", "10000000"),
        ("currency", "USD"),
        ("rating", "BB"),
        ("tenor_years", "3"),
    ])];
    let eur_rows = vec![row(&[
        ("issuer", "ISSUER_J"),
        ("notional", "10000000"),
        ("currency", "EUR"),
        ("rating", "BB"),
        ("tenor_years", "3"),
    ])];

    let mut fx = FxRates::new();
    fx.set_spot("EURUSD", 1.08);
    let rd = ReferenceData::standard().unwrap();
    let token = CancellationToken::new();

    let usd_run = quick_irc(&usd_rows, None, &fx, &rd, &config(100_000, 321), &token).unwrap();
    let eur_run = quick_irc(
        &eur_rows,
        None,
        &fx,
        &rd,
        &IrcConfig {
            reference_currency: "USD".to_string(),
            ..config(100_000, 321)
        },
        &token,
    )
    .unwrap();

    assert_relative_eq!(eur_run.result.irc, usd_run.result.irc * 1.08, max_relative = 1e-9);
}
