//! FX conversion with market-convention inversion and triangulation
//!
//! Rates are stored in market convention: `BASE/QUOTE` meaning 1 BASE =
//! `rate` QUOTE. `convert` tries, in order: identity, direct pair,
//! triangulation through USD, triangulation through EUR.

use crate::error::{IrcError, IrcResult};
use std::collections::HashMap;

/// Pairs where the convention puts a currency other than the alphabetically
/// first one as base (e.g. EUR is base against USD, not the reverse).
fn market_base(pair: &str) -> (&str, &str) {
    const CONVENTION: &[(&str, &str, &str)] = &[
        ("EURUSD", "EUR", "USD"),
        ("EURGBP", "EUR", "GBP"),
        ("EURJPY", "EUR", "JPY"),
        ("EURCHF", "EUR", "CHF"),
        ("EURCAD", "EUR", "CAD"),
        ("EURAUD", "EUR", "AUD"),
        ("EURNZD", "EUR", "NZD"),
        ("EURCNY", "EUR", "CNY"),
        ("EURHKD", "EUR", "HKD"),
        ("EURSGD", "EUR", "SGD"),
        ("EURKRW", "EUR", "KRW"),
        ("EURINR", "EUR", "INR"),
        ("EURBRL", "EUR", "BRL"),
        ("EURMXN", "EUR", "MXN"),
        ("EURZAR", "EUR", "ZAR"),
        ("GBPUSD", "GBP", "USD"),
        ("GBPJPY", "GBP", "JPY"),
        ("GBPCHF", "GBP", "CHF"),
        ("AUDUSD", "AUD", "USD"),
        ("NZDUSD", "NZD", "USD"),
        ("USDJPY", "USD", "JPY"),
        ("USDCHF", "USD", "CHF"),
        ("USDCAD", "USD", "CAD"),
        ("USDCNY", "USD", "CNY"),
        ("USDHKD", "USD", "HKD"),
        ("USDSGD", "USD", "SGD"),
        ("USDKRW", "USD", "KRW"),
        ("USDINR", "USD", "INR"),
        ("USDBRL", "USD", "BRL"),
        ("USDMXN", "USD", "MXN"),
        ("USDZAR", "USD", "ZAR"),
    ];

    for (p, base, quote) in CONVENTION {
        if *p == pair {
            return (base, quote);
        }
    }
    // Default: first 3 chars are base, last 3 are quote.
    (&pair[0..3], &pair[3..6])
}

/// FX rate store keyed by 6-letter pair codes in market convention.
#[derive(Debug, Clone, Default)]
pub struct FxRates {
    rates: HashMap<String, f64>,
}

impl FxRates {
    pub fn new() -> Self {
        Self::default()
    }

    fn normalise_pair(pair: &str) -> String {
        pair.replace(['/', '-'], "").to_ascii_uppercase()
    }

    /// Set a single spot rate, e.g. `set_spot("EURUSD", 1.08)`.
    pub fn set_spot(&mut self, pair: &str, rate: f64) {
        self.rates.insert(Self::normalise_pair(pair), rate);
    }

    /// Bulk-load market-convention pairs, e.g. `{"EURUSD": 1.08, "USDJPY": 150.0}`.
    pub fn set_rates(&mut self, rates: &HashMap<String, f64>) {
        for (pair, rate) in rates {
            self.set_spot(pair, *rate);
        }
    }

    /// Build from the "foreign -> reference" convention: each key is a
    /// foreign currency, each value is "1 foreign = value reference".
    pub fn from_to_reference(rates: &HashMap<String, f64>, reference_ccy: &str) -> Self {
        let mut fx = Self::new();
        for (ccy, rate) in rates {
            let pair = format!("{}{}", ccy.to_ascii_uppercase(), reference_ccy.to_ascii_uppercase());
            fx.rates.insert(pair, *rate);
        }
        fx
    }

    fn get_rate(&self, from_ccy: &str, to_ccy: &str) -> Option<f64> {
        let pair1 = format!("{from_ccy}{to_ccy}");
        let pair2 = format!("{to_ccy}{from_ccy}");

        if let Some(&rate) = self.rates.get(&pair1) {
            let (base, _) = market_base(&pair1);
            return Some(if base == from_ccy { rate } else { 1.0 / rate });
        }
        if let Some(&rate) = self.rates.get(&pair2) {
            let (base, _) = market_base(&pair2);
            return Some(if base == from_ccy { rate } else { 1.0 / rate });
        }
        None
    }

    /// Convert `amount` from `from_ccy` to `to_ccy`, trying identity, the
    /// direct pair, USD triangulation, then EUR triangulation in that order.
    pub fn convert(&self, amount: f64, from_ccy: &str, to_ccy: &str) -> IrcResult<f64> {
        let from_ccy = from_ccy.to_ascii_uppercase();
        let to_ccy = to_ccy.to_ascii_uppercase();

        if from_ccy == to_ccy {
            return Ok(amount);
        }

        if let Some(rate) = self.get_rate(&from_ccy, &to_ccy) {
            return Ok(amount * rate);
        }

        if from_ccy != "USD" && to_ccy != "USD" {
            if let (Some(r1), Some(r2)) = (
                self.get_rate(&from_ccy, "USD"),
                self.get_rate("USD", &to_ccy),
            ) {
                return Ok(amount * r1 * r2);
            }
        }

        if from_ccy != "EUR" && to_ccy != "EUR" {
            if let (Some(r1), Some(r2)) = (
                self.get_rate(&from_ccy, "EUR"),
                self.get_rate("EUR", &to_ccy),
            ) {
                return Ok(amount * r1 * r2);
            }
        }

        Err(IrcError::MissingRate {
            from: from_ccy,
            to: to_ccy,
        })
    }
}
