//! Case-insensitive column alias table
//!
//! Maps flexible source column names ("Issuer Name", "Obligor", ...) to
//! the canonical field keys `Position` preparation expects.

use std::collections::HashMap;

/// Canonical field keys used throughout data preparation.
pub const ISSUER: &str = "issuer";
pub const POSITION_ID: &str = "position_id";
pub const NOTIONAL: &str = "notional";
pub const MARKET_VALUE: &str = "market_value";
pub const CURRENCY: &str = "currency";
pub const RATING: &str = "rating";
pub const PD: &str = "pd";
pub const MATURITY_DATE: &str = "maturity_date";
pub const TENOR_YEARS: &str = "tenor_years";
pub const SENIORITY: &str = "seniority";
pub const SECTOR: &str = "sector";
pub const REGION: &str = "region";
pub const LIQUIDITY_HORIZON_MONTHS: &str = "liquidity_horizon_months";
pub const COUPON_RATE: &str = "coupon_rate";
pub const LGD: &str = "lgd";
pub const IS_LONG: &str = "is_long";
pub const SYSTEMATIC_FACTOR: &str = "systematic_factor";

/// Build the alias -> canonical lookup table. Keys are matched
/// case-insensitively after trimming, so callers should normalise their
/// own header text the same way before lookup.
pub fn alias_table() -> HashMap<&'static str, &'static str> {
    let pairs: &[(&str, &str)] = &[
        ("issuer", ISSUER),
        ("obligor", ISSUER),
        ("company", ISSUER),
        ("issuer name", ISSUER),
        ("counterparty", ISSUER),
        ("position_id", POSITION_ID),
        ("position id", POSITION_ID),
        ("id", POSITION_ID),
        ("trade_id", POSITION_ID),
        ("notional", NOTIONAL),
        ("notional amount", NOTIONAL),
        ("exposure", NOTIONAL),
        ("principal", NOTIONAL),
        ("market_value", MARKET_VALUE),
        ("market value", MARKET_VALUE),
        ("mv", MARKET_VALUE),
        ("currency", CURRENCY),
        ("ccy", CURRENCY),
        ("rating", RATING),
        ("credit rating", RATING),
        ("external rating", RATING),
        ("pd", PD),
        ("prob default", PD),
        ("probability of default", PD),
        ("maturity_date", MATURITY_DATE),
        ("maturity date", MATURITY_DATE),
        ("maturity", MATURITY_DATE),
        ("tenor_years", TENOR_YEARS),
        ("tenor", TENOR_YEARS),
        ("term", TENOR_YEARS),
        ("seniority", SENIORITY),
        ("sector", SECTOR),
        ("industry", SECTOR),
        ("region", REGION),
        ("country", REGION),
        ("liquidity_horizon_months", LIQUIDITY_HORIZON_MONTHS),
        ("liquidity horizon", LIQUIDITY_HORIZON_MONTHS),
        ("liquidity horizon months", LIQUIDITY_HORIZON_MONTHS),
        ("coupon_rate", COUPON_RATE),
        ("coupon", COUPON_RATE),
        ("lgd", LGD),
        ("loss given default", LGD),
        ("is_long", IS_LONG),
        ("direction", IS_LONG),
        ("long_short", IS_LONG),
        ("systematic_factor", SYSTEMATIC_FACTOR),
        ("rho", SYSTEMATIC_FACTOR),
    ];

    pairs.iter().copied().collect()
}

/// Resolve a raw header to its canonical key, if recognised.
pub fn canonical_key(table: &HashMap<&'static str, &'static str>, raw_header: &str) -> Option<&'static str> {
    table.get(raw_header.trim().to_ascii_lowercase().as_str()).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_are_case_insensitive() {
        let table = alias_table();
        assert_eq!(canonical_key(&table, "Issuer Name"), Some(ISSUER));
        assert_eq!(canonical_key(&table, "CREDIT RATING"), Some(RATING));
        assert_eq!(canonical_key(&table, "  Notional Amount  "), Some(NOTIONAL));
    }

    #[test]
    fn canonical_keys_map_to_themselves() {
        // Required for prepare()'s idempotence: a prepared record's own
        // field names must resolve through the same alias table.
        let table = alias_table();
        for key in [ISSUER, NOTIONAL, RATING, TENOR_YEARS, SENIORITY, SECTOR, REGION] {
            assert_eq!(canonical_key(&table, key), Some(key));
        }
    }

    #[test]
    fn unknown_header_is_none() {
        let table = alias_table();
        assert_eq!(canonical_key(&table, "not_a_real_column"), None);
    }
}
