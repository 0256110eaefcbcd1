//! Normalise raw, heterogeneous portfolio records into canonical
//! `Position` records.
//!
//! This is the single site in the engine that tolerates ambiguous or
//! missing input — everywhere else operates on a strict `Position` value
//! type. Idempotent: `prepare(prepare(x)) == prepare(x)`, because a
//! prepared position's own field names are themselves valid aliases that
//! map to themselves, and no field already present is re-derived.

use crate::error::{IrcError, IrcResult};
use crate::fx::FxRates;
use crate::position::Position;
use crate::prep::aliases::{self, alias_table};
use crate::prep::diagnostics::RowDiagnostic;
use crate::ratings::{self, Rating};
use crate::reference_data::Seniority;
use chrono::NaiveDate;
use std::collections::HashMap;

const DEFAULT_COUPON_RATE: f64 = 0.05;
const DEFAULT_LIQUIDITY_HORIZON_MONTHS: u32 = 3;
const DAYS_PER_YEAR: f64 = 365.25;

/// Raw input row keyed by whatever header text the source table used.
pub type RawRow = HashMap<String, String>;

/// Result of running preparation over a whole table: the positions that
/// could be built, and diagnostics for every row that could not.
#[derive(Debug, Clone, Default)]
pub struct PrepOutcome {
    pub positions: Vec<Position>,
    pub diagnostics: Vec<RowDiagnostic>,
}

/// Normalise a column-keyed raw row into canonical-key -> value.
fn canonicalise_row(raw: &RawRow) -> HashMap<&'static str, String> {
    let table = alias_table();
    let mut out = HashMap::new();
    for (header, value) in raw {
        if let Some(key) = aliases::canonical_key(&table, header) {
            out.insert(key, value.clone());
        }
    }
    out
}

fn parse_f64(row: &HashMap<&'static str, String>, key: &str) -> Option<f64> {
    row.get(key).and_then(|v| v.trim().parse::<f64>().ok())
}

fn parse_bool(row: &HashMap<&'static str, String>, key: &str) -> Option<bool> {
    row.get(key).and_then(|v| match v.trim().to_ascii_lowercase().as_str() {
        "true" | "long" | "1" | "yes" => Some(true),
        "false" | "short" | "0" | "no" => Some(false),
        _ => None,
    })
}

fn parse_date(v: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(v.trim(), "%Y-%m-%d").ok()
}

/// Build one `Position` from a canonicalised row, or a human-readable
/// reason it could not be repaired.
fn build_position(
    row_index: usize,
    row: &HashMap<&'static str, String>,
    as_of_date: Option<NaiveDate>,
    reference_ccy: &str,
    fx: &FxRates,
) -> Result<Position, String> {
    let issuer = row
        .get(aliases::ISSUER)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "missing issuer".to_string())?;

    let position_id = row
        .get(aliases::POSITION_ID)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| format!("row_{row_index}"));

    // Rating: direct if present, else derived from PD, else unrepairable.
    let rating: Rating = if let Some(raw_rating) = row.get(aliases::RATING) {
        ratings::normalise(raw_rating).map_err(|e| e.to_string())?
    } else if let Some(pd) = parse_f64(row, aliases::PD) {
        ratings::rating_from_pd(pd)
    } else {
        return Err("missing rating or pd".to_string());
    };

    // Tenor: direct if present, else derived from maturity_date - as_of_date.
    let tenor_years = if let Some(t) = parse_f64(row, aliases::TENOR_YEARS) {
        t
    } else {
        let maturity = row
            .get(aliases::MATURITY_DATE)
            .and_then(|v| parse_date(v))
            .ok_or_else(|| "missing tenor_years or parseable maturity_date".to_string())?;
        let as_of = as_of_date.ok_or_else(|| {
            "maturity_date given but no as_of_date supplied to derive tenor".to_string()
        })?;
        let days = (maturity - as_of).num_days() as f64;
        days / DAYS_PER_YEAR
    };

    let raw_notional =
        parse_f64(row, aliases::NOTIONAL).ok_or_else(|| "missing or unparseable notional".to_string())?;
    if raw_notional < 0.0 {
        return Err(format!("notional must be non-negative, got {raw_notional}"));
    }

    let currency = row.get(aliases::CURRENCY).map(|s| s.trim().to_string());
    let notional = match &currency {
        Some(ccy) if !ccy.is_empty() => fx
            .convert(raw_notional, ccy, reference_ccy)
            .map_err(|e| e.to_string())?,
        _ => raw_notional,
    };

    let market_value = match parse_f64(row, aliases::MARKET_VALUE) {
        Some(raw_mv) => match &currency {
            Some(ccy) if !ccy.is_empty() => {
                fx.convert(raw_mv, ccy, reference_ccy).map_err(|e| e.to_string())?
            }
            _ => raw_mv,
        },
        None => notional,
    };

    let seniority = row
        .get(aliases::SENIORITY)
        .and_then(|s| Seniority::parse(s))
        .unwrap_or_default();

    let lgd = parse_f64(row, aliases::LGD);
    if let Some(l) = lgd {
        if !(0.0..=1.0).contains(&l) {
            return Err(format!("lgd must be in [0,1], got {l}"));
        }
    }

    let sector = row
        .get(aliases::SECTOR)
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "corporate".to_string());

    let region = row
        .get(aliases::REGION)
        .map(|s| s.trim().to_ascii_uppercase())
        .unwrap_or_default();

    let liquidity_horizon_months = row
        .get(aliases::LIQUIDITY_HORIZON_MONTHS)
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(DEFAULT_LIQUIDITY_HORIZON_MONTHS)
        .max(DEFAULT_LIQUIDITY_HORIZON_MONTHS);

    let coupon_rate = parse_f64(row, aliases::COUPON_RATE).unwrap_or(DEFAULT_COUPON_RATE);
    let is_long = parse_bool(row, aliases::IS_LONG).unwrap_or(true);
    let systematic_factor = parse_f64(row, aliases::SYSTEMATIC_FACTOR);

    let position = Position {
        position_id,
        issuer,
        notional,
        market_value,
        rating,
        tenor_years,
        coupon_rate,
        seniority,
        lgd,
        sector,
        region,
        liquidity_horizon_months,
        is_long,
        systematic_factor,
    };

    if let Some(reason) = position.validate() {
        return Err(reason);
    }

    Ok(position)
}

/// Prepare every row, collecting both the positions that parsed cleanly
/// and diagnostics for every row that did not. Never fails outright — the
/// caller (typically the orchestrator) decides what to do with a non-empty
/// diagnostics table.
pub fn prepare_all(
    rows: &[RawRow],
    as_of_date: Option<NaiveDate>,
    reference_ccy: &str,
    fx: &FxRates,
) -> PrepOutcome {
    let mut positions = Vec::with_capacity(rows.len());
    let mut diagnostics = Vec::new();

    for (i, raw) in rows.iter().enumerate() {
        let canonical = canonicalise_row(raw);
        let identifier = canonical.get(aliases::ISSUER).cloned();

        match build_position(i, &canonical, as_of_date, reference_ccy, fx) {
            Ok(p) => positions.push(p),
            Err(reason) => diagnostics.push(RowDiagnostic::new(i, identifier, reason)),
        }
    }

    PrepOutcome {
        positions,
        diagnostics,
    }
}

/// Strict entry point matching §7's error taxonomy: any row-level
/// diagnostic becomes a single aggregated `IrcError::InvalidRows` failure.
pub fn prepare(
    rows: &[RawRow],
    as_of_date: Option<NaiveDate>,
    reference_ccy: &str,
    fx: &FxRates,
) -> IrcResult<Vec<Position>> {
    let outcome = prepare_all(rows, as_of_date, reference_ccy, fx);
    if outcome.diagnostics.is_empty() {
        Ok(outcome.positions)
    } else {
        Err(IrcError::InvalidRows {
            count: outcome.diagnostics.len(),
            diagnostics: outcome.diagnostics,
        })
    }
}
