//! Flexible input ingestion: CSV rows into untyped records, FX tables from
//! either documented JSON shape.

use crate::error::{IrcError, IrcResult};
use crate::fx::FxRates;
use crate::prep::RawRow;
use std::collections::HashMap;
use std::path::Path;

/// Read a CSV file into a vector of header-keyed rows. Deliberately reads
/// into `HashMap<String, String>` rather than a fixed `Deserialize`
/// struct — tolerating unknown column layouts is the whole point of data
/// preparation, and a fixed struct would defeat it.
pub fn read_position_rows(path: impl AsRef<Path>) -> IrcResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = RawRow::new();
        for (header, value) in headers.iter().zip(record.iter()) {
            row.insert(header.to_string(), value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FxFormat {
    /// `{"EUR": 1.08, ...}` — foreign -> reference currency rates.
    ToReference,
    /// `{"EURUSD": 1.08, ...}` — market-convention pair rates.
    Market,
}

impl FxFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "to_reference" | "to-reference" => Some(FxFormat::ToReference),
            "market" => Some(FxFormat::Market),
            _ => None,
        }
    }
}

/// Guess the FX JSON format when the caller did not specify `--fx-format`:
/// market-convention pair keys are always 6 letters ("EURUSD"); a
/// to-reference table's keys are bare 3-letter currency codes.
fn sniff_format(raw: &HashMap<String, f64>) -> FxFormat {
    if !raw.is_empty() && raw.keys().all(|k| k.len() == 6) {
        FxFormat::Market
    } else {
        FxFormat::ToReference
    }
}

/// Load an FX rate table from JSON, in either documented shape.
pub fn read_fx_rates(
    path: impl AsRef<Path>,
    format: Option<FxFormat>,
    reference_ccy: &str,
) -> IrcResult<FxRates> {
    let text = std::fs::read_to_string(path)?;
    let raw: HashMap<String, f64> = serde_json::from_str(&text)
        .map_err(|e| IrcError::InvalidInput(format!("malformed FX rates JSON: {e}")))?;

    let format = format.unwrap_or_else(|| sniff_format(&raw));
    match format {
        FxFormat::ToReference => Ok(FxRates::from_to_reference(&raw, reference_ccy)),
        FxFormat::Market => {
            let mut fx = FxRates::new();
            fx.set_rates(&raw);
            Ok(fx)
        }
    }
}
