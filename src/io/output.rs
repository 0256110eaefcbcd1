//! Result output: a summary block followed by an optional per-issuer
//! attribution block, both CSV. Two distinct row shapes with no natural
//! shared struct, so each block gets its own typed `csv::Writer::serialize`
//! pass rather than forcing one row shape to fit both.

use crate::attribution::AttributionResult;
use crate::error::IrcResult;
use crate::tail::SimulationResult;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
struct SummaryRow {
    irc: f64,
    rwa: f64,
    percentile_95: f64,
    percentile_99: f64,
    percentile_999: f64,
    expected_shortfall_999: f64,
    mean_loss: f64,
    diversification_benefit: f64,
    num_simulations: usize,
}

/// Write the summary block (and, when present, the issuer attribution
/// block) to `path` as CSV.
pub fn write_report(
    path: impl AsRef<Path>,
    result: &SimulationResult,
    attribution: Option<&AttributionResult>,
) -> IrcResult<()> {
    let mut file = std::fs::File::create(path)?;

    {
        let mut writer = csv::Writer::from_writer(&mut file);
        writer.serialize(SummaryRow {
            irc: result.irc,
            rwa: result.rwa,
            percentile_95: result.percentile_95,
            percentile_99: result.percentile_99,
            percentile_999: result.percentile_999,
            expected_shortfall_999: result.expected_shortfall_999,
            mean_loss: result.mean_loss,
            diversification_benefit: attribution.map(|a| a.diversification_benefit).unwrap_or(0.0),
            num_simulations: result.num_simulations,
        })?;
        writer.flush()?;
    }

    if let Some(attribution) = attribution {
        writeln!(file)?;
        let mut writer = csv::Writer::from_writer(&mut file);
        for row in &attribution.issuers {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    Ok(())
}
