//! Per-issuer IRC attribution: standalone and marginal contributions.

use crate::error::IrcResult;
use crate::position::Position;
use crate::reference_data::ReferenceData;
use crate::simulator::engine::{simulate, CancellationToken, SimulationInputs};
use crate::simulator::issuer_group::group_by_issuer;
use crate::tail::percentile;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssuerAttribution {
    pub issuer: String,
    pub standalone_irc: f64,
    pub marginal_irc: f64,
    pub pct_of_total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionResult {
    pub issuers: Vec<IssuerAttribution>,
    /// `sum(standalone_irc) - irc_portfolio`, always >= 0.
    pub diversification_benefit: f64,
}

/// Run the 99.9th-percentile IRC for a sub-portfolio with its own fresh
/// issuer grouping. Shared by both the standalone and marginal passes.
fn irc_of(
    positions: &[Position],
    reference_data: &ReferenceData,
    sector_overrides: &HashMap<String, String>,
    region_overrides: &HashMap<String, String>,
    num_simulations: usize,
    master_seed: u64,
    cancellation: &CancellationToken,
) -> IrcResult<f64> {
    if positions.is_empty() {
        return Ok(0.0);
    }
    let groups = group_by_issuer(positions, reference_data, sector_overrides, region_overrides);
    let inputs = SimulationInputs {
        positions,
        issuer_groups: &groups,
        reference_data,
    };
    let losses = simulate(&inputs, num_simulations, master_seed, cancellation)?;
    Ok(percentile(&losses, 0.999))
}

/// Compute standalone and marginal IRC per issuer, plus the portfolio's
/// diversification benefit. `num_simulations` may be smaller than the
/// main run's path count (the orchestrator's documented down-sampling
/// allowance for the attribution pass); the caller logs when it differs.
#[allow(clippy::too_many_arguments)]
pub fn attribute(
    positions: &[Position],
    reference_data: &ReferenceData,
    sector_overrides: &HashMap<String, String>,
    region_overrides: &HashMap<String, String>,
    portfolio_irc: f64,
    num_simulations: usize,
    master_seed: u64,
    cancellation: &CancellationToken,
) -> IrcResult<AttributionResult> {
    let mut issuers: Vec<String> = Vec::new();
    for p in positions {
        if !issuers.contains(&p.issuer) {
            issuers.push(p.issuer.clone());
        }
    }

    info!("running issuer attribution for {} issuers", issuers.len());

    let mut rows = Vec::with_capacity(issuers.len());
    let mut standalone_sum = 0.0;

    for (offset, issuer) in issuers.iter().enumerate() {
        let standalone_positions: Vec<Position> =
            positions.iter().filter(|p| &p.issuer == issuer).cloned().collect();
        let without_issuer: Vec<Position> =
            positions.iter().filter(|p| &p.issuer != issuer).cloned().collect();

        // Distinct sub-seeds per issuer so standalone/marginal runs are
        // reproducible but not accidentally correlated with each other.
        let standalone_seed = master_seed.wrapping_add(1 + offset as u64 * 2);
        let marginal_seed = master_seed.wrapping_add(2 + offset as u64 * 2);

        let standalone_irc = irc_of(
            &standalone_positions,
            reference_data,
            sector_overrides,
            region_overrides,
            num_simulations,
            standalone_seed,
            cancellation,
        )?;
        let irc_without = irc_of(
            &without_issuer,
            reference_data,
            sector_overrides,
            region_overrides,
            num_simulations,
            marginal_seed,
            cancellation,
        )?;

        standalone_sum += standalone_irc;

        rows.push(IssuerAttribution {
            issuer: issuer.clone(),
            standalone_irc,
            marginal_irc: portfolio_irc - irc_without,
            pct_of_total: if portfolio_irc.abs() > 1e-12 {
                (portfolio_irc - irc_without) / portfolio_irc
            } else {
                0.0
            },
        });
    }

    Ok(AttributionResult {
        issuers: rows,
        diversification_benefit: (standalone_sum - portfolio_irc).max(0.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratings::Rating;
    use crate::reference_data::Seniority;

    fn pos(id: &str, issuer: &str, rating: Rating, notional: f64) -> Position {
        Position {
            position_id: id.to_string(),
            issuer: issuer.to_string(),
            notional,
            market_value: notional,
            rating,
            tenor_years: 3.0,
            coupon_rate: 0.05,
            seniority: Seniority::SeniorUnsecured,
            lgd: None,
            sector: "corporate".to_string(),
            region: "US".to_string(),
            liquidity_horizon_months: 12,
            is_long: true,
            systematic_factor: None,
        }
    }

    #[test]
    fn standalone_sum_dominates_portfolio_irc() {
        let rd = ReferenceData::standard().unwrap();
        let positions = vec![
            pos("p1", "ACME", Rating::Bb, 5_000_000.0),
            pos("p2", "GLOBEX", Rating::Bb, 5_000_000.0),
        ];
        let token = CancellationToken::new();
        let portfolio_irc = irc_of(
            &positions,
            &rd,
            &HashMap::new(),
            &HashMap::new(),
            20_000,
            1,
            &token,
        )
        .unwrap();

        let result = attribute(
            &positions,
            &rd,
            &HashMap::new(),
            &HashMap::new(),
            portfolio_irc,
            20_000,
            1,
            &token,
        )
        .unwrap();

        let standalone_sum: f64 = result.issuers.iter().map(|r| r.standalone_irc).sum();
        assert!(standalone_sum + 1e-6 >= portfolio_irc);
        assert!(result.diversification_benefit >= 0.0);
        assert_eq!(result.issuers.len(), 2);
    }
}
