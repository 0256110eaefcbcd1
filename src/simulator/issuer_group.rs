//! Issuer grouping
//!
//! Positions sharing an `issuer` key are driven by one simulated latent
//! per sub-period; this module resolves the per-issuer inputs the
//! simulator needs once, up front, rather than recomputing them per path.

use crate::position::Position;
use crate::reference_data::ReferenceData;
use std::collections::HashMap;

/// Number of sub-periods the engine compounds within a one-year horizon,
/// bounded above because the regulatory floor on liquidity horizon is 3
/// months (`ceil(12/3) == 4`).
pub const MAX_SUB_PERIODS: usize = 4;

#[derive(Debug, Clone)]
pub struct IssuerGroup {
    pub issuer: String,
    /// Indices into the caller's `&[Position]` slice belonging to this issuer.
    pub position_indices: Vec<usize>,
    pub matrix_name: String,
    pub rho: f64,
    /// Minimum `liquidity_horizon_months` among this issuer's positions —
    /// the conservative (more rebalancing) choice when positions disagree.
    pub effective_horizon_months: u32,
    pub sub_periods: usize,
    /// True when every position for this issuer already starts at "D".
    /// Such a group draws no random numbers at all, so its presence in
    /// the portfolio never perturbs other issuers' draws (the
    /// default-state idempotence property).
    pub all_defaulted: bool,
}

impl IssuerGroup {
    fn sub_period_count(effective_horizon_months: u32) -> usize {
        let n = (12_f64 / effective_horizon_months as f64).ceil() as usize;
        n.clamp(1, MAX_SUB_PERIODS)
    }
}

/// Group positions by issuer and resolve each group's matrix name, ρ, and
/// effective liquidity horizon. Resolution uses the *first* position's
/// sector/region for matrix selection and ρ lookup; positions belonging to
/// one issuer are expected to share a sector/region in practice, and the
/// matrix/ρ choice is an issuer-level, not position-level, concept.
pub fn group_by_issuer(
    positions: &[Position],
    reference_data: &ReferenceData,
    sector_overrides: &HashMap<String, String>,
    region_overrides: &HashMap<String, String>,
) -> Vec<IssuerGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut indices: HashMap<String, Vec<usize>> = HashMap::new();

    for (i, p) in positions.iter().enumerate() {
        if !indices.contains_key(&p.issuer) {
            order.push(p.issuer.clone());
        }
        indices.entry(p.issuer.clone()).or_default().push(i);
    }

    order
        .into_iter()
        .map(|issuer| {
            let idxs = indices.remove(&issuer).unwrap_or_default();
            let first = &positions[idxs[0]];

            let matrix_name = reference_data.resolve_matrix_name(
                &first.sector,
                &first.region,
                sector_overrides,
                region_overrides,
            );

            let rho = idxs
                .iter()
                .filter_map(|&i| positions[i].systematic_factor)
                .next()
                .map(|r| reference_data.resolve_rho(Some(r), &first.sector))
                .unwrap_or_else(|| reference_data.resolve_rho(None, &first.sector));

            let effective_horizon_months = idxs
                .iter()
                .map(|&i| positions[i].liquidity_horizon_months)
                .min()
                .unwrap_or(3);

            let sub_periods = IssuerGroup::sub_period_count(effective_horizon_months);
            let all_defaulted = idxs.iter().all(|&i| positions[i].rating.is_default());

            IssuerGroup {
                issuer,
                position_indices: idxs,
                matrix_name,
                rho,
                effective_horizon_months,
                sub_periods,
                all_defaulted,
            }
        })
        .collect()
}
