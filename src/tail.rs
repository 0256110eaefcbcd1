//! Tail statistics over a vector of path losses.
//!
//! Nearest-rank quantiles via a full sort. For the path counts this
//! engine targets (hundreds of thousands), a full `sort_unstable_by` is
//! fast enough that an introselect-style partial sort is not worth the
//! complexity it would add — a documented possible optimisation, not
//! implemented.

use serde::{Deserialize, Serialize};

/// RWA multiplier applied to IRC to express it as an 8%-capital-ratio
/// risk-weighted-asset contribution.
pub const RWA_MULTIPLIER: f64 = 12.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub irc: f64,
    pub percentile_999: f64,
    pub percentile_99: f64,
    pub percentile_95: f64,
    pub mean_loss: f64,
    pub expected_shortfall_999: f64,
    pub rwa: f64,
    pub num_simulations: usize,
}

/// Nearest-rank empirical quantile: the `ceil(q * n)`-th order statistic
/// (1-indexed), clamped into range. `losses` need not be pre-sorted.
pub fn percentile(losses: &[f64], q: f64) -> f64 {
    assert!(!losses.is_empty(), "percentile of an empty loss vector");
    let mut sorted = losses.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
    percentile_of_sorted(&sorted, q)
}

fn percentile_of_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    let rank = ((q * n as f64).ceil() as usize).clamp(1, n);
    sorted[rank - 1]
}

/// Expected shortfall at quantile `q`: mean of all losses at or above the
/// `q`-quantile order statistic.
pub fn expected_shortfall(losses: &[f64], q: f64) -> f64 {
    assert!(!losses.is_empty(), "expected shortfall of an empty loss vector");
    let mut sorted = losses.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
    let threshold = percentile_of_sorted(&sorted, q);
    let tail: Vec<f64> = sorted.iter().copied().filter(|&l| l >= threshold).collect();
    tail.iter().sum::<f64>() / tail.len() as f64
}

pub fn mean(losses: &[f64]) -> f64 {
    assert!(!losses.is_empty(), "mean of an empty loss vector");
    losses.iter().sum::<f64>() / losses.len() as f64
}

/// Compute the full tail-statistics bundle from a path-loss vector.
pub fn summarize(losses: &[f64]) -> SimulationResult {
    let mut sorted = losses.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());

    let percentile_999 = percentile_of_sorted(&sorted, 0.999);
    let percentile_99 = percentile_of_sorted(&sorted, 0.99);
    let percentile_95 = percentile_of_sorted(&sorted, 0.95);
    let mean_loss = mean(&sorted);

    let tail: Vec<f64> = sorted.iter().copied().filter(|&l| l >= percentile_999).collect();
    let expected_shortfall_999 = tail.iter().sum::<f64>() / tail.len() as f64;

    SimulationResult {
        irc: percentile_999,
        percentile_999,
        percentile_99,
        percentile_95,
        mean_loss,
        expected_shortfall_999,
        rwa: percentile_999 * RWA_MULTIPLIER,
        num_simulations: losses.len(),
    }
}
