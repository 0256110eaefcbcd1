//! Rating -> credit spread mapping

use crate::ratings::Rating;

/// Annualised credit spread in basis points, indexed by rating. `D` is
/// unused by spread lookups — defaulted positions price via LGD, not
/// spread change.
#[derive(Debug, Clone)]
pub struct SpreadCurve {
    bps: [f64; 8],
}

impl SpreadCurve {
    pub fn new(bps: [f64; 8]) -> Self {
        Self { bps }
    }

    pub fn spread_bps(&self, rating: Rating) -> f64 {
        self.bps[rating.index()]
    }

    /// Illustrative investment/speculative-grade curve, in basis points.
    pub fn standard() -> Self {
        Self::new([
            30.0,   // AAA
            50.0,   // AA
            80.0,   // A
            150.0,  // BBB
            350.0,  // BB
            600.0,  // B
            1200.0, // CCC
            0.0,    // D (unused)
        ])
    }
}
