//! Canonical position records
//!
//! Immutable once prepared: the simulator never mutates a `Position`, all
//! per-path state is scratch memory held elsewhere.

use crate::ratings::Rating;
use crate::reference_data::Seniority;
use serde::{Deserialize, Serialize};

/// Floor applied to `tenor_years` so a position can never carry zero or
/// negative residual maturity into the duration approximation.
pub const MIN_TENOR_YEARS: f64 = 1e-4;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub position_id: String,
    pub issuer: String,
    /// Signed monetary amount in reference currency; sign carried
    /// separately by `is_long`, so this is stored positive.
    pub notional: f64,
    pub market_value: f64,
    pub rating: Rating,
    pub tenor_years: f64,
    pub coupon_rate: f64,
    pub seniority: Seniority,
    pub lgd: Option<f64>,
    pub sector: String,
    pub region: String,
    pub liquidity_horizon_months: u32,
    pub is_long: bool,
    /// Optional per-position override of the systematic factor ρ. When
    /// absent, resolution falls to the issuer's sector default, then to
    /// the engine-wide default.
    pub systematic_factor: Option<f64>,
}

impl Position {
    /// Effective LGD: explicit override if present, else the seniority's
    /// default.
    pub fn effective_lgd(&self) -> f64 {
        self.lgd.unwrap_or_else(|| self.seniority.default_lgd())
    }

    /// `tenor_years` floored at a small positive epsilon, per invariant.
    pub fn floored_tenor(&self) -> f64 {
        self.tenor_years.max(MIN_TENOR_YEARS)
    }

    /// Duration approximation `D = (1 - (1+c)^-T) / c`, reducing to `T` as
    /// `c -> 0`.
    pub fn duration(&self) -> f64 {
        let c = self.coupon_rate;
        let t = self.floored_tenor();
        if c.abs() < 1e-12 {
            t
        } else {
            (1.0 - (1.0 + c).powf(-t)) / c
        }
    }

    /// Check the position-level invariants from the data model. Returns a
    /// human-readable description of the first violation found, if any.
    pub fn validate(&self) -> Option<String> {
        if self.tenor_years <= 0.0 {
            return Some(format!(
                "position {}: tenor_years must be > 0, got {}",
                self.position_id, self.tenor_years
            ));
        }
        if let Some(lgd) = self.lgd {
            if !(0.0..=1.0).contains(&lgd) {
                return Some(format!(
                    "position {}: lgd must be in [0,1], got {}",
                    self.position_id, lgd
                ));
            }
        }
        if self.liquidity_horizon_months < 3 {
            return Some(format!(
                "position {}: liquidity_horizon_months must be >= 3, got {}",
                self.position_id, self.liquidity_horizon_months
            ));
        }
        if self.notional < 0.0 {
            return Some(format!(
                "position {}: notional must be non-negative, got {}",
                self.position_id, self.notional
            ));
        }
        None
    }
}
