//! Named transition matrix registry and issuer-level reference data
//! resolution (matrix selection, systematic-factor defaults).

use crate::error::IrcResult;
use crate::ratings::Rating;
use crate::reference_data::spread_curve::SpreadCurve;
use crate::reference_data::transition_matrix::TransitionMatrix;
use std::collections::HashMap;

const K: usize = 8;

/// Default engine-wide systematic factor, used when neither a position nor
/// its sector supplies one.
pub const GLOBAL_DEFAULT_RHO: f64 = 0.20;

/// Reference data bundle: matrix registry, the shared spread curve, and
/// per-sector systematic-factor defaults. Loaded once at startup, shared
/// read-only, never mutated.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    matrices: HashMap<String, TransitionMatrix>,
    spreads: SpreadCurve,
    sector_rho: HashMap<String, f64>,
}

impl ReferenceData {
    /// Build the standard named registry: global, europe, emerging_markets,
    /// financials, sovereign. Each is validated on construction; a matrix
    /// that fails validation aborts startup (`IrcError::InvalidMatrix`).
    pub fn standard() -> IrcResult<Self> {
        let mut matrices = HashMap::new();
        matrices.insert("global".to_string(), global_matrix()?);
        matrices.insert("europe".to_string(), europe_matrix()?);
        matrices.insert("emerging_markets".to_string(), emerging_markets_matrix()?);
        matrices.insert("financials".to_string(), financials_matrix()?);
        matrices.insert("sovereign".to_string(), sovereign_matrix()?);

        let mut sector_rho = HashMap::new();
        sector_rho.insert("corporate".to_string(), 0.20);
        sector_rho.insert("financials".to_string(), 0.30);
        sector_rho.insert("financial".to_string(), 0.30);
        sector_rho.insert("sovereign".to_string(), 0.25);
        sector_rho.insert("government".to_string(), 0.25);

        Ok(Self {
            matrices,
            spreads: SpreadCurve::standard(),
            sector_rho,
        })
    }

    pub fn matrix(&self, name: &str) -> Option<&TransitionMatrix> {
        self.matrices.get(name)
    }

    pub fn spreads(&self) -> &SpreadCurve {
        &self.spreads
    }

    /// Resolve the matrix name for an issuer: sector-override beats
    /// region-override beats the "global" default.
    pub fn resolve_matrix_name(
        &self,
        sector: &str,
        region: &str,
        sector_overrides: &HashMap<String, String>,
        region_overrides: &HashMap<String, String>,
    ) -> String {
        if let Some(name) = sector_overrides.get(&sector.to_ascii_lowercase()) {
            if self.matrices.contains_key(name) {
                return name.clone();
            }
        }
        if let Some(name) = region_overrides.get(&region.to_ascii_lowercase()) {
            if self.matrices.contains_key(name) {
                return name.clone();
            }
        }
        "global".to_string()
    }

    /// Resolve ρ for an issuer: per-position override beats sector default
    /// beats the global default.
    pub fn resolve_rho(&self, position_override: Option<f64>, sector: &str) -> f64 {
        if let Some(rho) = position_override {
            return rho;
        }
        self.sector_rho
            .get(&sector.to_ascii_lowercase())
            .copied()
            .unwrap_or(GLOBAL_DEFAULT_RHO)
    }
}

fn idx(r: Rating) -> usize {
    r.index()
}

/// Build a row with self-transition `stay`, one-notch-down migration
/// `down`, one-notch-up migration `up`, and any leftover probability
/// placed on default. Ratings below `Rating::Ccc` have no "down" target
/// besides default; `Rating::Aaa` has no "up" target.
fn row(stay: f64, down: f64, up: f64, from: Rating, pd: f64) -> [f64; K] {
    let mut r = [0.0; K];
    let i = idx(from);
    r[i] = stay;
    if i > 0 {
        r[i - 1] += up;
    }
    if i < idx(Rating::Ccc) {
        r[i + 1] += down;
    } else if i == idx(Rating::Ccc) {
        // CCC's only non-stay, non-default destination is B (one notch up).
        r[i - 1] += down;
    }
    r[idx(Rating::D)] += pd;

    let placed: f64 = r.iter().sum();
    let slack = 1.0 - placed;
    // Absorb any residual into the stay bucket to guarantee row-stochastic
    // output regardless of the caller's inputs.
    r[i] += slack;
    r
}

fn default_row() -> [f64; K] {
    let mut r = [0.0; K];
    r[idx(Rating::D)] = 1.0;
    r
}

/// Illustrative global corporate transition matrix (annual, one-year
/// horizon), broadly consistent with published rating-agency averages.
/// This crate does not estimate matrices from data; they are supplied.
fn global_matrix() -> IrcResult<TransitionMatrix> {
    let rows = [
        row(0.92, 0.07, 0.0, Rating::Aaa, 0.0001),
        row(0.90, 0.06, 0.03, Rating::Aa, 0.0003),
        row(0.91, 0.05, 0.03, Rating::A, 0.0008),
        row(0.89, 0.05, 0.04, Rating::Bbb, 0.0020),
        row(0.84, 0.06, 0.06, Rating::Bb, 0.0100),
        row(0.78, 0.06, 0.10, Rating::B, 0.0400),
        row(0.55, 0.30, 0.0, Rating::Ccc, 0.1500),
        default_row(),
    ];
    TransitionMatrix::try_new("global", rows)
}

fn europe_matrix() -> IrcResult<TransitionMatrix> {
    let rows = [
        row(0.93, 0.065, 0.0, Rating::Aaa, 0.0001),
        row(0.91, 0.055, 0.03, Rating::Aa, 0.0002),
        row(0.92, 0.045, 0.03, Rating::A, 0.0006),
        row(0.90, 0.045, 0.04, Rating::Bbb, 0.0015),
        row(0.85, 0.055, 0.06, Rating::Bb, 0.0080),
        row(0.79, 0.055, 0.10, Rating::B, 0.0350),
        row(0.58, 0.28, 0.0, Rating::Ccc, 0.1300),
        default_row(),
    ];
    TransitionMatrix::try_new("europe", rows)
}

fn emerging_markets_matrix() -> IrcResult<TransitionMatrix> {
    let rows = [
        row(0.88, 0.10, 0.0, Rating::Aaa, 0.0005),
        row(0.85, 0.08, 0.05, Rating::Aa, 0.0010),
        row(0.85, 0.08, 0.05, Rating::A, 0.0025),
        row(0.82, 0.08, 0.06, Rating::Bbb, 0.0060),
        row(0.76, 0.08, 0.09, Rating::Bb, 0.0250),
        row(0.68, 0.09, 0.13, Rating::B, 0.0700),
        row(0.45, 0.35, 0.0, Rating::Ccc, 0.2200),
        default_row(),
    ];
    TransitionMatrix::try_new("emerging_markets", rows)
}

fn financials_matrix() -> IrcResult<TransitionMatrix> {
    let rows = [
        row(0.90, 0.095, 0.0, Rating::Aaa, 0.0002),
        row(0.88, 0.08, 0.035, Rating::Aa, 0.0005),
        row(0.89, 0.065, 0.04, Rating::A, 0.0012),
        row(0.86, 0.065, 0.05, Rating::Bbb, 0.0035),
        row(0.80, 0.075, 0.08, Rating::Bb, 0.0170),
        row(0.72, 0.075, 0.13, Rating::B, 0.0600),
        row(0.50, 0.33, 0.0, Rating::Ccc, 0.1700),
        default_row(),
    ];
    TransitionMatrix::try_new("financials", rows)
}

fn sovereign_matrix() -> IrcResult<TransitionMatrix> {
    let rows = [
        row(0.95, 0.0495, 0.0, Rating::Aaa, 0.0001),
        row(0.93, 0.045, 0.02, Rating::Aa, 0.0002),
        row(0.93, 0.04, 0.025, Rating::A, 0.0004),
        row(0.91, 0.04, 0.04, Rating::Bbb, 0.0010),
        row(0.87, 0.045, 0.05, Rating::Bb, 0.0045),
        row(0.81, 0.05, 0.09, Rating::B, 0.0170),
        row(0.60, 0.32, 0.0, Rating::Ccc, 0.0800),
        default_row(),
    ];
    TransitionMatrix::try_new("sovereign", rows)
}
