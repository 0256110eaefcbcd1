//! Rating ladder, PD mapping, and rating normalisation
//!
//! `RATING_TO_PD` is the single source of truth; PD->rating anchoring is
//! fixed here rather than varying per call site.

use crate::error::{IrcError, IrcResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered coarse rating ladder. `D` (default) is absorbing in transition
/// matrices and terminal for revaluation purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    Aaa,
    Aa,
    A,
    Bbb,
    Bb,
    B,
    Ccc,
    D,
}

pub const RATING_LADDER: [Rating; 8] = [
    Rating::Aaa,
    Rating::Aa,
    Rating::A,
    Rating::Bbb,
    Rating::Bb,
    Rating::B,
    Rating::Ccc,
    Rating::D,
];

impl Rating {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Aaa => "AAA",
            Rating::Aa => "AA",
            Rating::A => "A",
            Rating::Bbb => "BBB",
            Rating::Bb => "BB",
            Rating::B => "B",
            Rating::Ccc => "CCC",
            Rating::D => "D",
        }
    }

    pub fn is_default(self) -> bool {
        matches!(self, Rating::D)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Anchored PD by coarse rating, on a log scale for nearest-rating lookup.
/// Fixed once at the reference-data layer (the original source varies
/// anchors per call site; this crate does not).
pub const RATING_TO_PD: [(Rating, f64); 7] = [
    (Rating::Aaa, 0.0001),
    (Rating::Aa, 0.0003),
    (Rating::A, 0.0008),
    (Rating::Bbb, 0.0020),
    (Rating::Bb, 0.0100),
    (Rating::B, 0.0400),
    (Rating::Ccc, 0.1500),
];

/// Strip sub-rung modifiers ("AA+", "BBB-", "A1") and map to the coarse
/// ladder. Unknown inputs fail with `InvalidInput`.
pub fn normalise(raw: &str) -> IrcResult<Rating> {
    let trimmed = raw.trim();
    let base: String = trimmed
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();

    match base.as_str() {
        "AAA" => Ok(Rating::Aaa),
        "AA" => Ok(Rating::Aa),
        "A" => Ok(Rating::A),
        "BBB" => Ok(Rating::Bbb),
        "BB" => Ok(Rating::Bb),
        "B" => Ok(Rating::B),
        "CCC" | "CC" | "C" => Ok(Rating::Ccc),
        "D" | "DEFAULT" => Ok(Rating::D),
        other => Err(IrcError::InvalidInput(format!(
            "unrecognised rating '{other}' (from '{raw}')"
        ))),
    }
}

/// Find the coarse rating whose PD is nearest `pd` on a log scale.
/// Used only when a record supplies PD but no rating.
pub fn rating_from_pd(pd: f64) -> Rating {
    let pd = pd.max(1e-12);
    let log_pd = pd.ln();

    RATING_TO_PD
        .iter()
        .min_by(|(_, a), (_, b)| {
            let da = (a.ln() - log_pd).abs();
            let db = (b.ln() - log_pd).abs();
            da.partial_cmp(&db).unwrap()
        })
        .map(|(r, _)| *r)
        .unwrap_or(Rating::Ccc)
}
