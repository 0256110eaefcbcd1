//! Row-stochastic rating transition matrices
//!
//! Stored as cumulative row probabilities for O(log K) binary-search
//! bucketing. `D` is an absorbing state: its row is `{0, ..., 0, 1}`.

use crate::error::{IrcError, IrcResult};
use crate::ratings::{Rating, RATING_LADDER};

const K: usize = RATING_LADDER.len();
const ROW_SUM_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct TransitionMatrix {
    name: String,
    /// `cumulative[from_rating_index]` is the cumulative distribution over
    /// destination ratings, so the new rating is the first index `k` with
    /// `u <= cumulative[from][k]`.
    cumulative: [[f64; K]; K],
}

impl TransitionMatrix {
    /// Validate and construct from raw (non-cumulative) rows. Refuses to
    /// load any matrix whose non-absorbing rows are not row-stochastic.
    pub fn try_new(name: impl Into<String>, rows: [[f64; K]; K]) -> IrcResult<Self> {
        let name = name.into();

        for (i, row) in rows.iter().enumerate() {
            if row.iter().any(|&p| p < 0.0) {
                return Err(IrcError::InvalidMatrix {
                    name,
                    reason: format!("row {i} has a negative entry"),
                });
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(IrcError::InvalidMatrix {
                    name,
                    reason: format!("row {i} sums to {sum}, not 1.0"),
                });
            }
        }

        let default_row = rows[Rating::D.index()];
        let expected_absorbing: [f64; K] = {
            let mut r = [0.0; K];
            r[Rating::D.index()] = 1.0;
            r
        };
        if default_row != expected_absorbing {
            return Err(IrcError::InvalidMatrix {
                name,
                reason: "the 'D' row must be absorbing ({0,...,0,1})".to_string(),
            });
        }

        let mut cumulative = [[0.0; K]; K];
        for (i, row) in rows.iter().enumerate() {
            let mut running = 0.0;
            for (k, &p) in row.iter().enumerate() {
                running += p;
                cumulative[i][k] = running;
            }
            // Clamp the final entry to exactly 1.0 to guard against float
            // drift pushing it just under 1.0, which would make the last
            // bucket unreachable by binary search.
            cumulative[i][K - 1] = 1.0;
        }

        Ok(Self { name, cumulative })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bucket `u in [0, 1]` into the new rating given the issuer's starting
    /// rating, using the cumulative row for `from`.
    pub fn bucket(&self, from: Rating, u: f64) -> Rating {
        let row = &self.cumulative[from.index()];
        let idx = match row.binary_search_by(|c| c.partial_cmp(&u).unwrap()) {
            Ok(i) => i,
            Err(i) => i,
        };
        let idx = idx.min(K - 1);
        RATING_LADDER[idx]
    }
}
