//! Position revaluation: turn a simulated rating outcome into a P&L.

use crate::position::Position;
use crate::ratings::Rating;
use crate::reference_data::SpreadCurve;

/// Revalue one position given its simulated new rating. Returns a signed
/// loss (positive = loss, consistent with the engine-wide convention);
/// `is_long` flips the sign so a short position gains where a long one
/// loses.
///
/// - New rating is default: `LGD * notional`.
/// - New rating differs from the starting rating: duration-weighted
///   spread change.
/// - No migration: zero.
pub fn position_loss(position: &Position, new_rating: Rating, spreads: &SpreadCurve) -> f64 {
    let sign = if position.is_long { 1.0 } else { -1.0 };

    if new_rating.is_default() {
        return sign * position.effective_lgd() * position.notional;
    }

    if new_rating == position.rating {
        return 0.0;
    }

    let duration = position.duration();
    let spread_change_bps = spreads.spread_bps(new_rating) - spreads.spread_bps(position.rating);
    sign * duration * position.notional * spread_change_bps / 10_000.0
}
