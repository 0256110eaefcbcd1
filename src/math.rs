//! Pure numeric utilities: standard normal CDF and its inverse.
//!
//! No shared state, no globals — callers pass seeds and draws explicitly.
//! Backed by `statrs`'s erf-based `Normal` distribution rather than a
//! hand-rolled polynomial approximation.

use statrs::distribution::{ContinuousCDF, Normal};

fn standard_normal() -> Normal {
    Normal::new(0.0, 1.0).expect("N(0,1) parameters are always valid")
}

/// Φ(z): standard normal CDF.
pub fn norm_cdf(z: f64) -> f64 {
    standard_normal().cdf(z)
}

/// Φ⁻¹(p): standard normal inverse CDF (quantile function).
///
/// `p` must lie in (0, 1); callers at the edges of numerical precision
/// should clamp before calling.
pub fn norm_inv_cdf(p: f64) -> f64 {
    standard_normal().inverse_cdf(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cdf_of_zero_is_half() {
        assert_relative_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn inverse_is_cdf_inverse() {
        for p in [0.01, 0.1, 0.5, 0.9, 0.999] {
            let z = norm_inv_cdf(p);
            assert_relative_eq!(norm_cdf(z), p, epsilon = 1e-9);
        }
    }

    #[test]
    fn known_quantiles() {
        assert_relative_eq!(norm_inv_cdf(0.975), 1.959963984540054, epsilon = 1e-6);
        assert_relative_eq!(norm_cdf(1.959963984540054), 0.975, epsilon = 1e-9);
    }
}
