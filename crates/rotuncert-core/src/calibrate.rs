//! Quantile threshold calibration.
//!
//! A threshold is the empirical quantile of a calibration-set score
//! distribution. The interpolation method is pinned to linear interpolation
//! between order statistics (NumPy's default `np.quantile` convention):
//! sort ascending and interpolate at rank `p·(N−1)`. This function is
//! metric-agnostic; the metric's comparison direction is applied later, in
//! [`crate::mask`].

use thiserror::Error;

use crate::math::Real;

/// Errors that can occur during threshold calibration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CalibrationError {
    /// Quantile level outside `[0, 1]` (or NaN).
    #[error("quantile must lie in [0, 1], got {0}")]
    InvalidQuantile(Real),
    /// Zero-length calibration set; a quantile over no samples is undefined.
    #[error("cannot compute a quantile of an empty calibration set")]
    EmptyBatch,
}

/// Empirical quantile of a calibration-set score distribution.
///
/// Linear interpolation between order statistics at rank `p·(N−1)`.
/// `p = 0` returns the minimum, `p = 1` the maximum, and a single-element
/// set returns its one score for any `p`.
pub fn quantile_threshold(scores: &[Real], p: Real) -> Result<Real, CalibrationError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(CalibrationError::InvalidQuantile(p));
    }
    if scores.is_empty() {
        return Err(CalibrationError::EmptyBatch);
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(Real::total_cmp);

    let rank = p * (sorted.len() - 1) as Real;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Ok(sorted[lo]);
    }
    let frac = rank - lo as Real;
    Ok(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}
