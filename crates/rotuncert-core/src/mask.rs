//! Accept-mask construction from scores and a calibrated threshold.
//!
//! The comparison direction comes from the metric catalog, never from the
//! caller. Both directions use strict inequality, so a score exactly at the
//! threshold is rejected either way.

use thiserror::Error;

use crate::math::Real;
use crate::metrics::{MaskDirection, MetricError, UncertaintyMetric};

/// Errors that can occur when building or combining accept masks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MaskError {
    /// The metric has no registered mask direction.
    #[error(transparent)]
    Metric(#[from] MetricError),
    /// Two batches that must be paired elementwise have different lengths.
    #[error("batch length mismatch: {left} vs {right}")]
    ShapeMismatch { left: usize, right: usize },
    /// Zero-length mask; a retention fraction over no samples is undefined.
    #[error("empty mask batch")]
    EmptyBatch,
}

/// Accept mask for a batch of test-population scores.
///
/// `true` means "confident enough to retain for error reporting". Uses the
/// metric's registered direction; diagnostic-only metrics fail with
/// [`MetricError::NotMaskable`].
pub fn accept_mask(
    metric: UncertaintyMetric,
    scores: &[Real],
    threshold: Real,
) -> Result<Vec<bool>, MaskError> {
    let direction = metric
        .mask_direction()
        .ok_or(MetricError::NotMaskable(metric))?;
    Ok(match direction {
        MaskDirection::Above => scores.iter().map(|s| *s > threshold).collect(),
        MaskDirection::Below => scores.iter().map(|s| *s < threshold).collect(),
    })
}

/// Logical AND of two independent accept masks.
///
/// Associative and commutative; retention of the result must be recomputed
/// with [`retained_fraction`], not reused from either operand.
pub fn combine_masks(a: &[bool], b: &[bool]) -> Result<Vec<bool>, MaskError> {
    if a.len() != b.len() {
        return Err(MaskError::ShapeMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).map(|(x, y)| *x && *y).collect())
}

/// Fraction of samples accepted by a mask, exactly `count(true)/N`.
pub fn retained_fraction(mask: &[bool]) -> Result<Real, MaskError> {
    if mask.is_empty() {
        return Err(MaskError::EmptyBatch);
    }
    let kept = mask.iter().filter(|m| **m).count();
    Ok(kept as Real / mask.len() as Real)
}
