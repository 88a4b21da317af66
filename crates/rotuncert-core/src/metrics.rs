//! Uncertainty metric catalog and scoring.
//!
//! Each metric maps a batch of concentration matrices (or, for the
//! reconstruction-error metric, a batch of auxiliary scalar losses) to one
//! scalar score per sample, and registers the comparison direction used when
//! masking. Metric identity is a tagged enum and the direction is looked up
//! from it, never re-specified at call sites, so a caller cannot pair a
//! metric with the wrong comparison.
//!
//! Scores from different metrics live on different scales and are never
//! compared to each other.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{Mat4, Real};
use crate::spectrum::eigenvalues_ascending;

/// Errors that can occur when resolving or applying an uncertainty metric.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricError {
    /// The requested metric identifier is not registered. There is no
    /// silent default.
    #[error("unknown uncertainty metric '{0}'")]
    UnknownMetric(String),
    /// The metric has no registered mask direction (diagnostic-only metric).
    #[error("metric '{0}' has no registered mask direction")]
    NotMaskable(UncertaintyMetric),
    /// The metric consumes a different input kind than was supplied.
    #[error("metric '{0}' scores {1} inputs, not concentration matrices")]
    WrongInput(UncertaintyMetric, MetricInput),
    /// A zero-length batch was passed to a scorer or reduction.
    #[error("empty score batch")]
    EmptyBatch,
}

/// Which side of the threshold a sample must fall on to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskDirection {
    /// Keep samples whose score strictly exceeds the threshold.
    Above,
    /// Keep samples whose score is strictly below the threshold.
    Below,
}

/// Input kind consumed by a metric's scoring function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricInput {
    /// Symmetric 4×4 concentration matrices.
    Concentration,
    /// Per-sample scalar reconstruction losses from an auxiliary model.
    ReconstructionLoss,
}

impl fmt::Display for MetricInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricInput::Concentration => write!(f, "concentration-matrix"),
            MetricInput::ReconstructionLoss => write!(f, "reconstruction-loss"),
        }
    }
}

/// Registered uncertainty metrics.
///
/// The variants are the catalog: [`display_name`](Self::display_name),
/// [`mask_direction`](Self::mask_direction) and
/// [`input_kind`](Self::input_kind) resolve everything callers need from
/// the tag alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyMetric {
    /// Gap between the two smallest eigenvalues; larger means the mode
    /// eigenvector is better separated from the rest of the spectrum.
    FirstEigGap,
    /// Sum of dispersion coefficients `Σᵢ (min(eig) − eigᵢ)`; more negative
    /// means tighter concentration around the mode.
    SumDispersion,
    /// Wigner-surmise log-likelihood of the eigenvalue spacings. Diagnostic
    /// only; has no mask direction.
    WignerLogLikelihood,
    /// Magnitude of an externally supplied per-sample reconstruction loss.
    ReconErrorNorm,
}

impl UncertaintyMetric {
    /// Human-readable metric name, e.g. for report rows and axis labels.
    pub fn display_name(&self) -> &'static str {
        match self {
            UncertaintyMetric::FirstEigGap => "First Eigenvalue Gap",
            UncertaintyMetric::SumDispersion => "Sum of Dispersion Coefficients",
            UncertaintyMetric::WignerLogLikelihood => "Wigner Log-Likelihood",
            UncertaintyMetric::ReconErrorNorm => "Reconstruction-Error Norm",
        }
    }

    /// Registered comparison direction, or `None` for diagnostic-only
    /// metrics that must not be used for masking.
    pub fn mask_direction(&self) -> Option<MaskDirection> {
        match self {
            UncertaintyMetric::FirstEigGap => Some(MaskDirection::Above),
            UncertaintyMetric::SumDispersion => Some(MaskDirection::Below),
            UncertaintyMetric::WignerLogLikelihood => None,
            UncertaintyMetric::ReconErrorNorm => Some(MaskDirection::Above),
        }
    }

    /// Input kind this metric scores.
    pub fn input_kind(&self) -> MetricInput {
        match self {
            UncertaintyMetric::ReconErrorNorm => MetricInput::ReconstructionLoss,
            _ => MetricInput::Concentration,
        }
    }

    /// Stable snake_case identifier, the inverse of [`FromStr`].
    pub fn id(&self) -> &'static str {
        match self {
            UncertaintyMetric::FirstEigGap => "first_eig_gap",
            UncertaintyMetric::SumDispersion => "sum_dispersion",
            UncertaintyMetric::WignerLogLikelihood => "wigner_log_likelihood",
            UncertaintyMetric::ReconErrorNorm => "recon_error_norm",
        }
    }
}

impl fmt::Display for UncertaintyMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for UncertaintyMetric {
    type Err = MetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first_eig_gap" => Ok(UncertaintyMetric::FirstEigGap),
            "sum_dispersion" => Ok(UncertaintyMetric::SumDispersion),
            "wigner_log_likelihood" => Ok(UncertaintyMetric::WignerLogLikelihood),
            "recon_error_norm" => Ok(UncertaintyMetric::ReconErrorNorm),
            other => Err(MetricError::UnknownMetric(other.to_string())),
        }
    }
}

/// First eigenvalue gap `eig[1] − eig[0]` for each sample.
pub fn first_eig_gap(mats: &[Mat4]) -> Result<Vec<Real>, MetricError> {
    if mats.is_empty() {
        return Err(MetricError::EmptyBatch);
    }
    Ok(mats
        .iter()
        .map(|a| {
            let e = eigenvalues_ascending(a);
            e[1] - e[0]
        })
        .collect())
}

/// Sum of Bingham dispersion coefficients `Σᵢ (min(eig) − eigᵢ)`.
///
/// Equivalent to `trace(−A + I·min(eig))`; zero when all eigenvalues are
/// equal, strictly negative otherwise.
pub fn sum_bingham_dispersion_coeff(mats: &[Mat4]) -> Result<Vec<Real>, MetricError> {
    if mats.is_empty() {
        return Err(MetricError::EmptyBatch);
    }
    Ok(mats
        .iter()
        .map(|a| {
            let e = eigenvalues_ascending(a);
            e.iter().map(|ev| e[0] - ev).sum()
        })
        .collect())
}

/// Wigner-surmise log-likelihood of the eigenvalue spacings, per sample.
///
/// For each consecutive spacing `s` the term is `log(s) − (π/4)·s²`, summed
/// over the three spacings. A non-positive spacing (two equal eigenvalues)
/// contributes zero: a degenerate spacing carries no repulsion information,
/// and the same rule applies to every such input.
pub fn wigner_log_likelihood(mats: &[Mat4]) -> Result<Vec<Real>, MetricError> {
    if mats.is_empty() {
        return Err(MetricError::EmptyBatch);
    }
    Ok(mats
        .iter()
        .map(|a| {
            let e = eigenvalues_ascending(a);
            e.windows(2)
                .map(|w| {
                    let s = w[1] - w[0];
                    if s > 0.0 {
                        s.ln() - 0.25 * std::f64::consts::PI * s * s
                    } else {
                        0.0
                    }
                })
                .sum()
        })
        .collect())
}

/// Magnitude of an externally supplied per-sample reconstruction loss.
///
/// The input is a batch of scalars, one per sample, so a batch of size one
/// is a single score and is never reduced like a matrix spectrum.
pub fn recon_error_norm(losses: &[Real]) -> Result<Vec<Real>, MetricError> {
    if losses.is_empty() {
        return Err(MetricError::EmptyBatch);
    }
    Ok(losses.iter().map(|l| l.abs()).collect())
}

/// Score a batch of concentration matrices with a cataloged metric.
///
/// Fails with [`MetricError::WrongInput`] for [`UncertaintyMetric::ReconErrorNorm`],
/// which scores reconstruction losses, not matrices (see [`recon_error_norm`]).
pub fn score_concentration(
    metric: UncertaintyMetric,
    mats: &[Mat4],
) -> Result<Vec<Real>, MetricError> {
    match metric {
        UncertaintyMetric::FirstEigGap => first_eig_gap(mats),
        UncertaintyMetric::SumDispersion => sum_bingham_dispersion_coeff(mats),
        UncertaintyMetric::WignerLogLikelihood => wigner_log_likelihood(mats),
        UncertaintyMetric::ReconErrorNorm => Err(MetricError::WrongInput(
            metric,
            MetricInput::ReconstructionLoss,
        )),
    }
}

/// Batch-mean reduction of a score vector.
pub fn mean_score(scores: &[Real]) -> Result<Real, MetricError> {
    if scores.is_empty() {
        return Err(MetricError::EmptyBatch);
    }
    Ok(scores.iter().sum::<Real>() / scores.len() as Real)
}
