//! Evaluation data containers, configs, and report rows.

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use rotuncert_core::{Mat4, Quat, Real, UncertaintyMetric};

/// Quaternion estimates, targets, and concentration matrices for one
/// dataset split, collected once per evaluation run and never mutated.
#[derive(Debug, Clone)]
pub struct SplitEvaluation {
    /// Split name used in report rows ("training", "outdoor", ...).
    pub name: String,
    /// Estimated quaternions, one per sample.
    pub q_est: Vec<Quat>,
    /// Ground-truth quaternions, paired with `q_est` by index.
    pub q_target: Vec<Quat>,
    /// Predicted concentration matrices, paired by index.
    pub concentration: Vec<Mat4>,
}

impl SplitEvaluation {
    /// Number of samples in the split.
    pub fn len(&self) -> usize {
        self.q_est.len()
    }

    /// Whether the split holds no samples.
    pub fn is_empty(&self) -> bool {
        self.q_est.is_empty()
    }

    /// Check the batch-pairing invariants: non-empty, and estimates,
    /// targets, and matrices all the same length.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.q_est.is_empty(), "split '{}' is empty", self.name);
        ensure!(
            self.q_target.len() == self.q_est.len(),
            "split '{}': {} targets for {} estimates",
            self.name,
            self.q_target.len(),
            self.q_est.len()
        );
        ensure!(
            self.concentration.len() == self.q_est.len(),
            "split '{}': {} concentration matrices for {} estimates",
            self.name,
            self.concentration.len(),
            self.q_est.len()
        );
        Ok(())
    }
}

/// Per-sample reconstruction losses for one split, from the auxiliary model.
#[derive(Debug, Clone)]
pub struct ReconSplit {
    /// Split name; must refer to the same samples as the paired
    /// [`SplitEvaluation`].
    pub name: String,
    /// Scalar reconstruction loss per sample, in split order.
    pub losses: Vec<Real>,
}

fn default_quantiles() -> Vec<Real> {
    vec![0.1, 0.25, 0.5, 0.75]
}

fn default_metric() -> UncertaintyMetric {
    UncertaintyMetric::SumDispersion
}

/// Configuration for the single-metric filtered evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Metric used for calibration and masking.
    #[serde(default = "default_metric")]
    pub metric: UncertaintyMetric,
    /// Quantile levels evaluated against the calibration split.
    #[serde(default = "default_quantiles")]
    pub quantiles: Vec<Real>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            metric: default_metric(),
            quantiles: default_quantiles(),
        }
    }
}

fn default_dispersion_quantile() -> Real {
    0.5
}

fn default_recon_quantile() -> Real {
    1.0
}

/// Configuration for the dual-filter evaluation (dispersion mask AND
/// reconstruction-error mask).
///
/// The defaults reproduce the observed source behavior, including the
/// reconstruction quantile of 1.0: the threshold then equals the maximum
/// calibration loss, and with the metric's `>` direction almost no test
/// sample can pass that filter alone. This looks inverted relative to the
/// stated intent (low reconstruction error should mean confident) and is
/// preserved as observed rather than corrected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DualFilterConfig {
    /// Quantile for the dispersion-coefficient threshold.
    #[serde(default = "default_dispersion_quantile")]
    pub dispersion_quantile: Real,
    /// Quantile for the reconstruction-error threshold.
    #[serde(default = "default_recon_quantile")]
    pub recon_quantile: Real,
}

impl Default for DualFilterConfig {
    fn default() -> Self {
        Self {
            dispersion_quantile: default_dispersion_quantile(),
            recon_quantile: default_recon_quantile(),
        }
    }
}

/// One structured result record: a (metric, quantile, test split) cell.
///
/// This crate does not format, print, or persist rows; that is the caller's
/// concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRow {
    /// Human-readable metric name from the catalog.
    pub metric_name: String,
    /// Calibration quantile level that produced the threshold.
    pub quantile: Real,
    /// Test split the row describes.
    pub split_name: String,
    /// Mean angular error over the full split, degrees.
    pub mean_error_unfiltered_deg: Real,
    /// Mean angular error over the accepted subset, degrees; `None` when
    /// the mask retained no samples.
    pub mean_error_filtered_deg: Option<Real>,
    /// Fraction of the split accepted by the mask.
    pub retained_fraction: Real,
}
