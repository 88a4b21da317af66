//! Core numerics for evaluating probabilistic rotation-estimation models.
//!
//! A probabilistic rotation regressor predicts, per sample, a symmetric 4×4
//! concentration matrix `A` parameterizing a Bingham-type belief over unit
//! quaternions (density ∝ `exp(-qᵀAq)`; the eigenvector of the smallest
//! eigenvalue is the mode). This crate turns those matrices into calibrated
//! accept/reject decisions:
//!
//! - [`spectrum`] — symmetric eigen-decomposition of concentration matrices,
//! - [`metrics`] — the catalog of scalar uncertainty metrics computed from
//!   eigen-spectra (or from auxiliary reconstruction losses),
//! - [`calibrate`] — empirical quantile thresholds from a calibration-set
//!   score distribution,
//! - [`mask`] — threshold comparison with the metric's registered direction,
//! - [`synthetic`] — deterministic generators for tests and examples.
//!
//! Everything here is a pure, batch-oriented transform: no I/O, no shared
//! state. Model inference and the geodesic angular-error function live in
//! `rotuncert-pipeline` behind collaborator traits.

/// Scalar/matrix type aliases and small quaternion helpers.
pub mod math;
/// Eigen-spectra of symmetric concentration matrices.
pub mod spectrum;
/// Uncertainty metric catalog and scoring functions.
pub mod metrics;
/// Quantile-based threshold calibration.
pub mod calibrate;
/// Accept-mask construction and composition.
pub mod mask;
/// Deterministic synthetic data helpers for tests and examples.
pub mod synthetic;

pub use calibrate::{quantile_threshold, CalibrationError};
pub use mask::{accept_mask, combine_masks, retained_fraction, MaskError};
pub use math::{rotation_magnitude_deg, Mat4, Quat, Real};
pub use metrics::{
    first_eig_gap, mean_score, recon_error_norm, score_concentration,
    sum_bingham_dispersion_coeff, wigner_log_likelihood, MaskDirection, MetricError,
    MetricInput, UncertaintyMetric,
};
pub use spectrum::{eigenvalues_ascending, spectra, EigenSpectrum};
