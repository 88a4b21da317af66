//! High-level entry crate for the `rotuncert` workspace.
//!
//! A probabilistic rotation regressor predicts, per sample, a unit
//! quaternion and a symmetric 4×4 concentration matrix `A` parameterizing a
//! Bingham-type belief over rotations. This workspace evaluates such models
//! by turning the predicted matrices into calibrated accept/reject
//! decisions and measuring how the filter changes aggregate angular error.
//!
//! - [`core`] holds the numerics: eigen-spectra, the uncertainty metric
//!   catalog, quantile calibration, and mask filtering.
//! - [`pipeline`] holds the orchestration: collaborator traits for the
//!   external model and angular-error function, split collection, and the
//!   calibrate-then-filter-then-measure loop producing structured
//!   [`pipeline::ReportRow`] records.
//!
//! # Quickstart
//!
//! ```no_run
//! use rotuncert::pipeline::{collect_split, evaluate_filtered, EvalConfig};
//! # use rotuncert::core::Quat;
//! # fn demo(model: &impl rotuncert::pipeline::RotationEstimator<Input = u32>,
//! #         angular: &impl rotuncert::pipeline::AngularError,
//! #         train_inputs: &[u32], train_targets: &[Quat],
//! #         test_inputs: &[u32], test_targets: &[Quat]) -> anyhow::Result<()> {
//! let calibration = collect_split(model, train_inputs, train_targets, "training")?;
//! let test = collect_split(model, test_inputs, test_targets, "outdoor")?;
//!
//! let rows = evaluate_filtered(&calibration, &[test], &EvalConfig::default(), angular)?;
//! for row in &rows {
//!     println!(
//!         "q={:.2} {}: {:?} deg, kept {:.1}%",
//!         row.quantile,
//!         row.split_name,
//!         row.mean_error_filtered_deg,
//!         100.0 * row.retained_fraction,
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A runnable end-to-end demo on synthetic data lives in
//! `examples/synthetic_eval.rs`.

/// Core numerics: metrics, calibration, masking.
pub use rotuncert_core as core;
/// Evaluation orchestration and collaborator traits.
pub use rotuncert_pipeline as pipeline;

pub use rotuncert_core::{
    accept_mask, combine_masks, quantile_threshold, retained_fraction, score_concentration,
    MaskDirection, UncertaintyMetric,
};
pub use rotuncert_pipeline::{
    collect_split, evaluate_dual_filtered, evaluate_filtered, AngularError, DualFilterConfig,
    EvalConfig, ReportRow, RotationEstimator, SplitEvaluation,
};
