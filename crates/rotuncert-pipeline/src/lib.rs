//! Calibrate-then-filter-then-measure orchestration.
//!
//! This crate drives the evaluation loop over one or more model variants and
//! dataset splits: collect `(q_est, q_target, A)` triples through the
//! [`collaborators`] traits, calibrate quantile thresholds on a reference
//! split with `rotuncert-core`, apply the resulting accept masks to held-out
//! splits, and report filtered vs. unfiltered angular error together with
//! the retention fraction as structured [`eval::ReportRow`] records.
//!
//! The orchestrator owns no model or I/O logic. It is stateless across model
//! variants; within a run, thresholds computed from the calibration split
//! are immutable and reused read-only across all test splits.
//!
//! ```ignore
//! use rotuncert_pipeline::{collect_split, evaluate_filtered, EvalConfig};
//!
//! let calibration = collect_split(&model, &train_inputs, &train_targets, "training")?;
//! let test = collect_split(&model, &test_inputs, &test_targets, "outdoor")?;
//!
//! let rows = evaluate_filtered(&calibration, &[test], &EvalConfig::default(), &angular)?;
//! for row in &rows {
//!     println!("{}", serde_json::to_string(row)?);
//! }
//! ```

/// Trait seams to the external model and angular-error collaborators.
pub mod collaborators;
/// Split collection, configs, report rows, and the evaluation loop.
pub mod eval;

pub use collaborators::{AngularError, ReconstructionModel, RotationEstimator};
pub use eval::{
    collect_recon_split, collect_split, evaluate_dual_filtered, evaluate_filtered,
    magnitude_summary, DualFilterConfig, EvalConfig, ReconSplit, ReportRow, SplitEvaluation,
};
