//! Evaluation orchestration.
//!
//! [`collect_split`] gathers `(q_est, q_target, A)` triples for a dataset
//! split once; [`evaluate_filtered`] calibrates thresholds on one split and
//! reports filtered vs. unfiltered error on the others;
//! [`evaluate_dual_filtered`] composes the dispersion filter with an
//! independent reconstruction-error filter.

mod functions;
mod types;

pub use functions::{
    collect_recon_split, collect_split, evaluate_dual_filtered, evaluate_filtered,
    magnitude_summary,
};
pub use types::{DualFilterConfig, EvalConfig, ReconSplit, ReportRow, SplitEvaluation};
