//! Imperative evaluation functions.

use anyhow::{ensure, Context, Result};
use log::debug;

use rotuncert_core::{
    accept_mask, combine_masks, quantile_threshold, recon_error_norm, retained_fraction,
    rotation_magnitude_deg, score_concentration, Quat, Real, UncertaintyMetric,
};

use crate::collaborators::{AngularError, ReconstructionModel, RotationEstimator};

use super::types::{DualFilterConfig, EvalConfig, ReconSplit, ReportRow, SplitEvaluation};

/// Run the rotation model over a split once and bundle the results.
///
/// Inference happens here and nowhere else in the run; the returned
/// [`SplitEvaluation`] is cached by the caller and reused read-only.
pub fn collect_split<M: RotationEstimator>(
    model: &M,
    inputs: &[M::Input],
    targets: &[Quat],
    name: &str,
) -> Result<SplitEvaluation> {
    ensure!(
        targets.len() == inputs.len(),
        "split '{}': {} targets for {} inputs",
        name,
        targets.len(),
        inputs.len()
    );

    let q_est = model
        .estimate(inputs)
        .with_context(|| format!("quaternion inference failed on split '{name}'"))?;
    let concentration = model
        .concentration(inputs)
        .with_context(|| format!("concentration inference failed on split '{name}'"))?;

    let split = SplitEvaluation {
        name: name.to_string(),
        q_est,
        q_target: targets.to_vec(),
        concentration,
    };
    split.validate()?;
    debug!("collected split '{}' ({} samples)", name, split.len());
    Ok(split)
}

/// Run the auxiliary reconstruction model over a split once.
pub fn collect_recon_split<R: ReconstructionModel>(
    model: &R,
    inputs: &[R::Input],
    name: &str,
) -> Result<ReconSplit> {
    let losses = model
        .reconstruction_loss(inputs)
        .with_context(|| format!("reconstruction inference failed on split '{name}'"))?;
    ensure!(
        losses.len() == inputs.len(),
        "split '{}': {} losses for {} inputs",
        name,
        losses.len(),
        inputs.len()
    );
    Ok(ReconSplit {
        name: name.to_string(),
        losses,
    })
}

fn filtered_mean(
    angular: &impl AngularError,
    q_est: &[Quat],
    q_target: &[Quat],
    mask: &[bool],
) -> Result<Option<Real>> {
    let est: Vec<Quat> = q_est
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(q, _)| *q)
        .collect();
    if est.is_empty() {
        return Ok(None);
    }
    let target: Vec<Quat> = q_target
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(q, _)| *q)
        .collect();
    Ok(Some(angular.mean_deg(&est, &target)?))
}

/// Calibrate thresholds on one split and report filtered vs. unfiltered
/// angular error on each test split.
///
/// Thresholds are computed once from the calibration split's score
/// distribution, one per quantile level, and reused read-only across all
/// test splits. Returns one [`ReportRow`] per (test split × quantile), in
/// that nesting order.
pub fn evaluate_filtered(
    calibration: &SplitEvaluation,
    tests: &[SplitEvaluation],
    config: &EvalConfig,
    angular: &impl AngularError,
) -> Result<Vec<ReportRow>> {
    calibration.validate()?;

    let calib_scores = score_concentration(config.metric, &calibration.concentration)
        .with_context(|| format!("scoring calibration split '{}'", calibration.name))?;

    let mut thresholds = Vec::with_capacity(config.quantiles.len());
    for &q in &config.quantiles {
        let thresh = quantile_threshold(&calib_scores, q)
            .with_context(|| format!("calibrating quantile {q} on '{}'", calibration.name))?;
        debug!(
            "{}: quantile {q} -> threshold {thresh:.6}",
            config.metric.display_name()
        );
        thresholds.push((q, thresh));
    }

    let mut rows = Vec::with_capacity(tests.len() * thresholds.len());
    for split in tests {
        split.validate()?;
        let scores = score_concentration(config.metric, &split.concentration)
            .with_context(|| format!("scoring test split '{}'", split.name))?;
        let unfiltered = angular.mean_deg(&split.q_est, &split.q_target)?;

        for &(quantile, thresh) in &thresholds {
            let mask = accept_mask(config.metric, &scores, thresh)
                .with_context(|| format!("masking split '{}'", split.name))?;
            let retained = retained_fraction(&mask)?;
            let filtered = filtered_mean(angular, &split.q_est, &split.q_target, &mask)?;
            debug!(
                "split '{}' quantile {quantile}: kept {:.1}%",
                split.name,
                100.0 * retained
            );
            rows.push(ReportRow {
                metric_name: config.metric.display_name().to_string(),
                quantile,
                split_name: split.name.clone(),
                mean_error_unfiltered_deg: unfiltered,
                mean_error_filtered_deg: filtered,
                retained_fraction: retained,
            });
        }
    }
    Ok(rows)
}

/// Dual-filter evaluation: dispersion-coefficient mask AND an independent
/// reconstruction-error mask from the auxiliary model.
///
/// The combined mask is the logical AND of the two accept masks, and the
/// retention fraction is recomputed on that combination. The row's
/// `quantile` field carries the dispersion quantile; the reconstruction
/// quantile is fixed by the config for the whole run.
pub fn evaluate_dual_filtered(
    calibration: &SplitEvaluation,
    recon_calibration: &ReconSplit,
    tests: &[(SplitEvaluation, ReconSplit)],
    config: &DualFilterConfig,
    angular: &impl AngularError,
) -> Result<Vec<ReportRow>> {
    calibration.validate()?;

    let disp_calib =
        score_concentration(UncertaintyMetric::SumDispersion, &calibration.concentration)
            .with_context(|| format!("scoring calibration split '{}'", calibration.name))?;
    let disp_thresh = quantile_threshold(&disp_calib, config.dispersion_quantile)
        .context("calibrating dispersion threshold")?;

    let recon_calib = recon_error_norm(&recon_calibration.losses)
        .with_context(|| format!("scoring reconstruction split '{}'", recon_calibration.name))?;
    let recon_thresh = quantile_threshold(&recon_calib, config.recon_quantile)
        .context("calibrating reconstruction threshold")?;

    let mut rows = Vec::with_capacity(tests.len());
    for (split, recon) in tests {
        split.validate()?;
        ensure!(
            recon.losses.len() == split.len(),
            "split '{}': {} reconstruction losses for {} samples",
            split.name,
            recon.losses.len(),
            split.len()
        );

        let disp_scores =
            score_concentration(UncertaintyMetric::SumDispersion, &split.concentration)?;
        let disp_mask = accept_mask(UncertaintyMetric::SumDispersion, &disp_scores, disp_thresh)?;

        let recon_scores = recon_error_norm(&recon.losses)?;
        let recon_mask =
            accept_mask(UncertaintyMetric::ReconErrorNorm, &recon_scores, recon_thresh)?;

        let mask = combine_masks(&disp_mask, &recon_mask)?;
        let retained = retained_fraction(&mask)?;
        let unfiltered = angular.mean_deg(&split.q_est, &split.q_target)?;
        let filtered = filtered_mean(angular, &split.q_est, &split.q_target, &mask)?;
        debug!(
            "split '{}' dual filter: kept {:.1}%",
            split.name,
            100.0 * retained
        );

        rows.push(ReportRow {
            metric_name: format!(
                "{} + {}",
                UncertaintyMetric::SumDispersion.display_name(),
                UncertaintyMetric::ReconErrorNorm.display_name()
            ),
            quantile: config.dispersion_quantile,
            split_name: split.name.clone(),
            mean_error_unfiltered_deg: unfiltered,
            mean_error_filtered_deg: filtered,
            retained_fraction: retained,
        });
    }
    Ok(rows)
}

/// Min, median, and max axis-angle magnitude of a quaternion batch, in
/// degrees. A quick dataset diagnostic, not an error measure.
pub fn magnitude_summary(quats: &[Quat]) -> Result<(Real, Real, Real)> {
    ensure!(!quats.is_empty(), "magnitude summary over an empty batch");
    let magnitudes: Vec<Real> = quats.iter().map(rotation_magnitude_deg).collect();
    let min = magnitudes.iter().copied().fold(Real::INFINITY, Real::min);
    let max = magnitudes
        .iter()
        .copied()
        .fold(Real::NEG_INFINITY, Real::max);
    let median = quantile_threshold(&magnitudes, 0.5)?;
    Ok((min, median, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotuncert_core::{synthetic, Mat4};

    /// Model that looks estimates up by sample index.
    struct LookupModel {
        estimates: Vec<Quat>,
        matrices: Vec<Mat4>,
    }

    impl RotationEstimator for LookupModel {
        type Input = usize;

        fn estimate(&self, batch: &[usize]) -> Result<Vec<Quat>> {
            Ok(batch.iter().map(|i| self.estimates[*i]).collect())
        }

        fn concentration(&self, batch: &[usize]) -> Result<Vec<Mat4>> {
            Ok(batch.iter().map(|i| self.matrices[*i]).collect())
        }
    }

    struct LookupRecon {
        losses: Vec<Real>,
    }

    impl ReconstructionModel for LookupRecon {
        type Input = usize;

        fn reconstruction_loss(&self, batch: &[usize]) -> Result<Vec<Real>> {
            Ok(batch.iter().map(|i| self.losses[*i]).collect())
        }
    }

    /// Double-cover-safe geodesic error for tests.
    struct DotAngular;

    impl AngularError for DotAngular {
        fn per_sample_deg(&self, q_est: &[Quat], q_target: &[Quat]) -> Result<Vec<Real>> {
            ensure!(q_est.len() == q_target.len(), "length mismatch");
            Ok(q_est
                .iter()
                .zip(q_target)
                .map(|(a, b)| {
                    let d = a.dot(b).abs().min(1.0);
                    (2.0 * d.acos()).to_degrees()
                })
                .collect())
        }
    }

    fn tilted_quat(angle_rad: Real) -> Quat {
        let half = angle_rad / 2.0;
        Quat::new(half.sin(), 0.0, 0.0, half.cos())
    }

    /// Confident samples (wide gap) get small errors, unconfident ones get
    /// large errors; filtering at a mid quantile must drop the bad half and
    /// lower the mean error.
    #[test]
    fn filtering_by_gap_drops_high_error_half() {
        let mut rng = synthetic::SeededLcg::new(404);
        let identity = Quat::new(0.0, 0.0, 0.0, 1.0);

        let n = 40;
        let mut estimates = Vec::new();
        let mut matrices = Vec::new();
        let mut targets = Vec::new();
        for i in 0..n {
            targets.push(identity);
            if i % 2 == 0 {
                // Confident and accurate.
                estimates.push(tilted_quat(0.01));
                matrices.push(synthetic::concentration_with_spectrum(
                    &mut rng,
                    [-6.0, -1.0, 0.0, 1.0],
                ));
            } else {
                // Unconfident and wrong.
                estimates.push(tilted_quat(0.5));
                matrices.push(synthetic::concentration_with_spectrum(
                    &mut rng,
                    [-6.0, -5.9, 0.0, 1.0],
                ));
            }
        }

        let model = LookupModel {
            estimates,
            matrices,
        };
        let inputs: Vec<usize> = (0..n).collect();
        let calibration = collect_split(&model, &inputs, &targets, "training").unwrap();
        let test = collect_split(&model, &inputs, &targets, "validation").unwrap();

        let config = EvalConfig {
            metric: UncertaintyMetric::FirstEigGap,
            quantiles: vec![0.5],
        };
        let rows = evaluate_filtered(&calibration, &[test], &config, &DotAngular).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.split_name, "validation");
        assert_eq!(row.metric_name, "First Eigenvalue Gap");
        assert!((row.retained_fraction - 0.5).abs() < 1e-12);
        let filtered = row.mean_error_filtered_deg.unwrap();
        assert!(
            filtered < row.mean_error_unfiltered_deg,
            "filtered {filtered} vs unfiltered {}",
            row.mean_error_unfiltered_deg
        );
        // Only the accurate half survives.
        assert!(filtered < 1.0);
    }

    #[test]
    fn rows_cover_every_split_quantile_cell() {
        let mut rng = synthetic::SeededLcg::new(7);
        let n = 20;
        let identity = Quat::new(0.0, 0.0, 0.0, 1.0);
        let model = LookupModel {
            estimates: vec![identity; n],
            matrices: synthetic::random_concentration_batch(&mut rng, n, 3.0),
        };
        let inputs: Vec<usize> = (0..n).collect();
        let targets = vec![identity; n];

        let calibration = collect_split(&model, &inputs, &targets, "training").unwrap();
        let t1 = collect_split(&model, &inputs, &targets, "indoor").unwrap();
        let t2 = collect_split(&model, &inputs, &targets, "outdoor").unwrap();

        let rows =
            evaluate_filtered(&calibration, &[t1, t2], &EvalConfig::default(), &DotAngular)
                .unwrap();
        assert_eq!(rows.len(), 8);
        assert!(rows[..4].iter().all(|r| r.split_name == "indoor"));
        assert!(rows[4..].iter().all(|r| r.split_name == "outdoor"));
        for chunk in rows.chunks(4) {
            let qs: Vec<Real> = chunk.iter().map(|r| r.quantile).collect();
            assert_eq!(qs, vec![0.1, 0.25, 0.5, 0.75]);
        }
    }

    /// The observed reconstruction filter at quantile 1.0 on identical
    /// calibration and test losses keeps nothing: the threshold equals the
    /// maximum and the direction is strictly greater-than.
    #[test]
    fn dual_filter_with_max_recon_quantile_keeps_nothing() {
        let mut rng = synthetic::SeededLcg::new(99);
        let n = 10;
        let identity = Quat::new(0.0, 0.0, 0.0, 1.0);
        let model = LookupModel {
            estimates: vec![identity; n],
            matrices: synthetic::random_concentration_batch(&mut rng, n, 3.0),
        };
        let recon = LookupRecon {
            losses: (0..n).map(|i| 0.1 * i as Real).collect(),
        };
        let inputs: Vec<usize> = (0..n).collect();
        let targets = vec![identity; n];

        let calibration = collect_split(&model, &inputs, &targets, "training").unwrap();
        let recon_calib = collect_recon_split(&recon, &inputs, "training").unwrap();
        let test = collect_split(&model, &inputs, &targets, "validation").unwrap();
        let recon_test = collect_recon_split(&recon, &inputs, "validation").unwrap();

        let rows = evaluate_dual_filtered(
            &calibration,
            &recon_calib,
            &[(test, recon_test)],
            &DualFilterConfig::default(),
            &DotAngular,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].retained_fraction, 0.0);
        assert!(rows[0].mean_error_filtered_deg.is_none());
    }

    #[test]
    fn dual_filter_retention_is_bounded_by_each_filter() {
        let mut rng = synthetic::SeededLcg::new(55);
        let n = 60;
        let identity = Quat::new(0.0, 0.0, 0.0, 1.0);
        let matrices = synthetic::random_concentration_batch(&mut rng, n, 3.0);
        let model = LookupModel {
            estimates: vec![identity; n],
            matrices: matrices.clone(),
        };
        let recon = LookupRecon {
            losses: (0..n).map(|_| rng.uniform(0.0, 1.0)).collect(),
        };
        let inputs: Vec<usize> = (0..n).collect();
        let targets = vec![identity; n];

        let calibration = collect_split(&model, &inputs, &targets, "training").unwrap();
        let recon_calib = collect_recon_split(&recon, &inputs, "training").unwrap();

        // Fresh test population so neither filter is degenerate.
        let test_model = LookupModel {
            estimates: vec![identity; n],
            matrices: synthetic::random_concentration_batch(&mut rng, n, 3.0),
        };
        let test_recon = LookupRecon {
            losses: (0..n).map(|_| rng.uniform(0.0, 1.5)).collect(),
        };
        let test = collect_split(&test_model, &inputs, &targets, "validation").unwrap();
        let recon_test = collect_recon_split(&test_recon, &inputs, "validation").unwrap();

        let config = DualFilterConfig {
            dispersion_quantile: 0.5,
            recon_quantile: 0.5,
        };
        let rows = evaluate_dual_filtered(
            &calibration,
            &recon_calib,
            &[(test.clone(), recon_test.clone())],
            &config,
            &DotAngular,
        )
        .unwrap();

        // Recompute the individual retentions for comparison.
        let disp_scores =
            score_concentration(UncertaintyMetric::SumDispersion, &test.concentration).unwrap();
        let disp_calib =
            score_concentration(UncertaintyMetric::SumDispersion, &calibration.concentration)
                .unwrap();
        let disp_thresh = quantile_threshold(&disp_calib, 0.5).unwrap();
        let disp_mask =
            accept_mask(UncertaintyMetric::SumDispersion, &disp_scores, disp_thresh).unwrap();

        let recon_scores = recon_error_norm(&recon_test.losses).unwrap();
        let recon_thresh =
            quantile_threshold(&recon_error_norm(&recon_calib.losses).unwrap(), 0.5).unwrap();
        let recon_mask =
            accept_mask(UncertaintyMetric::ReconErrorNorm, &recon_scores, recon_thresh).unwrap();

        let r = rows[0].retained_fraction;
        assert!(r <= retained_fraction(&disp_mask).unwrap());
        assert!(r <= retained_fraction(&recon_mask).unwrap());
    }

    #[test]
    fn magnitude_summary_orders_min_median_max() {
        let quats: Vec<Quat> = [0.0, 0.5, 1.0, 2.0]
            .iter()
            .map(|a| tilted_quat(*a))
            .collect();
        let (min, median, max) = magnitude_summary(&quats).unwrap();
        assert!(min <= median && median <= max);
        assert!(min.abs() < 1e-9);
        assert!((max - 2.0_f64.to_degrees()).abs() < 1e-9);
    }

    #[test]
    fn collect_split_rejects_mismatched_targets() {
        let model = LookupModel {
            estimates: vec![Quat::new(0.0, 0.0, 0.0, 1.0); 2],
            matrices: vec![Mat4::identity(); 2],
        };
        let err = collect_split(&model, &[0, 1], &[Quat::new(0.0, 0.0, 0.0, 1.0)], "bad");
        assert!(err.is_err());
    }
}
