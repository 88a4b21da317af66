//! Trait seams to the external collaborators.
//!
//! The rotation regressor, the auxiliary reconstruction model, and the
//! geodesic angular-error function are deliberately outside this workspace;
//! the orchestrator consumes them only through these traits.

use anyhow::{ensure, Result};

use rotuncert_core::{Mat4, Quat, Real};

/// A model producing a unit-quaternion estimate and a symmetric
/// concentration matrix per input sample.
///
/// Quaternions are unit-norm 4-vectors; no scalar-component convention is
/// assumed beyond internal consistency with the [`AngularError`]
/// implementation used alongside.
pub trait RotationEstimator {
    /// One model input (image, point cloud, feature vector, ...).
    type Input;

    /// Quaternion estimates for a batch, one per input, in input order.
    fn estimate(&self, batch: &[Self::Input]) -> Result<Vec<Quat>>;

    /// Predicted symmetric 4×4 concentration matrices, one per input.
    fn concentration(&self, batch: &[Self::Input]) -> Result<Vec<Mat4>>;
}

/// An auxiliary model producing a per-sample scalar reconstruction loss,
/// used as an out-of-distribution signal independent of the rotation model.
pub trait ReconstructionModel {
    /// One model input.
    type Input;

    /// Reconstruction losses for a batch, one per input, in input order.
    fn reconstruction_loss(&self, batch: &[Self::Input]) -> Result<Vec<Real>>;
}

/// Geodesic angular distance between paired quaternion batches, in degrees.
///
/// Implementations must be invariant under `q ↦ -q` (the quaternion
/// double-cover). The consumed interface's `reduce` flag is rendered as two
/// methods; `mean_deg` has a default implementation over the per-sample
/// errors.
pub trait AngularError {
    /// Elementwise angular error in degrees, one value per sample pair.
    fn per_sample_deg(&self, q_est: &[Quat], q_target: &[Quat]) -> Result<Vec<Real>>;

    /// Mean angular error in degrees over the batch.
    fn mean_deg(&self, q_est: &[Quat], q_target: &[Quat]) -> Result<Real> {
        let errors = self.per_sample_deg(q_est, q_target)?;
        ensure!(!errors.is_empty(), "mean angular error over an empty batch");
        Ok(errors.iter().sum::<Real>() / errors.len() as Real)
    }
}
