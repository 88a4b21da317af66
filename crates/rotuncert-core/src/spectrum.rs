//! Symmetric eigen-decomposition of batches of concentration matrices.
//!
//! Every uncertainty metric in [`crate::metrics`] consumes eigenvalues in
//! ascending order, so the sort here is part of the contract, not a
//! convenience: `nalgebra`'s symmetric solver does not guarantee any
//! eigenvalue ordering.

use crate::math::{Mat4, Real};

/// The four real eigenvalues of a concentration matrix, ascending.
pub type EigenSpectrum = [Real; 4];

/// Eigenvalues of a symmetric 4×4 matrix, sorted ascending.
///
/// Uses the symmetric (self-adjoint) solver, which is numerically stable and
/// always yields real eigenvalues. Symmetry of the input is a precondition
/// of the upstream model and is not validated here; an asymmetric input
/// produces undefined results.
pub fn eigenvalues_ascending(a: &Mat4) -> EigenSpectrum {
    let eig = a.symmetric_eigen();
    let mut vals = [
        eig.eigenvalues[0],
        eig.eigenvalues[1],
        eig.eigenvalues[2],
        eig.eigenvalues[3],
    ];
    vals.sort_by(Real::total_cmp);
    vals
}

/// Eigen-spectra for a batch of concentration matrices, one per sample.
///
/// Per-sample decompositions are independent; output order matches input
/// order.
pub fn spectra(mats: &[Mat4]) -> Vec<EigenSpectrum> {
    mats.iter().map(eigenvalues_ascending).collect()
}
