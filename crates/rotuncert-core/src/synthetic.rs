//! Deterministic synthetic data for tests and examples.
//!
//! Small building blocks for constructing synthetic evaluation problems:
//! seeded pseudo-random numbers, random unit quaternions, and concentration
//! matrices with a prescribed eigen-spectrum. Everything is deterministic
//! (explicit seeds, stable ordering) and dependency-free.

use nalgebra::Vector4;

use crate::math::{Mat4, Quat, Real};

/// Minimal splitmix-style generator with an explicit seed.
///
/// Not cryptographic and not meant to be; it only needs to produce stable,
/// well-spread values across runs and platforms.
#[derive(Debug, Clone)]
pub struct SeededLcg {
    state: u64,
}

impl SeededLcg {
    /// Create a generator from an explicit seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(0x9e37_79b9_7f4a_7c15),
        }
    }

    /// Next raw 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform sample in `[0, 1)`.
    pub fn next_f64(&mut self) -> Real {
        (self.next_u64() >> 11) as Real / (1u64 << 53) as Real
    }

    /// Uniform sample in `[lo, hi)`.
    pub fn uniform(&mut self, lo: Real, hi: Real) -> Real {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Random unit quaternion (uniform direction on S³ up to the generator's
/// quality, which is plenty for tests).
pub fn random_unit_quat(rng: &mut SeededLcg) -> Quat {
    loop {
        let q = Quat::new(
            rng.uniform(-1.0, 1.0),
            rng.uniform(-1.0, 1.0),
            rng.uniform(-1.0, 1.0),
            rng.uniform(-1.0, 1.0),
        );
        let norm = q.norm();
        if norm > 1e-3 {
            return q / norm;
        }
    }
}

/// Random 4×4 orthogonal matrix via QR of a random matrix.
fn random_orthogonal(rng: &mut SeededLcg) -> Mat4 {
    let m = Mat4::from_fn(|_, _| rng.uniform(-1.0, 1.0));
    m.qr().q()
}

/// Symmetric concentration matrix with the given ascending eigen-spectrum.
///
/// Builds `R·D·Rᵀ` for a random orthogonal `R`, so the returned matrix is
/// symmetric with exactly the requested eigenvalues.
pub fn concentration_with_spectrum(rng: &mut SeededLcg, eigs: [Real; 4]) -> Mat4 {
    let r = random_orthogonal(rng);
    let d = Mat4::from_diagonal(&Vector4::new(eigs[0], eigs[1], eigs[2], eigs[3]));
    let a = r * d * r.transpose();
    // Symmetrize away round-off from the triple product.
    (a + a.transpose()) * 0.5
}

/// Random symmetric concentration matrix with eigenvalues in `[-scale, scale]`.
pub fn random_concentration(rng: &mut SeededLcg, scale: Real) -> Mat4 {
    let mut eigs = [
        rng.uniform(-scale, scale),
        rng.uniform(-scale, scale),
        rng.uniform(-scale, scale),
        rng.uniform(-scale, scale),
    ];
    eigs.sort_by(Real::total_cmp);
    concentration_with_spectrum(rng, eigs)
}

/// Batch of random concentration matrices.
pub fn random_concentration_batch(rng: &mut SeededLcg, n: usize, scale: Real) -> Vec<Mat4> {
    (0..n).map(|_| random_concentration(rng, scale)).collect()
}
