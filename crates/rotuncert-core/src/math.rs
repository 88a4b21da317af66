//! Mathematical type aliases and quaternion helpers.

use nalgebra::{Matrix4, Vector4};

/// Scalar type used throughout the library (currently `f64`).
pub type Real = f64;

/// 4×4 matrix with [`Real`] entries; the Bingham concentration parameter.
pub type Mat4 = Matrix4<Real>;
/// Unit quaternion stored as a plain 4-vector `(x, y, z, w)`.
///
/// No scalar-component convention is enforced here beyond internal
/// consistency with the angular-error collaborator; helpers in this module
/// assume the scalar part last.
pub type Quat = Vector4<Real>;

/// Axis-angle magnitude of a unit quaternion, in degrees.
///
/// Computes `2·atan2(‖(x, y, z)‖, w)`. Useful as a dataset diagnostic
/// (how large are the target rotations), not as an error measure.
pub fn rotation_magnitude_deg(q: &Quat) -> Real {
    let vec_norm = (q.x * q.x + q.y * q.y + q.z * q.z).sqrt();
    2.0 * vec_norm.atan2(q.w).to_degrees()
}
