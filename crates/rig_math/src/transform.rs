//! Location, rotation, and scale of an affine transform.
//!
//! [`Transform3D`] is the decomposed form of a 4×4 matrix. [`compose_matrix`]
//! and [`flatten_matrix`] convert between it and raw matrices.

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::{self, ValidationConfig};
use crate::error::TransformError;

/// Largest accepted deviation of a rotation's norm from 1 in strict mode.
pub const UNIT_NORM_TOLERANCE: f32 = 1e-4;

/// A 3D transform split into location, rotation, and per-axis scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform3D {
    /// Translation (the matrix's last column).
    pub location: Vec3,
    /// Rotation as a unit quaternion with `w >= 0`.
    pub rotation: Quat,
    /// Per-axis scale. Mirroring shows up as a negative X scale.
    pub scale: Vec3,
}

impl Transform3D {
    /// The identity transform: origin, no rotation, unit scale.
    pub const IDENTITY: Self = Self {
        location: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform from its parts.
    #[must_use]
    pub fn new(location: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            location,
            rotation,
            scale,
        }
    }

    /// Decompose a matrix.
    ///
    /// Scale is the length of each basis column, with the sign of the
    /// determinant carried on X. Rotation comes from the scale-normalized
    /// basis and is canonicalized to `w >= 0`; a degenerate basis (zero scale
    /// on some axis) yields the identity rotation.
    #[must_use]
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, location) = matrix.to_scale_rotation_translation();
        let rotation = if rotation.is_finite() && rotation.length_squared() > 0.0 {
            canonical(rotation.normalize())
        } else {
            Quat::IDENTITY
        };
        Self {
            location,
            rotation,
            scale,
        }
    }

    /// Compose the 4×4 matrix for this transform.
    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        let basis = Mat3::from_quat(self.rotation) * Mat3::from_diagonal(self.scale);
        let mut matrix = Mat4::from_mat3(basis);
        matrix.w_axis = self.location.extend(1.0);
        matrix
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Transform3D> for Mat4 {
    fn from(t: Transform3D) -> Self {
        t.to_matrix()
    }
}

/// Flip a quaternion into the `w >= 0` hemisphere.
#[must_use]
pub fn canonical(q: Quat) -> Quat {
    if q.w < 0.0 { -q } else { q }
}

/// Returns the 16 entries of `matrix` in column-major order.
#[must_use]
pub fn flatten_matrix(matrix: &Mat4) -> [f32; 16] {
    matrix.to_cols_array()
}

/// Build a transform matrix from location, rotation, and scale.
///
/// The scale is applied first, then the rotation, then the translation. The
/// rotation is used exactly as given; it is never renormalized.
///
/// # Errors
///
/// In strict mode, returns [`TransformError::InvalidArgument`] if `rotation`
/// is not a unit quaternion.
pub fn compose_matrix(
    location: Vec3,
    rotation: Quat,
    scale: Vec3,
) -> Result<Mat4, TransformError> {
    compose_matrix_with(&config::current(), location, rotation, scale)
}

pub(crate) fn compose_matrix_with(
    config: &ValidationConfig,
    location: Vec3,
    rotation: Quat,
    scale: Vec3,
) -> Result<Mat4, TransformError> {
    if config.strict && (rotation.length() - 1.0).abs() > UNIT_NORM_TOLERANCE {
        let value = format!(
            "({}, {}, {}, {})",
            rotation.w, rotation.x, rotation.y, rotation.z
        );
        return Err(
            TransformError::bad_shape("compose_matrix", "rotation", value, "a unit quaternion")
                .reported(),
        );
    }
    Ok(Transform3D::new(location, rotation, scale).to_matrix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_transform() {
        let t = Transform3D::IDENTITY;
        assert_eq!(t.location, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.to_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn test_compose_defaults_is_identity() {
        let m = compose_matrix(Vec3::ZERO, Quat::IDENTITY, Vec3::ONE).unwrap();
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn test_compose_matches_glam() {
        let location = Vec3::new(1.0, -2.0, 3.5);
        let rotation = Quat::from_rotation_y(0.8) * Quat::from_rotation_x(-0.3);
        let scale = Vec3::new(2.0, 0.5, 1.5);
        let m = compose_matrix(location, rotation, scale).unwrap();
        let expected = Mat4::from_scale_rotation_translation(scale, rotation, location);
        assert!(m.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_compose_writes_location_into_last_column() {
        let m = compose_matrix(Vec3::new(4.0, 5.0, 6.0), Quat::IDENTITY, Vec3::ONE).unwrap();
        let flat = flatten_matrix(&m);
        assert_eq!(&flat[12..16], &[4.0, 5.0, 6.0, 1.0]);
    }

    #[test]
    fn test_flatten_is_column_major() {
        let m = Mat4::from_cols_array(&[
            0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0,
        ]);
        let flat = flatten_matrix(&m);
        assert_eq!(flat[0..4], [m.x_axis.x, m.x_axis.y, m.x_axis.z, m.x_axis.w]);
        assert_eq!(flat[13], m.w_axis.y);
        assert_eq!(flat[15], 15.0);
    }

    #[test]
    fn test_from_matrix_recovers_parts() {
        let t = Transform3D::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(-2.5),
            Vec3::new(1.5, 2.0, 0.25),
        );
        let back = Transform3D::from_matrix(&t.to_matrix());
        assert!((back.location - t.location).length() < 1e-5);
        assert!((back.scale - t.scale).length() < 1e-5);
        assert!(back.rotation.dot(t.rotation).abs() > 1.0 - 1e-5);
        assert!(back.rotation.w >= 0.0);
    }

    #[test]
    fn test_from_matrix_mirrored_scale() {
        let m = Mat4::from_scale(Vec3::new(-2.0, 3.0, 4.0));
        let t = Transform3D::from_matrix(&m);
        assert!((t.scale - Vec3::new(-2.0, 3.0, 4.0)).length() < 1e-5);
        assert!(t.rotation.abs_diff_eq(Quat::IDENTITY, 1e-5));
    }

    #[test]
    fn test_from_matrix_zero_scale_has_identity_rotation() {
        let m = Mat4::from_scale(Vec3::new(0.0, 1.0, 1.0));
        let t = Transform3D::from_matrix(&m);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_strict_compose_rejects_non_unit_rotation() {
        let strict = ValidationConfig::default().with_strict(true);
        let rotation = Quat::from_xyzw(0.0, 0.0, 0.0, 2.0);
        let err = compose_matrix_with(&strict, Vec3::ZERO, rotation, Vec3::ONE).unwrap_err();
        assert_eq!(err.argument(), "rotation");

        let lenient = ValidationConfig::default();
        assert!(compose_matrix_with(&lenient, Vec3::ZERO, rotation, Vec3::ONE).is_ok());
    }
}
