//! Distance and rotational difference between two targets.

use glam::Quat;
use rig_math::{Transform3D, TransformError, TransformSpace};

use crate::space::get_transform_matrix;
use crate::target::Target;

/// Euclidean distance between the locations of two targets, each read in its
/// own space.
///
/// # Errors
///
/// Propagates the strict-mode errors of [`get_transform_matrix`].
pub fn target_distance(
    first: Option<Target<'_>>,
    second: Option<Target<'_>>,
    first_space: TransformSpace,
    second_space: TransformSpace,
) -> Result<f32, TransformError> {
    let a = Transform3D::from_matrix(&get_transform_matrix(first, first_space)?);
    let b = Transform3D::from_matrix(&get_transform_matrix(second, second_space)?);
    Ok(a.location.distance(b.location))
}

/// Shortest rotation angle (radians, in `[0, π]`) between two targets' world
/// rotations.
///
/// # Errors
///
/// Propagates the strict-mode errors of [`get_transform_matrix`].
pub fn target_rotational_difference(
    first: Option<Target<'_>>,
    second: Option<Target<'_>>,
) -> Result<f32, TransformError> {
    let a = Transform3D::from_matrix(&get_transform_matrix(first, TransformSpace::WorldSpace)?);
    let b = Transform3D::from_matrix(&get_transform_matrix(second, TransformSpace::WorldSpace)?);
    Ok(rotational_difference(a.rotation, b.rotation))
}

/// Angle of `first⁻¹ * second`, folded onto the shorter path.
///
/// Matches the convention of rotational-difference animation drivers: the
/// quaternion product is taken in this order, and the result equals
/// `|2·acos(w)|` folded to `2π − angle` above π. It is evaluated as
/// `2·atan2(|xyz|, |w|)`, which stays exact near the identity where `acos`
/// amplifies rounding in `w`.
#[must_use]
pub fn rotational_difference(first: Quat, second: Quat) -> f32 {
    let delta = first.conjugate() * second;
    2.0 * delta.xyz().length().atan2(delta.w.abs())
}
