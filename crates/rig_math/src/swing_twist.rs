//! Swing-twist factorization of a rotation.
//!
//! A unit quaternion `q` splits into `q = swing * twist`, where `twist` rotates
//! about a chosen body axis and `swing` carries no rotation about that axis.

use glam::Quat;

use crate::selector::Axis;

/// The result of [`swing_twist`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingTwist {
    /// Rotation that aims the twist axis, with no twist about it.
    pub swing: Quat,
    /// Signed twist angle in radians about the twist axis.
    pub twist: f32,
}

/// Split `rotation` into a swing and a twist about `axis`.
///
/// The rotation is normalized first. For a `w >= 0` input the twist lies in
/// `[-π, π]`. Passing [`Axis::W`] is meaningless and is treated as no twist.
#[must_use]
pub fn swing_twist(rotation: Quat, axis: Axis) -> SwingTwist {
    let q = rotation.normalize();
    let along = match axis {
        Axis::X => q.x,
        Axis::Y => q.y,
        Axis::Z => q.z,
        Axis::W => {
            return SwingTwist {
                swing: q,
                twist: 0.0,
            };
        }
    };

    // Half the twist angle.
    let half = along.atan2(q.w);
    let (sin, cos) = half.sin_cos();
    let twist_inverse = match axis {
        Axis::X => Quat::from_xyzw(-sin, 0.0, 0.0, cos),
        Axis::Y => Quat::from_xyzw(0.0, -sin, 0.0, cos),
        _ => Quat::from_xyzw(0.0, 0.0, -sin, cos),
    };

    SwingTwist {
        swing: q * twist_inverse,
        twist: 2.0 * half,
    }
}
