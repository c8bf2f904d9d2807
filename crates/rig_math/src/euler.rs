//! Fixed Euler rotation orders.
//!
//! An order `ABC` applies the rotation about `A` first, then `B`, then `C`,
//! so the composed rotation is `R_C * R_B * R_A`. glam names orders by
//! intrinsic composition instead (`EulerRot::ZYX` is `R_Z * R_Y * R_X`), so
//! each order maps onto the reversed glam order and the returned angles are
//! permuted back into `(x, y, z)`.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// One of the six Tait-Bryan orders.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EulerOrder {
    #[default]
    XYZ,
    XZY,
    YXZ,
    YZX,
    ZXY,
    ZYX,
}

impl EulerOrder {
    /// All orders.
    pub const ALL: [Self; 6] = [
        Self::XYZ,
        Self::XZY,
        Self::YXZ,
        Self::YZX,
        Self::ZXY,
        Self::ZYX,
    ];

    /// The glam order with the same composition.
    #[must_use]
    pub const fn glam_order(self) -> EulerRot {
        match self {
            Self::XYZ => EulerRot::ZYX,
            Self::XZY => EulerRot::YZX,
            Self::YXZ => EulerRot::ZXY,
            Self::YZX => EulerRot::XZY,
            Self::ZXY => EulerRot::YXZ,
            Self::ZYX => EulerRot::XYZ,
        }
    }

    /// Extract Euler angles (radians) from a rotation.
    ///
    /// The result is indexed by axis, not by application order.
    #[must_use]
    pub fn to_euler(self, rotation: Quat) -> Vec3 {
        let (a, b, c) = rotation.to_euler(self.glam_order());
        match self {
            Self::XYZ => Vec3::new(c, b, a),
            Self::XZY => Vec3::new(c, a, b),
            Self::YXZ => Vec3::new(b, c, a),
            Self::YZX => Vec3::new(a, c, b),
            Self::ZXY => Vec3::new(b, a, c),
            Self::ZYX => Vec3::new(a, b, c),
        }
    }

    /// Build a rotation from Euler angles indexed by axis.
    #[must_use]
    pub fn to_quat(self, angles: Vec3) -> Quat {
        let Vec3 { x, y, z } = angles;
        let (a, b, c) = match self {
            Self::XYZ => (z, y, x),
            Self::XZY => (y, z, x),
            Self::YXZ => (z, x, y),
            Self::YZX => (x, z, y),
            Self::ZXY => (y, x, z),
            Self::ZYX => (x, y, z),
        };
        Quat::from_euler(self.glam_order(), a, b, c)
    }
}
