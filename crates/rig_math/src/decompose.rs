//! Scalar component extraction.
//!
//! [`decompose_component`] reads one location, rotation, or scale channel out
//! of a transform matrix. Rotation channels depend on the [`RotationMode`]:
//! Euler angles, raw quaternion components, or a swing-twist split.

use glam::{Mat4, Quat};

use crate::euler::EulerOrder;
use crate::selector::{Axis, Channel, RotationKind, RotationMode, TransformComponent};
use crate::swing_twist::swing_twist;
use crate::transform::Transform3D;

/// Extract one scalar channel from `matrix`.
///
/// `AUTO` uses [`EulerOrder::XYZ`]; use [`decompose_component_with_order`] to
/// supply a target's own order. See that function for the full rules.
#[must_use]
pub fn decompose_component(
    matrix: &Mat4,
    component: TransformComponent,
    mode: RotationMode,
    driver: bool,
) -> f32 {
    decompose_component_with_order(matrix, component, mode, driver, EulerOrder::default())
}

/// Extract one scalar channel from `matrix`, using `auto_order` for
/// [`RotationMode::Auto`].
///
/// - Location and scale channels index the decomposed translation and scale.
/// - Euler modes (`AUTO` and the six fixed orders) return the angle about
///   the component's axis. Euler angles have no `w`, so `ROT_W` is `0.0`.
/// - `QUATERNION` returns the `(w, x, y, z)` component.
/// - Swing-twist modes return the twist angle when the component's axis is
///   the twist axis, otherwise the swing quaternion's component. With
///   `driver` set, that swing component is reprojected to an angle:
///   `2·acos(w)` or `2·asin(x|y|z)`.
#[must_use]
pub fn decompose_component_with_order(
    matrix: &Mat4,
    component: TransformComponent,
    mode: RotationMode,
    driver: bool,
    auto_order: EulerOrder,
) -> f32 {
    let transform = Transform3D::from_matrix(matrix);
    let axis = component.axis();

    match component.channel() {
        Channel::Location => vector_component(transform.location.to_array(), axis),
        Channel::Scale => vector_component(transform.scale.to_array(), axis),
        Channel::Rotation => {
            rotation_component(transform.rotation, axis, mode, driver, auto_order)
        }
    }
}

fn vector_component(v: [f32; 3], axis: Axis) -> f32 {
    axis.vector_index().map_or(0.0, |i| v[i])
}

fn quaternion_component(q: Quat, axis: Axis) -> f32 {
    [q.w, q.x, q.y, q.z][axis.quaternion_index()]
}

fn rotation_component(
    rotation: Quat,
    axis: Axis,
    mode: RotationMode,
    driver: bool,
    auto_order: EulerOrder,
) -> f32 {
    match mode.kind() {
        RotationKind::Auto => vector_component(auto_order.to_euler(rotation).to_array(), axis),
        RotationKind::Euler(order) => vector_component(order.to_euler(rotation).to_array(), axis),
        RotationKind::Quaternion => quaternion_component(rotation, axis),
        RotationKind::SwingTwist(twist_axis) => {
            let split = swing_twist(rotation, twist_axis);
            if axis == twist_axis {
                return split.twist;
            }
            let value = quaternion_component(split.swing, axis);
            if !driver {
                return value;
            }
            // Quaternion components of a unit swing may drift just past ±1.
            let value = value.clamp(-1.0, 1.0);
            if axis == Axis::W {
                2.0 * value.acos()
            } else {
                2.0 * value.asin()
            }
        }
    }
}
