//! Reading a target's matrix in a chosen transform space.

use glam::Mat4;
use rig_math::boundary::{check_finite, selector_from_value};
use rig_math::config::{self, ValidationConfig};
use rig_math::{
    EulerOrder, RotationMode, Selector, TransformComponent, TransformError, TransformSpace,
    decompose_component_with_order,
};
use serde_json::Value;

use crate::target::{PoseConversion, Target};

const CONTEXT: &str = "get_transform_matrix";

/// Returns the matrix of `target` in `space`.
///
/// - Bones: `TRANSFORM_SPACE` is the channel matrix; `WORLD_SPACE` and
///   `LOCAL_SPACE` are the pose matrix converted by the host.
/// - Objects: the host's basis, world, or local matrix.
/// - No target: the identity matrix.
///
/// # Errors
///
/// In strict mode, returns [`TransformError::InvalidArgument`] for a missing
/// target or a non-finite matrix.
pub fn get_transform_matrix(
    target: Option<Target<'_>>,
    space: TransformSpace,
) -> Result<Mat4, TransformError> {
    transform_matrix_with(&config::current(), target, space)
}

/// [`get_transform_matrix`] with the space given as a label.
///
/// # Errors
///
/// Returns [`TransformError::InvalidArgument`] naming the label and the valid
/// spaces if `space` is unknown.
pub fn get_transform_matrix_labeled(
    target: Option<Target<'_>>,
    space: &str,
) -> Result<Mat4, TransformError> {
    let space = TransformSpace::parse_in(space, CONTEXT)?;
    get_transform_matrix(target, space)
}

/// [`get_transform_matrix`] with the space given as a JSON value.
///
/// # Errors
///
/// Returns [`TransformError::TypeMismatch`] if `space` is not a string, or
/// [`TransformError::InvalidArgument`] if it is not a known space.
pub fn get_transform_matrix_value(
    target: Option<Target<'_>>,
    space: &Value,
) -> Result<Mat4, TransformError> {
    let space = selector_from_value::<TransformSpace>(space, CONTEXT)?;
    get_transform_matrix(target, space)
}

pub(crate) fn transform_matrix_with(
    config: &ValidationConfig,
    target: Option<Target<'_>>,
    space: TransformSpace,
) -> Result<Mat4, TransformError> {
    let Some(target) = target else {
        if config.strict {
            return Err(TransformError::bad_shape(
                CONTEXT,
                "target",
                "None",
                "a scene object or pose bone",
            )
            .reported());
        }
        return Ok(Mat4::IDENTITY);
    };

    let matrix = match target {
        Target::Bone(bone) => match space {
            TransformSpace::TransformSpace => bone.channel_matrix(),
            TransformSpace::WorldSpace => {
                bone.convert_pose_matrix(bone.pose_matrix(), PoseConversion::World)
            }
            TransformSpace::LocalSpace => {
                bone.convert_pose_matrix(bone.pose_matrix(), PoseConversion::Local)
            }
        },
        Target::Object(object) => match space {
            TransformSpace::TransformSpace => object.basis_matrix(),
            TransformSpace::WorldSpace => object.world_matrix(),
            TransformSpace::LocalSpace => object.local_matrix(),
        },
    };

    check_finite(config, &matrix, CONTEXT)?;
    Ok(matrix)
}

/// Read one scalar channel of `target` in `space`.
///
/// `AUTO` rotation mode uses the target's own Euler order; a missing target
/// reads from the identity matrix in the default order.
///
/// # Errors
///
/// Propagates the strict-mode errors of [`get_transform_matrix`].
pub fn target_component(
    target: Option<Target<'_>>,
    space: TransformSpace,
    component: TransformComponent,
    mode: RotationMode,
    driver: bool,
) -> Result<f32, TransformError> {
    let matrix = get_transform_matrix(target, space)?;
    let order = target.map_or(EulerOrder::default(), |t| t.rotation_order());
    Ok(decompose_component_with_order(
        &matrix, component, mode, driver, order,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::resolve_target;
    use crate::target::tests::{StubObject, rig};
    use glam::{Quat, Vec3};
    use rig_math::Expected;

    #[test]
    fn test_none_target_is_identity() {
        for space in TransformSpace::ALL {
            assert_eq!(get_transform_matrix(None, *space).unwrap(), Mat4::IDENTITY);
        }
    }

    #[test]
    fn test_strict_rejects_none_target() {
        let strict = ValidationConfig::default().with_strict(true);
        let err = transform_matrix_with(&strict, None, TransformSpace::WorldSpace).unwrap_err();
        assert_eq!(err.argument(), "target");
    }

    #[test]
    fn test_object_spaces() {
        let mut cube = StubObject::at("Cube", Vec3::ZERO);
        cube.basis = Mat4::from_translation(Vec3::X);
        cube.local = Mat4::from_translation(Vec3::Y);
        cube.world = Mat4::from_translation(Vec3::Z);
        let target = Some(Target::Object(&cube));
        assert_eq!(
            get_transform_matrix(target, TransformSpace::TransformSpace).unwrap(),
            cube.basis
        );
        assert_eq!(
            get_transform_matrix(target, TransformSpace::LocalSpace).unwrap(),
            cube.local
        );
        assert_eq!(
            get_transform_matrix(target, TransformSpace::WorldSpace).unwrap(),
            cube.world
        );
    }

    #[test]
    fn test_bone_spaces() {
        let rig = rig();
        let target = resolve_target(Some(&rig), "Spine");
        let channel = get_transform_matrix(target, TransformSpace::TransformSpace).unwrap();
        assert_eq!(channel, Mat4::from_rotation_x(0.5));

        let world = get_transform_matrix(target, TransformSpace::WorldSpace).unwrap();
        let expected = rig.world * Mat4::from_translation(Vec3::Y) * Mat4::from_rotation_x(0.5);
        assert!(world.abs_diff_eq(expected, 1e-5));

        // No constraints on the stub, so local space equals the channel.
        let local = get_transform_matrix(target, TransformSpace::LocalSpace).unwrap();
        assert!(local.abs_diff_eq(channel, 1e-5));
    }

    #[test]
    fn test_bogus_space_label() {
        let err = get_transform_matrix_labeled(None, "BOGUS_SPACE").unwrap_err();
        assert_eq!(
            err,
            TransformError::InvalidArgument {
                context: "get_transform_matrix",
                argument: "transform_space",
                value: "BOGUS_SPACE".to_string(),
                expected: Expected::OneOf(&["WORLD_SPACE", "TRANSFORM_SPACE", "LOCAL_SPACE"]),
            }
        );
        assert!(err.to_string().contains("'WORLD_SPACE', 'TRANSFORM_SPACE', 'LOCAL_SPACE'"));
    }

    #[test]
    fn test_space_must_be_a_string() {
        let err = get_transform_matrix_value(None, &serde_json::json!(0)).unwrap_err();
        assert!(matches!(err, TransformError::TypeMismatch { .. }));
        let m = get_transform_matrix_value(None, &serde_json::json!("LOCAL_SPACE")).unwrap();
        assert_eq!(m, Mat4::IDENTITY);
    }

    #[test]
    fn test_target_component_uses_target_order() {
        let angles = Vec3::new(0.3, -0.4, 0.6);
        let mut cube = StubObject::at("Cube", Vec3::ZERO);
        cube.order = EulerOrder::YZX;
        cube.world = Mat4::from_quat(EulerOrder::YZX.to_quat(angles));
        let target = Some(Target::Object(&cube));
        let z = target_component(
            target,
            TransformSpace::WorldSpace,
            TransformComponent::RotZ,
            RotationMode::Auto,
            false,
        )
        .unwrap();
        assert!((z - 0.6).abs() < 1e-4);
    }

    #[test]
    fn test_target_component_quaternion() {
        let mut cube = StubObject::at("Cube", Vec3::ZERO);
        cube.world = Mat4::from_quat(Quat::from_rotation_z(1.0));
        let w = target_component(
            Some(Target::Object(&cube)),
            TransformSpace::WorldSpace,
            TransformComponent::RotW,
            RotationMode::Quaternion,
            false,
        )
        .unwrap();
        assert!((w - 0.5_f32.cos()).abs() < 1e-5);
    }
}
