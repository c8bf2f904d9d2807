//! Host capability traits and target resolution.
//!
//! The host application owns every object and bone. These traits are the
//! only view the rig crates have of them: read-only accessors for the
//! matrices the host has already computed, plus the host's own pose-space
//! conversion for bones.

use std::fmt;

use glam::Mat4;
use rig_math::EulerOrder;
use tracing::debug;

/// Spaces a bone's pose-space matrix can be converted into by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseConversion {
    /// Including the armature's own world transform.
    World,
    /// Relative to the bone's rest pose and its parent, constraints included.
    Local,
}

/// A free-standing positionable object.
pub trait SceneObject {
    /// The object's unique name.
    fn name(&self) -> &str;

    /// Transform excluding parenting and constraints.
    fn basis_matrix(&self) -> Mat4;

    /// Final world transform.
    fn world_matrix(&self) -> Mat4;

    /// Transform relative to the parent.
    fn local_matrix(&self) -> Mat4;

    /// The object's own Euler order, used by `AUTO` rotation mode.
    fn rotation_order(&self) -> EulerOrder {
        EulerOrder::default()
    }

    /// Pose data, present only when the object is an articulated skeleton.
    fn armature(&self) -> Option<&dyn Armature> {
        None
    }
}

/// Pose data of an articulated skeleton.
pub trait Armature {
    /// Look up a posed bone by name.
    fn pose_bone(&self, name: &str) -> Option<&dyn PoseBone>;
}

/// A posed bone within an armature.
pub trait PoseBone {
    /// The bone's name, unique within its armature.
    fn name(&self) -> &str;

    /// Channel transform, excluding parent chain and constraints.
    fn channel_matrix(&self) -> Mat4;

    /// Final transform in armature (pose) space.
    fn pose_matrix(&self) -> Mat4;

    /// Convert a pose-space matrix of this bone into another space.
    fn convert_pose_matrix(&self, matrix: Mat4, to: PoseConversion) -> Mat4;

    /// The bone's own Euler order, used by `AUTO` rotation mode.
    fn rotation_order(&self) -> EulerOrder {
        EulerOrder::default()
    }
}

/// Something a transform can be read from.
#[derive(Clone, Copy)]
pub enum Target<'a> {
    /// A free-standing object.
    Object(&'a dyn SceneObject),
    /// A bone of an armature.
    Bone(&'a dyn PoseBone),
}

impl Target<'_> {
    /// Returns the object or bone name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Object(object) => object.name(),
            Self::Bone(bone) => bone.name(),
        }
    }

    /// Returns the target's own Euler order.
    #[must_use]
    pub fn rotation_order(&self) -> EulerOrder {
        match self {
            Self::Object(object) => object.rotation_order(),
            Self::Bone(bone) => bone.rotation_order(),
        }
    }

    /// Returns `true` for bones.
    #[must_use]
    pub fn is_bone(&self) -> bool {
        matches!(self, Self::Bone(_))
    }
}

impl fmt::Debug for Target<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object(object) => f.debug_tuple("Object").field(&object.name()).finish(),
            Self::Bone(bone) => f.debug_tuple("Bone").field(&bone.name()).finish(),
        }
    }
}

/// Pick the effective target for an object and optional bone name.
///
/// For an armature with a non-empty `bone_name` this is the named bone, or
/// `None` if the armature has no such bone. Otherwise it is the object itself
/// (including `None` for no object).
#[must_use]
pub fn resolve_target<'a>(
    object: Option<&'a dyn SceneObject>,
    bone_name: &str,
) -> Option<Target<'a>> {
    let object = object?;
    match object.armature() {
        Some(armature) if !bone_name.is_empty() => {
            let bone = armature.pose_bone(bone_name);
            if bone.is_none() {
                debug!(armature = object.name(), bone = bone_name, "bone not found");
            }
            bone.map(Target::Bone)
        }
        _ => Some(Target::Object(object)),
    }
}
