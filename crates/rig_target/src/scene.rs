//! In-memory scene host.
//!
//! A [`Scene`] is built from a serde description of objects, their parenting,
//! and (for armatures) bones with rest and pose transforms. It evaluates every
//! matrix once at load time and then serves them through the capability
//! traits in [`crate::target`], the same way a live host would.
//!
//! Evaluation rules:
//!
//! - Object: `basis = T·R·S`, `local = parent_inverse · basis`,
//!   `world = parent.world · local`.
//! - Bone: `offset = parent.rest⁻¹ · rest` (root: `rest`),
//!   `pose = parent.pose · offset · channel` (root: `rest · channel`).
//! - Bone conversion to world: `armature.world · M`; to local:
//!   `(parent.pose · parent.rest⁻¹ · rest)⁻¹ · M` (root: `rest⁻¹ · M`).

use std::collections::HashMap;
use std::path::Path;

use glam::{Mat4, Quat, Vec3};
use rig_math::{EulerOrder, Transform3D};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::target::{Armature, PoseBone, PoseConversion, SceneObject, Target, resolve_target};

/// Largest accepted deviation of a described rotation's norm from 1.
const ROTATION_TOLERANCE: f32 = 1e-3;

/// Errors raised while loading a scene description.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scene json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate object: {0}")]
    DuplicateObject(String),
    #[error("object {object} has unknown parent {parent}")]
    UnknownParent { object: String, parent: String },
    #[error("parent cycle through object {0}")]
    ParentCycle(String),
    #[error("object {0} has bones but is not an armature")]
    BonesOnNonArmature(String),
    #[error("duplicate bone {bone} in armature {armature}")]
    DuplicateBone { armature: String, bone: String },
    #[error("bone {bone} in armature {armature} has unknown parent {parent}")]
    UnknownBoneParent {
        armature: String,
        bone: String,
        parent: String,
    },
    #[error("parent cycle through bone {bone} in armature {armature}")]
    BoneCycle { armature: String, bone: String },
    #[error("rotation of {0} is not a unit quaternion")]
    NonUnitRotation(String),
}

// ── Description ─────────────────────────────────────────────────────────────

/// Kind of a scene object. Only armatures carry bones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObjectKind {
    Mesh,
    #[default]
    Empty,
    Armature,
    Camera,
    Light,
}

/// Location, rotation `(w, x, y, z)`, and scale. Missing fields are identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformDesc {
    pub location: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl Default for TransformDesc {
    fn default() -> Self {
        Self {
            location: [0.0; 3],
            rotation: [1.0, 0.0, 0.0, 0.0],
            scale: [1.0; 3],
        }
    }
}

impl TransformDesc {
    fn to_matrix(self, owner: &str) -> Result<Mat4, SceneError> {
        let [w, x, y, z] = self.rotation;
        let rotation = Quat::from_xyzw(x, y, z, w);
        if (rotation.length() - 1.0).abs() > ROTATION_TOLERANCE {
            return Err(SceneError::NonUnitRotation(owner.to_string()));
        }
        let transform = Transform3D::new(
            Vec3::from_array(self.location),
            rotation.normalize(),
            Vec3::from_array(self.scale),
        );
        Ok(transform.to_matrix())
    }
}

/// A bone of an armature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoneDesc {
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    /// Rest transform in armature space.
    #[serde(default)]
    pub rest: TransformDesc,
    /// Pose channel, relative to the rest transform.
    #[serde(default)]
    pub pose: TransformDesc,
    #[serde(default)]
    pub rotation_order: EulerOrder,
}

/// A scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectDesc {
    pub name: String,
    #[serde(default)]
    pub kind: ObjectKind,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(flatten)]
    pub transform: TransformDesc,
    #[serde(default)]
    pub rotation_order: EulerOrder,
    /// Column-major inverse of the parent's world matrix at parenting time.
    #[serde(default)]
    pub parent_inverse: Option<[f32; 16]>,
    #[serde(default)]
    pub bones: Vec<BoneDesc>,
}

/// A whole scene.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    pub objects: Vec<ObjectDesc>,
}

// ── Evaluated scene ─────────────────────────────────────────────────────────

#[derive(Debug)]
struct ObjectData {
    name: String,
    kind: ObjectKind,
    rotation_order: EulerOrder,
    basis: Mat4,
    local: Mat4,
    world: Mat4,
    armature: Option<ArmatureData>,
}

#[derive(Debug)]
struct ArmatureData {
    bones: Vec<BoneData>,
    by_name: HashMap<String, usize>,
}

#[derive(Debug)]
struct BoneData {
    name: String,
    rotation_order: EulerOrder,
    channel: Mat4,
    pose: Mat4,
    armature_world: Mat4,
    /// `parent.pose · parent.rest⁻¹ · rest`, or `rest` for roots.
    local_basis: Mat4,
}

/// An evaluated scene serving the host capability traits.
#[derive(Debug, Default)]
pub struct Scene {
    objects: Vec<ObjectData>,
    by_name: HashMap<String, usize>,
}

impl Scene {
    /// Evaluate a scene description.
    ///
    /// # Errors
    ///
    /// Returns a [`SceneError`] for duplicate names, unknown parents, parent
    /// cycles, bones on non-armatures, or non-unit rotations.
    pub fn from_desc(desc: &SceneDesc) -> Result<Self, SceneError> {
        let by_name = index_names(desc.objects.iter().map(|o| o.name.as_str()))
            .map_err(|name| SceneError::DuplicateObject(name.to_string()))?;

        let parents = desc
            .objects
            .iter()
            .map(|o| match &o.parent {
                None => Ok(None),
                Some(parent) => by_name.get(parent).copied().map(Some).ok_or_else(|| {
                    SceneError::UnknownParent {
                        object: o.name.clone(),
                        parent: parent.clone(),
                    }
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let order = evaluation_order(&parents)
            .map_err(|i| SceneError::ParentCycle(desc.objects[i].name.clone()))?;

        let mut worlds = vec![Mat4::IDENTITY; desc.objects.len()];
        let mut evaluated: Vec<Option<ObjectData>> = desc.objects.iter().map(|_| None).collect();
        for i in order {
            let o = &desc.objects[i];
            let basis = o.transform.to_matrix(&o.name)?;
            let parent_inverse = o
                .parent_inverse
                .map_or(Mat4::IDENTITY, |cols| Mat4::from_cols_array(&cols));
            let local = parent_inverse * basis;
            let world = parents[i].map_or(local, |p| worlds[p] * local);
            worlds[i] = world;

            let armature = match o.kind {
                ObjectKind::Armature => Some(evaluate_armature(o, world)?),
                _ if !o.bones.is_empty() => {
                    return Err(SceneError::BonesOnNonArmature(o.name.clone()));
                }
                _ => None,
            };

            evaluated[i] = Some(ObjectData {
                name: o.name.clone(),
                kind: o.kind,
                rotation_order: o.rotation_order,
                basis,
                local,
                world,
                armature,
            });
        }

        let objects: Vec<ObjectData> = evaluated.into_iter().flatten().collect();
        info!(objects = objects.len(), "scene evaluated");
        Ok(Self { objects, by_name })
    }

    /// Parse and evaluate a JSON scene description.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Json`] for malformed JSON, or any evaluation error.
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        let desc: SceneDesc = serde_json::from_str(json)?;
        Self::from_desc(&desc)
    }

    /// Load a JSON scene description from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Io`] if the file cannot be read, or any parse or
    /// evaluation error.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        debug!(path = %path.display(), "loading scene");
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Returns the number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Returns `true` if the scene has no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Returns object names in description order.
    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|o| o.name.as_str())
    }

    /// Returns the kind of a named object.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<ObjectKind> {
        self.by_name.get(name).map(|&i| self.objects[i].kind)
    }

    /// Look an object up by name.
    #[must_use]
    pub fn object(&self, name: &str) -> Option<&dyn SceneObject> {
        self.by_name
            .get(name)
            .map(|&i| &self.objects[i] as &dyn SceneObject)
    }

    /// Resolve an object and optional bone name to a target.
    #[must_use]
    pub fn target(&self, object: &str, bone: &str) -> Option<Target<'_>> {
        resolve_target(self.object(object), bone)
    }
}

/// Map names to indices, failing on the first duplicate.
fn index_names<'a>(names: impl Iterator<Item = &'a str>) -> Result<HashMap<String, usize>, &'a str> {
    let mut map = HashMap::new();
    for (i, name) in names.enumerate() {
        if map.insert(name.to_string(), i).is_some() {
            return Err(name);
        }
    }
    Ok(map)
}

/// Order nodes so every parent precedes its children.
///
/// Returns the index of a node on a cycle if the hierarchy is not a forest.
fn evaluation_order(parents: &[Option<usize>]) -> Result<Vec<usize>, usize> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Open,
        Done,
    }

    let mut marks = vec![Mark::New; parents.len()];
    let mut order = Vec::with_capacity(parents.len());
    for start in 0..parents.len() {
        // Walk up to the first evaluated ancestor, then emit on the way down.
        let mut chain = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            match marks[i] {
                Mark::Done => break,
                Mark::Open => return Err(i),
                Mark::New => {
                    marks[i] = Mark::Open;
                    chain.push(i);
                    current = parents[i];
                }
            }
        }
        for i in chain.into_iter().rev() {
            marks[i] = Mark::Done;
            order.push(i);
        }
    }
    Ok(order)
}

fn evaluate_armature(object: &ObjectDesc, world: Mat4) -> Result<ArmatureData, SceneError> {
    let by_name = index_names(object.bones.iter().map(|b| b.name.as_str())).map_err(|bone| {
        SceneError::DuplicateBone {
            armature: object.name.clone(),
            bone: bone.to_string(),
        }
    })?;

    let parents = object
        .bones
        .iter()
        .map(|b| match &b.parent {
            None => Ok(None),
            Some(parent) => by_name.get(parent).copied().map(Some).ok_or_else(|| {
                SceneError::UnknownBoneParent {
                    armature: object.name.clone(),
                    bone: b.name.clone(),
                    parent: parent.clone(),
                }
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let order = evaluation_order(&parents).map_err(|i| SceneError::BoneCycle {
        armature: object.name.clone(),
        bone: object.bones[i].name.clone(),
    })?;

    let count = object.bones.len();
    let mut rests = vec![Mat4::IDENTITY; count];
    let mut poses = vec![Mat4::IDENTITY; count];
    let mut evaluated: Vec<Option<BoneData>> = object.bones.iter().map(|_| None).collect();
    for i in order {
        let b = &object.bones[i];
        let rest = b.rest.to_matrix(&b.name)?;
        let channel = b.pose.to_matrix(&b.name)?;
        let local_basis = match parents[i] {
            Some(p) => poses[p] * rests[p].inverse() * rest,
            None => rest,
        };
        let pose = local_basis * channel;
        rests[i] = rest;
        poses[i] = pose;
        evaluated[i] = Some(BoneData {
            name: b.name.clone(),
            rotation_order: b.rotation_order,
            channel,
            pose,
            armature_world: world,
            local_basis,
        });
    }

    Ok(ArmatureData {
        bones: evaluated.into_iter().flatten().collect(),
        by_name,
    })
}

impl SceneObject for ObjectData {
    fn name(&self) -> &str {
        &self.name
    }

    fn basis_matrix(&self) -> Mat4 {
        self.basis
    }

    fn world_matrix(&self) -> Mat4 {
        self.world
    }

    fn local_matrix(&self) -> Mat4 {
        self.local
    }

    fn rotation_order(&self) -> EulerOrder {
        self.rotation_order
    }

    fn armature(&self) -> Option<&dyn Armature> {
        self.armature.as_ref().map(|a| a as &dyn Armature)
    }
}

impl Armature for ArmatureData {
    fn pose_bone(&self, name: &str) -> Option<&dyn PoseBone> {
        self.by_name
            .get(name)
            .map(|&i| &self.bones[i] as &dyn PoseBone)
    }
}

impl PoseBone for BoneData {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_matrix(&self) -> Mat4 {
        self.channel
    }

    fn pose_matrix(&self) -> Mat4 {
        self.pose
    }

    fn convert_pose_matrix(&self, matrix: Mat4, to: PoseConversion) -> Mat4 {
        match to {
            PoseConversion::World => self.armature_world * matrix,
            PoseConversion::Local => self.local_basis.inverse() * matrix,
        }
    }

    fn rotation_order(&self) -> EulerOrder {
        self.rotation_order
    }
}
