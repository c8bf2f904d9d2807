//! # rig_target
//!
//! Reads transforms out of a host scene. The host is seen only through the
//! capability traits in [`target`]; [`scene`] provides an in-memory host
//! loaded from JSON.
//!
//! - [`target`]: host traits and [`resolve_target`].
//! - [`space`]: a target's matrix in world, transform, or local space.
//! - [`metrics`]: distance and rotational difference between targets.
//! - [`scene`]: the serde-described [`Scene`].

pub mod metrics;
pub mod scene;
pub mod space;
pub mod target;

pub use metrics::{rotational_difference, target_distance, target_rotational_difference};
pub use scene::{Scene, SceneDesc, SceneError};
pub use space::{
    get_transform_matrix, get_transform_matrix_labeled, get_transform_matrix_value,
    target_component,
};
pub use target::{Armature, PoseBone, PoseConversion, SceneObject, Target, resolve_target};
