//! # rig_math
//!
//! Transform decomposition for rig targets. Re-exports [`glam`] for linear
//! algebra and turns 4×4 transform matrices into scalar channels.
//!
//! This crate provides:
//!
//! - [`selector`]: rotation modes, transform spaces, and transform components
//!   with stable labels and ordinals.
//! - [`euler`]: the six fixed Euler orders.
//! - [`swing_twist`]: swing-twist factorization of a rotation.
//! - [`decompose`]: single-channel extraction from a matrix.
//! - [`transform`]: matrix compose/flatten and the decomposed [`Transform3D`].
//! - [`boundary`]: validation of text/JSON inputs.
//! - [`config`] and [`error`]: validation switches and error types.
//!
//! Nothing here depends on a host application; every function is pure apart
//! from optional error logging.

pub mod boundary;
pub mod config;
pub mod decompose;
pub mod error;
pub mod euler;
pub mod selector;
pub mod swing_twist;
pub mod transform;

// Re-export glam types for convenience.
pub use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

pub use boundary::{decompose_rows, decompose_value};
pub use config::ValidationConfig;
pub use decompose::{decompose_component, decompose_component_with_order};
pub use error::{Expected, TransformError};
pub use euler::EulerOrder;
pub use selector::{
    Axis, Channel, RotationKind, RotationMode, Selector, TransformComponent, TransformSpace,
};
pub use swing_twist::{SwingTwist, swing_twist};
pub use transform::{Transform3D, compose_matrix, flatten_matrix};
