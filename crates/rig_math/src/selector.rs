//! Enumerated selectors: rotation modes, transform spaces, and transform
//! components.
//!
//! Each selector has a stable string label and a stable ordinal. Both may be
//! persisted by callers (saved rigs, driver settings), so neither may change
//! across versions. New variants may only be appended.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransformError;
use crate::euler::EulerOrder;

/// A closed set of labelled values with stable ordinals.
pub trait Selector: Sized + Copy + 'static {
    /// The argument name used in validation errors.
    const ARGUMENT: &'static str;

    /// Every variant, in ordinal order.
    const ALL: &'static [Self];

    /// Every label, in ordinal order.
    const LABELS: &'static [&'static str];

    /// Returns the stable ordinal of this variant.
    fn ordinal(self) -> usize;

    /// Returns the human-readable name.
    fn name(self) -> &'static str;

    /// Returns a one-line description.
    fn description(self) -> &'static str;

    /// Returns the stable string label.
    fn label(self) -> &'static str {
        Self::LABELS[self.ordinal()]
    }

    /// Look a variant up by label.
    fn from_label(label: &str) -> Option<Self> {
        Self::LABELS
            .iter()
            .position(|l| *l == label)
            .map(|i| Self::ALL[i])
    }

    /// Look a variant up by ordinal.
    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::ALL.get(ordinal).copied()
    }

    /// Parse a label, reporting an [`TransformError::InvalidArgument`] that
    /// names `context` when the label is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvalidArgument`] listing [`Selector::LABELS`].
    fn parse_in(label: &str, context: &'static str) -> Result<Self, TransformError> {
        Self::from_label(label).ok_or_else(|| {
            TransformError::unknown_label(context, Self::ARGUMENT, label, Self::LABELS).reported()
        })
    }
}

// ── Axis ────────────────────────────────────────────────────────────────────

/// The trailing axis letter of a component or swing-twist mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    W,
    X,
    Y,
    Z,
}

impl Axis {
    /// Index into an `(x, y, z)` vector. `None` for [`Axis::W`].
    #[must_use]
    pub const fn vector_index(self) -> Option<usize> {
        match self {
            Self::W => None,
            Self::X => Some(0),
            Self::Y => Some(1),
            Self::Z => Some(2),
        }
    }

    /// Index into a `(w, x, y, z)` quaternion.
    #[must_use]
    pub const fn quaternion_index(self) -> usize {
        match self {
            Self::W => 0,
            Self::X => 1,
            Self::Y => 2,
            Self::Z => 3,
        }
    }
}

// ── Rotation modes ──────────────────────────────────────────────────────────

/// How rotation channels are extracted from a matrix.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RotationMode {
    /// Euler angles in the target's own rotation order.
    #[default]
    #[serde(rename = "AUTO")]
    Auto = 0,
    XYZ = 1,
    XZY = 2,
    YXZ = 3,
    YZX = 4,
    ZXY = 5,
    ZYX = 6,
    #[serde(rename = "QUATERNION")]
    Quaternion = 7,
    #[serde(rename = "SWING_TWIST_X")]
    SwingTwistX = 8,
    #[serde(rename = "SWING_TWIST_Y")]
    SwingTwistY = 9,
    #[serde(rename = "SWING_TWIST_Z")]
    SwingTwistZ = 10,
}

/// A [`RotationMode`] grouped by extraction strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationKind {
    /// Euler in the caller-supplied default order; no `w` channel.
    Auto,
    /// Euler in an explicit order.
    Euler(EulerOrder),
    /// Raw quaternion components.
    Quaternion,
    /// Swing quaternion plus twist angle about the given axis.
    SwingTwist(Axis),
}

impl RotationMode {
    /// Group this mode by extraction strategy.
    #[must_use]
    pub const fn kind(self) -> RotationKind {
        match self {
            Self::Auto => RotationKind::Auto,
            Self::XYZ => RotationKind::Euler(EulerOrder::XYZ),
            Self::XZY => RotationKind::Euler(EulerOrder::XZY),
            Self::YXZ => RotationKind::Euler(EulerOrder::YXZ),
            Self::YZX => RotationKind::Euler(EulerOrder::YZX),
            Self::ZXY => RotationKind::Euler(EulerOrder::ZXY),
            Self::ZYX => RotationKind::Euler(EulerOrder::ZYX),
            Self::Quaternion => RotationKind::Quaternion,
            Self::SwingTwistX => RotationKind::SwingTwist(Axis::X),
            Self::SwingTwistY => RotationKind::SwingTwist(Axis::Y),
            Self::SwingTwistZ => RotationKind::SwingTwist(Axis::Z),
        }
    }
}

impl From<EulerOrder> for RotationMode {
    fn from(order: EulerOrder) -> Self {
        match order {
            EulerOrder::XYZ => Self::XYZ,
            EulerOrder::XZY => Self::XZY,
            EulerOrder::YXZ => Self::YXZ,
            EulerOrder::YZX => Self::YZX,
            EulerOrder::ZXY => Self::ZXY,
            EulerOrder::ZYX => Self::ZYX,
        }
    }
}

impl Selector for RotationMode {
    const ARGUMENT: &'static str = "rotation_mode";

    const ALL: &'static [Self] = &[
        Self::Auto,
        Self::XYZ,
        Self::XZY,
        Self::YXZ,
        Self::YZX,
        Self::ZXY,
        Self::ZYX,
        Self::Quaternion,
        Self::SwingTwistX,
        Self::SwingTwistY,
        Self::SwingTwistZ,
    ];

    const LABELS: &'static [&'static str] = &[
        "AUTO",
        "XYZ",
        "XZY",
        "YXZ",
        "YZX",
        "ZXY",
        "ZYX",
        "QUATERNION",
        "SWING_TWIST_X",
        "SWING_TWIST_Y",
        "SWING_TWIST_Z",
    ];

    fn ordinal(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Auto => "Auto Euler",
            Self::XYZ => "XYZ Euler",
            Self::XZY => "XZY Euler",
            Self::YXZ => "YXZ Euler",
            Self::YZX => "YZX Euler",
            Self::ZXY => "ZXY Euler",
            Self::ZYX => "ZYX Euler",
            Self::Quaternion => "Quaternion",
            Self::SwingTwistX => "Swing and X Twist",
            Self::SwingTwistY => "Swing and Y Twist",
            Self::SwingTwistZ => "Swing and Z Twist",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Auto => "Euler using the rotation order of the target",
            Self::XYZ => "Euler using the XYZ rotation order",
            Self::XZY => "Euler using the XZY rotation order",
            Self::YXZ => "Euler using the YXZ rotation order",
            Self::YZX => "Euler using the YZX rotation order",
            Self::ZXY => "Euler using the ZXY rotation order",
            Self::ZYX => "Euler using the ZYX rotation order",
            Self::Quaternion => "Quaternion rotation",
            Self::SwingTwistX => {
                "Decompose into a swing rotation to aim the X axis, followed by twist around it"
            }
            Self::SwingTwistY => {
                "Decompose into a swing rotation to aim the Y axis, followed by twist around it"
            }
            Self::SwingTwistZ => {
                "Decompose into a swing rotation to aim the Z axis, followed by twist around it"
            }
        }
    }
}

// ── Transform spaces ────────────────────────────────────────────────────────

/// The coordinate space a target's matrix is read in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformSpace {
    /// Includes parenting, rest pose, and constraints.
    #[default]
    WorldSpace = 0,
    /// Excludes parenting, rest pose, and constraints.
    TransformSpace = 1,
    /// Includes constraints but not parenting or rest pose.
    LocalSpace = 2,
}

impl Selector for TransformSpace {
    const ARGUMENT: &'static str = "transform_space";

    const ALL: &'static [Self] = &[Self::WorldSpace, Self::TransformSpace, Self::LocalSpace];

    const LABELS: &'static [&'static str] = &["WORLD_SPACE", "TRANSFORM_SPACE", "LOCAL_SPACE"];

    fn ordinal(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::WorldSpace => "World Space",
            Self::TransformSpace => "Transform Space",
            Self::LocalSpace => "Local Space",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::WorldSpace => "Transforms include effects of parenting/restpose and constraints",
            Self::TransformSpace => "Transforms don't include parenting/restpose or constraints",
            Self::LocalSpace => "Transforms include effects of constraints but not parenting/restpose",
        }
    }
}

// ── Transform components ────────────────────────────────────────────────────

/// Which part of a transform a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Location,
    Rotation,
    Scale,
}

/// One scalar channel of a decomposed transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransformComponent {
    LocX = 0,
    LocY = 1,
    LocZ = 2,
    RotW = 3,
    RotX = 4,
    RotY = 5,
    RotZ = 6,
    ScaleX = 7,
    ScaleY = 8,
    ScaleZ = 9,
}

impl TransformComponent {
    /// Returns the channel this component reads from.
    #[must_use]
    pub const fn channel(self) -> Channel {
        match self {
            Self::LocX | Self::LocY | Self::LocZ => Channel::Location,
            Self::RotW | Self::RotX | Self::RotY | Self::RotZ => Channel::Rotation,
            Self::ScaleX | Self::ScaleY | Self::ScaleZ => Channel::Scale,
        }
    }

    /// Returns the trailing axis letter.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::RotW => Axis::W,
            Self::LocX | Self::RotX | Self::ScaleX => Axis::X,
            Self::LocY | Self::RotY | Self::ScaleY => Axis::Y,
            Self::LocZ | Self::RotZ | Self::ScaleZ => Axis::Z,
        }
    }
}

impl Selector for TransformComponent {
    const ARGUMENT: &'static str = "transform_component";

    const ALL: &'static [Self] = &[
        Self::LocX,
        Self::LocY,
        Self::LocZ,
        Self::RotW,
        Self::RotX,
        Self::RotY,
        Self::RotZ,
        Self::ScaleX,
        Self::ScaleY,
        Self::ScaleZ,
    ];

    const LABELS: &'static [&'static str] = &[
        "LOC_X", "LOC_Y", "LOC_Z", "ROT_W", "ROT_X", "ROT_Y", "ROT_Z", "SCALE_X", "SCALE_Y",
        "SCALE_Z",
    ];

    fn ordinal(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::LocX => "X Location",
            Self::LocY => "Y Location",
            Self::LocZ => "Z Location",
            Self::RotW => "W Rotation",
            Self::RotX => "X Rotation",
            Self::RotY => "Y Rotation",
            Self::RotZ => "Z Rotation",
            Self::ScaleX => "X Scale",
            Self::ScaleY => "Y Scale",
            Self::ScaleZ => "Z Scale",
        }
    }

    fn description(self) -> &'static str {
        ""
    }
}

// ── Text conversions ────────────────────────────────────────────────────────

macro_rules! impl_text {
    ($ty:ty, $context:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = TransformError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse_in(s, $context)
            }
        }
    };
}

impl_text!(RotationMode, "RotationMode::from_str");
impl_text!(TransformSpace, "TransformSpace::from_str");
impl_text!(TransformComponent, "TransformComponent::from_str");

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_table_consistent<S: Selector + PartialEq + fmt::Debug>() {
        assert_eq!(S::ALL.len(), S::LABELS.len());
        for (i, variant) in S::ALL.iter().enumerate() {
            assert_eq!(variant.ordinal(), i);
            assert_eq!(S::from_ordinal(i), Some(*variant));
            assert_eq!(S::from_label(variant.label()), Some(*variant));
        }
        assert_eq!(S::from_ordinal(S::ALL.len()), None);
    }

    #[test]
    fn test_tables_are_consistent() {
        assert_table_consistent::<RotationMode>();
        assert_table_consistent::<TransformSpace>();
        assert_table_consistent::<TransformComponent>();
    }

    #[test]
    fn test_ordinals_are_stable() {
        assert_eq!(RotationMode::Auto.ordinal(), 0);
        assert_eq!(RotationMode::ZYX.ordinal(), 6);
        assert_eq!(RotationMode::Quaternion.ordinal(), 7);
        assert_eq!(RotationMode::SwingTwistZ.ordinal(), 10);
        assert_eq!(TransformSpace::LocalSpace.ordinal(), 2);
        assert_eq!(TransformComponent::RotW.ordinal(), 3);
        assert_eq!(TransformComponent::ScaleZ.ordinal(), 9);
    }

    #[test]
    fn test_from_str_rejects_unknown_label() {
        let err = "BOGUS_SPACE".parse::<TransformSpace>().unwrap_err();
        match err {
            TransformError::InvalidArgument { value, expected, .. } => {
                assert_eq!(value, "BOGUS_SPACE");
                assert_eq!(
                    expected,
                    crate::error::Expected::OneOf(TransformSpace::LABELS)
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        assert!("world_space".parse::<TransformSpace>().is_err());
        assert_eq!(
            "WORLD_SPACE".parse::<TransformSpace>().unwrap(),
            TransformSpace::WorldSpace
        );
    }

    #[test]
    fn test_serde_uses_labels() {
        for mode in RotationMode::ALL {
            let json = serde_json::to_string(mode).unwrap();
            assert_eq!(json, format!("\"{}\"", mode.label()));
        }
        for space in TransformSpace::ALL {
            let json = serde_json::to_string(space).unwrap();
            assert_eq!(json, format!("\"{}\"", space.label()));
        }
        for component in TransformComponent::ALL {
            let json = serde_json::to_string(component).unwrap();
            assert_eq!(json, format!("\"{}\"", component.label()));
        }
    }

    #[test]
    fn test_messagepack_persistence() {
        let saved = (
            RotationMode::SwingTwistY,
            TransformSpace::LocalSpace,
            TransformComponent::RotW,
        );
        let bytes = rmp_serde::to_vec(&saved).unwrap();
        let restored: (RotationMode, TransformSpace, TransformComponent) =
            rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(saved, restored);
    }

    #[test]
    fn test_component_axes() {
        assert_eq!(TransformComponent::RotW.axis(), Axis::W);
        assert_eq!(TransformComponent::ScaleY.axis(), Axis::Y);
        assert_eq!(TransformComponent::LocZ.channel(), Channel::Location);
        assert_eq!(Axis::W.vector_index(), None);
        assert_eq!(Axis::Z.quaternion_index(), 3);
    }

    #[test]
    fn test_rotation_kind() {
        assert_eq!(
            RotationMode::YZX.kind(),
            RotationKind::Euler(EulerOrder::YZX)
        );
        assert_eq!(
            RotationMode::SwingTwistX.kind(),
            RotationKind::SwingTwist(Axis::X)
        );
        assert_eq!(RotationMode::from(EulerOrder::ZXY), RotationMode::ZXY);
    }
}
