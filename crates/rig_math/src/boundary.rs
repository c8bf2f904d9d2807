//! Validation at the untyped boundary.
//!
//! Callers that hold selectors as text or JSON (saved driver settings,
//! scripting bridges, the command line) enter through here. Checks run in a
//! fixed order before any computation:
//!
//! 1. Every selector must be a string ([`TransformError::TypeMismatch`]).
//! 2. The matrix must be 4×4 ([`TransformError::InvalidArgument`]).
//! 3. Every selector must be a known label ([`TransformError::InvalidArgument`]).
//! 4. In strict mode, matrix entries must be finite.

use glam::Mat4;
use serde_json::Value;

use crate::config::{self, ValidationConfig};
use crate::decompose::decompose_component;
use crate::error::TransformError;
use crate::selector::{RotationMode, Selector, TransformComponent};

const DECOMPOSE: &str = "decompose_component";

/// Returns the JSON type name of `value`, as used in type mismatch errors.
#[must_use]
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Require `value` to be a string and return it.
///
/// # Errors
///
/// Returns [`TransformError::TypeMismatch`] for any non-string value.
pub fn expect_str<'a>(
    value: &'a Value,
    context: &'static str,
    argument: &'static str,
) -> Result<&'a str, TransformError> {
    value.as_str().ok_or_else(|| {
        TransformError::TypeMismatch {
            context,
            argument,
            found: json_type_name(value).to_string(),
        }
        .reported()
    })
}

/// Parse a selector held in a JSON value.
///
/// # Errors
///
/// Returns [`TransformError::TypeMismatch`] if `value` is not a string, or
/// [`TransformError::InvalidArgument`] if it is not a known label.
pub fn selector_from_value<S: Selector>(
    value: &Value,
    context: &'static str,
) -> Result<S, TransformError> {
    let label = expect_str(value, context, S::ARGUMENT)?;
    S::parse_in(label, context)
}

/// Build a matrix from row-major rows.
///
/// # Errors
///
/// Returns [`TransformError::InvalidArgument`] unless there are exactly four
/// rows of four entries.
pub fn matrix_from_rows<R: AsRef<[f32]>>(
    rows: &[R],
    context: &'static str,
) -> Result<Mat4, TransformError> {
    let bad_row = rows.iter().map(|r| r.as_ref().len()).find(|&len| len != 4);
    if rows.len() != 4 || bad_row.is_some() {
        let cols = bad_row.unwrap_or_else(|| rows.first().map_or(0, |r| r.as_ref().len()));
        let shape = format!("{}x{}", rows.len(), cols);
        return Err(TransformError::bad_shape(context, "matrix", shape, "4x4").reported());
    }

    let mut cols = [[0.0_f32; 4]; 4];
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.as_ref().iter().enumerate() {
            cols[c][r] = *value;
        }
    }
    Ok(Mat4::from_cols_array_2d(&cols))
}

/// Build a matrix from a JSON array of row-major rows.
///
/// # Errors
///
/// Returns [`TransformError::InvalidArgument`] if `value` is not a 4×4 array
/// of numbers, or if an entry lies outside the `f32` range.
pub fn matrix_from_value(value: &Value, context: &'static str) -> Result<Mat4, TransformError> {
    let not_a_matrix = || {
        TransformError::bad_shape(context, "matrix", json_type_name(value), "4x4").reported()
    };
    let rows = value.as_array().ok_or_else(not_a_matrix)?;
    let rows = rows
        .iter()
        .map(|row| {
            row.as_array()
                .ok_or_else(not_a_matrix)?
                .iter()
                .map(|entry| {
                    let f = entry.as_f64().ok_or_else(not_a_matrix)?;
                    to_f32(f, context)
                })
                .collect::<Result<Vec<f32>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    matrix_from_rows(&rows, context)
}

/// Narrow a JSON number to `f32`, rejecting magnitudes that would become
/// infinite.
fn to_f32(value: f64, context: &'static str) -> Result<f32, TransformError> {
    if value.abs() > f64::from(f32::MAX) {
        return Err(TransformError::bad_shape(
            context,
            "matrix",
            value.to_string(),
            "a number within f32 range",
        )
        .reported());
    }
    Ok(value as f32)
}

/// Reject matrices with NaN or infinite entries when strict checks are on.
///
/// # Errors
///
/// Returns [`TransformError::InvalidArgument`] for a non-finite matrix in
/// strict mode.
pub fn check_finite(
    config: &ValidationConfig,
    matrix: &Mat4,
    context: &'static str,
) -> Result<(), TransformError> {
    if config.strict && !matrix.is_finite() {
        return Err(
            TransformError::bad_shape(context, "matrix", "non-finite", "finite").reported(),
        );
    }
    Ok(())
}

/// [`decompose_component`] over row-major rows and text selectors.
///
/// # Errors
///
/// Returns [`TransformError::InvalidArgument`] for a non-4×4 matrix or an
/// unknown component or rotation mode label.
pub fn decompose_rows<R: AsRef<[f32]>>(
    rows: &[R],
    component: &str,
    rotation_mode: &str,
    driver: bool,
) -> Result<f32, TransformError> {
    let matrix = matrix_from_rows(rows, DECOMPOSE)?;
    decompose_checked(&config::current(), &matrix, component, rotation_mode, driver)
}

/// [`decompose_component`] over JSON arguments.
///
/// # Errors
///
/// Returns [`TransformError::TypeMismatch`] if a selector is not a string, and
/// [`TransformError::InvalidArgument`] for a non-4×4 matrix or an unknown
/// label.
pub fn decompose_value(
    matrix: &Value,
    component: &Value,
    rotation_mode: &Value,
    driver: bool,
) -> Result<f32, TransformError> {
    decompose_value_with(&config::current(), matrix, component, rotation_mode, driver)
}

pub(crate) fn decompose_value_with(
    config: &ValidationConfig,
    matrix: &Value,
    component: &Value,
    rotation_mode: &Value,
    driver: bool,
) -> Result<f32, TransformError> {
    let component = expect_str(component, DECOMPOSE, TransformComponent::ARGUMENT)?;
    let rotation_mode = expect_str(rotation_mode, DECOMPOSE, RotationMode::ARGUMENT)?;
    let matrix = matrix_from_value(matrix, DECOMPOSE)?;
    decompose_checked(config, &matrix, component, rotation_mode, driver)
}

fn decompose_checked(
    config: &ValidationConfig,
    matrix: &Mat4,
    component: &str,
    rotation_mode: &str,
    driver: bool,
) -> Result<f32, TransformError> {
    let component = TransformComponent::parse_in(component, DECOMPOSE)?;
    let rotation_mode = RotationMode::parse_in(rotation_mode, DECOMPOSE)?;
    check_finite(config, matrix, DECOMPOSE)?;
    Ok(decompose_component(matrix, component, rotation_mode, driver))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Expected;
    use serde_json::json;

    fn identity_rows() -> Value {
        json!([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0]
        ])
    }

    #[test]
    fn test_identity_examples() {
        let m = identity_rows();
        let w = decompose_value(&m, &json!("ROT_W"), &json!("QUATERNION"), false).unwrap();
        assert_eq!(w, 1.0);
        let x = decompose_value(&m, &json!("LOC_X"), &json!("AUTO"), false).unwrap();
        assert_eq!(x, 0.0);
    }

    #[test]
    fn test_rows_are_row_major() {
        let rows = [
            [1.0, 0.0, 0.0, 7.0],
            [0.0, 1.0, 0.0, 8.0],
            [0.0, 0.0, 1.0, 9.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let m = matrix_from_rows(&rows, "test").unwrap();
        assert_eq!(m.w_axis.truncate(), glam::Vec3::new(7.0, 8.0, 9.0));
        assert_eq!(decompose_rows(&rows, "LOC_Z", "AUTO", false).unwrap(), 9.0);
    }

    #[test]
    fn test_three_by_three_is_rejected() {
        let rows = [[1.0_f32, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let err = decompose_rows(&rows, "ROT_X", "XYZ", false).unwrap_err();
        assert_eq!(
            err,
            TransformError::InvalidArgument {
                context: "decompose_component",
                argument: "matrix",
                value: "3x3".to_string(),
                expected: Expected::Shape("4x4"),
            }
        );
    }

    #[test]
    fn test_ragged_matrix_is_rejected() {
        let rows: Vec<Vec<f32>> = vec![vec![1.0; 4], vec![1.0; 4], vec![1.0; 3], vec![1.0; 4]];
        let err = matrix_from_rows(&rows, "test").unwrap_err();
        assert!(err.to_string().contains("4x3"));
    }

    #[test]
    fn test_type_mismatch_comes_first() {
        // Bad matrix and bad mode, but the non-string component wins.
        let err = decompose_value(&json!([[1.0]]), &json!(4), &json!("BOGUS"), false).unwrap_err();
        assert_eq!(
            err,
            TransformError::TypeMismatch {
                context: "decompose_component",
                argument: "transform_component",
                found: "number".to_string(),
            }
        );
    }

    #[test]
    fn test_shape_checked_before_labels() {
        let err = decompose_value(&json!("not a matrix"), &json!("BOGUS"), &json!("AUTO"), false)
            .unwrap_err();
        assert_eq!(err.argument(), "matrix");
    }

    #[test]
    fn test_unknown_labels() {
        let m = identity_rows();
        let err = decompose_value(&m, &json!("ROT_Q"), &json!("AUTO"), false).unwrap_err();
        assert_eq!(err.argument(), "transform_component");
        let err = decompose_value(&m, &json!("ROT_X"), &json!("EULER"), false).unwrap_err();
        assert_eq!(err.argument(), "rotation_mode");
    }

    #[test]
    fn test_out_of_range_entry_is_rejected() {
        let m = json!([
            [1.0, 0.0, 0.0, 1e39],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0]
        ]);
        let err = decompose_value(&m, &json!("LOC_X"), &json!("AUTO"), false).unwrap_err();
        assert_eq!(err.argument(), "matrix");
        assert!(matches!(
            err,
            TransformError::InvalidArgument {
                expected: Expected::Shape("a number within f32 range"),
                ..
            }
        ));

        let m = json!([
            [1.0, 0.0, 0.0, -3.0e38],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0]
        ]);
        let x = decompose_value(&m, &json!("LOC_X"), &json!("AUTO"), false).unwrap();
        assert_eq!(x, -3.0e38_f64 as f32);
    }

    #[test]
    fn test_strict_rejects_non_finite_matrix() {
        let rows = [
            [f32::NAN, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        let matrix = matrix_from_rows(&rows, "test").unwrap();
        let strict = ValidationConfig::default().with_strict(true);
        assert!(check_finite(&strict, &matrix, "test").is_err());
        assert!(check_finite(&ValidationConfig::default(), &matrix, "test").is_ok());
    }

    #[test]
    fn test_selector_from_value() {
        let space: crate::TransformSpace =
            selector_from_value(&json!("LOCAL_SPACE"), "test").unwrap();
        assert_eq!(space, crate::TransformSpace::LocalSpace);
        let err = selector_from_value::<crate::TransformSpace>(&json!(null), "test").unwrap_err();
        assert!(matches!(err, TransformError::TypeMismatch { .. }));
    }
}
