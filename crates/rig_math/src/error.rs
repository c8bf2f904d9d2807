//! Validation error types.
//!
//! Every fallible operation in the rig crates reports one of two failures: a
//! selector that was not a string at all ([`TransformError::TypeMismatch`]), or
//! a value outside its valid set or shape ([`TransformError::InvalidArgument`]).

use std::fmt;

use tracing::error;

/// What an argument was expected to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// One of a fixed list of labels.
    OneOf(&'static [&'static str]),
    /// A description of the required value, e.g. a matrix shape.
    Shape(&'static str),
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneOf(labels) => {
                f.write_str("(")?;
                for (i, label) in labels.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "'{label}'")?;
                }
                f.write_str(")")
            }
            Self::Shape(shape) => f.write_str(shape),
        }
    }
}

/// Errors raised while validating transform inputs.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    /// A selector argument was not a string.
    #[error("{context}: expected {argument} to be str, not {found}")]
    TypeMismatch {
        /// The operation that rejected the input.
        context: &'static str,
        /// The argument name.
        argument: &'static str,
        /// The type that was supplied instead.
        found: String,
    },

    /// An argument was not a member of its valid set, or had the wrong shape.
    #[error("{}", invalid_message(.context, .argument, .value, .expected))]
    InvalidArgument {
        /// The operation that rejected the input.
        context: &'static str,
        /// The argument name.
        argument: &'static str,
        /// The offending value, rendered as text.
        value: String,
        /// What would have been accepted.
        expected: Expected,
    },
}

fn invalid_message(context: &str, argument: &str, value: &str, expected: &Expected) -> String {
    match expected {
        Expected::OneOf(_) => format!("{context}: {argument} {value} not found in {expected}."),
        Expected::Shape(shape) => {
            format!("{context}: expected {argument} to be {shape}, not {value}.")
        }
    }
}

impl TransformError {
    /// Build an [`TransformError::InvalidArgument`] for a label outside `valid`.
    #[must_use]
    pub fn unknown_label(
        context: &'static str,
        argument: &'static str,
        value: impl Into<String>,
        valid: &'static [&'static str],
    ) -> Self {
        Self::InvalidArgument {
            context,
            argument,
            value: value.into(),
            expected: Expected::OneOf(valid),
        }
    }

    /// Build an [`TransformError::InvalidArgument`] for a value of the wrong shape.
    #[must_use]
    pub fn bad_shape(
        context: &'static str,
        argument: &'static str,
        value: impl Into<String>,
        shape: &'static str,
    ) -> Self {
        Self::InvalidArgument {
            context,
            argument,
            value: value.into(),
            expected: Expected::Shape(shape),
        }
    }

    /// Returns the operation that rejected the input.
    #[must_use]
    pub fn context(&self) -> &'static str {
        match self {
            Self::TypeMismatch { context, .. } | Self::InvalidArgument { context, .. } => context,
        }
    }

    /// Returns the name of the rejected argument.
    #[must_use]
    pub fn argument(&self) -> &'static str {
        match self {
            Self::TypeMismatch { argument, .. } | Self::InvalidArgument { argument, .. } => {
                argument
            }
        }
    }

    /// Rewrite the context, keeping everything else.
    ///
    /// Lets a public operation claim an error raised by a shared parser.
    #[must_use]
    pub fn in_context(mut self, new_context: &'static str) -> Self {
        match &mut self {
            Self::TypeMismatch { context, .. } | Self::InvalidArgument { context, .. } => {
                *context = new_context;
            }
        }
        self
    }

    /// Log the error through `tracing` when error logging is enabled.
    ///
    /// Returns the error so call sites can write `return Err(err.reported())`.
    #[must_use]
    pub fn reported(self) -> Self {
        if crate::config::current().log_errors {
            error!(
                context = self.context(),
                argument = self.argument(),
                "{}",
                self
            );
        }
        self
    }
}
