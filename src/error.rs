//! Error types for encoding and decoding.
//!
//! Every failure is a single [`Error`]: an [`ErrorKind`] saying what went
//! wrong plus the [`CodingPath`] of the value that could not be encoded or
//! decoded. Only [`ErrorKind::ContractViolation`] has no path, because it
//! reports a misbehaving `Serialize`/`Deserialize` implementation rather than
//! bad data.
//!
//! # Example
//!
//! ```
//! use firestore_codec::{ErrorKind, Value, from_value};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug)]
//! struct Inner {
//!     count: i32,
//! }
//!
//! #[derive(Deserialize, Debug)]
//! struct Outer {
//!     items: Vec<Inner>,
//! }
//!
//! let tree: Value = serde_json::json!({ "items": [{ "count": "three" }] }).into();
//! let err = from_value::<Outer>(&tree).unwrap_err();
//!
//! assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
//! assert_eq!(err.path().unwrap().describe(), "items[0].count");
//! ```

use std::fmt::{self, Display};

use serde::{de, ser};

use crate::{CodingPath, ValueKind, path::PathScope};

/// Alias for a `Result` with the error type [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// What went wrong, without the location.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The value found at a path does not have the shape the target type
    /// asked for.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    /// A required key is absent from a keyed container.
    #[error("key not found: `{key}`")]
    KeyNotFound { key: String },

    /// A number cannot be converted without losing information.
    #[error("number out of range: {value} cannot be represented as {target}")]
    NumberOutOfRange { value: String, target: &'static str },

    /// A document must encode to, or be decoded from, a map.
    #[error("top-level value must be a map, found {found}")]
    TopLevelTypeMismatch { found: ValueKind },

    /// A `Serialize`/`Deserialize` implementation drove a container in an
    /// order the container does not allow.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    /// Map keys must encode to strings.
    #[error("map key must be a string")]
    KeyMustBeString,

    /// More nested containers than the configured limit.
    #[error("nesting exceeds the limit of {limit} containers")]
    DepthLimitExceeded { limit: usize },

    /// An enum variant name the target type does not know.
    #[error("unknown variant `{variant}`, expected {expected}")]
    UnknownVariant { variant: String, expected: String },

    /// A key rejected by a target that denies unknown fields.
    #[error("unknown field `{field}`, expected {expected}")]
    UnknownField { field: String, expected: String },

    /// The right kind of value, but not one the target accepts.
    #[error("invalid value: expected {expected}, found {found}")]
    InvalidValue { expected: String, found: String },

    /// A sequence with the wrong number of elements.
    #[error("invalid length {len}, expected {expected}")]
    InvalidLength { len: usize, expected: String },

    /// Free-form message from a `Serialize`/`Deserialize` implementation.
    #[error("{0}")]
    Message(String),
}

/// This type represents all possible errors that can occur when encoding a
/// value into a [`Value`](crate::Value) tree or decoding one out of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    path: Option<CodingPath>,
}

impl Error {
    /// An error not yet attached to a location.
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, path: None }
    }

    /// An error at an explicit location.
    #[inline]
    pub fn with_path(kind: ErrorKind, path: CodingPath) -> Self {
        Self {
            kind,
            path: Some(path),
        }
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Location of the failing value; `None` only for contract violations.
    #[inline]
    pub fn path(&self) -> Option<&CodingPath> {
        self.path.as_ref()
    }

    /// `true` if the error points at a programming mistake in a
    /// `Serialize`/`Deserialize` implementation rather than at the data.
    #[inline]
    pub fn is_contract_violation(&self) -> bool {
        matches!(self.kind, ErrorKind::ContractViolation(_))
    }

    pub(crate) fn at(kind: ErrorKind, scope: PathScope<'_>) -> Self {
        Self {
            kind,
            path: Some(scope.to_path()),
        }
    }

    pub(crate) fn contract_violation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ContractViolation(message.into()))
    }

    pub(crate) fn type_mismatch(
        expected: impl Display,
        found: ValueKind,
        scope: PathScope<'_>,
    ) -> Self {
        Self::at(
            ErrorKind::TypeMismatch {
                expected: expected.to_string(),
                found: found.to_string(),
            },
            scope,
        )
    }

    pub(crate) fn out_of_range(
        value: impl Display,
        target: &'static str,
        scope: PathScope<'_>,
    ) -> Self {
        Self::at(
            ErrorKind::NumberOutOfRange {
                value: value.to_string(),
                target,
            },
            scope,
        )
    }

    /// Attaches `scope` unless the error already knows where it happened.
    /// The innermost location wins.
    pub(crate) fn or_at(mut self, scope: PathScope<'_>) -> Self {
        if self.path.is_none() && !self.is_contract_violation() {
            self.path = Some(scope.to_path());
        }
        self
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::new(ErrorKind::Message(msg.to_string()))
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::new(ErrorKind::Message(msg.to_string()))
    }

    fn invalid_type(unexp: de::Unexpected<'_>, exp: &dyn de::Expected) -> Self {
        Error::new(ErrorKind::TypeMismatch {
            expected: exp.to_string(),
            found: unexp.to_string(),
        })
    }

    fn invalid_value(unexp: de::Unexpected<'_>, exp: &dyn de::Expected) -> Self {
        Error::new(ErrorKind::InvalidValue {
            expected: exp.to_string(),
            found: unexp.to_string(),
        })
    }

    fn invalid_length(len: usize, exp: &dyn de::Expected) -> Self {
        Error::new(ErrorKind::InvalidLength {
            len,
            expected: exp.to_string(),
        })
    }

    fn unknown_variant(variant: &str, expected: &'static [&'static str]) -> Self {
        Error::new(ErrorKind::UnknownVariant {
            variant: variant.to_owned(),
            expected: one_of(expected),
        })
    }

    fn unknown_field(field: &str, expected: &'static [&'static str]) -> Self {
        Error::new(ErrorKind::UnknownField {
            field: field.to_owned(),
            expected: one_of(expected),
        })
    }

    fn missing_field(field: &'static str) -> Self {
        Error::new(ErrorKind::KeyNotFound {
            key: field.to_owned(),
        })
    }
}

fn one_of(names: &[&str]) -> String {
    match names {
        [] => "nothing".to_owned(),
        [only] => format!("`{only}`"),
        _ => {
            let quoted: Vec<String> = names.iter().map(|name| format!("`{name}`")).collect();
            format!("one of {}", quoted.join(", "))
        }
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        match &self.path {
            Some(path) => write!(formatter, "{} at {}", self.kind, path),
            None => Display::fmt(&self.kind, formatter),
        }
    }
}

impl std::error::Error for Error {}
