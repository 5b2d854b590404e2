//! Top-level entry points for whole documents.
//!
//! A document is always a map at the root. [`DocumentEncoder`] and
//! [`DocumentDecoder`] enforce that on top of the engines in
//! [`ser`](crate::ser) and [`de`](crate::de), which accept any shape.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    DecodeConfig, EncodeConfig, Error, ErrorKind, Result, Value, de::from_value_with,
    path::PathScope, ser::to_value_with, util::cold_path,
};

/// Encodes typed values into document trees.
///
/// Holds nothing but its configuration; every call runs a fresh engine, so
/// one encoder can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct DocumentEncoder {
    config: EncodeConfig,
}

impl DocumentEncoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_config(config: EncodeConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &EncodeConfig {
        &self.config
    }

    /// Encodes `value` into a map-rooted [`Value`].
    ///
    /// # Errors
    ///
    /// Everything [`to_value`](crate::to_value) reports, plus
    /// [`ErrorKind::TopLevelTypeMismatch`] when `value` does not encode to a
    /// map.
    pub fn encode<T>(&self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        debug!(
            type_name = std::any::type_name::<T>(),
            omit_null_fields = self.config.omit_null_fields,
            "encoding document"
        );
        let tree = to_value_with(value, &self.config).inspect_err(log_failure)?;
        match tree.as_map() {
            Some(map) => debug!(entries = map.len(), "encoded document"),
            None => {
                cold_path();
                let err = Error::at(
                    ErrorKind::TopLevelTypeMismatch { found: tree.kind() },
                    PathScope::Root,
                );
                log_failure(&err);
                return Err(err);
            }
        }
        Ok(tree)
    }
}

/// Decodes typed values out of document trees.
#[derive(Debug, Clone, Default)]
pub struct DocumentDecoder {
    config: DecodeConfig,
}

impl DocumentDecoder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decodes a `T` from a map-rooted [`Value`].
    ///
    /// The root is checked before any decoding starts, so a non-map input
    /// fails with [`ErrorKind::TopLevelTypeMismatch`] whatever `T` is.
    pub fn decode<'de, T>(&self, tree: &'de Value) -> Result<T>
    where
        T: Deserialize<'de>,
    {
        debug!(
            type_name = std::any::type_name::<T>(),
            found = %tree.kind(),
            "decoding document"
        );
        if !tree.is_map() {
            cold_path();
            let err = Error::at(
                ErrorKind::TopLevelTypeMismatch { found: tree.kind() },
                PathScope::Root,
            );
            log_failure(&err);
            return Err(err);
        }
        from_value_with(tree, &self.config).inspect_err(log_failure)
    }
}

fn log_failure(err: &Error) {
    debug!(
        kind = %err.kind(),
        path = %err.path().map(|p| p.describe()).unwrap_or_default(),
        "document coding failed"
    );
}

/// Encodes `value` as a document with the default configuration.
///
/// # Example
///
/// ```
/// use firestore_codec::{Value, encode};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct City {
///     name: String,
///     population: u32,
/// }
///
/// let tree = encode(&City { name: "Oslo".into(), population: 709_037 }).unwrap();
/// assert_eq!(tree["name"], Value::from("Oslo"));
/// assert_eq!(tree["population"], Value::Integer(709_037));
///
/// assert!(encode(&42).is_err());
/// ```
#[inline]
pub fn encode<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    DocumentEncoder::new().encode(value)
}

/// Decodes a document into a `T` with the default configuration.
#[inline]
pub fn decode<'de, T>(tree: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    DocumentDecoder::new().decode(tree)
}
