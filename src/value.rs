//! The dynamic value tree.
//!
//! [`Value`] is what a document looks like once its Rust types are gone:
//! maps with string keys, ordered arrays, scalars, and two opaque leaves
//! (timestamps and blobs) the tree carries without interpreting.
//!
//! ```
//! use firestore_codec::{Map, Value};
//!
//! let mut doc = Map::new();
//! doc.insert("title".to_owned(), "Hello".into());
//! doc.insert("tags".to_owned(), vec!["a", "b"].into());
//! let doc = Value::Map(doc);
//!
//! assert_eq!(doc["title"].as_str(), Some("Hello"));
//! assert_eq!(doc["tags"][1].as_str(), Some("b"));
//! assert!(doc["missing"].is_null());
//! ```

mod from;
mod index;
#[cfg(feature = "json")]
mod json;
mod kind;
mod serde_impl;

use indexmap::IndexMap;

pub use index::Index;
pub use kind::ValueKind;

use crate::{Blob, Timestamp};

/// Keyed container of the tree. Keys are unique; iteration follows insertion
/// order while equality ignores it.
pub type Map = IndexMap<String, Value>;

/// A node of the dynamic value tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Double(f64),
    String(String),
    Array(Vec<Value>),
    Map(Map),
    Opaque(Opaque),
}

/// Leaves with no native representation in the tree, carried as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Opaque {
    Timestamp(Timestamp),
    Blob(Blob),
}

impl Opaque {
    #[inline]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Opaque::Timestamp(_) => ValueKind::Timestamp,
            Opaque::Blob(_) => ValueKind::Blob,
        }
    }
}

impl Value {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Integer(_) => ValueKind::Integer,
            Value::Double(_) => ValueKind::Double,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Map(_) => ValueKind::Map,
            Value::Opaque(opaque) => opaque.kind(),
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    pub const fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    #[inline]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Integers, and doubles without a fractional part that fit in `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Integer(v) => Some(v),
            Value::Double(v) if v.fract() == 0.0 && v >= -(2f64.powi(63)) && v < 2f64.powi(63) => {
                Some(v as i64)
            }
            _ => None,
        }
    }

    /// Doubles, and integers an `f64` holds exactly.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Double(v) => Some(v),
            Value::Integer(v) if v.unsigned_abs() <= crate::util::F64_EXACT_INT => {
                Some(v as f64)
            }
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Opaque(Opaque::Timestamp(v)) => Some(*v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            Value::Opaque(Opaque::Blob(v)) => Some(v),
            _ => None,
        }
    }

    /// Looks up a map entry by key or an array element by position.
    #[inline]
    pub fn get<I: Index>(&self, index: I) -> Option<&Value> {
        index.index_into(self)
    }

    #[inline]
    pub fn get_mut<I: Index>(&mut self, index: I) -> Option<&mut Value> {
        index.index_into_mut(self)
    }

    /// Replaces the value with `Null` and returns what was there.
    #[inline]
    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }
}
