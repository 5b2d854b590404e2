//! Fixed registry of types that bypass generic traversal.
//!
//! Serde has no way to ask "is this value a timestamp?", so the intercepted
//! types announce themselves: their `Serialize`/`Deserialize` impls go
//! through `serialize_newtype_struct`/`deserialize_newtype_struct` with a
//! reserved name. The engines look that name up once, at the point a
//! container writes or reads the value, and hand the payload to the matching
//! entry below instead of treating it as an ordinary newtype.
//!
//! The table is closed. Types outside it are encoded field by field.

use serde::{Serialize, de};
use tracing::trace;

use crate::{
    Blob, Error, Opaque, Result, Timestamp, Value, ValueKind,
    path::PathScope,
    ser::Serializer,
    util::cold_path,
};

pub(crate) const TIMESTAMP_TOKEN: &str = "$__firestore_codec_private_Timestamp";
pub(crate) const BLOB_TOKEN: &str = "$__firestore_codec_private_Blob";

/// A registered interception.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interceptor {
    Timestamp,
    Blob,
}

impl Interceptor {
    /// Every registered interception.
    pub const ALL: [Interceptor; 2] = [Interceptor::Timestamp, Interceptor::Blob];

    /// Finds the interception registered under a serde newtype name.
    #[inline]
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            TIMESTAMP_TOKEN => Some(Interceptor::Timestamp),
            BLOB_TOKEN => Some(Interceptor::Blob),
            _ => None,
        }
    }

    /// The reserved newtype name the intercepted type serializes under.
    #[inline]
    pub const fn token(self) -> &'static str {
        match self {
            Interceptor::Timestamp => TIMESTAMP_TOKEN,
            Interceptor::Blob => BLOB_TOKEN,
        }
    }

    /// Kind of the opaque leaf this interception produces and accepts.
    #[inline]
    pub const fn kind(self) -> ValueKind {
        match self {
            Interceptor::Timestamp => ValueKind::Timestamp,
            Interceptor::Blob => ValueKind::Blob,
        }
    }

    /// Encodes the payload of an intercepted newtype into its opaque leaf.
    pub(crate) fn encode<T>(self, payload: &T, serializer: Serializer<'_>) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        trace!(interceptor = ?self, "encoding intercepted value");
        let scope = serializer.path;
        // The payload shape is fixed, so it does not count towards nesting.
        let raw = payload
            .serialize(serializer.payload())
            .map_err(|e| e.or_at(scope))?;
        let leaf = match (self, raw) {
            (Interceptor::Blob, Value::Opaque(Opaque::Blob(blob))) => Some(Opaque::Blob(blob)),
            (Interceptor::Timestamp, Value::Array(parts)) => match parts.as_slice() {
                [Value::Integer(seconds), Value::Integer(nanos)] => u32::try_from(*nanos)
                    .ok()
                    .and_then(|nanos| Timestamp::new(*seconds, nanos))
                    .map(Opaque::Timestamp),
                _ => None,
            },
            _ => None,
        };
        match leaf {
            Some(leaf) => Ok(Value::Opaque(leaf)),
            None => {
                cold_path();
                Err(Error::contract_violation(format!(
                    "`{}` was used with a payload that is not a {}",
                    self.token(),
                    self.kind()
                )))
            }
        }
    }

    /// Feeds an opaque leaf to the visitor of the intercepted type. Anything
    /// other than the registered leaf kind is a type mismatch; there is no
    /// fallback to generic decoding.
    pub(crate) fn decode<'de, V>(
        self,
        value: &'de Value,
        scope: PathScope<'_>,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        trace!(interceptor = ?self, "decoding intercepted value");
        let result = match (self, value) {
            (Interceptor::Blob, Value::Opaque(Opaque::Blob(blob))) => {
                visitor.visit_newtype_struct(blob_parts(blob))
            }
            (Interceptor::Timestamp, Value::Opaque(Opaque::Timestamp(timestamp))) => {
                visitor.visit_newtype_struct(timestamp_parts(*timestamp))
            }
            _ => {
                cold_path();
                Err(Error::type_mismatch(self.kind(), value.kind(), scope))
            }
        };
        result.map_err(|e| e.or_at(scope))
    }
}

pub(crate) fn blob_parts(blob: &Blob) -> de::value::BorrowedBytesDeserializer<'_, Error> {
    de::value::BorrowedBytesDeserializer::new(blob.as_bytes())
}

pub(crate) type TimestampParts =
    de::value::SeqDeserializer<std::array::IntoIter<i64, 2>, Error>;

pub(crate) fn timestamp_parts(timestamp: Timestamp) -> TimestampParts {
    let parts = [timestamp.seconds(), i64::from(timestamp.nanos())];
    de::value::SeqDeserializer::new(parts.into_iter())
}
