//! Composition of a base type's encoded form with a derived type's fields.
//!
//! [`Extends<B, T>`] encodes to one keyed scope holding the fields of `T`
//! alongside a nested map under [`SUPER_KEY`] that holds the fields of `B`:
//!
//! ```text
//! { "super": { ...fields of B... }, ...fields of T... }
//! ```
//!
//! The base always lives in its own nested scope, so `B` and `T` can use the
//! same field names. Only `T` declaring a field literally named `super`
//! collides with the base; in that case the last written entry wins.
//!
//! # Example
//!
//! ```
//! use firestore_codec::{Extends, Value, decode, encode};
//! use std::{fmt, marker::PhantomData};

use std::{fmt, marker::PhantomData};

use serde::{
    Deserialize, Deserializer, Serialize,
    de::{self, MapAccess, SeqAccess, Visitor, value::MapAccessDeserializer},
};

/// Reserved key of the base scope inside an [`Extends`] document.
pub const SUPER_KEY: &str = "super";

pub(crate) const EXTENDS_TOKEN: &str = "$__firestore_codec_private_Extends";

/// A derived value `this` layered over its `base`.
///
/// `T` must encode to a keyed container (a struct or a map); its entries are
/// written into the same scope as the `super` entry.
///
/// When decoded from a [`Value`](crate::Value) both halves go through the
/// decoder engine itself, so numeric coercion, opaque leaves and error paths
/// behave exactly as they do for plain struct fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Extends<B, T> {
    #[serde(rename = "super")]
    pub base: B,
    #[serde(flatten)]
    pub this: T,
}

impl<B, T> Extends<B, T> {
    #[inline]
    pub const fn new(base: B, this: T) -> Self {
        Self { base, this }
    }

    #[inline]
    pub fn into_parts(self) -> (B, T) {
        (self.base, self.this)
    }
}

impl<'de, B, T> Deserialize<'de> for Extends<B, T>
where
    B: Deserialize<'de>,
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_struct(EXTENDS_TOKEN, &[SUPER_KEY], ExtendsVisitor(PhantomData))
    }
}

struct ExtendsVisitor<B, T>(PhantomData<(B, T)>);

impl<'de, B, T> Visitor<'de> for ExtendsVisitor<B, T>
where
    B: Deserialize<'de>,
    T: Deserialize<'de>,
{
    type Value = Extends<B, T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map with a `super` entry")
    }

    /// The decoder engine hands over the base and the derived half in order.
    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let base = seq
            .next_element()?
            .ok_or_else(|| <A::Error as de::Error>::missing_field(SUPER_KEY))?;
        let this = seq
            .next_element()?
            .ok_or_else(|| <A::Error as de::Error>::invalid_length(1, &self))?;
        Ok(Extends::new(base, this))
    }

    /// Other formats present the whole map.
    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let Flattened { base, this } = Flattened::deserialize(MapAccessDeserializer::new(map))?;
        Ok(Extends::new(base, this))
    }
}

#[derive(Deserialize)]
struct Flattened<B, T> {
    #[serde(rename = "super")]
    base: B,
    #[serde(flatten)]
    this: T,
}
