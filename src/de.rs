//! Decoder engine: a [`Value`] tree into any `Deserialize` type.
//!
//! # Value to Rust Type Mapping
//!
//! | Value | Rust Types |
//! |-------|------------|
//! | `Null` | `()`, unit structs, `None` |
//! | `Bool` | `bool` |
//! | `Integer` | every integer type in range; `f32`/`f64` when exactly representable |
//! | `Double` | `f32`/`f64`; integer types when integral and in range |
//! | `String` | `&str`, `String`, `char` (one character), unit enum variants |
//! | `Array` | `Vec<T>`, tuples, tuple structs, `[T; N]` |
//! | `Map` | structs, `HashMap<K, V>`/`BTreeMap<K, V>` with string or integer keys |
//! | single-entry `Map` | newtype, tuple and struct enum variants |
//! | `Timestamp` | [`Timestamp`](crate::Timestamp) |
//! | `Blob` | [`Blob`](crate::Blob), `&[u8]`/`Vec<u8>` through a bytes helper |
//!
//! Strings and bools never coerce to or from numbers. Numbers coerce between
//! each other only when the conversion is exact; anything else fails with
//! [`ErrorKind::NumberOutOfRange`](crate::ErrorKind::NumberOutOfRange).
//!
//! Keys present in a map but not asked for by the target type are ignored.
//! A sequence with elements left over after the target type stopped reading
//! is an error.

use serde::de::{
    self, Deserialize, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
    value::BorrowedStrDeserializer,
};

use crate::{
    DecodeConfig, Error, ErrorKind, Interceptor, Map, Opaque, Result, SUPER_KEY, Value, ValueKind,
    extends::EXTENDS_TOKEN,
    interceptor::timestamp_parts,
    path::PathScope,
    util::{F32_EXACT_INT, F64_EXACT_INT, cold_path},
};

const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Decoder implementing [`serde::Deserializer`] over a borrowed [`Value`].
///
/// Strings and blobs are handed to the visitor borrowed from the tree, so
/// targets like `&str` can decode without copying.
#[derive(Clone, Copy)]
pub struct Deserializer<'de, 'a> {
    value: &'de Value,
    path: PathScope<'a>,
    depth: usize,
    limit: usize,
    /// Key hidden from the map at this position, used to read the derived
    /// half of an [`Extends`](crate::Extends) without its base entry.
    skip: Option<&'static str>,
}

impl<'de> Deserializer<'de, 'static> {
    /// A deserializer positioned at the root of `value`.
    #[inline]
    pub fn new(value: &'de Value, config: &DecodeConfig) -> Self {
        Self {
            value,
            path: PathScope::Root,
            depth: 0,
            limit: config.max_depth,
            skip: None,
        }
    }
}

/// Decodes a `T` from a [`Value`] tree with the default configuration.
///
/// Unlike [`decode`](crate::decode) the tree may be any kind of value, not
/// only a map.
///
/// # Example
///
/// ```
/// use firestore_codec::{Value, from_value};
///
/// let tree = Value::from(vec![1, 2, 3]);
/// let numbers: Vec<u8> = from_value(&tree).unwrap();
/// assert_eq!(numbers, [1, 2, 3]);
/// ```
///
/// # Errors
///
/// Returns an error carrying the path of the offending value if:
/// - The tree's shape does not fit `T` ([`ErrorKind::TypeMismatch`])
/// - A required key is absent ([`ErrorKind::KeyNotFound`])
/// - A number cannot be converted exactly ([`ErrorKind::NumberOutOfRange`])
/// - Containers nest deeper than [`DecodeConfig::max_depth`]
#[inline]
pub fn from_value<'de, T>(value: &'de Value) -> Result<T>
where
    T: Deserialize<'de>,
{
    from_value_with(value, &DecodeConfig::default())
}

/// Decodes a `T` from a [`Value`] tree with an explicit configuration.
pub fn from_value_with<'de, T>(value: &'de Value, config: &DecodeConfig) -> Result<T>
where
    T: Deserialize<'de>,
{
    T::deserialize(Deserializer::new(value, config)).map_err(|e: Error| e.or_at(PathScope::Root))
}

impl<'de, 'a> Deserializer<'de, 'a> {
    #[inline]
    fn child<'b>(&'b self, value: &'de Value, path: PathScope<'b>) -> Deserializer<'de, 'b> {
        Deserializer {
            value,
            path,
            depth: self.depth,
            limit: self.limit,
            skip: None,
        }
    }

    /// Opens one nested container at the current path.
    fn enter(self) -> Result<Self> {
        let depth = self.depth + 1;
        if depth > self.limit {
            cold_path();
            return Err(Error::at(
                ErrorKind::DepthLimitExceeded { limit: self.limit },
                self.path,
            ));
        }
        Ok(Self { depth, ..self })
    }

    #[inline]
    fn mismatch(&self, expected: &str) -> Error {
        cold_path();
        Error::type_mismatch(expected, self.value.kind(), self.path)
    }

    fn integer<T>(&self, target: &'static str) -> Result<T>
    where
        T: TryFrom<i64>,
    {
        let n = match *self.value {
            Value::Integer(n) => n,
            Value::Double(f) if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) => {
                f as i64
            }
            Value::Double(f) => {
                cold_path();
                return Err(Error::out_of_range(f, target, self.path));
            }
            _ => return Err(self.mismatch(target)),
        };
        T::try_from(n).map_err(|_| {
            cold_path();
            Error::out_of_range(n, target, self.path)
        })
    }

    fn f64(&self) -> Result<f64> {
        match *self.value {
            Value::Double(f) => Ok(f),
            Value::Integer(n) if n.unsigned_abs() <= F64_EXACT_INT => Ok(n as f64),
            Value::Integer(n) => {
                cold_path();
                Err(Error::out_of_range(n, "f64", self.path))
            }
            _ => Err(self.mismatch("f64")),
        }
    }

    /// A finite double must survive the trip through `f32` unchanged. NaN
    /// and infinities pass through.
    fn f32(&self) -> Result<f32> {
        match *self.value {
            Value::Double(f) if f.is_finite() && f64::from(f as f32) != f => {
                cold_path();
                Err(Error::out_of_range(f, "f32", self.path))
            }
            Value::Double(f) => Ok(f as f32),
            Value::Integer(n) if n.unsigned_abs() <= F32_EXACT_INT => Ok(n as f32),
            Value::Integer(n) => {
                cold_path();
                Err(Error::out_of_range(n, "f32", self.path))
            }
            _ => Err(self.mismatch("f32")),
        }
    }

    fn visit_array<V>(self, items: &'de [Value], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let frame = self.enter()?;
        let mut seq = UnkeyedContainer {
            frame,
            iter: items.iter(),
            index: 0,
        };
        let value = visitor.visit_seq(&mut seq)?;
        let remaining = seq.iter.len();
        if remaining == 0 {
            Ok(value)
        } else {
            cold_path();
            Err(de::Error::invalid_length(items.len(), &"fewer elements in array"))
        }
    }

    fn visit_object<V>(self, map: &'de Map, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let frame = self.enter()?;
        visitor.visit_map(KeyedContainer {
            frame,
            iter: map.iter(),
            pending: None,
        })
    }

    /// Hands an `Extends` visitor two deserializers: the `super` entry one
    /// level down, then this same map with `super` hidden.
    fn visit_extends<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let Value::Map(map) = self.value else {
            return Err(self.mismatch("map"));
        };
        visitor
            .visit_seq(ExtendsContainer {
                frame: self,
                map,
                step: 0,
            })
            .map_err(|e: Error| e.or_at(self.path))
    }
}

impl<'de> de::Deserializer<'de> for Deserializer<'de, '_> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let result = match self.value {
            Value::Null => visitor.visit_unit(),
            Value::Bool(v) => visitor.visit_bool(*v),
            Value::Integer(v) => visitor.visit_i64(*v),
            Value::Double(v) => visitor.visit_f64(*v),
            Value::String(v) => visitor.visit_borrowed_str(v),
            Value::Array(v) => self.visit_array(v, visitor),
            Value::Map(v) => self.visit_object(v, visitor),
            Value::Opaque(Opaque::Timestamp(v)) => {
                visitor.visit_newtype_struct(timestamp_parts(*v))
            }
            Value::Opaque(Opaque::Blob(v)) => visitor.visit_borrowed_bytes(v.as_bytes()),
        };
        result.map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Bool(v) => visitor.visit_bool(*v).map_err(|e: Error| e.or_at(self.path)),
            _ => Err(self.mismatch("bool")),
        }
    }

    fn deserialize_i8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("i8")?;
        visitor.visit_i8(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_i16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("i16")?;
        visitor.visit_i16(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_i32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("i32")?;
        visitor.visit_i32(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("i64")?;
        visitor.visit_i64(v).map_err(|e: Error| e.or_at(self.path))
    }

    #[cfg(feature = "i128")]
    fn deserialize_i128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("i128")?;
        visitor.visit_i128(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_u8<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("u8")?;
        visitor.visit_u8(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_u16<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("u16")?;
        visitor.visit_u16(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_u32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("u32")?;
        visitor.visit_u32(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("u64")?;
        visitor.visit_u64(v).map_err(|e: Error| e.or_at(self.path))
    }

    #[cfg(feature = "i128")]
    fn deserialize_u128<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.integer("u128")?;
        visitor.visit_u128(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.f32()?;
        visitor.visit_f32(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.f64()?;
        visitor.visit_f64(v).map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let Value::String(s) = self.value else {
            return Err(self.mismatch("char"));
        };
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c).map_err(|e: Error| e.or_at(self.path)),
            _ => {
                cold_path();
                Err(Error::at(
                    ErrorKind::InvalidValue {
                        expected: "a single character".to_owned(),
                        found: format!("string {s:?}"),
                    },
                    self.path,
                ))
            }
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::String(v) => visitor
                .visit_borrowed_str(v)
                .map_err(|e: Error| e.or_at(self.path)),
            _ => Err(self.mismatch("string")),
        }
    }

    #[inline]
    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    /// Raw byte requests are served only by blob leaves.
    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Opaque(Opaque::Blob(v)) => visitor
                .visit_borrowed_bytes(v.as_bytes())
                .map_err(|e: Error| e.or_at(self.path)),
            _ => Err(self.mismatch(ValueKind::Blob.name())),
        }
    }

    #[inline]
    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let result = match self.value {
            Value::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        };
        result.map_err(|e: Error| e.or_at(self.path))
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Null => visitor.visit_unit().map_err(|e: Error| e.or_at(self.path)),
            _ => Err(self.mismatch("null")),
        }
    }

    #[inline]
    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match Interceptor::lookup(name) {
            Some(interceptor) => interceptor.decode(self.value, self.path, visitor),
            None => visitor
                .visit_newtype_struct(self)
                .map_err(|e: Error| e.or_at(self.path)),
        }
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Array(v) => self
                .visit_array(v, visitor)
                .map_err(|e: Error| e.or_at(self.path)),
            _ => Err(self.mismatch("array")),
        }
    }

    #[inline]
    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    #[inline]
    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.value {
            Value::Map(v) => self
                .visit_object(v, visitor)
                .map_err(|e: Error| e.or_at(self.path)),
            _ => Err(self.mismatch("map")),
        }
    }

    fn deserialize_struct<V>(
        self,
        name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        if name == EXTENDS_TOKEN {
            return self.visit_extends(visitor);
        }
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let result = match self.value {
            Value::String(variant) => {
                visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(variant))
            }
            Value::Map(map) if map.len() == 1 => match map.first() {
                Some((variant, value)) => {
                    let frame = self.enter()?;
                    visitor.visit_enum(VariantContent {
                        frame,
                        variant,
                        value,
                    })
                }
                None => Err(self.mismatch("enum")),
            },
            _ => Err(self.mismatch("string or single-entry map")),
        };
        result.map_err(|e: Error| e.or_at(self.path))
    }

    #[inline]
    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    /// Skipped values are not traversed, so they never trip the depth limit.
    #[inline]
    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }
}

/// Elements of an array, read front to back.
struct UnkeyedContainer<'de, 'a> {
    frame: Deserializer<'de, 'a>,
    iter: std::slice::Iter<'de, Value>,
    index: usize,
}

impl<'de> SeqAccess<'de> for UnkeyedContainer<'de, '_> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        let Some(value) = self.iter.next() else {
            return Ok(None);
        };
        let path = self.frame.path.index(self.index);
        self.index += 1;
        seed.deserialize(self.frame.child(value, path))
            .map(Some)
            .map_err(|e: Error| e.or_at(path))
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// Entries of a map in insertion order. The value of an entry must be read
/// after its key and before the next key.
struct KeyedContainer<'de, 'a> {
    frame: Deserializer<'de, 'a>,
    iter: indexmap::map::Iter<'de, String, Value>,
    pending: Option<(&'de str, &'de Value)>,
}

impl<'de> MapAccess<'de> for KeyedContainer<'de, '_> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self
            .iter
            .find(|(key, _)| Some(key.as_str()) != self.frame.skip)
        else {
            return Ok(None);
        };
        self.pending = Some((key.as_str(), value));
        seed.deserialize(MapKeyDeserializer { key })
            .map(Some)
            .map_err(|e: Error| e.or_at(self.frame.path))
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        let Some((key, value)) = self.pending.take() else {
            cold_path();
            return Err(Error::contract_violation("map value read before its key"));
        };
        let path = self.frame.path.key(key);
        seed.deserialize(self.frame.child(value, path))
            .map_err(|e: Error| e.or_at(path))
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

/// The two halves of an `Extends` map: base first, then the derived fields.
struct ExtendsContainer<'de, 'a> {
    frame: Deserializer<'de, 'a>,
    map: &'de Map,
    step: u8,
}

impl<'de> SeqAccess<'de> for ExtendsContainer<'de, '_> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        self.step += 1;
        match self.step {
            1 => {
                let Some(base) = self.map.get(SUPER_KEY) else {
                    cold_path();
                    return Err(<Error as de::Error>::missing_field(SUPER_KEY)
                        .or_at(self.frame.path));
                };
                let scope = self.frame.enter()?;
                let path = self.frame.path.key(SUPER_KEY);
                seed.deserialize(scope.child(base, path))
                    .map(Some)
                    .map_err(|e: Error| e.or_at(path))
            }
            2 => {
                let this = Deserializer {
                    skip: Some(SUPER_KEY),
                    ..self.frame
                };
                seed.deserialize(this).map(Some)
            }
            _ => Ok(None),
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(2usize.saturating_sub(self.step.into()))
    }
}

/// Payload of a `{variant: payload}` map.
struct VariantContent<'de, 'a> {
    frame: Deserializer<'de, 'a>,
    variant: &'de str,
    value: &'de Value,
}

impl<'de, 'a> EnumAccess<'de> for VariantContent<'de, 'a> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self)>
    where
        V: DeserializeSeed<'de>,
    {
        let variant = seed.deserialize(BorrowedStrDeserializer::<Error>::new(self.variant))?;
        Ok((variant, self))
    }
}

impl<'de> VariantAccess<'de> for VariantContent<'de, '_> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        let path = self.frame.path.key(self.variant);
        match self.value {
            Value::Null => Ok(()),
            _ => Err(self.frame.child(self.value, path).mismatch("null")),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        let path = self.frame.path.key(self.variant);
        seed.deserialize(self.frame.child(self.value, path))
            .map_err(|e: Error| e.or_at(path))
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.frame.path.key(self.variant);
        de::Deserializer::deserialize_seq(self.frame.child(self.value, path), visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let path = self.frame.path.key(self.variant);
        de::Deserializer::deserialize_map(self.frame.child(self.value, path), visitor)
    }
}

macro_rules! deserialize_integer_key {
    ($($method:ident => $visit:ident: $ty:ty),* $(,)?) => {
        $(
            fn $method<V>(self, visitor: V) -> Result<V::Value>
            where
                V: Visitor<'de>,
            {
                match self.key.parse::<$ty>() {
                    Ok(n) => visitor.$visit(n),
                    Err(_) => {
                        cold_path();
                        Err(de::Error::invalid_value(
                            de::Unexpected::Str(self.key),
                            &concat!("a map key parsable as ", stringify!($ty)),
                        ))
                    }
                }
            }
        )*
    };
}

/// Map keys are always strings in the tree; integer-keyed targets parse them.
struct MapKeyDeserializer<'de> {
    key: &'de str,
}

impl<'de> de::Deserializer<'de> for MapKeyDeserializer<'de> {
    type Error = Error;

    #[inline]
    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_borrowed_str(self.key)
    }

    deserialize_integer_key! {
        deserialize_i8 => visit_i8: i8,
        deserialize_i16 => visit_i16: i16,
        deserialize_i32 => visit_i32: i32,
        deserialize_i64 => visit_i64: i64,
        deserialize_u8 => visit_u8: u8,
        deserialize_u16 => visit_u16: u16,
        deserialize_u32 => visit_u32: u32,
        deserialize_u64 => visit_u64: u64,
    }

    #[cfg(feature = "i128")]
    deserialize_integer_key! {
        deserialize_i128 => visit_i128: i128,
        deserialize_u128 => visit_u128: u128,
    }

    #[inline]
    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    #[inline]
    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    #[inline]
    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_enum(BorrowedStrDeserializer::<Error>::new(self.key))
    }

    serde::forward_to_deserialize_any! {
        bool f32 f64 char str string bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn integer_keys_parse_from_strings() {
        let mut map = Map::new();
        map.insert("7".to_owned(), Value::from("seven"));
        map.insert("-1".to_owned(), Value::from("minus one"));
        let decoded: BTreeMap<i32, String> = from_value(&Value::Map(map)).unwrap();
        assert_eq!(decoded[&7], "seven");
        assert_eq!(decoded[&-1], "minus one");
    }

    #[test]
    fn non_numeric_key_for_integer_map_fails_at_container() {
        let mut inner = Map::new();
        inner.insert("x".to_owned(), Value::Bool(true));
        let mut outer = Map::new();
        outer.insert("flags".to_owned(), Value::Map(inner));
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Flags {
            flags: BTreeMap<u8, bool>,
        }
        let err = from_value::<Flags>(&Value::Map(outer)).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidValue { .. }));
        assert_eq!(err.path().unwrap().describe(), "flags");
    }

    #[test]
    fn leftover_elements_are_rejected() {
        let tree = Value::from(vec![1, 2, 3]);
        let err = from_value::<(i32, i32)>(&tree).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::InvalidLength {
                len: 3,
                expected: "fewer elements in array".to_owned(),
            }
        );
    }

    #[test]
    fn ignored_values_skip_depth_check() {
        #[derive(serde::Deserialize)]
        struct Shallow {
            a: i32,
        }
        let mut deep = Value::Null;
        for _ in 0..10 {
            deep = Value::Array(vec![deep]);
        }
        let tree: Value = [("a", Value::Integer(1)), ("deep", deep)]
            .into_iter()
            .collect();
        let config = DecodeConfig::default().with_max_depth(2);
        let shallow: Shallow = from_value_with(&tree, &config).unwrap();
        assert_eq!(shallow.a, 1);
    }
}
