//! Encoder engine: any `Serialize` value into a [`Value`] tree.
//!
//! [`Serializer`] is the single-value container. It is consumed by value, so
//! a scope can hand out exactly one container: [`KeyedContainer`] for structs
//! and maps, [`UnkeyedContainer`] for sequences and tuples, or a scalar leaf.
//! Each container owns the values written into it and yields its finished
//! [`Value`] from `end`.

use serde::{Serialize, ser};

use crate::{
    Blob, EncodeConfig, Error, ErrorKind, Interceptor, Map, Result, Value, path::PathScope,
    util::cold_path,
};

/// Encoder implementing [`serde::Serializer`] with [`Value`] as output.
///
/// Prefer [`to_value`] or [`DocumentEncoder`](crate::DocumentEncoder) over
/// driving this type directly.
#[derive(Clone, Copy)]
pub struct Serializer<'a> {
    pub(crate) path: PathScope<'a>,
    config: &'a EncodeConfig,
    depth: usize,
    limit: usize,
}

impl<'a> Serializer<'a> {
    /// A serializer positioned at the root of a fresh tree.
    #[inline]
    pub fn new(config: &'a EncodeConfig) -> Self {
        Self {
            path: PathScope::Root,
            config,
            depth: 0,
            limit: config.max_depth,
        }
    }

    /// Serializer for an interceptor payload. The payload shape is fixed by
    /// the interceptor, so it does not count towards nesting.
    #[inline]
    pub(crate) fn payload(self) -> Self {
        Self {
            depth: 0,
            limit: usize::MAX,
            ..self
        }
    }

    /// Opens `levels` nested containers at the current path.
    fn enter(self, levels: usize) -> Result<Self> {
        let depth = self.depth + levels;
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
    fn scoped<'b>(&'b self, path: PathScope<'b>) -> Serializer<'b> {
        Serializer {
            path,
            config: self.config,
            depth: self.depth,
            limit: self.limit,
        }
    }

    /// Encodes a child value one segment below this container.
    fn encode<T>(&self, path: PathScope<'_>, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value
            .serialize(self.scoped(path))
            .map_err(|e| e.or_at(path))
    }
}

/// Encodes `value` into a [`Value`] tree with the default configuration.
///
/// Unlike [`encode`](crate::encode) the result may be any kind of value, not
/// only a map.
///
/// # Example
///
/// ```
/// use firestore_codec::{Value, to_value};
///
/// let tree = to_value(&(1u8, "two")).unwrap();
/// assert_eq!(tree, Value::Array(vec![Value::Integer(1), Value::from("two")]));
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - An unsigned or 128-bit integer does not fit `i64` ([`ErrorKind::NumberOutOfRange`])
/// - A map key does not encode to a string ([`ErrorKind::KeyMustBeString`])
/// - Containers nest deeper than [`EncodeConfig::max_depth`]
/// - A `Serialize` implementation misuses a container ([`ErrorKind::ContractViolation`])
#[inline]
pub fn to_value<T>(value: &T) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    to_value_with(value, &EncodeConfig::default())
}

/// Encodes `value` into a [`Value`] tree with an explicit configuration.
pub fn to_value_with<T>(value: &T, config: &EncodeConfig) -> Result<Value>
where
    T: ?Sized + Serialize,
{
    value
        .serialize(Serializer::new(config))
        .map_err(|e| e.or_at(PathScope::Root))
}

impl<'a> ser::Serializer for Serializer<'a> {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = UnkeyedContainer<'a>;
    type SerializeTuple = UnkeyedContainer<'a>;
    type SerializeTupleStruct = UnkeyedContainer<'a>;
    type SerializeTupleVariant = TupleVariantContainer<'a>;
    type SerializeMap = KeyedContainer<'a>;
    type SerializeStruct = KeyedContainer<'a>;
    type SerializeStructVariant = StructVariantContainer<'a>;

    #[inline]
    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    #[inline]
    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    #[inline]
    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    #[inline]
    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    #[inline]
    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Integer(v))
    }

    #[cfg(feature = "i128")]
    fn serialize_i128(self, v: i128) -> Result<Value> {
        match i64::try_from(v) {
            Ok(v) => Ok(Value::Integer(v)),
            Err(_) => {
                cold_path();
                Err(Error::out_of_range(v, "i64", self.path))
            }
        }
    }

    #[inline]
    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    #[inline]
    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    #[inline]
    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        match i64::try_from(v) {
            Ok(v) => Ok(Value::Integer(v)),
            Err(_) => {
                cold_path();
                Err(Error::out_of_range(v, "i64", self.path))
            }
        }
    }

    #[cfg(feature = "i128")]
    fn serialize_u128(self, v: u128) -> Result<Value> {
        match i64::try_from(v) {
            Ok(v) => Ok(Value::Integer(v)),
            Err(_) => {
                cold_path();
                Err(Error::out_of_range(v, "i64", self.path))
            }
        }
    }

    #[inline]
    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::Double(f64::from(v)))
    }

    #[inline]
    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Double(v))
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    #[inline]
    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_owned()))
    }

    /// Raw bytes are always a blob leaf, never an array of numbers.
    #[inline]
    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(Blob::from(v).into())
    }

    #[inline]
    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    #[inline]
    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    #[inline]
    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        match Interceptor::lookup(name) {
            Some(interceptor) => interceptor.encode(value, self),
            None => value.serialize(self),
        }
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        let frame = self.enter(1)?;
        let payload = frame.encode(frame.path.key(variant), value)?;
        let mut map = Map::with_capacity(1);
        map.insert(variant.to_owned(), payload);
        Ok(Value::Map(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<UnkeyedContainer<'a>> {
        Ok(UnkeyedContainer {
            frame: self.enter(1)?,
            items: Vec::with_capacity(len.unwrap_or(0).min(4096)),
        })
    }

    #[inline]
    fn serialize_tuple(self, len: usize) -> Result<UnkeyedContainer<'a>> {
        self.serialize_seq(Some(len))
    }

    #[inline]
    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<UnkeyedContainer<'a>> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<TupleVariantContainer<'a>> {
        Ok(TupleVariantContainer {
            variant,
            frame: self.enter(2)?,
            items: Vec::with_capacity(len.min(4096)),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<KeyedContainer<'a>> {
        Ok(KeyedContainer {
            frame: self.enter(1)?,
            map: Map::with_capacity(len.unwrap_or(0).min(4096)),
            pending_key: None,
        })
    }

    #[inline]
    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<KeyedContainer<'a>> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructVariantContainer<'a>> {
        Ok(StructVariantContainer {
            variant,
            frame: self.enter(2)?,
            map: Map::with_capacity(len.min(4096)),
        })
    }
}

/// Ordered sequence being written; the next element lands at index
/// `items.len()`.
pub struct UnkeyedContainer<'a> {
    frame: Serializer<'a>,
    items: Vec<Value>,
}

impl UnkeyedContainer<'_> {
    fn push<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let index = self.items.len();
        let value = self.frame.encode(self.frame.path.index(index), value)?;
        self.items.push(value);
        Ok(())
    }
}

impl ser::SerializeSeq for UnkeyedContainer<'_> {
    type Ok = Value;
    type Error = Error;

    #[inline]
    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    #[inline]
    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for UnkeyedContainer<'_> {
    type Ok = Value;
    type Error = Error;

    #[inline]
    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    #[inline]
    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTupleStruct for UnkeyedContainer<'_> {
    type Ok = Value;
    type Error = Error;

    #[inline]
    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.push(value)
    }

    #[inline]
    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.items))
    }
}

/// Keyed scope being written. Writing a key twice keeps the last value.
pub struct KeyedContainer<'a> {
    frame: Serializer<'a>,
    map: Map,
    pending_key: Option<String>,
}

impl ser::SerializeMap for KeyedContainer<'_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        if self.pending_key.is_some() {
            cold_path();
            return Err(Error::contract_violation(
                "map key written while the previous key still has no value",
            ));
        }
        let key = key
            .serialize(MapKeySerializer)
            .map_err(|e| e.or_at(self.frame.path))?;
        self.pending_key = Some(key);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let Some(key) = self.pending_key.take() else {
            cold_path();
            return Err(Error::contract_violation("map value written before its key"));
        };
        let value = self.frame.encode(self.frame.path.key(&key), value)?;
        self.map.insert(key, value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        if let Some(key) = self.pending_key {
            cold_path();
            return Err(Error::contract_violation(format!(
                "map closed while key `{key}` still has no value"
            )));
        }
        Ok(Value::Map(self.map))
    }
}

impl ser::SerializeStruct for KeyedContainer<'_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let value = self.frame.encode(self.frame.path.key(key), value)?;
        if !(value.is_null() && self.frame.config.omit_null_fields) {
            self.map.insert(key.to_owned(), value);
        }
        Ok(())
    }

    #[inline]
    fn end(self) -> Result<Value> {
        Ok(Value::Map(self.map))
    }
}

/// `{variant: [fields...]}`
pub struct TupleVariantContainer<'a> {
    variant: &'static str,
    frame: Serializer<'a>,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for TupleVariantContainer<'_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let index = self.items.len();
        let variant = self.frame.path.key(self.variant);
        let value = self.frame.encode(variant.index(index), value)?;
        self.items.push(value);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = Map::with_capacity(1);
        map.insert(self.variant.to_owned(), Value::Array(self.items));
        Ok(Value::Map(map))
    }
}

/// `{variant: {fields...}}`
pub struct StructVariantContainer<'a> {
    variant: &'static str,
    frame: Serializer<'a>,
    map: Map,
}

impl ser::SerializeStructVariant for StructVariantContainer<'_> {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let variant = self.frame.path.key(self.variant);
        let value = self.frame.encode(variant.key(key), value)?;
        if !(value.is_null() && self.frame.config.omit_null_fields) {
            self.map.insert(key.to_owned(), value);
        }
        Ok(())
    }

    fn end(self) -> Result<Value> {
        let mut map = Map::with_capacity(1);
        map.insert(self.variant.to_owned(), Value::Map(self.map));
        Ok(Value::Map(map))
    }
}

#[inline]
fn key_must_be_string() -> Error {
    cold_path();
    Error::new(ErrorKind::KeyMustBeString)
}

/// Turns a map key into the string the tree stores it under.
struct MapKeySerializer;

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = Error;

    type SerializeSeq = ser::Impossible<String, Error>;
    type SerializeTuple = ser::Impossible<String, Error>;
    type SerializeTupleStruct = ser::Impossible<String, Error>;
    type SerializeTupleVariant = ser::Impossible<String, Error>;
    type SerializeMap = ser::Impossible<String, Error>;
    type SerializeStruct = ser::Impossible<String, Error>;
    type SerializeStructVariant = ser::Impossible<String, Error>;

    #[inline]
    fn serialize_str(self, v: &str) -> Result<String> {
        Ok(v.to_owned())
    }

    #[inline]
    fn serialize_char(self, v: char) -> Result<String> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_i8(self, v: i8) -> Result<String> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_i16(self, v: i16) -> Result<String> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_i32(self, v: i32) -> Result<String> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_i64(self, v: i64) -> Result<String> {
        Ok(v.to_string())
    }

    #[cfg(feature = "i128")]
    #[inline]
    fn serialize_i128(self, v: i128) -> Result<String> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_u8(self, v: u8) -> Result<String> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_u16(self, v: u16) -> Result<String> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_u32(self, v: u32) -> Result<String> {
        Ok(v.to_string())
    }

    #[inline]
    fn serialize_u64(self, v: u64) -> Result<String> {
        Ok(v.to_string())
    }

    #[cfg(feature = "i128")]
    #[inline]
    fn serialize_u128(self, v: u128) -> Result<String> {
        Ok(v.to_string())
    }

    /// Fieldless enums key by variant name.
    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String> {
        Ok(variant.to_owned())
    }

    #[inline]
    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_f32(self, _v: f32) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_f64(self, _v: f64) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_none(self) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_string())
    }

    fn serialize_unit(self) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String> {
        Err(key_must_be_string())
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_string())
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Err(key_must_be_string())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Err(key_must_be_string())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Err(key_must_be_string())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Err(key_must_be_string())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Err(key_must_be_string())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Err(key_must_be_string())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Err(key_must_be_string())
    }
}
