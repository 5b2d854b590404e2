//! Conversions between [`Value`] and [`serde_json::Value`].
//!
//! JSON has no opaque leaves, so the trip into JSON is lossy for them: blobs
//! become base64 strings and timestamps become `{"seconds", "nanos"}` objects.
//! Non-finite doubles, which JSON cannot spell, become `null`.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde_json::{Number, Value as Json};

use super::{Opaque, Value};

impl From<Json> for Value {
    fn from(v: Json) -> Self {
        match v {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Double(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::String(s),
            Json::Array(arr) => Value::Array(arr.into_iter().map(Value::from).collect()),
            Json::Object(obj) => Value::Map(obj.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<Value> for Json {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(b),
            Value::Integer(i) => Json::Number(i.into()),
            Value::Double(f) => Number::from_f64(f).map_or(Json::Null, Json::Number),
            Value::String(s) => Json::String(s),
            Value::Array(arr) => Json::Array(arr.into_iter().map(Json::from).collect()),
            Value::Map(map) => Json::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
            Value::Opaque(Opaque::Blob(blob)) => Json::String(STANDARD.encode(blob.as_bytes())),
            Value::Opaque(Opaque::Timestamp(ts)) => serde_json::json!({
                "seconds": ts.seconds(),
                "nanos": ts.nanos(),
            }),
        }
    }
}

impl From<&Value> for Json {
    #[inline]
    fn from(v: &Value) -> Self {
        v.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blob, Timestamp};

    #[test]
    fn json_numbers_split_into_integer_and_double() {
        let value = Value::from(serde_json::json!([1, -2, 2.5, 18446744073709551615u64]));
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Integer(1),
                Value::Integer(-2),
                Value::Double(2.5),
                Value::Double(18446744073709551615u64 as f64),
            ])
        );
    }

    #[test]
    fn opaque_leaves_flatten_into_json() {
        let value: Value = [
            ("raw", Value::from(Blob::from_static(b"hi"))),
            ("at", Timestamp::new(3, 4).unwrap().into()),
            ("nan", Value::Double(f64::NAN)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            Json::from(value),
            serde_json::json!({
                "raw": "aGk=",
                "at": { "seconds": 3, "nanos": 4 },
                "nan": null,
            })
        );
    }
}
