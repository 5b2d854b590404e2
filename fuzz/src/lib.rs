use std::collections::HashMap;

use firestore_codec::{
    DecodeConfig, ErrorKind, Value, decode, encode, from_value, from_value_with, to_value,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct TestRecord {
    byte_val: i8,
    short_val: i16,
    int_val: i32,
    long_val: i64,
    float_val: f32,
    double_val: f64,
    string_val: String,
    #[serde(default)]
    list_ints: Vec<i32>,
    #[serde(default)]
    list_strings: Vec<String>,
    #[serde(default)]
    nested: Option<Box<TestRecord>>,
    #[serde(default)]
    map_vals: HashMap<String, i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SimpleRecord {
    #[serde(default)]
    value: i32,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum TestEnum {
    Unit,
    Newtype(i32),
    Tuple(i32, String),
    Struct { x: i32, y: i32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct WithEnum {
    #[serde(default)]
    mode: Option<TestEnum>,
    #[serde(default)]
    value: i32,
}

/// Anything that decodes must encode again and decode to the same value.
fn check<T>(tree: &Value)
where
    T: Serialize + for<'de> Deserialize<'de> + PartialEq + std::fmt::Debug,
{
    let Ok(val) = from_value::<T>(tree) else {
        return;
    };
    let again = to_value(&val).expect("decoded value must encode");
    let back = from_value::<T>(&again).expect("encoded value must decode");
    assert_eq!(back, val);
}

fn check_document<T>(tree: &Value)
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    if let Ok(val) = decode::<T>(tree) {
        let again = encode(&val).expect("decoded document must encode");
        assert!(again.is_map());
    }
}

pub fn test_typed(tree: &Value) {
    check::<SimpleRecord>(tree);
    check::<WithEnum>(tree);
    check::<HashMap<String, i32>>(tree);
    check::<Vec<i32>>(tree);
    check::<Option<String>>(tree);

    // Floats may hold NaN, so only exercise the paths without comparing.
    if let Ok(val) = from_value::<TestRecord>(tree) {
        let _ = to_value(&val);
    }
    check_document::<TestRecord>(tree);
    check_document::<WithEnum>(tree);
}

pub fn test_untyped(tree: &Value) {
    match from_value::<Value>(tree) {
        Ok(copy) => assert_eq!(copy, *tree),
        Err(err) => assert!(matches!(err.kind(), ErrorKind::DepthLimitExceeded { .. })),
    }
    if let Ok(again) = to_value(tree) {
        assert_eq!(again, *tree);
    }

    let shallow = DecodeConfig::default().with_max_depth(4);
    let _ = from_value_with::<Value>(tree, &shallow);
}

pub fn test(data: &[u8]) {
    let Ok(json) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let tree = Value::from(json);
    test_untyped(&tree);
    test_typed(&tree);
}
