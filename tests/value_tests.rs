use std::time::{Duration, UNIX_EPOCH};

use firestore_codec::{Blob, Interceptor, Map, Opaque, Timestamp, Value, ValueKind};

// ============ Construction ============

#[test]
fn test_from_scalars() {
    assert_eq!(Value::from(true), Value::Bool(true));
    assert_eq!(Value::from(-3i8), Value::Integer(-3));
    assert_eq!(Value::from(u32::MAX), Value::Integer(4_294_967_295));
    assert_eq!(Value::from(0.5f32), Value::Double(0.5));
    assert_eq!(Value::from("s"), Value::String("s".into()));
    assert_eq!(Value::from(None::<i32>), Value::Null);
    assert_eq!(Value::from(Some("x")), Value::from("x"));
    assert_eq!(Value::from(()), Value::Null);
    assert_eq!(Value::default(), Value::Null);
}

#[test]
fn test_from_opaque() {
    let time = UNIX_EPOCH + Duration::new(10, 5);
    assert_eq!(
        Value::from(time),
        Value::Opaque(Opaque::Timestamp(Timestamp::new(10, 5).unwrap()))
    );

    let blob = Value::from(Blob::from(vec![1u8, 2, 3]));
    assert_eq!(blob.kind(), ValueKind::Blob);
    assert_eq!(blob.as_blob().map(|b| b.len()), Some(3));
}

#[test]
fn test_from_iterators() {
    let array: Value = (1i32..=3).collect();
    assert_eq!(array, Value::from(vec![1, 2, 3]));

    let map: Value = [("a", 1i64), ("b", 2)].into_iter().collect();
    assert_eq!(map["b"], Value::Integer(2));
    assert!(map.is_map());
}

// ============ Equality ============

#[test]
fn test_map_equality_ignores_order() {
    let ab: Value = [("a", 1i64), ("b", 2)].into_iter().collect();
    let ba: Value = [("b", 2i64), ("a", 1)].into_iter().collect();
    assert_eq!(ab, ba);
}

#[test]
fn test_opaque_equality_compares_tag_and_payload() {
    let zero_time = Value::from(Timestamp::UNIX_EPOCH);
    let empty_blob = Value::from(Blob::default());
    assert_ne!(zero_time, empty_blob);
    assert_ne!(zero_time, Value::Integer(0));
    assert_eq!(empty_blob, Value::from(Blob::from_static(b"")));
    assert_ne!(Value::Integer(1), Value::Double(1.0));
}

// ============ Accessors ============

#[test]
fn test_accessors() {
    assert_eq!(Value::Integer(7).as_i64(), Some(7));
    assert_eq!(Value::Double(7.0).as_i64(), Some(7));
    assert_eq!(Value::Double(7.5).as_i64(), None);
    assert_eq!(Value::Integer(7).as_f64(), Some(7.0));
    assert_eq!(Value::Integer(i64::MAX).as_f64(), None);
    assert_eq!(Value::Bool(false).as_bool(), Some(false));
    assert_eq!(Value::from("x").as_str(), Some("x"));
    assert_eq!(Value::from("x").as_i64(), None);
    assert!(Value::Null.is_null());
    assert!(Value::from(vec![1]).is_array());
    assert_eq!(Value::Null.as_timestamp(), None);
}

#[test]
fn test_indexing() {
    let mut tree: Value = serde_json::json!({
        "list": [10, 20],
        "inner": { "k": "v" },
    })
    .into();

    assert_eq!(tree["list"][1], Value::Integer(20));
    assert_eq!(tree["inner"]["k"], Value::from("v"));
    assert!(tree["missing"]["deeper"].is_null());
    assert!(tree["list"][9].is_null());
    assert!(tree.get("list").unwrap().get("k").is_none());
    assert_eq!(tree.get(String::from("inner")).map(Value::kind), Some(ValueKind::Map));

    *tree.get_mut("list").unwrap().get_mut(0).unwrap() = Value::Null;
    assert!(tree["list"][0].is_null());
}

#[test]
fn test_mutation() {
    let mut tree = Value::Map(Map::new());
    tree.as_map_mut()
        .unwrap()
        .insert("xs".into(), Value::Array(vec![]));
    tree.as_map_mut().unwrap()["xs"]
        .as_array_mut()
        .unwrap()
        .push(Value::Bool(true));
    assert_eq!(tree["xs"][0], Value::Bool(true));

    let taken = tree.as_map_mut().unwrap()["xs"].take();
    assert_eq!(taken, Value::Array(vec![Value::Bool(true)]));
    assert!(tree["xs"].is_null());
}

#[test]
fn test_kind_classification() {
    assert!(ValueKind::Integer.is_number());
    assert!(ValueKind::String.is_scalar());
    assert!(ValueKind::Timestamp.is_opaque());
    assert!(!ValueKind::Blob.is_scalar());
    assert!(ValueKind::Map.is_container());
    assert_eq!(Value::Double(1.0).kind().to_string(), "double");
}

// ============ Timestamps and blobs ============

#[test]
fn test_timestamp_basics() {
    assert!(Timestamp::new(1, 999_999_999).is_some());
    assert!(Timestamp::new(1, 1_000_000_000).is_none());

    let ts = Timestamp::new(-1, 500_000_000).unwrap();
    assert_eq!(ts.as_unix_nanos(), -500_000_000);
    assert_eq!(Timestamp::from_unix_nanos(-500_000_000), Some(ts));
    assert_eq!(ts.to_string(), "-1.500000000s");
    assert!(Timestamp::new(0, 0).unwrap() > ts);
}

#[test]
fn test_blob_basics() {
    let blob = Blob::new(&b"abc"[..]);
    assert_eq!(&*blob, b"abc");
    assert_eq!(format!("{blob:?}"), "Blob(3 bytes)");
    let bytes: Vec<u8> = blob.clone().into();
    assert_eq!(bytes, b"abc");
    assert_eq!(blob.into_bytes().len(), 3);
}

#[test]
fn test_interceptor_registry() {
    for interceptor in Interceptor::ALL {
        assert_eq!(Interceptor::lookup(interceptor.token()), Some(interceptor));
        assert!(interceptor.kind().is_opaque());
    }
    assert_eq!(Interceptor::ALL.map(Interceptor::kind), [ValueKind::Timestamp, ValueKind::Blob]);
    assert_eq!(Interceptor::lookup("Timestamp"), None);
}

// ============ serde_json interop ============

#[test]
fn test_json_into_value() {
    let tree: Value = serde_json::json!({
        "n": 3,
        "f": 0.5,
        "big": 18_446_744_073_709_551_615u64,
        "s": "x",
        "a": [null, true],
    })
    .into();
    assert_eq!(tree["n"], Value::Integer(3));
    assert_eq!(tree["f"], Value::Double(0.5));
    assert_eq!(tree["big"].kind(), ValueKind::Double);
    assert_eq!(tree["a"], Value::Array(vec![Value::Null, Value::Bool(true)]));
    let keys: Vec<&str> = tree.as_map().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["n", "f", "big", "s", "a"]);
}

#[test]
fn test_value_into_json() {
    let tree: Value = [
        ("bytes", Value::from(Blob::from_static(b"\xff\x00"))),
        ("when", Timestamp::new(1, 2).unwrap().into()),
        ("inf", Value::Double(f64::INFINITY)),
        ("list", Value::from(vec!["a"])),
    ]
    .into_iter()
    .collect();
    let json = serde_json::Value::from(&tree);
    assert_eq!(
        json,
        serde_json::json!({
            "bytes": "/wA=",
            "when": { "seconds": 1, "nanos": 2 },
            "inf": null,
            "list": ["a"],
        })
    );
}

#[test]
fn test_value_through_other_serde_formats() {
    let tree: Value = [("a", Value::Integer(1)), ("b", Value::from(vec![true]))]
        .into_iter()
        .collect();
    let text = serde_json::to_string(&tree).unwrap();
    assert_eq!(text, r#"{"a":1,"b":[true]}"#);
    let back: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(back, tree);
}
