use firestore_codec::{
    Blob, DecodeConfig, DocumentDecoder, DocumentEncoder, EncodeConfig, ErrorKind, Extends, Map,
    SUPER_KEY, Timestamp, Value, ValueKind, decode, encode,
};
use serde::{Deserialize, Serialize};

// ============ Top-level shape ============

#[test]
fn test_encode_rejects_non_map_root() {
    for (value, kind) in [
        (encode(&5), ValueKind::Integer),
        (encode(&vec![1, 2]), ValueKind::Array),
        (encode("text"), ValueKind::String),
        (encode(&Timestamp::UNIX_EPOCH), ValueKind::Timestamp),
        (encode(&None::<u8>), ValueKind::Null),
    ] {
        let err = value.unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::TopLevelTypeMismatch { found: kind });
        assert!(err.path().unwrap().is_empty());
    }
}

#[test]
fn test_encode_unit_variant_is_not_a_document() {
    #[derive(Serialize)]
    enum Status {
        Active,
    }

    let err = encode(&Status::Active).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TopLevelTypeMismatch {
            found: ValueKind::String
        }
    );
}

#[test]
fn test_decode_rejects_non_map_root_before_decoding() {
    // `Vec<i32>` would happily decode the array; the document check comes first.
    let err = decode::<Vec<i32>>(&Value::from(vec![1, 2])).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TopLevelTypeMismatch {
            found: ValueKind::Array
        }
    );
    assert_eq!(err.to_string(), "top-level value must be a map, found array at <root>");
}

#[test]
fn test_empty_struct_is_an_empty_document() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Empty {}

    let tree = encode(&Empty {}).unwrap();
    assert_eq!(tree.as_map().map(|m| m.len()), Some(0));
    assert_eq!(decode::<Empty>(&tree).unwrap(), Empty {});
}

// ============ Configuration ============

#[test]
fn test_configured_encoder() {
    #[derive(Serialize)]
    struct Partial {
        set: i32,
        unset: Option<i32>,
    }

    let encoder =
        DocumentEncoder::with_config(EncodeConfig::default().with_omit_null_fields(true));
    assert!(encoder.config().omit_null_fields);

    let tree = encoder.encode(&Partial { set: 1, unset: None }).unwrap();
    assert_eq!(tree.as_map().unwrap().len(), 1);

    let tree = DocumentEncoder::new()
        .encode(&Partial { set: 1, unset: None })
        .unwrap();
    assert_eq!(tree["unset"], Value::Null);
}

#[test]
fn test_configured_decoder_depth() {
    let tree: Value = serde_json::json!({ "a": { "b": { "c": 1 } } }).into();

    let shallow = DocumentDecoder::with_config(DecodeConfig::default().with_max_depth(2));
    let err = shallow.decode::<Value>(&tree).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::DepthLimitExceeded { limit: 2 });
    assert_eq!(err.path().unwrap().describe(), "a.b");

    let deep = DocumentDecoder::new();
    assert_eq!(deep.config().max_depth, firestore_codec::DEFAULT_MAX_DEPTH);
    assert_eq!(deep.decode::<Value>(&tree).unwrap(), tree);
}

#[test]
fn test_encoder_is_reusable() {
    #[derive(Serialize)]
    struct N {
        n: u8,
    }

    let encoder = DocumentEncoder::new();
    let first = encoder.encode(&N { n: 1 }).unwrap();
    let second = encoder.encode(&N { n: 2 }).unwrap();
    assert_eq!(first["n"], Value::Integer(1));
    assert_eq!(second["n"], Value::Integer(2));
}

// ============ Super scope ============

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Vehicle {
    wheels: u8,
    name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct Car {
    name: String,
    doors: u8,
}

#[test]
fn test_extends_nests_base_under_super() {
    let car = Extends::new(
        Vehicle {
            wheels: 4,
            name: "vehicle".into(),
        },
        Car {
            name: "coupe".into(),
            doors: 2,
        },
    );
    let tree = encode(&car).unwrap();

    assert_eq!(tree[SUPER_KEY]["wheels"], Value::Integer(4));
    assert_eq!(tree[SUPER_KEY]["name"], Value::from("vehicle"));
    assert_eq!(tree["name"], Value::from("coupe"));
    assert_eq!(tree["doors"], Value::Integer(2));
    assert_eq!(tree.as_map().unwrap().len(), 3);

    let back: Extends<Vehicle, Car> = decode(&tree).unwrap();
    assert_eq!(back, car);
    let (base, this) = back.into_parts();
    assert_eq!(base.wheels, 4);
    assert_eq!(this.doors, 2);
}

#[test]
fn test_extends_chains() {
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Sports {
        top_speed: u16,
    }

    let chained = Extends::new(
        Extends::new(
            Vehicle {
                wheels: 4,
                name: "vehicle".into(),
            },
            Car {
                name: "car".into(),
                doors: 2,
            },
        ),
        Sports { top_speed: 300 },
    );
    let tree = encode(&chained).unwrap();
    assert_eq!(tree["super"]["super"]["wheels"], Value::Integer(4));
    assert_eq!(tree["super"]["doors"], Value::Integer(2));
    assert_eq!(tree["top_speed"], Value::Integer(300));

    let back: Extends<Extends<Vehicle, Car>, Sports> = decode(&tree).unwrap();
    assert_eq!(back, chained);
}

#[test]
fn test_extends_missing_super_is_key_not_found() {
    let tree: Value = serde_json::json!({ "name": "coupe", "doors": 2 }).into();
    let err = decode::<Extends<Vehicle, Car>>(&tree).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::KeyNotFound {
            key: SUPER_KEY.to_owned()
        }
    );
    assert!(err.path().unwrap().is_empty());
}

#[test]
fn test_extends_base_error_path_goes_through_super() {
    let tree: Value = serde_json::json!({
        "super": { "wheels": "four", "name": "vehicle" },
        "name": "coupe",
        "doors": 2,
    })
    .into();
    let err = decode::<Extends<Vehicle, Car>>(&tree).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    assert_eq!(err.path().unwrap().describe(), "super.wheels");
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct Upload {
    at: Timestamp,
    data: Blob,
    count: i32,
}

fn upload_tree(count: Value) -> Value {
    let mut tree: Value = serde_json::json!({ "super": { "wheels": 4, "name": "vehicle" } }).into();
    let map = tree.as_map_mut().unwrap();
    map.insert("at".into(), Timestamp::new(5, 6).unwrap().into());
    map.insert("data".into(), Blob::from_static(b"\x00\x01").into());
    map.insert("count".into(), count);
    tree
}

#[test]
fn test_extends_derived_half_keeps_opaque_leaves() {
    let original = Extends::new(
        Vehicle {
            wheels: 4,
            name: "vehicle".into(),
        },
        Upload {
            at: Timestamp::new(5, 6).unwrap(),
            data: Blob::from_static(b"\x00\x01"),
            count: 3,
        },
    );
    let tree = encode(&original).unwrap();
    assert_eq!(tree["at"].kind(), ValueKind::Timestamp);
    assert_eq!(tree["data"].kind(), ValueKind::Blob);
    assert_eq!(decode::<Extends<Vehicle, Upload>>(&tree).unwrap(), original);
}

#[test]
fn test_extends_derived_half_coerces_numbers() {
    let tree = upload_tree(Value::Double(3.0));
    let back: Extends<Vehicle, Upload> = decode(&tree).unwrap();
    assert_eq!(back.this.count, 3);
    assert_eq!(back.base.wheels, 4);
}

#[test]
fn test_extends_derived_half_requires_exact_opaque_leaf() {
    let mut tree = upload_tree(Value::Integer(3));
    tree.as_map_mut()
        .unwrap()
        .insert("at".into(), Value::from(vec![5, 6]));
    let err = decode::<Extends<Vehicle, Upload>>(&tree).unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::TypeMismatch {
            expected: "timestamp".into(),
            found: "array".into(),
        }
    );
    assert_eq!(err.path().unwrap().describe(), "at");
}

#[test]
fn test_extends_derived_half_error_path() {
    let tree = upload_tree(Value::Double(3.5));
    let err = decode::<Extends<Vehicle, Upload>>(&tree).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NumberOutOfRange { target: "i32", .. }));
    assert_eq!(err.path().unwrap().describe(), "count");
}

#[test]
fn test_extends_derived_half_does_not_see_super() {
    let tree = upload_tree(Value::Integer(1));
    let back: Extends<Vehicle, Map> = decode(&tree).unwrap();
    assert!(!back.this.contains_key(SUPER_KEY));
    assert_eq!(back.this.len(), 3);
}

#[test]
fn test_extends_through_serde_json() {
    let car = Extends::new(
        Vehicle {
            wheels: 3,
            name: "trike".into(),
        },
        Car {
            name: "open".into(),
            doors: 0,
        },
    );
    let text = serde_json::to_string(&car).unwrap();
    assert_eq!(
        text,
        r#"{"super":{"wheels":3,"name":"trike"},"name":"open","doors":0}"#
    );
    let back: Extends<Vehicle, Car> = serde_json::from_str(&text).unwrap();
    assert_eq!(back, car);
}
