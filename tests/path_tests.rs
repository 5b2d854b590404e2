//! Tests for coding paths reported by errors

use firestore_codec::{CodingPath, ErrorKind, PathSegment, Value, decode, from_value, to_value};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug)]
#[allow(dead_code)]
struct Item {
    count: i32,
}

#[derive(Deserialize, Debug)]
#[allow(dead_code)]
struct Order {
    items: Vec<Item>,
}

#[test]
fn test_nested_mismatch_reports_exact_segments() {
    let tree = Value::Array(vec![
        serde_json::json!({ "count": 1 }).into(),
        serde_json::json!({ "count": "many" }).into(),
    ]);
    let err = from_value::<Vec<Item>>(&tree).unwrap_err();

    assert!(matches!(err.kind(), ErrorKind::TypeMismatch { .. }));
    let path = err.path().unwrap();
    assert_eq!(
        path.segments(),
        &[PathSegment::Index(1), PathSegment::Key("count".into())]
    );
    assert_eq!(path.to_string(), "[1].count");
}

#[test]
fn test_document_path_starts_at_root_key() {
    let tree: Value = serde_json::json!({
        "items": [{ "count": 1 }, { "count": 2 }, { "count": 2.5 }]
    })
    .into();
    let err = decode::<Order>(&tree).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::NumberOutOfRange { .. }));
    assert_eq!(
        err.path(),
        Some(&CodingPath::from(vec![
            PathSegment::from("items"),
            PathSegment::from(2usize),
            PathSegment::from("count"),
        ]))
    );
    assert_eq!(
        err.to_string(),
        "number out of range: 2.5 cannot be represented as i32 at items[2].count"
    );
}

#[test]
fn test_custom_error_gets_innermost_path() {
    struct Refuses;

    impl Serialize for Refuses {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("nope"))
        }
    }

    #[derive(Serialize)]
    struct Holder {
        list: Vec<Option<Refuses>>,
    }

    let err = to_value(&Holder {
        list: vec![None, Some(Refuses)],
    })
    .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::Message("nope".into()));
    assert_eq!(err.path().unwrap().describe(), "list[1]");
}

#[test]
fn test_root_error_has_empty_path() {
    let err = from_value::<bool>(&Value::Null).unwrap_err();
    let path = err.path().unwrap();
    assert!(path.is_empty());
    assert_eq!(path.describe(), "<root>");
}

#[test]
fn test_coding_path_push_is_copy_on_extend() {
    let root = CodingPath::root();
    let items = root.push("items");
    let first = items.push(0usize);

    assert!(root.is_empty());
    assert_eq!(items.len(), 1);
    assert_eq!(first.len(), 2);
    assert_eq!(first.last(), Some(&PathSegment::Index(0)));
    assert_eq!(first.segments()[0].as_key(), Some("items"));
}

#[test]
fn test_coding_path_equality_is_pairwise() {
    let a: CodingPath = [PathSegment::from("x"), PathSegment::from(1usize)]
        .into_iter()
        .collect();
    let b = CodingPath::root().push("x").push(1usize);
    let c = CodingPath::root().push("x").push("1");
    assert_eq!(a, b);
    assert_ne!(a, c);
}
