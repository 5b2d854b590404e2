//! Typed encoding and decoding between Rust values and a document-database
//! value tree.
//!
//! Any `Serialize` type encodes into a [`Value`]: maps with string keys,
//! ordered arrays, scalar leaves, and opaque [`Timestamp`] and [`Blob`]
//! leaves that survive the trip untouched. Any `Deserialize` type decodes
//! back out of one, with exact numeric coercion and a [`CodingPath`] on every
//! data error saying where in the tree decoding failed.
//!
//! ```
//! use firestore_codec::{Blob, Timestamp, decode, encode};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, Debug, PartialEq)]
//! struct Upload {
//!     name: String,
//!     at: Timestamp,
//!     data: Blob,
//!     tags: Vec<String>,
//! }
//!
//! let upload = Upload {
//!     name: "logo.png".into(),
//!     at: Timestamp::new(1_700_000_000, 123_456_789).unwrap(),
//!     data: Blob::from_static(b"\x89PNG"),
//!     tags: vec!["image".into()],
//! };
//!
//! let tree = encode(&upload).unwrap();
//! assert_eq!(tree["at"].as_timestamp(), Some(upload.at));
//!
//! let back: Upload = decode(&tree).unwrap();
//! assert_eq!(back, upload);
//! ```
//!
//! # Features
//!
//! - `json` (default): conversions between [`Value`] and `serde_json::Value`.
//! - `i128` (default): `i128`/`u128` support, within the `i64` range of the tree.

mod blob;
mod config;
pub mod de;
mod document;
mod error;
mod extends;
mod interceptor;
mod path;
pub mod ser;
mod timestamp;
mod util;
pub mod value;

pub use blob::Blob;
pub use config::{DEFAULT_MAX_DEPTH, DecodeConfig, EncodeConfig};
pub use de::{Deserializer, from_value, from_value_with};
pub use document::{DocumentDecoder, DocumentEncoder, decode, encode};
pub use error::{Error, ErrorKind, Result};
pub use extends::{Extends, SUPER_KEY};
pub use interceptor::Interceptor;
pub use path::{CodingPath, PathSegment};
pub use ser::{Serializer, to_value, to_value_with};
pub use timestamp::Timestamp;
pub use value::{Index, Map, Opaque, Value, ValueKind};
