use std::fmt::{self, Display};

/// Shape of a [`Value`](crate::Value) without its payload.
///
/// Used to describe what was found where something else was expected.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Double,
    String,
    Array,
    Map,
    Timestamp,
    Blob,
}

impl ValueKind {
    /// `true` for leaves the tree represents natively.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Null | Self::Bool | Self::Integer | Self::Double | Self::String
        )
    }

    /// `true` for leaves carried through the interceptors.
    pub const fn is_opaque(self) -> bool {
        matches!(self, Self::Timestamp | Self::Blob)
    }

    pub const fn is_container(self) -> bool {
        matches!(self, Self::Array | Self::Map)
    }

    pub const fn is_number(self) -> bool {
        matches!(self, Self::Integer | Self::Double)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Double => "double",
            Self::String => "string",
            Self::Array => "array",
            Self::Map => "map",
            Self::Timestamp => "timestamp",
            Self::Blob => "blob",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
