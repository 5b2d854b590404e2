//! Coding paths: where inside a nested value the engines currently are.
//!
//! A [`CodingPath`] is the owned, user-facing form carried by [`Error`]s. The
//! engines themselves walk the tree with a borrowed `PathScope` chain that
//! lives on the stack frame of each container, so a child scope disappears as
//! soon as the container that created it returns and siblings never see each
//! other's segments. The chain is only turned into a [`CodingPath`] when an
//! error has to report it.
//!
//! [`Error`]: crate::Error

use std::fmt::{self, Display, Write};

/// One step into a nested value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Entry of a keyed container (struct field, map entry, enum variant).
    Key(String),
    /// Element of an unkeyed container, zero-based.
    Index(usize),
}

impl PathSegment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            PathSegment::Key(key) => Some(key),
            PathSegment::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathSegment::Key(_) => None,
            PathSegment::Index(index) => Some(*index),
        }
    }
}

impl From<&str> for PathSegment {
    #[inline]
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    #[inline]
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    #[inline]
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Ordered sequence of [`PathSegment`]s from the document root.
///
/// Paths are values: [`push`](CodingPath::push) returns a longer copy and
/// leaves the receiver alone, so several children can be derived from the
/// same parent.
///
/// # Example
///
/// ```
/// use firestore_codec::{CodingPath, PathSegment};
///
/// let items = CodingPath::root().push("items");
/// let first = items.push(0usize).push("name");
///
/// assert_eq!(items.len(), 1);
/// assert_eq!(first.describe(), "items[0].name");
/// assert_eq!(first.segments()[1], PathSegment::Index(0));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CodingPath {
    segments: Vec<PathSegment>,
}

impl CodingPath {
    /// The empty path, pointing at the document itself.
    #[inline]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Returns a copy of this path extended by `segment`.
    pub fn push(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment.into());
        Self { segments }
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    #[inline]
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// Human-readable form used in error messages.
    ///
    /// Keys are joined with `.`, indices are written as `[n]`. Keys that would
    /// be ambiguous in that syntax are quoted as `["..."]`. The root is
    /// written as `<root>`.
    pub fn describe(&self) -> String {
        if self.segments.is_empty() {
            return "<root>".to_owned();
        }
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if is_plain_key(key) => {
                    if i > 0 {
                        out.push('.');
                    }
                    out.push_str(key);
                }
                PathSegment::Key(key) => {
                    let _ = write!(out, "[{key:?}]");
                }
                PathSegment::Index(index) => {
                    let _ = write!(out, "[{index}]");
                }
            }
        }
        out
    }
}

fn is_plain_key(key: &str) -> bool {
    !key.is_empty()
        && !key
            .chars()
            .any(|c| matches!(c, '.' | '[' | ']' | '"') || c.is_whitespace())
}

impl Display for CodingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<Vec<PathSegment>> for CodingPath {
    #[inline]
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl FromIterator<PathSegment> for CodingPath {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Borrowed path chain threaded through the engines.
#[derive(Debug, Clone, Copy)]
pub(crate) enum PathScope<'a> {
    Root,
    Key(&'a PathScope<'a>, &'a str),
    Index(&'a PathScope<'a>, usize),
}

impl<'a> PathScope<'a> {
    #[inline]
    pub(crate) fn key<'b>(&'b self, key: &'b str) -> PathScope<'b>
    where
        'a: 'b,
    {
        PathScope::Key(self, key)
    }

    #[inline]
    pub(crate) fn index<'b>(&'b self, index: usize) -> PathScope<'b>
    where
        'a: 'b,
    {
        PathScope::Index(self, index)
    }

    pub(crate) fn to_path(self) -> CodingPath {
        let mut segments = Vec::new();
        let mut scope = &self;
        loop {
            match scope {
                PathScope::Root => break,
                PathScope::Key(parent, key) => {
                    segments.push(PathSegment::Key((*key).to_owned()));
                    scope = *parent;
                }
                PathScope::Index(parent, index) => {
                    segments.push(PathSegment::Index(*index));
                    scope = *parent;
                }
            }
        }
        segments.reverse();
        CodingPath { segments }
    }
}
