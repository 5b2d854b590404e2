/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options for the encoder engine.
///
/// # Example
///
/// ```
/// use firestore_codec::EncodeConfig;
///
/// let config = EncodeConfig::default()
///     .with_omit_null_fields(true)
///     .with_max_depth(20);
/// assert!(config.omit_null_fields);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeConfig {
    /// Drop struct fields whose value encodes to `Null` (e.g. `None`) instead
    /// of writing an explicit `Null`. Map entries are always kept.
    pub omit_null_fields: bool,
    /// Maximum number of nested containers, the document's own map included.
    pub max_depth: usize,
}

impl Default for EncodeConfig {
    fn default() -> Self {
        Self {
            omit_null_fields: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeConfig {
    #[inline]
    pub const fn with_omit_null_fields(mut self, omit: bool) -> Self {
        self.omit_null_fields = omit;
        self
    }

    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Options for the decoder engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    /// Maximum number of nested containers, the document's own map included.
    pub max_depth: usize,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeConfig {
    #[inline]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
