#[inline(always)]
#[cold]
pub(crate) fn cold_path() {}

/// Every integer whose magnitude is at most this converts to `f64` exactly.
pub(crate) const F64_EXACT_INT: u64 = 1 << 53;

/// Every integer whose magnitude is at most this converts to `f32` exactly.
pub(crate) const F32_EXACT_INT: u64 = 1 << 24;
