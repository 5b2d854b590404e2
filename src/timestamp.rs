use std::{
    fmt,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::interceptor::TIMESTAMP_TOKEN;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// A point in time with nanosecond precision, stored as seconds and
/// nanoseconds relative to the Unix epoch.
///
/// Encoded through the interceptor registry as an opaque timestamp leaf, so it
/// never degrades into a plain number or string inside the tree. Other serde
/// formats see it as the pair `(seconds, nanos)`.
///
/// # Precision
///
/// The type itself keeps every nanosecond. Conversions from and to
/// [`SystemTime`] are exact wherever `SystemTime` has nanosecond resolution
/// (Linux, macOS); on Windows `SystemTime` ticks every 100ns and the last two
/// digits are lost when converting back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    pub const UNIX_EPOCH: Timestamp = Timestamp {
        seconds: 0,
        nanos: 0,
    };

    /// Returns `None` unless `nanos` is below one second.
    #[inline]
    pub const fn new(seconds: i64, nanos: u32) -> Option<Self> {
        if nanos < NANOS_PER_SECOND {
            Some(Self { seconds, nanos })
        } else {
            None
        }
    }

    /// Builds a timestamp from a signed nanosecond offset to the epoch.
    pub fn from_unix_nanos(nanos: i128) -> Option<Self> {
        let per_second = i128::from(NANOS_PER_SECOND);
        let seconds = i64::try_from(nanos.div_euclid(per_second)).ok()?;
        let nanos = nanos.rem_euclid(per_second) as u32;
        Some(Self { seconds, nanos })
    }

    pub fn now() -> Self {
        SystemTime::now().into()
    }

    /// Whole seconds since the epoch; negative before 1970.
    #[inline]
    pub const fn seconds(self) -> i64 {
        self.seconds
    }

    /// Sub-second part, always in `0..1_000_000_000` and counted forward from
    /// [`seconds`](Self::seconds).
    #[inline]
    pub const fn nanos(self) -> u32 {
        self.nanos
    }

    #[inline]
    pub const fn as_unix_nanos(self) -> i128 {
        self.seconds as i128 * NANOS_PER_SECOND as i128 + self.nanos as i128
    }

    /// `None` if the platform's `SystemTime` cannot reach this point.
    pub fn to_system_time(self) -> Option<SystemTime> {
        let nanos = Duration::from_nanos(u64::from(self.nanos));
        if self.seconds >= 0 {
            UNIX_EPOCH
                .checked_add(Duration::from_secs(self.seconds as u64))?
                .checked_add(nanos)
        } else {
            UNIX_EPOCH
                .checked_sub(Duration::from_secs(self.seconds.unsigned_abs()))?
                .checked_add(nanos)
        }
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(after) => Self {
                seconds: i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
                nanos: after.subsec_nanos(),
            },
            Err(before) => {
                let before = before.duration();
                let seconds = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
                match before.subsec_nanos() {
                    0 => Self {
                        seconds: -seconds,
                        nanos: 0,
                    },
                    nanos => Self {
                        seconds: -seconds - 1,
                        nanos: NANOS_PER_SECOND - nanos,
                    },
                }
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}s", self.seconds, self.nanos)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_newtype_struct(TIMESTAMP_TOKEN, &(self.seconds, self.nanos))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_newtype_struct(TIMESTAMP_TOKEN, TimestampVisitor)
    }
}

pub(crate) struct TimestampVisitor;

impl TimestampVisitor {
    fn build<E: de::Error>(seconds: i64, nanos: u32) -> Result<Timestamp, E> {
        Timestamp::new(seconds, nanos).ok_or_else(|| {
            E::invalid_value(
                de::Unexpected::Unsigned(u64::from(nanos)),
                &"nanoseconds below 1_000_000_000",
            )
        })
    }
}

impl<'de> de::Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a timestamp")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (seconds, nanos) = <(i64, u32)>::deserialize(deserializer)?;
        Self::build(seconds, nanos)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: de::SeqAccess<'de>,
    {
        let seconds = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(0, &self))?;
        let nanos = seq
            .next_element()?
            .ok_or_else(|| de::Error::invalid_length(1, &self))?;
        Self::build(seconds, nanos)
    }
}
