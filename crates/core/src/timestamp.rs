//! Row creation times
//!
//! A `Timestamp` is microseconds since the Unix epoch. It orders
//! publications against the WIP cutoff and provider tags against the pacts
//! they could have made pending. Outside the process it is always an
//! RFC 3339 string:
//!
//! ```
//! use pactledger_core::Timestamp;
//!
//! let since: Timestamp = "1970-01-01T00:16:40Z".parse().unwrap();
//! assert_eq!(since, Timestamp::from_secs(1000));
//! assert_eq!(since.to_string(), "1970-01-01T00:16:40.000000Z");
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{Error, Result};

/// Microseconds since 1970-01-01T00:00:00Z
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The Unix epoch
    pub const EPOCH: Timestamp = Timestamp(0);

    /// Wall-clock now; epoch if the system clock is set before it
    pub fn now() -> Self {
        let since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Timestamp(u64::try_from(since_epoch.as_micros()).unwrap_or(u64::MAX))
    }

    /// From microseconds since the epoch
    pub const fn from_micros(micros: u64) -> Self {
        Timestamp(micros)
    }

    /// From whole seconds since the epoch
    pub const fn from_secs(secs: u64) -> Self {
        Timestamp(secs.saturating_mul(1_000_000))
    }

    /// Microseconds since the epoch
    pub const fn as_micros(&self) -> u64 {
        self.0
    }

    /// Parse an RFC 3339 date-time, e.g. a WIP cutoff passed by a caller
    ///
    /// # Errors
    ///
    /// `InvalidInput` for malformed text or instants before the epoch.
    pub fn parse_rfc3339(s: &str) -> Result<Self> {
        let parsed = DateTime::parse_from_rfc3339(s)
            .map_err(|e| Error::invalid_input(format!("invalid timestamp '{}': {}", s, e)))?;
        u64::try_from(parsed.with_timezone(&Utc).timestamp_micros())
            .map(Timestamp)
            .map_err(|_| Error::invalid_input(format!("timestamp '{}' is before the epoch", s)))
    }

    /// RFC 3339 in UTC with microsecond precision
    pub fn to_rfc3339(&self) -> String {
        i64::try_from(self.0)
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_micros)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
            .to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_rfc3339(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse_rfc3339(&text).map_err(serde::de::Error::custom)
    }
}
