//! CMS timestamps.
//!
//! The CMS stores dates as ISO 8601 but rejects sub-second precision, so
//! every [`CmsTimestamp`] is truncated to whole seconds on construction.
//! Inputs without an offset are read as UTC.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::Error;

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%:z", "%Y-%m-%dT%H:%M%:z"];

/// A point in time with its original UTC offset, at whole-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CmsTimestamp(DateTime<FixedOffset>);

impl CmsTimestamp {
    /// Wraps a date-time, dropping sub-second precision.
    #[must_use]
    pub fn new(value: DateTime<FixedOffset>) -> Self {
        Self(value.trunc_subsecs(0))
    }

    /// Creates a timestamp from a UTC date-time.
    #[must_use]
    pub fn from_utc(value: DateTime<Utc>) -> Self {
        Self::new(value.fixed_offset())
    }

    /// Parses the date formats the CMS and spreadsheet tools produce.
    ///
    /// Accepts RFC 3339 (`T` or space separator, `Z` or numeric offset),
    /// minute-precision times, naive date-times and bare dates.
    pub fn parse(input: &str) -> Result<Self, Error> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidTimestamp("empty value".to_string()));
        }

        let mut normalized = trimmed.replacen(' ', "T", 1);
        if normalized.ends_with(['Z', 'z']) {
            normalized.pop();
            normalized.push_str("+00:00");
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
            return Ok(Self::new(dt));
        }
        for format in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalized, format) {
                return Ok(Self::new(dt));
            }
        }
        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }
        if let Ok(date) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(Self::from_utc(naive.and_utc()));
            }
        }

        Err(Error::InvalidTimestamp(format!("'{trimmed}' is not a recognized date")))
    }

    /// Returns the underlying date-time.
    #[must_use]
    pub const fn as_datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    /// Returns the instant in UTC.
    #[must_use]
    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    /// Formats as RFC 3339 with whole seconds, `Z` for UTC.
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

impl fmt::Display for CmsTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl FromStr for CmsTimestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<DateTime<Utc>> for CmsTimestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_utc(value)
    }
}

impl From<DateTime<FixedOffset>> for CmsTimestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::new(value)
    }
}

impl Serialize for CmsTimestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for CmsTimestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
