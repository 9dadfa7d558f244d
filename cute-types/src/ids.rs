//! Entry identifiers.
//!
//! The CMS accepts client-chosen ids of 1 to 64 characters drawn from
//! `[A-Za-z0-9._-]`. Ids generated here carry a recognizable prefix followed
//! by random alphanumerics so locally created entries are easy to spot.

use rand::Rng;
use rand::distributions::Alphanumeric;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Prefix prepended to generated ids.
pub const DEFAULT_ID_PREFIX: &str = "cute-";

/// Number of random characters following the prefix.
pub const DEFAULT_ID_LENGTH: usize = 22;

/// Longest id the CMS accepts.
pub const MAX_ID_LENGTH: usize = 64;

/// Identifier of a CMS entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntryId(String);

impl EntryId {
    /// Generates a new id with the default prefix and length.
    #[must_use]
    pub fn generate() -> Self {
        Self::generate_with(DEFAULT_ID_PREFIX, DEFAULT_ID_LENGTH)
    }

    /// Generates a new id with a custom prefix and random-part length.
    ///
    /// The random part is shortened if prefix and suffix together would
    /// exceed [`MAX_ID_LENGTH`].
    #[must_use]
    pub fn generate_with(prefix: &str, length: usize) -> Self {
        let length = length.min(MAX_ID_LENGTH.saturating_sub(prefix.len()));
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(length)
            .map(char::from)
            .collect();
        Self(format!("{prefix}{suffix}"))
    }

    /// Parses and validates an id.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() || s.len() > MAX_ID_LENGTH {
            return Err(Error::InvalidEntryId(format!(
                "'{s}' must be between 1 and {MAX_ID_LENGTH} characters"
            )));
        }
        if let Some(bad) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        {
            return Err(Error::InvalidEntryId(format!(
                "'{s}' contains invalid character '{bad}'"
            )));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the id, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntryId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EntryId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EntryId> for String {
    fn from(id: EntryId) -> Self {
        id.0
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
