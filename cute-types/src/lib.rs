//! Core type definitions for cute.
//!
//! This crate defines the small value types shared by the model and the
//! transcoding engine:
//! - Entry identifiers (CMS-compatible, generated with a fixed prefix)
//! - CMS timestamps normalized to whole seconds
//!
//! Content-type schemas, records and codecs live in `cute-model` and
//! `cute-transcode`.

mod ids;
mod timestamp;

pub use ids::{DEFAULT_ID_LENGTH, DEFAULT_ID_PREFIX, EntryId, MAX_ID_LENGTH};
pub use timestamp::CmsTimestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid entry id: {0}")]
    InvalidEntryId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
