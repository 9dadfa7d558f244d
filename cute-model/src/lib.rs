//! Record model for cute.
//!
//! Defines the data shapes the transcoding engine works between:
//! - [`ContentTypeSchema`] / [`FieldDefinition`] — a content type as fetched from the CMS
//! - [`FieldKind`] — the closed set of CMS field types
//! - [`LocaleSet`] — configured locales, default first
//! - [`FlatRecord`] / [`FlatValue`] — the spreadsheet-friendly key/value form
//! - [`NestedRecord`] / [`SystemMetadata`] — the CMS-native entry shape
//!
//! Nothing here performs I/O. Schemas and entries arrive as JSON from the
//! CMS access layer and are handed to `cute-transcode`.

mod entry;
mod flat;
mod locale;
mod schema;

pub use entry::{EntryState, FieldShape, LinkRef, LinkSys, LocalizedValues, NestedRecord, SystemMetadata};
pub use flat::{FlatRecord, FlatValue, SYS_KEYS, is_sys_key, sys_key};
pub use locale::LocaleSet;
pub use schema::{ContentTypeSchema, FieldDefinition, FieldKind, ItemSchema};

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building model values from CMS input.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid locale set: {0}")]
    InvalidLocales(String),

    #[error("invalid entry: {0}")]
    InvalidEntry(String),
}
