//! Record transcoding engine.
//!
//! Converts CMS entries between their nested, localized shape and a flat
//! key/value form suitable for spreadsheets, and decides whether two values
//! of a field are semantically equal.
//!
//! - [`FieldCodec`] — one field in one locale: flat keys, encode, decode, compare
//! - [`RecordCodec`] — a compiled content type: whole-record serialize/deserialize,
//!   skeletons, compare-and-update, column listing
//! - [`richtext`] — rich-text document rendering used by the `RichText` kind
//!
//! Codecs are immutable once built and hold no interior mutability, so a
//! single [`RecordCodec`] can be shared across threads.

mod config;
mod error;
mod field_codec;
mod record_codec;
pub mod richtext;

pub use config::{ArrayComparison, CodecConfig};
pub use error::{
    ConfigError, DecodeError, SchemaError, SchemaResult, TranscodeError, TranscodeResult,
};
pub use field_codec::{ARRAY_DELIMITER, FieldCodec};
pub use record_codec::{RecordCodec, UpdateMode};
