//! Error types for the transcoding engine.

use cute_model::{FieldKind, ModelError};
use thiserror::Error;

/// Result type for codec construction.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for record operations.
pub type TranscodeResult<T> = Result<T, TranscodeError>;

/// A content-type schema that cannot be compiled into codecs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The field (or its array items) declares a type the CMS does not define.
    #[error("field '{field}' has unknown type '{type_name}'")]
    UnknownFieldKind { field: String, type_name: String },

    /// An `Array` field without an item declaration.
    #[error("array field '{0}' declares no item type")]
    MissingItems(String),

    /// Two fields produce the same flat key.
    #[error("duplicate flat key '{0}'")]
    DuplicateKey(String),
}

/// A flat value that cannot be converted to its field's kind.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("field '{field}' ({kind}): {reason}")]
pub struct DecodeError {
    /// Full flat name of the field, e.g. `price.en`.
    pub field: String,
    pub kind: FieldKind,
    pub reason: String,
}

impl DecodeError {
    pub fn new(field: &str, kind: FieldKind, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by whole-record operations.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A flat record carries keys the content type does not define.
    #[error("record contains fields {} that are not in content type '{content_type}'", .columns.join(", "))]
    UnknownColumns {
        content_type: String,
        columns: Vec<String>,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors reading a codec configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),
}
