//! Whole-record transcoding for one content type.

use cute_model::{
    ContentTypeSchema, FieldKind, FlatRecord, FlatValue, LinkRef, LocaleSet, NestedRecord, SYS_KEYS,
    SystemMetadata, is_sys_key, sys_key,
};
use cute_types::{CmsTimestamp, EntryId};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use crate::config::CodecConfig;
use crate::error::{DecodeError, SchemaError, SchemaResult, TranscodeError, TranscodeResult};
use crate::field_codec::{FieldCodec, parse_date, parse_integer};

/// How [`RecordCodec::compare_and_update_with`] applies a new value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// The new value replaces the old one.
    #[default]
    Replace,
    /// Array items are appended to the existing ones; other kinds replace.
    Append,
}

/// A content type compiled into per-field, per-locale codecs.
///
/// Built once per content type and reused for every entry of that type.
/// Immutable after construction and safe to share across threads.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    content_type_id: String,
    display_field: Option<String>,
    locales: LocaleSet,
    config: CodecConfig,
    codecs: Vec<FieldCodec>,
    by_key: HashMap<String, usize>,
}

impl RecordCodec {
    /// Compiles a content type with the default configuration.
    pub fn new(schema: &ContentTypeSchema, locales: &LocaleSet) -> SchemaResult<Self> {
        Self::with_config(schema, locales, CodecConfig::default())
    }

    /// Compiles a content type: one codec per field in every applicable
    /// locale, registered under each of its flat keys.
    pub fn with_config(
        schema: &ContentTypeSchema,
        locales: &LocaleSet,
        config: CodecConfig,
    ) -> SchemaResult<Self> {
        let mut codecs = Vec::new();
        let mut by_key = HashMap::new();

        for field in &schema.fields {
            for locale in locales.applicable(field.localized) {
                let codec = FieldCodec::with_config(locale, field, &config)?;
                let index = codecs.len();
                for key in codec.keys() {
                    if is_sys_key(key) || by_key.insert(key.clone(), index).is_some() {
                        return Err(SchemaError::DuplicateKey(key.clone()));
                    }
                }
                codecs.push(codec);
            }
        }

        debug!(
            content_type = %schema.id,
            codecs = codecs.len(),
            columns = SYS_KEYS.len() + by_key.len(),
            "compiled record codec"
        );

        Ok(Self {
            content_type_id: schema.id.clone(),
            display_field: schema.display_field.clone(),
            locales: locales.clone(),
            config,
            codecs,
            by_key,
        })
    }

    pub fn content_type_id(&self) -> &str {
        &self.content_type_id
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// All codecs in schema order, locales fanned out per field.
    pub fn codecs(&self) -> &[FieldCodec] {
        &self.codecs
    }

    /// The codec owning a flat key; `None` for `sys.*` and unknown keys.
    pub fn codec_for(&self, key: &str) -> Option<&FieldCodec> {
        self.by_key.get(key).map(|&i| &self.codecs[i])
    }

    /// The codec of a field in one locale.
    pub fn field_codec(&self, field_id: &str, locale: &str) -> Option<&FieldCodec> {
        self.codecs
            .iter()
            .find(|c| c.field_id() == field_id && c.locale() == locale)
    }

    /// Flat key of the display field in the default locale.
    pub fn display_key(&self) -> Option<&str> {
        let field = self.display_field.as_deref()?;
        self.field_codec(field, self.locales.default_locale())
            .and_then(|c| c.keys().first())
            .map(String::as_str)
    }

    /// Every flat key a serialized record carries: `sys.*` first, then each
    /// codec's keys in schema order.
    pub fn columns(&self) -> Vec<String> {
        SYS_KEYS
            .iter()
            .map(|k| k.to_string())
            .chain(self.codecs.iter().flat_map(|c| c.keys().iter().cloned()))
            .collect()
    }

    // ── Skeletons ────────────────────────────────────────────────────

    /// A new record holding only `sys.*` keys: a fresh id, version 0 and
    /// this content type.
    pub fn create_skeleton(&self) -> FlatRecord {
        let mut flat = FlatRecord::with_capacity(SYS_KEYS.len());
        for key in SYS_KEYS {
            flat.insert(key, FlatValue::Null);
        }
        let id = EntryId::generate_with(&self.config.id_prefix, self.config.id_length);
        flat.insert(sys_key::ID, id.into_string());
        flat.insert(sys_key::VERSION, 0i64);
        flat.insert(sys_key::CONTENT_TYPE, self.content_type_id.clone());
        flat
    }

    /// A new record seeded with `defaults`.
    ///
    /// The merged record is normalized through [`deserialize`](Self::deserialize)
    /// and [`serialize_with`](Self::serialize_with); fields left without any
    /// value are dropped. A blank `sys.Id` default keeps the generated id.
    pub fn create_skeleton_with(&self, defaults: &FlatRecord) -> TranscodeResult<FlatRecord> {
        let mut flat = self.create_skeleton();
        for (key, value) in defaults.iter() {
            if key == sys_key::ID && value.is_blank() {
                continue;
            }
            flat.insert(key, value.clone());
        }

        let mut nested = self.deserialize(&flat)?;
        nested
            .fields
            .retain(|_, locales| locales.values().any(|v| !v.is_null()));
        Ok(self.serialize_with(&nested, false))
    }

    // ── Nested ↔ flat ────────────────────────────────────────────────

    /// Flattens a nested record, emitting every column.
    pub fn serialize(&self, nested: &NestedRecord) -> FlatRecord {
        self.serialize_with(nested, true)
    }

    /// Flattens a nested record. With `include_missing_fields` false, fields
    /// the nested record does not mention are left out.
    pub fn serialize_with(&self, nested: &NestedRecord, include_missing_fields: bool) -> FlatRecord {
        let mut flat = FlatRecord::with_capacity(SYS_KEYS.len() + self.by_key.len());
        write_sys(&nested.sys, &mut flat);

        for codec in &self.codecs {
            if !include_missing_fields
                && !nested.has_field(codec.field_id())
                && !codec.keys().first().is_some_and(|k| nested.has_field(k))
            {
                continue;
            }
            let value = nested
                .value(codec.field_id(), codec.locale())
                .unwrap_or(&Value::Null);
            codec.encode_into(value, &mut flat);
        }
        flat
    }

    /// Rebuilds a nested record. Keys missing from `flat` read as null.
    pub fn deserialize(&self, flat: &FlatRecord) -> TranscodeResult<NestedRecord> {
        let mut nested = NestedRecord::new(read_sys(flat)?);
        for codec in &self.codecs {
            let value = codec.decode_from(flat)?;
            nested.set(codec.field_id(), codec.locale(), value);
        }
        Ok(nested)
    }

    // ── Updates ──────────────────────────────────────────────────────

    /// Overwrites `key` when `new_value` differs semantically from the
    /// current value. Returns whether the record changed; an absent key is
    /// never added.
    pub fn compare_and_update(
        &self,
        flat: &mut FlatRecord,
        key: &str,
        new_value: impl Into<FlatValue>,
    ) -> bool {
        self.compare_and_update_with(flat, key, new_value, UpdateMode::Replace)
    }

    pub fn compare_and_update_with(
        &self,
        flat: &mut FlatRecord,
        key: &str,
        new_value: impl Into<FlatValue>,
        mode: UpdateMode,
    ) -> bool {
        let Some(old) = flat.get(key) else {
            return false;
        };
        let codec = self.codec_for(key);
        let new_value = new_value.into();

        let updated = match (mode, codec) {
            (UpdateMode::Append, Some(codec)) => codec.merge_append(old, &new_value),
            _ => new_value,
        };
        let changed = match codec {
            Some(codec) => codec.compare(old, &updated),
            None => old.to_text() != updated.to_text(),
        };

        if changed {
            debug!(key, ?mode, "value changed");
            flat.insert(key, updated);
        }
        changed
    }

    /// Removes blank values of non-default locales, so that the CMS falls
    /// back to the default locale for them.
    pub fn strip_empty_fallbacks(&self, flat: &mut FlatRecord) {
        let default_locale = self.locales.default_locale();
        flat.retain(|key, value| match self.codec_for(key) {
            Some(codec) => codec.locale() == default_locale || !value.is_blank(),
            None => true,
        });
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Keys of `flat` that are neither `sys.*` columns nor field keys.
    pub fn unknown_columns(&self, flat: &FlatRecord) -> Vec<String> {
        flat.keys()
            .filter(|k| !SYS_KEYS.contains(k) && !self.by_key.contains_key(*k))
            .map(str::to_string)
            .collect()
    }

    /// Fails when `flat` carries keys this content type does not define.
    pub fn validate_columns(&self, flat: &FlatRecord) -> TranscodeResult<()> {
        let columns = self.unknown_columns(flat);
        if columns.is_empty() {
            Ok(())
        } else {
            Err(TranscodeError::UnknownColumns {
                content_type: self.content_type_id.clone(),
                columns,
            })
        }
    }
}

// ── sys.* columns ────────────────────────────────────────────────────

fn write_sys(sys: &SystemMetadata, flat: &mut FlatRecord) {
    flat.insert(sys_key::ID, sys.id.clone());
    flat.insert(sys_key::TYPE, sys.entry_type.clone());
    flat.insert(sys_key::UPDATED_AT, sys.updated_at);
    flat.insert(sys_key::VERSION, sys.version);
    flat.insert(sys_key::PUBLISHED_VERSION, sys.published_version);
    flat.insert(sys_key::PUBLISHED_COUNTER, sys.published_counter);
    flat.insert(sys_key::PUBLISHED_AT, sys.published_at);
    flat.insert(sys_key::FIRST_PUBLISHED_AT, sys.first_published_at);
    flat.insert(sys_key::CONTENT_TYPE, sys.content_type_id());
    flat.insert(sys_key::SPACE, sys.space_id());
    flat.insert(sys_key::ENVIRONMENT, sys.environment_id());
}

fn read_sys(flat: &FlatRecord) -> Result<SystemMetadata, DecodeError> {
    Ok(SystemMetadata {
        id: sys_text(flat, sys_key::ID),
        entry_type: sys_text(flat, sys_key::TYPE),
        updated_at: sys_date(flat, sys_key::UPDATED_AT)?,
        version: sys_integer(flat, sys_key::VERSION)?,
        published_version: sys_integer(flat, sys_key::PUBLISHED_VERSION)?,
        published_counter: sys_integer(flat, sys_key::PUBLISHED_COUNTER)?,
        published_at: sys_date(flat, sys_key::PUBLISHED_AT)?,
        first_published_at: sys_date(flat, sys_key::FIRST_PUBLISHED_AT)?,
        content_type: sys_link(flat, sys_key::CONTENT_TYPE, "ContentType"),
        space: sys_link(flat, sys_key::SPACE, "Space"),
        environment: sys_link(flat, sys_key::ENVIRONMENT, "Environment"),
        ..SystemMetadata::default()
    })
}

fn sys_text(flat: &FlatRecord, key: &str) -> Option<String> {
    flat.value(key).to_text().map(|s| s.trim().to_string())
}

fn sys_link(flat: &FlatRecord, key: &str, link_type: &str) -> Option<LinkRef> {
    sys_text(flat, key).map(|id| LinkRef::new(link_type, &id))
}

fn sys_integer(flat: &FlatRecord, key: &str) -> Result<Option<i64>, DecodeError> {
    let cell = flat.value(key);
    if cell.is_blank() {
        return Ok(None);
    }
    parse_integer(cell)
        .map(Some)
        .map_err(|reason| DecodeError::new(key, FieldKind::Integer, reason))
}

fn sys_date(flat: &FlatRecord, key: &str) -> Result<Option<CmsTimestamp>, DecodeError> {
    let cell = flat.value(key);
    if cell.is_blank() {
        return Ok(None);
    }
    parse_date(cell)
        .map(Some)
        .map_err(|reason| DecodeError::new(key, FieldKind::Date, reason))
}
