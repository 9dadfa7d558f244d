//! Per-field, per-locale conversion between nested JSON and flat cells.

use cute_model::{FieldDefinition, FieldKind, FlatRecord, FlatValue};
use cute_types::CmsTimestamp;
use serde_json::{Value, json};
use tracing::debug;

use crate::config::{ArrayComparison, CodecConfig};
use crate::error::{DecodeError, SchemaError, SchemaResult};
use crate::richtext;

/// Separator between array items in a flat cell.
pub const ARRAY_DELIMITER: char = '|';

/// Accepted when a cell contains no [`ARRAY_DELIMITER`].
const FALLBACK_ARRAY_DELIMITER: char = ',';

const LAT: &str = "lat";
const LON: &str = "lon";

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Codec for one field in one locale.
///
/// Knows the flat key(s) the field occupies and converts values in both
/// directions. Immutable after construction.
#[derive(Debug, Clone)]
pub struct FieldCodec {
    field_id: String,
    locale: String,
    kind: FieldKind,
    item_kind: Option<FieldKind>,
    link_type: String,
    full_name: String,
    keys: Vec<String>,
    array_comparison: ArrayComparison,
}

impl FieldCodec {
    /// Builds a codec with the default configuration.
    pub fn new(locale: &str, field: &FieldDefinition) -> SchemaResult<Self> {
        Self::with_config(locale, field, &CodecConfig::default())
    }

    pub fn with_config(locale: &str, field: &FieldDefinition, config: &CodecConfig) -> SchemaResult<Self> {
        let kind = field.kind().ok_or_else(|| SchemaError::UnknownFieldKind {
            field: field.id.clone(),
            type_name: field.field_type.clone(),
        })?;

        let (item_kind, declared_link_type) = if kind == FieldKind::Array {
            let items = field
                .items
                .as_ref()
                .ok_or_else(|| SchemaError::MissingItems(field.id.clone()))?;
            let item_kind = items.kind().ok_or_else(|| SchemaError::UnknownFieldKind {
                field: field.id.clone(),
                type_name: items.item_type.clone(),
            })?;
            (Some(item_kind), items.link_type.clone())
        } else {
            (None, field.link_type.clone())
        };

        let base = format!("{}.{}", field.id, locale);
        let full_name = match kind {
            FieldKind::Array => format!("{base}[]"),
            _ => base,
        };
        let keys = match kind {
            FieldKind::Location => vec![format!("{full_name}.{LAT}"), format!("{full_name}.{LON}")],
            _ => vec![full_name.clone()],
        };

        Ok(Self {
            field_id: field.id.clone(),
            locale: locale.to_string(),
            kind,
            item_kind,
            link_type: declared_link_type.unwrap_or_else(|| config.default_link_type.clone()),
            full_name,
            keys,
            array_comparison: config.array_comparison,
        })
    }

    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Item kind of an `Array` field.
    pub fn item_kind(&self) -> Option<FieldKind> {
        self.item_kind
    }

    /// Link type written into decoded references.
    pub fn link_type(&self) -> &str {
        &self.link_type
    }

    /// `fieldId.locale`, with `[]` appended for arrays.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// The flat keys this codec reads and writes: two for `Location`, one
    /// otherwise.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn error(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError::new(&self.full_name, self.kind, reason)
    }

    // ── Encode ───────────────────────────────────────────────────────

    /// Encodes a nested value into one cell per key in [`keys`](Self::keys).
    ///
    /// Never fails: missing values and values of an unexpected shape become
    /// `Null`.
    pub fn encode(&self, value: &Value) -> Vec<FlatValue> {
        match self.kind {
            FieldKind::Location => match value {
                Value::Object(point) => vec![coordinate(point.get(LAT)), coordinate(point.get(LON))],
                _ => vec![FlatValue::Null, FlatValue::Null],
            },
            _ => vec![self.encode_scalar(value)],
        }
    }

    /// Encodes a nested value and writes it under this codec's keys.
    pub fn encode_into(&self, value: &Value, out: &mut FlatRecord) {
        for (key, cell) in self.keys.iter().zip(self.encode(value)) {
            out.insert(key.as_str(), cell);
        }
    }

    fn encode_scalar(&self, value: &Value) -> FlatValue {
        if value.is_null() {
            return FlatValue::Null;
        }

        let encoded = match self.kind {
            FieldKind::Symbol | FieldKind::Text => scalar_text(value).map(FlatValue::String),
            FieldKind::Integer => value
                .as_i64()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
                .map(FlatValue::Integer),
            FieldKind::Number => value.as_f64().map(FlatValue::Number),
            FieldKind::Boolean => value.as_bool().map(FlatValue::Bool),
            FieldKind::Date => value.as_str().map(|raw| match CmsTimestamp::parse(raw) {
                Ok(ts) => FlatValue::Date(ts),
                Err(_) => FlatValue::String(raw.to_string()),
            }),
            FieldKind::Link => link_id(value).map(|id| FlatValue::String(id.to_string())),
            FieldKind::Array => value.as_array().map(|items| FlatValue::String(self.join_items(items))),
            FieldKind::Object => Some(FlatValue::String(value.to_string())),
            FieldKind::RichText => Some(FlatValue::String(richtext::to_markdown(value))),
            // Two cells; see `encode`.
            FieldKind::Location => None,
        };

        encoded.unwrap_or_else(|| {
            debug!(field = %self.full_name, kind = %self.kind, "unexpected value shape, encoding as null");
            FlatValue::Null
        })
    }

    fn join_items(&self, items: &[Value]) -> String {
        let tokens: Vec<String> = items
            .iter()
            .filter_map(|item| match self.item_kind {
                Some(FieldKind::Link) => link_id(item).map(str::to_string),
                _ => scalar_text(item),
            })
            .collect();
        tokens.join(&ARRAY_DELIMITER.to_string())
    }

    // ── Decode ───────────────────────────────────────────────────────

    /// Decodes the cells read from [`keys`](Self::keys) (in the same order;
    /// `None` for a missing key) into a nested value.
    pub fn decode(&self, cells: &[Option<&FlatValue>]) -> Result<Value, DecodeError> {
        if self.kind == FieldKind::Location {
            return self.decode_location(cells);
        }

        let Some(cell) = cells.first().copied().flatten() else {
            return Ok(Value::Null);
        };
        if cell.is_null() {
            return Ok(Value::Null);
        }

        match self.kind {
            FieldKind::Symbol | FieldKind::Text => Ok(Value::String(cell.to_string())),
            FieldKind::Array => Ok(Value::Array(
                split_array(cell).iter().map(|token| self.item_value(token)).collect(),
            )),
            _ if cell.is_blank() => Ok(Value::Null),
            FieldKind::RichText => Ok(richtext::document_from_text(&cell.to_string())),
            FieldKind::Integer => parse_integer(cell).map(Value::from).map_err(|r| self.error(r)),
            FieldKind::Number => parse_number(cell).map(number_value).map_err(|r| self.error(r)),
            FieldKind::Date => parse_date(cell)
                .map(|ts| Value::String(ts.to_rfc3339()))
                .map_err(|r| self.error(r)),
            FieldKind::Boolean => parse_bool(cell).map(Value::Bool).map_err(|r| self.error(r)),
            FieldKind::Link => Ok(self.link_value(cell.to_string().trim())),
            FieldKind::Object => match cell {
                FlatValue::String(text) => {
                    serde_json::from_str(text).map_err(|e| self.error(format!("invalid JSON: {e}")))
                }
                other => Ok(other.to_json()),
            },
            FieldKind::Location => self.decode_location(cells),
        }
    }

    /// Reads this codec's keys from a flat record and decodes them.
    pub fn decode_from(&self, flat: &FlatRecord) -> Result<Value, DecodeError> {
        let cells: Vec<Option<&FlatValue>> = self.keys.iter().map(|k| flat.get(k)).collect();
        self.decode(&cells)
    }

    fn decode_location(&self, cells: &[Option<&FlatValue>]) -> Result<Value, DecodeError> {
        let present = |i: usize| cells.get(i).copied().flatten().filter(|c| !c.is_blank());
        let (Some(lat), Some(lon)) = (present(0), present(1)) else {
            return Ok(Value::Null);
        };
        let lat = parse_number(lat).map_err(|r| self.error(format!("latitude: {r}")))?;
        let lon = parse_number(lon).map_err(|r| self.error(format!("longitude: {r}")))?;
        Ok(json!({ LAT: number_value(lat), LON: number_value(lon) }))
    }

    fn item_value(&self, token: &str) -> Value {
        match self.item_kind {
            Some(FieldKind::Link) => self.link_value(token),
            _ => Value::String(token.to_string()),
        }
    }

    fn link_value(&self, id: &str) -> Value {
        json!({ "sys": { "type": "Link", "linkType": self.link_type, "id": id } })
    }

    // ── Compare ──────────────────────────────────────────────────────

    /// Reports whether two cells hold semantically different values.
    ///
    /// `Object` values are compared structurally, `Array` values by their
    /// decoded item lists, everything else by its normalized text. Values
    /// that cannot be interpreted compare as not different.
    pub fn compare(&self, old: &FlatValue, new: &FlatValue) -> bool {
        match self.kind {
            FieldKind::Object => objects_differ(old, new),
            FieldKind::Array if self.array_comparison == ArrayComparison::Multiset => {
                let mut a = split_array(old);
                let mut b = split_array(new);
                a.sort_unstable();
                b.sort_unstable();
                a != b
            }
            _ => match (self.normalize(old), self.normalize(new)) {
                (Ok(a), Ok(b)) => a != b,
                _ => false,
            },
        }
    }

    /// The decoded text form of a cell; `None` when blank.
    pub fn normalize(&self, cell: &FlatValue) -> Result<Option<String>, DecodeError> {
        if cell.is_blank() {
            return Ok(None);
        }
        let text = match self.kind {
            FieldKind::Symbol | FieldKind::Text | FieldKind::RichText | FieldKind::Object => cell.to_string(),
            FieldKind::Link => cell.to_string().trim().to_string(),
            FieldKind::Integer => parse_integer(cell).map_err(|r| self.error(r))?.to_string(),
            FieldKind::Number | FieldKind::Location => {
                parse_number(cell).map_err(|r| self.error(r))?.to_string()
            }
            FieldKind::Date => {
                let instant = parse_date(cell).map_err(|r| self.error(r))?.to_utc();
                CmsTimestamp::from_utc(instant).to_rfc3339()
            }
            FieldKind::Boolean => parse_bool(cell).map_err(|r| self.error(r))?.to_string(),
            FieldKind::Array => split_array(cell).join(&ARRAY_DELIMITER.to_string()),
        };
        Ok(Some(text))
    }

    /// Merges `new` into `old` for append-style updates.
    ///
    /// Arrays keep the existing items and add new items not yet present;
    /// every other kind takes the new value.
    pub fn merge_append(&self, old: &FlatValue, new: &FlatValue) -> FlatValue {
        if self.kind != FieldKind::Array {
            return new.clone();
        }
        let mut items = split_array(old);
        for token in split_array(new) {
            if !items.contains(&token) {
                items.push(token);
            }
        }
        if items.is_empty() && old.is_null() {
            return FlatValue::Null;
        }
        FlatValue::String(items.join(&ARRAY_DELIMITER.to_string()))
    }
}

// ── Conversions ──────────────────────────────────────────────────────

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn link_id(value: &Value) -> Option<&str> {
    value.pointer("/sys/id").and_then(Value::as_str)
}

fn coordinate(value: Option<&Value>) -> FlatValue {
    value.and_then(Value::as_f64).map_or(FlatValue::Null, FlatValue::Number)
}

/// Splits an array cell on `|`, or on `,` when no `|` is present.
/// Tokens are trimmed and empty tokens dropped.
fn split_array(cell: &FlatValue) -> Vec<String> {
    let text = cell.to_string();
    let delimiter = if text.contains(ARRAY_DELIMITER) {
        ARRAY_DELIMITER
    } else {
        FALLBACK_ARRAY_DELIMITER
    };
    text.split(delimiter)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Integral values within the exactly-representable range become JSON
/// integers, everything else a JSON float.
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

pub(crate) fn parse_integer(cell: &FlatValue) -> Result<i64, String> {
    match cell {
        FlatValue::Integer(i) => Ok(*i),
        FlatValue::Number(n) if n.fract() == 0.0 && n.abs() < MAX_SAFE_INTEGER => Ok(*n as i64),
        FlatValue::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a valid integer")),
        other => Err(format!("'{other}' is not a valid integer")),
    }
}

pub(crate) fn parse_number(cell: &FlatValue) -> Result<f64, String> {
    let n = match cell {
        FlatValue::Number(n) => *n,
        FlatValue::Integer(i) => *i as f64,
        FlatValue::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("'{s}' is not a valid number"))?,
        other => return Err(format!("'{other}' is not a valid number")),
    };
    if n.is_finite() {
        Ok(n)
    } else {
        Err(format!("'{cell}' is not a finite number"))
    }
}

pub(crate) fn parse_date(cell: &FlatValue) -> Result<CmsTimestamp, String> {
    match cell {
        FlatValue::Date(ts) => Ok(*ts),
        FlatValue::String(s) => CmsTimestamp::parse(s).map_err(|e| e.to_string()),
        other => Err(format!("'{other}' is not a valid date")),
    }
}

pub(crate) fn parse_bool(cell: &FlatValue) -> Result<bool, String> {
    match cell {
        FlatValue::Bool(b) => Ok(*b),
        FlatValue::Integer(i) => Ok(*i != 0),
        FlatValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(format!("'{s}' is not a valid boolean")),
        },
        other => Err(format!("'{other}' is not a valid boolean")),
    }
}

fn parse_object(cell: &FlatValue) -> Option<Option<Value>> {
    match cell {
        _ if cell.is_blank() => Some(None),
        FlatValue::String(text) => serde_json::from_str(text).ok().map(Some),
        other => Some(Some(other.to_json())),
    }
}

fn objects_differ(old: &FlatValue, new: &FlatValue) -> bool {
    match (parse_object(old), parse_object(new)) {
        (Some(a), Some(b)) => a != b,
        _ => false,
    }
}
