use cute_types::CmsTimestamp;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{LocaleSet, ModelError, ModelResult};

/// Values of one field keyed by locale code.
pub type LocalizedValues = IndexMap<String, Value>;

/// A CMS entry in its native nested shape.
///
/// `fields` maps field id → locale code → JSON value, the management API
/// layout. Serializes to `{"sys": .., "fields": ..}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NestedRecord {
    #[serde(default)]
    pub sys: SystemMetadata,
    #[serde(default)]
    pub fields: IndexMap<String, LocalizedValues>,
}

impl NestedRecord {
    pub fn new(sys: SystemMetadata) -> Self {
        Self {
            sys,
            fields: IndexMap::new(),
        }
    }

    /// Reads an entry as returned by either CMS API.
    ///
    /// Management entries carry `field → {locale → value}`; delivery entries
    /// fetched for one locale carry `field → value` and set `sys.locale`.
    /// Entries with `sys.locale` are read as plain throughout; otherwise the
    /// shape is resolved per field with [`FieldShape::sniff`] and plain
    /// values are stored under the default locale.
    pub fn from_cms_json(json: &Value, locales: &LocaleSet) -> ModelResult<Self> {
        let Value::Object(root) = json else {
            return Err(ModelError::InvalidEntry("entry must be a JSON object".into()));
        };

        let sys: SystemMetadata = match root.get("sys") {
            Some(sys) => serde_json::from_value(sys.clone())?,
            None => SystemMetadata::default(),
        };

        let delivery = sys.locale.is_some();
        let plain_locale = sys
            .locale
            .clone()
            .unwrap_or_else(|| locales.default_locale().to_string());

        let mut fields = IndexMap::new();
        match root.get("fields") {
            None | Some(Value::Null) => {}
            Some(Value::Object(raw)) => {
                for (id, value) in raw {
                    let shape = if delivery {
                        FieldShape::Plain(value.clone())
                    } else {
                        FieldShape::sniff(value.clone(), locales)
                    };
                    fields.insert(id.clone(), shape.into_localized(&plain_locale));
                }
            }
            Some(_) => {
                return Err(ModelError::InvalidEntry("'fields' must be a JSON object".into()));
            }
        }

        Ok(Self { sys, fields })
    }

    /// The value of a field in one locale.
    pub fn value(&self, field_id: &str, locale: &str) -> Option<&Value> {
        self.fields.get(field_id).and_then(|locs| locs.get(locale))
    }

    /// Sets the value of a field in one locale.
    pub fn set(&mut self, field_id: &str, locale: &str, value: Value) {
        self.fields
            .entry(field_id.to_string())
            .or_default()
            .insert(locale.to_string(), value);
    }

    pub fn has_field(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Reports whether any array present in both records differs in length.
    ///
    /// Fields or locales missing from either side are skipped. Used by
    /// upload diffing to catch a single string that merely looks like a
    /// delimited list in the flat form.
    pub fn array_lengths_differ(&self, other: &NestedRecord) -> bool {
        self.fields.iter().any(|(id, locs)| {
            other.fields.get(id).is_some_and(|other_locs| {
                locs.iter().any(|(locale, value)| {
                    other_locs
                        .get(locale)
                        .is_some_and(|other_value| array_lengths_differ(value, other_value))
                })
            })
        })
    }
}

fn array_lengths_differ(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Array(x), Value::Array(y)) => x.len() != y.len(),
        (Value::Object(x), Value::Object(y)) => x
            .iter()
            .any(|(k, v)| y.get(k).is_some_and(|w| array_lengths_differ(v, w))),
        _ => false,
    }
}

/// How a field arrived from the CMS, resolved once at the record boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldShape {
    /// Delivery shape: the value itself, for a single implied locale.
    Plain(Value),
    /// Management shape: values keyed by locale code.
    Localized(LocalizedValues),
}

impl FieldShape {
    /// Classifies a raw field value.
    ///
    /// An object with at least one configured locale code among its keys is
    /// localized; locales outside the set are carried along. Anything else is
    /// a plain value.
    pub fn sniff(value: Value, locales: &LocaleSet) -> Self {
        match value {
            Value::Object(map) if map.keys().any(|k| locales.contains(k)) => {
                FieldShape::Localized(map.into_iter().collect())
            }
            other => FieldShape::Plain(other),
        }
    }

    /// Normalizes to locale-keyed values, placing a plain value under `locale`.
    pub fn into_localized(self, locale: &str) -> LocalizedValues {
        match self {
            FieldShape::Localized(values) => values,
            FieldShape::Plain(value) => {
                let mut values = LocalizedValues::new();
                values.insert(locale.to_string(), value);
                values
            }
        }
    }
}

/// Reference to another CMS object, as found in `sys` blocks and link fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRef {
    pub sys: LinkSys,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys {
    #[serde(rename = "type", default = "default_link_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    pub id: String,
}

fn default_link_kind() -> String {
    "Link".to_string()
}

impl LinkRef {
    pub fn new(link_type: &str, id: &str) -> Self {
        Self {
            sys: LinkSys {
                kind: default_link_kind(),
                link_type: Some(link_type.into()),
                id: id.into(),
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }
}

/// The `sys` block of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub entry_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<CmsTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<CmsTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_counter: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<CmsTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_published_at: Option<CmsTimestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<LinkRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<LinkRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<LinkRef>,
    /// Set on delivery entries fetched for a single locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl SystemMetadata {
    pub fn content_type_id(&self) -> Option<&str> {
        self.content_type.as_ref().map(LinkRef::id)
    }

    pub fn space_id(&self) -> Option<&str> {
        self.space.as_ref().map(LinkRef::id)
    }

    pub fn environment_id(&self) -> Option<&str> {
        self.environment.as_ref().map(LinkRef::id)
    }

    /// Publication state derived from the version counters.
    pub fn state(&self) -> Option<EntryState> {
        if self.archived_version.is_some() {
            return Some(EntryState::Archived);
        }
        match (self.version, self.published_version) {
            (_, None) | (_, Some(0)) => Some(EntryState::Draft),
            (Some(v), Some(p)) if v == p + 1 => Some(EntryState::Published),
            (Some(v), Some(p)) if v >= p + 2 => Some(EntryState::Changed),
            _ => None,
        }
    }
}

/// Publication state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    Draft,
    Published,
    Changed,
    Archived,
}
