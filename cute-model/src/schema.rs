use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ModelResult;

/// A content type as defined in the CMS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeSchema {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Field used as the entry title in the CMS UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_field: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

impl ContentTypeSchema {
    /// Creates a schema with the given id and fields.
    pub fn new(id: &str, fields: Vec<FieldDefinition>) -> Self {
        Self {
            id: id.into(),
            name: id.into(),
            display_field: None,
            fields,
        }
    }

    /// Sets the display field.
    #[must_use]
    pub fn with_display_field(mut self, field_id: &str) -> Self {
        self.display_field = Some(field_id.into());
        self
    }

    /// Parses the CMS content-type JSON, where the id lives under `sys.id`.
    pub fn from_cms_json(json: &serde_json::Value) -> ModelResult<Self> {
        let raw: CmsContentType = serde_json::from_value(json.clone())?;
        Ok(Self {
            id: raw.sys.id,
            name: raw.name,
            display_field: raw.display_field,
            fields: raw.fields,
        })
    }

    /// Looks up a field definition by id.
    pub fn field(&self, id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == id)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CmsContentType {
    sys: CmsSys,
    #[serde(default)]
    name: String,
    #[serde(default)]
    display_field: Option<String>,
    #[serde(default)]
    fields: Vec<FieldDefinition>,
}

#[derive(Deserialize)]
struct CmsSys {
    id: String,
}

/// One field of a content type.
///
/// `field_type` keeps the raw CMS type name; it is resolved to a
/// [`FieldKind`] when a codec is compiled so that unknown types surface as
/// schema errors at that point rather than at parse time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default)]
    pub localized: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub omitted: bool,
    /// Target of a `Link` field (`Entry` or `Asset`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    /// Item schema of an `Array` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemSchema>,
}

impl FieldDefinition {
    /// Creates a non-localized field with a raw type name.
    pub fn new(id: &str, field_type: &str) -> Self {
        Self {
            id: id.into(),
            name: id.into(),
            field_type: field_type.into(),
            localized: false,
            required: false,
            disabled: false,
            omitted: false,
            link_type: None,
            items: None,
        }
    }

    fn of_kind(id: &str, kind: FieldKind) -> Self {
        Self::new(id, kind.type_name())
    }

    /// Marks the field as localized.
    #[must_use]
    pub fn localized(mut self) -> Self {
        self.localized = true;
        self
    }

    /// Shorthand for a short text field.
    pub fn symbol(id: &str) -> Self {
        Self::of_kind(id, FieldKind::Symbol)
    }

    /// Shorthand for a long text field.
    pub fn text(id: &str) -> Self {
        Self::of_kind(id, FieldKind::Text)
    }

    /// Shorthand for a rich-text document field.
    pub fn rich_text(id: &str) -> Self {
        Self::of_kind(id, FieldKind::RichText)
    }

    /// Shorthand for an integer field.
    pub fn integer(id: &str) -> Self {
        Self::of_kind(id, FieldKind::Integer)
    }

    /// Shorthand for a decimal number field.
    pub fn number(id: &str) -> Self {
        Self::of_kind(id, FieldKind::Number)
    }

    /// Shorthand for a date field.
    pub fn date(id: &str) -> Self {
        Self::of_kind(id, FieldKind::Date)
    }

    /// Shorthand for a geographic location field.
    pub fn location(id: &str) -> Self {
        Self::of_kind(id, FieldKind::Location)
    }

    /// Shorthand for a boolean field.
    pub fn boolean(id: &str) -> Self {
        Self::of_kind(id, FieldKind::Boolean)
    }

    /// Shorthand for a JSON object field.
    pub fn object(id: &str) -> Self {
        Self::of_kind(id, FieldKind::Object)
    }

    /// Shorthand for a reference to another entry or asset.
    pub fn link(id: &str, link_type: &str) -> Self {
        Self {
            link_type: Some(link_type.into()),
            ..Self::of_kind(id, FieldKind::Link)
        }
    }

    /// Shorthand for a list of short texts.
    pub fn symbols(id: &str) -> Self {
        Self {
            items: Some(ItemSchema::new(FieldKind::Symbol.type_name())),
            ..Self::of_kind(id, FieldKind::Array)
        }
    }

    /// Shorthand for a list of references.
    pub fn links(id: &str, link_type: &str) -> Self {
        Self {
            items: Some(ItemSchema::link(link_type)),
            ..Self::of_kind(id, FieldKind::Array)
        }
    }

    /// Resolves the raw type name, if it is one the CMS defines.
    pub fn kind(&self) -> Option<FieldKind> {
        FieldKind::from_type_name(&self.field_type)
    }
}

/// Item declaration of an `Array` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSchema {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

impl ItemSchema {
    pub fn new(item_type: &str) -> Self {
        Self {
            item_type: item_type.into(),
            link_type: None,
        }
    }

    pub fn link(link_type: &str) -> Self {
        Self {
            item_type: FieldKind::Link.type_name().into(),
            link_type: Some(link_type.into()),
        }
    }

    pub fn kind(&self) -> Option<FieldKind> {
        FieldKind::from_type_name(&self.item_type)
    }
}

/// The field types the CMS defines.
///
/// Serialized with the CMS's own names (`"Symbol"`, `"RichText"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Symbol,
    Text,
    RichText,
    Integer,
    Number,
    Date,
    Location,
    Boolean,
    Link,
    Array,
    Object,
}

impl FieldKind {
    pub const ALL: [FieldKind; 11] = [
        FieldKind::Symbol,
        FieldKind::Text,
        FieldKind::RichText,
        FieldKind::Integer,
        FieldKind::Number,
        FieldKind::Date,
        FieldKind::Location,
        FieldKind::Boolean,
        FieldKind::Link,
        FieldKind::Array,
        FieldKind::Object,
    ];

    /// Resolves a CMS type name. Names are case-sensitive.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.type_name() == name)
    }

    /// The CMS type name.
    pub const fn type_name(self) -> &'static str {
        match self {
            FieldKind::Symbol => "Symbol",
            FieldKind::Text => "Text",
            FieldKind::RichText => "RichText",
            FieldKind::Integer => "Integer",
            FieldKind::Number => "Number",
            FieldKind::Date => "Date",
            FieldKind::Location => "Location",
            FieldKind::Boolean => "Boolean",
            FieldKind::Link => "Link",
            FieldKind::Array => "Array",
            FieldKind::Object => "Object",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}
