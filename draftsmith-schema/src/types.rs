//! Content-type and field schema types.
//!
//! A `ContentType` is a user-defined schema: singleton document or collection,
//! with an ordered set of typed, configurable fields. All types serialize
//! to/from JSON via serde. `options`, `default_value`, and `validation` are
//! opaque payloads interpreted by the renderer for the field's kind, never by
//! this crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::ids::{ContentTypeId, FieldId, UserId};

/// The type tag of a field — selects which editor and renderer apply.
///
/// Known kinds get named variants; anything else round-trips losslessly
/// through `Other`, so extension field types pass through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Text,
    RichText,
    Number,
    Boolean,
    DateTime,
    Select,
    Media,
    Reference,
    Other(String),
}

impl FieldKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::RichText => "rich-text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::DateTime => "date-time",
            Self::Select => "select",
            Self::Media => "media",
            Self::Reference => "reference",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "text" => Self::Text,
            "rich-text" => Self::RichText,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "date-time" => Self::DateTime,
            "select" => Self::Select,
            "media" => Self::Media,
            "reference" => Self::Reference,
            _ => Self::Other(s),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field definition, always owned by exactly one content type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentTypeField {
    pub id: FieldId,
    pub content_type_id: ContentTypeId,
    pub user_id: UserId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Display sequence within the owning content type. Interpreted only as
    /// a sort key, never as an index; ties break by `id`.
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentTypeField {
    /// The sort key establishing the total display order.
    pub fn sort_key(&self) -> (i32, FieldId) {
        (self.order, self.id)
    }
}

/// Sort a field set into display order: by `order`, ties broken by `id`.
pub fn sort_fields(fields: &mut [ContentTypeField]) {
    fields.sort_by_key(ContentTypeField::sort_key);
}

/// A user-defined content schema — singleton document or collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentType {
    pub id: ContentTypeId,
    pub user_id: UserId,
    /// Machine-facing name, unique within the owning account.
    pub api_id: String,
    pub api_id_plural: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// True = multiple entries; false = singleton document.
    #[serde(default)]
    pub is_collection: bool,
    #[serde(default)]
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Fields in display order.
    #[serde(default)]
    pub fields: Vec<ContentTypeField>,
}

/// Input for creating a content type. Identity and timestamps are assigned
/// by the store.
#[derive(Debug, Clone)]
pub struct NewContentType {
    pub user_id: UserId,
    pub api_id: String,
    pub api_id_plural: String,
    pub name: String,
    pub description: String,
    pub is_collection: bool,
}

impl NewContentType {
    pub fn new(
        user_id: UserId,
        api_id: impl Into<String>,
        api_id_plural: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            api_id: api_id.into(),
            api_id_plural: api_id_plural.into(),
            name: name.into(),
            description: String::new(),
            is_collection: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Mark this content type as a singleton document.
    pub fn singleton(mut self) -> Self {
        self.is_collection = false;
        self
    }
}

/// Input for creating a field. The `content_type_id` must reference an
/// existing content type owned by the same `user_id`; the store rejects
/// anything else before writing.
#[derive(Debug, Clone)]
pub struct NewField {
    pub content_type_id: ContentTypeId,
    pub user_id: UserId,
    pub name: String,
    pub kind: FieldKind,
    pub order: i32,
    pub is_required: bool,
    pub default_value: Option<Value>,
    pub options: Option<Value>,
    pub validation: Option<Value>,
}

impl NewField {
    pub fn new(
        content_type_id: ContentTypeId,
        user_id: UserId,
        name: impl Into<String>,
        kind: FieldKind,
    ) -> Self {
        Self {
            content_type_id,
            user_id,
            name: name.into(),
            kind,
            order: 0,
            is_required: false,
            default_value: None,
            options: None,
            validation: None,
        }
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn with_default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_validation(mut self, validation: Value) -> Self {
        self.validation = Some(validation);
        self
    }
}

/// Partial update for a content type. `None` = don't change.
#[derive(Debug, Clone, Default)]
pub struct ContentTypePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub api_id: Option<String>,
    pub api_id_plural: Option<String>,
    pub is_collection: Option<bool>,
}

/// Partial update for a field. `None` = don't change; for the payload
/// fields, `Some(None)` = clear, `Some(Some(v))` = set.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub kind: Option<FieldKind>,
    pub order: Option<i32>,
    pub is_required: Option<bool>,
    pub default_value: Option<Option<Value>>,
    pub options: Option<Option<Value>>,
    pub validation: Option<Option<Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_field(name: &str, order: i32) -> ContentTypeField {
        let now = Utc::now();
        ContentTypeField {
            id: FieldId::new(),
            content_type_id: ContentTypeId::new(),
            user_id: UserId::new(),
            name: name.into(),
            kind: FieldKind::Text,
            order,
            is_required: false,
            default_value: None,
            options: None,
            validation: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn field_kind_known_tags_round_trip() {
        for tag in [
            "text",
            "rich-text",
            "number",
            "boolean",
            "date-time",
            "select",
            "media",
            "reference",
        ] {
            let kind = FieldKind::from(tag.to_string());
            assert!(!matches!(kind, FieldKind::Other(_)), "tag: {tag}");
            assert_eq!(kind.as_str(), tag);
        }
    }

    #[test]
    fn field_kind_unknown_tag_preserved() {
        let kind = FieldKind::from("geo-point".to_string());
        assert_eq!(kind, FieldKind::Other("geo-point".into()));

        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, "\"geo-point\"");
        let parsed: FieldKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, kind);
    }

    #[test]
    fn field_kind_serializes_as_bare_string() {
        let json = serde_json::to_string(&FieldKind::RichText).unwrap();
        assert_eq!(json, "\"rich-text\"");
    }

    #[test]
    fn field_serializes_kind_under_type_key() {
        let field = make_field("body", 0);
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], json!("text"));
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn sort_fields_orders_by_order_then_id() {
        let mut a = make_field("a", 2);
        let b = make_field("b", 1);
        let mut c = make_field("c", 1);
        // Force a tie on order; ids decide.
        a.order = 1;
        c.order = 1;

        let mut fields = vec![a.clone(), b.clone(), c.clone()];
        sort_fields(&mut fields);

        let mut expected = vec![a, b, c];
        expected.sort_by_key(|f| (f.order, f.id));
        assert_eq!(fields, expected);
        assert!(fields.windows(2).all(|w| w[0].sort_key() <= w[1].sort_key()));
    }

    #[test]
    fn field_order_survives_json_round_trip() {
        let mut fields = vec![
            make_field("title", 0),
            make_field("slug", 1),
            make_field("body", 2),
        ];
        sort_fields(&mut fields);

        let json = serde_json::to_string(&fields).unwrap();
        let mut parsed: Vec<ContentTypeField> = serde_json::from_str(&json).unwrap();
        sort_fields(&mut parsed);
        assert_eq!(parsed, fields);

        // Re-serializing reproduces the same sequence.
        assert_eq!(serde_json::to_string(&parsed).unwrap(), json);
    }

    #[test]
    fn optional_payloads_omitted_when_absent() {
        let field = make_field("title", 0);
        let json = serde_json::to_string(&field).unwrap();
        assert!(!json.contains("default_value"));
        assert!(!json.contains("options"));
        assert!(!json.contains("validation"));
    }

    #[test]
    fn payloads_are_opaque_structured_values() {
        let mut field = make_field("status", 0);
        field.kind = FieldKind::Select;
        field.options = Some(json!({
            "choices": ["draft", "review", "published"],
            "ui_variant": "pill"
        }));
        field.validation = Some(json!({ "min_length": 1 }));
        field.default_value = Some(json!("draft"));

        let json = serde_json::to_string(&field).unwrap();
        let parsed: ContentTypeField = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, field);
    }

    #[test]
    fn new_content_type_builder() {
        let ct = NewContentType::new(UserId::new(), "post", "posts", "Blog Post")
            .with_description("Long-form articles")
            .singleton();
        assert_eq!(ct.api_id, "post");
        assert!(!ct.is_collection);
        assert_eq!(ct.description, "Long-form articles");
    }
}
