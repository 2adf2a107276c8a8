//! Content-type and field schema model
//!
//! `draftsmith-schema` is the schema core of the Draftsmith admin: it owns
//! what a content type *is* — an ordered set of typed, configurable fields —
//! and nothing about how field values are edited or rendered.
//!
//! # Architecture
//!
//! - **Schema-only**: content types and field definitions, never field values
//! - **JSON on disk**: one `.json` per content type, fields embedded in
//!   display order
//! - **Opaque payloads**: `options`, `default_value`, and `validation` are
//!   structured values interpreted only by the renderer for a field's kind
//! - **Defensive presentation boundary**: visual variant tags from persisted
//!   configuration pass through [`UiVariant::normalize`] before styling

pub mod editor;
pub mod error;
pub mod ids;
pub mod store;
pub mod types;
pub mod variant;

pub use editor::{ChangeEvent, EditorBinding};
pub use error::{Result, SchemaError};
pub use ids::{ContentTypeId, FieldId, UserId};
pub use store::SchemaStore;
pub use types::{
    sort_fields, ContentType, ContentTypeField, ContentTypePatch, FieldKind, FieldPatch,
    NewContentType, NewField,
};
pub use variant::UiVariant;
