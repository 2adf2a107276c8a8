//! Editor surface contract.
//!
//! Editor surfaces (rich-text input, select, grouping container, …) are
//! polymorphic over one capability set: an [`EditorBinding`]. The binding is
//! plain data — a surface renders it, routes any configured variant through
//! the normalizer, and emits edits outward as [`ChangeEvent`]s instead of
//! mutating the bound value.

use serde_json::Value;

use crate::ids::FieldId;
use crate::types::ContentTypeField;
use crate::variant::UiVariant;

/// The capability set handed to an editor surface for one field.
#[derive(Debug, Clone)]
pub struct EditorBinding {
    pub field_id: FieldId,
    /// Current value. Surfaces never write this directly; changes flow
    /// outward through [`EditorBinding::change`].
    pub value: Value,
    pub required: bool,
    pub invalid: bool,
    pub help_text: Option<String>,
    pub error_message: Option<String>,
    pub placeholder: Option<String>,
    /// Raw variant configuration, straight from persisted field options.
    /// Only [`EditorBinding::resolved_variant`] may interpret it.
    pub ui_variant: Value,
}

/// An edit emitted by a surface, to be routed to the settings/value layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEvent {
    pub field_id: FieldId,
    pub value: Value,
}

impl EditorBinding {
    /// Build a binding for a field definition, seeding the value from the
    /// field's default and the display options from its `options` payload.
    pub fn for_field(field: &ContentTypeField) -> Self {
        let options = field.options.as_ref();
        let opt_str = |key: &str| {
            options
                .and_then(|o| o.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        Self {
            field_id: field.id,
            value: field.default_value.clone().unwrap_or(Value::Null),
            required: field.is_required,
            invalid: false,
            help_text: opt_str("help_text"),
            error_message: None,
            placeholder: opt_str("placeholder"),
            ui_variant: options
                .and_then(|o| o.get("ui_variant"))
                .cloned()
                .unwrap_or(Value::Null),
        }
    }

    /// The variant to style with — always gated through the normalizer.
    pub fn resolved_variant(&self) -> UiVariant {
        UiVariant::normalize(&self.ui_variant)
    }

    /// The line shown under the control: the error message when the binding
    /// is invalid and one is supplied, otherwise the ordinary help text.
    pub fn status_text(&self) -> Option<&str> {
        if self.invalid {
            if let Some(msg) = self.error_message.as_deref() {
                return Some(msg);
            }
        }
        self.help_text.as_deref()
    }

    /// Mark the binding invalid with a message to surface.
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.invalid = true;
        self.error_message = Some(message.into());
        self
    }

    /// Emit an edit. The binding's own value is untouched; the caller owns
    /// routing the event back through the settings layer.
    pub fn change(&self, value: Value) -> ChangeEvent {
        ChangeEvent {
            field_id: self.field_id,
            value,
        }
    }
}
