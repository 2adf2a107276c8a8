//! Category-scoped settings middleware.
//!
//! A [`CategorySettings`] narrows a whole-field [`SettingsSession`] to one
//! named settings category, so a settings panel edits "its" slice without
//! knowing any sibling categories exist. Every category shares this one
//! generic adapter; there is no per-category type.

use serde_json::Value;

use crate::error::Result;
use crate::session::SettingsSession;

/// Adapter exposing one settings category of a session.
///
/// The contract mirrors what settings-panel surfaces consume:
/// current `settings()`, a save entry point (under both of its historical
/// names), and the session-wide `is_saving()` flag.
#[derive(Clone)]
pub struct CategorySettings {
    session: SettingsSession,
    category: String,
}

impl CategorySettings {
    pub fn new(session: SettingsSession, category: impl Into<String>) -> Self {
        Self {
            session,
            category: category.into(),
        }
    }

    /// The category this handle is bound to.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// This category's current in-memory settings. Always a value — an
    /// empty object when nothing was saved yet, never null.
    pub fn settings(&self) -> Value {
        self.session.category_value(&self.category)
    }

    /// Persist new settings for this category. The save is tagged with the
    /// category name so the store touches only this slice.
    pub async fn update_settings(&self, value: Value) -> Result<()> {
        self.session.save(&self.category, value).await
    }

    /// Alias for [`update_settings`](Self::update_settings) — some panel
    /// call sites use this name. Both must stay callable.
    pub async fn save_to_database(&self, value: Value) -> Result<()> {
        self.update_settings(value).await
    }

    /// True while any save for the owning field is in flight, regardless of
    /// which category issued it. Deliberately not per-category.
    pub fn is_saving(&self) -> bool {
        self.session.is_saving()
    }
}
