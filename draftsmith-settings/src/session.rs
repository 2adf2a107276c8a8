//! SettingsSession — shared state for one field-editing session.
//!
//! A session loads the field's settings document when editing begins, holds
//! it in memory until the editor closes, and owns the single save operation
//! that category middlewares delegate to. Saves for different categories
//! interleave freely; saves for the same category are serialized in issue
//! order, so an earlier slow save can never clobber a later fast one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;

use draftsmith_schema::FieldId;

use crate::backend::SettingsBackend;
use crate::category::CategorySettings;
use crate::document::SettingsDocument;
use crate::error::Result;

/// Handle to one field's settings-editing session. Cheap to clone; all
/// clones share the same document, save queue, and in-flight accounting.
#[derive(Clone)]
pub struct SettingsSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    field_id: FieldId,
    backend: Arc<dyn SettingsBackend>,
    state: Mutex<SettingsDocument>,
    /// One queue per category; same-category saves apply in issue order.
    category_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    /// Saves issued and not yet resolved, across all categories.
    in_flight: AtomicUsize,
}

/// Keeps `in_flight` accurate on both success and failure paths.
struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SettingsSession {
    /// Begin an editing session: load the field's settings document.
    pub async fn load(field_id: FieldId, backend: Arc<dyn SettingsBackend>) -> Result<Self> {
        let doc = backend.load(&field_id).await?;
        debug!(field = %field_id, categories = doc.len(), "settings session loaded");
        Ok(Self {
            inner: Arc::new(SessionInner {
                field_id,
                backend,
                state: Mutex::new(doc),
                category_locks: Mutex::new(HashMap::new()),
                in_flight: AtomicUsize::new(0),
            }),
        })
    }

    /// The field under edit.
    pub fn field_id(&self) -> FieldId {
        self.inner.field_id
    }

    /// Snapshot of the current in-memory settings document.
    pub fn document(&self) -> SettingsDocument {
        self.state().clone()
    }

    /// Current in-memory value for a category; empty object if absent.
    pub fn category_value(&self, category: &str) -> Value {
        self.state().category(category)
    }

    /// True while at least one save issued through this session — for any
    /// category — has not yet resolved or failed.
    pub fn is_saving(&self) -> bool {
        self.inner.in_flight.load(Ordering::SeqCst) > 0
    }

    /// A category-scoped middleware handle over this session.
    pub fn category(&self, name: impl Into<String>) -> CategorySettings {
        CategorySettings::new(self.clone(), name)
    }

    /// Persist `value` under `category` for the field, then install it in
    /// the in-memory document.
    ///
    /// Only the named category is written; siblings keep their last-known
    /// values. On failure the in-memory value is left unchanged and the
    /// error is surfaced — no optimistic update, no automatic retry.
    pub async fn save(&self, category: &str, value: Value) -> Result<()> {
        let inner = &self.inner;
        inner.in_flight.fetch_add(1, Ordering::SeqCst);
        let _guard = InFlightGuard(&inner.in_flight);

        let queue = self.category_lock(category);
        let _serialized = queue.lock().await;

        inner
            .backend
            .save(&inner.field_id, category, &value)
            .await?;

        self.state().set(category, value);
        debug!(field = %inner.field_id, category, "settings category saved");
        Ok(())
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SettingsDocument> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn category_lock(&self, category: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .inner
            .category_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(category.to_string()).or_default().clone()
    }
}
