//! Per-field settings sessions and the category-scoped save protocol
//!
//! When a field is opened for editing, a [`SettingsSession`] loads its
//! settings document — a map from category name (`"general"`,
//! `"appearance"`, …) to that category's settings — and holds it for the
//! life of the editor. Panels don't talk to the session directly: each gets
//! a [`CategorySettings`] middleware bound to one category name, exposing
//! `settings` / `update_settings` / `save_to_database` / `is_saving`.
//!
//! # Save semantics
//!
//! - Each save is tagged with its category; the backend writes only that
//!   slice, never siblings.
//! - Different categories save concurrently; same-category saves are
//!   serialized in issue order.
//! - `is_saving` is global per field: true while *any* category's save is
//!   outstanding.
//! - A failed save leaves the in-memory value unchanged. No retries.

pub mod backend;
pub mod category;
pub mod document;
pub mod error;
pub mod session;

pub use backend::{FsBackend, MemoryBackend, PendingSave, SaveGate, SaveRecord, SettingsBackend};
pub use category::CategorySettings;
pub use document::SettingsDocument;
pub use error::{Result, SettingsError};
pub use session::SettingsSession;
