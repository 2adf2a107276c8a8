//! Persistence boundary for field settings.
//!
//! A backend persists one category slice at a time, keyed by the field
//! whose settings are being edited. Saves are idempotent: re-applying the
//! same category and value is a no-op in effect.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::fs;
use tokio::sync::{mpsc, oneshot};
use ulid::Ulid;

use draftsmith_schema::FieldId;

use crate::document::SettingsDocument;
use crate::error::{Result, SettingsError};

/// Storage for per-field settings documents.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    /// Load the full settings document for a field. A field with nothing
    /// saved yet yields an empty document.
    async fn load(&self, field: &FieldId) -> Result<SettingsDocument>;

    /// Persist `value` under `category` for the field. Must write only that
    /// category's slice; sibling categories keep their last-known values.
    async fn save(&self, field: &FieldId, category: &str, value: &Value) -> Result<()>;
}

// ---------------------------------------------------------------------------
// Filesystem backend
// ---------------------------------------------------------------------------

/// File-backed settings storage: one `.json` per field holding its category
/// map. Saves read-modify-write only the named category key and land via an
/// atomic rename. Writes are serialized within the backend so concurrent
/// category saves to one field cannot lose each other's slice.
pub struct FsBackend {
    root: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FsBackend {
    /// Open or create the settings directory.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            write_lock: tokio::sync::Mutex::new(()),
        })
    }

    fn settings_path(&self, field: &FieldId) -> PathBuf {
        self.root.join(format!("{field}.json"))
    }

    async fn read_document(&self, field: &FieldId) -> Result<SettingsDocument> {
        let path = self.settings_path(field);
        if !path.exists() {
            return Ok(SettingsDocument::new());
        }
        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl SettingsBackend for FsBackend {
    async fn load(&self, field: &FieldId) -> Result<SettingsDocument> {
        self.read_document(field).await
    }

    async fn save(&self, field: &FieldId, category: &str, value: &Value) -> Result<()> {
        let _write = self.write_lock.lock().await;
        let mut doc = self.read_document(field).await?;
        doc.set(category, value.clone());
        let content = serde_json::to_string_pretty(&doc)?;
        atomic_write(&self.settings_path(field), content.as_bytes()).await
    }
}

/// Write to a temp file then rename for atomic persistence.
async fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no parent dir"))?;
    let tmp = dir.join(format!(".tmp_{}", Ulid::new()));
    fs::write(&tmp, data).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// One committed save, as observed by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRecord {
    pub field_id: FieldId,
    pub category: String,
    pub value: Value,
}

/// A save held in flight by a gated [`MemoryBackend`]. The controller
/// decides when — and whether — it completes.
pub struct PendingSave {
    pub field_id: FieldId,
    pub category: String,
    pub value: Value,
    release: oneshot::Sender<std::result::Result<(), String>>,
}

impl PendingSave {
    /// Let the save complete successfully.
    pub fn succeed(self) {
        let _ = self.release.send(Ok(()));
    }

    /// Reject the save with a persistence error.
    pub fn fail(self, message: impl Into<String>) {
        let _ = self.release.send(Err(message.into()));
    }
}

/// Receives saves issued against a gated [`MemoryBackend`], in issue order.
pub struct SaveGate {
    rx: mpsc::UnboundedReceiver<PendingSave>,
}

impl SaveGate {
    /// Wait for the next save to be issued.
    pub async fn next(&mut self) -> PendingSave {
        self.rx.recv().await.expect("backend dropped")
    }
}

/// In-memory settings storage for tests and previews.
///
/// The gated form holds every save until the test releases it, which makes
/// completion order controllable — the point of the concurrency contract.
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
}

struct MemoryInner {
    docs: Mutex<HashMap<FieldId, SettingsDocument>>,
    log: Mutex<Vec<SaveRecord>>,
    gate: Option<mpsc::UnboundedSender<PendingSave>>,
}

impl MemoryBackend {
    /// A backend whose saves complete immediately.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MemoryInner {
                docs: Mutex::new(HashMap::new()),
                log: Mutex::new(Vec::new()),
                gate: None,
            }),
        }
    }

    /// A backend whose saves block until released through the gate.
    pub fn gated() -> (Self, SaveGate) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Self {
            inner: Arc::new(MemoryInner {
                docs: Mutex::new(HashMap::new()),
                log: Mutex::new(Vec::new()),
                gate: Some(tx),
            }),
        };
        (backend, SaveGate { rx })
    }

    /// Pre-populate a field's document, as if saved in an earlier session.
    pub fn seed(&self, field: FieldId, doc: SettingsDocument) {
        self.inner.docs.lock().unwrap().insert(field, doc);
    }

    /// The last durable value for a category, if any save committed.
    pub fn saved(&self, field: &FieldId, category: &str) -> Option<Value> {
        self.inner
            .docs
            .lock()
            .unwrap()
            .get(field)
            .and_then(|doc| doc.get(category).cloned())
    }

    /// Every committed save, in completion order.
    pub fn save_log(&self) -> Vec<SaveRecord> {
        self.inner.log.lock().unwrap().clone()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsBackend for MemoryBackend {
    async fn load(&self, field: &FieldId) -> Result<SettingsDocument> {
        Ok(self
            .inner
            .docs
            .lock()
            .unwrap()
            .get(field)
            .cloned()
            .unwrap_or_default())
    }

    async fn save(&self, field: &FieldId, category: &str, value: &Value) -> Result<()> {
        if let Some(gate) = &self.inner.gate {
            let (release, released) = oneshot::channel();
            let pending = PendingSave {
                field_id: *field,
                category: category.to_string(),
                value: value.clone(),
                release,
            };
            gate.send(pending).map_err(|_| SettingsError::Save {
                category: category.to_string(),
                message: "save gate closed".into(),
            })?;
            match released.await {
                Ok(Ok(())) => {}
                Ok(Err(message)) => {
                    return Err(SettingsError::Save {
                        category: category.to_string(),
                        message,
                    })
                }
                Err(_) => {
                    return Err(SettingsError::Save {
                        category: category.to_string(),
                        message: "save interrupted".into(),
                    })
                }
            }
        }

        let mut docs = self.inner.docs.lock().unwrap();
        docs.entry(*field)
            .or_default()
            .set(category, value.clone());
        self.inner.log.lock().unwrap().push(SaveRecord {
            field_id: *field,
            category: category.to_string(),
            value: value.clone(),
        });
        Ok(())
    }
}
