//! SchemaStore — file-backed storage for content types and their fields.
//!
//! One JSON document per content type under `types/`, fields embedded in
//! display order. In-memory indexes give lookup by id, by `(user, api_id)`,
//! and from a field id to its owning content type. Every write goes through
//! an atomic temp-file-then-rename.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tracing::debug;
use ulid::Ulid;

use crate::error::{Result, SchemaError};
use crate::ids::{ContentTypeId, FieldId, UserId};
use crate::types::{
    sort_fields, ContentType, ContentTypeField, ContentTypePatch, FieldPatch, NewContentType,
    NewField,
};

/// Store for content-type schemas.
///
/// Owns a directory on disk with the structure:
/// ```text
/// schema/
///   types/    ← one .json per content type, fields embedded
/// ```
pub struct SchemaStore {
    root: PathBuf,
    types: Vec<ContentType>,
    id_index: HashMap<ContentTypeId, usize>,
    api_index: HashMap<(UserId, String), ContentTypeId>,
    field_index: HashMap<FieldId, ContentTypeId>,
}

impl SchemaStore {
    /// Open or create a schema directory and load everything in it.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(root.join("types")).await?;

        let mut store = Self {
            root,
            types: Vec::new(),
            id_index: HashMap::new(),
            api_index: HashMap::new(),
            field_index: HashMap::new(),
        };
        store.load().await?;

        debug!(
            content_types = store.types.len(),
            fields = store.field_index.len(),
            "schema store opened"
        );
        Ok(store)
    }

    /// The root directory path.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // --- Content types ---

    /// Create a content type. `api_id` and `api_id_plural` must be unused
    /// within the owning account.
    pub async fn create_content_type(&mut self, new: NewContentType) -> Result<ContentType> {
        self.check_api_ids(new.user_id, &new.api_id, &new.api_id_plural, None)?;

        let now = Utc::now();
        let ct = ContentType {
            id: ContentTypeId::new(),
            user_id: new.user_id,
            api_id: new.api_id,
            api_id_plural: new.api_id_plural,
            name: new.name,
            description: new.description,
            is_collection: new.is_collection,
            is_published: false,
            created_at: now,
            updated_at: now,
            fields: Vec::new(),
        };

        let idx = self.types.len();
        self.types.push(ct.clone());
        self.index_content_type(idx);
        self.persist(idx).await?;

        debug!(id = %ct.id, api_id = %ct.api_id, "created content type");
        Ok(ct)
    }

    /// Get a content type by id, fields in display order.
    pub fn content_type(&self, id: ContentTypeId) -> Result<&ContentType> {
        self.id_index
            .get(&id)
            .map(|&i| &self.types[i])
            .ok_or_else(|| SchemaError::ContentTypeNotFound { id: id.to_string() })
    }

    /// Look up a content type by its machine-facing name within an account.
    pub fn content_type_by_api_id(&self, user_id: UserId, api_id: &str) -> Option<&ContentType> {
        let id = self.api_index.get(&(user_id, api_id.to_string()))?;
        self.id_index.get(id).map(|&i| &self.types[i])
    }

    /// All content types owned by an account, sorted by name.
    pub fn list_content_types(&self, user_id: UserId) -> Vec<&ContentType> {
        let mut result: Vec<_> = self
            .types
            .iter()
            .filter(|ct| ct.user_id == user_id)
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        result
    }

    /// Apply a partial update to a content type.
    pub async fn update_content_type(
        &mut self,
        id: ContentTypeId,
        patch: ContentTypePatch,
    ) -> Result<ContentType> {
        let idx = self.type_idx(id)?;

        let api_id = patch
            .api_id
            .clone()
            .unwrap_or_else(|| self.types[idx].api_id.clone());
        let api_id_plural = patch
            .api_id_plural
            .clone()
            .unwrap_or_else(|| self.types[idx].api_id_plural.clone());
        self.check_api_ids(self.types[idx].user_id, &api_id, &api_id_plural, Some(id))?;

        self.unindex_api_ids(idx);
        let ct = &mut self.types[idx];
        if let Some(name) = patch.name {
            ct.name = name;
        }
        if let Some(description) = patch.description {
            ct.description = description;
        }
        ct.api_id = api_id;
        ct.api_id_plural = api_id_plural;
        if let Some(is_collection) = patch.is_collection {
            ct.is_collection = is_collection;
        }
        ct.updated_at = Utc::now();
        self.index_content_type(idx);

        self.persist(idx).await?;
        Ok(self.types[idx].clone())
    }

    /// Flip the publication flag.
    pub async fn set_published(&mut self, id: ContentTypeId, published: bool) -> Result<()> {
        let idx = self.type_idx(id)?;
        let ct = &mut self.types[idx];
        ct.is_published = published;
        ct.updated_at = Utc::now();
        self.persist(idx).await?;
        debug!(%id, published, "content type publication changed");
        Ok(())
    }

    /// Delete a content type. Cascades: every field it owns is removed with it.
    pub async fn delete_content_type(&mut self, id: ContentTypeId) -> Result<()> {
        let idx = self.type_idx(id)?;

        // Remove the record file first; if that fails the store is left
        // untouched, so the content type and its fields stay live rather
        // than resurrecting on the next open.
        let path = self.type_path(id);
        if path.exists() {
            fs::remove_file(&path).await?;
        }

        self.unindex_api_ids(idx);
        for field in &self.types[idx].fields {
            self.field_index.remove(&field.id);
        }
        self.id_index.remove(&id);

        // Swap-remove and fix the displaced entry's index
        self.types.swap_remove(idx);
        if idx < self.types.len() {
            self.id_index.insert(self.types[idx].id, idx);
        }

        debug!(%id, "deleted content type");
        Ok(())
    }

    // --- Fields ---

    /// Create a field. Referential integrity is enforced before any write:
    /// the content type must exist and be owned by the field's `user_id`.
    pub async fn create_field(&mut self, new: NewField) -> Result<ContentTypeField> {
        let idx = self.type_idx(new.content_type_id)?;
        if self.types[idx].user_id != new.user_id {
            return Err(SchemaError::OwnershipMismatch {
                content_type_id: new.content_type_id.to_string(),
                user_id: new.user_id.to_string(),
            });
        }

        let now = Utc::now();
        let field = ContentTypeField {
            id: FieldId::new(),
            content_type_id: new.content_type_id,
            user_id: new.user_id,
            name: new.name,
            kind: new.kind,
            order: new.order,
            is_required: new.is_required,
            default_value: new.default_value,
            options: new.options,
            validation: new.validation,
            created_at: now,
            updated_at: now,
        };

        let ct = &mut self.types[idx];
        ct.fields.push(field.clone());
        sort_fields(&mut ct.fields);
        ct.updated_at = now;
        self.field_index.insert(field.id, new.content_type_id);

        self.persist(idx).await?;
        debug!(id = %field.id, content_type = %new.content_type_id, "created field");
        Ok(field)
    }

    /// Get a field definition by id.
    pub fn field(&self, id: FieldId) -> Result<&ContentTypeField> {
        let ct_id = self
            .field_index
            .get(&id)
            .ok_or_else(|| SchemaError::FieldNotFound { id: id.to_string() })?;
        let idx = self.type_idx(*ct_id)?;
        self.types[idx]
            .fields
            .iter()
            .find(|f| f.id == id)
            .ok_or_else(|| SchemaError::FieldNotFound { id: id.to_string() })
    }

    /// Apply a partial update to a field.
    pub async fn update_field(&mut self, id: FieldId, patch: FieldPatch) -> Result<ContentTypeField> {
        let ct_id = *self
            .field_index
            .get(&id)
            .ok_or_else(|| SchemaError::FieldNotFound { id: id.to_string() })?;
        let idx = self.type_idx(ct_id)?;

        let now = Utc::now();
        let ct = &mut self.types[idx];
        let field = ct
            .fields
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| SchemaError::FieldNotFound { id: id.to_string() })?;

        if let Some(name) = patch.name {
            field.name = name;
        }
        if let Some(kind) = patch.kind {
            field.kind = kind;
        }
        if let Some(order) = patch.order {
            field.order = order;
        }
        if let Some(is_required) = patch.is_required {
            field.is_required = is_required;
        }
        if let Some(default_value) = patch.default_value {
            field.default_value = default_value;
        }
        if let Some(options) = patch.options {
            field.options = options;
        }
        if let Some(validation) = patch.validation {
            field.validation = validation;
        }
        field.updated_at = now;

        sort_fields(&mut ct.fields);
        ct.updated_at = now;

        self.persist(idx).await?;
        Ok(self.field(id)?.clone())
    }

    /// Delete a field definition.
    pub async fn delete_field(&mut self, id: FieldId) -> Result<()> {
        let ct_id = *self
            .field_index
            .get(&id)
            .ok_or_else(|| SchemaError::FieldNotFound { id: id.to_string() })?;
        let idx = self.type_idx(ct_id)?;

        let ct = &mut self.types[idx];
        ct.fields.retain(|f| f.id != id);
        ct.updated_at = Utc::now();
        self.field_index.remove(&id);

        self.persist(idx).await?;
        Ok(())
    }

    /// Rewrite field `order` values to match the given sequence. The list
    /// must be a permutation of the content type's field ids.
    pub async fn reorder_fields(
        &mut self,
        id: ContentTypeId,
        ordered: &[FieldId],
    ) -> Result<Vec<ContentTypeField>> {
        let idx = self.type_idx(id)?;
        {
            let ct = &self.types[idx];
            let mismatch = ordered.len() != ct.fields.len()
                || !ct.fields.iter().all(|f| ordered.contains(&f.id));
            if mismatch {
                return Err(SchemaError::ReorderMismatch {
                    content_type_id: id.to_string(),
                });
            }
        }

        let now = Utc::now();
        let ct = &mut self.types[idx];
        for field in &mut ct.fields {
            let position = ordered.iter().position(|fid| *fid == field.id);
            if let Some(position) = position {
                field.order = position as i32;
                field.updated_at = now;
            }
        }
        sort_fields(&mut ct.fields);
        ct.updated_at = now;

        self.persist(idx).await?;
        Ok(self.types[idx].fields.clone())
    }

    // --- Internal ---

    fn type_idx(&self, id: ContentTypeId) -> Result<usize> {
        self.id_index
            .get(&id)
            .copied()
            .ok_or_else(|| SchemaError::ContentTypeNotFound { id: id.to_string() })
    }

    fn type_path(&self, id: ContentTypeId) -> PathBuf {
        self.root.join("types").join(format!("{id}.json"))
    }

    /// Reject machine-facing names already indexed for the account, ignoring
    /// the content type being updated (if any).
    fn check_api_ids(
        &self,
        user_id: UserId,
        api_id: &str,
        api_id_plural: &str,
        exclude: Option<ContentTypeId>,
    ) -> Result<()> {
        for candidate in [api_id, api_id_plural] {
            if let Some(owner) = self.api_index.get(&(user_id, candidate.to_string())) {
                if Some(*owner) != exclude {
                    return Err(SchemaError::ApiIdTaken {
                        api_id: candidate.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn index_content_type(&mut self, idx: usize) {
        let ct = &self.types[idx];
        self.id_index.insert(ct.id, idx);
        self.api_index
            .insert((ct.user_id, ct.api_id.clone()), ct.id);
        self.api_index
            .insert((ct.user_id, ct.api_id_plural.clone()), ct.id);
        for field in &ct.fields {
            self.field_index.insert(field.id, ct.id);
        }
    }

    fn unindex_api_ids(&mut self, idx: usize) {
        let ct = &self.types[idx];
        self.api_index.remove(&(ct.user_id, ct.api_id.clone()));
        self.api_index
            .remove(&(ct.user_id, ct.api_id_plural.clone()));
    }

    async fn persist(&self, idx: usize) -> Result<()> {
        let ct = &self.types[idx];
        let content = serde_json::to_string_pretty(ct)?;
        let path = self.type_path(ct.id);
        atomic_write(&path, content.as_bytes()).await
    }

    async fn load(&mut self) -> Result<()> {
        let types_dir = self.root.join("types");
        let mut entries = fs::read_dir(&types_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let content = fs::read_to_string(&path).await?;
            match serde_json::from_str::<ContentType>(&content) {
                Ok(mut ct) => {
                    sort_fields(&mut ct.fields);
                    let idx = self.types.len();
                    self.types.push(ct);
                    self.index_content_type(idx);
                }
                Err(e) => {
                    tracing::warn!(?path, %e, "skipping invalid content type file");
                }
            }
        }
        Ok(())
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldKind;
    use serde_json::json;
    use tempfile::TempDir;

    async fn open_store(tmp: &TempDir) -> SchemaStore {
        SchemaStore::open(tmp.path().join("schema")).await.unwrap()
    }

    fn new_post_type(user: UserId) -> NewContentType {
        NewContentType::new(user, "post", "posts", "Blog Post")
            .with_description("Long-form articles")
    }

    #[tokio::test]
    async fn open_creates_directories() {
        let tmp = TempDir::new().unwrap();
        let store = open_store(&tmp).await;
        assert!(store.root().join("types").is_dir());
        assert!(store.list_content_types(UserId::new()).is_empty());
    }

    #[tokio::test]
    async fn create_and_get_content_type() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        assert!(ct.is_collection);
        assert!(!ct.is_published);
        assert_eq!(ct.created_at, ct.updated_at);

        let loaded = store.content_type(ct.id).unwrap();
        assert_eq!(loaded.api_id, "post");
        assert_eq!(
            store.content_type_by_api_id(user, "posts").unwrap().id,
            ct.id
        );
        assert!(tmp
            .path()
            .join("schema/types")
            .join(format!("{}.json", ct.id))
            .exists());
    }

    #[tokio::test]
    async fn duplicate_api_id_rejected_within_account() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        store.create_content_type(new_post_type(user)).await.unwrap();
        let err = store
            .create_content_type(NewContentType::new(user, "post", "postz", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::ApiIdTaken { .. }));

        // Same api_id under a different account is fine.
        let other = UserId::new();
        store
            .create_content_type(new_post_type(other))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_content_type_renames_api_id() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = store
            .update_content_type(
                ct.id,
                ContentTypePatch {
                    api_id: Some("article".into()),
                    api_id_plural: Some("articles".into()),
                    name: Some("Article".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.api_id, "article");
        assert!(updated.updated_at > updated.created_at);
        assert!(store.content_type_by_api_id(user, "post").is_none());
        assert_eq!(
            store.content_type_by_api_id(user, "article").unwrap().id,
            ct.id
        );
    }

    #[tokio::test]
    async fn update_keeping_own_api_id_is_not_a_conflict() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        store
            .update_content_type(
                ct.id,
                ContentTypePatch {
                    name: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(store.content_type(ct.id).unwrap().name, "Renamed");
    }

    #[tokio::test]
    async fn publish_toggle() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        store.set_published(ct.id, true).await.unwrap();
        assert!(store.content_type(ct.id).unwrap().is_published);
        store.set_published(ct.id, false).await.unwrap();
        assert!(!store.content_type(ct.id).unwrap().is_published);
    }

    #[tokio::test]
    async fn create_field_and_lookup() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        let field = store
            .create_field(
                NewField::new(ct.id, user, "title", FieldKind::Text)
                    .required()
                    .with_options(json!({ "ui_variant": "underlined" })),
            )
            .await
            .unwrap();

        let loaded = store.field(field.id).unwrap();
        assert_eq!(loaded.name, "title");
        assert_eq!(loaded.content_type_id, ct.id);
        assert!(loaded.is_required);
    }

    #[tokio::test]
    async fn create_field_rejects_missing_content_type() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;

        let err = store
            .create_field(NewField::new(
                ContentTypeId::new(),
                UserId::new(),
                "title",
                FieldKind::Text,
            ))
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::ContentTypeNotFound { .. }));
    }

    #[tokio::test]
    async fn create_field_rejects_foreign_owned_content_type() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let owner = UserId::new();
        let intruder = UserId::new();

        let ct = store
            .create_content_type(new_post_type(owner))
            .await
            .unwrap();
        let err = store
            .create_field(NewField::new(ct.id, intruder, "title", FieldKind::Text))
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::OwnershipMismatch { .. }));
        assert!(store.content_type(ct.id).unwrap().fields.is_empty());
    }

    #[tokio::test]
    async fn fields_kept_in_display_order_with_id_tiebreak() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        let body = store
            .create_field(NewField::new(ct.id, user, "body", FieldKind::RichText).with_order(2))
            .await
            .unwrap();
        let title = store
            .create_field(NewField::new(ct.id, user, "title", FieldKind::Text).with_order(1))
            .await
            .unwrap();
        // Tie with body on order: created in a later millisecond, so its
        // ULID — and therefore its display position — sorts after.
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let summary = store
            .create_field(NewField::new(ct.id, user, "summary", FieldKind::Text).with_order(2))
            .await
            .unwrap();

        let names: Vec<_> = store
            .content_type(ct.id)
            .unwrap()
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["title", "body", "summary"]);
        assert!(body.id < summary.id);
        assert_eq!(title.order, 1);
    }

    #[tokio::test]
    async fn update_field_patch_and_clear() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        let field = store
            .create_field(
                NewField::new(ct.id, user, "title", FieldKind::Text)
                    .with_default_value(json!("Untitled")),
            )
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = store
            .update_field(
                field.id,
                FieldPatch {
                    name: Some("headline".into()),
                    is_required: Some(true),
                    default_value: Some(None),
                    validation: Some(Some(json!({ "max_length": 120 }))),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "headline");
        assert!(updated.is_required);
        assert_eq!(updated.default_value, None);
        assert_eq!(updated.validation, Some(json!({ "max_length": 120 })));
        assert!(updated.updated_at > field.updated_at);
    }

    #[tokio::test]
    async fn delete_field() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        let field = store
            .create_field(NewField::new(ct.id, user, "title", FieldKind::Text))
            .await
            .unwrap();

        store.delete_field(field.id).await.unwrap();
        assert!(matches!(
            store.field(field.id),
            Err(SchemaError::FieldNotFound { .. })
        ));
        assert!(store.content_type(ct.id).unwrap().fields.is_empty());
    }

    #[tokio::test]
    async fn delete_content_type_cascades_to_fields() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        let f1 = store
            .create_field(NewField::new(ct.id, user, "title", FieldKind::Text))
            .await
            .unwrap();
        let f2 = store
            .create_field(NewField::new(ct.id, user, "body", FieldKind::RichText))
            .await
            .unwrap();

        store.delete_content_type(ct.id).await.unwrap();

        assert!(matches!(
            store.content_type(ct.id),
            Err(SchemaError::ContentTypeNotFound { .. })
        ));
        for id in [f1.id, f2.id] {
            assert!(matches!(
                store.field(id),
                Err(SchemaError::FieldNotFound { .. })
            ));
        }
        assert!(store.content_type_by_api_id(user, "post").is_none());
    }

    #[tokio::test]
    async fn failed_file_removal_aborts_delete() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        let field = store
            .create_field(NewField::new(ct.id, user, "title", FieldKind::Text))
            .await
            .unwrap();

        // Replace the record file with a non-empty directory so the unlink
        // fails.
        let path = tmp
            .path()
            .join("schema/types")
            .join(format!("{}.json", ct.id));
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), b"x").unwrap();

        let err = store.delete_content_type(ct.id).await.unwrap_err();
        assert!(matches!(err, SchemaError::Io(_)));

        // Nothing was dropped from memory: the content type and its field
        // are still live, not half-deleted.
        assert_eq!(store.content_type(ct.id).unwrap().api_id, "post");
        assert_eq!(store.field(field.id).unwrap().name, "title");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn delete_middle_content_type_fixes_indexes() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let a = store
            .create_content_type(NewContentType::new(user, "a", "as", "A"))
            .await
            .unwrap();
        let b = store
            .create_content_type(NewContentType::new(user, "b", "bs", "B"))
            .await
            .unwrap();
        let c = store
            .create_content_type(NewContentType::new(user, "c", "cs", "C"))
            .await
            .unwrap();

        store.delete_content_type(b.id).await.unwrap();

        assert_eq!(store.content_type(a.id).unwrap().api_id, "a");
        assert_eq!(store.content_type(c.id).unwrap().api_id, "c");
        assert_eq!(store.list_content_types(user).len(), 2);
    }

    #[tokio::test]
    async fn reorder_fields_rewrites_orders_densely() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        let title = store
            .create_field(NewField::new(ct.id, user, "title", FieldKind::Text).with_order(0))
            .await
            .unwrap();
        let body = store
            .create_field(NewField::new(ct.id, user, "body", FieldKind::RichText).with_order(1))
            .await
            .unwrap();
        let tags = store
            .create_field(NewField::new(ct.id, user, "tags", FieldKind::Select).with_order(2))
            .await
            .unwrap();

        let reordered = store
            .reorder_fields(ct.id, &[tags.id, title.id, body.id])
            .await
            .unwrap();

        let names: Vec<_> = reordered.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["tags", "title", "body"]);
        let orders: Vec<_> = reordered.iter().map(|f| f.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn reorder_rejects_mismatched_list() {
        let tmp = TempDir::new().unwrap();
        let mut store = open_store(&tmp).await;
        let user = UserId::new();

        let ct = store.create_content_type(new_post_type(user)).await.unwrap();
        let title = store
            .create_field(NewField::new(ct.id, user, "title", FieldKind::Text))
            .await
            .unwrap();

        let err = store
            .reorder_fields(ct.id, &[title.id, FieldId::new()])
            .await
            .unwrap_err();
        assert!(matches!(err, SchemaError::ReorderMismatch { .. }));
    }

    #[tokio::test]
    async fn persistence_survives_reopen() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("schema");
        let user = UserId::new();
        let (ct_id, field_id);

        {
            let mut store = SchemaStore::open(&root).await.unwrap();
            let ct = store.create_content_type(new_post_type(user)).await.unwrap();
            let field = store
                .create_field(
                    NewField::new(ct.id, user, "title", FieldKind::Text)
                        .with_order(3)
                        .with_options(json!({ "ui_variant": "pill" })),
                )
                .await
                .unwrap();
            ct_id = ct.id;
            field_id = field.id;
        }

        let store = SchemaStore::open(&root).await.unwrap();
        let ct = store.content_type(ct_id).unwrap();
        assert_eq!(ct.api_id, "post");
        assert_eq!(ct.fields.len(), 1);
        let field = store.field(field_id).unwrap();
        assert_eq!(field.order, 3);
        assert_eq!(field.options, Some(json!({ "ui_variant": "pill" })));
        assert_eq!(
            store.content_type_by_api_id(user, "post").unwrap().id,
            ct_id
        );
    }

    #[tokio::test]
    async fn invalid_files_skipped_on_load() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("schema");
        let user = UserId::new();

        {
            let mut store = SchemaStore::open(&root).await.unwrap();
            store.create_content_type(new_post_type(user)).await.unwrap();
        }
        std::fs::write(root.join("types/broken.json"), "{ not json").unwrap();

        let store = SchemaStore::open(&root).await.unwrap();
        assert_eq!(store.list_content_types(user).len(), 1);
    }
}
