//! Error types for the schema store

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors that can occur in content-type and field operations
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Content type not found by id
    #[error("content type not found: {id}")]
    ContentTypeNotFound { id: String },

    /// Field not found by id
    #[error("field not found: {id}")]
    FieldNotFound { id: String },

    /// Machine-facing name already used within the account
    #[error("api id already taken: {api_id}")]
    ApiIdTaken { api_id: String },

    /// Field references a content type owned by a different account
    #[error("content type {content_type_id} is not owned by user {user_id}")]
    OwnershipMismatch {
        content_type_id: String,
        user_id: String,
    },

    /// Reorder list does not match the content type's field set
    #[error("reorder list does not match fields of content type {content_type_id}")]
    ReorderMismatch { content_type_id: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
