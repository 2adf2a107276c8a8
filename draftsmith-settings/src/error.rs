//! Error types for field settings sessions

use thiserror::Error;

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Errors that can occur while loading or saving field settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The store rejected a category save. Surfaced to the editing UI;
    /// the in-memory value for the category is left unchanged.
    #[error("save failed for category '{category}': {message}")]
    Save { category: String, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
