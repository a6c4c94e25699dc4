//! Storage gateway errors.

/// Errors from the object storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The provider refused or failed the upload. `detail` preserves
    /// the provider's own description for the operator log.
    #[error("Upload of '{key}' failed: {detail}")]
    Upload { key: String, detail: String },
}
