//! Provider error types.

use thiserror::Error;

/// Result type for provider operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during provider operations.
///
/// Remote failures are passed through as-is in the message; this layer does
/// not retry or recover.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid provider configuration: {0}")]
    ConfigError(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn delete_failed(msg: impl Into<String>) -> Self {
        Self::DeleteFailed(msg.into())
    }
}
