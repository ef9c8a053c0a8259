//! Error types for Postfeed

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PostError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("Post not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl PostError {
    pub fn validation(msg: impl Into<String>) -> Self {
        PostError::Validation(msg.into())
    }

    pub fn upload(msg: impl std::fmt::Display) -> Self {
        PostError::UploadFailed(msg.to_string())
    }

    pub fn storage(msg: impl std::fmt::Display) -> Self {
        PostError::StorageUnavailable(msg.to_string())
    }

    /// Caller mistakes as opposed to a failing dependency
    pub fn is_client_error(&self) -> bool {
        matches!(self, PostError::NotFound | PostError::Validation(_))
    }
}
