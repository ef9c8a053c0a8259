//! Upload gateway trait

use crate::Result;
use async_trait::async_trait;
use bytes::Bytes;
use postfeed_types::UploadedFile;

/// Forwards file bytes to an external hosting service
#[async_trait]
pub trait UploadGateway: Send + Sync {
    /// Host `data` under `file_name` and return where it ended up.
    ///
    /// Any local staging must be released before this returns, whatever the outcome.
    async fn upload(&self, data: Bytes, file_name: &str) -> Result<UploadedFile>;
}
