//! Storage traits for persistence

use crate::Result;
use async_trait::async_trait;
use postfeed_types::{NewPost, Post};
use uuid::Uuid;

/// Post store
///
/// Implementations assign ids themselves, so `create` never conflicts.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts in insertion order, truncated to `limit` when it is non-zero
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Post>>;

    async fn get(&self, id: Uuid) -> Result<Post>;

    async fn create(&self, post: NewPost) -> Result<Post>;

    /// All posts, newest first
    async fn list_ordered_by_recency(&self) -> Result<Vec<Post>>;

    async fn close(&self) {}
}
