//! Post service: ties the store and the upload gateway together

use bytes::Bytes;
use postfeed_core::ports::{PostStore, UploadGateway};
use postfeed_core::{FileType, NewPost, Post, PostError, Result};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct PostService {
    store: Arc<dyn PostStore>,
    gateway: Arc<dyn UploadGateway>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>, gateway: Arc<dyn UploadGateway>) -> Self {
        Self { store, gateway }
    }

    pub async fn list(&self, limit: Option<usize>) -> Result<Vec<Post>> {
        debug!("Listing posts, limit={:?}", limit);
        self.store.list(limit).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Post> {
        debug!("Fetching post {}", id);
        self.store.get(id).await
    }

    pub async fn create_text(&self, title: &str, content: &str) -> Result<Post> {
        let post = self.store.create(NewPost::text(title, content)).await?;
        info!("Created text post {}", post.id);
        Ok(post)
    }

    /// Host the file first, then record the post.
    ///
    /// The store write is the only commit point: if the upload fails nothing is
    /// written.
    pub async fn publish_upload(&self, caption: &str, data: Bytes, file_name: &str) -> Result<Post> {
        if data.is_empty() {
            return Err(PostError::validation("file is empty"));
        }

        let file_type = FileType::from_file_name(file_name);
        let uploaded = self.gateway.upload(data, file_name).await?;

        let post = self
            .store
            .create(NewPost::media(caption, uploaded, file_type))
            .await?;
        info!("Created {} post {} from {}", file_type, post.id, file_name);
        Ok(post)
    }

    pub async fn feed(&self) -> Result<Vec<Post>> {
        self.store.list_ordered_by_recency().await
    }

    pub async fn shutdown(&self) {
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use postfeed_core::UploadedFile;

    /// Gateway double that either accepts everything or fails every call
    struct StubGateway {
        fail: bool,
    }

    #[async_trait]
    impl UploadGateway for StubGateway {
        async fn upload(&self, _data: Bytes, file_name: &str) -> Result<UploadedFile> {
            if self.fail {
                return Err(PostError::upload("service unavailable"));
            }
            Ok(UploadedFile {
                url: format!("https://ik.example/backend-uploads/{}", file_name),
                name: file_name.to_string(),
            })
        }
    }

    fn service(fail: bool) -> (PostService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let service = PostService::new(store.clone(), Arc::new(StubGateway { fail }));
        (service, store)
    }

    #[tokio::test]
    async fn test_publish_classifies_video() {
        let (service, _) = service(false);

        let post = service
            .publish_upload("clip", Bytes::from_static(b"mp4"), "clip.mp4")
            .await
            .unwrap();

        assert_eq!(post.file_type, Some(FileType::Video));
        assert_eq!(post.file_name.as_deref(), Some("clip.mp4"));
        assert_eq!(
            post.url.as_deref(),
            Some("https://ik.example/backend-uploads/clip.mp4")
        );
    }

    #[tokio::test]
    async fn test_publish_classifies_image() {
        let (service, _) = service(false);

        let post = service
            .publish_upload("pic", Bytes::from_static(b"png"), "pic.png")
            .await
            .unwrap();

        assert_eq!(post.file_type, Some(FileType::Image));
    }

    #[tokio::test]
    async fn test_failed_upload_commits_nothing() {
        let (service, store) = service(true);

        let result = service
            .publish_upload("clip", Bytes::from_static(b"mp4"), "clip.mp4")
            .await;

        assert_eq!(
            result,
            Err(PostError::UploadFailed("service unavailable".to_string()))
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_publish_rejects_empty_file() {
        let (service, store) = service(false);

        let result = service
            .publish_upload("pic", Bytes::new(), "pic.png")
            .await;

        assert!(matches!(result, Err(PostError::Validation(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_feed_lists_newest_first() {
        let (service, _) = service(false);
        let first = service.create_text("first", "a").await.unwrap();
        let second = service.create_text("second", "b").await.unwrap();

        let feed = service.feed().await.unwrap();

        assert_eq!(feed.len(), 2);
        assert_eq!(feed[0].id, second.id);
        assert_eq!(feed[1].id, first.id);
    }
}
