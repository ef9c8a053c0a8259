//! In-memory post store using DashMap

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use postfeed_core::ports::PostStore;
use postfeed_core::{validate_new_post, NewPost, Post, PostError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Process-local post store; contents are lost on restart
pub struct MemoryStore {
    data: Arc<DashMap<Uuid, StoredPost>>,
    next_seq: AtomicU64,
}

struct StoredPost {
    seq: u64,
    post: Post,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
            next_seq: AtomicU64::new(0),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Snapshot of all posts with their insertion sequence
    fn snapshot(&self) -> Vec<(u64, Post)> {
        self.data
            .iter()
            .map(|entry| (entry.seq, entry.post.clone()))
            .collect()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn list(&self, limit: Option<usize>) -> Result<Vec<Post>> {
        let mut posts = self.snapshot();
        posts.sort_by_key(|(seq, _)| *seq);

        let posts = posts.into_iter().map(|(_, post)| post);
        Ok(match limit {
            Some(limit) if limit > 0 => posts.take(limit).collect(),
            _ => posts.collect(),
        })
    }

    async fn get(&self, id: Uuid) -> Result<Post> {
        self.data
            .get(&id)
            .map(|entry| entry.post.clone())
            .ok_or(PostError::NotFound)
    }

    async fn create(&self, new: NewPost) -> Result<Post> {
        validate_new_post(&new)?;

        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        let post = Post::from_new(new, Uuid::new_v4(), Utc::now());
        self.data.insert(
            post.id,
            StoredPost {
                seq,
                post: post.clone(),
            },
        );

        Ok(post)
    }

    async fn list_ordered_by_recency(&self) -> Result<Vec<Post>> {
        let mut posts = self.snapshot();
        posts.sort_by(|(a_seq, a), (b_seq, b)| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b_seq.cmp(a_seq))
        });

        Ok(posts.into_iter().map(|(_, post)| post).collect())
    }
}
