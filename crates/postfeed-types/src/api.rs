//! HTTP request and response bodies

use crate::post::{FileType, Post};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Body of `POST /posts`
///
/// Both fields are optional at the wire level so a missing field surfaces as a
/// validation error with a `detail` body instead of a bare rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Query string of `GET /posts`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<usize>,
}

/// Text view of a post returned by the `/posts` endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: Option<String>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.caption,
            content: post.content,
        }
    }
}

/// One entry of the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: String,
    pub caption: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    pub url: Option<String>,
    pub file_type: Option<FileType>,
    pub file_name: Option<String>,
    pub created_at: String,
}

impl From<Post> for FeedPost {
    fn from(post: Post) -> Self {
        Self {
            id: post.id.to_string(),
            caption: post.caption,
            content: post.content,
            url: post.url,
            file_type: post.file_type,
            file_name: post.file_name,
            created_at: post.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub posts: Vec<FeedPost>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body shared by every failing route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub detail: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::{NewPost, UploadedFile};
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_feed_post_stringifies_id_and_timestamp() {
        let id = Uuid::new_v4();
        let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let new = NewPost::media(
            "sunset",
            UploadedFile {
                url: "https://ik.example/sunset.png".to_string(),
                name: "sunset.png".to_string(),
            },
            FileType::Image,
        );
        let feed = FeedPost::from(Post::from_new(new, id, created_at));

        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["id"], id.to_string());
        assert_eq!(json["created_at"], "2024-03-01T12:30:00+00:00");
        assert_eq!(json["file_type"], "image");
        assert!(json.get("content").is_none());
    }

    #[test]
    fn test_post_response_uses_title() {
        let post = Post::from_new(NewPost::text("T", "C"), Uuid::new_v4(), Utc::now());
        let json = serde_json::to_value(PostResponse::from(post)).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["content"], "C");
        assert!(json.get("caption").is_none());
    }

    #[test]
    fn test_create_request_tolerates_missing_fields() {
        let req: CreatePostRequest = serde_json::from_str(r#"{"title":"only"}"#).unwrap();
        assert_eq!(req.title.as_deref(), Some("only"));
        assert!(req.content.is_none());
    }
}
