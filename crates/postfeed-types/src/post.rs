//! Post types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of media attached to a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Image,
    Video,
}

impl FileType {
    /// Classify an uploaded file by its name.
    ///
    /// Only the `.mp4` suffix is recognised as video; the file contents are
    /// never inspected.
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.ends_with(".mp4") {
            FileType::Video
        } else {
            FileType::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Image => "image",
            FileType::Video => "video",
        }
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(FileType::Image),
            "video" => Ok(FileType::Video),
            other => Err(format!("unknown file type: {}", other)),
        }
    }
}

/// A stored post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub caption: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub file_type: Option<FileType>,
    pub file_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Materialise a new post with a store-assigned id and timestamp
    pub fn from_new(new: NewPost, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            caption: new.caption,
            content: new.content,
            url: new.url,
            file_type: new.file_type,
            file_name: new.file_name,
            created_at,
        }
    }
}

/// Fields supplied by a caller when creating a post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPost {
    pub caption: String,
    pub content: Option<String>,
    pub url: Option<String>,
    pub file_type: Option<FileType>,
    pub file_name: Option<String>,
}

impl NewPost {
    /// A plain text post
    pub fn text(caption: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            caption: caption.into(),
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// A media post pointing at a file already accepted by the upload service
    pub fn media(caption: impl Into<String>, uploaded: UploadedFile, file_type: FileType) -> Self {
        Self {
            caption: caption.into(),
            content: None,
            url: Some(uploaded.url),
            file_type: Some(file_type),
            file_name: Some(uploaded.name),
        }
    }
}

/// Handle returned by the upload service once a file is hosted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub url: String,
    pub name: String,
}
