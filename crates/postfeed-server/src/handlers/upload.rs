//! Multipart upload handler

use crate::error::ApiResult;
use crate::AppState;
use axum::{
    extract::multipart::MultipartRejection,
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use postfeed_core::{Post, PostError};

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<Post>> {
    let mut multipart = multipart?;
    let mut caption = None;
    let mut file: Option<(String, Bytes)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "caption" => caption = Some(field.text().await?),
            "file" => {
                let file_name = field.file_name().unwrap_or("unnamed").to_string();
                file = Some((file_name, field.bytes().await?));
            }
            _ => {}
        }
    }

    let caption = caption.ok_or_else(|| PostError::validation("caption is required"))?;
    let (file_name, data) = file.ok_or_else(|| PostError::validation("file is required"))?;

    let post = state.posts.publish_upload(&caption, data, &file_name).await?;
    Ok(Json(post))
}
