//! Post handlers

use crate::error::ApiResult;
use crate::AppState;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    extract::{Path, Query, State},
    Json,
};
use postfeed_core::{CreatePostRequest, ListPostsQuery, PostError, PostResponse};
use uuid::Uuid;

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListPostsQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<PostResponse>>> {
    let Query(query) = query?;
    let posts = state.posts.list(query.limit).await?;
    Ok(Json(posts.into_iter().map(PostResponse::from).collect()))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    // An id that is not a UUID cannot exist in the store
    let id = Uuid::parse_str(&id).map_err(|_| PostError::NotFound)?;
    let post = state.posts.get(id).await?;
    Ok(Json(post.into()))
}

pub async fn create(
    State(state): State<AppState>,
    req: Result<Json<CreatePostRequest>, JsonRejection>,
) -> ApiResult<Json<PostResponse>> {
    let Json(req) = req?;
    let title = req
        .title
        .ok_or_else(|| PostError::validation("title is required"))?;
    let content = req
        .content
        .ok_or_else(|| PostError::validation("content is required"))?;

    let post = state.posts.create_text(&title, &content).await?;
    Ok(Json(post.into()))
}
