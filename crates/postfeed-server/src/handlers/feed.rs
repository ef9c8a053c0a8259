//! Feed handler

use crate::error::ApiResult;
use crate::AppState;
use axum::{extract::State, Json};
use postfeed_core::{FeedPost, FeedResponse};

pub async fn feed(State(state): State<AppState>) -> ApiResult<Json<FeedResponse>> {
    let posts = state.posts.feed().await?;

    Ok(Json(FeedResponse {
        posts: posts.into_iter().map(FeedPost::from).collect(),
    }))
}
