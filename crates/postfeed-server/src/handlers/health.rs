//! Health and greeting endpoints

use crate::AppState;
use axum::{extract::State, Json};
use postfeed_core::{HealthResponse, MessageResponse};

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success".to_string(),
        service: state.service_name.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn hello_world() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello world".to_string(),
    })
}
