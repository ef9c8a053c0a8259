//! HTTP error mapping

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use postfeed_core::{ErrorDetail, PostError};
use tracing::{debug, error};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Post(#[from] PostError),

    #[error("Invalid JSON body: {}", .0.body_text())]
    Json(#[from] JsonRejection),

    #[error("Invalid query string: {}", .0.body_text())]
    Query(#[from] QueryRejection),

    #[error("Invalid multipart request: {}", .0.body_text())]
    MultipartRequest(#[from] MultipartRejection),

    #[error("Invalid multipart body: {}", .0.body_text())]
    Multipart(#[from] MultipartError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Post(PostError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Post(PostError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Post(PostError::UploadFailed(_))
            | ApiError::Post(PostError::StorageUnavailable(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            // Oversized bodies keep their own status; every other malformed
            // request is a validation failure
            ApiError::Json(e) => malformed(e.status()),
            ApiError::Query(e) => malformed(e.status()),
            ApiError::MultipartRequest(e) => malformed(e.status()),
            ApiError::Multipart(e) => malformed(e.status()),
        }
    }
}

fn malformed(status: StatusCode) -> StatusCode {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        status
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Post(e) if !e.is_client_error() => error!("Request failed: {}", e),
            _ => debug!("Rejected request ({}): {}", status, self),
        }

        let body = Json(ErrorDetail {
            detail: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
