//! Mapping from domain failures to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::common::ApiResponse;
use crate::shared::DomainError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity, .. } => {
                Self::new(StatusCode::NOT_FOUND, format!("{} not found", entity))
            }
            DomainError::Validation(msg) | DomainError::Conflict(msg) => Self::bad_request(msg),
            DomainError::Unauthorized(msg) => Self::unauthorized(msg),
            DomainError::Forbidden(msg) => Self::forbidden(msg),
            err @ (DomainError::Storage(_) | DomainError::Internal(_)) => {
                error!(error = %err, "Request failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ApiResponse::<()>::error(self.message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
