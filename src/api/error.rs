//! API error type and constructors.
//!
//! Every failed request answers with an [`ErrorResponse`] body carrying a
//! stable `code`, a human-readable `message` and a per-response `request_id`.
//! Storage failures are logged here and reported to the client generically.
use crate::models::ValidationError;
use crate::store::StoreError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl ApiError {
    fn new(status: StatusCode, code: &str, message: &str) -> Self {
        Self {
            status,
            body: ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
                request_id: Some(uuid::Uuid::new_v4().to_string()),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        api_validation_error(&err.to_string())
    }
}

pub fn api_validation_error(message: &str) -> ApiError {
    ApiError::new(StatusCode::BAD_REQUEST, "validation_error", message)
}

pub fn api_not_found(message: &str) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "not_found", message)
}

/// Missing or unknown credentials.
pub fn api_unauthorized(message: &str) -> ApiError {
    ApiError::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
}

/// Valid credentials without the required privilege.
pub fn api_forbidden(message: &str) -> ApiError {
    ApiError::new(StatusCode::FORBIDDEN, "forbidden", message)
}

/// Log the store error server-side and hide it from the client.
pub fn api_internal(message: &str, err: &StoreError) -> ApiError {
    tracing::error!(error = ?err, "survey storage error");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
}

/// Map a store error for an entity lookup: `NotFound` becomes 404 and
/// everything else a logged 500.
pub fn map_store_error(err: StoreError, entity: &str, action: &str) -> ApiError {
    match err {
        StoreError::NotFound(_) => api_not_found(&format!("{entity} not found")),
        StoreError::InvalidReference(what) => {
            api_validation_error(&format!("{what} does not exist"))
        }
        other => api_internal(&format!("failed to {action} {entity}"), &other),
    }
}
