// HTTP API error types
use axum::extract::rejection::JsonRejection;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::entity::ValidationError;
use crate::store::StoreError;

/// HTTP API error with appropriate status codes and client-safe messages.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Client-safe error message.
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::Validation { message, .. } => message,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Internal(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// JSON response body: always an `error` message, plus per-field details
    /// for validation failures.
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::Validation { message, fields } => json!({
                "error": message,
                "fields": fields,
            }),
            _ => json!({ "error": self.message() }),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Body extraction failures keep the uniform error-body shape
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation {
            message: "Invalid input.".to_string(),
            fields: err.fields,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::not_found("Not found."),
            StoreError::ForeignKey(id) => {
                let mut fields = BTreeMap::new();
                fields.insert(
                    "product_id".to_string(),
                    format!("Invalid pk \"{}\" - object does not exist.", id),
                );
                ApiError::Validation {
                    message: "Invalid input.".to_string(),
                    fields,
                }
            }
            StoreError::Validation(err) => err.into(),
            StoreError::Sqlx(err) => {
                // Log the real error but never expose internals to clients
                tracing::error!("store error: {}", err);
                match err {
                    sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
                        ApiError::service_unavailable("Storage temporarily unavailable")
                    }
                    _ => ApiError::internal("An error occurred while processing your request"),
                }
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bodies_always_carry_an_error_message() {
        let err = ApiError::unauthorized("Invalid credentials");
        assert_eq!(err.to_json(), json!({ "error": "Invalid credentials" }));
    }

    #[test]
    fn foreign_key_failures_read_as_validation() {
        let err = ApiError::from(StoreError::ForeignKey(9));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        let body = err.to_json();
        assert_eq!(
            body["fields"]["product_id"],
            "Invalid pk \"9\" - object does not exist."
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::from(StoreError::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }
}
