//! Error taxonomy for the HTTP surface. Every handler returns `ApiError` and
//! the status-code mapping lives in one place.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use crate::auth::jwt::TokenError;
use crate::auth::service::AuthError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Well-formed JSON that violates the declared field rules (422).
    #[error("validation failed")]
    Validation(#[from] ValidationErrors),

    /// Well-formed JSON that does not deserialize into the expected shape,
    /// e.g. a missing or mistyped field (422).
    #[error("unprocessable body: {0}")]
    Unprocessable(String),

    /// Unparseable request body (400).
    #[error("malformed request: {0}")]
    Malformed(String),

    /// Domain-level rejection such as a duplicate email (400).
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("resource not found")]
    NotFound,

    /// Storage or infrastructure failure. Logged with detail, never leaked.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => ApiError::Unprocessable(e.body_text()),
            other => ApiError::Malformed(other.body_text()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail | AuthError::DuplicateUsername => {
                ApiError::BadRequest(err.to_string())
            }
            AuthError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            AuthError::Other(e) => ApiError::Internal(e),
        }
    }
}

#[derive(Debug, Serialize)]
struct FieldError {
    field: String,
    message: String,
}

/// Flattens `ValidationErrors` into one entry per violated field rule, with
/// field names reported in the API's camelCase.
fn collect_field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut details: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, issues)| {
            issues.iter().map(move |issue| FieldError {
                field: camel_case(field),
                message: issue
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| issue.code.to_string()),
            })
        })
        .collect();
    details.sort_by(|a, b| a.field.cmp(&b.field));
    details
}

/// Names the field behind a JSON deserialization failure. The decoder's
/// message carries the wire-format path ("missing field `password`" or
/// "newPassword: invalid type ..."); when neither form matches, the whole
/// body is blamed.
fn body_error_field(message: &str) -> String {
    if let Some(rest) = message.split("missing field `").nth(1) {
        if let Some(field) = rest.split('`').next() {
            return field.to_string();
        }
    }
    let detail = message.rsplit("target type: ").next().unwrap_or(message);
    let candidate = detail.split(':').next().unwrap_or_default().trim();
    if !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        return candidate.to_string();
    }
    "body".to_string()
}

/// Rust field names are snake_case; the wire format is camelCase.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                let body = json!({
                    "error": "Validation Error",
                    "details": collect_field_errors(&errors),
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ApiError::Unprocessable(message) => {
                let body = json!({
                    "error": "Validation Error",
                    "details": [{ "field": body_error_field(&message), "message": message }],
                });
                (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
            }
            ApiError::Malformed(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Unauthorized(message) => {
                (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Forbidden(message) => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": message }))).into_response()
            }
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Not found" })),
            )
                .into_response(),
            ApiError::Internal(err) => {
                error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
