//! Typed error handling for the API
//!
//! Every failure a request can hit is represented here and translated to the
//! JSON error envelope at the HTTP boundary:
//!
//! - [`ApiError::Validation`]: bad or unknown field, missing required field,
//!   out-of-bounds value → `400`
//! - [`ApiError::Auth`]: missing/invalid/expired credential → `401`
//! - [`ApiError::NotFound`]: missing primary key → `404`
//! - [`ApiError::Conflict`]: uniqueness violation → `409`
//! - [`ApiError::UnsupportedMediaType`]: wrong request content type → `415`
//! - [`ApiError::Storage`] / [`ApiError::Internal`]: unexpected backend
//!   failures → generic `500`, never leaking internal detail
//!
//! Validation errors carry per-field message lists so the envelope can report
//! `{"message": {"field": ["reason", ...]}}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;

use crate::storage::StorageError;

/// Per-field validation messages, keyed by field name.
///
/// A `BTreeMap` keeps the serialized output deterministic.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The request-level error type for the API
#[derive(Debug)]
pub enum ApiError {
    /// Input validation failed; maps field names to reasons
    Validation(FieldErrors),

    /// Credential missing, invalid or expired
    Auth(String),

    /// Requested record does not exist
    NotFound(String),

    /// Uniqueness violation (duplicate username, email, ISBN, ...)
    Conflict(String),

    /// Request body was not `application/json`
    UnsupportedMediaType,

    /// Storage backend failure
    Storage(StorageError),

    /// Internal invariant violation (should not happen in normal operation)
    Internal(String),
}

impl ApiError {
    /// Build a validation error for a single field
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        ApiError::Validation(errors)
    }

    /// Build a not-found error for a resource kind and primary key
    pub fn not_found(resource: &str, id: i64) -> Self {
        ApiError::NotFound(format!("{resource} with id {id} not found"))
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The `message` value of the error envelope
    ///
    /// Validation errors serialize their per-field map; everything else is a
    /// plain string. Storage and internal errors are masked with a generic
    /// message so backend detail never reaches the client.
    pub fn message_value(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::Auth(msg) => json!(msg),
            ApiError::NotFound(msg) => json!(msg),
            ApiError::Conflict(msg) => json!(msg),
            ApiError::UnsupportedMediaType => json!("Content Type must be application/json"),
            ApiError::Storage(_) | ApiError::Internal(_) => json!("Internal server error"),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(errors) => write!(f, "Validation failed: {errors:?}"),
            ApiError::Auth(msg) => write!(f, "{msg}"),
            ApiError::NotFound(msg) => write!(f, "{msg}"),
            ApiError::Conflict(msg) => write!(f, "{msg}"),
            ApiError::UnsupportedMediaType => {
                write!(f, "Content Type must be application/json")
            }
            ApiError::Storage(e) => write!(f, "{e}"),
            ApiError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(e: StorageError) -> Self {
        ApiError::Storage(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, ApiError::Storage(_) | ApiError::Internal(_)) {
            tracing::error!(error = %self, "request failed");
        }

        let body = json!({
            "success": false,
            "message": self.message_value(),
        });

        (self.status_code(), Json(body)).into_response()
    }
}
