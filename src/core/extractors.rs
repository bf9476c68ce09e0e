//! Request body extractor enforcing the JSON content type
//!
//! Write endpoints only accept `application/json`; anything else is a `415`
//! before the body is read. The payload is extracted as a raw
//! `serde_json::Value` so the per-field validators can report every problem
//! at once instead of stopping at the first serde error.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use serde_json::Value;

use crate::core::error::ApiError;

/// A JSON request body, content-type checked but not yet validated
#[derive(Debug, Clone)]
pub struct JsonPayload(pub Value);

impl<S> FromRequest<S> for JsonPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().starts_with("application/json"));

        if !is_json {
            return Err(ApiError::UnsupportedMediaType);
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Internal(format!("failed to read request body: {e}")))?;

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|_| ApiError::field("body", "Not a valid JSON document."))?;

        Ok(JsonPayload(value))
    }
}
