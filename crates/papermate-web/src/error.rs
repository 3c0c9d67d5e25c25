use axum::Json;
use axum::http::StatusCode;

use papermate_core::{CoreError, GatewayError};

use crate::models::ErrorResponse;

/// Message surfaced when the model rejects the input as too large.
/// User-actionable, unlike a generic provider failure.
const CONTEXT_TOO_LARGE_DETAIL: &str =
    "The document is too long for the model's context window. Try uploading a shorter paper.";

/// Map a domain error to an HTTP status and response body.
pub fn error_response(err: &CoreError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, detail) = match err {
        CoreError::Gateway(GatewayError::ContextTooLarge) => {
            (StatusCode::BAD_REQUEST, CONTEXT_TOO_LARGE_DETAIL.to_string())
        }
        CoreError::SessionNotReady => (
            StatusCode::BAD_REQUEST,
            "Upload and summarize a paper first.".to_string(),
        ),
        CoreError::ExtractionFailed(_) | CoreError::NoSections => {
            (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        CoreError::Gateway(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
        CoreError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };

    tracing::warn!(status = %status, %detail, "request failed");
    (status, Json(ErrorResponse { detail }))
}

/// A 400 for malformed requests (bad upload, missing headers).
pub fn bad_request(detail: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            detail: detail.into(),
        }),
    )
}
