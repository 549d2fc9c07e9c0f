use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::generator::GenerationError;
use crate::middleware::rate_limit::{apply_rate_limit_headers, RateLimitInfo};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Too many requests")]
    QuotaExceeded(RateLimitInfo),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::QuotaExceeded(info) => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!(
                    "Too many requests. Please try again in {} seconds.",
                    info.reset_secs
                ),
            ),
            AppError::Generation(e) => {
                tracing::error!("Generation error: {e}");
                let message = match e.code() {
                    "CONFIG_ERROR" => "The question service is not configured correctly.",
                    _ => "Failed to generate a question. Please try again.",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, e.code(), message.to_string())
            }
        };

        let mut body = json!({
            "error": {
                "code": code,
                "message": message
            }
        });

        if let AppError::QuotaExceeded(info) = &self {
            body["limit"] = json!(info.limit);
            body["remaining"] = json!(info.remaining);
            body["reset"] = json!(info.reset_secs);

            let mut response = (status, Json(body)).into_response();
            apply_rate_limit_headers(response.headers_mut(), info);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(info.reset_secs));
            return response;
        }

        (status, Json(body)).into_response()
    }
}
