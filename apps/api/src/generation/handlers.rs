//! Axum route handlers for the Generation API.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::QuestionSource;
use crate::generation::prompt_builder::QuestionMetadata;
use crate::middleware::rate_limit::{apply_rate_limit_headers, RateLimitInfo};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<QuestionMetadata>,
}

/// GET|POST /api/generate
///
/// Runs draft → judge → refine and returns one question. The caller's quota
/// state, placed in the request by the rate-limit middleware, is echoed as
/// `X-RateLimit-*` headers on success and failure alike.
pub async fn handle_generate(
    State(state): State<AppState>,
    rate_limit: Option<Extension<RateLimitInfo>>,
) -> Response {
    let request_id = Uuid::new_v4();
    let result = state
        .generator
        .generate()
        .instrument(info_span!("generate", %request_id))
        .await;

    let mut response = match result {
        Ok(generated) => {
            let source = match generated.source {
                QuestionSource::Model => "model",
                QuestionSource::Fallback => "fallback",
            };
            info!(
                %request_id,
                "Generated question (source={source}, theme={})",
                generated.metadata.theme
            );
            Json(GenerateResponse {
                question: generated.question,
                metadata: Some(generated.metadata),
            })
            .into_response()
        }
        Err(e) => AppError::Generation(e).into_response(),
    };

    if let Some(Extension(info)) = rate_limit {
        apply_rate_limit_headers(response.headers_mut(), &info);
    }

    response
}
