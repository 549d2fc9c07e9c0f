use std::sync::Arc;

use crate::generation::generator::QuestionGenerator;
use crate::middleware::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless between requests; holds the completion client and verdict parser.
    pub generator: Arc<QuestionGenerator>,
    /// Per-client quota counters. The only state shared across requests.
    pub rate_limiter: RateLimiter,
}
