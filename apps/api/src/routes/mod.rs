pub mod health;

use axum::{http::Uri, middleware::from_fn_with_state, routing::get, Router};

use crate::errors::AppError;
use crate::generation::handlers;
use crate::middleware::rate_limit::rate_limit_middleware;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    // Quota applies to generation only; health checks are never throttled.
    let generation = Router::new()
        .route(
            "/api/generate",
            get(handlers::handle_generate).post(handlers::handle_generate),
        )
        .route_layer(from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(generation)
        .fallback(not_found)
        .with_state(state)
}
