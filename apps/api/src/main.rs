mod config;
mod errors;
mod generation;
mod llm_client;
mod middleware;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::generator::QuestionGenerator;
use crate::generation::verdict::RubricVerdictParser;
use crate::llm_client::LlmClient;
use crate::middleware::rate_limit::{RateLimiter, HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing GROQ_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EasyConnect API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client (credential checked here, before any network call)
    let llm = LlmClient::new(config.groq_api_key.clone(), config.groq_api_url.clone())
        .context("Failed to initialize completion client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let generator = QuestionGenerator::new(
        Arc::new(llm),
        Arc::new(RubricVerdictParser),
        config.enable_local_fallback,
    );
    if config.enable_local_fallback {
        info!("Local fallback enabled: curated questions are served when drafting fails");
    }

    let rate_limiter = RateLimiter::new(
        config.rate_limit_max,
        Duration::from_secs(config.rate_limit_window_secs),
    )
    .trust_forwarded_for(config.trust_proxy);
    info!(
        "Rate limit: {} requests per {}s per client (trust proxy: {})",
        config.rate_limit_max, config.rate_limit_window_secs, config.trust_proxy
    );

    // Build app state
    let state = AppState {
        generator: Arc::new(generator),
        rate_limiter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Permissive when no origins are configured; otherwise only the listed origins,
/// with credentials. Rate-limit headers are exposed so the browser can read them.
fn build_cors(config: &Config) -> Result<CorsLayer> {
    if config.cors_origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }

    let exposed = [HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET].map(HeaderName::from_static);

    let origins = config
        .cors_origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'")))
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true)
        .expose_headers(exposed))
}
