//! Per-client request quota for the generation endpoint.
//!
//! Fixed window per client identity: the first request opens a window, every
//! request in it counts, and the count resets once the window has elapsed.
//! The caller's quota state is stored in the request extensions so the handler
//! can echo it back as headers.
//!
//! Clients are keyed by socket peer address. `X-Forwarded-For` is only read
//! when the limiter is told it sits behind a trusted proxy, since any client
//! can set that header.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::errors::AppError;

pub const HEADER_LIMIT: &str = "x-ratelimit-limit";
pub const HEADER_REMAINING: &str = "x-ratelimit-remaining";
pub const HEADER_RESET: &str = "x-ratelimit-reset";

/// Expired windows are swept once the table holds more clients than this.
const PRUNE_THRESHOLD: usize = 10_000;
/// Minimum gap between two sweeps of an oversized table.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

/// Quota state for one client at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    pub limit: u32,
    pub remaining: u32,
    /// Whole seconds until the current window closes. Never zero.
    pub reset_secs: u64,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct WindowTable {
    clients: HashMap<String, Window>,
    last_prune: Instant,
}

#[derive(Clone)]
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    trust_forwarded_for: bool,
    table: Arc<Mutex<WindowTable>>,
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            trust_forwarded_for: false,
            table: Arc::new(Mutex::new(WindowTable {
                clients: HashMap::new(),
                last_prune: Instant::now(),
            })),
        }
    }

    /// Key clients by the first `X-Forwarded-For` hop when present.
    /// Only safe when a proxy in front of the service overwrites that header.
    pub fn trust_forwarded_for(mut self, trust: bool) -> Self {
        self.trust_forwarded_for = trust;
        self
    }

    /// Counts one request for `client`. `Err` once the client is over quota.
    pub async fn check(&self, client: &str) -> Result<RateLimitInfo, RateLimitInfo> {
        let now = Instant::now();
        let mut table = self.table.lock().await;

        if table.clients.len() > PRUNE_THRESHOLD
            && now.duration_since(table.last_prune) >= PRUNE_INTERVAL
        {
            let window = self.window;
            table
                .clients
                .retain(|_, w| now.duration_since(w.started) < window);
            table.last_prune = now;
            debug!("Rate limiter pruned to {} active clients", table.clients.len());
        }

        let entry = table.clients.entry(client.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        entry.count = entry.count.saturating_add(1);

        let left = self.window.saturating_sub(now.duration_since(entry.started));
        let info = RateLimitInfo {
            limit: self.limit,
            remaining: self.limit.saturating_sub(entry.count),
            reset_secs: ceil_secs(left).max(1),
        };

        if entry.count > self.limit {
            Err(info)
        } else {
            Ok(info)
        }
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

/// Writes the `X-RateLimit-*` headers for `info`.
pub fn apply_rate_limit_headers(headers: &mut HeaderMap, info: &RateLimitInfo) {
    headers.insert(HEADER_LIMIT, HeaderValue::from(info.limit));
    headers.insert(HEADER_REMAINING, HeaderValue::from(info.remaining));
    headers.insert(HEADER_RESET, HeaderValue::from(info.reset_secs));
}

/// Rejects over-quota clients with 429 before the handler runs.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    mut request: Request,
    next: Next,
) -> Response {
    let client = client_identity(&request, limiter.trust_forwarded_for);

    match limiter.check(&client).await {
        Ok(info) => {
            debug!(
                "Rate limit OK for {}: {}/{} remaining",
                client, info.remaining, info.limit
            );
            request.extensions_mut().insert(info);
            next.run(request).await
        }
        Err(info) => {
            warn!(
                "Rate limit exceeded for {} (resets in {}s)",
                client, info.reset_secs
            );
            AppError::QuotaExceeded(info).into_response()
        }
    }
}

/// Socket peer address, or the first `X-Forwarded-For` hop when the proxy is
/// trusted. "unknown" when neither is available.
fn client_identity(request: &Request, trust_forwarded_for: bool) -> String {
    let forwarded = trust_forwarded_for
        .then(|| request.headers().get("x-forwarded-for"))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(forwarded) = forwarded {
        return forwarded.to_string();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
