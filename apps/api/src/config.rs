use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: String,
    /// Overrides the Groq chat completions endpoint (local gateways, proxies).
    pub groq_api_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Browser origins allowed by CORS. Empty means permissive.
    pub cors_origins: Vec<String>,
    pub rate_limit_max: u32,
    pub rate_limit_window_secs: u64,
    /// Key rate limits by `X-Forwarded-For`. Only set behind a proxy that overwrites it.
    pub trust_proxy: bool,
    /// Serve a curated example question when every drafting attempt fails.
    pub enable_local_fallback: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            groq_api_key: require_env("GROQ_API_KEY")?,
            groq_api_url: optional_env("GROQ_API_URL"),
            port: parse_env("PORT", 5000).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cors_origins: optional_env("CORS_ORIGINS")
                .map(|raw| split_origins(&raw))
                .unwrap_or_default(),
            rate_limit_max: parse_positive_env("RATE_LIMIT_MAX", 100)?,
            rate_limit_window_secs: parse_positive_env("RATE_LIMIT_WINDOW_SECS", 15 * 60)?,
            trust_proxy: parse_flag(optional_env("TRUST_PROXY").as_deref()),
            enable_local_fallback: parse_flag(optional_env("ENABLE_LOCAL_FALLBACK").as_deref()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => Ok(raw.trim().parse::<T>()?),
        None => Ok(default),
    }
}

fn parse_positive_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = parse_env(key, default)
        .with_context(|| format!("{key} must be a positive integer"))?;
    ensure_positive(key, value)
}

fn ensure_positive<T: Default + PartialEq>(key: &str, value: T) -> Result<T> {
    if value == T::default() {
        anyhow::bail!("{key} must be a positive integer, got 0");
    }
    Ok(value)
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(
        raw.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("1" | "true" | "yes" | "on")
    )
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
