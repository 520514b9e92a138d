use std::time::Duration;

use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
///
/// `GEMINI_API_KEY` is not required at startup: without it the service still
/// accepts jobs, and each analyze call fails with a descriptive error.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    /// Upper bound on a Gemini call. Unset means the call may block indefinitely.
    pub gemini_timeout: Option<Duration>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            gemini_timeout: parse_timeout(optional_env("GEMINI_TIMEOUT_SECS"))?,
            port: optional_env("PORT")
                .unwrap_or_else(|| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_timeout(raw: Option<String>) -> Result<Option<Duration>> {
    raw.map(|secs| {
        secs.trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .with_context(|| format!("GEMINI_TIMEOUT_SECS must be a whole number of seconds, got '{secs}'"))
    })
    .transpose()
}
