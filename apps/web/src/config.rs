use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default suitable for local development.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the analysis backend (no trailing slash).
    pub backend_url: String,
    pub backend_timeout_secs: u64,
    pub port: u16,
    pub rust_log: String,
    /// Disables the session token guard. Meant for browser test harnesses only.
    pub skip_token_check: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: env_or("BACKEND_URL", "http://localhost:8000")
                .trim_end_matches('/')
                .to_string(),
            backend_timeout_secs: env_or("BACKEND_TIMEOUT_SECS", "30")
                .parse::<u64>()
                .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?,
            port: env_or("PORT", "3000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            skip_token_check: parse_flag(&env_or("SKIP_TOKEN_CHECK", "false"))
                .context("SKIP_TOKEN_CHECK must be true or false")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}
