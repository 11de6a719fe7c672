use anyhow::{Context, Result};

/// Browser-style storage budget for a single stored blob.
const DEFAULT_STORAGE_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    /// Optional on purpose: a missing key still lets generation be attempted,
    /// the provider rejects it and the user is asked to configure one.
    pub gemini_api_key: Option<String>,
    pub storage_quota_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            redis_url: require_env("REDIS_URL")?,
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            storage_quota_bytes: match std::env::var("STORAGE_QUOTA_BYTES") {
                Ok(raw) => raw
                    .parse::<usize>()
                    .context("STORAGE_QUOTA_BYTES must be a byte count")?,
                Err(_) => DEFAULT_STORAGE_QUOTA_BYTES,
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
