use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if the model credential or the database URL is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    /// Video metadata is optional: without a key the fetcher reports no metadata.
    pub youtube_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            youtube_api_key: optional_env("YOUTUBE_API_KEY"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
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
