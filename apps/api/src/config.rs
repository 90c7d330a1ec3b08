use anyhow::{Context, Result};

use crate::llm::ProviderKind;

/// Application configuration loaded from environment variables once at
/// startup. Extraction logic never reads the environment itself — the AI
/// provider and credential travel through this value into the adapter.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub ai_provider: ProviderKind,
    /// Absent key means AI extraction is unavailable; the résumé path then
    /// fails per request while the JD path falls back to pattern extraction.
    pub ai_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let ai_provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| "gemini".to_string());
        let ai_provider = ProviderKind::parse(&ai_provider)
            .with_context(|| format!("AI_PROVIDER '{ai_provider}' must be openai, anthropic or gemini"))?;

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            ai_provider,
            ai_api_key: first_present(&["OPENAI_API_KEY", "ANTHROPIC_API_KEY", "GEMINI_API_KEY"]),
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

fn first_present(keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
}
