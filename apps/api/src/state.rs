use sqlx::PgPool;

use crate::llm::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// None when no AI credential is configured. The résumé path treats that
    /// as a per-request error; the JD path falls back to pattern extraction.
    pub llm: Option<LlmClient>,
}
