/// AI extractor adapter — the single point of entry for all text-generation
/// calls in the pipeline.
///
/// ARCHITECTURAL RULE: no other module may talk to a provider API directly.
/// The pipeline depends only on the narrow `TextGenerator` interface; the
/// three provider adapters live in `providers` and are selected once from
/// configuration, never inside extraction logic.
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;
use crate::models::candidate::RawCandidateFields;
use crate::models::requirement::RawRequirementFields;

pub mod prompts;
pub mod providers;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate-limit / quota exhaustion. Distinct so callers can show the
    /// remediation text, but the control-flow contract is the same as any
    /// other failure: no AI result for this document.
    #[error("{0}")]
    Quota(String),

    #[error("model returned empty content")]
    EmptyContent,

    #[error("no AI credential configured")]
    MissingCredentials,
}

/// Supported text-generation backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
}

impl ProviderKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            "gemini" => Some(Self::Gemini),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
        }
    }
}

/// The one seam between the pipeline and external model providers. Each
/// adapter issues exactly one attempt per call; retry policy belongs to
/// callers, not here.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

/// Facade over the configured provider: builds extraction prompts, submits
/// them, and parses the strict-JSON responses into typed raw fields.
#[derive(Clone)]
pub struct LlmClient {
    generator: Arc<dyn TextGenerator>,
    provider: ProviderKind,
}

impl LlmClient {
    /// Builds a client from configuration. Returns `MissingCredentials` when
    /// no API key is configured — callers decide whether that is fatal.
    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        let api_key = config.ai_api_key.clone().ok_or(LlmError::MissingCredentials)?;
        let generator: Arc<dyn TextGenerator> = match config.ai_provider {
            ProviderKind::OpenAi => Arc::new(providers::OpenAiGenerator::new(api_key)),
            ProviderKind::Anthropic => Arc::new(providers::AnthropicGenerator::new(api_key)),
            ProviderKind::Gemini => Arc::new(providers::GeminiGenerator::new(api_key)),
        };
        Ok(Self {
            generator,
            provider: config.ai_provider,
        })
    }

    /// Test seam: wraps an arbitrary generator.
    pub fn with_generator(generator: Arc<dyn TextGenerator>, provider: ProviderKind) -> Self {
        Self { generator, provider }
    }

    pub fn provider(&self) -> ProviderKind {
        self.provider
    }

    /// Structured candidate extraction from résumé text.
    pub async fn extract_candidate(&self, text: &str) -> Result<RawCandidateFields, LlmError> {
        let prompt = prompts::candidate_prompt(text);
        self.call_json(&prompt, prompts::CANDIDATE_SYSTEM).await
    }

    /// Structured requirement extraction from job-description text.
    pub async fn extract_requirement(&self, jd_text: &str) -> Result<RawRequirementFields, LlmError> {
        let prompt = prompts::requirement_prompt(jd_text);
        self.call_json(&prompt, prompts::REQUIREMENT_SYSTEM).await
    }

    async fn call_json<T: DeserializeOwned>(&self, prompt: &str, system: &str) -> Result<T, LlmError> {
        let text = self.generator.generate(prompt, system).await?;
        debug!(
            provider = self.provider.as_str(),
            response_len = text.len(),
            "LLM extraction call returned"
        );
        let text = strip_json_fences(&text);
        let text = isolate_json_object(text).ok_or(LlmError::EmptyContent)?;
        serde_json::from_str(text).map_err(LlmError::Parse)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Isolates the outermost `{...}` object, tolerating prose before or after it.
fn isolate_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedGenerator(String);

    #[async_trait]
    impl TextGenerator for CannedGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Ok(self.0.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        }
    }

    fn client(body: &str) -> LlmClient {
        LlmClient::with_generator(Arc::new(CannedGenerator(body.to_string())), ProviderKind::Gemini)
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_isolate_json_object_with_prose() {
        let input = "Here is the result: {\"a\": 1} hope that helps";
        assert_eq!(isolate_json_object(input), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_isolate_json_object_missing() {
        assert!(isolate_json_object("no json here").is_none());
    }

    #[test]
    fn test_provider_kind_parse() {
        assert_eq!(ProviderKind::parse("OpenAI"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::parse(" gemini "), Some(ProviderKind::Gemini));
        assert_eq!(ProviderKind::parse("cohere"), None);
    }

    #[tokio::test]
    async fn test_extract_candidate_parses_fenced_json() {
        let body = "```json\n{\"name\": \"Nguyen Van An\", \"skills\": [\"python\"]}\n```";
        let fields = client(body).extract_candidate("cv text").await.unwrap();
        assert_eq!(fields.name.as_deref(), Some("Nguyen Van An"));
        assert_eq!(fields.skills.len(), 1);
    }

    #[tokio::test]
    async fn test_extract_requirement_parses_plain_json() {
        let body = r#"{"position": "Data Engineer", "years": 3, "skills": ["sql"]}"#;
        let fields = client(body).extract_requirement("jd text").await.unwrap();
        assert_eq!(fields.position.as_deref(), Some("Data Engineer"));
        assert_eq!(fields.years, Some(3.0));
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error_not_a_partial() {
        let result = client("{\"name\": ").extract_candidate("cv").await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let client =
            LlmClient::with_generator(Arc::new(FailingGenerator), ProviderKind::OpenAi);
        assert!(client.extract_candidate("cv").await.is_err());
    }
}
