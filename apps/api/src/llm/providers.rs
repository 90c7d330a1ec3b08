//! The three provider adapters behind `TextGenerator`. Each one wraps a
//! single HTTP call shape and error vocabulary; none of the differences leak
//! past this module.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{LlmError, TextGenerator};

const HTTP_TIMEOUT_SECS: u64 = 120;

/// User-facing remediation text attached to quota/rate-limit failures.
const QUOTA_REMEDIATION: &str = "The AI provider reports its usage quota is exhausted. \
    Wait a few minutes for the limit window to reset, verify the plan attached to the \
    API key, or configure a different provider or key.";

fn build_http_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .expect("Failed to build HTTP client")
}

fn looks_like_quota(status: u16, body: &str) -> bool {
    status == 429
        || body.contains("RESOURCE_EXHAUSTED")
        || body.to_lowercase().contains("quota")
}

/// Shared non-success handling: quota failures get the remediation message,
/// everything else becomes a provider API error with the extracted message.
fn provider_error(status: u16, body: String) -> LlmError {
    if looks_like_quota(status, &body) {
        return LlmError::Quota(QUOTA_REMEDIATION.to_string());
    }
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

// All three providers wrap errors the same way.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// OpenAI — chat completions with JSON response format
// ────────────────────────────────────────────────────────────────────────────

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    temperature: f32,
    response_format: OpenAiResponseFormat<'a>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OpenAiResponseFormat<'a> {
    #[serde(rename = "type")]
    format_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiGenerator {
    client: Client,
    api_key: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_http_client(),
            api_key,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = OpenAiRequest {
            model: OPENAI_MODEL,
            messages: vec![
                OpenAiMessage { role: "system", content: system },
                OpenAiMessage { role: "user", content: prompt },
            ],
            temperature: 0.1,
            response_format: OpenAiResponseFormat { format_type: "json_object" },
        };

        let response = self
            .client
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("OpenAI API returned {status}: {body}");
            return Err(provider_error(status.as_u16(), body));
        }

        let parsed: OpenAiResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic — messages API
// ────────────────────────────────────────────────────────────────────────────

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ANTHROPIC_MODEL: &str = "claude-3-haiku-20240307";
const ANTHROPIC_MAX_TOKENS: u32 = 2000;

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

pub struct AnthropicGenerator {
    client: Client,
    api_key: String,
}

impl AnthropicGenerator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_http_client(),
            api_key,
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicGenerator {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = AnthropicRequest {
            model: ANTHROPIC_MODEL,
            max_tokens: ANTHROPIC_MAX_TOKENS,
            temperature: 0.1,
            system,
            messages: vec![AnthropicMessage { role: "user", content: prompt }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Anthropic API returned {status}: {body}");
            return Err(provider_error(status.as_u16(), body));
        }

        let parsed: AnthropicResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini — generateContent with JSON mime type
// ────────────────────────────────────────────────────────────────────────────

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-1.5-flash";
const GEMINI_MAX_OUTPUT_TOKENS: u32 = 8000;

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig<'a> {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    text: Option<String>,
}

pub struct GeminiGenerator {
    client: Client,
    api_key: String,
}

impl GeminiGenerator {
    pub fn new(api_key: String) -> Self {
        Self {
            client: build_http_client(),
            api_key,
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiGenerator {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        // generateContent carries no separate system slot in this call shape;
        // the system instruction is prepended to the user prompt.
        let combined = format!("{system}\n\n{prompt}");
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: &combined }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.0,
                max_output_tokens: GEMINI_MAX_OUTPUT_TOKENS,
                response_mime_type: "application/json",
            },
        };

        let url = format!("{GEMINI_API_URL}/{GEMINI_MODEL}:generateContent?key={}", self.api_key);
        let response = self.client.post(&url).json(&request_body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {status}: {body}");
            return Err(provider_error(status.as_u16(), body));
        }

        let parsed: GeminiResponse = response.json().await?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().find_map(|p| p.text))
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_detection_on_429() {
        assert!(matches!(provider_error(429, String::new()), LlmError::Quota(_)));
    }

    #[test]
    fn test_quota_detection_on_resource_exhausted_body() {
        let err = provider_error(400, "RESOURCE_EXHAUSTED: limit hit".to_string());
        assert!(matches!(err, LlmError::Quota(_)));
    }

    #[test]
    fn test_api_error_extracts_message() {
        let body = r#"{"error": {"message": "invalid api key"}}"#.to_string();
        match provider_error(401, body) {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_api_error_keeps_unparseable_body() {
        match provider_error(500, "plain text failure".to_string()) {
            LlmError::Api { message, .. } => assert_eq!(message, "plain text failure"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_quota_message_carries_remediation() {
        if let LlmError::Quota(msg) = provider_error(429, String::new()) {
            assert!(msg.contains("quota"));
            assert!(msg.contains("provider"));
        } else {
            panic!("expected quota error");
        }
    }
}
