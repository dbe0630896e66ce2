//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the model provider directly.
//! Flows receive a `&dyn LanguageModel` and go through `call_json`.
//!
//! Model: gemini-2.0-flash (hardcoded — do not make configurable to prevent drift)
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for every flow.
pub const MODEL: &str = "gemini-2.0-flash";
const MAX_OUTPUT_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Seam between flows and the hosted model.
/// Implementations must be stateless per call and safe to share across requests.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends one prompt and returns the raw text of the model's answer.
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// The process-wide model handle, built once at startup.
/// Calls are never retried: a failure is terminal for that user action.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            api_key,
        })
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        };

        let response = self
            .client
            .post(format!("{GEMINI_API_BASE}/{MODEL}:generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.text().ok_or(LlmError::EmptyContent)
    }
}

/// Calls the model and deserializes its answer as JSON.
/// The prompt must instruct the model to return valid JSON.
pub async fn call_json<T: DeserializeOwned>(
    model: &dyn LanguageModel,
    prompt: &str,
    system: &str,
) -> Result<T, LlmError> {
    let text = model.generate(prompt, system).await?;
    let text = strip_json_fences(&text);
    if text.is_empty() {
        return Err(LlmError::EmptyContent);
    }
    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(stripped)
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;

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
    fn test_response_text_joins_parts_of_first_candidate() {
        let json = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]}},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 4}
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 12);
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(response.text().is_none());
    }

    #[test]
    fn test_request_uses_gemini_field_names() {
        let body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: "sys" }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                max_output_tokens: 10,
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(value["systemInstruction"].get("role").is_none());
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[derive(Debug, Deserialize)]
    struct Probe {
        answer: u32,
    }

    #[tokio::test]
    async fn test_call_json_accepts_fenced_output() {
        let model = ScriptedModel::new().reply_raw("```json\n{\"answer\": 42}\n```");
        let probe: Probe = call_json(&model, "p", "s").await.unwrap();
        assert_eq!(probe.answer, 42);
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test]
    async fn test_call_json_rejects_non_json() {
        let model = ScriptedModel::new().reply_raw("Désolé, je ne peux pas.");
        let result: Result<Probe, _> = call_json(&model, "p", "s").await;
        assert!(matches!(result, Err(LlmError::Parse(_))));
    }

    #[tokio::test]
    async fn test_call_json_treats_empty_fence_as_empty_content() {
        let model = ScriptedModel::new().reply_raw("```json\n```");
        let result: Result<Probe, _> = call_json(&model, "p", "s").await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }
}
