use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use super::{CompletionModel, CompletionRequest};
use crate::config::LlmConfig;
use crate::http::{build_client, describe_failure, snippet};
use crate::{Result, SafarAiError};

/// Client for an OpenAI-compatible `chat/completions` endpoint
pub struct OpenAiClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
}

impl OpenAiClient {
    /// Create a new client
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| SafarAiError::config("Language model API key is missing"))?;

        Ok(Self {
            client: build_client(config.timeout_seconds, config.max_retries)?,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionModel for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: self.temperature,
        };
        let payload = serde_json::to_vec(&body)
            .map_err(|e| SafarAiError::model(format!("Failed to encode completion request: {e}")))?;

        debug!(prompt_chars = request.prompt.len(), "Sending completion request");
        let start_time = Instant::now();

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| match e {
                reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => {
                    error!("Completion request timed out");
                    SafarAiError::model("Completion request timed out")
                }
                e => {
                    let reason = describe_failure(e);
                    error!("Completion request failed: {}", reason);
                    SafarAiError::model(format!("Completion request failed: {reason}"))
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| SafarAiError::model(format!("Failed to read completion response: {e}")))?;

        if !status.is_success() {
            error!("Completion API returned {}: {}", status, snippet(&text));
            return Err(match status.as_u16() {
                401 | 403 => SafarAiError::model("Completion API rejected the credentials"),
                429 => SafarAiError::model("Completion API rate limit exceeded"),
                _ => SafarAiError::model(format!(
                    "Completion API error {}: {}",
                    status,
                    snippet(&text)
                )),
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text).map_err(|e| {
            error!("Failed to parse completion response: {}", e);
            SafarAiError::model(format!("Malformed completion response: {e}"))
        })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| SafarAiError::model("Completion response contained no choices"))?;

        if choice.finish_reason.as_deref() == Some("length") {
            warn!("Completion was cut off at the token limit");
        }

        let content = choice
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| SafarAiError::model("Completion response was empty"))?;

        info!(
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            prompt_tokens = parsed.usage.as_ref().and_then(|u| u.prompt_tokens),
            completion_tokens = parsed.usage.as_ref().and_then(|u| u.completion_tokens),
            "Completion received"
        );

        Ok(content)
    }
}
