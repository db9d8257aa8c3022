//! Generative-text client (OpenAI chat completions).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, instrument};

use crate::config::AiConfig;

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Http(String),
    #[error("AI API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("AI response had no content")]
    EmptyResponse,
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Http(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Trimmed text of the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError>;
}

/// Email copy produced by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedCopy {
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
}

/// Accepts either a JSON `{subject, body}` object (optionally inside a
/// markdown code fence) or free text, which becomes the body verbatim.
pub fn parse_generated_copy(raw: &str) -> GeneratedCopy {
    let trimmed = raw.trim();
    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .map(str::trim)
        .unwrap_or(trimmed);

    if let Ok(copy) = serde_json::from_str::<GeneratedCopy>(unfenced) {
        if !copy.body.trim().is_empty() {
            return GeneratedCopy {
                subject: copy.subject.map(|s| strip_quotes(&s)).filter(|s| !s.is_empty()),
                body: copy.body.trim().to_string(),
            };
        }
    }
    GeneratedCopy { subject: None, body: trimmed.to_string() }
}

/// Remove one layer of surrounding quotes models like to add to subject lines.
pub fn strip_quotes(s: &str) -> String {
    s.trim()
        .trim_start_matches(['"', '\''])
        .trim_end_matches(['"', '\''])
        .trim()
        .to_string()
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiClient {
    config: AiConfig,
    http: Client,
}

impl OpenAiClient {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AiError::Http(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl TextGenerator for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %self.config.model, max_tokens = request.max_tokens))]
    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.prompt },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("AI API returned {}: {}", status, body);
            return Err(AiError::Api { status: status.as_u16(), body });
        }

        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(AiError::EmptyResponse)?;
        debug!("AI completion received ({} chars)", content.len());
        Ok(content)
    }
}
