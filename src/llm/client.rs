use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("model reply contained no text")]
    EmptyReply,

    #[error("model reply was not the expected JSON: {0}")]
    MalformedReply(#[from] serde_json::Error),

    #[error("model reply failed validation: {0}")]
    Schema(String),
}

/// One generation request: the prompt plus whether the model should be
/// constrained to a JSON reply
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub json_only: bool,
}

impl LlmRequest {
    /// Free-text reply expected (the caller strips fences and parses itself)
    pub fn text(prompt: String) -> Self {
        Self {
            prompt,
            json_only: false,
        }
    }

    /// Ask the model to emit JSON directly
    pub fn json(prompt: String) -> Self {
        Self {
            prompt,
            json_only: true,
        }
    }
}

/// Hosted language model trait
///
/// The session controller depends on this trait only; tests substitute a
/// scripted implementation instead of calling the network.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt and return the model's reply text
    async fn generate(&self, request: LlmRequest) -> Result<String, LlmError>;

    /// Model name for logging
    fn name(&self) -> &str;
}

// ============================================================================
// Gemini REST wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Debug, Deserialize)]
struct ReplyPart {
    #[serde(default)]
    text: String,
}

/// Thin client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: String) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, request: LlmRequest) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: if request.json_only {
                Some(GenerationConfig {
                    response_mime_type: "application/json".to_string(),
                })
            } else {
                None
            },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        info!(
            "Sending generation request to {} ({} prompt chars)",
            self.model,
            request.prompt.len()
        );

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GenerateContentResponse = response.json().await?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(LlmError::EmptyReply);
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}
