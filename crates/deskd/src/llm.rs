//! Completion service client.
//!
//! Talks to an OpenAI-style chat completions endpoint. The pipeline
//! treats the service as an external collaborator: structured callers
//! (classifier, extractor) inspect the `Result`, free-text callers
//! (solver, composer) absorb failures into marker-prefixed prose via
//! [`degraded_text`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Prefix for degraded free-text output when the completion service
/// failed. Callers that need structured failure detect this marker or
/// rely on JSON-parse failure.
pub const COMPLETION_ERROR_MARKER: &str = "[completion-error]";

/// Completion service failure
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// Render a completion failure as opaque prose for callers whose
/// output cannot be validated anyway.
pub fn degraded_text(err: &LlmError) -> String {
    format!("{COMPLETION_ERROR_MARKER} {err}")
}

/// The single seam every agent uses to reach the LLM
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// One system+user instruction pair, one generated text back
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// HTTP client for an OpenAI-compatible chat completions endpoint
pub struct CompletionClient {
    http_client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionClient {
    /// Create a client for the given endpoint base URL and model.
    ///
    /// No request timeout is set: ticket processing has no deadline,
    /// and a hang in the completion service hangs the whole ticket.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Attach a bearer token for hosted endpoints
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionService for CompletionClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature,
        };

        info!(
            "[>] completion call [{}] (system {} chars, user {} chars)",
            self.model,
            system_prompt.len(),
            user_prompt.len()
        );

        let mut builder = self.http_client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            error!("[-] completion service error {}: {}", status, body);
            return Err(LlmError::Status { status, body });
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::MalformedResponse("no choices in response".to_string()))?;

        info!("[<] completion response ({} chars)", content.len());
        Ok(content)
    }
}
